//! Label elements.
//!
//! An element is a positioned value holder that knows how to paint itself on
//! a [`Surface`]. Locations are stored in label space (points, origin at the
//! page's top-left corner); the owning page converts them to renderer space
//! and passes the result to [`Element::draw`], so drawing never touches the
//! stored geometry.
//!
//! ## Example
//!
//! ```
//! use labelgen::elements::{Element, Text};
//!
//! let mut text = Text::new();
//! text.set_location(10.0, 20.0).set_text("Asset #42");
//! let element = Element::from(text);
//! assert_eq!(element.location().y, 20.0);
//! ```

mod barcode;
mod qrcode;
mod text;

pub use barcode::{Barcode, TextPosition};
pub use qrcode::QrCode;
pub use text::Text;

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::fonts::FontCatalog;
use crate::geometry::Point;
use crate::render::Surface;
use crate::symbols::{BarcodeEncoder, QrCodeGenerator, QrGenerator};

/// Collaborators elements need while drawing.
#[derive(Clone)]
pub struct RenderContext {
    /// Font lookup and registration
    pub fonts: Arc<FontCatalog>,
    /// Barcode encoder adapter
    pub barcodes: BarcodeEncoder,
    /// QR raster generator
    pub qr: Arc<dyn QrGenerator>,
}

impl RenderContext {
    /// Context using `fonts` and the default symbol generators.
    pub fn new(fonts: Arc<FontCatalog>) -> Self {
        Self {
            fonts,
            barcodes: BarcodeEncoder::default(),
            qr: Arc::new(QrCodeGenerator),
        }
    }

    pub fn with_barcode_encoder(mut self, encoder: BarcodeEncoder) -> Self {
        self.barcodes = encoder;
        self
    }

    pub fn with_qr_generator(mut self, generator: Arc<dyn QrGenerator>) -> Self {
        self.qr = generator;
        self
    }
}

/// An empty font catalog (standard fonts only) and the default generators.
impl Default for RenderContext {
    fn default() -> Self {
        Self::new(Arc::new(FontCatalog::new()))
    }
}

impl fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("fonts", &self.fonts.font_count())
            .field("barcodes", &self.barcodes)
            .finish_non_exhaustive()
    }
}

/// Any element that can be placed on a page.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Single line of text
    Text(Text),
    /// Linear or Data Matrix barcode
    Barcode(Barcode),
    /// QR code
    QrCode(QrCode),
}

impl Element {
    /// Stored top-left location in label space.
    pub fn location(&self) -> Point {
        match self {
            Element::Text(t) => t.location(),
            Element::Barcode(b) => b.location(),
            Element::QrCode(q) => q.location(),
        }
    }

    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Element::Text(_) => "text",
            Element::Barcode(_) => "barcode",
            Element::QrCode(_) => "qrcode",
        }
    }

    /// Paint at `origin`, the stored location already mapped to renderer space.
    pub fn draw(&self, surface: &mut dyn Surface, origin: Point, ctx: &RenderContext) -> Result<()> {
        match self {
            Element::Text(t) => t.draw(surface, origin, ctx),
            Element::Barcode(b) => b.draw(surface, origin, ctx),
            Element::QrCode(q) => q.draw(surface, origin, ctx),
        }
    }
}

impl From<Text> for Element {
    fn from(text: Text) -> Self {
        Element::Text(text)
    }
}

impl From<Barcode> for Element {
    fn from(barcode: Barcode) -> Self {
        Element::Barcode(barcode)
    }
}

impl From<QrCode> for Element {
    fn from(qr: QrCode) -> Self {
        Element::QrCode(qr)
    }
}
