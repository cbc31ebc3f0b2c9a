// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::new_without_default)]

//! # labelgen
//!
//! Compose printable labels on fixed-size pages and export them as PDF.
//!
//! ## Features
//!
//! - **Pages in millimetres**: sizes are given in mm, element positions in
//!   points measured from the page's top-left corner
//! - **Text**: standard PDF fonts or system TrueType/OpenType fonts resolved
//!   by family name and style, with embedding and a Helvetica fallback
//! - **Barcodes**: Code 39, Code 128, EAN-13, EAN-8, UPC-A, ITF, Code 93,
//!   Codabar and Data Matrix, with optional captions
//! - **QR codes**: cached rasters with selectable error correction
//! - **Renderer seam**: drawing goes through the [`Surface`] trait; the
//!   built-in [`PdfSurface`] writes PDF 1.7 with flate-compressed streams
//!
//! ## Quick Start
//!
//! ```no_run
//! use labelgen::{Document, Page, RenderContext};
//! use labelgen::elements::{QrCode, Text};
//! use labelgen::fonts::FontStyle;
//!
//! let mut page = Page::with_size_mm(40.0, 30.0);
//! page.set_background_color("#FFFFFF")?;
//!
//! let mut qr = QrCode::new();
//! qr.set_location(0.0, 0.0).set_size(40.0, 40.0).set_data("ABC123");
//! page.add_element(qr);
//!
//! let mut text = Text::new();
//! text.set_location(45.0, 12.0)
//!     .set_text("Device")
//!     .set_font("Helvetica", 10.0, FontStyle::Bold);
//! page.add_element(text);
//!
//! let mut document = Document::new();
//! document.add_page(page);
//! document.export_pdf("output/label.pdf", &RenderContext::default())?;
//! # Ok::<(), labelgen::Error>(())
//! ```
//!
//! ## Fonts
//!
//! ```no_run
//! use std::sync::Arc;
//! use labelgen::{FontCatalog, RenderContext};
//!
//! let fonts = Arc::new(FontCatalog::with_system_fonts());
//! let ctx = RenderContext::new(fonts);
//! ```

// Error handling
pub mod error;

// Value types
pub mod color;
pub mod geometry;

// Configuration and logging
pub mod config;
pub mod logging;

// Font discovery and resolution
pub mod fonts;

// Barcode and QR encoders
pub mod symbols;

// Drawing surfaces and PDF output
pub mod render;

// Document model
pub mod document;
pub mod elements;
pub mod page;

// Re-exports
pub use color::{Color, ColorInput};
pub use config::{CatalogConfig, LogConfig, PdfConfig};
pub use document::Document;
pub use elements::{Barcode, Element, QrCode, RenderContext, Text, TextPosition};
pub use error::{Error, Result};
pub use fonts::{FontCatalog, FontStyle};
pub use geometry::{mm_to_pt, PageSize, Point};
pub use page::Page;
pub use render::{FontSink, PdfSurface, RecordingSurface, Surface, TextAlign};
pub use symbols::{BarcodeType, ErrorCorrection};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
