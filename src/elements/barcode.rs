//! Barcode element.

use serde::{Deserialize, Serialize};

use super::RenderContext;
use crate::color::{normalize, Color, ColorInput};
use crate::error::Result;
use crate::geometry::{mm_to_pt, Point, Rect, Size};
use crate::render::metrics::FALLBACK_FONT;
use crate::render::{Surface, TextAlign};
use crate::symbols::barcode::{bar_runs, Drawable, ModuleMatrix};

/// Gap between the symbol and its caption, in points.
const CAPTION_GAP: f32 = 2.0;

/// Where the human-readable data is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextPosition {
    /// No caption
    None,
    /// Above the symbol
    Top,
    /// Below the symbol
    #[default]
    Bottom,
}

/// A linear or 2D barcode with an optional caption.
#[derive(Debug, Clone, PartialEq)]
pub struct Barcode {
    location: Point,
    size: Size,
    data: String,
    barcode_type: String,
    color: Color,
    show_text: bool,
    text_location: TextPosition,
    text_color: Color,
    text_size: f32,
}

impl Default for Barcode {
    fn default() -> Self {
        Self {
            location: Point::default(),
            size: Size::new(mm_to_pt(50.0), mm_to_pt(10.0)),
            data: "1234567890".to_string(),
            barcode_type: "code128".to_string(),
            color: Color::BLACK,
            show_text: false,
            text_location: TextPosition::Bottom,
            text_color: Color::BLACK,
            text_size: 8.0,
        }
    }
}

impl Barcode {
    pub fn new() -> Self {
        let barcode = Self::default();
        log::info!("Created new barcode element, type: {}", barcode.barcode_type);
        barcode
    }

    /// Top-left corner, in points.
    pub fn set_location(&mut self, x: f32, y: f32) -> &mut Self {
        self.location = Point::new(x, y);
        log::debug!("Barcode position set: ({}, {})", x, y);
        self
    }

    /// Symbol size in points; the caption is drawn outside it.
    pub fn set_size(&mut self, width: f32, height: f32) -> &mut Self {
        self.size = Size::new(width, height);
        log::debug!("Barcode size set: {}x{}", width, height);
        self
    }

    pub fn set_data(&mut self, data: impl Into<String>) -> &mut Self {
        self.data = data.into();
        log::debug!("Barcode data set: {}", self.data);
        self
    }

    /// Symbology name (`code39`, `code128`, `ean13`, `ean8`, `upca`,
    /// `datamatrix`, ...). Checked when drawing, not here.
    pub fn set_barcode_type(&mut self, barcode_type: impl Into<String>) -> &mut Self {
        self.barcode_type = barcode_type.into();
        log::debug!("Barcode type set: {}", self.barcode_type);
        self
    }

    pub fn set_color(&mut self, color: impl Into<ColorInput>) -> Result<&mut Self> {
        self.color = normalize(color)?;
        log::debug!("Barcode color set: {}", self.color);
        Ok(self)
    }

    /// Turn the caption on or off without changing its position.
    pub fn enable_text(&mut self, show: bool) -> &mut Self {
        self.show_text = show;
        log::debug!("Barcode text display set: {}", show);
        self
    }

    pub fn set_text_location(&mut self, location: TextPosition) -> &mut Self {
        self.text_location = location;
        log::debug!("Barcode text position set: {:?}", location);
        self
    }

    pub fn show_text_top(&mut self) -> &mut Self {
        self.enable_text(true).set_text_location(TextPosition::Top)
    }

    pub fn show_text_bottom(&mut self) -> &mut Self {
        self.enable_text(true).set_text_location(TextPosition::Bottom)
    }

    pub fn hide_text(&mut self) -> &mut Self {
        self.enable_text(false)
    }

    pub fn set_text_color(&mut self, color: impl Into<ColorInput>) -> Result<&mut Self> {
        self.text_color = normalize(color)?;
        log::debug!("Barcode text color set: {}", self.text_color);
        Ok(self)
    }

    pub fn set_text_size(&mut self, size: f32) -> &mut Self {
        self.text_size = size;
        log::debug!("Barcode text size set: {}", size);
        self
    }

    pub fn location(&self) -> Point {
        self.location
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn barcode_type(&self) -> &str {
        &self.barcode_type
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Caption position, or `None` when the caption is hidden.
    pub fn caption(&self) -> Option<TextPosition> {
        match (self.show_text, self.text_location) {
            (false, _) | (true, TextPosition::None) => None,
            (true, position) => Some(position),
        }
    }

    pub fn text_color(&self) -> Color {
        self.text_color
    }

    pub fn text_size(&self) -> f32 {
        self.text_size
    }

    /// Draw with the top-left corner at `origin` (renderer space).
    pub fn draw(&self, surface: &mut dyn Surface, origin: Point, ctx: &RenderContext) -> Result<()> {
        log::debug!(
            "Drawing barcode: '{}', type: {}, position: ({}, {})",
            self.data,
            self.barcode_type,
            origin.x,
            origin.y
        );

        let area = Rect::hanging_from(origin, self.size);
        let (width, height, bottom) = (area.width, area.height, area.y);

        surface.set_fill_color(self.color);
        surface.set_stroke_color(self.color);

        let drawable = ctx
            .barcodes
            .encode(&self.barcode_type, &self.data)
            .into_drawable(&self.data);

        match drawable {
            Drawable::DirectDraw(bars) => {
                if !bars.is_empty() {
                    let module = width / bars.len() as f32;
                    for (start, count) in bar_runs(&bars) {
                        surface.fill_rect(
                            origin.x + start as f32 * module,
                            bottom,
                            count as f32 * module,
                            height,
                        )?;
                    }
                }
            },
            Drawable::BoundedGraphic(matrix) => {
                draw_matrix(surface, &matrix, area)?;
            },
            Drawable::TextFallback(text) => {
                surface.set_font(FALLBACK_FONT, self.text_size)?;
                surface.draw_string(origin.x, bottom, &text, TextAlign::Left)?;
            },
        }

        if let Some(position) = self.caption() {
            surface.set_fill_color(self.text_color);
            surface.set_font(FALLBACK_FONT, self.text_size)?;
            let center = origin.x + width / 2.0;
            let baseline = match position {
                TextPosition::Top => bottom + height + CAPTION_GAP,
                _ => bottom - self.text_size - CAPTION_GAP,
            };
            surface.draw_string(center, baseline, &self.data, TextAlign::Center)?;
            log::debug!("Drew barcode text: '{}'", self.data);
        }
        Ok(())
    }
}

/// Paint dark modules scaled into `area`.
fn draw_matrix(surface: &mut dyn Surface, matrix: &ModuleMatrix, area: Rect) -> Result<()> {
    if matrix.width() == 0 || matrix.height() == 0 {
        return Ok(());
    }
    let mw = area.width / matrix.width() as f32;
    let mh = area.height / matrix.height() as f32;
    for (col, row) in matrix.dark_modules() {
        let flipped_row = matrix.height() - 1 - row;
        surface.fill_rect(area.x + col as f32 * mw, area.y + flipped_row as f32 * mh, mw, mh)?;
    }
    Ok(())
}
