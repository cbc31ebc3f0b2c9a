//! Text element.

use super::RenderContext;
use crate::color::{normalize, Color, ColorInput};
use crate::error::Result;
use crate::fonts::FontStyle;
use crate::geometry::Point;
use crate::render::metrics::{self, FALLBACK_FONT};
use crate::render::{Surface, TextAlign};

/// Standard fonts tried, in order, when the chosen font cannot be set.
const FALLBACK_CHAIN: [&str; 3] = [FALLBACK_FONT, "Courier", "Times-Roman"];

/// A single line of text anchored at its baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    location: Point,
    text: String,
    font_name: String,
    font_size: f32,
    font_style: FontStyle,
    color: Color,
    alignment: TextAlign,
}

impl Default for Text {
    fn default() -> Self {
        Self {
            location: Point::default(),
            text: String::new(),
            font_name: FALLBACK_FONT.to_string(),
            font_size: 10.0,
            font_style: FontStyle::Regular,
            color: Color::BLACK,
            alignment: TextAlign::Left,
        }
    }
}

impl Text {
    pub fn new() -> Self {
        log::info!("Created new text element");
        Self::default()
    }

    /// Position of the baseline anchor, in points from the top-left corner.
    pub fn set_location(&mut self, x: f32, y: f32) -> &mut Self {
        self.location = Point::new(x, y);
        log::debug!("Text position set: ({}, {})", x, y);
        self
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = text.into();
        log::debug!("Text content set: {}", self.text);
        self
    }

    /// Font family or file name, size in points and style.
    pub fn set_font(&mut self, name: impl Into<String>, size: f32, style: FontStyle) -> &mut Self {
        self.font_name = name.into();
        self.font_size = size;
        self.font_style = style;
        log::debug!("Text font set: {}, size: {}, style: {}", self.font_name, size, style);
        self
    }

    pub fn set_color(&mut self, color: impl Into<ColorInput>) -> Result<&mut Self> {
        self.color = normalize(color)?;
        log::debug!("Text color set: {}", self.color);
        Ok(self)
    }

    pub fn set_alignment(&mut self, alignment: TextAlign) -> &mut Self {
        self.alignment = alignment;
        log::debug!("Text alignment set: {:?}", alignment);
        self
    }

    pub fn location(&self) -> Point {
        self.location
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font_name(&self) -> &str {
        &self.font_name
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn font_style(&self) -> FontStyle {
        self.font_style
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn alignment(&self) -> TextAlign {
        self.alignment
    }

    /// Identifier to select on the surface: a standard font, a registered
    /// font, or the fallback when the font cannot be found.
    fn resolve_font(&self, surface: &mut dyn Surface, ctx: &RenderContext) -> String {
        if let Some(standard) = metrics::standard_variant(&self.font_name, self.font_style) {
            return standard.to_string();
        }
        match ctx.fonts.register(&self.font_name, self.font_style, surface) {
            Some(identifier) => identifier,
            None => {
                log::warn!("Unable to register font {}, using default font", self.font_name);
                FALLBACK_FONT.to_string()
            },
        }
    }

    /// Draw with the baseline anchor at `origin` (renderer space).
    pub fn draw(&self, surface: &mut dyn Surface, origin: Point, ctx: &RenderContext) -> Result<()> {
        log::debug!("Drawing text: '{}', position: ({}, {})", self.text, origin.x, origin.y);

        surface.set_fill_color(self.color);

        let identifier = self.resolve_font(surface, ctx);
        if let Err(e) = surface.set_font(&identifier, self.font_size) {
            log::warn!("Failed to set font {}: {}, using basic font", identifier, e);
            let mut last = Err(e);
            for standard in FALLBACK_CHAIN {
                last = surface.set_font(standard, self.font_size);
                if last.is_ok() {
                    log::debug!("Fell back to standard font: {}", standard);
                    break;
                }
            }
            last?;
        }

        surface.draw_string(origin.x, origin.y, &self.text, self.alignment)
    }
}
