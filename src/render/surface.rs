//! The drawing surface abstraction.
//!
//! Elements paint through [`Surface`]; the PDF writer is one implementation
//! and [`RecordingSurface`](super::RecordingSurface) is another used in tests.
//! Coordinates are PDF points with the origin at the bottom-left corner.
//! Text alignment is resolved by the surface, which owns the font metrics.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::Result;

/// Horizontal anchoring of a string relative to its x coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// x is the left edge
    #[default]
    Left,
    /// x is the centre
    Center,
    /// x is the right edge
    Right,
}

impl TextAlign {
    /// Left edge for a string of `width` anchored at `x`.
    pub fn start_x(self, x: f32, width: f32) -> f32 {
        match self {
            TextAlign::Left => x,
            TextAlign::Center => x - width / 2.0,
            TextAlign::Right => x - width,
        }
    }
}

/// Where fonts are registered under an identifier before use.
pub trait FontSink {
    /// Register the font file at `path` under `identifier`.
    fn register_font(&mut self, identifier: &str, path: &Path) -> Result<()>;

    /// Whether `identifier` can be passed to [`Surface::set_font`].
    fn is_font_registered(&self, identifier: &str) -> bool;

    /// Identifiers added through [`FontSink::register_font`].
    fn registered_fonts(&self) -> BTreeSet<String>;
}

/// A 2D drawing target.
pub trait Surface: FontSink {
    /// Size of the current and subsequent pages, in points.
    fn set_page_size(&mut self, width: f32, height: f32);

    fn set_fill_color(&mut self, color: Color);

    fn set_stroke_color(&mut self, color: Color);

    /// Fill an axis-aligned rectangle with the fill color.
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> Result<()>;

    /// Select a registered or standard font.
    ///
    /// Fails with [`Error::Render`](crate::Error::Render) when the
    /// identifier is unknown; the previous font stays selected.
    fn set_font(&mut self, identifier: &str, size: f32) -> Result<()>;

    /// Draw `text` with its baseline at `y` in the current font and fill color.
    fn draw_string(&mut self, x: f32, y: f32, text: &str, align: TextAlign) -> Result<()>;

    /// Draw an RGB raster scaled into the given box.
    fn draw_image(
        &mut self,
        image: &image::RgbImage,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<()>;

    fn save_state(&mut self);

    fn restore_state(&mut self);

    /// Close the current page; the next drawing call starts a new one.
    fn show_page(&mut self) -> Result<()>;

    /// Finish the output. No drawing is accepted afterwards.
    fn save(&mut self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_start_x() {
        assert_eq!(TextAlign::Left.start_x(100.0, 40.0), 100.0);
        assert_eq!(TextAlign::Center.start_x(100.0, 40.0), 80.0);
        assert_eq!(TextAlign::Right.start_x(100.0, 40.0), 60.0);
    }

    #[test]
    fn test_align_serde() {
        let align: TextAlign = serde_json::from_str("\"center\"").unwrap();
        assert_eq!(align, TextAlign::Center);
        assert_eq!(TextAlign::default(), TextAlign::Left);
    }
}
