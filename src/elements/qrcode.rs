//! QR code element.
//!
//! The raster is generated on first draw and kept until the data, color or
//! error correction level changes.

use std::sync::{Arc, OnceLock};

use image::{Rgb, RgbImage};

use super::RenderContext;
use crate::color::{normalize, Color, ColorInput};
use crate::error::Result;
use crate::geometry::{mm_to_pt, Point, Rect, Size};
use crate::render::Surface;
use crate::symbols::{ErrorCorrection, ModuleMatrix};

/// A QR code placed by its top-left corner.
#[derive(Debug, Clone)]
pub struct QrCode {
    location: Point,
    size: Size,
    data: String,
    color: Color,
    error_correction: ErrorCorrection,
    raster: OnceLock<Arc<RgbImage>>,
}

impl Default for QrCode {
    fn default() -> Self {
        Self {
            location: Point::default(),
            size: Size::new(mm_to_pt(20.0), mm_to_pt(20.0)),
            data: String::new(),
            color: Color::BLACK,
            error_correction: ErrorCorrection::Medium,
            raster: OnceLock::new(),
        }
    }
}

impl PartialEq for QrCode {
    fn eq(&self, other: &Self) -> bool {
        self.location == other.location
            && self.size == other.size
            && self.data == other.data
            && self.color == other.color
            && self.error_correction == other.error_correction
    }
}

impl QrCode {
    pub fn new() -> Self {
        log::info!("Created new QR code element");
        Self::default()
    }

    /// Top-left corner, in points.
    pub fn set_location(&mut self, x: f32, y: f32) -> &mut Self {
        self.location = Point::new(x, y);
        log::debug!("QR code position set: ({}, {})", x, y);
        self
    }

    /// Size in points.
    pub fn set_size(&mut self, width: f32, height: f32) -> &mut Self {
        self.size = Size::new(width, height);
        log::debug!("QR code size set: {}x{}", width, height);
        self
    }

    pub fn set_data(&mut self, data: impl Into<String>) -> &mut Self {
        self.data = data.into();
        self.invalidate();
        log::debug!("QR code data set: {}", self.data);
        self
    }

    /// Color of the dark modules; light modules stay white.
    pub fn set_color(&mut self, color: impl Into<ColorInput>) -> Result<&mut Self> {
        self.color = normalize(color)?;
        self.invalidate();
        log::debug!("QR code color set: {}", self.color);
        Ok(self)
    }

    pub fn set_error_correction(&mut self, level: ErrorCorrection) -> &mut Self {
        self.error_correction = level;
        self.invalidate();
        log::debug!("QR code error correction level set: {:?}", level);
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

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn error_correction(&self) -> ErrorCorrection {
        self.error_correction
    }

    /// Whether a raster is cached.
    pub fn is_cached(&self) -> bool {
        self.raster.get().is_some()
    }

    fn invalidate(&mut self) {
        self.raster = OnceLock::new();
    }

    /// The cached raster, generating it if needed.
    pub fn raster(&self, ctx: &RenderContext) -> Result<Arc<RgbImage>> {
        if let Some(raster) = self.raster.get() {
            return Ok(Arc::clone(raster));
        }
        log::debug!("Generating QR code image, data: '{}'", self.data);
        let matrix = ctx.qr.generate(&self.data, self.error_correction)?;
        let raster = Arc::new(colorize(&matrix, self.color));
        Ok(Arc::clone(self.raster.get_or_init(|| raster)))
    }

    /// Draw with the top-left corner at `origin` (renderer space).
    pub fn draw(&self, surface: &mut dyn Surface, origin: Point, ctx: &RenderContext) -> Result<()> {
        log::debug!("Drawing QR code: '{}', position: ({}, {})", self.data, origin.x, origin.y);
        let raster = self.raster(ctx).map_err(|e| {
            log::error!("Failed to generate QR code image: {}", e);
            e
        })?;
        let area = Rect::hanging_from(origin, self.size);
        surface.draw_image(&raster, area.x, area.y, area.width, area.height)?;
        log::debug!("QR code drawn successfully");
        Ok(())
    }
}

/// One pixel per module: dark modules in `color`, light modules white.
fn colorize(matrix: &ModuleMatrix, color: Color) -> RgbImage {
    let dark = Rgb(color.to_array());
    let light = Rgb([255, 255, 255]);
    RgbImage::from_fn(matrix.width() as u32, matrix.height() as u32, |x, y| {
        if matrix.is_dark(x as usize, y as usize) {
            dark
        } else {
            light
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{RecordingSurface, SurfaceCall};

    #[test]
    fn test_defaults() {
        let qr = QrCode::new();
        assert_eq!(qr.error_correction(), ErrorCorrection::Medium);
        assert!((qr.size().width - 56.693).abs() < 0.01);
        assert_eq!(qr.color(), Color::BLACK);
        assert!(!qr.is_cached());
    }

    #[test]
    fn test_draw_places_bottom_left() {
        let mut qr = QrCode::new();
        qr.set_data("ABC123").set_size(40.0, 40.0);
        let mut surface = RecordingSurface::new();
        qr.draw(&mut surface, Point::new(0.0, 85.0), &RenderContext::default()).unwrap();

        assert_eq!(
            surface.calls,
            vec![SurfaceCall::DrawImage {
                x: 0.0,
                y: 45.0,
                width: 40.0,
                height: 40.0,
                pixels: (21, 21)
            }]
        );
        assert!(qr.is_cached());
    }

    #[test]
    fn test_setters_invalidate_cache() {
        let ctx = RenderContext::default();
        let mut qr = QrCode::new();
        qr.set_data("ABC123");
        qr.raster(&ctx).unwrap();
        assert!(qr.is_cached());

        qr.set_data("XYZ");
        assert!(!qr.is_cached());
        qr.raster(&ctx).unwrap();
        qr.set_color("#112233").unwrap();
        assert!(!qr.is_cached());
        qr.raster(&ctx).unwrap();
        qr.set_error_correction(ErrorCorrection::High);
        assert!(!qr.is_cached());
    }

    #[test]
    fn test_custom_color() {
        let ctx = RenderContext::default();
        let mut qr = QrCode::new();
        qr.set_data("ABC123").set_color((200, 0, 0)).unwrap();
        let raster = qr.raster(&ctx).unwrap();
        // top-left finder module is dark, the separator next to it is light
        assert_eq!(raster.get_pixel(0, 0), &Rgb([200, 0, 0]));
        assert_eq!(raster.get_pixel(7, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_location_setter() {
        let mut qr = QrCode::new();
        qr.set_location(3.0, 4.0);
        assert_eq!(qr.location(), Point::new(3.0, 4.0));
        qr.raster(&RenderContext::default()).unwrap();
        let clone = qr.clone();
        assert_eq!(clone, qr);
    }
}
