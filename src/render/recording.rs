//! A surface that records calls instead of drawing.
//!
//! Used by tests to assert paint order and coordinates without parsing PDF
//! output. Alignment is recorded as given; the surface measures nothing.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::metrics;
use super::surface::{FontSink, Surface, TextAlign};
use crate::color::Color;
use crate::error::{Error, Result};

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    PageSize { width: f32, height: f32 },
    FillColor(Color),
    StrokeColor(Color),
    FillRect { x: f32, y: f32, width: f32, height: f32 },
    SetFont { identifier: String, size: f32 },
    DrawString { x: f32, y: f32, text: String, align: TextAlign },
    DrawImage { x: f32, y: f32, width: f32, height: f32, pixels: (u32, u32) },
    SaveState,
    RestoreState,
    ShowPage,
    Save,
}

/// [`Surface`] that keeps every call in order.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    /// Calls in the order they were made
    pub calls: Vec<SurfaceCall>,
    fonts: Vec<(String, PathBuf)>,
    reject_fonts: bool,
    saved: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `register_font` call fail, as if the files were corrupt.
    pub fn rejecting_fonts() -> Self {
        Self {
            reject_fonts: true,
            ..Self::default()
        }
    }

    /// Paths registered per identifier, in registration order.
    pub fn font_files(&self) -> &[(String, PathBuf)] {
        &self.fonts
    }

    /// Number of registrations that reached this surface.
    pub fn registration_count(&self) -> usize {
        self.fonts.len()
    }

    /// Text of every `draw_string` call.
    pub fn strings(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::DrawString { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Every filled rectangle as `(x, y, width, height)`.
    pub fn rects(&self) -> Vec<(f32, f32, f32, f32)> {
        self.calls
            .iter()
            .filter_map(|call| match *call {
                SurfaceCall::FillRect { x, y, width, height } => Some((x, y, width, height)),
                _ => None,
            })
            .collect()
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }
}

impl FontSink for RecordingSurface {
    fn register_font(&mut self, identifier: &str, path: &Path) -> Result<()> {
        if self.reject_fonts {
            return Err(Error::Font(format!("cannot load {}", path.display())));
        }
        self.fonts.push((identifier.to_string(), path.to_path_buf()));
        Ok(())
    }

    fn is_font_registered(&self, identifier: &str) -> bool {
        metrics::is_base14(identifier) || self.fonts.iter().any(|(id, _)| id == identifier)
    }

    fn registered_fonts(&self) -> BTreeSet<String> {
        self.fonts.iter().map(|(id, _)| id.clone()).collect()
    }
}

impl Surface for RecordingSurface {
    fn set_page_size(&mut self, width: f32, height: f32) {
        self.calls.push(SurfaceCall::PageSize { width, height });
    }

    fn set_fill_color(&mut self, color: Color) {
        self.calls.push(SurfaceCall::FillColor(color));
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.calls.push(SurfaceCall::StrokeColor(color));
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> Result<()> {
        self.calls.push(SurfaceCall::FillRect { x, y, width, height });
        Ok(())
    }

    fn set_font(&mut self, identifier: &str, size: f32) -> Result<()> {
        if !self.is_font_registered(identifier) {
            return Err(Error::Render(format!("font not registered: {}", identifier)));
        }
        self.calls.push(SurfaceCall::SetFont {
            identifier: identifier.to_string(),
            size,
        });
        Ok(())
    }

    fn draw_string(&mut self, x: f32, y: f32, text: &str, align: TextAlign) -> Result<()> {
        self.calls.push(SurfaceCall::DrawString {
            x,
            y,
            text: text.to_string(),
            align,
        });
        Ok(())
    }

    fn draw_image(
        &mut self,
        image: &image::RgbImage,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<()> {
        self.calls.push(SurfaceCall::DrawImage {
            x,
            y,
            width,
            height,
            pixels: image.dimensions(),
        });
        Ok(())
    }

    fn save_state(&mut self) {
        self.calls.push(SurfaceCall::SaveState);
    }

    fn restore_state(&mut self) {
        self.calls.push(SurfaceCall::RestoreState);
    }

    fn show_page(&mut self) -> Result<()> {
        self.calls.push(SurfaceCall::ShowPage);
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        self.saved = true;
        self.calls.push(SurfaceCall::Save);
        Ok(())
    }
}
