//! Label pages.

use crate::color::{normalize, Color, ColorInput};
use crate::elements::{Element, RenderContext};
use crate::error::Result;
use crate::geometry::PageSize;
use crate::render::Surface;

/// A page: size, optional background and elements in paint order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    size: PageSize,
    background: Option<Color>,
    elements: Vec<Element>,
}

impl Page {
    /// An A4 page.
    pub fn new() -> Self {
        Self::with_size_mm(PageSize::A4_MM.0, PageSize::A4_MM.1)
    }

    /// A page of the given size in millimetres.
    pub fn with_size_mm(width_mm: f32, height_mm: f32) -> Self {
        log::info!("Created new label page, size: {} mm x {} mm", width_mm, height_mm);
        Self {
            size: PageSize::from_mm(width_mm, height_mm),
            background: None,
            elements: Vec::new(),
        }
    }

    pub(crate) fn with_size(size: PageSize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn set_size(&mut self, width_mm: f32, height_mm: f32) -> &mut Self {
        self.size = PageSize::from_mm(width_mm, height_mm);
        log::debug!("Page size set: {}x{}", width_mm, height_mm);
        self
    }

    pub fn set_background_color(&mut self, color: impl Into<ColorInput>) -> Result<&mut Self> {
        let color = normalize(color)?;
        self.background = Some(color);
        log::debug!("Page background color set: {}", color);
        Ok(self)
    }

    pub fn clear_background_color(&mut self) -> &mut Self {
        self.background = None;
        self
    }

    /// Append an element; later elements paint over earlier ones.
    pub fn add_element(&mut self, element: impl Into<Element>) -> &mut Self {
        self.elements.push(element.into());
        log::debug!("Element added to page, current element count: {}", self.elements.len());
        self
    }

    pub fn clear_elements(&mut self) -> &mut Self {
        self.elements.clear();
        self
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut [Element] {
        &mut self.elements
    }

    /// Size in points.
    pub fn size(&self) -> PageSize {
        self.size
    }

    /// Size in millimetres.
    pub fn size_mm(&self) -> (f32, f32) {
        self.size.to_mm()
    }

    pub fn background_color(&self) -> Option<Color> {
        self.background
    }

    /// Paint the background and every element onto the current surface page.
    ///
    /// Each element draws inside its own saved graphics state, which is
    /// restored even when the draw fails. The first failure aborts painting.
    pub fn paint(&self, surface: &mut dyn Surface, ctx: &RenderContext) -> Result<()> {
        if let Some(color) = self.background {
            log::debug!("Drawing page background, color: {}", color);
            surface.set_fill_color(color);
            let bounds = self.size.bounds();
            surface.fill_rect(bounds.x, bounds.y, bounds.width, bounds.height)?;
        }

        for (i, element) in self.elements.iter().enumerate() {
            log::debug!("Drawing element {} ({})", i + 1, element.kind());
            let origin = self.size.flip(element.location());

            surface.save_state();
            let result = element.draw(surface, origin, ctx);
            surface.restore_state();

            if let Err(e) = result {
                log::error!("Failed to draw {} element {}: {}", element.kind(), i + 1, e);
                return Err(e);
            }
        }
        Ok(())
    }
}
