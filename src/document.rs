//! Label documents and export.

use std::path::{Path, PathBuf};

use crate::config::PdfConfig;
use crate::elements::RenderContext;
use crate::error::Result;
use crate::geometry::PageSize;
use crate::page::Page;
use crate::render::{PdfSurface, Surface};

/// An ordered list of pages.
///
/// Exporting does not modify the document, so the same document can be
/// exported any number of times.
///
/// ```
/// use labelgen::{Document, Page, RenderContext};
/// use labelgen::elements::Text;
///
/// let mut page = Page::with_size_mm(40.0, 30.0);
/// let mut text = Text::new();
/// text.set_location(5.0, 15.0).set_text("Device");
/// page.add_element(text);
///
/// let mut document = Document::new();
/// document.add_page(page);
/// let pdf = document.to_pdf_bytes(&RenderContext::default())?;
/// assert!(pdf.starts_with(b"%PDF-"));
/// # Ok::<(), labelgen::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    page_size: PageSize,
    pages: Vec<Page>,
    pdf_config: PdfConfig,
}

impl Document {
    /// An empty document whose default page size is A4.
    pub fn new() -> Self {
        let document = Self::default();
        let (w, h) = document.page_size.to_mm();
        log::info!("Created new label document, size: {:.1} mm x {:.1} mm", w, h);
        document
    }

    /// An empty document with a default page size in millimetres.
    pub fn with_page_size_mm(width_mm: f32, height_mm: f32) -> Self {
        log::info!("Created new label document, size: {:.1} mm x {:.1} mm", width_mm, height_mm);
        Self {
            page_size: PageSize::from_mm(width_mm, height_mm),
            ..Self::default()
        }
    }

    /// Output settings used by [`Document::export_pdf`] and [`Document::to_pdf_bytes`].
    pub fn set_pdf_config(&mut self, config: PdfConfig) -> &mut Self {
        self.pdf_config = config;
        self
    }

    pub fn pdf_config(&self) -> &PdfConfig {
        &self.pdf_config
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn add_page(&mut self, page: Page) -> &mut Self {
        self.pages.push(page);
        log::debug!("Page added to document, current page count: {}", self.pages.len());
        self
    }

    /// Append a page of the document's default size and return it.
    pub fn new_page(&mut self) -> &mut Page {
        self.pages.push(Page::with_size(self.page_size));
        log::debug!("Page added to document, current page count: {}", self.pages.len());
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn pages_mut(&mut self) -> &mut [Page] {
        &mut self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn clear_pages(&mut self) -> &mut Self {
        self.pages.clear();
        self
    }

    /// Paint every page onto `surface` and finalize it.
    pub fn export(&self, surface: &mut dyn Surface, ctx: &RenderContext) -> Result<()> {
        surface.set_page_size(self.page_size.width, self.page_size.height);

        for (i, page) in self.pages.iter().enumerate() {
            log::debug!("Processing page {}...", i + 1);
            let size = page.size();
            surface.set_page_size(size.width, size.height);
            page.paint(surface, ctx)?;
            surface.show_page()?;
        }

        surface.save()
    }

    /// Export to a PDF file, creating missing parent directories.
    pub fn export_pdf(&self, path: impl AsRef<Path>, ctx: &RenderContext) -> Result<PathBuf> {
        let path = path.as_ref();
        log::info!("Starting PDF export: {}", path.display());

        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                log::debug!("Creating directory: {}", dir.display());
                std::fs::create_dir_all(dir)?;
            }
        }

        let mut surface = PdfSurface::to_file(path, self.pdf_config.clone());
        if let Err(e) = self.export(&mut surface, ctx) {
            log::error!("PDF export failed: {}", e);
            return Err(e);
        }

        log::info!("PDF exported successfully: {}", path.display());
        Ok(path.to_path_buf())
    }

    /// Export to an in-memory PDF.
    pub fn to_pdf_bytes(&self, ctx: &RenderContext) -> Result<Vec<u8>> {
        let mut surface = PdfSurface::with_config(self.pdf_config.clone());
        self.export(&mut surface, ctx)?;
        Ok(surface.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{RecordingSurface, SurfaceCall};

    #[test]
    fn test_pages() {
        let mut document = Document::new();
        assert_eq!(document.page_count(), 0);
        document.add_page(Page::new());
        document.new_page().set_size(40.0, 30.0);
        assert_eq!(document.page_count(), 2);
        assert!((document.pages()[1].size_mm().0 - 40.0).abs() < 1e-3);
        document.clear_pages();
        assert_eq!(document.page_count(), 0);
    }

    #[test]
    fn test_new_page_uses_default_size() {
        let mut document = Document::with_page_size_mm(100.0, 50.0);
        let size = document.new_page().size();
        assert_eq!(size, PageSize::from_mm(100.0, 50.0));
    }

    #[test]
    fn test_export_sequence() {
        let mut document = Document::new();
        document.add_page(Page::with_size_mm(40.0, 30.0));
        document.add_page(Page::with_size_mm(50.0, 20.0));

        let mut surface = RecordingSurface::new();
        document.export(&mut surface, &RenderContext::default()).unwrap();

        let shows = surface.calls.iter().filter(|c| **c == SurfaceCall::ShowPage).count();
        assert_eq!(shows, 2);
        assert_eq!(surface.calls.last(), Some(&SurfaceCall::Save));
        assert!(surface.is_saved());
    }

    #[test]
    fn test_export_pdf_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/labels.pdf");

        let mut document = Document::new();
        document.add_page(Page::with_size_mm(40.0, 30.0));
        let written = document.export_pdf(&path, &RenderContext::default()).unwrap();

        assert_eq!(written, path);
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.7"));
    }
}
