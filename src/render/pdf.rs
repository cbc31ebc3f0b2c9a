//! PDF implementation of [`Surface`].
//!
//! Pages are recorded as content streams and assembled into a complete
//! document by [`Surface::save`]. Standard fonts are referenced by name;
//! registered font files are embedded as Type0 composite fonts.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use super::content::ContentStreamBuilder;
use super::embed::EmbeddedFont;
use super::metrics;
use super::object::{Object, ObjectRef};
use super::serializer::ObjectSerializer;
use super::surface::{FontSink, Surface, TextAlign};
use crate::color::Color;
use crate::config::PdfConfig;
use crate::error::{Error, Result};
use crate::geometry::PageSize;

/// Compress data using Flate/Deflate compression.
fn compress_data(data: &[u8]) -> std::io::Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

#[derive(Debug)]
enum FontProgram {
    Standard(String),
    Embedded(Box<EmbeddedFont>),
}

#[derive(Debug)]
struct FontEntry {
    resource: String,
    program: FontProgram,
}

#[derive(Debug)]
struct PageData {
    width: f32,
    height: f32,
    content: ContentStreamBuilder,
    fonts: BTreeSet<String>,
    images: BTreeSet<String>,
}

impl PageData {
    fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            content: ContentStreamBuilder::new(),
            fonts: BTreeSet::new(),
            images: BTreeSet::new(),
        }
    }
}

enum Encoded {
    Bytes(Vec<u8>),
    Hex(String),
}

#[derive(Debug)]
struct ImageData {
    resource: String,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
struct GraphicsState {
    fill: Color,
    stroke: Color,
    font: String,
    font_size: f32,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            fill: Color::BLACK,
            stroke: Color::BLACK,
            font: metrics::FALLBACK_FONT.to_string(),
            font_size: 12.0,
        }
    }
}

/// A [`Surface`] that produces a PDF document.
///
/// ```no_run
/// use labelgen::render::{PdfSurface, Surface, TextAlign};
///
/// let mut surface = PdfSurface::new();
/// surface.set_page_size(200.0, 100.0);
/// surface.set_font("Helvetica", 12.0)?;
/// surface.draw_string(10.0, 50.0, "Hello", TextAlign::Left)?;
/// surface.save()?;
/// let pdf = surface.into_bytes();
/// # Ok::<(), labelgen::Error>(())
/// ```
#[derive(Debug)]
pub struct PdfSurface {
    config: PdfConfig,
    target: Option<PathBuf>,
    page_width: f32,
    page_height: f32,
    pages: Vec<PageData>,
    current: Option<PageData>,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    /// identifier -> font, in first-use order
    fonts: IndexMap<String, FontEntry>,
    registered: BTreeSet<String>,
    images: Vec<ImageData>,
    output: Option<Vec<u8>>,
}

impl PdfSurface {
    /// Create a surface with the default configuration and A4 pages.
    pub fn new() -> Self {
        Self::with_config(PdfConfig::default())
    }

    /// Create a surface with custom configuration.
    pub fn with_config(config: PdfConfig) -> Self {
        let a4 = PageSize::a4();
        Self {
            config,
            target: None,
            page_width: a4.width,
            page_height: a4.height,
            pages: Vec::new(),
            current: None,
            state: GraphicsState::default(),
            stack: Vec::new(),
            fonts: IndexMap::new(),
            registered: BTreeSet::new(),
            images: Vec::new(),
            output: None,
        }
    }

    /// Create a surface that writes the finished document to `path` on save.
    pub fn to_file(path: impl Into<PathBuf>, config: PdfConfig) -> Self {
        let mut surface = Self::with_config(config);
        surface.target = Some(path.into());
        surface
    }

    /// Output file, if any.
    pub fn target(&self) -> Option<&Path> {
        self.target.as_deref()
    }

    /// The finished document, once saved.
    pub fn bytes(&self) -> Option<&[u8]> {
        self.output.as_deref()
    }

    /// Take the finished document. Empty before [`Surface::save`].
    pub fn into_bytes(self) -> Vec<u8> {
        self.output.unwrap_or_default()
    }

    /// Font identifiers in use and the resource names they were given.
    pub fn font_resources(&self) -> BTreeMap<String, String> {
        self.fonts
            .iter()
            .map(|(id, entry)| (id.clone(), entry.resource.clone()))
            .collect()
    }

    /// Pages completed or in progress.
    pub fn page_count(&self) -> usize {
        self.pages.len() + usize::from(self.current.is_some())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.output.is_some() {
            return Err(Error::Render("surface already saved".to_string()));
        }
        Ok(())
    }

    fn page(&mut self) -> &mut PageData {
        let (width, height) = (self.page_width, self.page_height);
        self.current.get_or_insert_with(|| PageData::new(width, height))
    }

    fn close_page(&mut self) {
        if let Some(mut page) = self.current.take() {
            for _ in self.stack.drain(..) {
                page.content.restore_state();
            }
            self.pages.push(page);
        }
        self.state = GraphicsState::default();
    }

    fn next_resource(&self) -> String {
        format!("F{}", self.fonts.len() + 1)
    }

    fn text_width(&self, text: &str, identifier: &str, size: f32) -> f32 {
        match self.fonts.get(identifier).map(|e| &e.program) {
            Some(FontProgram::Embedded(font)) => font.text_width(text, size),
            Some(FontProgram::Standard(name)) => metrics::text_width(name, text, size),
            None => metrics::text_width(identifier, text, size),
        }
    }

    /// Build the complete PDF document.
    fn finish(&self) -> Result<Vec<u8>> {
        let serializer = ObjectSerializer::compact();
        let mut next_id = 1u32;
        let mut alloc = || {
            let id = next_id;
            next_id += 1;
            id
        };

        let catalog_id = alloc();
        let pages_id = alloc();
        let page_ids: Vec<(u32, u32)> = self.pages.iter().map(|_| (alloc(), alloc())).collect();

        // only fonts and images some page actually uses are written
        let used_fonts: BTreeSet<&String> = self.pages.iter().flat_map(|p| p.fonts.iter()).collect();
        let mut font_ids: HashMap<String, Vec<u32>> = HashMap::new();
        for entry in self.fonts.values() {
            if !used_fonts.contains(&entry.resource) {
                continue;
            }
            let count = match entry.program {
                FontProgram::Standard(_) => 1,
                FontProgram::Embedded(_) => 5,
            };
            font_ids.insert(entry.resource.clone(), (0..count).map(|_| alloc()).collect());
        }
        let image_ids: HashMap<String, u32> =
            self.images.iter().map(|img| (img.resource.clone(), alloc())).collect();
        let info_id = alloc();

        let mut objects: Vec<(u32, Object)> = Vec::new();

        objects.push((
            catalog_id,
            ObjectSerializer::dict(vec![
                ("Type", ObjectSerializer::name("Catalog")),
                ("Pages", ObjectSerializer::reference(pages_id)),
            ]),
        ));
        objects.push((
            pages_id,
            ObjectSerializer::dict(vec![
                ("Type", ObjectSerializer::name("Pages")),
                (
                    "Kids",
                    Object::Array(
                        page_ids
                            .iter()
                            .map(|(page_id, _)| Object::Reference(ObjectRef::new(*page_id, 0)))
                            .collect(),
                    ),
                ),
                ("Count", ObjectSerializer::integer(self.pages.len() as i64)),
            ]),
        ));

        for (page, (page_id, content_id)) in self.pages.iter().zip(&page_ids) {
            let mut resources = Vec::new();
            if !page.fonts.is_empty() {
                let fonts: HashMap<String, Object> = page
                    .fonts
                    .iter()
                    .filter_map(|res| {
                        font_ids
                            .get(res)
                            .and_then(|ids| ids.first())
                            .map(|id| (res.clone(), ObjectSerializer::reference(*id)))
                    })
                    .collect();
                resources.push(("Font", Object::Dictionary(fonts)));
            }
            if !page.images.is_empty() {
                let xobjects: HashMap<String, Object> = page
                    .images
                    .iter()
                    .filter_map(|res| {
                        image_ids
                            .get(res)
                            .map(|id| (res.clone(), ObjectSerializer::reference(*id)))
                    })
                    .collect();
                resources.push(("XObject", Object::Dictionary(xobjects)));
            }

            objects.push((
                *page_id,
                ObjectSerializer::dict(vec![
                    ("Type", ObjectSerializer::name("Page")),
                    ("Parent", ObjectSerializer::reference(pages_id)),
                    (
                        "MediaBox",
                        ObjectSerializer::rect(0.0, 0.0, page.width as f64, page.height as f64),
                    ),
                    ("Contents", ObjectSerializer::reference(*content_id)),
                    ("Resources", ObjectSerializer::dict(resources)),
                ]),
            ));

            let raw = page.content.build()?;
            objects.push((*content_id, self.stream(HashMap::new(), raw)));
        }

        for entry in self.fonts.values() {
            let Some(ids) = font_ids.get(&entry.resource) else {
                continue;
            };
            match &entry.program {
                FontProgram::Standard(name) => {
                    let mut dict = vec![
                        ("Type", ObjectSerializer::name("Font")),
                        ("Subtype", ObjectSerializer::name("Type1")),
                        ("BaseFont", ObjectSerializer::name(name)),
                    ];
                    if name != "Symbol" && name != "ZapfDingbats" {
                        dict.push(("Encoding", ObjectSerializer::name("WinAnsiEncoding")));
                    }
                    objects.push((ids[0], ObjectSerializer::dict(dict)));
                },
                FontProgram::Embedded(font) => {
                    objects.extend(self.embedded_font_objects(font, ids));
                },
            }
        }

        for image in &self.images {
            let Some(id) = image_ids.get(&image.resource) else {
                continue;
            };
            let dict = ObjectSerializer::dict_map(vec![
                ("Type", ObjectSerializer::name("XObject")),
                ("Subtype", ObjectSerializer::name("Image")),
                ("Width", ObjectSerializer::integer(image.width as i64)),
                ("Height", ObjectSerializer::integer(image.height as i64)),
                ("ColorSpace", ObjectSerializer::name("DeviceRGB")),
                ("BitsPerComponent", ObjectSerializer::integer(8)),
            ]);
            objects.push((*id, self.stream(dict, image.pixels.clone())));
        }

        let mut info_entries = Vec::new();
        if let Some(title) = &self.config.title {
            info_entries.push(("Title", ObjectSerializer::string(title)));
        }
        if let Some(author) = &self.config.author {
            info_entries.push(("Author", ObjectSerializer::string(author)));
        }
        if let Some(subject) = &self.config.subject {
            info_entries.push(("Subject", ObjectSerializer::string(subject)));
        }
        if let Some(creator) = &self.config.creator {
            info_entries.push(("Creator", ObjectSerializer::string(creator)));
        }
        if let Some(created) = &self.config.creation_date {
            info_entries.push(("CreationDate", ObjectSerializer::string(created)));
        }
        objects.push((info_id, ObjectSerializer::dict(info_entries)));

        objects.sort_by_key(|(id, _)| *id);

        let mut output = Vec::new();
        writeln!(output, "%PDF-{}", self.config.version)?;
        // Binary marker (recommended for binary content)
        output.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

        let mut xref_offsets: Vec<usize> = Vec::with_capacity(objects.len());
        for (id, obj) in &objects {
            xref_offsets.push(output.len());
            serializer.write_indirect(&mut output, *id, obj)?;
        }

        let xref_start = output.len();
        writeln!(output, "xref")?;
        writeln!(output, "0 {}", next_id)?;
        // Object 0 is always free
        writeln!(output, "0000000000 65535 f ")?;
        for offset in &xref_offsets {
            writeln!(output, "{:010} 00000 n ", offset)?;
        }

        let trailer = ObjectSerializer::dict(vec![
            ("Size", ObjectSerializer::integer(next_id as i64)),
            ("Root", ObjectSerializer::reference(catalog_id)),
            ("Info", ObjectSerializer::reference(info_id)),
        ]);
        writeln!(output, "trailer")?;
        serializer.write_object(&mut output, &trailer)?;
        writeln!(output)?;
        writeln!(output, "startxref")?;
        writeln!(output, "{}", xref_start)?;
        write!(output, "%%EOF")?;

        log::debug!(
            "Assembled PDF: {} pages, {} objects, {} bytes",
            self.pages.len(),
            objects.len(),
            output.len()
        );
        Ok(output)
    }

    fn stream(&self, dict: HashMap<String, Object>, raw: Vec<u8>) -> Object {
        if self.config.compress {
            match compress_data(&raw) {
                Ok(compressed) => return Object::stream(dict, compressed, true),
                Err(e) => log::warn!("Stream compression failed, writing uncompressed: {}", e),
            }
        }
        Object::stream(dict, raw, false)
    }

    /// Type0 font, CIDFont, descriptor, font program and ToUnicode, in `ids` order.
    fn embedded_font_objects(&self, font: &EmbeddedFont, ids: &[u32]) -> Vec<(u32, Object)> {
        let (type0_id, cid_id, descriptor_id, file_id, cmap_id) = (ids[0], ids[1], ids[2], ids[3], ids[4]);

        let type0 = ObjectSerializer::dict(vec![
            ("Type", ObjectSerializer::name("Font")),
            ("Subtype", ObjectSerializer::name("Type0")),
            ("BaseFont", ObjectSerializer::name(&font.name)),
            ("Encoding", ObjectSerializer::name("Identity-H")),
            ("DescendantFonts", Object::Array(vec![ObjectSerializer::reference(cid_id)])),
            ("ToUnicode", ObjectSerializer::reference(cmap_id)),
        ]);

        let mut cid_entries = vec![
            ("Type", ObjectSerializer::name("Font")),
            ("BaseFont", ObjectSerializer::name(&font.name)),
            (
                "CIDSystemInfo",
                ObjectSerializer::dict(vec![
                    ("Registry", ObjectSerializer::string("Adobe")),
                    ("Ordering", ObjectSerializer::string("Identity")),
                    ("Supplement", ObjectSerializer::integer(0)),
                ]),
            ),
            ("FontDescriptor", ObjectSerializer::reference(descriptor_id)),
            ("DW", ObjectSerializer::integer(1000)),
            ("W", font.widths_array()),
        ];
        if font.is_cff() {
            cid_entries.push(("Subtype", ObjectSerializer::name("CIDFontType0")));
        } else {
            cid_entries.push(("Subtype", ObjectSerializer::name("CIDFontType2")));
            cid_entries.push(("CIDToGIDMap", ObjectSerializer::name("Identity")));
        }

        let (llx, lly, urx, ury) = font.bbox;
        let file_key = if font.is_cff() { "FontFile3" } else { "FontFile2" };
        let descriptor = ObjectSerializer::dict(vec![
            ("Type", ObjectSerializer::name("FontDescriptor")),
            ("FontName", ObjectSerializer::name(&font.name)),
            ("Flags", ObjectSerializer::integer(font.flags as i64)),
            (
                "FontBBox",
                Object::Array(vec![
                    Object::Integer(llx as i64),
                    Object::Integer(lly as i64),
                    Object::Integer(urx as i64),
                    Object::Integer(ury as i64),
                ]),
            ),
            ("ItalicAngle", ObjectSerializer::real(font.italic_angle as f64)),
            ("Ascent", ObjectSerializer::integer(font.ascent as i64)),
            ("Descent", ObjectSerializer::integer(font.descent as i64)),
            ("CapHeight", ObjectSerializer::integer(font.cap_height as i64)),
            ("StemV", ObjectSerializer::integer(font.stem_v as i64)),
            (file_key, ObjectSerializer::reference(file_id)),
        ]);

        let mut file_dict = HashMap::new();
        if font.is_cff() {
            file_dict.insert("Subtype".to_string(), ObjectSerializer::name("OpenType"));
        } else {
            file_dict.insert("Length1".to_string(), ObjectSerializer::integer(font.font_data().len() as i64));
        }
        let program = self.stream(file_dict, font.font_data().to_vec());
        let cmap = self.stream(HashMap::new(), font.to_unicode_cmap().into_bytes());

        vec![
            (type0_id, type0),
            (cid_id, ObjectSerializer::dict(cid_entries)),
            (descriptor_id, descriptor),
            (file_id, program),
            (cmap_id, cmap),
        ]
    }
}

impl Default for PdfSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl FontSink for PdfSurface {
    fn register_font(&mut self, identifier: &str, path: &Path) -> Result<()> {
        if self.registered.contains(identifier) {
            return Ok(());
        }
        let font = EmbeddedFont::from_file(path, identifier)?;
        let resource = self.next_resource();
        log::debug!("Embedding font {} as {} ({})", identifier, resource, font.name);
        self.fonts.insert(
            identifier.to_string(),
            FontEntry {
                resource,
                program: FontProgram::Embedded(Box::new(font)),
            },
        );
        self.registered.insert(identifier.to_string());
        Ok(())
    }

    fn is_font_registered(&self, identifier: &str) -> bool {
        self.registered.contains(identifier) || metrics::is_base14(identifier)
    }

    fn registered_fonts(&self) -> BTreeSet<String> {
        self.registered.clone()
    }
}

impl Surface for PdfSurface {
    fn set_page_size(&mut self, width: f32, height: f32) {
        self.page_width = width;
        self.page_height = height;
        if let Some(page) = self.current.as_mut() {
            page.width = width;
            page.height = height;
        }
    }

    fn set_fill_color(&mut self, color: Color) {
        if self.output.is_some() {
            log::warn!("Ignoring fill color on a saved surface");
            return;
        }
        self.state.fill = color;
        self.page().content.fill_color(color);
    }

    fn set_stroke_color(&mut self, color: Color) {
        if self.output.is_some() {
            log::warn!("Ignoring stroke color on a saved surface");
            return;
        }
        self.state.stroke = color;
        self.page().content.stroke_color(color);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> Result<()> {
        self.ensure_open()?;
        self.page().content.fill_rect(x, y, width, height);
        Ok(())
    }

    fn set_font(&mut self, identifier: &str, size: f32) -> Result<()> {
        self.ensure_open()?;
        if !self.fonts.contains_key(identifier) {
            if !metrics::is_base14(identifier) {
                return Err(Error::Render(format!("font not registered: {}", identifier)));
            }
            let resource = self.next_resource();
            self.fonts.insert(
                identifier.to_string(),
                FontEntry {
                    resource,
                    program: FontProgram::Standard(identifier.to_string()),
                },
            );
        }
        self.state.font = identifier.to_string();
        self.state.font_size = size;
        Ok(())
    }

    fn draw_string(&mut self, x: f32, y: f32, text: &str, align: TextAlign) -> Result<()> {
        self.ensure_open()?;
        let identifier = self.state.font.clone();
        let size = self.state.font_size;
        if !self.fonts.contains_key(&identifier) {
            self.set_font(&identifier, size)?;
        }

        let width = self.text_width(text, &identifier, size);
        let start = align.start_x(x, width);

        let entry = self
            .fonts
            .get_mut(&identifier)
            .ok_or_else(|| Error::Render(format!("font not registered: {}", identifier)))?;
        let resource = entry.resource.clone();
        let encoded = match &mut entry.program {
            FontProgram::Standard(_) => Encoded::Bytes(metrics::encode_win_ansi(text)),
            FontProgram::Embedded(font) => Encoded::Hex(font.encode(text)?),
        };

        let page = self.page();
        match encoded {
            Encoded::Bytes(bytes) => page.content.text(&resource, size, start, y, bytes),
            Encoded::Hex(hex) => page.content.hex_text(&resource, size, start, y, hex),
        };
        page.fonts.insert(resource);
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
        self.ensure_open()?;
        if image.width() == 0 || image.height() == 0 {
            return Err(Error::Render("cannot draw an empty image".to_string()));
        }
        let resource = format!("Im{}", self.images.len() + 1);
        self.images.push(ImageData {
            resource: resource.clone(),
            width: image.width(),
            height: image.height(),
            pixels: image.as_raw().clone(),
        });
        let page = self.page();
        page.content.draw_image(&resource, x, y, width, height);
        page.images.insert(resource);
        Ok(())
    }

    fn save_state(&mut self) {
        if self.output.is_some() {
            return;
        }
        self.stack.push(self.state.clone());
        self.page().content.save_state();
    }

    fn restore_state(&mut self) {
        if self.output.is_some() {
            return;
        }
        match self.stack.pop() {
            Some(state) => {
                self.state = state;
                self.page().content.restore_state();
            },
            None => log::warn!("restore_state without matching save_state"),
        }
    }

    fn show_page(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.page();
        self.close_page();
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.close_page();
        if self.pages.is_empty() {
            self.pages.push(PageData::new(self.page_width, self.page_height));
        }

        let bytes = self.finish()?;
        if let Some(path) = &self.target {
            std::fs::write(path, &bytes)?;
            log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
        }
        self.output = Some(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn uncompressed() -> PdfSurface {
        PdfSurface::with_config(PdfConfig::default().with_compress(false))
    }

    fn text(surface: PdfSurface) -> String {
        String::from_utf8_lossy(&surface.into_bytes()).into_owned()
    }

    #[test]
    fn test_empty_document_has_one_page() {
        let mut surface = uncompressed();
        surface.save().unwrap();
        let pdf = text(surface);
        assert!(pdf.starts_with("%PDF-1.7\n"));
        assert!(pdf.contains("/Count 1"));
        assert!(pdf.ends_with("%%EOF"));
    }

    #[test]
    fn test_page_size_and_content() {
        let mut surface = uncompressed();
        surface.set_page_size(113.38583, 85.03937);
        surface.set_fill_color(Color::new(255, 0, 0));
        surface.fill_rect(0.0, 0.0, 10.0, 10.0).unwrap();
        surface.save().unwrap();

        let pdf = text(surface);
        assert!(pdf.contains("/MediaBox [0 0 113.38583 85.03937]"));
        assert!(pdf.contains("1 0 0 rg\n0 0 10 10 re\nf\n"));
    }

    #[test]
    fn test_standard_font_text() {
        let mut surface = uncompressed();
        surface.set_font("Courier", 10.0).unwrap();
        surface.draw_string(100.0, 50.0, "abcd", TextAlign::Right).unwrap();
        surface.save().unwrap();

        let pdf = text(surface);
        assert!(pdf.contains("/BaseFont /Courier"));
        assert!(pdf.contains("/F1 10 Tf"));
        // 4 chars * 600 / 1000 * 10 = 24pt wide
        assert!(pdf.contains("1 0 0 1 76 50 Tm"));
        assert!(pdf.contains("(abcd) Tj"));
    }

    #[test]
    fn test_unregistered_font_is_render_error() {
        let mut surface = uncompressed();
        let err = surface.set_font("MicrosoftYaHei-Bold", 10.0).unwrap_err();
        assert!(matches!(err, Error::Render(_)));
        assert!(surface.is_font_registered("Helvetica"));
        assert!(surface.registered_fonts().is_empty());
    }

    #[test]
    fn test_register_bad_font_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"garbage").unwrap();

        let mut surface = uncompressed();
        assert!(matches!(surface.register_font("Broken", &path), Err(Error::Font(_))));
        assert!(!surface.is_font_registered("Broken"));
    }

    #[test]
    fn test_show_page_starts_new_page() {
        let mut surface = uncompressed();
        surface.fill_rect(0.0, 0.0, 1.0, 1.0).unwrap();
        surface.show_page().unwrap();
        surface.set_page_size(100.0, 50.0);
        surface.fill_rect(0.0, 0.0, 1.0, 1.0).unwrap();
        assert_eq!(surface.page_count(), 2);
        surface.save().unwrap();

        let pdf = text(surface);
        assert!(pdf.contains("/Count 2"));
        assert!(pdf.contains("/MediaBox [0 0 100 50]"));
    }

    #[test]
    fn test_image_xobject() {
        let mut surface = uncompressed();
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([0, 0, 0]));
        surface.draw_image(&img, 5.0, 5.0, 20.0, 20.0).unwrap();
        surface.save().unwrap();

        let pdf = text(surface);
        assert!(pdf.contains("/Subtype /Image"));
        assert!(pdf.contains("/XObject << /Im1"));
        assert!(pdf.contains("20 0 0 20 5 5 cm\n/Im1 Do"));
    }

    #[test]
    fn test_empty_image_rejected() {
        let mut surface = uncompressed();
        let img = image::RgbImage::new(0, 0);
        assert!(matches!(surface.draw_image(&img, 0.0, 0.0, 1.0, 1.0), Err(Error::Render(_))));
    }

    #[test]
    fn test_drawing_after_save_fails() {
        let mut surface = uncompressed();
        surface.save().unwrap();
        assert!(surface.fill_rect(0.0, 0.0, 1.0, 1.0).is_err());
        assert!(surface.save().is_err());
    }

    #[test]
    fn test_state_stack() {
        let mut surface = uncompressed();
        surface.set_font("Times-Roman", 9.0).unwrap();
        surface.save_state();
        surface.set_font("Courier", 20.0).unwrap();
        surface.restore_state();
        surface.draw_string(0.0, 0.0, "x", TextAlign::Left).unwrap();
        surface.save().unwrap();

        let resources = surface.font_resources();
        let pdf = text(surface);
        let times = &resources["Times-Roman"];
        assert!(pdf.contains(&format!("/{} 9 Tf", times)));
    }

    #[test]
    fn test_compressed_streams() {
        let mut surface = PdfSurface::new();
        surface.fill_rect(0.0, 0.0, 1.0, 1.0).unwrap();
        surface.save().unwrap();
        assert!(text(surface).contains("/Filter /FlateDecode"));
    }

    #[test]
    fn test_info_dictionary() {
        let mut surface = PdfSurface::with_config(PdfConfig::default().with_title("Tags"));
        surface.save().unwrap();
        let pdf = text(surface);
        assert!(pdf.contains("/Title (Tags)"));
        assert!(pdf.contains("/Creator (labelgen)"));
        assert!(!pdf.contains("/CreationDate"));
    }

    #[test]
    fn test_creation_date_from_config() {
        let date = chrono::Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        let mut surface = PdfSurface::with_config(PdfConfig::default().with_creation_date(&date));
        surface.save().unwrap();
        assert!(text(surface).contains("/CreationDate (D:20240309140500)"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let render = || {
            let mut surface = PdfSurface::new();
            surface.set_page_size(113.38583, 85.03937);
            surface.set_font("Helvetica-Bold", 10.0).unwrap();
            surface.draw_string(45.0, 73.0, "Device", TextAlign::Left).unwrap();
            surface.save().unwrap();
            surface.into_bytes()
        };
        let first = render();
        std::thread::sleep(std::time::Duration::from_millis(1100));
        assert_eq!(first, render());
    }

    #[test]
    fn test_center_alignment_uses_font_metrics() {
        let mut surface = uncompressed();
        surface.set_font("Courier", 10.0).unwrap();
        surface.draw_string(100.0, 50.0, "abcd", TextAlign::Center).unwrap();
        surface.save().unwrap();
        // 24pt wide, centred on x = 100
        assert!(text(surface).contains("1 0 0 1 88 50 Tm"));
    }

    #[test]
    fn test_file_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        let mut surface = PdfSurface::to_file(&path, PdfConfig::default());
        surface.save().unwrap();
        assert_eq!(surface.target(), Some(path.as_path()));
        let written = std::fs::read(&path).unwrap();
        assert_eq!(Some(written.as_slice()), surface.bytes());
    }
}
