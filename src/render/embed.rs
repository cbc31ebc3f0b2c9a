//! Embedded TrueType/OpenType fonts.
//!
//! Fonts are embedded whole and addressed through Identity-H glyph ids.
//! Only the glyphs actually shown are listed in the `W` array and the
//! ToUnicode CMap.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use ttf_parser::{name_id, Face, GlyphId};

use super::object::Object;
use crate::error::{Error, Result};
use crate::fonts::sfnt;

/// A font file loaded for embedding.
#[derive(Debug, Clone)]
pub struct EmbeddedFont {
    /// PostScript name, or a name derived from the registration identifier
    pub name: String,
    data: Arc<Vec<u8>>,
    cff: bool,
    units_per_em: u16,
    /// Ascender in 1/1000 em
    pub ascent: i32,
    /// Descender in 1/1000 em (negative)
    pub descent: i32,
    /// Cap height in 1/1000 em
    pub cap_height: i32,
    /// Font bounding box (llx, lly, urx, ury) in 1/1000 em
    pub bbox: (i32, i32, i32, i32),
    /// Font descriptor flags
    pub flags: u32,
    /// Stem vertical width
    pub stem_v: i32,
    /// Italic angle in degrees
    pub italic_angle: f32,
    glyphs: HashMap<char, u16>,
    /// gid -> (first char shown with it, width)
    used: BTreeMap<u16, (char, u16)>,
}

impl EmbeddedFont {
    /// Load a font file. Collections contribute their first face.
    pub fn from_file(path: impl AsRef<Path>, fallback_name: &str) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        let data = if sfnt::is_collection(&data) {
            sfnt::extract_face(&data, 0)?
        } else {
            data
        };
        Self::from_data(data, fallback_name)
    }

    /// Load a font from raw single-face sfnt data.
    pub fn from_data(data: Vec<u8>, fallback_name: &str) -> Result<Self> {
        let face = Face::parse(&data, 0).map_err(|e| Error::Font(format!("Failed to parse font: {}", e)))?;

        let units_per_em = face.units_per_em().max(1);
        let scale = |v: i16| (v as i32) * 1000 / units_per_em as i32;

        let name = face
            .names()
            .into_iter()
            .filter(|n| n.name_id == name_id::POST_SCRIPT_NAME)
            .find_map(|n| n.to_string())
            .map(|n| sanitize_name(&n))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| sanitize_name(fallback_name));

        let bb = face.global_bounding_box();
        let ascent = scale(face.ascender());
        let descent = scale(face.descender());

        let mut flags = 1 << 5;
        if face.is_monospaced() {
            flags |= 1 << 0;
        }
        let italic = face.is_italic();
        if italic {
            flags |= 1 << 6;
        }

        let font = Self {
            name,
            cff: sfnt::is_cff(&data),
            units_per_em,
            ascent,
            descent,
            cap_height: face.capital_height().map(scale).unwrap_or(ascent),
            bbox: (scale(bb.x_min), scale(bb.y_min), scale(bb.x_max), scale(bb.y_max)),
            flags,
            stem_v: if face.is_bold() { 140 } else { 80 },
            italic_angle: if italic { -12.0 } else { 0.0 },
            glyphs: HashMap::new(),
            used: BTreeMap::new(),
            data: Arc::new(data),
        };
        log::debug!("Loaded font {} ({} bytes)", font.name, font.data.len());
        Ok(font)
    }

    fn face(&self) -> Result<Face<'_>> {
        Face::parse(&self.data, 0).map_err(|e| Error::Font(format!("Failed to parse font: {}", e)))
    }

    fn advance(&self, face: &Face<'_>, gid: u16) -> u16 {
        face.glyph_hor_advance(GlyphId(gid))
            .map(|adv| (adv as u32 * 1000 / self.units_per_em as u32) as u16)
            .unwrap_or(500)
    }

    /// Whether the outlines are CFF (embedded as `FontFile3`).
    pub fn is_cff(&self) -> bool {
        self.cff
    }

    /// Raw font program.
    pub fn font_data(&self) -> &[u8] {
        &self.data
    }

    /// Glyph id for a character, 0 (`.notdef`) when the font lacks it.
    pub fn glyph_id(&self, ch: char) -> u16 {
        if let Some(&gid) = self.glyphs.get(&ch) {
            return gid;
        }
        self.face()
            .ok()
            .and_then(|face| face.glyph_index(ch))
            .map(|g| g.0)
            .unwrap_or(0)
    }

    /// Width of `text` in points.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let face = match self.face() {
            Ok(face) => face,
            Err(_) => return 0.0,
        };
        let units: u32 = text
            .chars()
            .map(|ch| {
                let gid = face.glyph_index(ch).map(|g| g.0).unwrap_or(0);
                self.advance(&face, gid) as u32
            })
            .sum();
        units as f32 * size / 1000.0
    }

    /// Encode text as an Identity-H hex string and record the glyphs used.
    pub fn encode(&mut self, text: &str) -> Result<String> {
        let face = Face::parse(&self.data, 0).map_err(|e| Error::Font(format!("Failed to parse font: {}", e)))?;

        let mut hex = String::with_capacity(text.len() * 4 + 2);
        hex.push('<');
        for ch in text.chars() {
            let gid = match self.glyphs.get(&ch).copied() {
                Some(gid) => gid,
                None => {
                    let gid = face.glyph_index(ch).map(|g| g.0).unwrap_or(0);
                    self.glyphs.insert(ch, gid);
                    gid
                },
            };
            if !self.used.contains_key(&gid) {
                let width = self.advance(&face, gid);
                self.used.insert(gid, (ch, width));
            }
            hex.push_str(&format!("{:04X}", gid));
        }
        hex.push('>');
        Ok(hex)
    }

    /// Number of distinct glyphs shown so far.
    pub fn glyph_count(&self) -> usize {
        self.used.len()
    }

    /// The `W` array for the descendant CIDFont.
    pub fn widths_array(&self) -> Object {
        let widths: BTreeMap<u16, u16> = self.used.iter().map(|(&gid, &(_, w))| (gid, w)).collect();
        widths_array(&widths)
    }

    /// ToUnicode CMap program for the glyphs shown.
    pub fn to_unicode_cmap(&self) -> String {
        let mappings: Vec<(u16, u32)> = self.used.iter().map(|(&gid, &(ch, _))| (gid, ch as u32)).collect();
        to_unicode_cmap(&mappings)
    }
}

/// Strip characters that are not allowed in a BaseFont name.
fn sanitize_name(name: &str) -> String {
    name.chars().filter(|c| c.is_ascii_graphic() && !"()<>[]{}/%#".contains(*c)).collect()
}

/// Group consecutive glyph ids: `[gid [w w ...] gid [w ...]]`.
fn widths_array(widths: &BTreeMap<u16, u16>) -> Object {
    let mut result = Vec::new();
    let mut run: Vec<Object> = Vec::new();
    let mut start: Option<u16> = None;
    let mut prev = 0u16;

    for (&gid, &width) in widths {
        match start {
            Some(_) if gid == prev.wrapping_add(1) => {},
            Some(s) => {
                result.push(Object::Integer(s as i64));
                result.push(Object::Array(std::mem::take(&mut run)));
                start = Some(gid);
            },
            None => start = Some(gid),
        }
        run.push(Object::Integer(width as i64));
        prev = gid;
    }
    if let Some(s) = start {
        result.push(Object::Integer(s as i64));
        result.push(Object::Array(run));
    }
    Object::Array(result)
}

fn to_unicode_cmap(mappings: &[(u16, u32)]) -> String {
    let mut cmap = String::new();

    cmap.push_str("/CIDInit /ProcSet findresource begin\n");
    cmap.push_str("12 dict begin\n");
    cmap.push_str("begincmap\n");
    cmap.push_str("/CIDSystemInfo <<\n");
    cmap.push_str("  /Registry (Adobe)\n");
    cmap.push_str("  /Ordering (UCS)\n");
    cmap.push_str("  /Supplement 0\n");
    cmap.push_str(">> def\n");
    cmap.push_str("/CMapName /Adobe-Identity-UCS def\n");
    cmap.push_str("/CMapType 2 def\n");
    cmap.push_str("1 begincodespacerange\n");
    cmap.push_str("<0000> <FFFF>\n");
    cmap.push_str("endcodespacerange\n");

    // at most 100 entries per bfchar block
    for chunk in mappings.chunks(100) {
        cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for &(gid, unicode) in chunk {
            if unicode <= 0xFFFF {
                cmap.push_str(&format!("<{:04X}> <{:04X}>\n", gid, unicode));
            } else {
                let high = ((unicode - 0x10000) >> 10) + 0xD800;
                let low = ((unicode - 0x10000) & 0x3FF) + 0xDC00;
                cmap.push_str(&format!("<{:04X}> <{:04X}{:04X}>\n", gid, high, low));
            }
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str("endcmap\n");
    cmap.push_str("CMapName currentdict /CMap defineresource pop\n");
    cmap.push_str("end\n");
    cmap.push_str("end\n");
    cmap
}
