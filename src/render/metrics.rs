//! Widths of the standard (base-14) PDF fonts.
//!
//! Values are advance widths in 1/1000 em for the printable ASCII range,
//! taken from the Adobe core font metrics. Oblique and italic faces reuse
//! the widths of their upright counterpart; characters outside the table
//! measure 500.

use crate::fonts::FontStyle;

/// Names of the fonts every PDF viewer provides.
pub const BASE14_FONTS: &[&str] = &[
    "Helvetica",
    "Helvetica-Bold",
    "Helvetica-Oblique",
    "Helvetica-BoldOblique",
    "Times-Roman",
    "Times-Bold",
    "Times-Italic",
    "Times-BoldItalic",
    "Courier",
    "Courier-Bold",
    "Courier-Oblique",
    "Courier-BoldOblique",
    "Symbol",
    "ZapfDingbats",
];

/// Font used when a requested font cannot be set.
pub const FALLBACK_FONT: &str = "Helvetica";

const DEFAULT_WIDTH: u16 = 500;

#[rustfmt::skip]
static HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
static HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[rustfmt::skip]
static TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

#[rustfmt::skip]
static TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

enum Widths {
    Table(&'static [u16; 95]),
    Monospace(u16),
    Uniform,
}

fn widths_for(font: &str) -> Option<Widths> {
    let widths = match font {
        "Helvetica" | "Helvetica-Oblique" => Widths::Table(&HELVETICA),
        "Helvetica-Bold" | "Helvetica-BoldOblique" => Widths::Table(&HELVETICA_BOLD),
        "Times-Roman" | "Times-Italic" => Widths::Table(&TIMES_ROMAN),
        "Times-Bold" | "Times-BoldItalic" => Widths::Table(&TIMES_BOLD),
        "Courier" | "Courier-Bold" | "Courier-Oblique" | "Courier-BoldOblique" => {
            Widths::Monospace(600)
        },
        "Symbol" | "ZapfDingbats" => Widths::Uniform,
        _ => return None,
    };
    Some(widths)
}

/// Whether `name` is one of the standard fonts.
pub fn is_base14(name: &str) -> bool {
    BASE14_FONTS.contains(&name)
}

/// The standard font for `name` in the given style.
///
/// `Helvetica`, `Courier` and `Times-Roman` (or `Times`) select their bold
/// and italic faces; any other standard name is returned unchanged, and
/// non-standard names give `None`.
pub fn standard_variant(name: &str, style: FontStyle) -> Option<&'static str> {
    let faces: [&'static str; 4] = match name {
        "Helvetica" => ["Helvetica", "Helvetica-Bold", "Helvetica-Oblique", "Helvetica-BoldOblique"],
        "Courier" => ["Courier", "Courier-Bold", "Courier-Oblique", "Courier-BoldOblique"],
        "Times-Roman" | "Times" => ["Times-Roman", "Times-Bold", "Times-Italic", "Times-BoldItalic"],
        _ => return BASE14_FONTS.iter().find(|f| **f == name).copied(),
    };
    let face = match style {
        FontStyle::Regular => faces[0],
        FontStyle::Bold => faces[1],
        FontStyle::Italic => faces[2],
        FontStyle::BoldItalic => faces[3],
    };
    Some(face)
}

/// Width of a character in 1/1000 em. Unknown fonts measure as Helvetica.
pub fn char_width(font: &str, ch: char) -> u16 {
    match widths_for(font).unwrap_or(Widths::Table(&HELVETICA)) {
        Widths::Table(table) => {
            let code = ch as u32;
            if (32..=126).contains(&code) {
                table[(code - 32) as usize]
            } else {
                DEFAULT_WIDTH
            }
        },
        Widths::Monospace(w) => w,
        Widths::Uniform => DEFAULT_WIDTH,
    }
}

/// Width of a string in points at the given size.
///
/// # Examples
///
/// ```
/// use labelgen::render::metrics::text_width;
///
/// assert_eq!(text_width("Courier", "abc", 10.0), 18.0);
/// ```
pub fn text_width(font: &str, text: &str, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| char_width(font, c) as u32).sum();
    units as f32 * size / 1000.0
}

/// Encode text for a standard font (WinAnsi subset). Characters outside
/// Latin-1 become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            code @ 0x20..=0x7E | code @ 0xA0..=0xFF => code as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base14_names() {
        assert!(is_base14("Helvetica"));
        assert!(is_base14("ZapfDingbats"));
        assert!(!is_base14("Arial"));
        assert_eq!(BASE14_FONTS.len(), 14);
    }

    #[test]
    fn test_standard_variant() {
        assert_eq!(standard_variant("Helvetica", FontStyle::Bold), Some("Helvetica-Bold"));
        assert_eq!(standard_variant("Times", FontStyle::BoldItalic), Some("Times-BoldItalic"));
        assert_eq!(standard_variant("Courier", FontStyle::Regular), Some("Courier"));
        assert_eq!(standard_variant("Symbol", FontStyle::Bold), Some("Symbol"));
        assert_eq!(standard_variant("Arial", FontStyle::Bold), None);
    }

    #[test]
    fn test_known_widths() {
        assert_eq!(char_width("Helvetica", ' '), 278);
        assert_eq!(char_width("Helvetica", 'W'), 944);
        assert_eq!(char_width("Helvetica-Bold", 'a'), 556);
        assert_eq!(char_width("Times-Roman", 'm'), 778);
        assert_eq!(char_width("Times-Bold", '%'), 1000);
        assert_eq!(char_width("Courier-Bold", 'i'), 600);
    }

    #[test]
    fn test_unknown_chars_and_fonts() {
        assert_eq!(char_width("Helvetica", '中'), 500);
        assert_eq!(char_width("Symbol", 'a'), 500);
        assert_eq!(char_width("NotAFont", 'W'), 944);
    }

    #[test]
    fn test_text_width() {
        // "Device" in Helvetica: 722 + 556 + 500 + 222 + 500 + 556
        let w = text_width("Helvetica", "Device", 10.0);
        assert!((w - 30.56).abs() < 1e-3);
        assert_eq!(text_width("Helvetica", "", 10.0), 0.0);
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(encode_win_ansi("A-1"), b"A-1".to_vec());
        assert_eq!(encode_win_ansi("é中"), vec![0xE9, b'?']);
    }
}
