//! Filenames of well-known font families.
//!
//! Many platforms ship the regular, bold and italic faces of a family as
//! separate files with names that suffix matching cannot discover
//! (`consolab.ttf`, `msyhbd.ttc`). This table maps a normalized family name and
//! style to the expected filename.

use super::style::FontStyle;

/// File names for each style of a known family.
#[derive(Debug, Clone, Copy)]
pub struct KnownFamily {
    /// Normalized names that select this family
    pub names: &'static [&'static str],
    /// Regular face
    pub regular: &'static str,
    /// Bold face, if the family ships one
    pub bold: Option<&'static str>,
    /// Italic face, if the family ships one
    pub italic: Option<&'static str>,
    /// Bold italic face, if the family ships one
    pub bold_italic: Option<&'static str>,
}

impl KnownFamily {
    /// Filename for a style.
    pub fn file_for(&self, style: FontStyle) -> Option<&'static str> {
        match style {
            FontStyle::Regular => Some(self.regular),
            FontStyle::Bold => self.bold,
            FontStyle::Italic => self.italic,
            FontStyle::BoldItalic => self.bold_italic,
        }
    }
}

pub(crate) static KNOWN_FAMILIES: &[KnownFamily] = &[
    KnownFamily {
        names: &["microsoftyahei", "msyh"],
        regular: "msyh.ttc",
        bold: Some("msyhbd.ttc"),
        italic: None,
        bold_italic: None,
    },
    KnownFamily {
        names: &["consolas"],
        regular: "consola.ttf",
        bold: Some("consolab.ttf"),
        italic: Some("consolai.ttf"),
        bold_italic: Some("consolaz.ttf"),
    },
    KnownFamily {
        names: &["arial"],
        regular: "arial.ttf",
        bold: Some("arialbd.ttf"),
        italic: Some("ariali.ttf"),
        bold_italic: Some("arialbi.ttf"),
    },
    KnownFamily {
        names: &["timesnewroman"],
        regular: "times.ttf",
        bold: Some("timesbd.ttf"),
        italic: Some("timesi.ttf"),
        bold_italic: Some("timesbi.ttf"),
    },
    KnownFamily {
        names: &["couriernew"],
        regular: "cour.ttf",
        bold: Some("courbd.ttf"),
        italic: Some("couri.ttf"),
        bold_italic: Some("courbi.ttf"),
    },
    KnownFamily {
        names: &["simsun"],
        regular: "simsun.ttc",
        bold: None,
        italic: None,
        bold_italic: None,
    },
    KnownFamily {
        names: &["simhei"],
        regular: "simhei.ttf",
        bold: None,
        italic: None,
        bold_italic: None,
    },
];

/// Look up a family by normalized name.
pub fn family(normalized: &str) -> Option<&'static KnownFamily> {
    KNOWN_FAMILIES
        .iter()
        .find(|f| f.names.contains(&normalized))
}

/// Expected filename for a normalized family name and style.
///
/// # Examples
///
/// ```
/// use labelgen::fonts::{known, FontStyle};
///
/// assert_eq!(known::filename("consolas", FontStyle::Bold), Some("consolab.ttf"));
/// assert_eq!(known::filename("simhei", FontStyle::Italic), None);
/// ```
pub fn filename(normalized: &str, style: FontStyle) -> Option<&'static str> {
    family(normalized).and_then(|f| f.file_for(style))
}
