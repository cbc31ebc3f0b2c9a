//! Font style keywords and name normalization.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Words stripped from the end of a normalized name to obtain its family key.
const STYLE_WORDS: &[&str] = &[
    "bold", "italic", "oblique", "regular", "light", "medium", "black",
];

/// Requested font style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontStyle {
    /// No style requested
    #[default]
    Regular,
    /// Bold weight
    Bold,
    /// Italic slant
    Italic,
    /// Bold weight and italic slant
    BoldItalic,
}

impl FontStyle {
    /// Parse a style keyword, case-insensitively.
    ///
    /// Accepts `normal`/`regular`, `bold`, `italic` and `bold-italic`
    /// (also spelled `bolditalic` or `bold_italic`). Returns `None` for
    /// anything else.
    ///
    /// # Examples
    ///
    /// ```
    /// use labelgen::fonts::FontStyle;
    ///
    /// assert_eq!(FontStyle::parse("Bold"), Some(FontStyle::Bold));
    /// assert_eq!(FontStyle::parse("bold-italic"), Some(FontStyle::BoldItalic));
    /// assert_eq!(FontStyle::parse("heavy"), None);
    /// ```
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "" | "normal" | "regular" => Some(FontStyle::Regular),
            "bold" => Some(FontStyle::Bold),
            "italic" => Some(FontStyle::Italic),
            "bold-italic" | "bolditalic" | "bold_italic" | "bold italic" => {
                Some(FontStyle::BoldItalic)
            },
            _ => None,
        }
    }

    /// Suffix appended to a normalized name for the styled exact match.
    pub fn name_suffix(&self) -> Option<&'static str> {
        match self {
            FontStyle::Regular => None,
            FontStyle::Bold => Some("bold"),
            FontStyle::Italic => Some("italic"),
            FontStyle::BoldItalic => Some("bolditalic"),
        }
    }

    /// Suffix appended to a registration identifier.
    pub fn identifier_suffix(&self) -> &'static str {
        match self {
            FontStyle::Regular => "",
            FontStyle::Bold => "-Bold",
            FontStyle::Italic => "-Italic",
            FontStyle::BoldItalic => "-BoldItalic",
        }
    }

    /// Keyword form used in messages, `None` for [`FontStyle::Regular`].
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            FontStyle::Regular => None,
            FontStyle::Bold => Some("bold"),
            FontStyle::Italic => Some("italic"),
            FontStyle::BoldItalic => Some("bold-italic"),
        }
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword().unwrap_or("regular"))
    }
}

/// Lowercase a font name and strip its spaces.
///
/// # Examples
///
/// ```
/// use labelgen::fonts::normalize_name;
///
/// assert_eq!(normalize_name("Times New Roman"), "timesnewroman");
/// ```
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Family key of a normalized name: trailing style words and `-`/`_`
/// separators are stripped until none remain.
///
/// A name made only of style words keeps its original form so that it still
/// has a non-empty family.
pub fn family_key(normalized: &str) -> String {
    let mut key = normalized;
    loop {
        let trimmed = key.trim_end_matches(['-', '_']);
        let stripped = STYLE_WORDS
            .iter()
            .find_map(|word| trimmed.strip_suffix(word))
            .unwrap_or(trimmed);
        if stripped.len() == key.len() {
            break;
        }
        key = stripped;
    }

    let key = key.trim_end_matches(['-', '_']);
    if key.is_empty() {
        normalized.to_string()
    } else {
        key.to_string()
    }
}

/// Registration identifier for a font request: the requested name with
/// spaces removed plus the style suffix.
pub fn registration_identifier(name: &str, style: FontStyle) -> String {
    let mut id: String = name.chars().filter(|c| *c != ' ').collect();
    id.push_str(style.identifier_suffix());
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keywords() {
        assert_eq!(FontStyle::parse("normal"), Some(FontStyle::Regular));
        assert_eq!(FontStyle::parse(""), Some(FontStyle::Regular));
        assert_eq!(FontStyle::parse("ITALIC"), Some(FontStyle::Italic));
        assert_eq!(FontStyle::parse("BoldItalic"), Some(FontStyle::BoldItalic));
        assert_eq!(FontStyle::parse("semibold"), None);
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Microsoft YaHei"), "microsoftyahei");
        assert_eq!(normalize_name("DejaVuSans-Bold"), "dejavusans-bold");
    }

    #[test]
    fn test_family_key_strips_trailing_styles() {
        assert_eq!(family_key("dejavusans-bold"), "dejavusans");
        assert_eq!(family_key("dejavusans-boldoblique"), "dejavusans");
        assert_eq!(family_key("arialbolditalic"), "arial");
        assert_eq!(family_key("roboto_medium"), "roboto");
        assert_eq!(family_key("consola"), "consola");
    }

    #[test]
    fn test_family_key_keeps_inner_words() {
        // "black" in the middle of the name is not a style suffix
        assert_eq!(family_key("blackchancery"), "blackchancery");
    }

    #[test]
    fn test_family_key_all_style_words() {
        assert_eq!(family_key("bold"), "bold");
        assert_eq!(family_key("regular"), "regular");
    }

    #[test]
    fn test_registration_identifier() {
        assert_eq!(registration_identifier("Microsoft YaHei", FontStyle::Bold), "MicrosoftYaHei-Bold");
        assert_eq!(registration_identifier("Consolas", FontStyle::Regular), "Consolas");
        assert_eq!(
            registration_identifier("Arial", FontStyle::BoldItalic),
            "Arial-BoldItalic"
        );
    }
}
