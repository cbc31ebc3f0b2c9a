//! Configuration for font discovery, PDF output and logging.
//!
//! Every struct deserializes from JSON with all fields optional, so a config
//! file only needs to name the values it changes.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Font catalog configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Scan the platform's default font directories.
    pub include_system_dirs: bool,
    /// Additional directories, scanned after the system ones.
    pub extra_dirs: Vec<PathBuf>,
    /// File extensions treated as fonts (without the dot).
    pub extensions: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            include_system_dirs: true,
            extra_dirs: Vec::new(),
            extensions: crate::fonts::catalog::DEFAULT_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

impl CatalogConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the system font directories.
    pub fn with_system_dirs(mut self, enable: bool) -> Self {
        self.include_system_dirs = enable;
        self
    }

    /// Add a directory to scan.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.extra_dirs.push(dir.into());
        self
    }
}

/// PDF output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// PDF version (e.g., "1.7")
    pub version: String,
    /// Document title
    pub title: Option<String>,
    /// Document author
    pub author: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Creator application
    pub creator: Option<String>,
    /// Whether to compress streams
    pub compress: bool,
    /// `/CreationDate` in PDF date form (`D:YYYYMMDDHHmmSS`); omitted when
    /// unset so repeated exports produce identical bytes
    pub creation_date: Option<String>,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            version: "1.7".to_string(),
            title: None,
            author: None,
            subject: None,
            creator: Some("labelgen".to_string()),
            compress: true,
            creation_date: None,
        }
    }
}

impl PdfConfig {
    /// Set document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set document author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set document subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Enable or disable stream compression.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Stamp the document with a creation date.
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use labelgen::PdfConfig;
    ///
    /// let date = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
    /// let config = PdfConfig::default().with_creation_date(&date);
    /// assert_eq!(config.creation_date.as_deref(), Some("D:20240309140500"));
    /// ```
    pub fn with_creation_date<Tz: chrono::TimeZone>(mut self, date: &chrono::DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        self.creation_date = Some(date.format("D:%Y%m%d%H%M%S").to_string());
        self
    }
}

/// Log file location.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogFile {
    /// Directory for the log file (created if missing)
    pub dir: PathBuf,
    /// File name; a timestamped name is generated when absent
    pub name: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Level filter (`debug`, `info`, `warn`, `error`, `off`)
    pub level: Option<String>,
    /// Optional file target; logs go to stderr when unset
    pub file: Option<LogFile>,
}

impl LogConfig {
    /// Set the level filter.
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Write logs into `dir` instead of stderr.
    pub fn with_file(mut self, dir: impl Into<PathBuf>, name: Option<String>) -> Self {
        self.file = Some(LogFile {
            dir: dir.into(),
            name,
        });
        self
    }
}

/// Load any configuration struct from a JSON file.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_defaults() {
        let config = PdfConfig::default();
        assert_eq!(config.version, "1.7");
        assert_eq!(config.creator.as_deref(), Some("labelgen"));
        assert!(config.compress);
    }

    #[test]
    fn test_pdf_builder() {
        let config = PdfConfig::default()
            .with_title("Asset tags")
            .with_author("IT")
            .with_compress(false);
        assert_eq!(config.title.as_deref(), Some("Asset tags"));
        assert_eq!(config.author.as_deref(), Some("IT"));
        assert!(!config.compress);
    }

    #[test]
    fn test_partial_json() {
        let config: CatalogConfig =
            serde_json::from_str(r#"{ "include_system_dirs": false }"#).unwrap();
        assert!(!config.include_system_dirs);
        assert_eq!(config.extensions, vec!["ttf", "ttc", "otf"]);
    }

    #[test]
    fn test_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.json");
        std::fs::write(&path, r#"{ "level": "debug", "file": { "dir": "logs" } }"#).unwrap();

        let config: LogConfig = load_json(&path).unwrap();
        assert_eq!(config.level.as_deref(), Some("debug"));
        let file = config.file.unwrap();
        assert_eq!(file.dir, PathBuf::from("logs"));
        assert_eq!(file.name, None);
    }

    #[test]
    fn test_load_json_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(load_json::<PdfConfig>(&path), Err(Error::Config(_))));
        assert!(matches!(
            load_json::<PdfConfig>(dir.path().join("missing.json")),
            Err(Error::Io(_))
        ));
    }
}
