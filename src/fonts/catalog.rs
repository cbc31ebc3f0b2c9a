//! Font discovery and resolution.
//!
//! A [`FontCatalog`] indexes font files found under a set of directories and
//! maps a human font request (family name plus style) onto one of them. The
//! catalog is an ordinary value: construct one per process and share it behind
//! an `Arc`, or build isolated catalogs in tests. All state sits behind a single
//! read-mostly lock, so lookups from several exports can run concurrently while
//! directory scans take the write side.
//!
//! # Lookup order
//!
//! 1. Known-family table (`consolas` + bold → `consolab.ttf`)
//! 2. Styled exact match (`{name}bold`, `{name}italic`, `{name}bolditalic`)
//! 3. Bare exact match
//! 4. Substring match; the shortest key wins, ties broken lexicographically
//! 5. Family match, preferring a member whose key contains the style
//! 6. [`Error::FontNotFound`]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;

use super::known;
use super::style::{family_key, normalize_name, registration_identifier, FontStyle};
use crate::config::CatalogConfig;
use crate::error::{Error, Result};
use crate::render::FontSink;

/// Extensions picked up by a directory scan.
pub const DEFAULT_EXTENSIONS: &[&str] = &["ttf", "ttc", "otf"];

/// A font file discovered during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontRecord {
    /// Normalized lookup key (file stem, lowercase, spaces removed)
    pub key: String,
    /// File stem as found on disk
    pub name: String,
    /// Family key the record is grouped under
    pub family: String,
    /// Full path to the font file
    pub path: PathBuf,
    registered: bool,
}

impl FontRecord {
    /// Whether the font has been registered with a renderer.
    pub fn is_registered(&self) -> bool {
        self.registered
    }
}

#[derive(Debug, Default)]
struct CatalogState {
    /// Normalized name -> record, in discovery order
    fonts: IndexMap<String, FontRecord>,
    /// Family key -> member keys, in discovery order
    by_family: IndexMap<String, Vec<String>>,
    /// Lowercase file name -> path, first found wins
    files_by_name: HashMap<String, PathBuf>,
    /// Scanned directories, in scan order
    directories: Vec<PathBuf>,
}

/// Index of installed font files.
#[derive(Debug)]
pub struct FontCatalog {
    state: RwLock<CatalogState>,
    extensions: Vec<String>,
}

impl Default for FontCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl FontCatalog {
    /// Create an empty catalog with no directories.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CatalogState::default()),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Create a catalog and scan the platform's default font directories.
    pub fn with_system_fonts() -> Self {
        let catalog = Self::new();
        catalog.initialize(system_font_dirs());
        catalog
    }

    /// Build a catalog from configuration.
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        if config.extensions.is_empty() {
            return Err(Error::Config("font extension list is empty".to_string()));
        }
        let catalog = Self {
            state: RwLock::new(CatalogState::default()),
            extensions: config
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        };

        let mut dirs = Vec::new();
        if config.include_system_dirs {
            dirs.extend(system_font_dirs());
        }
        dirs.extend(config.extra_dirs.iter().cloned());
        catalog.initialize(dirs);
        Ok(catalog)
    }

    /// Scan each existing directory in order. Directories already scanned are
    /// skipped.
    pub fn initialize<I, P>(&self, directories: I)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let dirs: Vec<PathBuf> = directories
            .into_iter()
            .map(|d| d.as_ref().to_path_buf())
            .collect();
        log::info!("Font directories: {:?}", dirs);

        for dir in &dirs {
            self.add_font_directory(dir);
        }
        log::info!("Font scanning complete. Found {} fonts.", self.font_count());
    }

    /// Append a directory to the scan list and scan it immediately.
    ///
    /// Returns `false` when the directory does not exist or was already
    /// scanned. Records already in the catalog are never replaced.
    pub fn add_font_directory(&self, directory: impl AsRef<Path>) -> bool {
        let directory = directory.as_ref();
        if !directory.is_dir() {
            log::debug!("Skipping missing font directory: {}", directory.display());
            return false;
        }

        let mut state = self.write();
        if state.directories.iter().any(|d| d == directory) {
            return false;
        }
        state.directories.push(directory.to_path_buf());

        let before = state.fonts.len();
        self.scan_directory(&mut state, directory);
        log::info!(
            "Added font directory: {} ({} new fonts)",
            directory.display(),
            state.fonts.len() - before
        );
        true
    }

    /// Recursive scan; entries are visited in file-name order so that the
    /// first-found rule is reproducible.
    fn scan_directory(&self, state: &mut CatalogState, directory: &Path) {
        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Error scanning directory {}: {}", directory.display(), e);
                return;
            },
        };

        let mut entries: Vec<_> = entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Error reading entry in {}: {}", directory.display(), e);
                    None
                },
            })
            .collect();
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            let path = entry.path();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if is_dir {
                self.scan_directory(state, &path);
            } else if self.has_font_extension(&path) && path.is_file() {
                Self::record_font(state, path);
            }
        }
    }

    fn has_font_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                let e = e.to_ascii_lowercase();
                self.extensions.iter().any(|x| *x == e)
            })
            .unwrap_or(false)
    }

    fn record_font(state: &mut CatalogState, path: PathBuf) {
        let (Some(stem), Some(file_name)) = (
            path.file_stem().and_then(|s| s.to_str()),
            path.file_name().and_then(|s| s.to_str()),
        ) else {
            log::warn!("Error processing font file {}: non UTF-8 name", path.display());
            return;
        };

        state
            .files_by_name
            .entry(file_name.to_lowercase())
            .or_insert_with(|| path.clone());

        let key = normalize_name(stem);
        if state.fonts.contains_key(&key) {
            return;
        }

        let family = family_key(&key);
        state
            .by_family
            .entry(family.clone())
            .or_default()
            .push(key.clone());
        state.fonts.insert(
            key.clone(),
            FontRecord {
                key,
                name: stem.to_string(),
                family,
                path,
                registered: false,
            },
        );
    }

    /// Resolve a font request to a file path.
    ///
    /// Returns [`Error::FontNotFound`] when every lookup step misses.
    pub fn resolve(&self, font_name: &str, style: FontStyle) -> Result<PathBuf> {
        let normalized = normalize_name(font_name);
        log::debug!("Searching for font: {} ({})", font_name, style);

        let state = self.read();

        if let Some(path) = known::filename(&normalized, style)
            .and_then(|file| state.files_by_name.get(&file.to_lowercase()))
        {
            log::debug!("Found known-family file: {}", path.display());
            return Ok(path.clone());
        }

        if let Some(suffix) = style.name_suffix() {
            let styled = format!("{}{}", normalized, suffix);
            if let Some(record) = state.fonts.get(&styled) {
                log::debug!("Found styled font: {}", styled);
                return Ok(record.path.clone());
            }
        }

        if let Some(record) = state.fonts.get(&normalized) {
            log::debug!("Found basic font: {}", normalized);
            return Ok(record.path.clone());
        }

        if !normalized.is_empty() {
            let fuzzy = state
                .fonts
                .values()
                .filter(|r| r.key.contains(&normalized))
                .min_by(|a, b| {
                    a.key
                        .len()
                        .cmp(&b.key.len())
                        .then_with(|| a.key.cmp(&b.key))
                });
            if let Some(record) = fuzzy {
                log::debug!("Found font by fuzzy match: {}", record.key);
                return Ok(record.path.clone());
            }
        }

        // family keys are prefixes of their member keys, so the substring
        // match above answers first for any query that names a family
        if let Some(members) = state.by_family.get(&normalized) {
            let styled = style
                .name_suffix()
                .and_then(|s| members.iter().find(|key| key.contains(s)));
            if let Some(key) = styled.or_else(|| members.first()) {
                if let Some(record) = state.fonts.get(key) {
                    log::debug!("Found font in family: {}", key);
                    return Ok(record.path.clone());
                }
            }
        }

        log::warn!("Font not found after all search methods: {} ({})", font_name, style);
        Err(Error::FontNotFound {
            name: font_name.to_string(),
            style: style.keyword().map(str::to_string),
        })
    }

    /// Direct filename lookup against the known-family table, checked on disk
    /// in every scanned directory. Does not consult the record cache.
    pub fn find_known_file(&self, font_name: &str, style: FontStyle) -> Option<PathBuf> {
        let file = known::filename(&normalize_name(font_name), style)?;
        self.read()
            .directories
            .iter()
            .map(|dir| dir.join(file))
            .find(|path| path.is_file())
    }

    /// Resolve a font and register it with the sink.
    ///
    /// Returns the registration identifier (`"MicrosoftYaHei-Bold"`), or
    /// `None` when no font file could be found or loaded. Registering the
    /// same request twice is a no-op for the sink.
    pub fn register<S: FontSink + ?Sized>(
        &self,
        font_name: &str,
        style: FontStyle,
        sink: &mut S,
    ) -> Option<String> {
        let identifier = registration_identifier(font_name, style);

        let path = match self.resolve(font_name, style) {
            Ok(path) => path,
            Err(_) => {
                log::info!("Attempting direct registration for {}", font_name);
                if sink.is_font_registered(&identifier) {
                    log::debug!("Font already registered: {}", identifier);
                    return Some(identifier);
                }
                match self.find_known_file(font_name, style) {
                    Some(path) => path,
                    None => {
                        log::warn!("Font not found: {} ({})", font_name, style);
                        return None;
                    },
                }
            },
        };

        if !sink.is_font_registered(&identifier) {
            if let Err(e) = sink.register_font(&identifier, &path) {
                log::warn!("Failed to register font {}: {}", font_name, e);
                return None;
            }
            log::debug!("Registered font: {}, path: {}", identifier, path.display());
            self.mark_registered(&path);
        }
        Some(identifier)
    }

    fn mark_registered(&self, path: &Path) {
        let mut state = self.write();
        if let Some(record) = state.fonts.values_mut().find(|r| r.path == path) {
            record.registered = true;
        }
    }

    /// All normalized font names, sorted.
    pub fn list_available_fonts(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().fonts.keys().cloned().collect();
        names.sort();
        names
    }

    /// Identifiers registered with a sink, sorted.
    pub fn list_registered_fonts<S: FontSink + ?Sized>(&self, sink: &S) -> Vec<String> {
        sink.registered_fonts().into_iter().collect()
    }

    /// Scanned directories, in scan order.
    pub fn directories(&self) -> Vec<PathBuf> {
        self.read().directories.clone()
    }

    /// Number of indexed fonts.
    pub fn font_count(&self) -> usize {
        self.read().fonts.len()
    }

    /// Record for a font name (normalized before lookup).
    pub fn record(&self, font_name: &str) -> Option<FontRecord> {
        self.read().fonts.get(&normalize_name(font_name)).cloned()
    }

    /// Member keys of a family, in discovery order.
    pub fn family_members(&self, family: &str) -> Vec<String> {
        self.read()
            .by_family
            .get(&normalize_name(family))
            .cloned()
            .unwrap_or_default()
    }

    fn read(&self) -> RwLockReadGuard<'_, CatalogState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, CatalogState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Default font directories for the current platform that exist on disk.
pub fn system_font_dirs() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();

    if cfg!(target_os = "windows") {
        let windir = std::env::var_os("WINDIR").unwrap_or_else(|| "C:\\Windows".into());
        dirs.push(PathBuf::from(windir).join("Fonts"));
        let program_files =
            std::env::var_os("PROGRAMFILES").unwrap_or_else(|| "C:\\Program Files".into());
        dirs.push(
            PathBuf::from(program_files)
                .join("Microsoft Office")
                .join("Root")
                .join("Fonts"),
        );
    } else if cfg!(target_os = "macos") {
        dirs.push(PathBuf::from("/System/Library/Fonts"));
        dirs.push(PathBuf::from("/Library/Fonts"));
        if let Some(home) = std::env::var_os("HOME") {
            dirs.push(PathBuf::from(home).join("Library").join("Fonts"));
        }
    } else {
        dirs.push(PathBuf::from("/usr/share/fonts"));
        dirs.push(PathBuf::from("/usr/local/share/fonts"));
        if let Some(home) = std::env::var_os("HOME") {
            dirs.push(PathBuf::from(home).join(".fonts"));
        }
    }

    dirs.retain(|d| d.is_dir());
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    /// Sink that only records registrations.
    #[derive(Default)]
    struct CountingSink {
        registered: Vec<(String, PathBuf)>,
        fail: bool,
    }

    impl FontSink for CountingSink {
        fn register_font(&mut self, identifier: &str, path: &Path) -> Result<()> {
            if self.fail {
                return Err(Error::Font("unparseable".to_string()));
            }
            self.registered.push((identifier.to_string(), path.to_path_buf()));
            Ok(())
        }

        fn is_font_registered(&self, identifier: &str) -> bool {
            self.registered.iter().any(|(id, _)| id == identifier)
        }

        fn registered_fonts(&self) -> BTreeSet<String> {
            self.registered.iter().map(|(id, _)| id.clone()).collect()
        }
    }

    fn font_dir(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for f in files {
            let path = dir.path().join(f);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, b"fake font").unwrap();
        }
        dir
    }

    fn catalog_for(dir: &TempDir) -> FontCatalog {
        let catalog = FontCatalog::new();
        assert!(catalog.add_font_directory(dir.path()));
        catalog
    }

    fn file_name(path: &Path) -> String {
        path.file_name().unwrap().to_string_lossy().into_owned()
    }

    #[test]
    fn test_scan_indexes_fonts_recursively() {
        let dir = font_dir(&["DejaVu Sans.ttf", "sub/Roboto-Bold.otf", "readme.txt", "x.TTC"]);
        let catalog = catalog_for(&dir);

        assert_eq!(
            catalog.list_available_fonts(),
            vec!["dejavusans", "roboto-bold", "x"]
        );
        let record = catalog.record("DejaVu Sans").unwrap();
        assert_eq!(record.name, "DejaVu Sans");
        assert_eq!(record.family, "dejavusans");
        assert!(!record.is_registered());
        assert_eq!(catalog.family_members("roboto"), vec!["roboto-bold"]);
    }

    #[test]
    fn test_known_family_bold() {
        let dir = font_dir(&["consola.ttf", "consolab.ttf", "consolai.ttf"]);
        let catalog = catalog_for(&dir);

        let path = catalog.resolve("Consolas", FontStyle::Bold).unwrap();
        assert_eq!(file_name(&path), "consolab.ttf");
        let path = catalog.resolve("Consolas", FontStyle::Regular).unwrap();
        assert_eq!(file_name(&path), "consola.ttf");
    }

    #[test]
    fn test_known_family_in_subdirectory() {
        let dir = font_dir(&["microsoft/msyhbd.ttc", "microsoft/msyh.ttc"]);
        let catalog = catalog_for(&dir);
        let path = catalog.resolve("Microsoft YaHei", FontStyle::Bold).unwrap();
        assert_eq!(file_name(&path), "msyhbd.ttc");
    }

    #[test]
    fn test_styled_then_bare_match() {
        let dir = font_dir(&["acme.ttf", "acmebold.ttf"]);
        let catalog = catalog_for(&dir);

        let path = catalog.resolve("Acme", FontStyle::Bold).unwrap();
        assert_eq!(file_name(&path), "acmebold.ttf");
        // Missing italic falls back to the bare name
        let path = catalog.resolve("Acme", FontStyle::Italic).unwrap();
        assert_eq!(file_name(&path), "acme.ttf");
    }

    #[test]
    fn test_fuzzy_tie_break_shortest_then_lexicographic() {
        let dir = font_dir(&["zfoosans.ttf", "afoosans.ttf", "foosanscondensed.ttf"]);
        let catalog = catalog_for(&dir);

        let path = catalog.resolve("foo sans", FontStyle::Regular).unwrap();
        assert_eq!(file_name(&path), "afoosans.ttf");
    }

    #[test]
    fn test_not_found() {
        let dir = font_dir(&["acme.ttf"]);
        let catalog = catalog_for(&dir);

        let err = catalog.resolve("NoSuchFont123", FontStyle::Regular).unwrap_err();
        assert!(matches!(err, Error::FontNotFound { ref name, style: None } if name == "NoSuchFont123"));
    }

    #[test]
    fn test_first_found_wins_across_directories() {
        let first = font_dir(&["Acme.ttf"]);
        let second = font_dir(&["acme.ttf", "other.ttf"]);
        let catalog = FontCatalog::new();
        catalog.initialize([first.path(), second.path()]);

        assert_eq!(catalog.font_count(), 2);
        let path = catalog.resolve("acme", FontStyle::Regular).unwrap();
        assert!(path.starts_with(first.path()));
        assert_eq!(catalog.directories().len(), 2);
    }

    #[test]
    fn test_add_directory_rejects_missing_and_duplicates() {
        let dir = font_dir(&["acme.ttf"]);
        let catalog = catalog_for(&dir);

        assert!(!catalog.add_font_directory(dir.path()));
        assert!(!catalog.add_font_directory(dir.path().join("missing")));
        assert_eq!(catalog.directories(), vec![dir.path().to_path_buf()]);
    }

    #[test]
    fn test_register_is_idempotent() {
        let dir = font_dir(&["arial.ttf", "arialbd.ttf"]);
        let catalog = catalog_for(&dir);
        let mut sink = CountingSink::default();

        let first = catalog.register("Arial", FontStyle::Bold, &mut sink);
        let second = catalog.register("Arial", FontStyle::Bold, &mut sink);
        assert_eq!(first.as_deref(), Some("Arial-Bold"));
        assert_eq!(first, second);
        assert_eq!(sink.registered.len(), 1);
        assert_eq!(file_name(&sink.registered[0].1), "arialbd.ttf");
        assert!(catalog.record("arialbd").unwrap().is_registered());
        assert_eq!(catalog.list_registered_fonts(&sink), vec!["Arial-Bold"]);
    }

    #[test]
    fn test_register_unknown_font_returns_none() {
        let dir = font_dir(&["acme.ttf"]);
        let catalog = catalog_for(&dir);
        let mut sink = CountingSink::default();

        assert_eq!(catalog.register("NoSuchFont123", FontStyle::Regular, &mut sink), None);
        assert!(sink.registered.is_empty());
    }

    #[test]
    fn test_register_failure_returns_none() {
        let dir = font_dir(&["acme.ttf"]);
        let catalog = catalog_for(&dir);
        let mut sink = CountingSink {
            fail: true,
            ..Default::default()
        };

        assert_eq!(catalog.register("Acme", FontStyle::Regular, &mut sink), None);
    }

    #[test]
    fn test_direct_known_file_fallback() {
        let dir = TempDir::new().unwrap();
        let catalog = catalog_for(&dir);
        // Installed after the scan, so only the on-disk lookup can find it
        fs::write(dir.path().join("simhei.ttf"), b"fake font").unwrap();

        assert!(catalog.resolve("SimHei", FontStyle::Regular).is_err());
        let mut sink = CountingSink::default();
        assert_eq!(
            catalog.register("SimHei", FontStyle::Regular, &mut sink).as_deref(),
            Some("SimHei")
        );
        assert_eq!(sink.registered.len(), 1);
    }

    #[test]
    fn test_from_config_rejects_empty_extensions() {
        let config = CatalogConfig {
            include_system_dirs: false,
            extra_dirs: Vec::new(),
            extensions: Vec::new(),
        };
        assert!(matches!(FontCatalog::from_config(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_from_config_custom_extensions() {
        let dir = font_dir(&["acme.ttf", "acme2.woff"]);
        let config = CatalogConfig {
            include_system_dirs: false,
            extra_dirs: vec![dir.path().to_path_buf()],
            extensions: vec![".WOFF".to_string()],
        };
        let catalog = FontCatalog::from_config(&config).unwrap();
        assert_eq!(catalog.list_available_fonts(), vec!["acme2"]);
    }
}
