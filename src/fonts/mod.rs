//! Font discovery, resolution and registration.
//!
//! This module turns a human font request ("Microsoft YaHei", bold) into a
//! font file on disk and registers it with a renderer under a stable
//! identifier.

pub mod catalog;
pub mod known;
pub mod sfnt;
mod style;

pub use catalog::{system_font_dirs, FontCatalog, FontRecord};
pub use style::{family_key, normalize_name, registration_identifier, FontStyle};
