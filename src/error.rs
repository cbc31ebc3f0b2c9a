//! Error types for label composition and export.
//!
//! Resolution failures (`FontNotFound`) and barcode encoding failures are
//! normally absorbed by the element that hit them and replaced by a visible
//! fallback; everything else propagates to the caller of `Document::export`.

/// Result type alias for label operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building or exporting labels.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed color input (bad hex string or out-of-range channel)
    #[error("Invalid color format: {0}")]
    InvalidColorFormat(String),

    /// The font resolver exhausted every lookup strategy
    #[error("Font not found: {name}{}", style.as_ref().map(|s| format!(" ({})", s)).unwrap_or_default())]
    FontNotFound {
        /// Requested font name
        name: String,
        /// Requested style keyword, if any
        style: Option<String>,
    },

    /// Barcode or QR collaborator rejected the data
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Underlying draw call failed
    #[error("Render failure: {0}")]
    Render(String),

    /// Font file could not be parsed or embedded
    #[error("Font error: {0}")]
    Font(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
