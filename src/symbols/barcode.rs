//! Barcode encoder adapter.
//!
//! Turns a symbology name and payload into something an element can paint.
//! One-dimensional symbologies come from `barcoders`, Data Matrix from
//! `datamatrix`. Failures are reported as [`EncodeOutcome`] variants rather
//! than errors so the caller can pick its fallback with a plain `match`.

use std::fmt;
use std::str::FromStr;

use barcoders::sym::codabar::Codabar;
use barcoders::sym::code128::Code128;
use barcoders::sym::code39::Code39;
use barcoders::sym::code93::Code93;
use barcoders::sym::ean13::EAN13;
use barcoders::sym::ean8::EAN8;
use barcoders::sym::tf::TF;
use datamatrix::{DataMatrix, SymbolList};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Supported symbologies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarcodeType {
    /// Code 39 (alphanumeric)
    Code39,
    /// Code 128 (character set B unless the data selects another)
    Code128,
    /// EAN-13 (12 digits, check digit computed)
    Ean13,
    /// EAN-8 (7 digits, check digit computed)
    Ean8,
    /// UPC-A, encoded as EAN-13 with a leading zero
    UpcA,
    /// ECC 200 Data Matrix
    DataMatrix,
    /// ITF - Interleaved 2 of 5 (numeric pairs)
    Itf,
    /// Code 93 (alphanumeric, compact)
    Code93,
    /// Codabar (numeric with special characters)
    Codabar,
}

impl BarcodeType {
    /// All symbologies, in a stable order.
    pub const ALL: [BarcodeType; 9] = [
        BarcodeType::Code39,
        BarcodeType::Code128,
        BarcodeType::Ean13,
        BarcodeType::Ean8,
        BarcodeType::UpcA,
        BarcodeType::DataMatrix,
        BarcodeType::Itf,
        BarcodeType::Code93,
        BarcodeType::Codabar,
    ];

    /// Parse a symbology name, ignoring case and `-`, `_` or spaces.
    pub fn parse(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL.into_iter().find(|t| t.name() == key)
    }

    /// Lowercase name as accepted by [`BarcodeType::parse`].
    pub fn name(self) -> &'static str {
        match self {
            BarcodeType::Code39 => "code39",
            BarcodeType::Code128 => "code128",
            BarcodeType::Ean13 => "ean13",
            BarcodeType::Ean8 => "ean8",
            BarcodeType::UpcA => "upca",
            BarcodeType::DataMatrix => "datamatrix",
            BarcodeType::Itf => "itf",
            BarcodeType::Code93 => "code93",
            BarcodeType::Codabar => "codabar",
        }
    }

    /// Whether the symbol is a 2D module matrix.
    pub fn is_matrix(self) -> bool {
        matches!(self, BarcodeType::DataMatrix)
    }
}

impl fmt::Display for BarcodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BarcodeType::Code39 => write!(f, "Code 39"),
            BarcodeType::Code128 => write!(f, "Code 128"),
            BarcodeType::Ean13 => write!(f, "EAN-13"),
            BarcodeType::Ean8 => write!(f, "EAN-8"),
            BarcodeType::UpcA => write!(f, "UPC-A"),
            BarcodeType::DataMatrix => write!(f, "Data Matrix"),
            BarcodeType::Itf => write!(f, "ITF"),
            BarcodeType::Code93 => write!(f, "Code 93"),
            BarcodeType::Codabar => write!(f, "Codabar"),
        }
    }
}

impl FromStr for BarcodeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| Error::Encoding(format!("unknown barcode type: {}", s)))
    }
}

/// Dark modules of a 2D symbol, row 0 at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMatrix {
    width: usize,
    height: usize,
    dark: Vec<bool>,
}

impl ModuleMatrix {
    /// Create an all-light matrix.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            dark: vec![false; width * height],
        }
    }

    /// Mark a module dark. Out-of-range coordinates are ignored.
    pub fn set_dark(&mut self, x: usize, y: usize) {
        if x < self.width && y < self.height {
            self.dark[y * self.width + x] = true;
        }
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.dark[y * self.width + x]
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Coordinates of all dark modules, row by row.
    pub fn dark_modules(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.is_dark(x, y))
    }
}

/// How an encoded symbol is painted.
#[derive(Debug, Clone, PartialEq)]
pub enum Drawable {
    /// Linear bars (1 = bar, 0 = space), scaled to the element width.
    DirectDraw(Vec<u8>),
    /// A module matrix scaled into the element's bounds.
    BoundedGraphic(ModuleMatrix),
    /// Literal text shown in place of the symbol.
    TextFallback(String),
}

/// Result of asking the adapter for a symbol.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodeOutcome {
    /// The data was encoded.
    Ok(Drawable),
    /// The symbology name is not supported.
    UnsupportedType(String),
    /// The encoder rejected the data.
    EncodingFailed(String),
}

/// Text drawn when a symbol cannot be produced.
pub fn fallback_text(data: &str) -> String {
    format!("BARCODE: {}", data)
}

impl EncodeOutcome {
    /// The drawable to paint, substituting the text fallback on failure.
    pub fn into_drawable(self, data: &str) -> Drawable {
        match self {
            EncodeOutcome::Ok(drawable) => drawable,
            EncodeOutcome::UnsupportedType(name) => {
                log::warn!("Barcode type not supported: {}, drawing text instead", name);
                Drawable::TextFallback(fallback_text(data))
            },
            EncodeOutcome::EncodingFailed(reason) => {
                log::error!("Failed to encode barcode: {}, drawing text instead", reason);
                Drawable::TextFallback(fallback_text(data))
            },
        }
    }
}

/// Adapter over the barcode libraries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BarcodeEncoder {
    unknown_as_code128: bool,
}

impl BarcodeEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode unknown symbology names as Code 128 (with a warning) instead
    /// of reporting [`EncodeOutcome::UnsupportedType`].
    pub fn with_unknown_as_code128(mut self, enable: bool) -> Self {
        self.unknown_as_code128 = enable;
        self
    }

    /// Encode `data` with the symbology called `type_name`.
    pub fn encode(&self, type_name: &str, data: &str) -> EncodeOutcome {
        let kind = match BarcodeType::parse(type_name) {
            Some(kind) => kind,
            None if self.unknown_as_code128 => {
                log::warn!("Unknown barcode type: {}, using default type code128", type_name);
                BarcodeType::Code128
            },
            None => return EncodeOutcome::UnsupportedType(type_name.to_string()),
        };

        match self.encode_type(kind, data) {
            Ok(drawable) => EncodeOutcome::Ok(drawable),
            Err(e) => EncodeOutcome::EncodingFailed(e.to_string()),
        }
    }

    /// Encode `data` as a known symbology.
    pub fn encode_type(&self, kind: BarcodeType, data: &str) -> Result<Drawable> {
        let bars = match kind {
            BarcodeType::Code128 => {
                // \u{00C0} = À - Character set A (uppercase, control chars)
                // \u{0181} = Ɓ - Character set B (alphanumeric, most common)
                // \u{0106} = Ć - Character set C (numeric pairs)
                let with_prefix = if data.starts_with('\u{00C0}')
                    || data.starts_with('\u{0181}')
                    || data.starts_with('\u{0106}')
                {
                    data.to_string()
                } else {
                    format!("\u{0181}{}", data)
                };
                Code128::new(&with_prefix)
                    .map_err(|e| Error::Encoding(format!("Code128 encoding error: {}", e)))?
                    .encode()
            },
            BarcodeType::Code39 => Code39::new(data)
                .map_err(|e| Error::Encoding(format!("Code39 encoding error: {}", e)))?
                .encode(),
            BarcodeType::Ean13 => EAN13::new(data)
                .map_err(|e| Error::Encoding(format!("EAN-13 encoding error: {}", e)))?
                .encode(),
            BarcodeType::Ean8 => EAN8::new(data)
                .map_err(|e| Error::Encoding(format!("EAN-8 encoding error: {}", e)))?
                .encode(),
            BarcodeType::UpcA => {
                // UPC-A is EAN-13 with leading 0; a trailing check digit is recomputed
                if !data.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(Error::Encoding("UPC-A requires digits only".to_string()));
                }
                let upc = match data.len() {
                    11 => format!("0{}", data),
                    12 => format!("0{}", &data[..11]),
                    _ => return Err(Error::Encoding("UPC-A requires 11 or 12 digits".to_string())),
                };
                EAN13::new(&upc)
                    .map_err(|e| Error::Encoding(format!("UPC-A encoding error: {}", e)))?
                    .encode()
            },
            BarcodeType::Itf => TF::interleaved(data)
                .map_err(|e| Error::Encoding(format!("ITF encoding error: {}", e)))?
                .encode(),
            BarcodeType::Code93 => Code93::new(data)
                .map_err(|e| Error::Encoding(format!("Code93 encoding error: {}", e)))?
                .encode(),
            BarcodeType::Codabar => Codabar::new(data)
                .map_err(|e| Error::Encoding(format!("Codabar encoding error: {}", e)))?
                .encode(),
            BarcodeType::DataMatrix => return encode_data_matrix(data).map(Drawable::BoundedGraphic),
        };
        log::debug!("Encoded {} barcode: {} modules", kind, bars.len());
        Ok(Drawable::DirectDraw(bars))
    }
}

fn encode_data_matrix(data: &str) -> Result<ModuleMatrix> {
    let code = DataMatrix::encode(data.as_bytes(), SymbolList::default())
        .map_err(|e| Error::Encoding(format!("Data Matrix encoding error: {:?}", e)))?;
    let bitmap = code.bitmap();
    let mut matrix = ModuleMatrix::new(bitmap.width(), bitmap.height());
    for (x, y) in bitmap.pixels() {
        matrix.set_dark(x, y);
    }
    log::debug!("Encoded Data Matrix: {}x{} modules", matrix.width(), matrix.height());
    Ok(matrix)
}

/// Runs of consecutive bars as `(start_module, module_count)`.
pub fn bar_runs(bars: &[u8]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, &bar) in bars.iter().enumerate() {
        match (bar != 0, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push((s, i - s));
                start = None;
            },
            _ => {},
        }
    }
    if let Some(s) = start {
        runs.push((s, bars.len() - s));
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!(BarcodeType::parse("code128"), Some(BarcodeType::Code128));
        assert_eq!(BarcodeType::parse("CODE39"), Some(BarcodeType::Code39));
        assert_eq!(BarcodeType::parse("EAN-13"), Some(BarcodeType::Ean13));
        assert_eq!(BarcodeType::parse("upc_a"), Some(BarcodeType::UpcA));
        assert_eq!(BarcodeType::parse("DataMatrix"), Some(BarcodeType::DataMatrix));
        assert_eq!(BarcodeType::parse("foo123"), None);
        assert!("qr".parse::<BarcodeType>().is_err());
    }

    #[test]
    fn test_names_round_trip() {
        for kind in BarcodeType::ALL {
            assert_eq!(BarcodeType::parse(kind.name()), Some(kind));
        }
    }

    #[test]
    fn test_code128_default_data() {
        let outcome = BarcodeEncoder::new().encode("code128", "1234567890");
        match outcome {
            EncodeOutcome::Ok(Drawable::DirectDraw(bars)) => {
                assert!(!bars.is_empty());
                assert_eq!(bars[0], 1);
            },
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_code39() {
        let outcome = BarcodeEncoder::new().encode("code39", "ABC123");
        assert!(matches!(outcome, EncodeOutcome::Ok(Drawable::DirectDraw(_))));
    }

    #[test]
    fn test_unknown_type_is_unsupported() {
        let outcome = BarcodeEncoder::new().encode("foo123", "42");
        assert_eq!(outcome, EncodeOutcome::UnsupportedType("foo123".to_string()));
        assert_eq!(
            outcome.into_drawable("42"),
            Drawable::TextFallback("BARCODE: 42".to_string())
        );
    }

    #[test]
    fn test_unknown_type_as_code128() {
        let encoder = BarcodeEncoder::new().with_unknown_as_code128(true);
        assert_eq!(
            encoder.encode("foo123", "42"),
            encoder.encode("code128", "42")
        );
    }

    #[test]
    fn test_rejected_data() {
        let outcome = BarcodeEncoder::new().encode("ean13", "not digits");
        assert!(matches!(outcome, EncodeOutcome::EncodingFailed(_)));
        assert!(matches!(
            BarcodeEncoder::new().encode_type(BarcodeType::UpcA, "123"),
            Err(Error::Encoding(_))
        ));
    }

    #[test]
    fn test_data_matrix() {
        match BarcodeEncoder::new().encode("datamatrix", "Hello") {
            EncodeOutcome::Ok(Drawable::BoundedGraphic(matrix)) => {
                assert!(matrix.width() >= 10);
                assert!(matrix.height() >= 10);
                assert!(matrix.dark_modules().count() > 0);
            },
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_module_matrix() {
        let mut matrix = ModuleMatrix::new(3, 2);
        matrix.set_dark(2, 1);
        matrix.set_dark(5, 5);
        assert!(matrix.is_dark(2, 1));
        assert!(!matrix.is_dark(0, 0));
        assert_eq!(matrix.dark_modules().collect::<Vec<_>>(), vec![(2, 1)]);
    }

    #[test]
    fn test_bar_runs() {
        assert_eq!(bar_runs(&[1, 1, 0, 1, 0, 0, 1, 1, 1]), vec![(0, 2), (3, 1), (6, 3)]);
        assert!(bar_runs(&[0, 0]).is_empty());
        assert!(bar_runs(&[]).is_empty());
    }
}
