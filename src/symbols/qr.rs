//! QR code generation.

use qrcode::{EcLevel, QrCode};
use serde::{Deserialize, Serialize};

use super::barcode::ModuleMatrix;
use crate::error::{Error, Result};

/// QR code error correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCorrection {
    /// Low (~7% correction capability)
    Low,
    /// Medium (~15% correction capability)
    #[default]
    Medium,
    /// Quartile (~25% correction capability)
    Quartile,
    /// High (~30% correction capability)
    High,
}

impl ErrorCorrection {
    /// Approximate fraction of codewords that can be restored.
    pub fn recovery_fraction(self) -> f32 {
        match self {
            ErrorCorrection::Low => 0.07,
            ErrorCorrection::Medium => 0.15,
            ErrorCorrection::Quartile => 0.25,
            ErrorCorrection::High => 0.30,
        }
    }

    fn ec_level(self) -> EcLevel {
        match self {
            ErrorCorrection::Low => EcLevel::L,
            ErrorCorrection::Medium => EcLevel::M,
            ErrorCorrection::Quartile => EcLevel::Q,
            ErrorCorrection::High => EcLevel::H,
        }
    }
}

/// Produces QR module matrices.
///
/// The matrix has no quiet zone; one entry per module.
pub trait QrGenerator: Send + Sync {
    fn generate(&self, data: &str, level: ErrorCorrection) -> Result<ModuleMatrix>;
}

/// [`QrGenerator`] backed by the `qrcode` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrCodeGenerator;

impl QrGenerator for QrCodeGenerator {
    fn generate(&self, data: &str, level: ErrorCorrection) -> Result<ModuleMatrix> {
        let code = QrCode::with_error_correction_level(data, level.ec_level())
            .map_err(|e| Error::Encoding(format!("QR code encoding error: {}", e)))?;

        let width = code.width();
        let mut matrix = ModuleMatrix::new(width, width);
        for (i, module) in code.to_colors().iter().enumerate() {
            if *module == qrcode::Color::Dark {
                matrix.set_dark(i % width, i / width);
            }
        }
        log::debug!("Generated QR code: {} modules per side, level {:?}", width, level);
        Ok(matrix)
    }
}
