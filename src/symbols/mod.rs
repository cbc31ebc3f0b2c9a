//! Barcode and QR code symbol generation.
//!
//! ## Supported Barcode Types
//!
//! ### 1D Barcodes (via `barcoders` crate)
//! - Code 128, Code 39, Code 93, Codabar
//! - EAN-13, EAN-8, UPC-A
//! - ITF (Interleaved 2 of 5)
//!
//! ### 2D Symbols
//! - Data Matrix (via `datamatrix` crate)
//! - QR Code (via `qrcode` crate, configurable error correction)

pub mod barcode;
pub mod qr;

pub use barcode::{BarcodeEncoder, BarcodeType, Drawable, EncodeOutcome, ModuleMatrix};
pub use qr::{ErrorCorrection, QrCodeGenerator, QrGenerator};
