//! Rendering: the drawing surface contract and its PDF implementation.

pub mod content;
pub mod embed;
pub mod metrics;
pub mod object;
mod pdf;
mod recording;
pub mod serializer;
mod surface;

pub use pdf::PdfSurface;
pub use recording::{RecordingSurface, SurfaceCall};
pub use surface::{FontSink, Surface, TextAlign};
