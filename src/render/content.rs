//! PDF content stream builder.
//!
//! Collects graphics and text operators for one page and writes them out in
//! content stream syntax.

use std::io::{self, Write};

use super::serializer::{write_escaped, write_name};
use crate::color::Color;

/// Operations that can be added to a content stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentStreamOp {
    /// Save graphics state (q)
    SaveState,
    /// Restore graphics state (Q)
    RestoreState,
    /// Set transformation matrix (cm)
    Transform(f32, f32, f32, f32, f32, f32),
    /// Begin text object (BT)
    BeginText,
    /// End text object (ET)
    EndText,
    /// Set font resource and size (Tf)
    SetFont(String, f32),
    /// Set text matrix (Tm)
    SetTextMatrix(f32, f32, f32, f32, f32, f32),
    /// Show a single-byte encoded string (Tj)
    ShowText(Vec<u8>),
    /// Show a hex string already formatted as `<XXXX...>` (Tj)
    ShowHexText(String),
    /// Set fill color RGB (rg)
    SetFillColorRGB(f32, f32, f32),
    /// Set stroke color RGB (RG)
    SetStrokeColorRGB(f32, f32, f32),
    /// Append a rectangle to the path (re)
    Rectangle(f32, f32, f32, f32),
    /// Fill the path, nonzero winding (f)
    Fill,
    /// Paint an XObject (Do)
    PaintXObject(String),
}

/// Builder for PDF content streams.
#[derive(Debug, Default, Clone)]
pub struct ContentStreamBuilder {
    operations: Vec<ContentStreamOp>,
}

impl ContentStreamBuilder {
    /// Create a new content stream builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an operation to the stream.
    pub fn op(&mut self, op: ContentStreamOp) -> &mut Self {
        self.operations.push(op);
        self
    }

    /// Operations added so far.
    pub fn operations(&self) -> &[ContentStreamOp] {
        &self.operations
    }

    /// Whether nothing has been painted.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Save graphics state.
    pub fn save_state(&mut self) -> &mut Self {
        self.op(ContentStreamOp::SaveState)
    }

    /// Restore graphics state.
    pub fn restore_state(&mut self) -> &mut Self {
        self.op(ContentStreamOp::RestoreState)
    }

    /// Set fill color.
    pub fn fill_color(&mut self, color: Color) -> &mut Self {
        let (r, g, b) = color.as_unit_floats();
        self.op(ContentStreamOp::SetFillColorRGB(r, g, b))
    }

    /// Set stroke color.
    pub fn stroke_color(&mut self, color: Color) -> &mut Self {
        let (r, g, b) = color.as_unit_floats();
        self.op(ContentStreamOp::SetStrokeColorRGB(r, g, b))
    }

    /// Fill a rectangle with the current fill color.
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        self.op(ContentStreamOp::Rectangle(x, y, width, height))
            .op(ContentStreamOp::Fill)
    }

    /// Show single-byte text with its baseline origin at `(x, y)`.
    pub fn text(&mut self, resource: &str, size: f32, x: f32, y: f32, text: Vec<u8>) -> &mut Self {
        self.op(ContentStreamOp::BeginText)
            .op(ContentStreamOp::SetFont(resource.to_string(), size))
            .op(ContentStreamOp::SetTextMatrix(1.0, 0.0, 0.0, 1.0, x, y))
            .op(ContentStreamOp::ShowText(text))
            .op(ContentStreamOp::EndText)
    }

    /// Show glyph-id encoded text (composite fonts).
    pub fn hex_text(&mut self, resource: &str, size: f32, x: f32, y: f32, hex: String) -> &mut Self {
        self.op(ContentStreamOp::BeginText)
            .op(ContentStreamOp::SetFont(resource.to_string(), size))
            .op(ContentStreamOp::SetTextMatrix(1.0, 0.0, 0.0, 1.0, x, y))
            .op(ContentStreamOp::ShowHexText(hex))
            .op(ContentStreamOp::EndText)
    }

    /// Paint an image XObject scaled into the given box.
    pub fn draw_image(&mut self, resource: &str, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        self.save_state()
            .op(ContentStreamOp::Transform(width, 0.0, 0.0, height, x, y))
            .op(ContentStreamOp::PaintXObject(resource.to_string()))
            .restore_state()
    }

    /// Build the content stream to bytes.
    pub fn build(&self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        for op in &self.operations {
            write_op(&mut buf, op)?;
            writeln!(buf)?;
        }
        Ok(buf)
    }
}

fn write_op<W: Write>(w: &mut W, op: &ContentStreamOp) -> io::Result<()> {
    match op {
        ContentStreamOp::SaveState => write!(w, "q"),
        ContentStreamOp::RestoreState => write!(w, "Q"),
        ContentStreamOp::Transform(a, b, c, d, e, f) => {
            write!(w, "{} {} {} {} {} {} cm", a, b, c, d, e, f)
        },
        ContentStreamOp::BeginText => write!(w, "BT"),
        ContentStreamOp::EndText => write!(w, "ET"),
        ContentStreamOp::SetFont(name, size) => {
            write_name(w, name)?;
            write!(w, " {} Tf", size)
        },
        ContentStreamOp::SetTextMatrix(a, b, c, d, e, f) => {
            write!(w, "{} {} {} {} {} {} Tm", a, b, c, d, e, f)
        },
        ContentStreamOp::ShowText(text) => {
            write!(w, "(")?;
            write_escaped(w, text)?;
            write!(w, ") Tj")
        },
        ContentStreamOp::ShowHexText(hex) => write!(w, "{} Tj", hex),
        ContentStreamOp::SetFillColorRGB(r, g, b) => write!(w, "{} {} {} rg", r, g, b),
        ContentStreamOp::SetStrokeColorRGB(r, g, b) => write!(w, "{} {} {} RG", r, g, b),
        ContentStreamOp::Rectangle(x, y, w_val, h) => write!(w, "{} {} {} {} re", x, y, w_val, h),
        ContentStreamOp::Fill => write!(w, "f"),
        ContentStreamOp::PaintXObject(name) => {
            write_name(w, name)?;
            write!(w, " Do")
        },
    }
}
