//! End-to-end export through the recording and PDF surfaces.

use std::sync::Arc;

use chrono::TimeZone;

use labelgen::elements::{Barcode, QrCode, Text};
use labelgen::render::SurfaceCall;
use labelgen::symbols::{ErrorCorrection, ModuleMatrix, QrGenerator};
use labelgen::{
    Color, Document, Error, FontStyle, Page, PdfConfig, RecordingSurface, RenderContext, Result,
    TextAlign,
};

fn device_label() -> Document {
    let mut page = Page::with_size_mm(40.0, 30.0);
    page.set_background_color("#FFFFFF").unwrap();

    let mut qr = QrCode::new();
    qr.set_location(0.0, 0.0).set_size(40.0, 40.0).set_data("ABC123");
    page.add_element(qr);

    let mut text = Text::new();
    text.set_location(45.0, 12.0)
        .set_text("Device")
        .set_font("Helvetica", 10.0, FontStyle::Bold);
    page.add_element(text);

    let mut document = Document::new();
    document.add_page(page);
    document
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.01
}

#[test]
fn test_device_label_paint_order() {
    let document = device_label();
    let mut surface = RecordingSurface::new();
    document
        .export(&mut surface, &RenderContext::default())
        .unwrap();

    let calls = &surface.calls;
    let page_size = calls
        .iter()
        .filter_map(|c| match c {
            SurfaceCall::PageSize { width, height } => Some((*width, *height)),
            _ => None,
        })
        .last()
        .unwrap();
    assert!(close(page_size.0, 113.39));
    assert!(close(page_size.1, 85.04));

    let background = calls
        .iter()
        .position(|c| matches!(c, SurfaceCall::FillRect { .. }))
        .unwrap();
    let image = calls
        .iter()
        .position(|c| matches!(c, SurfaceCall::DrawImage { .. }))
        .unwrap();
    let string = calls
        .iter()
        .position(|c| matches!(c, SurfaceCall::DrawString { .. }))
        .unwrap();
    assert!(background < image && image < string);
    assert_eq!(calls[background - 1], SurfaceCall::FillColor(Color::WHITE));

    match &calls[image] {
        SurfaceCall::DrawImage {
            x,
            y,
            width,
            height,
            pixels,
        } => {
            assert_eq!(*x, 0.0);
            assert!(close(*y, 85.04 - 40.0));
            assert_eq!((*width, *height), (40.0, 40.0));
            assert_eq!(*pixels, (21, 21));
        },
        other => panic!("unexpected call {:?}", other),
    }

    match &calls[string] {
        SurfaceCall::DrawString { x, y, text, align } => {
            assert_eq!(*x, 45.0);
            assert!(close(*y, 85.04 - 12.0));
            assert_eq!(text, "Device");
            assert_eq!(*align, TextAlign::Left);
        },
        other => panic!("unexpected call {:?}", other),
    }
    assert!(calls.contains(&SurfaceCall::SetFont {
        identifier: "Helvetica-Bold".to_string(),
        size: 10.0
    }));

    let tail: Vec<_> = calls.iter().rev().take(2).collect();
    assert_eq!(tail, vec![&SurfaceCall::Save, &SurfaceCall::ShowPage]);
}

#[test]
fn test_every_element_is_bracketed_by_state() {
    let document = device_label();
    let mut surface = RecordingSurface::new();
    document
        .export(&mut surface, &RenderContext::default())
        .unwrap();

    let saves = surface
        .calls
        .iter()
        .filter(|c| **c == SurfaceCall::SaveState)
        .count();
    let restores = surface
        .calls
        .iter()
        .filter(|c| **c == SurfaceCall::RestoreState)
        .count();
    assert_eq!(saves, 2);
    assert_eq!(restores, 2);
}

#[test]
fn test_export_twice_is_identical() {
    let document = device_label();
    let ctx = RenderContext::default();

    let mut first = RecordingSurface::new();
    document.export(&mut first, &ctx).unwrap();
    let mut second = RecordingSurface::new();
    document.export(&mut second, &ctx).unwrap();

    assert_eq!(first.calls, second.calls);
    assert_eq!(document.pages()[0].elements()[1].location().y, 12.0);
}

#[test]
fn test_pdf_bytes_stable_across_exports() {
    let document = device_label();
    let ctx = RenderContext::default();

    let first = document.to_pdf_bytes(&ctx).unwrap();
    // crosses a one-second boundary so any wall-clock stamp would differ
    std::thread::sleep(std::time::Duration::from_millis(1100));
    let second = document.to_pdf_bytes(&ctx).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_pinned_creation_date_is_written() {
    let mut document = device_label();
    let date = chrono::Utc
        .with_ymd_and_hms(2026, 1, 31, 8, 30, 0)
        .unwrap();
    document.set_pdf_config(
        PdfConfig::default()
            .with_compress(false)
            .with_creation_date(&date),
    );
    let ctx = RenderContext::default();

    let first = document.to_pdf_bytes(&ctx).unwrap();
    let second = document.to_pdf_bytes(&ctx).unwrap();
    assert_eq!(first, second);
    assert!(String::from_utf8_lossy(&first).contains("/CreationDate (D:20260131083000)"));
}

struct FailingQr;

impl QrGenerator for FailingQr {
    fn generate(&self, _data: &str, _level: ErrorCorrection) -> Result<ModuleMatrix> {
        Err(Error::Encoding("generator offline".to_string()))
    }
}

#[test]
fn test_failed_draw_propagates_and_restores_state() {
    let document = device_label();
    let ctx = RenderContext::default().with_qr_generator(Arc::new(FailingQr));
    let mut surface = RecordingSurface::new();

    let err = document.export(&mut surface, &ctx).unwrap_err();
    assert!(matches!(err, Error::Encoding(_)));
    assert_eq!(surface.calls.last(), Some(&SurfaceCall::RestoreState));
    assert!(!surface.is_saved());

    let elements = document.pages()[0].elements();
    assert_eq!(elements[0].location().y, 0.0);
    assert_eq!(elements[1].location().y, 12.0);
}

#[test]
fn test_pdf_output_structure() {
    let mut document = device_label();
    document.set_pdf_config(
        PdfConfig::default()
            .with_compress(false)
            .with_title("Device label"),
    );
    let pdf = document.to_pdf_bytes(&RenderContext::default()).unwrap();
    let pdf = String::from_utf8_lossy(&pdf);

    assert!(pdf.starts_with("%PDF-1.7"));
    assert!(pdf.contains("/Type /Catalog"));
    assert!(pdf.contains("/Count 1"));
    assert!(pdf.contains("/MediaBox [0 0 113.3"));
    assert!(pdf.contains("/BaseFont /Helvetica-Bold"));
    assert!(pdf.contains("/Subtype /Image"));
    assert!(pdf.contains("(Device) Tj"));
    assert!(pdf.contains("/Title (Device label)"));
    assert!(pdf.contains("xref"));
    assert!(pdf.trim_end().ends_with("%%EOF"));
}

#[test]
fn test_multi_page_pdf() {
    let mut document = Document::with_page_size_mm(50.0, 25.0);
    for serial in ["SN-001", "SN-002", "SN-003"] {
        let page = document.new_page();
        let mut barcode = Barcode::new();
        barcode
            .set_location(5.0, 5.0)
            .set_size(120.0, 40.0)
            .set_data(serial)
            .show_text_bottom();
        page.add_element(barcode);
    }

    let pdf = document
        .to_pdf_bytes(&RenderContext::default())
        .unwrap();
    let pdf = String::from_utf8_lossy(&pdf);
    assert!(pdf.contains("/Count 3"));
}

#[test]
fn test_export_pdf_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out/device.pdf");

    let written = device_label()
        .export_pdf(&path, &RenderContext::default())
        .unwrap();
    assert_eq!(written, path);
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
}
