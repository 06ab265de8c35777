//! Browser-backed tests; these need a local Chrome/Chromium.

#![cfg(feature = "cdp")]

use html2slide::{
    render_slide, CaptureConfig, CdpCapturer, Capturer, Error, FitMode, Outcome, PngWriter, SlideConfig, SlideJob,
    Viewport,
};
use std::path::PathBuf;
use tempfile::TempDir;

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Deck</title></head>
<body style="margin:0;background:#ffffff">
<div id="chart" style="width:200px;height:120px;background:#cc0000"></div>
<div id="hidden" style="display:none">nothing here</div>
<p style="margin:0;height:900px">Tall body so the full page exceeds the viewport.</p>
<div id="footer" style="width:320px;height:80px;background:#0033cc"></div>
</body>
</html>"#;

fn write_page(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("deck.html");
    std::fs::write(&path, PAGE).unwrap();
    path
}

fn small_capture() -> CaptureConfig {
    CaptureConfig {
        viewport: Viewport { width: 320, height: 180 },
        wait_secs: 0.1,
        timeout_ms: 2000,
        ..Default::default()
    }
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_selector_capture_uses_scale_factor() {
    let dir = TempDir::new().unwrap();
    let html = write_page(&dir);
    let cfg = CaptureConfig { selector: Some("#chart".into()), ..small_capture() };

    let mut capturer = CdpCapturer::new();
    let img = capturer.capture(&html, &cfg).expect("capture");
    assert_eq!((img.width(), img.height()), (400, 240));
    let px = img.pixels.get_pixel(200, 120);
    assert!(px[0] > 180 && px[1] < 60, "expected red element, got {:?}", px);
    capturer.close().unwrap();
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_full_page_capture_includes_content_below_viewport() {
    let dir = TempDir::new().unwrap();
    let html = write_page(&dir);

    let mut capturer = CdpCapturer::new();
    let img = capturer.capture(&html, &small_capture()).expect("capture");

    // 120 + 900 + 80 CSS px tall at 2x, against a 180px viewport
    assert!(img.height() >= 2000, "page clipped to {}px", img.height());
    let px = img.pixels.get_pixel(200, 2120);
    assert!(
        px[2] > 180 && px[0] < 40,
        "expected the footer block below the viewport, got {:?}",
        px
    );
    capturer.close().unwrap();
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_missing_selector_is_capture_error() {
    let dir = TempDir::new().unwrap();
    let html = write_page(&dir);
    let cfg = CaptureConfig { selector: Some("#does-not-exist".into()), ..small_capture() };

    let mut capturer = CdpCapturer::new();
    let err = capturer.capture(&html, &cfg).unwrap_err();
    assert!(matches!(err, Error::CaptureError(_)));
    assert!(err.to_string().contains("#does-not-exist"));
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_hidden_selector_is_invalid_capture() {
    let dir = TempDir::new().unwrap();
    let html = write_page(&dir);
    let job = SlideJob {
        output_root: dir.path().join("output"),
        slide: SlideConfig { width: 320, height: 180, ..Default::default() },
        capture: CaptureConfig { selector: Some("#hidden".into()), ..small_capture() },
        ..SlideJob::new(html)
    };

    let mut capturer = CdpCapturer::new();
    let mut writer = PngWriter::new();
    let err = render_slide(&mut capturer, &mut writer, &job).unwrap_err();
    assert!(matches!(err, Error::InvalidCaptureError { .. }));
    assert!(!job.output_path().exists());
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_full_page_slide_written() {
    let dir = TempDir::new().unwrap();
    let html = write_page(&dir);
    let job = SlideJob {
        output_root: dir.path().join("output"),
        slide: SlideConfig { width: 320, height: 180, mode: FitMode::Fill, ..Default::default() },
        capture: CaptureConfig { zoom: 1.25, ..small_capture() },
        ..SlideJob::new(html)
    };

    let mut capturer = CdpCapturer::new();
    let mut writer = PngWriter::new();
    let outcome = render_slide(&mut capturer, &mut writer, &job).expect("render");
    let Outcome::Written(path) = outcome else {
        panic!("expected a written slide");
    };

    let png = std::fs::read(&path).unwrap();
    assert_eq!(&png[0..8], b"\x89PNG\r\n\x1a\n");
    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (320, 180));
    capturer.close().unwrap();
}
