//! End-to-end tests: decode an image file, convert it, export every encoding.

use std::sync::{Arc, Mutex};

use img2ascii::bitmap::{self, LoadError};
use img2ascii::{
    start_conversion, AsciiConverter, ConversionConfig, ConvertError, ExportError, ExportFormat,
    Session,
};
use tempfile::TempDir;

/// Writes a 16x8 horizontal gradient PNG and returns its path.
fn gradient_png(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("gradient.png");
    let img = image::RgbImage::from_fn(16, 8, |x, _| {
        let v = (x * 17) as u8;
        image::Rgb([v, v, v])
    });
    img.save(&path).unwrap();
    path
}

#[test]
fn test_load_and_convert_monochrome() {
    let dir = tempfile::tempdir().unwrap();
    let bitmap = bitmap::load(&gradient_png(&dir)).unwrap();
    assert_eq!(bitmap.dimensions(), (16, 8));

    let result = AsciiConverter::new(ConversionConfig::new(1, false))
        .spawn(bitmap)
        .wait()
        .unwrap();

    let lines: Vec<&str> = result.plain().lines().collect();
    assert_eq!(lines.len(), 8);
    // Left edge is black, right edge is nearly white.
    assert!(lines.iter().all(|l| l.starts_with('@')));
    assert!(lines.iter().all(|l| l.ends_with(' ')));
}

#[test]
fn test_color_exports_are_consistent() {
    let dir = tempfile::tempdir().unwrap();
    let bitmap = bitmap::load(&gradient_png(&dir)).unwrap();

    let mut session = Session::new();
    let result = AsciiConverter::new(ConversionConfig::new(1, true))
        .spawn(bitmap)
        .wait()
        .unwrap();
    session.complete(result);

    let plain_path = dir.path().join("out.txt");
    let html_path = dir.path().join("out.html");
    let ansi_path = dir.path().join("out.ans");
    session.export(ExportFormat::Plain, &plain_path).unwrap();
    session.export(ExportFormat::Html, &html_path).unwrap();
    session.export(ExportFormat::Ansi, &ansi_path).unwrap();

    // stride 7 over 16x8: 3 columns, 2 rows
    let plain = std::fs::read_to_string(plain_path).unwrap();
    assert_eq!(plain, "###\n###\n");

    let html = std::fs::read_to_string(html_path).unwrap();
    assert!(html.starts_with("<pre style='font-family: monospace; font-size:12px;'>"));
    assert!(html.ends_with("</pre>"));
    assert!(html.contains("<span style=\"color: rgb(0,0,0)\">#</span>"));
    assert!(html.contains("rgb(119,119,119)"));

    let ansi = std::fs::read_to_string(ansi_path).unwrap();
    assert!(ansi.starts_with("\x1b[38;2;0;0;0m#\x1b[0m"));
    assert!(ansi.contains("\x1b[38;2;238;238;238m#\x1b[0m"));
    assert!(!ansi.contains('<'));
}

#[test]
fn test_load_rejects_non_image() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.png");
    std::fs::write(&path, "not an image").unwrap();
    let err = bitmap::load(&path).unwrap_err();
    assert!(matches!(err, LoadError::Open { .. }));
}

#[test]
fn test_export_requires_conversion() {
    let dir = tempfile::tempdir().unwrap();
    let err = Session::new()
        .export(ExportFormat::Html, &dir.path().join("x.html"))
        .unwrap_err();
    assert!(matches!(err, ExportError::NothingToExport));
}

#[test]
fn test_callbacks_progress_then_single_completion() {
    let dir = tempfile::tempdir().unwrap();
    let bitmap = bitmap::load(&gradient_png(&dir)).unwrap();

    #[derive(Debug, PartialEq)]
    enum Seen {
        Progress(u8),
        Done(bool),
    }

    let log = Arc::new(Mutex::new(Vec::new()));
    let progress_log = Arc::clone(&log);
    let done_log = Arc::clone(&log);

    start_conversion(
        bitmap,
        ConversionConfig::new(2, false),
        move |p| progress_log.lock().unwrap().push(Seen::Progress(p)),
        move |r: Result<_, ConvertError>| done_log.lock().unwrap().push(Seen::Done(r.is_ok())),
    )
    .join()
    .unwrap();

    let log = log.lock().unwrap();
    assert_eq!(
        *log,
        vec![
            Seen::Progress(0),
            Seen::Progress(25),
            Seen::Progress(50),
            Seen::Progress(75),
            Seen::Done(true),
        ]
    );
}
