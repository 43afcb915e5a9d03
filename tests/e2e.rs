//! End-to-end tests for mus2pdf.
//!
//! The PDF stage is driven through a recording [`PdfEngine`] fake, so these
//! tests run without weasyprint installed. One test at the bottom uses the
//! real `CommandEngine` and is skipped unless `E2E_ENABLED` is set.
//!
//! Run with:
//!   cargo test --test e2e -- --nocapture

use mus2pdf::{
    convert, convert_to_html, convert_with_engine, parse_file, ConversionConfig, Document,
    ErrorKind, MusError, Notation, PdfEngine, SectionKind, StylePalette,
};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

// ── Test helpers ─────────────────────────────────────────────────────────────

const LYRICS: &str = "# Test Song\nVerse\n[C]Hello [G]world\nChorus\n[F]La la\n";
const CHART: &str =
    "Título: Mi Canción\nEstructura:\nA B A\nDefiniciones:\nA = I IV V\nB = ii V\n";
const FAKE_PDF: &[u8] = b"%PDF-1.7\n% fake\n%%EOF\n";

/// Records what it was asked to render and returns a fixed PDF.
#[derive(Default)]
struct RecordingEngine {
    calls: RefCell<Vec<(String, PathBuf)>>,
}

impl PdfEngine for RecordingEngine {
    fn render(&self, html: &str, base_url: &Path) -> Result<Vec<u8>, MusError> {
        self.calls
            .borrow_mut()
            .push((html.to_string(), base_url.to_path_buf()));
        Ok(FAKE_PDF.to_vec())
    }
}

impl RecordingEngine {
    fn only_call(&self) -> (String, PathBuf) {
        let calls = self.calls.borrow();
        assert_eq!(calls.len(), 1, "expected exactly one render call");
        calls[0].clone()
    }
}

fn write_input(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path
}

fn write_chord_images(dir: &Path, names: &[&str]) {
    let folder = dir.join("imagenes");
    std::fs::create_dir_all(&folder).unwrap();
    for name in names {
        std::fs::write(folder.join(name), format!("<svg id=\"{name}\"/>")).unwrap();
    }
}

// ── Lyrics sheets ────────────────────────────────────────────────────────────

#[test]
fn lyrics_sheet_to_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "song.mus", LYRICS);
    let output = dir.path().join("song.pdf");
    let engine = RecordingEngine::default();

    let out = convert_with_engine(&input, &output, &ConversionConfig::default(), &engine)
        .expect("conversion should succeed");

    assert_eq!(std::fs::read(&output).unwrap(), FAKE_PDF);
    assert_eq!(out.pdf_bytes, FAKE_PDF.len());
    assert!(out.debug_html.is_none());

    let Document::Lyrics(song) = &out.document else {
        panic!("expected lyrics sheet, got {:?}", out.document);
    };
    assert_eq!(song.title, "Test Song");
    assert_eq!(song.sections.len(), 2);
    assert_eq!(song.sections[0].kind, SectionKind::Verse);
    assert_eq!(song.sections[0].lines, vec!["[C]Hello [G]world".to_string()]);
    assert_eq!(song.sections[1].kind, SectionKind::Chorus);
    assert_eq!(song.sections[1].lines, vec!["[F]La la".to_string()]);

    let (html, base) = engine.only_call();
    assert_eq!(out.html_len, html.len());
    assert_eq!(base, dir.path());
    assert!(html.contains("<h1>Test Song</h1>"));
    assert!(html.contains("<span class=\"chords\">[F]La la</span>"));
}

#[test]
fn custom_palette_and_css_reach_the_html() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "song.mus", LYRICS);
    let config = ConversionConfig::builder()
        .style(StylePalette {
            chord_color: "#123456".into(),
            ..StylePalette::default()
        })
        .custom_css("body { font-size: 14pt; }")
        .build()
        .unwrap();

    let html = convert_to_html(&input, &config).unwrap();
    assert!(html.contains("color: #123456"));
    assert!(html.contains("body { font-size: 14pt; }"));
}

// ── Chord charts ─────────────────────────────────────────────────────────────

#[test]
fn chord_chart_to_pdf() {
    let dir = tempfile::tempdir().unwrap();
    write_chord_images(dir.path(), &["I.svg", "IV.svg", "V.svg", "ii.svg", "palos.svg"]);
    let input = write_input(dir.path(), "chart.mus", CHART);
    let output = dir.path().join("chart.pdf");
    let engine = RecordingEngine::default();

    let out =
        convert_with_engine(&input, &output, &ConversionConfig::default(), &engine).unwrap();

    let Document::Chart(chart) = &out.document else {
        panic!("expected chord chart, got {:?}", out.document);
    };
    let progression: Vec<(String, Vec<String>)> = chart
        .progression()
        .into_iter()
        .map(|e| (e.name, e.chords))
        .collect();
    let t = |s: &str| s.split_whitespace().map(String::from).collect::<Vec<_>>();
    assert_eq!(
        progression,
        vec![
            ("A".to_string(), t("I IV V")),
            ("B".to_string(), t("ii V")),
            ("A".to_string(), t("I IV V")),
        ]
    );

    let (html, _) = engine.only_call();
    assert!(html.contains("<h1>Mi Canción</h1>"));
    assert_eq!(html.matches("class=\"chord-svg\"").count(), 8);
    assert_eq!(html.matches("class=\"separator-svg\"").count(), 5);
    assert!(html.contains("src=\"imagenes/ii.svg\""));
}

#[test]
fn embedded_images_do_not_depend_on_base_url() {
    let dir = tempfile::tempdir().unwrap();
    write_chord_images(dir.path(), &["I.svg", "IV.svg", "V.svg", "ii.svg", "palos.svg"]);
    let input = write_input(dir.path(), "chart.mus", CHART);
    let config = ConversionConfig::builder().embed_images(true).build().unwrap();

    let html = convert_to_html(&input, &config).unwrap();
    assert!(!html.contains("imagenes/"));
    assert_eq!(html.matches("src=\"data:image/svg+xml;base64,").count(), 13);
}

#[test]
fn embedding_with_missing_image_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    write_chord_images(dir.path(), &["I.svg"]);
    let input = write_input(dir.path(), "chart.mus", CHART);
    let config = ConversionConfig::builder().embed_images(true).build().unwrap();

    let err = convert_to_html(&input, &config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn explicit_base_url_is_passed_to_engine() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "chart.mus", CHART);
    let assets = tempfile::tempdir().unwrap();
    let config = ConversionConfig::builder()
        .base_url(assets.path())
        .build()
        .unwrap();
    let engine = RecordingEngine::default();

    convert_with_engine(&input, dir.path().join("c.pdf"), &config, &engine).unwrap();
    assert_eq!(engine.only_call().1, assets.path());
}

// ── Debug HTML ───────────────────────────────────────────────────────────────

#[test]
fn debug_html_written_only_when_enabled() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "song.mus", LYRICS);
    let debug_path = dir.path().join("debug.html");
    let engine = RecordingEngine::default();

    convert_with_engine(&input, dir.path().join("a.pdf"), &ConversionConfig::default(), &engine)
        .unwrap();
    assert!(!debug_path.exists());

    let config = ConversionConfig::builder().emit_debug_html(true).build().unwrap();
    let out = convert_with_engine(&input, dir.path().join("b.pdf"), &config, &engine).unwrap();
    assert_eq!(out.debug_html.as_deref(), Some(debug_path.as_path()));
    let written = std::fs::read_to_string(&debug_path).unwrap();
    assert_eq!(written, engine.calls.borrow()[1].0);
}

// ── Errors ───────────────────────────────────────────────────────────────────

#[test]
fn unwritable_output_is_render_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "song.mus", LYRICS);
    let output = dir.path().join("missing-dir").join("song.pdf");

    let err = convert_with_engine(
        &input,
        &output,
        &ConversionConfig::default(),
        &RecordingEngine::default(),
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Render, "got: {err}");
    assert!(!output.exists());
}

#[test]
fn missing_input_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let engine = RecordingEngine::default();
    let err = convert_with_engine(
        dir.path().join("nope.mus"),
        dir.path().join("nope.pdf"),
        &ConversionConfig::default(),
        &engine,
    )
    .unwrap_err();

    assert!(matches!(err, MusError::FileNotFound { .. }), "got: {err:?}");
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(engine.calls.borrow().is_empty());
}

#[test]
fn missing_engine_is_render_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "song.mus", LYRICS);
    let config = ConversionConfig::builder()
        .engine_program("mus2pdf-test-engine-that-does-not-exist")
        .build()
        .unwrap();

    let err = convert(&input, dir.path().join("song.pdf"), &config).unwrap_err();
    assert!(matches!(err, MusError::EngineNotFound { .. }), "got: {err:?}");
    assert_eq!(err.kind(), ErrorKind::Render);
}

#[test]
fn malformed_input_degrades_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "odd.mus", "Estructura:\nX Y\nDefiniciones:\nnonsense\n");

    let doc = parse_file(&input, Notation::Auto).unwrap();
    let Document::Chart(chart) = doc else {
        panic!("expected chord chart");
    };
    assert_eq!(chart.title, "Sin título");
    assert!(chart.progression().iter().all(|e| e.chords.is_empty()));
    assert_eq!(chart.progression().len(), 2);
}

// ── Real engine (opt-in) ─────────────────────────────────────────────────────

#[test]
fn weasyprint_renders_lyrics_sheet() {
    if std::env::var("E2E_ENABLED").is_err() {
        println!("SKIP — set E2E_ENABLED=1 to run with a real PDF engine");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "song.mus", LYRICS);
    let output = dir.path().join("song.pdf");

    let out = convert(&input, &output, &ConversionConfig::default()).expect("weasyprint run");
    let bytes = std::fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert_eq!(out.pdf_bytes, bytes.len());
}
