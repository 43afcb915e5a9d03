//! Conversion entry points.
//!
//! [`convert`] runs the whole pipeline for one file: read, parse, render
//! HTML, optionally write `debug.html`, then produce the PDF. Every step is
//! blocking and runs once, and any I/O or engine failure is returned as-is.

use crate::config::{ConversionConfig, Notation};
use crate::document::Document;
use crate::error::MusError;
use crate::pipeline::assets::ImageSources;
use crate::pipeline::pdf::{self, CommandEngine, PdfEngine};
use crate::pipeline::{chart, html, input, lyrics};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// File name of the optional HTML copy written next to the input.
pub const DEBUG_HTML_FILE: &str = "debug.html";

/// Result of a successful [`convert`].
#[derive(Debug, Clone, Serialize)]
pub struct ConversionOutput {
    pub document: Document,
    /// Size of the generated HTML in bytes.
    pub html_len: usize,
    /// Size of the written PDF in bytes.
    pub pdf_bytes: usize,
    /// Where the debug HTML went, if it was requested.
    pub debug_html: Option<PathBuf>,
    pub duration_ms: u64,
}

/// Convert a `.mus` file to PDF using the engine named in `config`.
///
/// # Errors
/// - I/O kind: input missing or unreadable, chord image unreadable while
///   embedding, debug HTML unwritable
/// - Render kind: engine missing or failing, output path unwritable
///   (including a missing parent directory, which is not created)
pub fn convert(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, MusError> {
    let engine = CommandEngine::new(config.engine.clone());
    convert_with_engine(input_path, output_path, config, &engine)
}

/// [`convert`] with a caller-supplied engine.
pub fn convert_with_engine(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
    engine: &dyn PdfEngine,
) -> Result<ConversionOutput, MusError> {
    let start = Instant::now();
    let input_path = input_path.as_ref();
    let output_path = output_path.as_ref();
    info!("Starting conversion: {}", input_path.display());

    // ── Step 1: Read & parse ─────────────────────────────────────────────
    let document = parse_file(input_path, config.notation)?;

    // ── Step 2: Render HTML ──────────────────────────────────────────────
    let base_url = resolve_base_url(input_path, config);
    let markup = render_document(&document, config, &base_url)?;
    debug!("Generated {} bytes of HTML", markup.len());

    // ── Step 3: Debug copy ───────────────────────────────────────────────
    let debug_html = if config.emit_debug_html {
        Some(write_debug_html(input_path, &markup)?)
    } else {
        None
    };

    // ── Step 4: PDF ──────────────────────────────────────────────────────
    let pdf_bytes = pdf::write_pdf(engine, &markup, &base_url, output_path)?;

    let duration_ms = start.elapsed().as_millis() as u64;
    info!(
        "Conversion complete: {} → {} in {}ms",
        input_path.display(),
        output_path.display(),
        duration_ms
    );

    Ok(ConversionOutput {
        document,
        html_len: markup.len(),
        pdf_bytes,
        debug_html,
        duration_ms,
    })
}

/// Read, parse and render a `.mus` file to HTML without producing a PDF.
pub fn convert_to_html(
    input_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<String, MusError> {
    let input_path = input_path.as_ref();
    let document = parse_file(input_path, config.notation)?;
    let base_url = resolve_base_url(input_path, config);
    render_document(&document, config, &base_url)
}

/// Render an already-parsed document.
///
/// `base_url` is only read for chord charts (missing-image checks and
/// embedding).
pub fn render_document(
    document: &Document,
    config: &ConversionConfig,
    base_url: &Path,
) -> Result<String, MusError> {
    match document {
        Document::Lyrics(song) => Ok(html::render_song(
            song,
            &config.style,
            config.custom_css.as_deref(),
        )),
        Document::Chart(chart) => {
            let sources = ImageSources::for_chart(chart, &config.images, base_url)?;
            Ok(html::render_chart(chart, &sources))
        }
    }
}

/// Read and parse a file.
pub fn parse_file(path: impl AsRef<Path>, notation: Notation) -> Result<Document, MusError> {
    let text = input::read_source(path.as_ref())?;
    Ok(parse_str(&text, notation))
}

/// Parse text in the given notation; [`Notation::Auto`] sniffs it first.
pub fn parse_str(text: &str, notation: Notation) -> Document {
    let notation = match notation {
        Notation::Auto => detect_notation(text),
        other => other,
    };
    debug!("Parsing as {:?}", notation);
    match notation {
        Notation::Chart => Document::Chart(chart::parse(text)),
        Notation::Lyrics | Notation::Auto => Document::Lyrics(lyrics::parse(text)),
    }
}

/// Guess the notation of `text`.
///
/// An `Estructura:` or `Definiciones:` header means `Chart`. A `Título:`
/// line alone means `Chart` only when there are no lyrics markers (`# `
/// title, `Verse`, `Chorus`). Everything else is `Lyrics`.
pub fn detect_notation(text: &str) -> Notation {
    let mut chart_header = false;
    let mut chart_title = false;
    let mut lyrics_marker = false;

    for line in input::lines(text).map(str::trim) {
        match chart::classify(line) {
            chart::ChartLine::StructureHeader | chart::ChartLine::DefinitionsHeader => {
                chart_header = true
            }
            chart::ChartLine::Title(_) => chart_title = true,
            chart::ChartLine::Content(_) => {
                if matches!(
                    lyrics::classify(line),
                    lyrics::LyricsLine::Title(_) | lyrics::LyricsLine::SectionStart(_)
                ) {
                    lyrics_marker = true;
                }
            }
        }
    }

    match (chart_header, chart_title, lyrics_marker) {
        (true, _, _) | (false, true, false) => Notation::Chart,
        (false, true, true) => {
            warn!("Text has a 'Título:' line and lyrics markers; parsing as a lyrics sheet");
            Notation::Lyrics
        }
        (false, false, _) => Notation::Lyrics,
    }
}

/// `config.base_url`, else the directory holding the input.
fn resolve_base_url(input_path: &Path, config: &ConversionConfig) -> PathBuf {
    if let Some(ref base) = config.base_url {
        return base.clone();
    }
    match input_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn write_debug_html(input_path: &Path, markup: &str) -> Result<PathBuf, MusError> {
    let path = match input_path.parent() {
        Some(p) => p.join(DEBUG_HTML_FILE),
        None => PathBuf::from(DEBUG_HTML_FILE),
    };
    std::fs::write(&path, markup).map_err(|e| MusError::DebugWriteFailed {
        path: path.clone(),
        source: e,
    })?;
    debug!("Wrote debug HTML to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_chart_notation() {
        assert_eq!(detect_notation("Título: X\n"), Notation::Chart);
        assert_eq!(detect_notation("foo\n  Estructura:  \nA\n"), Notation::Chart);
        assert_eq!(detect_notation("Definiciones:\n"), Notation::Chart);
        assert_eq!(detect_notation("# Song\nVerse\n[C]la\n"), Notation::Lyrics);
        assert_eq!(detect_notation(""), Notation::Lyrics);
    }

    #[test]
    fn chart_title_inside_lyrics_sheet_stays_lyrics() {
        let text = "# Canción\nVerse\nTítulo: de la canción\n[C]la\n";
        assert_eq!(detect_notation(text), Notation::Lyrics);
        match parse_str(text, Notation::Auto) {
            Document::Lyrics(song) => {
                assert_eq!(song.title, "Canción");
                assert_eq!(
                    song.sections[0].lines,
                    vec!["Título: de la canción".to_string(), "[C]la".to_string()]
                );
            }
            other => panic!("expected lyrics, got {other:?}"),
        }
    }

    #[test]
    fn chart_headers_win_over_section_names() {
        let text = "Título: X\nEstructura:\nVerse Chorus\nDefiniciones:\nVerse = I\n";
        assert_eq!(detect_notation(text), Notation::Chart);
    }

    #[test]
    fn explicit_notation_overrides_detection() {
        let doc = parse_str("Título: X\n", Notation::Lyrics);
        match doc {
            Document::Lyrics(song) => {
                assert_eq!(song.sections.len(), 1);
                assert_eq!(song.sections[0].lines, vec!["Título: X".to_string()]);
            }
            other => panic!("expected lyrics, got {other:?}"),
        }
    }

    #[test]
    fn base_url_defaults_to_input_dir() {
        let c = ConversionConfig::default();
        assert_eq!(
            resolve_base_url(Path::new("/songs/a.mus"), &c),
            PathBuf::from("/songs")
        );
        assert_eq!(resolve_base_url(Path::new("a.mus"), &c), PathBuf::from("."));

        let c = ConversionConfig::builder().base_url("/assets").build().unwrap();
        assert_eq!(
            resolve_base_url(Path::new("/songs/a.mus"), &c),
            PathBuf::from("/assets")
        );
    }
}
