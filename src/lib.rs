//! # mus2pdf
//!
//! Convert plain-text chord/lyrics sheets (`.mus` files) to styled HTML and PDF.
//!
//! Two notations are understood:
//!
//! * **Lyrics sheets**: a `# Title` line, `Verse` / `Chorus` markers and
//!   literal lines of chords (`[C]Hello [G]world`) or lyrics.
//! * **Chord charts**: `Título:`, an `Estructura:` line of section names and
//!   `Definiciones:` mapping each name to chord degrees. The chart is
//!   expanded section by section and drawn as a grid of chord images.
//!
//! ## Pipeline Overview
//!
//! ```text
//! .mus
//!  │
//!  ├─ 1. Input   read the file
//!  ├─ 2. Parse   lyrics sheet or chord chart (auto-detected)
//!  ├─ 3. Expand  chart structure → per-section chords
//!  ├─ 4. HTML    builder + palette / chord images
//!  └─ 5. PDF     external engine (weasyprint by default), atomic write
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mus2pdf::{convert, ConversionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder().emit_debug_html(true).build()?;
//!     let output = convert("mi_cancion.mus", "mi_cancion.pdf", &config)?;
//!     eprintln!("{}: {} bytes", output.document.title(), output.pdf_bytes);
//!     Ok(())
//! }
//! ```
//!
//! Parsing alone never fails and needs no engine:
//!
//! ```rust
//! use mus2pdf::{parse_str, Document, Notation};
//!
//! let doc = parse_str("Título: Mi Canción\nEstructura:\nA B A\nDefiniciones:\nA = I IV V\nB = ii V\n", Notation::Auto);
//! let Document::Chart(chart) = doc else { panic!() };
//! assert_eq!(chart.progression().len(), 3);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `mus2pdf` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    ChartImages, ConversionConfig, ConversionConfigBuilder, EngineCommand, Notation, StylePalette,
};
pub use convert::{
    convert, convert_to_html, convert_with_engine, detect_notation, parse_file, parse_str,
    render_document, ConversionOutput,
};
pub use document::{
    ChordChart, Definitions, Document, ProgressionEntry, Section, SectionKind, SongDocument,
};
pub use error::{ErrorKind, MusError};
pub use pipeline::pdf::{CommandEngine, PdfEngine};
