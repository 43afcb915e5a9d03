//! Pipeline stages for mus-to-PDF conversion.
//!
//! Each submodule implements exactly one transformation step. Nothing calls
//! back into an earlier stage.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ lyrics | chart ──▶ html ──▶ pdf
//! (read)    (parse, expand)   (build)  (engine + write)
//! ```
//!
//! 1. [`input`]  — read the source file, mapping I/O failures to typed errors
//! 2. [`lyrics`] — lyrics-sheet classifier and parser
//! 3. [`chart`]  — chord-chart classifier, parser and progression expander
//! 4. [`assets`] — chord-image references, missing-file checks, data-URI inlining
//! 5. [`html`]   — markup builder and the two page layouts
//! 6. [`pdf`]    — external engine invocation and atomic PDF write

pub mod assets;
pub mod chart;
pub mod html;
pub mod input;
pub mod lyrics;
pub mod pdf;
