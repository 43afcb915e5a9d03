//! Lyrics-sheet parser.
//!
//! Each trimmed line is tagged by [`classify`] and fed to a two-state machine
//! (`Idle` before anything has been collected, `InSection` afterwards). The
//! parser opens an implicit verse so lines before the first marker are kept.
//!
//! ```text
//! # Title            → title
//! Verse …            → start a verse
//! Chorus …           → start a chorus
//! <blank>            → ignored
//! anything else      → content of the current section
//! ```

use crate::document::{Section, SectionKind, SongDocument, UNTITLED};
use crate::pipeline::input;
use tracing::debug;

const TITLE_MARKER: &str = "# ";
const VERSE_MARKER: &str = "Verse";
const CHORUS_MARKER: &str = "Chorus";

/// A classified source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LyricsLine<'a> {
    Blank,
    Title(&'a str),
    SectionStart(SectionKind),
    Content(&'a str),
}

/// Tag one line. Markers are matched on the trimmed text, title first.
pub fn classify(line: &str) -> LyricsLine<'_> {
    let line = line.trim();
    if let Some(title) = line.strip_prefix(TITLE_MARKER) {
        LyricsLine::Title(title.trim())
    } else if line.starts_with(VERSE_MARKER) {
        LyricsLine::SectionStart(SectionKind::Verse)
    } else if line.starts_with(CHORUS_MARKER) {
        LyricsLine::SectionStart(SectionKind::Chorus)
    } else if line.is_empty() {
        LyricsLine::Blank
    } else {
        LyricsLine::Content(line)
    }
}

enum State {
    Idle(SectionKind),
    InSection(Section),
}

impl State {
    /// Close the current section, keeping it only if it collected lines.
    fn flush(self, out: &mut Vec<Section>) {
        if let State::InSection(section) = self {
            if !section.lines.is_empty() {
                out.push(section);
            }
        }
    }
}

/// Parse a lyrics sheet. Never fails: unknown lines are content.
pub fn parse(text: &str) -> SongDocument {
    let mut title: Option<String> = None;
    let mut sections = Vec::new();
    let mut state = State::Idle(SectionKind::Verse);

    for line in input::lines(text) {
        match classify(line) {
            LyricsLine::Blank => {}
            LyricsLine::Title(t) => title = Some(t.to_string()),
            LyricsLine::SectionStart(kind) => {
                state.flush(&mut sections);
                state = State::Idle(kind);
            }
            LyricsLine::Content(content) => {
                state = match state {
                    State::Idle(kind) => State::InSection(Section {
                        kind,
                        lines: vec![content.to_string()],
                    }),
                    State::InSection(mut section) => {
                        section.lines.push(content.to_string());
                        State::InSection(section)
                    }
                };
            }
        }
    }
    state.flush(&mut sections);

    if title.is_none() {
        debug!("No title line found, using placeholder");
    }
    debug!("Parsed lyrics sheet: {} sections", sections.len());

    SongDocument {
        title: title.unwrap_or_else(|| UNTITLED.to_string()),
        sections,
    }
}
