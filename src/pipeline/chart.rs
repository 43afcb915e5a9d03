//! Chord-chart parser and progression expander.
//!
//! Input is a title plus two named blocks:
//!
//! ```text
//! Título: Mi Canción
//! Estructura:
//! A B A
//! Definiciones:
//! A = I IV V
//! B = ii V
//! ```
//!
//! Blank lines are dropped up front. The remaining lines are tagged by
//! [`classify`] and consumed by a three-mode state machine. A structure line
//! replaces the previous one instead of extending it, so only the last line
//! of an `Estructura:` block counts.

use crate::document::{ChordChart, Definitions, ProgressionEntry, UNTITLED};
use crate::pipeline::input;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

const TITLE_MARKER: &str = "Título:";
const STRUCTURE_HEADER: &str = "Estructura:";
const DEFINITIONS_HEADER: &str = "Definiciones:";

/// `<name> = <chords>`, split at the first `=`.
static RE_DEFINITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<name>[^=]*)=(?P<chords>.*)$").unwrap());

/// A classified, already-trimmed, non-blank source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartLine<'a> {
    Title(&'a str),
    StructureHeader,
    DefinitionsHeader,
    Content(&'a str),
}

pub fn classify(line: &str) -> ChartLine<'_> {
    if let Some(title) = line.strip_prefix(TITLE_MARKER) {
        ChartLine::Title(title.trim())
    } else if line == STRUCTURE_HEADER {
        ChartLine::StructureHeader
    } else if line == DEFINITIONS_HEADER {
        ChartLine::DefinitionsHeader
    } else {
        ChartLine::Content(line)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    None,
    Structure,
    Definitions,
}

/// Parse a chord chart. Never fails; odd lines are skipped.
pub fn parse(text: &str) -> ChordChart {
    let mut title: Option<String> = None;
    let mut structure: Vec<String> = Vec::new();
    let mut definitions = Definitions::new();
    let mut mode = Mode::None;

    let lines = input::lines(text).map(str::trim).filter(|l| !l.is_empty());

    for line in lines {
        match (classify(line), mode) {
            (ChartLine::Title(t), _) => title = Some(t.to_string()),
            (ChartLine::StructureHeader, _) => mode = Mode::Structure,
            (ChartLine::DefinitionsHeader, _) => mode = Mode::Definitions,
            (ChartLine::Content(content), Mode::Structure) => {
                structure = content.split_whitespace().map(String::from).collect();
            }
            (ChartLine::Content(content), Mode::Definitions) => {
                match parse_definition(content) {
                    Some((name, chords)) => definitions.insert(name, chords),
                    None => {
                        debug!("Ignoring definition line without '=': {:?}", content);
                    }
                }
            }
            (ChartLine::Content(content), Mode::None) => {
                debug!("Ignoring line outside any block: {:?}", content);
            }
        }
    }

    if title.is_none() {
        debug!("No title line found, using placeholder");
    }
    if structure.is_empty() {
        debug!("Chart has an empty structure");
    }

    ChordChart {
        title: title.unwrap_or_else(|| UNTITLED.to_string()),
        structure,
        definitions,
    }
}

fn parse_definition(line: &str) -> Option<(String, Vec<String>)> {
    let caps = RE_DEFINITION.captures(line)?;
    let name = caps["name"].trim().to_string();
    let chords = caps["chords"]
        .split_whitespace()
        .map(String::from)
        .collect();
    Some((name, chords))
}

/// Look up every structure entry. Missing names expand to no chords.
///
/// The output always has exactly one entry per structure name.
pub fn expand(structure: &[String], definitions: &Definitions) -> Vec<ProgressionEntry> {
    structure
        .iter()
        .map(|name| {
            let chords = match definitions.get(name) {
                Some(chords) => chords.to_vec(),
                None => {
                    debug!("Section '{}' has no definition", name);
                    Vec::new()
                }
            };
            ProgressionEntry {
                name: name.clone(),
                chords,
            }
        })
        .collect()
}
