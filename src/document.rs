//! Parsed document types.
//!
//! A [`Document`] is built once per conversion, rendered, and dropped. Nothing
//! here is mutated after the parser returns it.

use serde::{Deserialize, Deserializer, Serialize};

/// Title used when the source has no title line.
pub const UNTITLED: &str = "Sin título";

/// A parsed mus file of either notation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "notation", rename_all = "lowercase")]
pub enum Document {
    Lyrics(SongDocument),
    Chart(ChordChart),
}

impl Document {
    pub fn title(&self) -> &str {
        match self {
            Document::Lyrics(song) => &song.title,
            Document::Chart(chart) => &chart.title,
        }
    }
}

// ── Lyrics sheet ─────────────────────────────────────────────────────────

/// A lyrics sheet: a title and verse/chorus sections of raw lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongDocument {
    pub title: String,
    /// In order of appearance. Never contains a section without lines.
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Verse,
    Chorus,
}

impl SectionKind {
    /// CSS class name used by the renderer.
    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::Verse => "verse",
            SectionKind::Chorus => "chorus",
        }
    }
}

/// One verse or chorus. Lines may mix chord tokens and lyric text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub kind: SectionKind,
    pub lines: Vec<String>,
}

// ── Chord chart ──────────────────────────────────────────────────────────

/// A chord chart: the arrangement plus the chords of each named section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordChart {
    pub title: String,
    /// Section names in play order; duplicates repeat a section.
    pub structure: Vec<String>,
    pub definitions: Definitions,
}

impl ChordChart {
    /// Resolve [`Self::structure`] against [`Self::definitions`].
    pub fn progression(&self) -> Vec<ProgressionEntry> {
        crate::pipeline::chart::expand(&self.structure, &self.definitions)
    }
}

/// Section name → chord-degree tokens, in first-definition order.
///
/// Redefining a key replaces its chords in place. Deserializing goes through
/// [`Definitions::insert`] too, so duplicate keys collapse the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Definitions(Vec<(String, Vec<String>)>);

impl<'de> Deserialize<'de> for Definitions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pairs = Vec::<(String, Vec<String>)>::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the chords for `name`.
    pub fn insert(&mut self, name: impl Into<String>, chords: Vec<String>) {
        let name = name.into();
        match self.0.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => *existing = chords,
            None => self.0.push((name, chords)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_slice())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<String>)> for Definitions {
    fn from_iter<I: IntoIterator<Item = (K, Vec<String>)>>(iter: I) -> Self {
        let mut defs = Definitions::new();
        for (k, v) in iter {
            defs.insert(k, v);
        }
        defs
    }
}

/// One rendered slot of a chord chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionEntry {
    pub name: String,
    pub chords: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn redefinition_replaces_in_place() {
        let mut defs = Definitions::new();
        defs.insert("A", tokens("I IV"));
        defs.insert("B", tokens("ii V"));
        defs.insert("A", tokens("I V"));
        assert_eq!(defs.len(), 2);
        assert_eq!(defs.get("A"), Some(tokens("I V").as_slice()));
        let keys: Vec<&str> = defs.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["A", "B"]);
    }

    #[test]
    fn deserialized_duplicates_keep_last_definition() {
        let defs: Definitions =
            serde_json::from_str(r#"[["A", ["I", "IV"]], ["B", ["ii"]], ["A", ["V"]]]"#).unwrap();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs.get("A"), Some(tokens("V").as_slice()));
        assert_eq!(serde_json::to_string(&defs).unwrap(), r#"[["A",["V"]],["B",["ii"]]]"#);
    }

    #[test]
    fn document_serialises_with_notation_tag() {
        let doc = Document::Lyrics(SongDocument {
            title: "T".into(),
            sections: vec![Section {
                kind: SectionKind::Chorus,
                lines: vec!["[C]la".into()],
            }],
        });
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["notation"], "lyrics");
        assert_eq!(json["sections"][0]["kind"], "chorus");
        assert_eq!(doc.title(), "T");
    }
}
