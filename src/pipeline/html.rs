//! HTML generation for both notations.
//!
//! Markup is assembled with [`HtmlBuilder`], which writes one element per
//! line and indents by nesting depth. Text and attribute values are escaped;
//! stylesheets and caller-supplied CSS are written raw.

use crate::config::StylePalette;
use crate::document::{ChordChart, SongDocument};
use crate::pipeline::assets::ImageSources;

/// Line-oriented HTML writer.
pub struct HtmlBuilder {
    out: String,
    depth: usize,
}

impl Default for HtmlBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlBuilder {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            depth: 0,
        }
    }

    pub fn doctype(&mut self) -> &mut Self {
        self.line("<!DOCTYPE html>")
    }

    /// `<tag attrs>` on its own line; following lines are indented.
    pub fn open(&mut self, tag: &str, attrs: &[(&str, &str)]) -> &mut Self {
        let start = start_tag(tag, attrs);
        self.line(&start);
        self.depth += 1;
        self
    }

    pub fn close(&mut self, tag: &str) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self.line(&format!("</{tag}>"))
    }

    /// Element without content, e.g. `<img …>` or `<meta …>`.
    pub fn void(&mut self, tag: &str, attrs: &[(&str, &str)]) -> &mut Self {
        let start = start_tag(tag, attrs);
        self.line(&start)
    }

    /// `<tag attrs>text</tag>` on one line, text escaped.
    pub fn element(&mut self, tag: &str, attrs: &[(&str, &str)], text: &str) -> &mut Self {
        let markup = inline(tag, attrs, text);
        self.line(&markup)
    }

    /// `<tag attrs>inner</tag>` on one line, `inner` written as-is.
    pub fn raw_element(&mut self, tag: &str, attrs: &[(&str, &str)], inner: &str) -> &mut Self {
        let markup = format!("{}{inner}</{tag}>", start_tag(tag, attrs));
        self.line(&markup)
    }

    /// Unescaped multi-line content, each line indented at the current depth.
    pub fn raw(&mut self, content: &str) -> &mut Self {
        for l in content.lines() {
            self.line(l.trim_end());
        }
        self
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, s: &str) -> &mut Self {
        if !s.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str("  ");
            }
            self.out.push_str(s);
        }
        self.out.push('\n');
        self
    }
}

/// Escape text or an attribute value.
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// `<tag attrs>text</tag>` as a string, for nesting inside [`HtmlBuilder::raw_element`].
pub fn inline(tag: &str, attrs: &[(&str, &str)], text: &str) -> String {
    format!("{}{}</{tag}>", start_tag(tag, attrs), escape(text))
}

fn start_tag(tag: &str, attrs: &[(&str, &str)]) -> String {
    let mut s = format!("<{tag}");
    for (name, value) in attrs {
        s.push_str(&format!(" {name}=\"{}\"", escape(value)));
    }
    s.push('>');
    s
}

// ── Lyrics sheet ─────────────────────────────────────────────────────────

/// A line containing `[` is treated as a chord line.
pub fn is_chord_line(line: &str) -> bool {
    line.contains('[')
}

fn song_stylesheet(style: &StylePalette) -> String {
    format!(
        "body {{ font-family: Arial, sans-serif; margin: 40px; background: {bg}; color: {text}; }}
h1 {{ text-align: center; color: {title}; }}
.section {{ margin-bottom: 30px; }}
.chorus {{ background: {chorus_bg}; padding: 10px; border-left: 5px solid {chorus_border}; }}
.chords {{ font-weight: bold; color: {chord}; font-size: 1.2em; }}
.lyrics {{ margin-left: 20px; color: {lyric}; }}
pre {{ white-space: pre-wrap; font-family: monospace; line-height: 2; }}",
        bg = style.background_color,
        text = style.text_color,
        title = style.title_color,
        chorus_bg = style.chorus_background,
        chorus_border = style.chorus_border,
        chord = style.chord_color,
        lyric = style.lyric_color,
    )
}

/// Render a lyrics sheet. `custom_css`, when given, gets its own `<style>`
/// block after the built-in one.
pub fn render_song(doc: &SongDocument, style: &StylePalette, custom_css: Option<&str>) -> String {
    let mut b = HtmlBuilder::new();
    b.doctype().open("html", &[]).open("head", &[]);
    b.void("meta", &[("charset", "utf-8")])
        .element("title", &[], &doc.title);
    b.open("style", &[]).raw(&song_stylesheet(style)).close("style");
    if let Some(css) = custom_css {
        b.open("style", &[]).raw(css).close("style");
    }
    b.close("head").open("body", &[]);
    b.element("h1", &[], &doc.title);

    for section in &doc.sections {
        let class = format!("section {}", section.kind.as_str());
        b.open("div", &[("class", class.as_str())]);
        for line in &section.lines {
            let span_class = if is_chord_line(line) { "chords" } else { "lyrics" };
            b.raw_element("pre", &[], &inline("span", &[("class", span_class)], line));
        }
        b.close("div");
    }

    b.close("body").close("html");
    b.finish()
}

// ── Chord chart ──────────────────────────────────────────────────────────

const CHART_STYLESHEET: &str = "body {
  font-family: 'Arial', sans-serif;
  margin: 40px auto;
  max-width: 900px;
  background: #fffff0;
  padding: 20px;
}
h1 {
  text-align: center;
  font-size: 2.5em;
  margin-bottom: 60px;
  color: #333;
}
.sections {
  display: flex;
  flex-wrap: wrap;
  justify-content: center;
  gap: 50px;
}
.section {
  text-align: center;
  min-width: 200px;
}
.section-label {
  font-size: 2.2em;
  font-weight: bold;
  margin-bottom: 25px;
  color: #d32f2f;
  height: 60px;
}
.chord-line {
  display: flex;
  justify-content: center;
  align-items: center;
  flex-wrap: wrap;
  gap: 30px;
}
.chord-svg {
  width: 70px;
  height: 90px;
}
.separator-svg {
  width: 25px;
  height: 80px;
  opacity: 0.7;
}";

/// Render a chord chart as a grid of chord images, one block per
/// progression entry, with the separator image between consecutive chords.
pub fn render_chart(chart: &ChordChart, images: &ImageSources) -> String {
    let mut b = HtmlBuilder::new();
    b.doctype().open("html", &[("lang", "es")]).open("head", &[]);
    b.void("meta", &[("charset", "utf-8")])
        .element("title", &[], &chart.title);
    b.open("style", &[]).raw(CHART_STYLESHEET).close("style");
    b.close("head").open("body", &[]);
    b.element("h1", &[], &chart.title);

    b.open("div", &[("class", "sections")]);
    for entry in chart.progression() {
        b.open("div", &[("class", "section")]);
        b.element("div", &[("class", "section-label")], &entry.name);
        b.open("div", &[("class", "chord-line")]);
        for (i, chord) in entry.chords.iter().enumerate() {
            if i > 0 {
                let sep = images.separator_src();
                b.void(
                    "img",
                    &[("src", sep.as_str()), ("class", "separator-svg"), ("alt", "|")],
                );
            }
            let src = images.chord_src(chord);
            b.void(
                "img",
                &[("src", src.as_str()), ("class", "chord-svg"), ("alt", chord.as_str())],
            );
        }
        b.close("div").close("div");
    }
    b.close("div");

    b.close("body").close("html");
    b.finish()
}
