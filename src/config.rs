//! Configuration types for mus-to-PDF conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The colour palette, the chord-image
//! location and the PDF engine used to be fixed constants; here they are
//! plain fields whose defaults equal those constants.

use crate::error::MusError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a mus-to-PDF conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use mus2pdf::{ConversionConfig, Notation};
///
/// let config = ConversionConfig::builder()
///     .notation(Notation::Chart)
///     .images_folder("assets/chords")
///     .emit_debug_html(true)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Which notation the input is written in. Default: [`Notation::Auto`].
    pub notation: Notation,

    /// Colours used by the lyrics-sheet layout.
    pub style: StylePalette,

    /// Extra CSS appended verbatim in its own `<style>` block (lyrics sheets only).
    pub custom_css: Option<String>,

    /// Where chord-chart images live and how they are referenced.
    pub images: ChartImages,

    /// Directory against which relative asset references resolve.
    ///
    /// If None, the parent directory of the input file is used.
    pub base_url: Option<PathBuf>,

    /// Write the generated HTML to `debug.html` next to the input. Default: false.
    pub emit_debug_html: bool,

    /// External HTML-to-PDF program. Default: `weasyprint`.
    pub engine: EngineCommand,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            notation: Notation::default(),
            style: StylePalette::default(),
            custom_css: None,
            images: ChartImages::default(),
            base_url: None,
            emit_debug_html: false,
            engine: EngineCommand::default(),
        }
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn notation(mut self, notation: Notation) -> Self {
        self.config.notation = notation;
        self
    }

    pub fn style(mut self, style: StylePalette) -> Self {
        self.config.style = style;
        self
    }

    pub fn custom_css(mut self, css: impl Into<String>) -> Self {
        self.config.custom_css = Some(css.into());
        self
    }

    pub fn images_folder(mut self, folder: impl Into<String>) -> Self {
        self.config.images.folder = folder.into();
        self
    }

    pub fn separator_image(mut self, file_name: impl Into<String>) -> Self {
        self.config.images.separator = file_name.into();
        self
    }

    pub fn embed_images(mut self, v: bool) -> Self {
        self.config.images.embed = v;
        self
    }

    pub fn base_url(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.base_url = Some(dir.into());
        self
    }

    pub fn emit_debug_html(mut self, v: bool) -> Self {
        self.config.emit_debug_html = v;
        self
    }

    pub fn engine_program(mut self, program: impl Into<String>) -> Self {
        self.config.engine.program = program.into();
        self
    }

    pub fn engine_arg(mut self, arg: impl Into<String>) -> Self {
        self.config.engine.args.push(arg.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, MusError> {
        let c = &self.config;
        for (name, value) in c.style.entries() {
            validate_css_value(name, value)?;
        }
        if c.images.folder.trim().is_empty() {
            return Err(MusError::InvalidConfig(
                "Images folder must not be empty".into(),
            ));
        }
        if c.images.separator.trim().is_empty() {
            return Err(MusError::InvalidConfig(
                "Separator image must not be empty".into(),
            ));
        }
        if c.engine.program.trim().is_empty() {
            return Err(MusError::InvalidConfig(
                "PDF engine program must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Palette values are interpolated into a stylesheet, so anything that could
/// end the declaration is refused.
fn validate_css_value(name: &str, value: &str) -> Result<(), MusError> {
    if value.trim().is_empty() {
        return Err(MusError::InvalidConfig(format!(
            "Style colour '{name}' must not be empty"
        )));
    }
    if value.contains([';', '{', '}', '<']) {
        return Err(MusError::InvalidConfig(format!(
            "Style colour '{name}' contains a forbidden character: {value:?}"
        )));
    }
    Ok(())
}

// ── Enums & sub-configs ──────────────────────────────────────────────────

/// The two input notations understood by the parsers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Notation {
    /// Pick by content (see [`crate::convert::detect_notation`]). (default)
    #[default]
    Auto,
    /// `# Title`, `Verse`/`Chorus` markers and literal chord/lyric lines.
    Lyrics,
    /// `Título:`, `Estructura:` and `Definiciones:` blocks.
    Chart,
}

/// Colour palette for the lyrics-sheet layout.
///
/// Every field has a default, so a JSON file only needs the keys it changes:
///
/// ```rust
/// use mus2pdf::StylePalette;
///
/// let palette: StylePalette = serde_json::from_str(r##"{"chord_color": "#008800"}"##).unwrap();
/// assert_eq!(palette.chord_color, "#008800");
/// assert_eq!(palette.title_color, "#3333ff");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylePalette {
    pub background_color: String,
    pub text_color: String,
    pub title_color: String,
    /// Chord lines. Default: red.
    pub chord_color: String,
    pub lyric_color: String,
    pub chorus_background: String,
    pub chorus_border: String,
}

impl Default for StylePalette {
    fn default() -> Self {
        Self {
            background_color: "#ffffff".into(),
            text_color: "#000000".into(),
            title_color: "#3333ff".into(),
            chord_color: "#ff0000".into(),
            lyric_color: "#000000".into(),
            chorus_background: "#f0f0f0".into(),
            chorus_border: "#0066cc".into(),
        }
    }
}

impl StylePalette {
    /// `(name, value)` pairs, in declaration order.
    pub fn entries(&self) -> [(&'static str, &str); 7] {
        [
            ("background_color", self.background_color.as_str()),
            ("text_color", self.text_color.as_str()),
            ("title_color", self.title_color.as_str()),
            ("chord_color", self.chord_color.as_str()),
            ("lyric_color", self.lyric_color.as_str()),
            ("chorus_background", self.chorus_background.as_str()),
            ("chorus_border", self.chorus_border.as_str()),
        ]
    }
}

/// Chord-chart image settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartImages {
    /// Folder, relative to the base URL, holding `<chord>.svg` files. Default: `imagenes`.
    pub folder: String,
    /// Image drawn between consecutive chords. Default: `palos.svg`.
    pub separator: String,
    /// Inline every image as a base64 data URI instead of a relative path.
    pub embed: bool,
}

impl Default for ChartImages {
    fn default() -> Self {
        Self {
            folder: "imagenes".into(),
            separator: "palos.svg".into(),
            embed: false,
        }
    }
}

/// Command line of the external HTML-to-PDF engine.
///
/// The engine receives HTML on stdin and must write the PDF to stdout; see
/// [`crate::pipeline::pdf::CommandEngine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineCommand {
    pub program: String,
    /// Extra arguments placed before the base-URL and stdin/stdout arguments.
    pub args: Vec<String>,
}

impl Default for EngineCommand {
    fn default() -> Self {
        Self {
            program: "weasyprint".into(),
            args: Vec::new(),
        }
    }
}
