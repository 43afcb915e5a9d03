//! Chord-image references for chart rendering.
//!
//! By default images are linked as `<folder>/<chord>.svg` and the PDF engine
//! resolves them against the base URL. A wrong base URL makes the engine
//! draw nothing, with no error, so [`warn_missing`] checks the files up
//! front and logs each one it cannot find.
//!
//! With [`ChartImages::embed`] set, every image is read here and inlined as a
//! base64 `data:` URI, so the output no longer depends on the base URL.

use crate::config::ChartImages;
use crate::document::ChordChart;
use crate::error::MusError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const SVG_MIME: &str = "image/svg+xml";

/// How `<img src>` values are produced for a chart.
#[derive(Debug, Clone)]
pub enum ImageSources {
    /// Relative paths under the images folder.
    Linked { folder: String, separator: String },
    /// Pre-read data URIs keyed by file name.
    Embedded {
        uris: HashMap<String, String>,
        separator: String,
    },
}

impl ImageSources {
    pub fn linked(images: &ChartImages) -> Self {
        ImageSources::Linked {
            folder: images.folder.clone(),
            separator: images.separator.clone(),
        }
    }

    /// Read every image `chart` uses from `base_url/<folder>` and encode it.
    pub fn embedded(
        chart: &ChordChart,
        images: &ChartImages,
        base_url: &Path,
    ) -> Result<Self, MusError> {
        let mut uris = HashMap::new();
        for file_name in required_files(chart, images) {
            let path = image_path(base_url, images, &file_name);
            let bytes = std::fs::read(&path)
                .map_err(|e| MusError::AssetReadFailed { path: path.clone(), source: e })?;
            let uri = format!("data:{SVG_MIME};base64,{}", STANDARD.encode(&bytes));
            debug!("Embedded {} ({} bytes)", path.display(), bytes.len());
            uris.insert(file_name, uri);
        }
        Ok(ImageSources::Embedded {
            uris,
            separator: images.separator.clone(),
        })
    }

    /// Build the sources `images` asks for.
    pub fn for_chart(
        chart: &ChordChart,
        images: &ChartImages,
        base_url: &Path,
    ) -> Result<Self, MusError> {
        if images.embed {
            Self::embedded(chart, images, base_url)
        } else {
            warn_missing(chart, images, base_url);
            Ok(Self::linked(images))
        }
    }

    pub fn chord_src(&self, chord: &str) -> String {
        self.src(&chord_file(chord))
    }

    pub fn separator_src(&self) -> String {
        match self {
            ImageSources::Linked { separator, .. } | ImageSources::Embedded { separator, .. } => {
                self.src(separator)
            }
        }
    }

    fn src(&self, file_name: &str) -> String {
        match self {
            ImageSources::Linked { folder, .. } => format!("{folder}/{file_name}"),
            ImageSources::Embedded { uris, .. } => uris.get(file_name).cloned().unwrap_or_default(),
        }
    }
}

/// `I` → `I.svg`.
pub fn chord_file(chord: &str) -> String {
    format!("{chord}.svg")
}

fn image_path(base_url: &Path, images: &ChartImages, file_name: &str) -> PathBuf {
    base_url.join(&images.folder).join(file_name)
}

/// Distinct image files a chart references, in first-use order. The
/// separator is included only when some section has two or more chords.
pub fn required_files(chart: &ChordChart, images: &ChartImages) -> Vec<String> {
    let mut files: Vec<String> = Vec::new();
    let mut needs_separator = false;
    for entry in chart.progression() {
        needs_separator |= entry.chords.len() > 1;
        for chord in &entry.chords {
            let file = chord_file(chord);
            if !files.contains(&file) {
                files.push(file);
            }
        }
    }
    if needs_separator && !files.contains(&images.separator) {
        files.push(images.separator.clone());
    }
    files
}

/// Image files the chart references that do not exist under the base URL.
pub fn missing_files(chart: &ChordChart, images: &ChartImages, base_url: &Path) -> Vec<PathBuf> {
    required_files(chart, images)
        .into_iter()
        .map(|f| image_path(base_url, images, &f))
        .filter(|p| !p.is_file())
        .collect()
}

fn warn_missing(chart: &ChordChart, images: &ChartImages, base_url: &Path) {
    for path in missing_files(chart, images, base_url) {
        warn!("Chord image not found, it will render blank: {}", path.display());
    }
}
