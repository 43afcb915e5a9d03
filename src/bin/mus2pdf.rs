//! CLI binary for mus2pdf.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig`, picks output paths and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use mus2pdf::{convert, convert_to_html, parse_file, ConversionConfig, Notation, StylePalette};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI definition ───────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "mus2pdf",
    version,
    about = "Convert .mus chord/lyrics sheets to PDF",
    long_about = "Convert .mus chord/lyrics sheets to PDF.\n\n\
Lyrics sheets use `# Title`, `Verse` and `Chorus` lines; chord charts use\n\
`Título:`, `Estructura:` and `Definiciones:` blocks. The notation is\n\
detected automatically unless --notation is given.\n\n\
PDF rendering is delegated to an external HTML-to-PDF program\n\
(weasyprint by default) that reads HTML on stdin and writes PDF on stdout."
)]
struct Cli {
    /// One or more .mus files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output PDF (single input) or output directory (several inputs).
    /// Defaults to `<input>.pdf` next to each input.
    #[arg(short, long, env = "MUS2PDF_OUTPUT")]
    output: Option<PathBuf>,

    /// Input notation: auto, lyrics, chart.
    #[arg(long, env = "MUS2PDF_NOTATION", value_enum, default_value = "auto")]
    notation: NotationArg,

    /// JSON file with palette overrides (background_color, chord_color, …).
    #[arg(long, env = "MUS2PDF_STYLE")]
    style: Option<PathBuf>,

    /// CSS file appended verbatim to lyrics sheets.
    #[arg(long, env = "MUS2PDF_CSS")]
    css: Option<PathBuf>,

    /// Chord image folder, relative to the base URL.
    #[arg(long, env = "MUS2PDF_IMAGES", default_value = "imagenes")]
    images: String,

    /// Separator image drawn between chords.
    #[arg(long, env = "MUS2PDF_SEPARATOR", default_value = "palos.svg")]
    separator: String,

    /// Inline chord images as data URIs.
    #[arg(long, env = "MUS2PDF_EMBED_IMAGES")]
    embed_images: bool,

    /// Directory relative asset paths resolve against (default: input's directory).
    #[arg(long, env = "MUS2PDF_BASE_URL")]
    base_url: Option<PathBuf>,

    /// Also write debug.html next to each input.
    #[arg(long, env = "MUS2PDF_DEBUG_HTML")]
    debug_html: bool,

    /// HTML-to-PDF program.
    #[arg(long, env = "MUS2PDF_ENGINE", default_value = "weasyprint")]
    engine: String,

    /// Extra argument for the engine (repeatable).
    #[arg(long = "engine-arg", allow_hyphen_values = true)]
    engine_args: Vec<String>,

    /// Write `<input>.html` instead of a PDF.
    #[arg(long)]
    html_only: bool,

    /// Print the parsed document(s) as JSON and exit.
    #[arg(long)]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MUS2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MUS2PDF_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum NotationArg {
    Auto,
    Lyrics,
    Chart,
}

impl From<NotationArg> for Notation {
    fn from(v: NotationArg) -> Self {
        match v {
            NotationArg::Auto => Notation::Auto,
            NotationArg::Lyrics => Notation::Lyrics,
            NotationArg::Chart => Notation::Chart,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces per-file INFO lines when several inputs run.
    let show_progress = !cli.quiet && !cli.json && cli.inputs.len() > 1;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;

    // ── JSON mode ────────────────────────────────────────────────────────
    if cli.json {
        let mut docs = Vec::with_capacity(cli.inputs.len());
        for input in &cli.inputs {
            docs.push(
                parse_file(input, config.notation)
                    .with_context(|| format!("Failed to parse {}", input.display()))?,
            );
        }
        let json = if docs.len() == 1 {
            serde_json::to_string_pretty(&docs[0])
        } else {
            serde_json::to_string_pretty(&docs)
        }
        .context("Failed to serialise document")?;
        println!("{json}");
        return Ok(());
    }

    // ── Conversion ───────────────────────────────────────────────────────
    let extension = if cli.html_only { "html" } else { "pdf" };
    let targets = plan_outputs(&cli.inputs, cli.output.as_deref(), extension)?;

    let bar = if show_progress {
        let bar = ProgressBar::new(targets.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} [{bar:40.green/238}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    } else {
        None
    };

    let mut failures = 0usize;
    for (input, output) in &targets {
        if let Some(ref bar) = bar {
            bar.set_message(input.display().to_string());
        }

        let result = if cli.html_only {
            convert_to_html(input, &config).and_then(|markup| {
                std::fs::write(output, &markup)
                    .map(|_| markup.len())
                    .map_err(|e| mus2pdf::MusError::OutputWriteFailed {
                        path: output.clone(),
                        source: e,
                    })
            })
        } else {
            convert(input, output, &config).map(|out| out.pdf_bytes)
        };

        match result {
            Ok(bytes) => {
                let line = format!(
                    "{}  {}  →  {}  {}",
                    green("✔"),
                    input.display(),
                    bold(&output.display().to_string()),
                    dim(&format!("{bytes} bytes")),
                );
                report(bar.as_ref(), cli.quiet, &line);
            }
            Err(e) => {
                failures += 1;
                let line = format!("{}  {}: {}", red("✘"), input.display(), e);
                match bar {
                    Some(ref bar) => bar.println(line),
                    None => eprintln!("{line}"),
                }
            }
        }

        if let Some(ref bar) = bar {
            bar.inc(1);
        }
    }

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    if failures > 0 {
        anyhow::bail!("{failures}/{} conversions failed", targets.len());
    }
    Ok(())
}

fn report(bar: Option<&ProgressBar>, quiet: bool, line: &str) {
    if quiet {
        return;
    }
    match bar {
        Some(bar) => bar.println(line),
        None => eprintln!("{line}"),
    }
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .notation(cli.notation.clone().into())
        .images_folder(&cli.images)
        .separator_image(&cli.separator)
        .embed_images(cli.embed_images)
        .emit_debug_html(cli.debug_html)
        .engine_program(&cli.engine);

    for arg in &cli.engine_args {
        builder = builder.engine_arg(arg);
    }

    if let Some(ref path) = cli.style {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read style from {:?}", path))?;
        let palette: StylePalette = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid style JSON in {:?}", path))?;
        builder = builder.style(palette);
    }

    if let Some(ref path) = cli.css {
        let css = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read CSS from {:?}", path))?;
        builder = builder.custom_css(css);
    }

    if let Some(ref base) = cli.base_url {
        builder = builder.base_url(base);
    }

    builder.build().context("Invalid configuration")
}

/// Pair every input with its output path, creating an output directory when
/// one is named.
fn plan_outputs(
    inputs: &[PathBuf],
    output: Option<&Path>,
    extension: &str,
) -> Result<Vec<(PathBuf, PathBuf)>> {
    let single_file = inputs.len() == 1
        && output.is_some_and(|o| o.extension().is_some() && !o.is_dir());

    if single_file {
        let out = output.map(Path::to_path_buf).unwrap_or_default();
        if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        return Ok(vec![(inputs[0].clone(), out)]);
    }

    if let Some(dir) = output {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let targets: Vec<(PathBuf, PathBuf)> = inputs
        .iter()
        .map(|input| {
            let file_name = input.with_extension(extension);
            let file_name = file_name.file_name().map(PathBuf::from).unwrap_or_default();
            let out = match output {
                Some(dir) => dir.join(file_name),
                None => input.with_extension(extension),
            };
            (input.clone(), out)
        })
        .collect();

    let mut claimed: HashMap<&Path, &Path> = HashMap::new();
    for (input, out) in &targets {
        if let Some(first) = claimed.insert(out.as_path(), input.as_path()) {
            anyhow::bail!(
                "{} and {} would both be written to {}",
                first.display(),
                input.display(),
                out.display()
            );
        }
    }

    Ok(targets)
}
