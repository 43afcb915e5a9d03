//! PDF output: hand HTML to an external engine and write the result.
//!
//! The engine is a black box behind [`PdfEngine`]: HTML and a base directory
//! go in and PDF bytes come out. [`CommandEngine`] drives any program that
//! reads HTML on stdin and writes PDF on stdout. Its default, `weasyprint`,
//! is called as
//!
//! ```text
//! weasyprint [ARGS…] --base-url <BASE> - -
//! ```
//!
//! The PDF is written to `<output>.tmp` and renamed into place, so a failed
//! run never leaves a truncated PDF behind. The file is created with
//! `fs::write`, so it gets the same permissions as any other file the
//! process creates.

use crate::config::EngineCommand;
use crate::error::MusError;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// HTML → PDF bytes.
pub trait PdfEngine {
    /// Render `html`; relative references resolve against `base_url`.
    fn render(&self, html: &str, base_url: &Path) -> Result<Vec<u8>, MusError>;
}

/// Runs an external HTML-to-PDF program.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    command: EngineCommand,
}

impl CommandEngine {
    pub fn new(command: EngineCommand) -> Self {
        Self { command }
    }
}

impl Default for CommandEngine {
    fn default() -> Self {
        Self::new(EngineCommand::default())
    }
}

impl PdfEngine for CommandEngine {
    fn render(&self, html: &str, base_url: &Path) -> Result<Vec<u8>, MusError> {
        let program = &self.command.program;
        debug!(
            "Running {} {:?} --base-url {}",
            program,
            self.command.args,
            base_url.display()
        );

        let mut child = Command::new(program)
            .args(&self.command.args)
            .arg("--base-url")
            .arg(base_url)
            .arg("-")
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| MusError::EngineNotFound {
                program: program.clone(),
                source: e,
            })?;

        // Feed stdin from a thread so a large PDF on stdout cannot deadlock us.
        let stdin = child.stdin.take();
        let input = html.to_owned();
        let writer = std::thread::spawn(move || -> std::io::Result<()> {
            if let Some(mut stdin) = stdin {
                stdin.write_all(input.as_bytes())?;
            }
            Ok(())
        });

        let output = child.wait_with_output().map_err(|e| MusError::EngineFailed {
            program: program.clone(),
            status: "not collected".into(),
            stderr: e.to_string(),
        })?;
        let write_result = writer.join();

        if !output.status.success() {
            return Err(MusError::EngineFailed {
                program: program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        match write_result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(MusError::EngineFailed {
                    program: program.clone(),
                    status: output.status.to_string(),
                    stderr: format!("writing HTML to stdin failed: {e}"),
                })
            }
            Err(_) => {
                return Err(MusError::EngineFailed {
                    program: program.clone(),
                    status: output.status.to_string(),
                    stderr: "stdin writer panicked".into(),
                })
            }
        }
        if output.stdout.is_empty() {
            return Err(MusError::EmptyPdf {
                program: program.clone(),
            });
        }

        debug!("{} produced {} bytes", program, output.stdout.len());
        Ok(output.stdout)
    }
}

/// Render `html` with `engine` and write the PDF to `output_path`.
///
/// The parent directory must already exist. Returns the number of bytes
/// written.
pub fn write_pdf(
    engine: &dyn PdfEngine,
    html: &str,
    base_url: &Path,
    output_path: &Path,
) -> Result<usize, MusError> {
    let bytes = engine.render(html, base_url)?;
    write_atomic(output_path, &bytes)?;
    info!("Wrote {} ({} bytes)", output_path.display(), bytes.len());
    Ok(bytes.len())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), MusError> {
    let to_err = |e: std::io::Error| MusError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    std::fs::write(&tmp_path, bytes).map_err(to_err)?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(to_err(e));
    }
    Ok(())
}
