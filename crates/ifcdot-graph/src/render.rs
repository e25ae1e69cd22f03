//! Rendering graph text through Graphviz.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use ifcdot_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Svg,
}

impl OutputFormat {
    /// Value of Graphviz's `-T` flag.
    pub fn as_arg(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
        }
    }
}

/// Turns graph text into an image.
pub trait Renderer: Send + Sync {
    /// Render graph text. A missing tool yields [`Error::RendererNotFound`].
    fn render(&self, dot: &str, format: OutputFormat) -> Result<Vec<u8>>;

    /// Whether the renderer can run at all.
    fn is_available(&self) -> bool;
}

/// Renders with the `dot` executable.
#[derive(Debug, Clone, Default)]
pub struct GraphvizRenderer {
    executable: Option<PathBuf>,
}

impl GraphvizRenderer {
    /// Use an explicit executable, or look up `dot` on `PATH` when `None`.
    pub fn new(executable: Option<PathBuf>) -> Self {
        Self { executable }
    }

    fn locate(&self) -> Result<PathBuf> {
        let program = self
            .executable
            .clone()
            .unwrap_or_else(|| PathBuf::from("dot"));
        which::which(&program).map_err(|_| {
            Error::RendererNotFound(format!(
                "{} is not installed or not on the system PATH",
                program.display()
            ))
        })
    }
}

impl Renderer for GraphvizRenderer {
    fn render(&self, dot: &str, format: OutputFormat) -> Result<Vec<u8>> {
        let program = self.locate()?;
        debug!("Rendering {} with {}", format.as_arg(), program.display());

        let mut child = Command::new(&program)
            .arg(format!("-T{}", format.as_arg()))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    Error::RendererNotFound(program.display().to_string())
                }
                _ => Error::Io(e),
            })?;

        // Graphviz reads its whole input before writing, so stdin is written
        // and closed before collecting output.
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(dot.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        if output.status.success() {
            Ok(output.stdout)
        } else {
            Err(Error::Render(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ))
        }
    }

    fn is_available(&self) -> bool {
        self.locate().is_ok()
    }
}
