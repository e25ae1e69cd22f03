//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8501;
/// Default upload limit in megabytes.
pub const DEFAULT_MAX_UPLOAD_MB: usize = 64;

/// Paths to all ifcdot data directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// Downloaded example models (`data/examples/`).
    pub example_cache: PathBuf,
    /// Example catalogue (`data/examples.json`).
    pub examples_file: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates directories if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let paths = Self {
            example_cache: root.join("examples"),
            examples_file: root.join("examples.json"),
            root,
        };
        paths.ensure_dirs()?;
        Ok(paths)
    }

    fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::create_dir_all(&self.example_cache)?;
        Ok(())
    }
}

/// A named example model that can be fetched from a remote location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleModel {
    pub name: String,
    pub url: String,
}

/// Top-level ifcdot configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IfcDotConfig {
    /// HTTP server port.
    pub port: u16,
    /// Data directory paths.
    pub data_paths: DataPaths,
    /// Explicit Graphviz `dot` executable; looked up on `PATH` when unset.
    pub dot_path: Option<PathBuf>,
    /// Maximum accepted upload size in bytes.
    pub max_upload_bytes: usize,
    /// Example models offered for selection.
    pub examples: Vec<ExampleModel>,
}

impl IfcDotConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let dot_path = std::env::var("IFCDOT_DOT_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let max_upload_mb = std::env::var("IFCDOT_MAX_UPLOAD_MB")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_UPLOAD_MB);

        let mut data_paths = DataPaths::new(data_dir)?;
        if let Ok(file) = std::env::var("IFCDOT_EXAMPLES_FILE") {
            data_paths.examples_file = PathBuf::from(file);
        }

        let examples = load_examples(&data_paths.examples_file);

        Ok(Self {
            port,
            data_paths,
            dot_path,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            examples,
        })
    }

    /// Look up a configured example by name.
    pub fn example(&self, name: &str) -> Option<&ExampleModel> {
        self.examples.iter().find(|e| e.name == name)
    }
}

/// Load the example catalogue. A missing file yields an empty list.
pub fn load_examples(path: &Path) -> Vec<ExampleModel> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(_) => return Vec::new(),
    };
    match serde_json::from_str(&data) {
        Ok(examples) => examples,
        Err(e) => {
            warn!("Ignoring malformed example catalogue {}: {}", path.display(), e);
            Vec::new()
        }
    }
}
