//! Error types for ifcdot.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Parse error at byte {offset}: {message}")]
    Parse { offset: usize, message: String },

    #[error("Unresolved reference #{id}: {message}")]
    Reference { id: u64, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Graphviz executable not found: {0}")]
    RendererNotFound(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn parse(offset: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            offset,
            message: message.into(),
        }
    }

    pub fn reference(id: u64, message: impl Into<String>) -> Self {
        Self::Reference {
            id,
            message: message.into(),
        }
    }

    /// Whether the renderer executable is missing (a partial-success condition).
    pub fn is_renderer_missing(&self) -> bool {
        matches!(self, Self::RendererNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
