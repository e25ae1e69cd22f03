//! ifcdot core: error type, configuration, data directories.

pub mod config;
pub mod error;

pub use config::{DataPaths, ExampleModel, IfcDotConfig};
pub use error::{Error, Result};
