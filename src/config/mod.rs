//! Configuration loading and types for folio.
//!
//! This module handles all aspects of configuration:
//! - Type definitions for config structures (`types`)
//! - Loading configs from files and the environment (`load`)

mod load;
mod types;

pub use types::{
    AnchorConfig, Config, HighlightConfig, ImageConfig, MarkdownConfig, ReadingTimeConfig,
};

/// Default config file name, looked up relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "folio.yaml";

/// Prefix for environment variable overrides (`FOLIO_DEV__PORT=8081`).
pub const ENV_PREFIX: &str = "FOLIO";

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to encode config file path as a unicode string: {0}")]
    EncodePath(std::path::PathBuf),

    #[error("failed to load config: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("failed to get current working directory: {0}")]
    CwdFailure(std::io::Error),

    #[error("{0}")]
    Validation(String),
}
