//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Kinship operation failed
    #[error("{0}")]
    Kinship(#[from] kinship_service::KinshipError),

    /// Family file could not be read or written
    #[error("Store error: {0}")]
    Store(#[from] kinship_store::StoreError),

    /// Rule table could not be loaded
    #[error("Rule error: {0}")]
    Rule(#[from] kinship_rules::RuleError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No family file given on the command line or in the config
    #[error("No family file. Pass --file or set family_file in the config.")]
    NoFamilyFile,
}
