//! Error types for rule table operations

use thiserror::Error;

/// Errors that can occur while building or loading a rule table
#[derive(Error, Debug)]
pub enum RuleError {
    /// TOML could not be parsed into the rule file format
    #[error("Failed to parse rule table: {0}")]
    Parse(#[from] toml::de::Error),

    /// A rule is structurally invalid
    #[error("Invalid rule #{index} ('{label}'): {reason}")]
    InvalidRule {
        /// Position of the rule in declaration order
        index: usize,
        /// Label of the offending rule
        label: String,
        /// Description of the problem
        reason: String,
    },

    /// No built-in table for this locale
    #[error("Unknown rule table locale: {0}")]
    UnknownLocale(String),

    /// Rule file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
