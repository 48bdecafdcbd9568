//! Error types for the quitlog_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for quitlog_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or writing the record, journal, config or export failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Record or journal line is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Timeline export failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Config file is not valid TOML
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Pricing settings that cannot produce a cigarette price
    #[error("Configuration error: {0}")]
    Config(String),

    /// A stored record breaks the timeline rules
    #[error("Invalid record: {0}")]
    Record(String),

    /// Transition into the state the user is already in
    #[error("Already in the requested state (smoking: {smoking})")]
    Transition { smoking: bool },

    /// Questionnaire input rejected or cut short
    #[error("Input error: {0}")]
    Input(String),

    /// No stored profile, or a stored profile that cannot take the
    /// requested action
    #[error("Profile error: {0}")]
    State(String),
}
