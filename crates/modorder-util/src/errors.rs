use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all modorder operations.
#[derive(Debug, Error, Diagnostic)]
pub enum ModorderError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or malformed load-order profile.
    #[error("Profile error: {message}")]
    #[diagnostic(help("Check the profile file for syntax errors"))]
    Profile { message: String },

    /// External mod registry rejected an entry or could not be written.
    #[error("Registry error: {message}")]
    Registry { message: String },

    /// Load order could not be derived (e.g. contradictory constraints).
    #[error("Load order resolution failed: {message}")]
    Resolution { message: String },

    /// Mods directory scan failed.
    #[error("Scan error: {message}")]
    Scan { message: String },

    /// Launcher configuration could not be read.
    #[error("Config error: {message}")]
    #[diagnostic(help("Check ~/.modorder/config.toml"))]
    Config { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}
