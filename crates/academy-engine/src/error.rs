//! Error types for the Academy engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup and the frame loop.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: academy_core::config::ConfigError,
    },

    /// Session creation or stepping failed.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: academy_core::session::SessionError,
    },

    /// Serializing the final snapshot failed.
    #[error("output error: {source}")]
    Output {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
