//! Error types for the player binary.
//!
//! [`PlayerError`] wraps every failure mode between loading the config
//! and the end of playback, so `main` can propagate with `?`.

/// Top-level error for the player binary.
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: stepwise_core::config::ConfigError,
    },

    /// The engine rejected a playback setting.
    #[error("playback error: {source}")]
    Playback {
        /// The underlying playback error.
        #[from]
        source: stepwise_core::engine::PlaybackError,
    },

    /// The producer failed or broke its contract.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: stepwise_core::session::SessionError,
    },

    /// `demo.algorithm` names no known producer.
    #[error("unknown algorithm {name:?}, expected one of: {known}")]
    UnknownAlgorithm {
        /// The name from the configuration.
        name: String,
        /// Comma-separated list of valid names.
        known: String,
    },

    /// The configured input cannot be fed to the chosen algorithm.
    #[error("invalid demo input: {reason}")]
    InvalidInput {
        /// What is wrong with the input.
        reason: String,
    },
}
