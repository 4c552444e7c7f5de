//! Error types for the blob controller.

use crate::config::ConfigError;
use crate::vocabulary::Output;

/// Errors raised while building or running a [`crate::Controller`].
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// The configuration file could not be loaded.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The configuration was rejected by the inference engine, or a tick
    /// hit an engine contract violation.
    #[error("fuzzy engine error: {source}")]
    Engine {
        /// The underlying engine error.
        #[from]
        source: blob_fuzzy::FuzzyError,
    },

    /// The engine produced no value for an output it was configured with.
    #[error("engine produced no value for output {0}")]
    MissingOutput(Output),
}
