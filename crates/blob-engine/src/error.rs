//! Error types for the simulation engine.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and simulation execution.

/// Top-level error for the simulation engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: blob_driver::ConfigError,
    },

    /// The controller could not be built or failed during a tick.
    #[error("driver error: {source}")]
    Driver {
        /// The underlying driver error.
        #[from]
        source: blob_driver::DriverError,
    },

    /// A simulation parameter is out of range.
    #[error("invalid parameter {field}: {reason}")]
    InvalidParameter {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// The run report could not be serialized.
    #[error("report serialization failed: {source}")]
    Report {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
