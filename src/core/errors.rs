use std::path::PathBuf;
use thiserror::Error;

/// Errors that end a build run.
///
/// Material depletion is not an error: it is captured as a unit outcome and
/// surfaces through the depletion flag and the final report.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The inventory service or a floor's task group could not be started
    #[error("setup failure: {0}")]
    Setup(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to load configuration from {}: {reason}", path.display())]
    ConfigLoad { path: PathBuf, reason: String },
    /// The inventory channel closed while the caller still needed an answer
    #[error("material inventory unavailable: {0}")]
    InventoryUnavailable(String),
}
