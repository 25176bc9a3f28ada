//! Error types for experiment, curve and figure construction.

use thiserror::Error;

use crate::distributions::DistributionError;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Crate error taxonomy.
///
/// Errors are raised at the point of detection and propagated to the
/// caller; nothing here is retried or partially recovered.
#[derive(Error, Debug)]
pub enum Error {
    /// Bad checkpoints, grids, or distribution parameters.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Analytic function evaluated outside its domain.
    #[error("domain error: {0}")]
    DomainError(String),

    /// Drawing backend failure.
    #[error("render error: {0}")]
    Render(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DistributionError> for Error {
    fn from(err: DistributionError) -> Self {
        Error::InvalidConfiguration(err.to_string())
    }
}
