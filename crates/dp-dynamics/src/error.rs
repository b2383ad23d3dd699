//! Error types for dynamics solvers.

use dp_core::DpError;
use dp_property::PropertyError;
use thiserror::Error;

/// Errors raised while configuring or evaluating a dynamics solver.
#[derive(Error, Debug)]
pub enum DynamicsError {
    #[error("Initializer error: {0}")]
    Property(#[from] PropertyError),

    #[error(transparent)]
    Core(#[from] DpError),

    #[error("Unknown dynamics solver type: {name}")]
    UnknownSolver { name: String },

    #[error("Dimension mismatch for {what}: expected {expected}, got {got}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Scene mismatch: {what}")]
    Scene { what: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Not supported: {what}")]
    NotSupported { what: &'static str },
}

pub type DynamicsResult<T> = Result<T, DynamicsError>;

impl From<DynamicsError> for DpError {
    fn from(e: DynamicsError) -> Self {
        match e {
            DynamicsError::Core(inner) => inner,
            DynamicsError::DimensionMismatch {
                what,
                expected,
                got,
            } => DpError::DimensionMismatch {
                what,
                expected,
                got,
            },
            other => DpError::Config {
                what: other.to_string(),
            },
        }
    }
}
