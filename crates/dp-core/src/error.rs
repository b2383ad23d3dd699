use thiserror::Error;

pub type DpResult<T> = Result<T, DpError>;

#[derive(Error, Debug)]
pub enum DpError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Dimension mismatch for {what}: expected {expected}, got {got}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Configuration error: {what}")]
    Config { what: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_mismatch_display() {
        let err = DpError::DimensionMismatch {
            what: "state",
            expected: 4,
            got: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("state"));
        assert!(msg.contains("expected 4"));
    }
}
