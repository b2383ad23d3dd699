use crate::DpError;

pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, DpError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(DpError::NonFinite { what, value: v })
    }
}

/// Require a strictly positive, finite value (time steps, masses, lengths).
pub fn ensure_positive(v: f64, what: &'static str) -> Result<f64, DpError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(DpError::InvalidArg {
            what: format!("{what} must be positive (got {v})"),
        })
    }
}
