//! dp-core: shared foundation for dynprop.
//!
//! Contains:
//! - numeric (finite and positive checks)
//! - error (shared error types)

pub mod error;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::{DpError, DpResult};
pub use numeric::*;
