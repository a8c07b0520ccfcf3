//! Error types for the magtrace library

use thiserror::Error;

/// Errors produced by the magtrace core.
///
/// Degraded sensor conditions (missing pose, zero-length vectors, double
/// start/stop) are deliberately *not* errors; they resolve to documented
/// fallback behavior. This enum covers the cases that genuinely cannot
/// proceed.
#[derive(Debug, Error)]
pub enum Error {
    /// The payload did not parse, or a point violates the schema
    /// (missing or non-numeric field, wrong arity).
    ///
    /// Decoding is all-or-nothing: a batch that fails imports nothing.
    #[error("malformed field data: {0}")]
    MalformedData(#[from] serde_json::Error),

    /// The payload parsed but carries a format version this build does not
    /// understand.
    #[error("unsupported payload version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// A 3x3 matrix handed in as a device attitude is not a rotation.
    #[error("matrix is not a rotation: {0}")]
    NonOrthonormal(&'static str),
}
