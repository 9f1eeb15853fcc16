use thiserror::Error;

/// Precondition violations reported at the API boundary.
///
/// None of these are transient: they mean the caller passed something the model
/// is not defined for, so they are never retried or clamped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IsingError {
    /// The lattice is too small for a non-degenerate 4-neighbor torus, or the
    /// supplied spin buffer does not match `rows * cols`.
    #[error("invalid lattice dimensions {rows}x{cols}: {reason}")]
    InvalidDimensions {
        rows: usize,
        cols: usize,
        reason: &'static str,
    },

    /// Direct cell access past the end of the lattice.
    #[error("cell index {index} out of range for lattice of {len} cells")]
    OutOfRange { index: usize, len: usize },

    /// A scalar argument outside the domain of the model (e.g. `beta <= 0`).
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A simulation configuration that failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, IsingError>;

/// Reject non-positive or non-finite inverse temperatures.
pub(crate) fn check_beta(beta: f64) -> Result<()> {
    if !beta.is_finite() {
        return Err(IsingError::InvalidParameter {
            name: "beta",
            reason: format!("must be finite, got {beta}"),
        });
    }
    if beta <= 0.0 {
        return Err(IsingError::InvalidParameter {
            name: "beta",
            reason: format!("must be > 0, got {beta}"),
        });
    }
    Ok(())
}
