use thiserror::Error;

/// Everything that can abort proof generation or one of its building blocks.
///
/// Verification never produces one of these; see [`crate::verifier::Rejection`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Groth16Error {
    /// Division by, or inversion of, the additive identity of the scalar field.
    #[error("attempted to invert zero in the scalar field")]
    FieldInversionOfZero,

    /// The entropy source failed while drawing the blinding scalars.
    #[error("randomness unavailable: {message}")]
    RandomnessFailure { message: String },

    /// Two sequences that must line up do not.
    #[error("{context}: expected {expected} elements, got {actual}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The proving or verification key violates one of its length invariants.
    #[error("malformed key: {message}")]
    MalformedKey { message: String },

    /// MSM window size outside of what a table can index.
    #[error("invalid MSM window size {0}")]
    InvalidWindowSize(usize),

    /// The scalar field has no roots of unity of the requested order.
    #[error("FFT domain of depth {depth} exceeds the field's two-adicity {max}")]
    DomainTooLarge { depth: usize, max: usize },

    #[error("invalid configuration: {message}")]
    Config { message: String },
}

pub type Result<T> = std::result::Result<T, Groth16Error>;
