use thiserror::Error;

/// Failures of the proving and verification machinery.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProofSystemError {
    /// The reference string has fewer monomial points than the circuit needs.
    #[error("reference string holds {available} points but {required} are required")]
    InsufficientReferenceString {
        /// points needed
        required: usize,
        /// points loaded
        available: usize,
    },
    /// A transcript element was requested that was never added.
    #[error("transcript element {0} not found")]
    MissingTranscriptElement(String),
    /// A challenge was requested that has not been derived yet.
    #[error("challenge {0} not found")]
    MissingChallenge(String),
    /// The serialized proof does not match the manifest.
    #[error("malformed proof: {0}")]
    MalformedProof(String),
    /// The quotient numerator is not divisible by the vanishing polynomial.
    #[error("quotient polynomial has non-zero coefficient at index {0}")]
    QuotientDegreeTooLarge(usize),
    /// The public inputs supplied to the verifier do not match the key.
    #[error("expected {expected} public inputs, got {actual}")]
    PublicInputCount {
        /// count recorded in the key
        expected: usize,
        /// count found in the proof
        actual: usize,
    },
}

/// A named constraint that the current witness does not satisfy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("circuit check failed: {0}")]
pub struct CircuitError(pub String);

impl CircuitError {
    /// The failure tag.
    pub fn tag(&self) -> &str {
        &self.0
    }
}
