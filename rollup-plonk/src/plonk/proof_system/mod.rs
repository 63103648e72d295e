/// Kate commitments and batch openings.
pub mod commitment_scheme;
pub(crate) mod constants;
/// The prover.
pub mod prover;
/// Preprocessed polynomials of a circuit.
pub mod proving_key;
/// Proofs, settings and the polynomial manifest.
pub mod types;
pub(crate) mod utils;
/// Commitments to the preprocessed polynomials.
pub mod verification_key;
/// The verifier.
pub mod verifier;
/// Per-gate-type contributions to the quotient and its opening.
pub mod widgets;
