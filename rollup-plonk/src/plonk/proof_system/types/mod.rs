/// Which polynomials a circuit commits to and how they are opened.
pub mod polynomial_manifest;
/// Serialized proofs.
pub mod proof;
/// Protocol parameters per composer type.
pub mod prover_settings;

pub use polynomial_manifest::PolynomialManifest;
pub use proof::Proof;
