/// Reference strings loaded from Ignition transcript files.
pub mod file_reference_string;
/// Reference strings held in memory.
pub mod mem_reference_string;

use std::fmt::Debug;
use std::sync::Arc;

use anyhow::Result;
use ark_bn254::{G1Affine, G2Affine};

/// The verifier's half of the setup: `[x]_2`.
pub trait VerifierReferenceString: Debug + Send + Sync {
    /// `[x]_2`
    fn get_g2x(&self) -> G2Affine;
}

/// The prover's half of the setup: the monomial points `[x^i]_1`.
pub trait ProverReferenceString: Debug + Send + Sync {
    /// `[1]_1, [x]_1, [x^2]_1, ...`
    fn get_monomial_points(&self) -> Arc<Vec<G1Affine>>;
    /// number of monomial points
    fn get_monomial_size(&self) -> usize;
}

/// Hands out reference strings to composers, provers and verifiers.
/// Constructed once by the caller and shared read-only.
pub trait ReferenceStringFactory: Debug + Send + Sync {
    /// A prover string with at least `size` monomial points.
    fn get_prover_crs(&self, size: usize) -> Result<Arc<dyn ProverReferenceString>>;
    /// The verifier string.
    fn get_verifier_crs(&self) -> Result<Arc<dyn VerifierReferenceString>>;
}
