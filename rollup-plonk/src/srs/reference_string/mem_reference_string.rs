use std::sync::Arc;

use anyhow::{anyhow, ensure, Result};
use ark_bn254::{Fr, G1Affine, G1Projective, G2Affine};
use ark_ec::{scalar_mul::fixed_base::FixedBase, AffineRepr, CurveGroup};
use ark_ff::{One, PrimeField};
use ark_serialize::CanonicalDeserialize;

use crate::ecc::G1_SIZE;
use crate::errors::ProofSystemError;

use super::{ProverReferenceString, ReferenceStringFactory, VerifierReferenceString};

/// `[x]_2` held in memory.
#[derive(Debug, Clone)]
pub struct VerifierMemReferenceString {
    g2_x: G2Affine,
}

impl VerifierMemReferenceString {
    /// Decode an uncompressed G2 point.
    pub fn new(g2x: &[u8]) -> Result<Self> {
        let g2_x = G2Affine::deserialize_uncompressed(g2x)
            .map_err(|e| anyhow!("failed to deserialize g2_x: {e}"))?;
        Ok(Self { g2_x })
    }

    /// Wrap an existing point.
    pub fn from_affine(g2_x: G2Affine) -> Self {
        Self { g2_x }
    }
}

impl VerifierReferenceString for VerifierMemReferenceString {
    fn get_g2x(&self) -> G2Affine {
        self.g2_x
    }
}

/// Monomial points held in memory, shared between every prover that asks for them.
#[derive(Debug, Clone)]
pub struct MemProverReferenceString {
    monomials: Arc<Vec<G1Affine>>,
}

impl ProverReferenceString for MemProverReferenceString {
    fn get_monomial_points(&self) -> Arc<Vec<G1Affine>> {
        self.monomials.clone()
    }

    fn get_monomial_size(&self) -> usize {
        self.monomials.len()
    }
}

/// Factory over an in-memory setup.
#[derive(Debug, Clone)]
pub struct MemReferenceStringFactory {
    monomials: Arc<Vec<G1Affine>>,
    g2_x: G2Affine,
}

impl MemReferenceStringFactory {
    /// Build from concatenated uncompressed G1 points and one uncompressed G2 point.
    pub fn new(g1_bytes: &[u8], g2_bytes: &[u8]) -> Result<Self> {
        ensure!(
            g1_bytes.len() % G1_SIZE == 0,
            "G1 buffer length {} is not a multiple of {}",
            g1_bytes.len(),
            G1_SIZE
        );
        let monomials = g1_bytes
            .chunks(G1_SIZE)
            .map(crate::ecc::g1_from_buffer)
            .collect::<Result<Vec<_>>>()?;
        let g2_x = VerifierMemReferenceString::new(g2_bytes)?.get_g2x();
        Ok(Self {
            monomials: Arc::new(monomials),
            g2_x,
        })
    }

    /// Build from points that are already decoded.
    pub fn from_points(monomials: Vec<G1Affine>, g2_x: G2Affine) -> Self {
        Self {
            monomials: Arc::new(monomials),
            g2_x,
        }
    }

    /// Build a setup of `size` points from a known toxic-waste scalar. Only for tests and benches.
    pub fn from_secret(secret: Fr, size: usize) -> Self {
        let mut scalars = Vec::with_capacity(size);
        let mut acc = Fr::one();
        for _ in 0..size {
            scalars.push(acc);
            acc *= secret;
        }
        let scalar_bits = Fr::MODULUS_BIT_SIZE as usize;
        let window = FixedBase::get_mul_window_size(size);
        let table = FixedBase::get_window_table(
            scalar_bits,
            window,
            G1Affine::generator().into_group(),
        );
        let powers = FixedBase::msm::<G1Projective>(scalar_bits, window, &table, &scalars);
        let monomials = G1Projective::normalize_batch(&powers);
        let g2_x = (G2Affine::generator() * secret).into_affine();
        Self::from_points(monomials, g2_x)
    }
}

impl ReferenceStringFactory for MemReferenceStringFactory {
    fn get_prover_crs(&self, size: usize) -> Result<Arc<dyn ProverReferenceString>> {
        if size > self.monomials.len() {
            return Err(ProofSystemError::InsufficientReferenceString {
                required: size,
                available: self.monomials.len(),
            }
            .into());
        }
        Ok(Arc::new(MemProverReferenceString {
            monomials: self.monomials.clone(),
        }))
    }

    fn get_verifier_crs(&self) -> Result<Arc<dyn VerifierReferenceString>> {
        Ok(Arc::new(VerifierMemReferenceString::from_affine(self.g2_x)))
    }
}
