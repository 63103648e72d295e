//! Curve plumbing over ark-bn254: coset generators for the permutation argument and the
//! fixed-size byte encodings used by the transcript.

use anyhow::{anyhow, Result};
use ark_bn254::{Fr, G1Affine};
use ark_ff::{FftField, Field};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

/// multi-scalar multiplication
pub mod scalar_multiplication;
/// serde adapters for field and group elements
pub mod serialization;

/// Serialized size of an uncompressed G1 point.
pub const G1_SIZE: usize = 64;
/// Serialized size of a scalar field element.
pub const FR_SIZE: usize = 32;

/// Multiplicative generator of the scalar field, used as the coset shift for quotient evaluation.
#[inline]
pub fn coset_generator_base() -> Fr {
    Fr::GENERATOR
}

/// Coset shift `k_i` separating the wire columns in the permutation argument.
///
/// Column 0 (left) uses `1`, column `i` uses `g^i`. None of these lies in a power-of-two
/// subgroup, and no ratio of two of them does either, so the cosets `k_i H` are disjoint.
#[inline]
pub fn coset_generator(column: usize) -> Fr {
    coset_generator_base().pow([column as u64])
}

/// Encode a point as 64 bytes.
pub fn g1_to_buffer(point: &G1Affine) -> Vec<u8> {
    let mut buf = Vec::with_capacity(G1_SIZE);
    point
        .serialize_uncompressed(&mut buf)
        .expect("writing to a Vec cannot fail");
    buf
}

/// Decode a point written by [`g1_to_buffer`], checking it is on the curve.
pub fn g1_from_buffer(buf: &[u8]) -> Result<G1Affine> {
    G1Affine::deserialize_uncompressed(buf).map_err(|e| anyhow!("invalid G1 element: {e}"))
}

/// Encode a field element as 32 bytes.
pub fn fr_to_buffer(value: &Fr) -> Vec<u8> {
    let mut buf = Vec::with_capacity(FR_SIZE);
    value
        .serialize_uncompressed(&mut buf)
        .expect("writing to a Vec cannot fail");
    buf
}

/// Decode a field element written by [`fr_to_buffer`].
pub fn fr_from_buffer(buf: &[u8]) -> Result<Fr> {
    Fr::deserialize_uncompressed(buf).map_err(|e| anyhow!("invalid field element: {e}"))
}
