use ark_bn254::{Fr, G1Affine, G1Projective};
use ark_ec::{CurveGroup, VariableBaseMSM};
use tracing::trace;

/// Compute `sum_i scalars[i] * points[i]`.
///
/// Only the first `min(scalars.len(), points.len())` pairs take part, so a reference string
/// longer than the polynomial can be passed directly.
pub fn pippenger(scalars: &[Fr], points: &[G1Affine]) -> G1Affine {
    let num_points = scalars.len().min(points.len());
    trace!("pippenger over {} points", num_points);
    G1Projective::msm_unchecked(&points[..num_points], &scalars[..num_points]).into_affine()
}
