use anyhow::{ensure, Result};
use ark_bn254::{Bn254, Fr, G1Affine, G1Projective, G2Affine};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::Zero;
use tracing::trace;

use crate::ecc::scalar_multiplication::pippenger;
use crate::errors::ProofSystemError;
use crate::polynomials::polynomial_arithmetic;
use crate::srs::reference_string::ProverReferenceString;

/// Polynomial commitments with batched openings.
pub trait CommitmentScheme {
    /// Commit to a polynomial in coefficient form.
    fn commit(
        &self,
        coefficients: &[Fr],
        reference_string: &dyn ProverReferenceString,
    ) -> Result<G1Affine>;

    /// Replace `F` by `(F(X) - F(z)) / (X - z)` and return `F(z)`.
    fn compute_opening_polynomial(&self, coefficients: &mut [Fr], z: &Fr) -> Result<Fr>;

    /// Commit to the opening at `z` of `sum_i challenges[i] * polynomials[i]`.
    fn batch_open(
        &self,
        polynomials: &[&[Fr]],
        challenges: &[Fr],
        z: &Fr,
        reference_string: &dyn ProverReferenceString,
    ) -> Result<G1Affine>;

    /// Check a two-point batch opening with one pairing equation.
    fn batch_verify(&self, claim: &BatchOpeningClaim, g2_x: &G2Affine) -> bool;
}

/// What a verifier has assembled for a batch opening at `z` and `z * omega`.
///
/// `scalars`/`points` describe `F = sum_i nu_i [f_i] + u sum_j nu_j [g_j]`, the batched
/// commitment of everything opened, and `batch_evaluation` is `E`, the same combination
/// of the claimed evaluations.
#[derive(Debug, Clone, Default)]
pub struct BatchOpeningClaim {
    /// multipliers of `points`
    pub scalars: Vec<Fr>,
    /// commitments
    pub points: Vec<G1Affine>,
    /// claimed evaluation of the batched polynomial
    pub batch_evaluation: Fr,
    /// first opening point
    pub z: Fr,
    /// second opening point
    pub z_omega: Fr,
    /// `[W_z]`
    pub opening_z: G1Affine,
    /// `[W_{z omega}]`
    pub opening_z_omega: G1Affine,
    /// separates the two openings
    pub separator: Fr,
}

/// KZG commitments over the bn254 reference string.
#[derive(Debug, Default, Clone, Copy)]
pub struct KateCommitmentScheme;

impl CommitmentScheme for KateCommitmentScheme {
    fn commit(
        &self,
        coefficients: &[Fr],
        reference_string: &dyn ProverReferenceString,
    ) -> Result<G1Affine> {
        let available = reference_string.get_monomial_size();
        if coefficients.len() > available {
            return Err(ProofSystemError::InsufficientReferenceString {
                required: coefficients.len(),
                available,
            }
            .into());
        }
        let points = reference_string.get_monomial_points();
        Ok(pippenger(coefficients, &points))
    }

    fn compute_opening_polynomial(&self, coefficients: &mut [Fr], z: &Fr) -> Result<Fr> {
        let n = coefficients.len();
        polynomial_arithmetic::compute_kate_opening_coefficients_inplace(coefficients, z, n)
    }

    fn batch_open(
        &self,
        polynomials: &[&[Fr]],
        challenges: &[Fr],
        z: &Fr,
        reference_string: &dyn ProverReferenceString,
    ) -> Result<G1Affine> {
        ensure!(
            polynomials.len() == challenges.len(),
            "{} polynomials but {} challenges",
            polynomials.len(),
            challenges.len()
        );
        let n = polynomials.iter().map(|p| p.len()).max().unwrap_or(0);
        let mut batched = vec![Fr::zero(); n];
        for (polynomial, challenge) in polynomials.iter().zip(challenges) {
            polynomial_arithmetic::add_scaled(&mut batched, polynomial, challenge);
        }
        trace!("opening {} polynomials at one point", polynomials.len());
        self.compute_opening_polynomial(&mut batched, z)?;
        self.commit(&batched, reference_string)
    }

    fn batch_verify(&self, claim: &BatchOpeningClaim, g2_x: &G2Affine) -> bool {
        // e(W_z + u W_zw, [x]) == e(z W_z + u zw W_zw + F - E [1], [1])
        let lhs = claim.opening_z.into_group() + claim.opening_z_omega * claim.separator;

        let mut rhs: G1Projective = pippenger(&claim.scalars, &claim.points).into_group();
        rhs += claim.opening_z * claim.z;
        rhs += claim.opening_z_omega * (claim.separator * claim.z_omega);
        rhs -= G1Affine::generator() * claim.batch_evaluation;

        let lhs = lhs.into_affine();
        let rhs = rhs.into_affine();
        Bn254::pairing(lhs, *g2_x) == Bn254::pairing(rhs, G2Affine::generator())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polynomials::polynomial_arithmetic::evaluate;
    use crate::srs::reference_string::mem_reference_string::MemReferenceStringFactory;
    use crate::srs::reference_string::ReferenceStringFactory;
    use ark_ff::One;
    use ark_std::UniformRand;

    fn random_polynomial(n: usize, rng: &mut impl ark_std::rand::RngCore) -> Vec<Fr> {
        (0..n).map(|_| Fr::rand(rng)).collect()
    }

    #[test]
    fn commitment_is_evaluation_at_the_secret() {
        let mut rng = ark_std::test_rng();
        let secret = Fr::rand(&mut rng);
        let factory = MemReferenceStringFactory::from_secret(secret, 16);
        let crs = factory.get_prover_crs(16).unwrap();
        let f = random_polynomial(16, &mut rng);
        let commitment = KateCommitmentScheme.commit(&f, crs.as_ref()).unwrap();
        let expected = (G1Affine::generator() * evaluate(&f, &secret, 16)).into_affine();
        assert_eq!(commitment, expected);
    }

    #[test]
    fn commit_rejects_oversized_polynomial() {
        let factory = MemReferenceStringFactory::from_secret(Fr::from(5u64), 4);
        let crs = factory.get_prover_crs(4).unwrap();
        let err = KateCommitmentScheme
            .commit(&[Fr::one(); 5], crs.as_ref())
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ProofSystemError>(),
            Some(&ProofSystemError::InsufficientReferenceString {
                required: 5,
                available: 4
            })
        );
    }

    #[test]
    fn batch_open_then_verify() {
        let mut rng = ark_std::test_rng();
        let n = 16;
        let factory = MemReferenceStringFactory::from_secret(Fr::rand(&mut rng), n);
        let crs = factory.get_prover_crs(n).unwrap();
        let g2_x = factory.get_verifier_crs().unwrap().get_g2x();
        let scheme = KateCommitmentScheme;

        let f: Vec<Vec<Fr>> = (0..3).map(|_| random_polynomial(n, &mut rng)).collect();
        let g = random_polynomial(n, &mut rng);
        let z = Fr::rand(&mut rng);
        let z_omega = Fr::rand(&mut rng);
        let nu = Fr::rand(&mut rng);
        let separator = Fr::rand(&mut rng);
        let nu_powers = [Fr::one(), nu, nu * nu, nu * nu * nu];

        let opening_z = scheme
            .batch_open(
                &[&f[0], &f[1], &f[2]],
                &nu_powers[..3],
                &z,
                crs.as_ref(),
            )
            .unwrap();
        let opening_z_omega = scheme
            .batch_open(&[&g], &nu_powers[3..], &z_omega, crs.as_ref())
            .unwrap();

        let mut claim = BatchOpeningClaim {
            z,
            z_omega,
            opening_z,
            opening_z_omega,
            separator,
            ..BatchOpeningClaim::default()
        };
        for (i, poly) in f.iter().enumerate() {
            claim.scalars.push(nu_powers[i]);
            claim.points.push(scheme.commit(poly, crs.as_ref()).unwrap());
            claim.batch_evaluation += nu_powers[i] * evaluate(poly, &z, n);
        }
        claim.scalars.push(nu_powers[3] * separator);
        claim.points.push(scheme.commit(&g, crs.as_ref()).unwrap());
        claim.batch_evaluation += nu_powers[3] * separator * evaluate(&g, &z_omega, n);

        assert!(scheme.batch_verify(&claim, &g2_x));

        claim.batch_evaluation += Fr::one();
        assert!(!scheme.batch_verify(&claim, &g2_x));
    }

    #[test]
    fn opening_polynomial_divides_exactly() {
        let mut rng = ark_std::test_rng();
        let n = 32;
        let f = random_polynomial(n, &mut rng);
        let z = Fr::rand(&mut rng);
        let mut w = f.clone();
        let f_z = KateCommitmentScheme
            .compute_opening_polynomial(&mut w, &z)
            .unwrap();
        assert_eq!(f_z, evaluate(&f, &z, n));
        // W(x) (x - z) == F(x) - F(z) at random points
        for _ in 0..4 {
            let x = Fr::rand(&mut rng);
            assert_eq!(evaluate(&w, &x, n) * (x - z), evaluate(&f, &x, n) - f_z);
        }
    }
}
