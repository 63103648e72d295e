use anyhow::{ensure, Result};
use ark_bn254::Fr;
use rayon::prelude::*;

use crate::{
    plonk::proof_system::{
        types::polynomial_manifest::PolynomialIndex,
        widgets::{challenge, evaluation, EvaluationContext, LinearTerms, ProverPolynomials},
    },
    polynomials::EvaluationDomain,
    transcript::{BarretenHasher, Transcript},
};

/// Label of the public input polynomial's coset evaluations in the witness store.
pub(crate) const PUBLIC_INPUTS_FFT: &str = "public_inputs_fft";

/// `PI(zeta) = -sum_i x_i L_i(zeta)`.
pub fn compute_public_input_evaluation(
    domain: &EvaluationDomain,
    public_inputs: &[Fr],
    zeta: &Fr,
) -> Fr {
    public_inputs
        .iter()
        .enumerate()
        .map(|(i, x)| -(*x * domain.compute_lagrange_evaluation(i, zeta)))
        .sum()
}

/// `q_m w_1 w_2 + q_1 w_1 + q_2 w_2 + q_3 w_3 + q_c + PI(X) = 0`.
///
/// `PI(ω^i) = -x_i` on the public input rows, where `w_1 = x_i` and `q_1 = 1`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArithmeticWidget;

impl ArithmeticWidget {
    /// Add `alpha_base * (arithmetic identity)` on the 4n coset.
    pub fn compute_quotient_contribution<H: BarretenHasher>(
        polys: &ProverPolynomials<'_>,
        alpha_base: Fr,
        transcript: &Transcript<H>,
        quotient: &mut [Fr],
    ) -> Result<Fr> {
        use PolynomialIndex::*;
        let alpha = challenge(transcript, "alpha", 0)?;
        let q_m = polys.coset_values(QM)?;
        let q_c = polys.coset_values(QC)?;
        let q_1 = polys.coset_values(Q1)?;
        let q_2 = polys.coset_values(Q2)?;
        let q_3 = polys.coset_values(Q3)?;
        let w_1 = polys.coset_values(W1)?;
        let w_2 = polys.coset_values(W2)?;
        let w_3 = polys.coset_values(W3)?;
        let public_inputs = polys.coset_values_of(PUBLIC_INPUTS_FFT)?;
        ensure!(
            [q_m, q_c, q_1, q_2, q_3, w_1, w_2, w_3, public_inputs]
                .iter()
                .all(|p| p.len() == quotient.len()),
            "coset evaluations have the wrong size"
        );

        quotient.par_iter_mut().enumerate().for_each(|(j, t)| {
            let (a, b, c) = (w_1[j], w_2[j], w_3[j]);
            let gate = q_m[j] * a * b + q_1[j] * a + q_2[j] * b + q_3[j] * c + q_c[j];
            *t += alpha_base * (gate + public_inputs[j]);
        });
        Ok(alpha_base * alpha)
    }

    /// Selector multiples in the linearisation polynomial.
    pub fn compute_linear_terms<H: BarretenHasher>(
        alpha_base: Fr,
        transcript: &Transcript<H>,
    ) -> Result<(LinearTerms, Fr)> {
        use PolynomialIndex::*;
        let alpha = challenge(transcript, "alpha", 0)?;
        let w_1 = evaluation(transcript, W1, false)?;
        let w_2 = evaluation(transcript, W2, false)?;
        let w_3 = evaluation(transcript, W3, false)?;
        Ok((
            vec![
                (QM, alpha_base * w_1 * w_2),
                (Q1, alpha_base * w_1),
                (Q2, alpha_base * w_2),
                (Q3, alpha_base * w_3),
                (QC, alpha_base),
            ],
            alpha_base * alpha,
        ))
    }

    /// The public input term is the only constant: `alpha_base * PI(zeta)`.
    pub fn compute_quotient_evaluation_contribution<H: BarretenHasher>(
        context: &EvaluationContext,
        alpha_base: Fr,
        transcript: &Transcript<H>,
        numerator: &mut Fr,
    ) -> Result<Fr> {
        let alpha = challenge(transcript, "alpha", 0)?;
        *numerator += alpha_base * context.public_input_evaluation;
        Ok(alpha_base * alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plonk::proof_system::types::prover_settings::{Settings, StandardSettings};
    use crate::polynomials::LagrangeEvaluations;
    use crate::transcript::Keccak256;
    use ark_ff::{One, Zero};

    fn transcript_at_nu() -> Transcript<Keccak256> {
        let manifest = StandardSettings::create_manifest(0);
        let mut transcript = Transcript::<Keccak256>::new(manifest, 16);
        transcript.mock_inputs_prior_to_challenge("nu", 8).unwrap();
        transcript.add_field_element("w_1", &Fr::from(2u64));
        transcript.add_field_element("w_2", &Fr::from(3u64));
        transcript.add_field_element("w_3", &Fr::from(5u64));
        transcript
    }

    #[test]
    fn linear_terms_scale_selectors_by_evaluations() {
        let transcript = transcript_at_nu();
        let alpha = transcript.get_challenge_field_element("alpha", 0).unwrap();
        let alpha_base = alpha * alpha;
        let (terms, next) = ArithmeticWidget::compute_linear_terms(alpha_base, &transcript).unwrap();
        assert_eq!(next, alpha_base * alpha);
        let scalar = |index: PolynomialIndex| {
            terms
                .iter()
                .find(|(i, _)| *i == index)
                .map(|(_, s)| *s)
                .unwrap()
        };
        assert_eq!(scalar(PolynomialIndex::QM), alpha_base * Fr::from(6u64));
        assert_eq!(scalar(PolynomialIndex::Q1), alpha_base * Fr::from(2u64));
        assert_eq!(scalar(PolynomialIndex::Q3), alpha_base * Fr::from(5u64));
        assert_eq!(scalar(PolynomialIndex::QC), alpha_base);
    }

    #[test]
    fn public_inputs_are_the_constant_term() {
        let transcript = transcript_at_nu();
        let context = EvaluationContext {
            zeta: Fr::from(11u64),
            lagrange: LagrangeEvaluations {
                vanishing_poly: Fr::one(),
                l_1: Fr::zero(),
                l_n_minus_1: Fr::zero(),
            },
            public_input_evaluation: Fr::from(7u64),
        };
        let mut numerator = Fr::from(1u64);
        ArithmeticWidget::compute_quotient_evaluation_contribution(
            &context,
            Fr::from(3u64),
            &transcript,
            &mut numerator,
        )
        .unwrap();
        assert_eq!(numerator, Fr::from(22u64));
    }

    #[test]
    fn public_input_polynomial_cancels_public_rows() {
        let domain = EvaluationDomain::new(8).unwrap();
        let inputs = [Fr::from(4u64), Fr::from(9u64)];
        // on a domain point the sum picks out a single input
        assert_eq!(
            compute_public_input_evaluation(&domain, &inputs, &domain.element(1)),
            -Fr::from(9u64)
        );
        assert!(compute_public_input_evaluation(&domain, &inputs, &domain.element(5)).is_zero());
        assert!(compute_public_input_evaluation(&domain, &[], &Fr::from(3u64)).is_zero());
    }
}
