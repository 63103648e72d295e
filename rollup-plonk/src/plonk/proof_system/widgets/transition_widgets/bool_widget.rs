use anyhow::{ensure, Result};
use ark_bn254::Fr;
use ark_ff::Field;
use rayon::prelude::*;

use crate::{
    plonk::proof_system::{
        types::polynomial_manifest::PolynomialIndex,
        widgets::{challenge, evaluation, LinearTerms, ProverPolynomials},
    },
    transcript::{BarretenHasher, Transcript},
};

const SELECTORS: [PolynomialIndex; 3] = [
    PolynomialIndex::QLeftBools,
    PolynomialIndex::QRightBools,
    PolynomialIndex::QOutputBools,
];
const WIRES: [PolynomialIndex; 3] = [PolynomialIndex::W1, PolynomialIndex::W2, PolynomialIndex::W3];

/// `q_{i,bool} * (w_i^2 - w_i) = 0` for each wire, one power of alpha per wire.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoolWidget;

impl BoolWidget {
    /// Add the three boolean checks on the 4n coset.
    pub fn compute_quotient_contribution<H: BarretenHasher>(
        polys: &ProverPolynomials<'_>,
        alpha_base: Fr,
        transcript: &Transcript<H>,
        quotient: &mut [Fr],
    ) -> Result<Fr> {
        let alpha = challenge(transcript, "alpha", 0)?;
        let mut selectors = Vec::with_capacity(3);
        let mut wires = Vec::with_capacity(3);
        for (selector, wire) in SELECTORS.iter().zip(WIRES.iter()) {
            selectors.push(polys.coset_values(*selector)?);
            wires.push(polys.coset_values(*wire)?);
        }
        ensure!(
            selectors
                .iter()
                .chain(wires.iter())
                .all(|p| p.len() == quotient.len()),
            "coset evaluations have the wrong size"
        );
        let scales = [alpha_base, alpha_base * alpha, alpha_base * alpha * alpha];

        quotient.par_iter_mut().enumerate().for_each(|(j, t)| {
            for k in 0..3 {
                let w = wires[k][j];
                *t += scales[k] * selectors[k][j] * (w.square() - w);
            }
        });
        Ok(scales[2] * alpha)
    }

    /// `alpha^k (w_k^2 - w_k)` times each boolean selector.
    pub fn compute_linear_terms<H: BarretenHasher>(
        alpha_base: Fr,
        transcript: &Transcript<H>,
    ) -> Result<(LinearTerms, Fr)> {
        let alpha = challenge(transcript, "alpha", 0)?;
        let mut scale = alpha_base;
        let mut terms = Vec::with_capacity(3);
        for (selector, wire) in SELECTORS.iter().zip(WIRES.iter()) {
            let w = evaluation(transcript, *wire, false)?;
            terms.push((*selector, scale * (w.square() - w)));
            scale *= alpha;
        }
        Ok((terms, scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plonk::proof_system::types::prover_settings::{ExtendedSettings, Settings};
    use crate::transcript::Blake3s;
    use ark_ff::{One, Zero};

    #[test]
    fn boolean_evaluations_drop_out_of_the_linearisation() {
        let manifest = ExtendedSettings::create_manifest(0);
        let mut transcript = Transcript::<Blake3s>::new(manifest, 16);
        transcript.mock_inputs_prior_to_challenge("nu", 8).unwrap();
        transcript.add_field_element("w_1", &Fr::one());
        transcript.add_field_element("w_2", &Fr::zero());
        transcript.add_field_element("w_3", &Fr::from(2u64));

        let alpha = transcript.get_challenge_field_element("alpha", 0).unwrap();
        let (terms, next) = BoolWidget::compute_linear_terms(Fr::one(), &transcript).unwrap();
        assert!(terms[0].1.is_zero());
        assert!(terms[1].1.is_zero());
        // 2^2 - 2 on the output wire, third power
        assert_eq!(terms[2], (PolynomialIndex::QOutputBools, alpha * alpha * Fr::from(2u64)));
        assert_eq!(next, alpha * alpha * alpha);
    }
}
