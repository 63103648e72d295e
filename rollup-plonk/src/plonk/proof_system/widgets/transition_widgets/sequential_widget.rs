use anyhow::{ensure, Result};
use ark_bn254::Fr;
use rayon::prelude::*;

use crate::{
    plonk::proof_system::{
        types::polynomial_manifest::PolynomialIndex,
        widgets::{evaluation, shifted_index, LinearTerms, ProverPolynomials},
    },
    transcript::{BarretenHasher, Transcript},
};

/// `q_oo(X) * w_3(ωX)`: lets a gate read the output wire of the row below.
///
/// This is part of the arithmetic identity, not a separate one, so it shares the arithmetic
/// widget's power of alpha and must run before it.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialWidget;

impl SequentialWidget {
    /// Add `alpha_base * q_oo(x) * w_3(ωx)` on the 4n coset.
    pub fn compute_quotient_contribution(
        polys: &ProverPolynomials<'_>,
        alpha_base: Fr,
        quotient: &mut [Fr],
    ) -> Result<Fr> {
        let q_oo = polys.coset_values(PolynomialIndex::QOO)?;
        let w_3 = polys.coset_values(PolynomialIndex::W3)?;
        let size = quotient.len();
        ensure!(
            q_oo.len() == size && w_3.len() == size,
            "coset evaluations have the wrong size"
        );
        quotient.par_iter_mut().enumerate().for_each(|(j, t)| {
            *t += alpha_base * q_oo[j] * w_3[shifted_index(j, size)];
        });
        Ok(alpha_base)
    }

    /// `alpha_base * w_3(ζω) * q_oo`.
    pub fn compute_linear_terms<H: BarretenHasher>(
        alpha_base: Fr,
        transcript: &Transcript<H>,
    ) -> Result<(LinearTerms, Fr)> {
        let w_3_omega = evaluation(transcript, PolynomialIndex::W3, true)?;
        Ok((vec![(PolynomialIndex::QOO, alpha_base * w_3_omega)], alpha_base))
    }
}
