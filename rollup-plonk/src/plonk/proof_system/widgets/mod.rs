//! Widgets: the terms of the quotient identity.
//!
//! Each widget owns one part of the identity. On the prover side it adds its term to the
//! quotient evaluations on the 4n coset. Both sides share its linearisation: the selector
//! (or grand product) polynomials it multiplies by evaluations from the transcript. The
//! verifier adds whatever part of the term is a constant at the evaluation challenge.
//!
//! Powers of `alpha` separate the terms. The permutation widget takes `alpha^0..alpha^2`, then
//! the transition widgets of the settings consume theirs in order.

use anyhow::Result;
use ark_bn254::Fr;
use ark_ff::One;

use crate::{
    plonk::proof_system::{
        constants::LARGE_DOMAIN_FACTOR, proving_key::ProvingKey,
        types::polynomial_manifest::PolynomialIndex,
    },
    polynomials::{LagrangeEvaluations, Polynomial},
    proof_system::polynomial_store::PolynomialStore,
    transcript::{BarretenHasher, Transcript},
};

/// the copy-constraint argument
pub mod random_widgets;
/// gate identities
pub mod transition_widgets;

use random_widgets::PermutationWidget;
use transition_widgets::TransitionWidget;

/// Polynomials visible to prover widgets: the proving key's preprocessed polynomials and the
/// witness polynomials computed so far.
#[derive(Debug, Clone, Copy)]
pub struct ProverPolynomials<'a> {
    /// selectors, sigmas, lagrange bases
    pub key: &'a ProvingKey,
    /// wires, grand product, public inputs
    pub witness: &'a PolynomialStore,
}

impl<'a> ProverPolynomials<'a> {
    /// Look `label` up in the witness store, then in the key.
    pub fn get(&self, label: &str) -> Result<&'a Polynomial> {
        let witness: &'a PolynomialStore = self.witness;
        let key: &'a ProvingKey = self.key;
        if witness.contains(label) {
            witness.get(label)
        } else {
            key.polynomial_store.get(label)
        }
    }

    /// Coefficients of `index` over the circuit domain.
    pub fn coefficients(&self, index: PolynomialIndex) -> Result<&'a [Fr]> {
        Ok(self.get(index.label())?.get_coefficients())
    }

    /// Evaluations of `index` on the coset of the 4n domain.
    pub fn coset_values(&self, index: PolynomialIndex) -> Result<&'a [Fr]> {
        Ok(self
            .get(&format!("{}_fft", index.label()))?
            .get_coefficients())
    }

    /// Evaluations of the 4n coset stored under `label`.
    pub fn coset_values_of(&self, label: &str) -> Result<&'a [Fr]> {
        Ok(self.get(label)?.get_coefficients())
    }
}

/// Point-independent data at the evaluation challenge, shared by prover and verifier.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext {
    /// the evaluation challenge
    pub zeta: Fr,
    /// `Z_H(zeta)`, `L_1(zeta)`, `L_{n-1}(zeta)`
    pub lagrange: LagrangeEvaluations,
    /// `PI(zeta)`, the public input polynomial at the challenge
    pub public_input_evaluation: Fr,
}

/// `sum_i scalar_i * p_i`: how a widget's part of the linearisation polynomial is formed.
pub type LinearTerms = Vec<(PolynomialIndex, Fr)>;

/// Every widget's linear terms, with powers of alpha handed from the permutation widget to
/// the transition widgets in order.
pub(crate) fn compute_linearisation_terms<H: BarretenHasher>(
    widgets: &[TransitionWidget],
    context: &EvaluationContext,
    transcript: &Transcript<H>,
) -> Result<LinearTerms> {
    let (mut terms, mut alpha_base) =
        PermutationWidget::compute_linear_terms(context, Fr::one(), transcript)?;
    for widget in widgets {
        let (widget_terms, next) = widget.compute_linear_terms(alpha_base, transcript)?;
        terms.extend(widget_terms);
        alpha_base = next;
    }
    Ok(terms)
}

/// Read challenge `name[idx]` as a field element.
pub(crate) fn challenge<H: BarretenHasher>(
    transcript: &Transcript<H>,
    name: &str,
    idx: usize,
) -> Result<Fr> {
    transcript.get_challenge_field_element(name, idx)
}

/// Read the evaluation of `index` at the challenge, or at the shifted challenge.
pub(crate) fn evaluation<H: BarretenHasher>(
    transcript: &Transcript<H>,
    index: PolynomialIndex,
    shifted: bool,
) -> Result<Fr> {
    if shifted {
        transcript.get_field_element(&format!("{}_omega", index.label()))
    } else {
        transcript.get_field_element(index.label())
    }
}

/// Coset index of `omega * x_j` when `x_j` is the j-th point of the 4n coset.
#[inline]
pub(crate) fn shifted_index(j: usize, large_size: usize) -> usize {
    (j + LARGE_DOMAIN_FACTOR) % large_size
}
