use anyhow::Result;
use ark_bn254::Fr;

use crate::{
    plonk::proof_system::{
        types::polynomial_manifest::PolynomialIndex,
        widgets::{EvaluationContext, LinearTerms, ProverPolynomials},
    },
    transcript::{BarretenHasher, Transcript},
};

/// `q_m w_1 w_2 + q_1 w_1 + q_2 w_2 + q_3 w_3 + q_c + PI`
pub mod arithmetic_widget;
/// `w_i^2 - w_i` under the boolean selectors
pub mod bool_widget;
/// `q_oo * w_3(ωX)`, read by the arithmetic identity
pub mod sequential_widget;

use arithmetic_widget::ArithmeticWidget;
use bool_widget::BoolWidget;
use sequential_widget::SequentialWidget;

/// A gate identity that holds row by row.
///
/// Settings list the widgets they use; each one reads the current power of alpha and hands
/// back the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionWidget {
    /// the width-3 arithmetic gate, public inputs included
    Arithmetic,
    /// the next-row output term of the arithmetic gate
    Sequential,
    /// boolean checks on each wire
    Bool,
}

impl TransitionWidget {
    /// Powers of alpha this widget consumes.
    pub fn num_alpha_powers(self) -> usize {
        match self {
            TransitionWidget::Arithmetic => 1,
            TransitionWidget::Sequential => 0,
            TransitionWidget::Bool => 3,
        }
    }

    /// Polynomials whose values the widget reads.
    pub fn required_polynomials(self) -> &'static [PolynomialIndex] {
        use PolynomialIndex::*;
        match self {
            TransitionWidget::Arithmetic => &[QM, QC, Q1, Q2, Q3, W1, W2, W3],
            TransitionWidget::Sequential => &[QOO, W3],
            TransitionWidget::Bool => &[QLeftBools, QRightBools, QOutputBools, W1, W2, W3],
        }
    }

    /// Add this widget's term, scaled by `alpha_base`, to the quotient's coset evaluations.
    pub fn compute_quotient_contribution<H: BarretenHasher>(
        self,
        polys: &ProverPolynomials<'_>,
        alpha_base: Fr,
        transcript: &Transcript<H>,
        quotient: &mut [Fr],
    ) -> Result<Fr> {
        match self {
            TransitionWidget::Arithmetic => {
                ArithmeticWidget::compute_quotient_contribution(polys, alpha_base, transcript, quotient)
            }
            TransitionWidget::Sequential => {
                SequentialWidget::compute_quotient_contribution(polys, alpha_base, quotient)
            }
            TransitionWidget::Bool => {
                BoolWidget::compute_quotient_contribution(polys, alpha_base, transcript, quotient)
            }
        }
    }

    /// Selector multiples this widget contributes to the linearisation polynomial.
    pub fn compute_linear_terms<H: BarretenHasher>(
        self,
        alpha_base: Fr,
        transcript: &Transcript<H>,
    ) -> Result<(LinearTerms, Fr)> {
        match self {
            TransitionWidget::Arithmetic => {
                ArithmeticWidget::compute_linear_terms(alpha_base, transcript)
            }
            TransitionWidget::Sequential => {
                SequentialWidget::compute_linear_terms(alpha_base, transcript)
            }
            TransitionWidget::Bool => BoolWidget::compute_linear_terms(alpha_base, transcript),
        }
    }

    /// Add the constant part of the term at `zeta` to the verifier's quotient numerator.
    pub fn compute_quotient_evaluation_contribution<H: BarretenHasher>(
        self,
        context: &EvaluationContext,
        alpha_base: Fr,
        transcript: &Transcript<H>,
        numerator: &mut Fr,
    ) -> Result<Fr> {
        match self {
            TransitionWidget::Arithmetic => ArithmeticWidget::compute_quotient_evaluation_contribution(
                context,
                alpha_base,
                transcript,
                numerator,
            ),
            // no constant term: everything is linearised
            TransitionWidget::Sequential | TransitionWidget::Bool => {
                let alpha = transcript.get_challenge_field_element("alpha", 0)?;
                let mut next = alpha_base;
                for _ in 0..self.num_alpha_powers() {
                    next *= alpha;
                }
                Ok(next)
            }
        }
    }
}
