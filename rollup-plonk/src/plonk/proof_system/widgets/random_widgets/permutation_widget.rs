use anyhow::{ensure, Result};
use ark_bn254::Fr;
use ark_ff::{batch_inversion, One, Zero};
use rayon::prelude::*;
use tracing::debug;

use crate::{
    ecc::coset_generator,
    plonk::proof_system::{
        types::polynomial_manifest::PolynomialIndex,
        widgets::{
            challenge, evaluation, shifted_index, EvaluationContext, LinearTerms,
            ProverPolynomials,
        },
    },
    transcript::{BarretenHasher, Transcript},
};

const WIRES: [PolynomialIndex; 3] = [PolynomialIndex::W1, PolynomialIndex::W2, PolynomialIndex::W3];
const SIGMAS: [PolynomialIndex; 3] = [
    PolynomialIndex::Sigma1,
    PolynomialIndex::Sigma2,
    PolynomialIndex::Sigma3,
];

/// The copy-constraint argument.
///
/// With `k_i` the column cosets, the grand product `z` satisfies `z(1) = 1` and
///
/// `z(ωX) prod_i (w_i(X) + β σ_i(X) + γ) = z(X) prod_i (w_i(X) + β k_i X + γ)`
///
/// on every row. The identity on the last row wraps around to `z(1)`, so it holds exactly
/// when the product of all the ratios is one. Its three terms take `alpha^0` (transition),
/// `alpha^1` (`L_1 (z - 1)`) and `alpha^2` (`L_{n-1} (z(ωX) - 1)`).
#[derive(Debug, Default, Clone, Copy)]
pub struct PermutationWidget;

impl PermutationWidget {
    /// Powers of alpha consumed.
    pub const NUM_ALPHA_POWERS: usize = 3;

    /// Values of `z` on the circuit domain, from the wire values in `w_i_lagrange`.
    pub fn compute_grand_product(
        polys: &ProverPolynomials<'_>,
        beta: Fr,
        gamma: Fr,
    ) -> Result<Vec<Fr>> {
        let n = polys.key.circuit_size;
        let roots = polys.key.small_domain.elements();
        let cosets = [coset_generator(0), coset_generator(1), coset_generator(2)];
        let mut wires = Vec::with_capacity(3);
        let mut sigmas = Vec::with_capacity(3);
        for (wire, sigma) in WIRES.iter().zip(SIGMAS.iter()) {
            wires.push(polys.get(&format!("{}_lagrange", wire.label()))?.get_coefficients());
            sigmas.push(polys.get(&format!("{}_lagrange", sigma.label()))?.get_coefficients());
        }

        let mut numerators = vec![Fr::one(); n];
        let mut denominators = vec![Fr::one(); n];
        numerators
            .par_iter_mut()
            .zip(denominators.par_iter_mut())
            .enumerate()
            .for_each(|(i, (numerator, denominator))| {
                for k in 0..3 {
                    let shifted_wire = wires[k][i] + gamma;
                    *numerator *= shifted_wire + beta * cosets[k] * roots[i];
                    *denominator *= shifted_wire + beta * sigmas[k][i];
                }
            });
        ensure!(
            denominators.iter().all(|d| !d.is_zero()),
            "grand product denominator vanishes"
        );
        batch_inversion(&mut denominators);

        let mut z = Vec::with_capacity(n);
        let mut accumulator = Fr::one();
        z.push(accumulator);
        for i in 0..n - 1 {
            accumulator *= numerators[i] * denominators[i];
            z.push(accumulator);
        }
        debug!("computed grand product over {} rows", n);
        Ok(z)
    }

    /// Add `alpha_base * (transition + alpha * start + alpha^2 * end)` to the quotient's coset
    /// evaluations. Returns the next power of alpha.
    pub fn compute_quotient_contribution<H: BarretenHasher>(
        polys: &ProverPolynomials<'_>,
        alpha_base: Fr,
        transcript: &Transcript<H>,
        quotient: &mut [Fr],
    ) -> Result<Fr> {
        let large_domain = &polys.key.large_domain;
        let size = large_domain.size;
        ensure!(quotient.len() == size, "quotient must cover the 4n coset");

        let alpha = challenge(transcript, "alpha", 0)?;
        let beta = challenge(transcript, "beta", 0)?;
        let gamma = challenge(transcript, "beta", 1)?;
        let cosets = [coset_generator(0), coset_generator(1), coset_generator(2)];

        let mut wires = Vec::with_capacity(3);
        let mut sigmas = Vec::with_capacity(3);
        for (wire, sigma) in WIRES.iter().zip(SIGMAS.iter()) {
            wires.push(polys.coset_values(*wire)?);
            sigmas.push(polys.coset_values(*sigma)?);
        }
        let z = polys.coset_values(PolynomialIndex::Z)?;
        let l_1 = polys.coset_values_of("lagrange_1_fft")?;
        let l_last = polys.coset_values_of("lagrange_n_minus_1_fft")?;
        ensure!(
            z.len() == size && wires.iter().chain(sigmas.iter()).all(|p| p.len() == size),
            "coset evaluations have the wrong size"
        );

        let points: Vec<Fr> = large_domain
            .elements()
            .into_iter()
            .map(|root| root * large_domain.generator)
            .collect();
        let alpha_squared = alpha * alpha;

        quotient.par_iter_mut().enumerate().for_each(|(j, t)| {
            let next = shifted_index(j, size);
            let mut numerator = z[j];
            let mut denominator = z[next];
            for k in 0..3 {
                numerator *= wires[k][j] + beta * cosets[k] * points[j] + gamma;
                denominator *= wires[k][j] + beta * sigmas[k][j] + gamma;
            }
            let start = l_1[j] * (z[j] - Fr::one());
            let end = l_last[j] * (z[next] - Fr::one());
            *t += alpha_base * (numerator - denominator + alpha * start + alpha_squared * end);
        });

        Ok(alpha_base * alpha_squared * alpha)
    }

    /// Multiples of `z` and `sigma_3` in the linearisation polynomial.
    ///
    /// `sigma_3` is the only sigma not opened on its own: the verifier folds the committed
    /// `SIGMA_3` into the linearisation commitment instead.
    pub fn compute_linear_terms<H: BarretenHasher>(
        context: &EvaluationContext,
        alpha_base: Fr,
        transcript: &Transcript<H>,
    ) -> Result<(LinearTerms, Fr)> {
        let alpha = challenge(transcript, "alpha", 0)?;
        let beta = challenge(transcript, "beta", 0)?;
        let gamma = challenge(transcript, "beta", 1)?;
        let zeta = context.zeta;

        let mut identity_product = alpha_base;
        for (k, wire) in WIRES.iter().enumerate() {
            let w = evaluation(transcript, *wire, false)?;
            identity_product *= w + beta * coset_generator(k) * zeta + gamma;
        }
        let z_coefficient = identity_product + alpha_base * alpha * context.lagrange.l_1;

        let sigma_product = sigma_product_without_last(transcript, beta, gamma)?;
        let z_omega = evaluation(transcript, PolynomialIndex::Z, true)?;
        let sigma_coefficient = -(alpha_base * beta * z_omega * sigma_product);

        Ok((
            vec![
                (PolynomialIndex::Z, z_coefficient),
                (PolynomialIndex::Sigma3, sigma_coefficient),
            ],
            alpha_base * alpha * alpha * alpha,
        ))
    }

    /// The part of the identity at `zeta` that is not in the linearisation polynomial.
    pub fn compute_quotient_evaluation_contribution<H: BarretenHasher>(
        context: &EvaluationContext,
        alpha_base: Fr,
        transcript: &Transcript<H>,
        numerator: &mut Fr,
    ) -> Result<Fr> {
        let alpha = challenge(transcript, "alpha", 0)?;
        let beta = challenge(transcript, "beta", 0)?;
        let gamma = challenge(transcript, "beta", 1)?;
        let z_omega = evaluation(transcript, PolynomialIndex::Z, true)?;
        let w_3 = evaluation(transcript, PolynomialIndex::W3, false)?;

        let sigma_product = sigma_product_without_last(transcript, beta, gamma)?;
        let lagrange = &context.lagrange;
        *numerator -= alpha_base * z_omega * sigma_product * (w_3 + gamma);
        *numerator -= alpha_base * alpha * lagrange.l_1;
        *numerator += alpha_base * alpha * alpha * lagrange.l_n_minus_1 * (z_omega - Fr::one());

        Ok(alpha_base * alpha * alpha * alpha)
    }
}

/// `(w_1 + β σ_1 + γ)(w_2 + β σ_2 + γ)` at the evaluation challenge.
fn sigma_product_without_last<H: BarretenHasher>(
    transcript: &Transcript<H>,
    beta: Fr,
    gamma: Fr,
) -> Result<Fr> {
    let mut product = Fr::one();
    for (wire, sigma) in WIRES.iter().zip(SIGMAS.iter()).take(2) {
        let w = evaluation(transcript, *wire, false)?;
        let s = evaluation(transcript, *sigma, false)?;
        product *= w + beta * s + gamma;
    }
    Ok(product)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plonk::composer::composer_base::ComposerBase;
    use crate::plonk::composer::standard_composer::StandardComposer;
    use crate::proof_system::arithmetization::gate_data::AddTriple;
    use crate::proof_system::polynomial_store::PolynomialStore;
    use crate::test_utils::test_crs_factory;
    use ark_std::UniformRand;

    fn wire_store(composer: &mut StandardComposer) -> (PolynomialStore, usize) {
        let key = composer.compute_proving_key().unwrap();
        let table = composer.finalize_circuit();
        let mut store = PolynomialStore::new();
        for (k, values) in table
            .compute_wire_values(key.circuit_size)
            .into_iter()
            .enumerate()
        {
            store.put(&format!("w_{}_lagrange", k + 1), values.into());
        }
        (store, key.circuit_size)
    }

    fn chained_adds(composer: &mut StandardComposer) {
        let one = Fr::one();
        let mut acc = composer.add_variable(Fr::from(1u64));
        for i in 0..5u64 {
            let x = composer.add_variable(Fr::from(i));
            let sum = composer.get_variable(acc) + Fr::from(i);
            let out = composer.add_variable(sum);
            composer.create_add_gate(&AddTriple {
                a: acc,
                b: x,
                c: out,
                a_scaling: one,
                b_scaling: one,
                c_scaling: -one,
                const_scaling: Fr::zero(),
            });
            acc = out;
        }
    }

    #[test]
    fn grand_product_closes_for_consistent_copies() {
        let mut rng = ark_std::test_rng();
        let mut composer = StandardComposer::new(test_crs_factory());
        chained_adds(&mut composer);
        let key = composer.compute_proving_key().unwrap();
        let (store, n) = wire_store(&mut composer);
        let polys = ProverPolynomials {
            key: &key,
            witness: &store,
        };
        let (beta, gamma) = (Fr::rand(&mut rng), Fr::rand(&mut rng));
        let z = PermutationWidget::compute_grand_product(&polys, beta, gamma).unwrap();
        assert_eq!(z.len(), n);
        assert_eq!(z[0], Fr::one());

        // the ratio of the last row takes z back to one
        let roots = key.small_domain.elements();
        let i = n - 1;
        let mut numerator = z[i];
        let mut denominator = Fr::one();
        for k in 0..3 {
            let w = store.get(&format!("w_{}_lagrange", k + 1)).unwrap()[i];
            let s = key
                .polynomial_store
                .get(&format!("sigma_{}_lagrange", k + 1))
                .unwrap()[i];
            numerator *= w + beta * coset_generator(k) * roots[i] + gamma;
            denominator *= w + beta * s + gamma;
        }
        assert_eq!(numerator, denominator);
    }

    #[test]
    fn grand_product_breaks_on_a_copy_violation() {
        let mut rng = ark_std::test_rng();
        let mut composer = StandardComposer::new(test_crs_factory());
        chained_adds(&mut composer);
        let key = composer.compute_proving_key().unwrap();
        let (mut store, n) = wire_store(&mut composer);

        // the output of the first add is copied into the next gate; change only this copy
        let row = key.num_public_inputs + 2;
        let mut w_3 = store.remove("w_3_lagrange").unwrap();
        w_3[row] += Fr::one();
        store.put("w_3_lagrange", w_3);

        let polys = ProverPolynomials {
            key: &key,
            witness: &store,
        };
        let (beta, gamma) = (Fr::rand(&mut rng), Fr::rand(&mut rng));
        let z = PermutationWidget::compute_grand_product(&polys, beta, gamma).unwrap();
        let roots = key.small_domain.elements();
        let i = n - 1;
        let mut numerator = z[i];
        let mut denominator = Fr::one();
        for k in 0..3 {
            let w = store.get(&format!("w_{}_lagrange", k + 1)).unwrap()[i];
            let s = key
                .polynomial_store
                .get(&format!("sigma_{}_lagrange", k + 1))
                .unwrap()[i];
            numerator *= w + beta * coset_generator(k) * roots[i] + gamma;
            denominator *= w + beta * s + gamma;
        }
        assert_ne!(numerator, denominator);
    }
}
