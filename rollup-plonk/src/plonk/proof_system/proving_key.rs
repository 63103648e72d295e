use std::sync::Arc;

use anyhow::{ensure, Result};
use ark_bn254::Fr;
use ark_ff::Zero;
use tracing::{debug, info};

use crate::numeric::bitop::round_up_power_2;
use crate::plonk::composer::composer_base::{CircuitTable, ComposerType};
use crate::plonk::proof_system::constants::LARGE_DOMAIN_FACTOR;
use crate::plonk::proof_system::utils::permutation::{
    compute_permutation_lagrange_base_single, compute_sigma_permutations,
};
use crate::polynomials::evaluation_domain::EvaluationDomain;
use crate::proof_system::polynomial_store::PolynomialStore;
use crate::srs::reference_string::{ProverReferenceString, ReferenceStringFactory};

use super::types::PolynomialManifest;

const MIN_CIRCUIT_SIZE: usize = 4;

/// Everything the prover needs about a circuit that does not depend on the witness.
///
/// The polynomial store holds, for every selector `q` and sigma `sigma_k`:
/// - `q`, `sigma_k`: coefficients over the circuit domain
/// - `q_fft`, `sigma_k_fft`: evaluations on the coset of the 4n domain
/// - `sigma_k_lagrange`: sigma values on the circuit domain
///
/// and `lagrange_1_fft`, `lagrange_n_minus_1_fft` for the permutation boundary checks.
#[derive(Debug)]
pub struct ProvingKey {
    /// circuit family
    pub composer_type: ComposerType,
    /// number of rows n, a power of two
    pub circuit_size: usize,
    /// log2(n)
    pub log_circuit_size: usize,
    /// public input rows at the top of the table
    pub num_public_inputs: usize,
    /// preprocessed polynomials
    pub polynomial_store: PolynomialStore,
    /// domain of size n
    pub small_domain: EvaluationDomain,
    /// domain of size 4n, whose coset the quotient is computed on
    pub large_domain: EvaluationDomain,
    /// monomial points for commitments
    pub reference_string: Arc<dyn ProverReferenceString>,
    /// committed polynomials
    pub polynomial_manifest: &'static PolynomialManifest,
    /// packed sigma values per wire
    pub sigma_mappings: [Vec<u32>; 3],
}

impl ProvingKey {
    /// Preprocess a finalized circuit.
    ///
    /// Public input rows go first, then the gates, then zero rows up to
    /// `n = round_up_power_2(rows + 1)`.
    ///
    /// # Errors
    /// If the reference string is shorter than `n + 1` points.
    pub fn from_circuit(
        table: &CircuitTable,
        crs_factory: &dyn ReferenceStringFactory,
    ) -> Result<Self> {
        let num_gates = table.num_gates();
        assert!(
            table.wires.iter().all(|w| w.len() == num_gates)
                && table.selectors.iter().all(|s| s.len() == num_gates),
            "gate columns out of sync"
        );
        assert_eq!(table.selectors.len(), table.selector_properties.len());
        assert_eq!(table.public_input_selectors.len(), table.selectors.len());

        let num_public_inputs = table.num_public_inputs();
        let num_rows = table.num_rows();
        let circuit_size = round_up_power_2(num_rows + 1).max(MIN_CIRCUIT_SIZE);
        let small_domain = EvaluationDomain::new(circuit_size)?;
        let large_domain = EvaluationDomain::new(LARGE_DOMAIN_FACTOR * circuit_size)?;
        ensure!(
            large_domain.size > circuit_size,
            "quotient domain must be larger than the circuit"
        );
        let reference_string = crs_factory.get_prover_crs(circuit_size + 1)?;
        info!(
            "preprocessing {} rows ({} public inputs) into a circuit of size {}",
            num_rows, num_public_inputs, circuit_size
        );

        let mut polynomial_store = PolynomialStore::new();
        for (j, properties) in table.selector_properties.iter().enumerate() {
            let mut values = vec![Fr::zero(); circuit_size];
            values[..num_public_inputs].fill(table.public_input_selectors[j]);
            values[num_public_inputs..num_rows].copy_from_slice(&table.selectors[j]);
            small_domain.ifft_inplace(&mut values);
            let coset_values = large_domain.coset_fft_extended(&values);
            polynomial_store.put(properties.name, values.into());
            polynomial_store.put(&format!("{}_fft", properties.name), coset_values.into());
        }

        let sigma_mappings = compute_sigma_permutations(
            &table.wire_copy_cycles,
            &table.adjusted_gate_indices(),
            &table.public_inputs,
            circuit_size,
        );
        for (k, mapping) in sigma_mappings.iter().enumerate() {
            let label = format!("sigma_{}", k + 1);
            let lagrange = compute_permutation_lagrange_base_single(mapping, &small_domain);
            let mut coefficients = lagrange.get_coefficients().to_vec();
            small_domain.ifft_inplace(&mut coefficients);
            let coset_values = large_domain.coset_fft_extended(&coefficients);
            polynomial_store.put(&format!("{label}_lagrange"), lagrange);
            polynomial_store.put(&label, coefficients.into());
            polynomial_store.put(&format!("{label}_fft"), coset_values.into());
        }

        let lagrange_1 = small_domain.compute_lagrange_polynomial(0);
        polynomial_store.put(
            "lagrange_1_fft",
            large_domain.coset_fft_extended(&lagrange_1).into(),
        );
        let lagrange_n_minus_1 = small_domain.compute_lagrange_polynomial(circuit_size - 1);
        polynomial_store.put(
            "lagrange_n_minus_1_fft",
            large_domain.coset_fft_extended(&lagrange_n_minus_1).into(),
        );
        debug!("{}", polynomial_store);

        Ok(Self {
            composer_type: table.composer_type,
            circuit_size,
            log_circuit_size: small_domain.log2_size,
            num_public_inputs,
            polynomial_store,
            small_domain,
            large_domain,
            reference_string,
            polynomial_manifest: PolynomialManifest::for_composer(table.composer_type),
            sigma_mappings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plonk::composer::composer_base::ComposerBase;
    use crate::plonk::composer::standard_composer::StandardComposer;
    use crate::proof_system::arithmetization::gate_data::AddTriple;
    use crate::test_utils::test_crs_factory;
    use ark_ff::One;

    fn small_circuit() -> StandardComposer {
        let mut composer = StandardComposer::new(test_crs_factory());
        let a = composer.add_public_variable(Fr::from(3u64));
        let b = composer.add_variable(Fr::from(4u64));
        let c = composer.add_variable(Fr::from(7u64));
        composer.create_add_gate(&AddTriple {
            a,
            b,
            c,
            a_scaling: Fr::one(),
            b_scaling: Fr::one(),
            c_scaling: -Fr::one(),
            const_scaling: Fr::zero(),
        });
        composer
    }

    #[test]
    fn selectors_interpolate_the_table() {
        let mut composer = small_circuit();
        let table = composer.finalize_circuit();
        let key = ProvingKey::from_circuit(&table, test_crs_factory().as_ref()).unwrap();
        // 1 public input + 2 dummy gates + 1 add gate, plus the reserved row
        assert_eq!(key.circuit_size, 8);
        assert_eq!(key.log_circuit_size, 3);
        assert_eq!(key.large_domain.size, 32);

        let q_1 = key.polynomial_store.get("q_1").unwrap();
        let q_3 = key.polynomial_store.get("q_3").unwrap();
        // public input row
        assert_eq!(q_1.evaluate(&key.small_domain.element(0)), Fr::one());
        // the add gate is the last gate row
        let row = key.small_domain.element(table.num_rows() - 1);
        assert_eq!(q_1.evaluate(&row), Fr::one());
        assert_eq!(q_3.evaluate(&row), -Fr::one());
        // padding
        assert!(q_1.evaluate(&key.small_domain.element(7)).is_zero());
        for name in ["q_m_fft", "sigma_2_fft", "lagrange_1_fft", "lagrange_n_minus_1_fft"] {
            assert_eq!(key.polynomial_store.get(name).unwrap().size(), 32);
        }
    }

    #[test]
    fn sigma_coefficients_match_lagrange_values() {
        let mut composer = small_circuit();
        let table = composer.finalize_circuit();
        let key = ProvingKey::from_circuit(&table, test_crs_factory().as_ref()).unwrap();
        for k in 1..=3 {
            let coefficients = key.polynomial_store.get(&format!("sigma_{k}")).unwrap();
            let lagrange = key
                .polynomial_store
                .get(&format!("sigma_{k}_lagrange"))
                .unwrap();
            for i in 0..key.circuit_size {
                assert_eq!(coefficients.evaluate(&key.small_domain.element(i)), lagrange[i]);
            }
        }
    }

    #[test]
    fn lagrange_cosets_match_direct_evaluation() {
        let mut composer = small_circuit();
        let table = composer.finalize_circuit();
        let key = ProvingKey::from_circuit(&table, test_crs_factory().as_ref()).unwrap();
        let coset_point = key.large_domain.generator * key.large_domain.element(5);
        let l_1 = key.polynomial_store.get("lagrange_1_fft").unwrap();
        let l_last = key.polynomial_store.get("lagrange_n_minus_1_fft").unwrap();
        assert_eq!(
            l_1[5],
            key.small_domain.compute_lagrange_evaluation(0, &coset_point)
        );
        assert_eq!(
            l_last[5],
            key.small_domain
                .compute_lagrange_evaluation(key.circuit_size - 1, &coset_point)
        );
    }
}
