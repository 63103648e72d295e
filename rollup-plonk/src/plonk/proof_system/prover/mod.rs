use std::{marker::PhantomData, sync::Arc};

use anyhow::{ensure, Result};
use ark_bn254::Fr;
use ark_ff::{Field, One, Zero};
use tracing::{debug, info};

use super::{
    commitment_scheme::{CommitmentScheme, KateCommitmentScheme},
    constants::NUM_QUOTIENT_PARTS,
    proving_key::ProvingKey,
    types::{prover_settings::Settings, Proof},
    widgets::{
        compute_linearisation_terms,
        random_widgets::PermutationWidget,
        transition_widgets::arithmetic_widget::{
            compute_public_input_evaluation, PUBLIC_INPUTS_FFT,
        },
        EvaluationContext, ProverPolynomials,
    },
};
use crate::{
    ecc::fr_to_buffer,
    errors::ProofSystemError,
    plonk::composer::composer_base::CircuitTable,
    polynomials::{polynomial_arithmetic, Polynomial},
    proof_system::polynomial_store::PolynomialStore,
    transcript::Transcript,
};


/// Wire values of a circuit over its domain, and its public inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness {
    /// `w_1, w_2, w_3` on each of the n rows
    pub wires: [Vec<Fr>; 3],
    /// values of the public inputs, in row order
    pub public_inputs: Vec<Fr>,
}

impl Witness {
    /// Lay out the values of a finalized circuit over `circuit_size` rows.
    pub fn from_circuit(table: &CircuitTable, circuit_size: usize) -> Self {
        Self {
            wires: table.compute_wire_values(circuit_size),
            public_inputs: table.public_input_values(),
        }
    }
}

/// Plonk prover.
///
/// Rounds, each closed by the challenge it derives:
/// - preamble: circuit size and public input count (`init`)
/// - first: wire commitments and public inputs (`beta`, `gamma`)
/// - second: grand product commitment (`alpha`)
/// - third: quotient commitments `T_1..T_3` (`z`)
/// - fourth: evaluations and the linearisation polynomial (`nu`)
/// - fifth: batched openings at `z` and `z * omega` (`separator`)
#[derive(Debug)]
pub struct Prover<S: Settings> {
    pub(crate) circuit_size: usize,
    pub(crate) key: Arc<ProvingKey>,
    pub(crate) witness: Witness,
    pub(crate) transcript: Transcript<S::Hasher>,
    /// polynomials computed during the proof
    pub(crate) store: PolynomialStore,
    pub(crate) commitment_scheme: KateCommitmentScheme,
    phantom: PhantomData<S>,
}

impl<S: Settings> Prover<S> {
    /// Create a new prover.
    /// Parameters:
    /// - `key` Proving key of the circuit.
    /// - `witness` Wire values over the key's domain.
    ///
    /// # Errors
    /// If the key belongs to another composer type or the witness does not fit the key.
    pub fn new(key: Arc<ProvingKey>, witness: Witness) -> Result<Self> {
        ensure!(
            key.composer_type == S::composer_type(),
            "proving key is for {:?} circuits, settings are for {:?}",
            key.composer_type,
            S::composer_type()
        );
        ensure!(
            witness.wires.iter().all(|w| w.len() == key.circuit_size),
            "witness does not cover the {} rows of the circuit",
            key.circuit_size
        );
        if witness.public_inputs.len() != key.num_public_inputs {
            return Err(ProofSystemError::PublicInputCount {
                expected: key.num_public_inputs,
                actual: witness.public_inputs.len(),
            }
            .into());
        }
        let transcript = Transcript::new(
            S::create_manifest(key.num_public_inputs),
            S::NUM_CHALLENGE_BYTES,
        );
        Ok(Self {
            circuit_size: key.circuit_size,
            key,
            witness,
            transcript,
            store: PolynomialStore::new(),
            commitment_scheme: KateCommitmentScheme,
            phantom: PhantomData,
        })
    }

    fn polynomials(&self) -> ProverPolynomials<'_> {
        ProverPolynomials {
            key: &self.key,
            witness: &self.store,
        }
    }

    /// Store `coefficients` and their evaluations on the 4n coset under `label`, `label_fft`.
    fn store_with_coset(&mut self, label: &str, coefficients: Vec<Fr>) {
        let coset_values = self.key.large_domain.coset_fft_extended(&coefficients);
        self.store.put(&format!("{label}_fft"), coset_values.into());
        self.store.put(label, coefficients.into());
    }

    /// Execute preamble round: bind the circuit shape to the transcript.
    pub(crate) fn execute_preamble_round(&mut self) -> Result<()> {
        debug!("prover: preamble round");
        self.transcript.add_element(
            "circuit_size",
            (self.circuit_size as u32).to_be_bytes().to_vec(),
        );
        self.transcript.add_element(
            "public_input_size",
            (self.key.num_public_inputs as u32).to_be_bytes().to_vec(),
        );
        self.transcript.apply_fiat_shamir("init")
    }

    /// Execute the first round:
    /// - Interpolate and commit to the wires.
    /// - Add public input values to the transcript and interpolate `PI(X)`.
    pub(crate) fn execute_first_round(&mut self) -> Result<()> {
        debug!("prover: first round");
        let small_domain = &self.key.small_domain;
        let mut wire_coefficients = Vec::with_capacity(3);
        for (k, values) in self.witness.wires.iter().enumerate() {
            let mut coefficients = values.clone();
            small_domain.ifft_inplace(&mut coefficients);
            let commitment = self
                .commitment_scheme
                .commit(&coefficients, self.key.reference_string.as_ref())?;
            self.transcript
                .add_group_element(&format!("W_{}", k + 1), &commitment);
            wire_coefficients.push((k, values.clone(), coefficients));
        }
        for (k, lagrange, coefficients) in wire_coefficients {
            let label = format!("w_{}", k + 1);
            self.store.put(&format!("{label}_lagrange"), lagrange.into());
            self.store_with_coset(&label, coefficients);
        }

        let mut public_input_bytes = Vec::with_capacity(32 * self.witness.public_inputs.len());
        let mut public_input_values = vec![Fr::zero(); self.circuit_size];
        for (i, x) in self.witness.public_inputs.iter().enumerate() {
            public_input_bytes.extend(fr_to_buffer(x));
            public_input_values[i] = -*x;
        }
        self.transcript
            .add_element("public_inputs", public_input_bytes);
        self.key.small_domain.ifft_inplace(&mut public_input_values);
        let coset_values = self
            .key
            .large_domain
            .coset_fft_extended(&public_input_values);
        self.store.put(PUBLIC_INPUTS_FFT, coset_values.into());

        self.transcript.apply_fiat_shamir("beta")
    }

    /// Execute the second round: commit to the grand product `z`.
    pub(crate) fn execute_second_round(&mut self) -> Result<()> {
        debug!("prover: second round");
        let beta = self.transcript.get_challenge_field_element("beta", 0)?;
        let gamma = self.transcript.get_challenge_field_element("beta", 1)?;
        let mut z = PermutationWidget::compute_grand_product(&self.polynomials(), beta, gamma)?;
        self.key.small_domain.ifft_inplace(&mut z);
        let commitment = self
            .commitment_scheme
            .commit(&z, self.key.reference_string.as_ref())?;
        self.transcript.add_group_element("Z_PERM", &commitment);
        self.store_with_coset("z_perm", z);
        self.transcript.apply_fiat_shamir("alpha")
    }

    /// Execute the third round: the quotient.
    ///
    /// Every widget adds its term on the 4n coset, the sum is divided by `Z_H` and brought
    /// back to coefficients. For a satisfying witness `t` has degree below `3n`; anything
    /// else is reported as [`ProofSystemError::QuotientDegreeTooLarge`].
    pub(crate) fn execute_third_round(&mut self) -> Result<()> {
        debug!("prover: third round");
        let key = self.key.clone();
        let mut quotient = vec![Fr::zero(); key.large_domain.size];
        {
            let polys = self.polynomials();
            let mut alpha_base = PermutationWidget::compute_quotient_contribution(
                &polys,
                Fr::one(),
                &self.transcript,
                &mut quotient,
            )?;
            for widget in S::transition_widgets() {
                alpha_base = widget.compute_quotient_contribution(
                    &polys,
                    alpha_base,
                    &self.transcript,
                    &mut quotient,
                )?;
            }
        }
        key.small_domain
            .divide_by_pseudo_vanishing_polynomial(&mut quotient, &key.large_domain)?;
        key.large_domain.coset_ifft_inplace(&mut quotient);

        let bound = NUM_QUOTIENT_PARTS * self.circuit_size;
        if let Some(offset) = quotient[bound..].iter().position(|c| !c.is_zero()) {
            return Err(ProofSystemError::QuotientDegreeTooLarge(bound + offset).into());
        }

        for (i, part) in quotient[..bound].chunks(self.circuit_size).enumerate() {
            let commitment = self
                .commitment_scheme
                .commit(part, key.reference_string.as_ref())?;
            self.transcript
                .add_group_element(&format!("T_{}", i + 1), &commitment);
        }
        self.store.put("quotient", quotient.into());
        self.transcript.apply_fiat_shamir("z")
    }

    /// `T_1 + zeta^n T_2 + zeta^{2n} T_3`, of degree below n.
    fn compute_batched_quotient(&self, zeta: &Fr) -> Result<Vec<Fr>> {
        let n = self.circuit_size;
        let quotient = self.store.get("quotient")?.get_coefficients();
        let zeta_n = zeta.pow([n as u64]);
        let mut batched = vec![Fr::zero(); n];
        let mut scale = Fr::one();
        for part in quotient[..NUM_QUOTIENT_PARTS * n].chunks(n) {
            polynomial_arithmetic::add_scaled(&mut batched, part, &scale);
            scale *= zeta_n;
        }
        Ok(batched)
    }

    fn evaluation_context(&self, zeta: Fr) -> EvaluationContext {
        let domain = &self.key.small_domain;
        EvaluationContext {
            zeta,
            lagrange: domain.get_lagrange_evaluations(&zeta),
            public_input_evaluation: compute_public_input_evaluation(
                domain,
                &self.witness.public_inputs,
                &zeta,
            ),
        }
    }

    /// Execute the fourth round: evaluations at `zeta` and `zeta * omega`, and the
    /// linearisation polynomial `r`.
    pub(crate) fn execute_fourth_round(&mut self) -> Result<()> {
        debug!("prover: fourth round");
        let zeta = self.transcript.get_challenge_field_element("z", 0)?;
        let zeta_omega = zeta * self.key.small_domain.root;
        let manifest = self.key.polynomial_manifest;

        let mut evaluations = Vec::new();
        {
            let polys = self.polynomials();
            for descriptor in manifest.unshifted_openings() {
                let p = polys.coefficients(descriptor.index)?;
                evaluations.push((
                    descriptor.polynomial_label.to_string(),
                    polynomial_arithmetic::evaluate(p, &zeta, p.len()),
                ));
            }
            for descriptor in manifest.shifted_openings() {
                let p = polys.coefficients(descriptor.index)?;
                evaluations.push((
                    descriptor.shifted_label(),
                    polynomial_arithmetic::evaluate(p, &zeta_omega, p.len()),
                ));
            }
        }
        for (label, value) in &evaluations {
            self.transcript.add_field_element(label, value);
        }

        let context = self.evaluation_context(zeta);
        let terms =
            compute_linearisation_terms(S::transition_widgets(), &context, &self.transcript)?;
        let mut r = vec![Fr::zero(); self.circuit_size];
        {
            let polys = self.polynomials();
            for (index, scalar) in &terms {
                polynomial_arithmetic::add_scaled(&mut r, polys.coefficients(*index)?, scalar);
            }
        }
        let r_eval = polynomial_arithmetic::evaluate(&r, &zeta, r.len());
        self.transcript.add_field_element("r", &r_eval);
        self.store.put("r", r.into());

        let batched = self.compute_batched_quotient(&zeta)?;
        let t_eval = polynomial_arithmetic::evaluate(&batched, &zeta, batched.len());
        self.transcript.add_field_element("t", &t_eval);

        self.transcript.apply_fiat_shamir("nu")
    }

    /// Execute the fifth round: batch the opened polynomials with powers of `nu` and commit to
    /// the two opening polynomials.
    ///
    /// At `zeta`: the batched quotient, the unshifted openings in manifest order, then `r`.
    /// At `zeta * omega`: the shifted openings, continuing the powers of `nu`.
    pub(crate) fn execute_fifth_round(&mut self) -> Result<()> {
        debug!("prover: fifth round");
        let zeta = self.transcript.get_challenge_field_element("z", 0)?;
        let nu = self.transcript.get_challenge_field_element("nu", 0)?;
        let zeta_omega = zeta * self.key.small_domain.root;
        let manifest = self.key.polynomial_manifest;
        let batched_quotient = self.compute_batched_quotient(&zeta)?;

        let polys = self.polynomials();
        let mut nu_power = Fr::one();
        let mut opened_at_zeta: Vec<&[Fr]> = vec![&batched_quotient];
        let mut challenges_at_zeta = vec![nu_power];
        for descriptor in manifest.unshifted_openings() {
            nu_power *= nu;
            opened_at_zeta.push(polys.coefficients(descriptor.index)?);
            challenges_at_zeta.push(nu_power);
        }
        nu_power *= nu;
        opened_at_zeta.push(self.store.get("r")?.get_coefficients());
        challenges_at_zeta.push(nu_power);

        let mut opened_at_zeta_omega: Vec<&[Fr]> = Vec::new();
        let mut challenges_at_zeta_omega = Vec::new();
        for descriptor in manifest.shifted_openings() {
            nu_power *= nu;
            opened_at_zeta_omega.push(polys.coefficients(descriptor.index)?);
            challenges_at_zeta_omega.push(nu_power);
        }

        let reference_string = self.key.reference_string.as_ref();
        let pi_z = self.commitment_scheme.batch_open(
            &opened_at_zeta,
            &challenges_at_zeta,
            &zeta,
            reference_string,
        )?;
        let pi_z_omega = self.commitment_scheme.batch_open(
            &opened_at_zeta_omega,
            &challenges_at_zeta_omega,
            &zeta_omega,
            reference_string,
        )?;
        self.transcript.add_group_element("PI_Z", &pi_z);
        self.transcript.add_group_element("PI_Z_OMEGA", &pi_z_omega);
        self.transcript.apply_fiat_shamir("separator")
    }

    /// The proof: every prover message, in manifest order.
    pub fn export_proof(&self) -> Result<Proof> {
        Ok(Proof::from(self.transcript.export_transcript()?))
    }

    /// Run all rounds and export the proof.
    pub fn construct_proof(&mut self) -> Result<Proof> {
        info!(
            "constructing proof for a circuit of size {} with {} public inputs",
            self.circuit_size, self.key.num_public_inputs
        );
        self.execute_preamble_round()?;
        self.execute_first_round()?;
        self.execute_second_round()?;
        self.execute_third_round()?;
        self.execute_fourth_round()?;
        self.execute_fifth_round()?;
        self.export_proof()
    }

    /// Coefficients of the full quotient, once the third round has run.
    pub fn quotient(&self) -> Result<&Polynomial> {
        self.store.get("quotient")
    }
}
