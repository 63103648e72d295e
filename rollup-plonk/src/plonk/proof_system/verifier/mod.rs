use std::{marker::PhantomData, sync::Arc};

use anyhow::{ensure, Result};
use ark_bn254::{Fr, G1Affine};
use ark_ff::{Field, One, Zero};
use byteorder::{BigEndian, ByteOrder};
use tracing::{debug, info, warn};

use super::{
    commitment_scheme::{BatchOpeningClaim, CommitmentScheme, KateCommitmentScheme},
    constants::NUM_QUOTIENT_PARTS,
    types::{
        polynomial_manifest::{PolynomialIndex, PolynomialSource},
        prover_settings::Settings,
        Proof,
    },
    verification_key::VerificationKey,
    widgets::{
        compute_linearisation_terms, random_widgets::PermutationWidget,
        transition_widgets::arithmetic_widget::compute_public_input_evaluation,
        EvaluationContext,
    },
};
use crate::{
    ecc::{fr_from_buffer, FR_SIZE},
    errors::ProofSystemError,
    transcript::Transcript,
};


/// Plonk verifier for circuits with verification key `key`.
///
/// [`Verifier::verify_proof`] separates two kinds of failure: a proof that cannot be parsed
/// against the transcript manifest is an error, a well-formed proof that does not satisfy
/// the checks is `Ok(false)`.
#[derive(Debug)]
pub struct Verifier<S: Settings> {
    key: Arc<VerificationKey>,
    commitment_scheme: KateCommitmentScheme,
    phantom: PhantomData<S>,
}

impl<S: Settings> Verifier<S> {
    /// Create a verifier for `key`.
    pub fn new(key: Arc<VerificationKey>) -> Self {
        Self {
            key,
            commitment_scheme: KateCommitmentScheme,
            phantom: PhantomData,
        }
    }

    /// The verification key.
    pub fn key(&self) -> &VerificationKey {
        &self.key
    }

    fn parse(&self, proof: &Proof) -> Result<Transcript<S::Hasher>> {
        Transcript::from_serialized(
            &proof.proof_data,
            S::create_manifest(self.key.num_public_inputs),
            S::NUM_CHALLENGE_BYTES,
        )
    }

    /// Public input values carried by `proof`.
    pub fn read_public_inputs(&self, proof: &Proof) -> Result<Vec<Fr>> {
        let transcript = self.parse(proof)?;
        decode_public_inputs(transcript.get_element("public_inputs")?)
    }

    /// Commitment of a polynomial: witness commitments come from the proof, preprocessed
    /// ones from the key.
    fn commitment(
        &self,
        transcript: &Transcript<S::Hasher>,
        index: PolynomialIndex,
    ) -> Result<G1Affine> {
        let descriptor = self
            .key
            .polynomial_manifest()
            .get(index)
            .ok_or_else(|| anyhow::anyhow!("{} is not in the manifest", index.label()))?;
        match descriptor.source {
            PolynomialSource::Witness => transcript.get_group_element(descriptor.commitment_label),
            PolynomialSource::Selector | PolynomialSource::Permutation => {
                self.key.get_commitment(descriptor.commitment_label)
            }
        }
    }

    /// Verify `proof`.
    ///
    /// Replays the transcript to recover the challenges, recomputes the quotient evaluation
    /// from the linearisation identity, and checks both openings with a single pairing.
    ///
    /// # Errors
    /// If the proof does not have the layout the manifest prescribes or holds invalid encodings.
    pub fn verify_proof(&self, proof: &Proof) -> Result<bool> {
        ensure!(
            self.key.composer_type == S::composer_type(),
            "verification key is for {:?} circuits, settings are for {:?}",
            self.key.composer_type,
            S::composer_type()
        );
        let mut transcript = self.parse(proof)?;

        let circuit_size = BigEndian::read_u32(transcript.get_element("circuit_size")?) as usize;
        let num_public_inputs =
            BigEndian::read_u32(transcript.get_element("public_input_size")?) as usize;
        if circuit_size != self.key.circuit_size || num_public_inputs != self.key.num_public_inputs {
            warn!(
                "proof is for a circuit of size {} with {} public inputs, key expects {} and {}",
                circuit_size,
                num_public_inputs,
                self.key.circuit_size,
                self.key.num_public_inputs
            );
            return Ok(false);
        }
        let public_inputs = decode_public_inputs(transcript.get_element("public_inputs")?)?;
        if public_inputs.len() != self.key.num_public_inputs {
            return Err(ProofSystemError::PublicInputCount {
                expected: self.key.num_public_inputs,
                actual: public_inputs.len(),
            }
            .into());
        }

        for challenge in ["init", "beta", "alpha", "z"] {
            transcript.apply_fiat_shamir(challenge)?;
        }
        let domain = self.key.domain()?;
        let zeta = transcript.get_challenge_field_element("z", 0)?;
        let lagrange = domain.get_lagrange_evaluations(&zeta);
        if lagrange.vanishing_poly.is_zero() {
            warn!("evaluation challenge lies in the circuit domain");
            return Ok(false);
        }
        let context = EvaluationContext {
            zeta,
            lagrange,
            public_input_evaluation: compute_public_input_evaluation(&domain, &public_inputs, &zeta),
        };

        // t(zeta) Z_H(zeta) = r(zeta) + the constant terms of every widget
        let r_eval = transcript.get_field_element("r")?;
        let mut numerator = r_eval;
        let mut alpha_base = PermutationWidget::compute_quotient_evaluation_contribution(
            &context,
            Fr::one(),
            &transcript,
            &mut numerator,
        )?;
        for widget in S::transition_widgets() {
            alpha_base = widget.compute_quotient_evaluation_contribution(
                &context,
                alpha_base,
                &transcript,
                &mut numerator,
            )?;
        }
        let t_eval = numerator
            * lagrange
                .vanishing_poly
                .inverse()
                .ok_or_else(|| anyhow::anyhow!("vanishing polynomial has no inverse"))?;
        transcript.add_field_element("t", &t_eval);
        transcript.apply_fiat_shamir("nu")?;
        transcript.apply_fiat_shamir("separator")?;

        let claim = self.batch_opening_claim(&transcript, &context, t_eval, domain.root)?;
        let g2_x = self.key.g2_x;
        let valid = self.commitment_scheme.batch_verify(&claim, &g2_x);
        if valid {
            info!("proof verified for a circuit of size {}", circuit_size);
        } else {
            debug!("pairing check failed");
        }
        Ok(valid)
    }

    /// Gather the commitments, scalars and evaluations of the two openings, in the order the
    /// prover batched them with powers of `nu`.
    fn batch_opening_claim(
        &self,
        transcript: &Transcript<S::Hasher>,
        context: &EvaluationContext,
        t_eval: Fr,
        omega: Fr,
    ) -> Result<BatchOpeningClaim> {
        let manifest = self.key.polynomial_manifest();
        let nu = transcript.get_challenge_field_element("nu", 0)?;
        let separator = transcript.get_challenge_field_element("separator", 0)?;
        let zeta = context.zeta;

        let mut claim = BatchOpeningClaim {
            z: zeta,
            z_omega: zeta * omega,
            opening_z: transcript.get_group_element("PI_Z")?,
            opening_z_omega: transcript.get_group_element("PI_Z_OMEGA")?,
            separator,
            ..Default::default()
        };

        // T_1 + zeta^n T_2 + zeta^{2n} T_3
        let zeta_n = zeta.pow([self.key.circuit_size as u64]);
        let mut scale = Fr::one();
        for i in 1..=NUM_QUOTIENT_PARTS {
            claim.points.push(transcript.get_group_element(&format!("T_{i}"))?);
            claim.scalars.push(scale);
            scale *= zeta_n;
        }
        claim.batch_evaluation = t_eval;

        let mut nu_power = Fr::one();
        for descriptor in manifest.unshifted_openings() {
            nu_power *= nu;
            claim.points.push(self.commitment(transcript, descriptor.index)?);
            claim.scalars.push(nu_power);
            claim.batch_evaluation +=
                nu_power * transcript.get_field_element(descriptor.polynomial_label)?;
        }

        nu_power *= nu;
        let terms = compute_linearisation_terms(S::transition_widgets(), context, transcript)?;
        for (index, scalar) in terms {
            claim.points.push(self.commitment(transcript, index)?);
            claim.scalars.push(nu_power * scalar);
        }
        claim.batch_evaluation += nu_power * transcript.get_field_element("r")?;

        for descriptor in manifest.shifted_openings() {
            nu_power *= nu;
            let scalar = nu_power * separator;
            claim.points.push(self.commitment(transcript, descriptor.index)?);
            claim.scalars.push(scalar);
            claim.batch_evaluation +=
                scalar * transcript.get_field_element(&descriptor.shifted_label())?;
        }
        Ok(claim)
    }
}

fn decode_public_inputs(bytes: &[u8]) -> Result<Vec<Fr>> {
    ensure!(
        bytes.len() % FR_SIZE == 0,
        "public inputs take {} bytes, not a multiple of {}",
        bytes.len(),
        FR_SIZE
    );
    bytes.chunks(FR_SIZE).map(fr_from_buffer).collect()
}
