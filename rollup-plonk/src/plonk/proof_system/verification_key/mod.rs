use anyhow::{anyhow, Result};
use ark_bn254::{G1Affine, G2Affine};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::{
    ecc::{
        g1_to_buffer,
        serialization::{g1_hex, g2_hex},
    },
    plonk::composer::composer_base::ComposerType,
    polynomials::evaluation_domain::EvaluationDomain,
    srs::reference_string::VerifierReferenceString,
};

use super::{
    commitment_scheme::{CommitmentScheme, KateCommitmentScheme},
    proving_key::ProvingKey,
    types::PolynomialManifest,
};

/// A commitment to one preprocessed polynomial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedCommitment {
    /// e.g. `Q_M`, `SIGMA_3`
    pub label: String,
    /// `[p(x)]_1`
    #[serde(with = "g1_hex")]
    pub commitment: G1Affine,
}

/// What a verifier needs to know about a circuit.
///
/// Commitments are kept in polynomial-manifest order, which is also the order
/// [`VerificationKey::sha256_hash`] reads them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationKey {
    /// circuit family
    pub composer_type: ComposerType,
    /// number of rows n
    pub circuit_size: usize,
    /// public input rows at the top of the table
    pub num_public_inputs: usize,
    /// selector and sigma commitments
    pub commitments: Vec<NamedCommitment>,
    /// `[x]_2`
    #[serde(with = "g2_hex")]
    pub g2_x: G2Affine,
}

impl VerificationKey {
    /// Commit to every preprocessed polynomial of `proving_key`.
    pub fn from_proving_key(
        proving_key: &ProvingKey,
        reference_string: &dyn VerifierReferenceString,
    ) -> Result<Self> {
        let scheme = KateCommitmentScheme;
        let commitments = proving_key
            .polynomial_manifest
            .preprocessed()
            .map(|descriptor| {
                let polynomial = proving_key
                    .polynomial_store
                    .get(descriptor.polynomial_label)?;
                let commitment = scheme.commit(
                    polynomial.get_coefficients(),
                    proving_key.reference_string.as_ref(),
                )?;
                Ok(NamedCommitment {
                    label: descriptor.commitment_label.to_string(),
                    commitment,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        debug!("committed to {} preprocessed polynomials", commitments.len());

        Ok(Self {
            composer_type: proving_key.composer_type,
            circuit_size: proving_key.circuit_size,
            num_public_inputs: proving_key.num_public_inputs,
            commitments,
            g2_x: reference_string.get_g2x(),
        })
    }

    /// Commitment called `label`.
    pub fn get_commitment(&self, label: &str) -> Result<G1Affine> {
        self.commitments
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.commitment)
            .ok_or_else(|| anyhow!("verification key has no commitment {label}"))
    }

    /// Polynomials of this key's circuit family.
    pub fn polynomial_manifest(&self) -> &'static PolynomialManifest {
        PolynomialManifest::for_composer(self.composer_type)
    }

    /// The circuit domain.
    pub fn domain(&self) -> Result<EvaluationDomain> {
        EvaluationDomain::new(self.circuit_size)
    }

    /// SHA-256 of the circuit's identity: composer type, circuit size and public input count
    /// as big-endian `u32`s, then each commitment's 64-byte encoding in order.
    ///
    /// Any change to the gates of a circuit changes this hash.
    pub fn sha256_hash(&self) -> [u8; 32] {
        let composer_tag: u32 = match self.composer_type {
            ComposerType::Standard => 0,
            ComposerType::Extended => 1,
        };
        let mut hasher = Sha256::new();
        hasher.update(composer_tag.to_be_bytes());
        hasher.update((self.circuit_size as u32).to_be_bytes());
        hasher.update((self.num_public_inputs as u32).to_be_bytes());
        for c in &self.commitments {
            hasher.update(g1_to_buffer(&c.commitment));
        }
        hasher.finalize().into()
    }
}
