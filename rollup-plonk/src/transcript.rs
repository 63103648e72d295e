use std::collections::HashMap;
use std::fmt::Debug;
use std::marker::PhantomData;

use anyhow::{bail, ensure, Result};
use ark_bn254::{Fr, G1Affine};
use ark_ff::PrimeField;
use generic_array::{ArrayLength, GenericArray};
use sha3::Digest;
use tracing::debug;
use typenum::{Unsigned, U16, U32};

use crate::ecc::{fr_from_buffer, fr_to_buffer, g1_from_buffer, g1_to_buffer};
use crate::errors::ProofSystemError;

/// Hash function driving the Fiat-Shamir transform.
pub trait BarretenHasher: Debug + Default + Clone + Send + Sync + 'static {
    /// Bytes of security; challenges never carry more than this.
    type SecurityParameterSize: ArrayLength<u8> + Debug;
    /// Output size of the hash.
    type PrngOutputSize: ArrayLength<u8> + Debug;

    /// Hash a buffer.
    fn hash(buffer: &[u8]) -> GenericArray<u8, Self::PrngOutputSize>;
}

/// Keccak-256, the hasher for proofs checked outside a circuit.
#[derive(Debug, Default, Clone, Copy)]
pub struct Keccak256;

impl BarretenHasher for Keccak256 {
    type SecurityParameterSize = U32;
    type PrngOutputSize = U32;

    fn hash(buffer: &[u8]) -> GenericArray<u8, Self::PrngOutputSize> {
        let digest = sha3::Keccak256::digest(buffer);
        GenericArray::clone_from_slice(digest.as_slice())
    }
}

/// BLAKE3 with 128-bit challenges, the hasher for proofs that are recursively verified.
#[derive(Debug, Default, Clone, Copy)]
pub struct Blake3s;

impl BarretenHasher for Blake3s {
    type SecurityParameterSize = U16;
    type PrngOutputSize = U32;

    fn hash(buffer: &[u8]) -> GenericArray<u8, Self::PrngOutputSize> {
        GenericArray::clone_from_slice(blake3::hash(buffer).as_bytes())
    }
}

/// ManifestEntry describes one piece of data that is used in a particular round of the protocol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestEntry {
    /// element name
    pub name: String,
    /// serialized size
    pub num_bytes: usize,
    /// computed by the verifier rather than read from the proof
    pub derived_by_verifier: bool,
    /// index into the round's challenges, or -1 for the constant 1
    pub challenge_map_index: i32,
}

impl ManifestEntry {
    /// An entry that is sent by the prover.
    pub fn new(name: &str, num_bytes: usize) -> Self {
        Self {
            name: name.to_string(),
            num_bytes,
            derived_by_verifier: false,
            challenge_map_index: 0,
        }
    }

    /// An entry the verifier recomputes itself.
    pub fn derived(name: &str, num_bytes: usize) -> Self {
        Self {
            derived_by_verifier: true,
            ..Self::new(name, num_bytes)
        }
    }
}

/// The RoundManifest struct describes the data used in one round of the protocol
/// and the challenge(s) created from that data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundManifest {
    /// Data used in the round.
    pub elements: Vec<ManifestEntry>,
    /// The name of the challenge (alpha, beta, etc.).
    pub challenge: String,
    /// The number of challenges to generate (sometimes we need more than one, e.g in permutation_widget).
    pub num_challenges: usize,
    /// Whether to put elements in a challenge_map in the transcript.
    pub map_challenges: bool,
}

impl RoundManifest {
    /// A round hashing `elements` into `num_challenges` challenges called `challenge`.
    pub fn new(elements: Vec<ManifestEntry>, challenge: &str, num_challenges: usize) -> Self {
        Self {
            elements,
            challenge: challenge.to_string(),
            num_challenges,
            map_challenges: false,
        }
    }

    /// Checks if there is an element in the list with the given name.
    pub fn includes_element(&self, element_name: &str) -> bool {
        self.elements.iter().any(|e| e.name == element_name)
    }
}

/// Manifest is used by composers to define the structure of the protocol. It specifies:
/// 1. What data is used in each round of the protocols.
/// 2. Which information is used to create challenges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    round_manifests: Vec<RoundManifest>,
}

impl Manifest {
    /// Manifest with the given rounds, in protocol order.
    pub fn new(round_manifests: Vec<RoundManifest>) -> Self {
        Self { round_manifests }
    }

    /// number of rounds
    pub fn get_num_rounds(&self) -> usize {
        self.round_manifests.len()
    }

    /// round `round`
    pub fn get_round_manifest(&self, round: usize) -> &RoundManifest {
        &self.round_manifests[round]
    }

    /// all rounds
    pub fn get_round_manifests(&self) -> &[RoundManifest] {
        &self.round_manifests
    }

    /// Total bytes the prover sends.
    pub fn proof_size(&self) -> usize {
        self.round_manifests
            .iter()
            .flat_map(|r| r.elements.iter())
            .filter(|e| !e.derived_by_verifier)
            .map(|e| e.num_bytes)
            .sum()
    }
}

#[derive(Debug, Clone, Default)]
struct Challenge<H: BarretenHasher> {
    data: GenericArray<u8, H::PrngOutputSize>,
}

/// Fiat-Shamir transcript. The prover adds elements round by round and derives challenges;
/// the verifier rebuilds the same state from the serialized proof.
#[derive(Debug, Clone)]
pub struct Transcript<H: BarretenHasher> {
    current_round: usize,
    num_challenge_bytes: usize,
    elements: HashMap<String, Vec<u8>>,
    challenges: HashMap<String, Vec<Challenge<H>>>,
    current_challenge: Challenge<H>,
    manifest: Manifest,
    challenge_map: HashMap<String, i32>,
    phantom: PhantomData<H>,
}

impl<H: BarretenHasher> Transcript<H> {
    /// An empty transcript following `manifest`, producing challenges of `num_challenge_bytes` bytes.
    pub fn new(manifest: Manifest, num_challenge_bytes: usize) -> Self {
        assert!(
            num_challenge_bytes > 0
                && num_challenge_bytes <= <H::SecurityParameterSize as Unsigned>::USIZE,
            "challenge size exceeds the hasher's security parameter"
        );
        let mut transcript = Self {
            current_round: 0,
            num_challenge_bytes,
            elements: HashMap::new(),
            challenges: HashMap::new(),
            current_challenge: Challenge {
                data: GenericArray::default(),
            },
            manifest,
            challenge_map: HashMap::new(),
            phantom: PhantomData,
        };
        transcript.compute_challenge_map();
        transcript
    }

    /// Constructs a transcript from a serialized proof, splitting it according to `manifest`.
    ///
    /// # Arguments
    ///
    /// * `input_transcript` - The serialized transcript.
    /// * `manifest` - The manifest which governs the parsing.
    /// * `num_challenge_bytes` - The number of bytes per challenge to generate.
    pub fn from_serialized(
        input_transcript: &[u8],
        manifest: Manifest,
        num_challenge_bytes: usize,
    ) -> Result<Self> {
        let total_required_size = manifest.proof_size();
        if total_required_size != input_transcript.len() {
            return Err(ProofSystemError::MalformedProof(format!(
                "expected {} bytes, got {}",
                total_required_size,
                input_transcript.len()
            ))
            .into());
        }

        let mut elements = HashMap::new();
        let mut count = 0;
        for round in manifest.get_round_manifests() {
            for entry in round.elements.iter().filter(|e| !e.derived_by_verifier) {
                let end = count + entry.num_bytes;
                elements.insert(entry.name.clone(), input_transcript[count..end].to_vec());
                count = end;
            }
        }

        let mut transcript = Self::new(manifest, num_challenge_bytes);
        transcript.elements = elements;
        Ok(transcript)
    }

    /// The manifest this transcript follows.
    pub fn get_manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Record `buffer` under `element_name`, replacing any previous value.
    pub fn add_element(&mut self, element_name: &str, buffer: Vec<u8>) {
        debug!("adding element {} to transcript", element_name);
        self.elements.insert(element_name.to_string(), buffer);
    }

    /// Record a field element.
    pub fn add_field_element(&mut self, element_name: &str, value: &Fr) {
        self.add_element(element_name, fr_to_buffer(value));
    }

    /// Record a group element.
    pub fn add_group_element(&mut self, element_name: &str, value: &G1Affine) {
        self.add_element(element_name, g1_to_buffer(value));
    }

    /// Apply the Fiat-Shamir transform to create challenges for the current round.
    /// The challenges are saved to transcript. Round number is increased.
    ///
    /// The hash input is the last challenge of the previous round followed by this round's
    /// elements, so every challenge depends on everything sent before it.
    pub fn apply_fiat_shamir(&mut self, challenge_name: &str) -> Result<()> {
        ensure!(
            self.current_round < self.manifest.get_num_rounds(),
            "transcript has no round left for challenge {}",
            challenge_name
        );
        let round = self.manifest.get_round_manifest(self.current_round).clone();
        ensure!(
            challenge_name == round.challenge,
            "challenge {} requested but round {} produces {}",
            challenge_name,
            self.current_round,
            round.challenge
        );

        let num_challenges = round.num_challenges;
        if num_challenges == 0 {
            self.current_round += 1;
            return Ok(());
        }

        let mut buffer = Vec::new();
        if self.current_round > 0 {
            buffer.extend_from_slice(&self.current_challenge.data);
        }
        for entry in round.elements.iter() {
            let element_data = match self.elements.get(&entry.name) {
                Some(data) => data,
                None => {
                    return Err(ProofSystemError::MissingTranscriptElement(entry.name.clone()).into())
                }
            };
            if !entry.derived_by_verifier {
                ensure!(
                    entry.num_bytes == element_data.len(),
                    "element {} has {} bytes, manifest says {}",
                    entry.name,
                    element_data.len(),
                    entry.num_bytes
                );
            }
            buffer.extend_from_slice(element_data);
        }

        let base_hash = H::hash(&buffer);
        let prng_output_size = <H::PrngOutputSize as Unsigned>::USIZE;
        let challenges_per_hash = prng_output_size / self.num_challenge_bytes;

        let mut round_challenges = Vec::with_capacity(num_challenges);
        self.push_challenges(&base_hash, 0, challenges_per_hash, num_challenges, &mut round_challenges);

        let num_hashes = (num_challenges + challenges_per_hash - 1) / challenges_per_hash;
        let mut rolling_buffer = base_hash.to_vec();
        rolling_buffer.push(0);
        for i in 1..num_hashes {
            // hash(base_hash, i)
            let last = rolling_buffer.len() - 1;
            rolling_buffer[last] = i as u8;
            let hash_output = H::hash(&rolling_buffer);
            self.push_challenges(
                &hash_output,
                challenges_per_hash * i,
                challenges_per_hash,
                num_challenges,
                &mut round_challenges,
            );
        }

        if let Some(last) = round_challenges.last() {
            self.current_challenge = last.clone();
        }
        debug!(
            "derived {} challenge(s) for {} in round {}",
            round_challenges.len(),
            challenge_name,
            self.current_round
        );
        self.challenges
            .insert(challenge_name.to_string(), round_challenges);
        self.current_round += 1;
        Ok(())
    }

    /// Slice `hash` into left-padded challenges, stopping at `num_challenges` overall.
    fn push_challenges(
        &self,
        hash: &GenericArray<u8, H::PrngOutputSize>,
        first_index: usize,
        challenges_per_hash: usize,
        num_challenges: usize,
        out: &mut Vec<Challenge<H>>,
    ) {
        let prng_output_size = <H::PrngOutputSize as Unsigned>::USIZE;
        for j in 0..challenges_per_hash {
            if first_index + j >= num_challenges {
                break;
            }
            let mut data: GenericArray<u8, H::PrngOutputSize> = GenericArray::default();
            data[prng_output_size - self.num_challenge_bytes..].copy_from_slice(
                &hash[j * self.num_challenge_bytes..(j + 1) * self.num_challenge_bytes],
            );
            out.push(Challenge { data });
        }
    }

    /// Get the challenge with the given name at index.
    pub fn get_challenge(
        &self,
        challenge_name: &str,
        idx: usize,
    ) -> Result<GenericArray<u8, H::PrngOutputSize>> {
        match self.challenges.get(challenge_name).and_then(|c| c.get(idx)) {
            Some(challenge) => Ok(challenge.data.clone()),
            None => Err(ProofSystemError::MissingChallenge(format!("{challenge_name}[{idx}]")).into()),
        }
    }

    /// The challenge interpreted as a big-endian integer, reduced into the field.
    pub fn get_challenge_field_element(&self, challenge_name: &str, idx: usize) -> Result<Fr> {
        let data = self.get_challenge(challenge_name, idx)?;
        Ok(Fr::from_be_bytes_mod_order(&data))
    }

    /// Get the challenge index from map (needed when we name subchallenges).
    pub fn get_challenge_index_from_map(&self, challenge_map_name: &str) -> Option<i32> {
        self.challenge_map.get(challenge_map_name).copied()
    }

    /// Check if a challenge exists.
    pub fn has_challenge(&self, challenge_name: &str) -> bool {
        self.challenges.contains_key(challenge_name)
    }

    /// Get a particular subchallenge value by the name of the subchallenge.
    /// An index of -1 in the manifest stands for the constant 1.
    pub fn get_challenge_from_map(
        &self,
        challenge_name: &str,
        challenge_map_name: &str,
    ) -> Result<GenericArray<u8, H::PrngOutputSize>> {
        let key = match self.get_challenge_index_from_map(challenge_map_name) {
            Some(key) => key,
            None => {
                return Err(ProofSystemError::MissingChallenge(challenge_map_name.to_string()).into())
            }
        };
        if key == -1 {
            let mut result: GenericArray<u8, H::PrngOutputSize> = GenericArray::default();
            result[<H::PrngOutputSize as Unsigned>::USIZE - 1] = 1;
            return Ok(result);
        }
        self.get_challenge(challenge_name, key as usize)
    }

    /// Get the number of challenges derived under `challenge_name`.
    pub fn get_num_challenges(&self, challenge_name: &str) -> Result<usize> {
        match self.challenges.get(challenge_name) {
            Some(c) => Ok(c.len()),
            None => Err(ProofSystemError::MissingChallenge(challenge_name.to_string()).into()),
        }
    }

    /// gets the value of an element in the transcript.
    pub fn get_element(&self, element_name: &str) -> Result<&[u8]> {
        match self.elements.get(element_name) {
            Some(e) => Ok(e),
            None => Err(ProofSystemError::MissingTranscriptElement(element_name.to_string()).into()),
        }
    }

    /// Decode a field element.
    pub fn get_field_element(&self, element_name: &str) -> Result<Fr> {
        fr_from_buffer(self.get_element(element_name)?)
    }

    /// Decode a group element.
    pub fn get_group_element(&self, element_name: &str) -> Result<G1Affine> {
        g1_from_buffer(self.get_element(element_name)?)
    }

    /// gets the size of an element from the manifest.
    pub fn get_element_size(&self, element_name: &str) -> Option<usize> {
        self.manifest
            .get_round_manifests()
            .iter()
            .flat_map(|r| r.elements.iter())
            .find(|e| e.name == element_name)
            .map(|e| e.num_bytes)
    }

    /// serialize the prover-sent elements, in manifest order.
    pub fn export_transcript(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(self.manifest.proof_size());
        for round in self.manifest.get_round_manifests() {
            for entry in round.elements.iter().filter(|e| !e.derived_by_verifier) {
                let element_data = self.get_element(&entry.name)?;
                if element_data.len() != entry.num_bytes {
                    bail!(
                        "element {} has {} bytes, manifest says {}",
                        entry.name,
                        element_data.len(),
                        entry.num_bytes
                    );
                }
                buffer.extend_from_slice(element_data);
            }
        }
        Ok(buffer)
    }

    /// Insert element names from all rounds of the manifest
    /// into the challenge_map.
    pub fn compute_challenge_map(&mut self) {
        self.challenge_map.clear();
        for round in self.manifest.get_round_manifests() {
            if round.map_challenges {
                for element in round.elements.iter() {
                    self.challenge_map
                        .insert(element.name.clone(), element.challenge_map_index);
                }
            }
        }
    }

    /// Mock prover transcript interactions up to fiat-shamir of a given challenge.
    ///
    /// This is useful for testing individual parts of the prover since all
    /// transcript interactions must occur sequentially according to the manifest.
    pub fn mock_inputs_prior_to_challenge(
        &mut self,
        challenge_in: &str,
        circuit_size: usize,
    ) -> Result<()> {
        let rounds = self.manifest.get_round_manifests().to_vec();
        for round in rounds {
            for entry in round.elements.iter() {
                if entry.name == "circuit_size" {
                    self.add_element("circuit_size", (circuit_size as u32).to_be_bytes().to_vec());
                } else {
                    // arbitrary buffer of 1's
                    self.add_element(&entry.name, vec![1; entry.num_bytes]);
                }
            }
            if challenge_in == round.challenge {
                break;
            }
            self.apply_fiat_shamir(&round.challenge)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::{One, Zero};

    fn create_manifest(num_public_inputs: usize) -> Manifest {
        let g1_size = 64;
        let fr_size = 32;
        let public_input_size = fr_size * num_public_inputs;
        Manifest::new(vec![
            RoundManifest::new(
                vec![
                    ManifestEntry::new("circuit_size", 4),
                    ManifestEntry::new("public_input_size", 4),
                ],
                "init",
                1,
            ),
            RoundManifest::new(
                vec![
                    ManifestEntry::new("public_inputs", public_input_size),
                    ManifestEntry::new("W_1", g1_size),
                    ManifestEntry::new("W_2", g1_size),
                    ManifestEntry::new("W_3", g1_size),
                ],
                "beta",
                2,
            ),
            RoundManifest::new(vec![ManifestEntry::new("Z_PERM", g1_size)], "alpha", 1),
            RoundManifest::new(
                vec![
                    ManifestEntry::new("T_1", g1_size),
                    ManifestEntry::new("T_2", g1_size),
                    ManifestEntry::new("T_3", g1_size),
                ],
                "z",
                1,
            ),
            RoundManifest::new(
                vec![
                    ManifestEntry::new("w_1", fr_size),
                    ManifestEntry::derived("t", fr_size),
                ],
                "nu",
                11,
            ),
            RoundManifest::new(
                vec![
                    ManifestEntry::new("PI_Z", g1_size),
                    ManifestEntry::new("PI_Z_OMEGA", g1_size),
                ],
                "separator",
                1,
            ),
        ])
    }

    fn run_prover(transcript: &mut Transcript<Keccak256>) {
        let g = G1Affine::default();
        transcript.add_element("circuit_size", vec![0, 0, 0, 32]);
        transcript.add_element("public_input_size", vec![0, 0, 0, 0]);
        transcript.apply_fiat_shamir("init").unwrap();
        transcript.add_element("public_inputs", vec![]);
        for w in ["W_1", "W_2", "W_3"] {
            transcript.add_group_element(w, &g);
        }
        transcript.apply_fiat_shamir("beta").unwrap();
        transcript.add_group_element("Z_PERM", &g);
        transcript.apply_fiat_shamir("alpha").unwrap();
        for t in ["T_1", "T_2", "T_3"] {
            transcript.add_group_element(t, &g);
        }
        transcript.apply_fiat_shamir("z").unwrap();
        transcript.add_field_element("w_1", &Fr::from(7u64));
        transcript.add_field_element("t", &Fr::from(9u64));
        transcript.apply_fiat_shamir("nu").unwrap();
        transcript.add_group_element("PI_Z", &g);
        transcript.add_group_element("PI_Z_OMEGA", &g);
        transcript.apply_fiat_shamir("separator").unwrap();
    }

    #[test]
    fn keccak_matches_known_vector() {
        let empty = Keccak256::hash(&[]);
        assert_eq!(
            hex::encode(empty),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn transcripts_print_for_both_hashers() {
        let mut keccak = Transcript::<Keccak256>::new(create_manifest(0), 32);
        run_prover(&mut keccak);
        let printed = format!("{keccak:?}");
        assert!(printed.contains("current_round: 6"));
        assert!(printed.contains("current_challenge"));

        let blake = Transcript::<Blake3s>::new(create_manifest(0), 16);
        assert!(format!("{blake:?}").starts_with("Transcript"));
    }

    #[test]
    fn challenges_are_left_padded() {
        let mut transcript = Transcript::<Keccak256>::new(create_manifest(0), 16);
        run_prover(&mut transcript);
        let beta = transcript.get_challenge("beta", 0).unwrap();
        let gamma = transcript.get_challenge("beta", 1).unwrap();
        assert!(beta[..16].iter().all(|b| *b == 0));
        assert!(gamma[..16].iter().all(|b| *b == 0));
        assert_ne!(beta, gamma);
        assert_eq!(transcript.get_num_challenges("beta").unwrap(), 2);
        assert_eq!(transcript.get_num_challenges("nu").unwrap(), 11);
        assert!(!transcript.get_challenge_field_element("z", 0).unwrap().is_zero());
    }

    #[test]
    fn prover_and_verifier_derive_the_same_challenges() {
        let mut prover = Transcript::<Blake3s>::new(create_manifest(0), 16);
        let mut as_keccak = Transcript::<Keccak256>::new(create_manifest(0), 16);
        run_prover(&mut as_keccak);

        prover.add_element("circuit_size", vec![0, 0, 0, 32]);
        prover.add_element("public_input_size", vec![0, 0, 0, 0]);
        prover.apply_fiat_shamir("init").unwrap();

        let proof = as_keccak.export_transcript().unwrap();
        assert_eq!(proof.len(), create_manifest(0).proof_size());

        let mut verifier =
            Transcript::<Keccak256>::from_serialized(&proof, create_manifest(0), 16).unwrap();
        for challenge in ["init", "beta", "alpha", "z"] {
            verifier.apply_fiat_shamir(challenge).unwrap();
        }
        verifier.add_field_element("t", &Fr::from(9u64));
        verifier.apply_fiat_shamir("nu").unwrap();
        verifier.apply_fiat_shamir("separator").unwrap();
        for (name, count) in [("init", 1), ("beta", 2), ("alpha", 1), ("z", 1), ("nu", 11)] {
            for i in 0..count {
                assert_eq!(
                    verifier.get_challenge(name, i).unwrap(),
                    as_keccak.get_challenge(name, i).unwrap()
                );
            }
        }
        assert_eq!(verifier.get_field_element("w_1").unwrap(), Fr::from(7u64));

        // a different hasher gives different challenges
        assert_ne!(
            prover.get_challenge("init", 0).unwrap(),
            as_keccak.get_challenge("init", 0).unwrap()
        );
    }

    #[test]
    fn derived_element_changes_later_challenges() {
        let mut a = Transcript::<Keccak256>::new(create_manifest(0), 16);
        run_prover(&mut a);
        let proof = a.export_transcript().unwrap();
        let mut b = Transcript::<Keccak256>::from_serialized(&proof, create_manifest(0), 16).unwrap();
        for challenge in ["init", "beta", "alpha", "z"] {
            b.apply_fiat_shamir(challenge).unwrap();
        }
        b.add_field_element("t", &Fr::from(10u64));
        b.apply_fiat_shamir("nu").unwrap();
        assert_ne!(
            a.get_challenge("nu", 0).unwrap(),
            b.get_challenge("nu", 0).unwrap()
        );
    }

    #[test]
    fn wrong_proof_length_is_rejected() {
        let err = Transcript::<Keccak256>::from_serialized(&[0u8; 3], create_manifest(0), 16)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProofSystemError>(),
            Some(ProofSystemError::MalformedProof(_))
        ));
    }

    #[test]
    fn out_of_order_challenge_is_rejected() {
        let mut transcript = Transcript::<Keccak256>::new(create_manifest(0), 16);
        transcript.add_element("circuit_size", vec![0, 0, 0, 32]);
        transcript.add_element("public_input_size", vec![0, 0, 0, 0]);
        assert!(transcript.apply_fiat_shamir("beta").is_err());
        assert!(transcript.apply_fiat_shamir("init").is_ok());
        // W_1..W_3 missing
        assert!(transcript.apply_fiat_shamir("beta").is_err());
        assert!(transcript.get_challenge("alpha", 0).is_err());
    }

    #[test]
    fn mock_inputs_stop_before_the_named_challenge() {
        let mut transcript = Transcript::<Keccak256>::new(create_manifest(0), 16);
        transcript.mock_inputs_prior_to_challenge("z", 32).unwrap();
        assert!(transcript.has_challenge("alpha"));
        assert!(!transcript.has_challenge("z"));
        assert_eq!(transcript.get_element("circuit_size").unwrap(), &[0, 0, 0, 32]);
        assert_eq!(transcript.get_element_size("T_1"), Some(64));
        assert_eq!(transcript.get_element_size("missing"), None);
    }

    #[test]
    fn challenge_map_resolves_named_subchallenges() {
        let mut nu_round = RoundManifest::new(
            vec![
                ManifestEntry {
                    challenge_map_index: -1,
                    ..ManifestEntry::new("w_1", 32)
                },
                ManifestEntry {
                    challenge_map_index: 1,
                    ..ManifestEntry::new("w_2", 32)
                },
            ],
            "nu",
            2,
        );
        nu_round.map_challenges = true;
        let mut transcript = Transcript::<Keccak256>::new(Manifest::new(vec![nu_round]), 16);
        transcript.add_field_element("w_1", &Fr::one());
        transcript.add_field_element("w_2", &Fr::one());
        transcript.apply_fiat_shamir("nu").unwrap();
        let one = transcript.get_challenge_from_map("nu", "w_1").unwrap();
        assert_eq!(Fr::from_be_bytes_mod_order(&one), Fr::one());
        assert_eq!(
            transcript.get_challenge_from_map("nu", "w_2").unwrap(),
            transcript.get_challenge("nu", 1).unwrap()
        );
        assert_eq!(transcript.get_challenge_index_from_map("w_2"), Some(1));
    }
}
