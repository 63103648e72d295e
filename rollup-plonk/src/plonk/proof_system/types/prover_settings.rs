use std::fmt::Debug;

use crate::{
    ecc::{FR_SIZE, G1_SIZE},
    plonk::{
        composer::composer_base::ComposerType,
        proof_system::{
            constants::NUM_QUOTIENT_PARTS, types::PolynomialManifest,
            widgets::transition_widgets::TransitionWidget,
        },
    },
    transcript::{BarretenHasher, Blake3s, Keccak256, Manifest, ManifestEntry, RoundManifest},
};

/// Protocol parameters of one circuit family: transcript hash, challenge size and the
/// widgets that make up the quotient.
pub trait Settings: Debug + Clone + Copy + Default + Send + Sync + 'static {
    /// Fiat-Shamir hash.
    type Hasher: BarretenHasher;

    /// Bytes per challenge.
    const NUM_CHALLENGE_BYTES: usize = 16;
    /// Wires per gate.
    const PROGRAM_WIDTH: usize = 3;

    /// Composer whose circuits these settings prove.
    fn composer_type() -> ComposerType;

    /// Gate widgets, in the order they consume powers of alpha.
    fn transition_widgets() -> &'static [TransitionWidget];

    /// Polynomials committed to and opened.
    fn polynomial_manifest() -> &'static PolynomialManifest {
        PolynomialManifest::for_composer(Self::composer_type())
    }

    /// Transcript layout for a circuit with `num_public_inputs` public inputs.
    fn create_manifest(num_public_inputs: usize) -> Manifest {
        let polynomial_manifest = Self::polynomial_manifest();

        let mut evaluations: Vec<ManifestEntry> = polynomial_manifest
            .unshifted_openings()
            .map(|d| ManifestEntry::new(d.polynomial_label, FR_SIZE))
            .collect();
        evaluations.push(ManifestEntry::new("r", FR_SIZE));
        evaluations.extend(
            polynomial_manifest
                .shifted_openings()
                .map(|d| ManifestEntry::new(&d.shifted_label(), FR_SIZE)),
        );
        evaluations.push(ManifestEntry::derived("t", FR_SIZE));

        let quotient_commitments = (1..=NUM_QUOTIENT_PARTS)
            .map(|i| ManifestEntry::new(&format!("T_{i}"), G1_SIZE))
            .collect();

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
                    ManifestEntry::new("public_inputs", FR_SIZE * num_public_inputs),
                    ManifestEntry::new("W_1", G1_SIZE),
                    ManifestEntry::new("W_2", G1_SIZE),
                    ManifestEntry::new("W_3", G1_SIZE),
                ],
                "beta",
                2,
            ),
            RoundManifest::new(vec![ManifestEntry::new("Z_PERM", G1_SIZE)], "alpha", 1),
            RoundManifest::new(quotient_commitments, "z", 1),
            RoundManifest::new(evaluations, "nu", 1),
            RoundManifest::new(
                vec![
                    ManifestEntry::new("PI_Z", G1_SIZE),
                    ManifestEntry::new("PI_Z_OMEGA", G1_SIZE),
                ],
                "separator",
                1,
            ),
        ])
    }
}

/// Settings for [`crate::plonk::composer::standard_composer::StandardComposer`] circuits.
/// Uses Keccak-256 so proofs can be checked outside a circuit.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardSettings;

impl Settings for StandardSettings {
    type Hasher = Keccak256;

    fn composer_type() -> ComposerType {
        ComposerType::Standard
    }

    fn transition_widgets() -> &'static [TransitionWidget] {
        &[TransitionWidget::Arithmetic]
    }
}

/// Settings for [`crate::plonk::composer::extended_composer::ExtendedComposer`] circuits.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtendedSettings;

impl Settings for ExtendedSettings {
    type Hasher = Blake3s;

    fn composer_type() -> ComposerType {
        ComposerType::Extended
    }

    // the sequential widget reads the arithmetic widget's power of alpha, so it goes first
    fn transition_widgets() -> &'static [TransitionWidget] {
        &[
            TransitionWidget::Sequential,
            TransitionWidget::Arithmetic,
            TransitionWidget::Bool,
        ]
    }
}
