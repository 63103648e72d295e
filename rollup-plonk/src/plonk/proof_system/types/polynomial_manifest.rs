use std::ops::Index;

use crate::plonk::composer::composer_base::ComposerType;

/// Where a polynomial comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolynomialSource {
    /// computed by the prover from the witness
    Witness,
    /// a preprocessed selector
    Selector,
    /// a preprocessed copy permutation
    Permutation,
}

/// Every polynomial the proof system knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolynomialIndex {
    /// multiplication selector
    QM,
    /// constant selector
    QC,
    /// left wire selector
    Q1,
    /// right wire selector
    Q2,
    /// output wire selector
    Q3,
    /// next-row output selector
    QOO,
    /// boolean check on the left wire
    QLeftBools,
    /// boolean check on the right wire
    QRightBools,
    /// boolean check on the output wire
    QOutputBools,
    /// permutation of the left wire
    Sigma1,
    /// permutation of the right wire
    Sigma2,
    /// permutation of the output wire
    Sigma3,
    /// left wire
    W1,
    /// right wire
    W2,
    /// output wire
    W3,
    /// grand product of the permutation argument
    Z,
}

impl PolynomialIndex {
    /// Name under which the polynomial is stored, and of its evaluation in the transcript.
    pub fn label(self) -> &'static str {
        use PolynomialIndex::*;
        match self {
            QM => "q_m",
            QC => "q_c",
            Q1 => "q_1",
            Q2 => "q_2",
            Q3 => "q_3",
            QOO => "q_oo",
            QLeftBools => "q_left_bools",
            QRightBools => "q_right_bools",
            QOutputBools => "q_output_bools",
            Sigma1 => "sigma_1",
            Sigma2 => "sigma_2",
            Sigma3 => "sigma_3",
            W1 => "w_1",
            W2 => "w_2",
            W3 => "w_3",
            Z => "z_perm",
        }
    }
}

/// A polynomial together with how it is committed and opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolynomialDescriptor {
    /// label of the commitment in the proof or verification key
    pub commitment_label: &'static str,
    /// label of the polynomial and of its evaluation at the challenge point
    pub polynomial_label: &'static str,
    /// also opened at `z * omega`
    pub requires_shifted_evaluation: bool,
    /// enters the opening through the linearisation polynomial instead of its own evaluation
    pub is_linearised: bool,
    /// origin
    pub source: PolynomialSource,
    /// identity
    pub index: PolynomialIndex,
}

impl PolynomialDescriptor {
    const fn new(
        commitment_label: &'static str,
        polynomial_label: &'static str,
        requires_shifted_evaluation: bool,
        is_linearised: bool,
        source: PolynomialSource,
        index: PolynomialIndex,
    ) -> Self {
        PolynomialDescriptor {
            commitment_label,
            polynomial_label,
            requires_shifted_evaluation,
            is_linearised,
            source,
            index,
        }
    }

    /// Transcript name of the evaluation at `z * omega`.
    pub fn shifted_label(&self) -> String {
        format!("{}_omega", self.polynomial_label)
    }
}

/// Ordered list of the polynomials a circuit type commits to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolynomialManifest {
    manifest: Vec<PolynomialDescriptor>,
}

lazy_static::lazy_static! {
    static ref STANDARD_POLYNOMIAL_MANIFEST: PolynomialManifest = {
        use PolynomialIndex::*;
        use PolynomialSource::*;
        let manifest = vec![
            PolynomialDescriptor::new("W_1", "w_1", false, false, Witness, W1),
            PolynomialDescriptor::new("W_2", "w_2", false, false, Witness, W2),
            PolynomialDescriptor::new("W_3", "w_3", false, false, Witness, W3),
            PolynomialDescriptor::new("Z_PERM", "z_perm", true, true, Witness, Z),
            PolynomialDescriptor::new("Q_M", "q_m", false, true, Selector, QM),
            PolynomialDescriptor::new("Q_C", "q_c", false, true, Selector, QC),
            PolynomialDescriptor::new("Q_1", "q_1", false, true, Selector, Q1),
            PolynomialDescriptor::new("Q_2", "q_2", false, true, Selector, Q2),
            PolynomialDescriptor::new("Q_3", "q_3", false, true, Selector, Q3),
            PolynomialDescriptor::new("SIGMA_1", "sigma_1", false, false, Permutation, Sigma1),
            PolynomialDescriptor::new("SIGMA_2", "sigma_2", false, false, Permutation, Sigma2),
            PolynomialDescriptor::new("SIGMA_3", "sigma_3", false, true, Permutation, Sigma3),
        ];
        PolynomialManifest { manifest }
    };

    // w_3 is also read on the next row through q_oo
    static ref EXTENDED_POLYNOMIAL_MANIFEST: PolynomialManifest = {
        use PolynomialIndex::*;
        use PolynomialSource::*;
        let manifest = vec![
            PolynomialDescriptor::new("W_1", "w_1", false, false, Witness, W1),
            PolynomialDescriptor::new("W_2", "w_2", false, false, Witness, W2),
            PolynomialDescriptor::new("W_3", "w_3", true, false, Witness, W3),
            PolynomialDescriptor::new("Z_PERM", "z_perm", true, true, Witness, Z),
            PolynomialDescriptor::new("Q_M", "q_m", false, true, Selector, QM),
            PolynomialDescriptor::new("Q_C", "q_c", false, true, Selector, QC),
            PolynomialDescriptor::new("Q_1", "q_1", false, true, Selector, Q1),
            PolynomialDescriptor::new("Q_2", "q_2", false, true, Selector, Q2),
            PolynomialDescriptor::new("Q_3", "q_3", false, true, Selector, Q3),
            PolynomialDescriptor::new("Q_OO", "q_oo", false, true, Selector, QOO),
            PolynomialDescriptor::new("Q_LEFT_BOOLS", "q_left_bools", false, true, Selector, QLeftBools),
            PolynomialDescriptor::new("Q_RIGHT_BOOLS", "q_right_bools", false, true, Selector, QRightBools),
            PolynomialDescriptor::new("Q_OUTPUT_BOOLS", "q_output_bools", false, true, Selector, QOutputBools),
            PolynomialDescriptor::new("SIGMA_1", "sigma_1", false, false, Permutation, Sigma1),
            PolynomialDescriptor::new("SIGMA_2", "sigma_2", false, false, Permutation, Sigma2),
            PolynomialDescriptor::new("SIGMA_3", "sigma_3", false, true, Permutation, Sigma3),
        ];
        PolynomialManifest { manifest }
    };
}

impl PolynomialManifest {
    /// The manifest of circuits built by a composer of type `composer_type`.
    pub fn for_composer(composer_type: ComposerType) -> &'static PolynomialManifest {
        match composer_type {
            ComposerType::Standard => &STANDARD_POLYNOMIAL_MANIFEST,
            ComposerType::Extended => &EXTENDED_POLYNOMIAL_MANIFEST,
        }
    }

    /// number of polynomials
    pub fn len(&self) -> usize {
        self.manifest.len()
    }

    /// whether the manifest is empty
    pub fn is_empty(&self) -> bool {
        self.manifest.is_empty()
    }

    /// All descriptors, in order.
    pub fn iter(&self) -> impl Iterator<Item = &PolynomialDescriptor> {
        self.manifest.iter()
    }

    /// Descriptor of `index`, if this manifest has it.
    pub fn get(&self, index: PolynomialIndex) -> Option<&PolynomialDescriptor> {
        self.manifest.iter().find(|d| d.index == index)
    }

    /// Polynomials whose evaluation at `z` is sent in the proof.
    pub fn unshifted_openings(&self) -> impl Iterator<Item = &PolynomialDescriptor> {
        self.manifest.iter().filter(|d| !d.is_linearised)
    }

    /// Polynomials whose evaluation at `z * omega` is sent in the proof.
    pub fn shifted_openings(&self) -> impl Iterator<Item = &PolynomialDescriptor> {
        self.manifest.iter().filter(|d| d.requires_shifted_evaluation)
    }

    /// Preprocessed polynomials, committed to in the verification key.
    pub fn preprocessed(&self) -> impl Iterator<Item = &PolynomialDescriptor> {
        self.manifest
            .iter()
            .filter(|d| d.source != PolynomialSource::Witness)
    }
}

impl Index<usize> for PolynomialManifest {
    type Output = PolynomialDescriptor;

    fn index(&self, index: usize) -> &Self::Output {
        &self.manifest[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_manifest_layout() {
        let manifest = PolynomialManifest::for_composer(ComposerType::Standard);
        assert_eq!(manifest.len(), 12);
        let opened: Vec<&str> = manifest
            .unshifted_openings()
            .map(|d| d.polynomial_label)
            .collect();
        assert_eq!(opened, ["w_1", "w_2", "w_3", "sigma_1", "sigma_2"]);
        let shifted: Vec<String> = manifest.shifted_openings().map(|d| d.shifted_label()).collect();
        assert_eq!(shifted, ["z_perm_omega"]);
        assert_eq!(manifest.preprocessed().count(), 8);
    }

    #[test]
    fn extended_manifest_opens_w_3_on_the_next_row() {
        let manifest = PolynomialManifest::for_composer(ComposerType::Extended);
        assert_eq!(manifest.preprocessed().count(), 12);
        let shifted: Vec<String> = manifest.shifted_openings().map(|d| d.shifted_label()).collect();
        assert_eq!(shifted, ["w_3_omega", "z_perm_omega"]);
        assert_eq!(manifest[9].commitment_label, "Q_OO");
        assert!(manifest.get(PolynomialIndex::QLeftBools).is_some());
        assert!(PolynomialManifest::for_composer(ComposerType::Standard)
            .get(PolynomialIndex::QOO)
            .is_none());
    }
}
