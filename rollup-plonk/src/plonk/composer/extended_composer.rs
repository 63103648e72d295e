use std::collections::HashSet;
use std::sync::Arc;

use ark_bn254::Fr;
use ark_ff::{One, Zero};
use tracing::info;

use super::composer_base::{
    CircuitTable, ComposerBase, ComposerBaseData, ComposerType, SelectorProperties,
};
use super::gate_merging::{combine_gates, MergeContext};
use super::standard_composer::{standard_selector_properties, StandardRow};
use crate::plonk::proof_system::types::prover_settings::ExtendedSettings;
use crate::proof_system::arithmetization::gate_data::{AddTriple, MulTriple, PolyTriple};
use crate::srs::reference_string::ReferenceStringFactory;

/// Selector columns of the extended composer, in storage order. The first five match
/// the standard composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExtendedSelectors {
    QM,
    QC,
    Q1,
    Q2,
    Q3,
    QOO,
    QLeftBools,
    QRightBools,
    QOutputBools,
}

pub(crate) const NUM_EXTENDED_SELECTORS: usize = 9;

fn extended_selector_properties() -> Vec<SelectorProperties> {
    let mut properties = standard_selector_properties();
    properties.extend([
        SelectorProperties {
            name: "q_oo",
            commitment_label: "Q_OO",
        },
        SelectorProperties {
            name: "q_left_bools",
            commitment_label: "Q_LEFT_BOOLS",
        },
        SelectorProperties {
            name: "q_right_bools",
            commitment_label: "Q_RIGHT_BOOLS",
        },
        SelectorProperties {
            name: "q_output_bools",
            commitment_label: "Q_OUTPUT_BOOLS",
        },
    ]);
    properties
}

#[derive(Debug, Clone, Copy, Default)]
struct ExtendedRow {
    standard: StandardRow,
    q_oo: Fr,
    q_left_bools: Fr,
    q_right_bools: Fr,
    q_output_bools: Fr,
}

impl ExtendedRow {
    fn values(&self) -> [Fr; NUM_EXTENDED_SELECTORS] {
        let mut values = [Fr::zero(); NUM_EXTENDED_SELECTORS];
        values[..5].copy_from_slice(&self.standard.values());
        values[ExtendedSelectors::QOO as usize] = self.q_oo;
        values[ExtendedSelectors::QLeftBools as usize] = self.q_left_bools;
        values[ExtendedSelectors::QRightBools as usize] = self.q_right_bools;
        values[ExtendedSelectors::QOutputBools as usize] = self.q_output_bools;
        values
    }
}

impl From<StandardRow> for ExtendedRow {
    fn from(standard: StandardRow) -> Self {
        Self {
            standard,
            ..Self::default()
        }
    }
}

/// Rows reserved at the start of every circuit: the zero constant and two dummy gates.
pub(crate) const NUM_RESERVED_GATES: usize = 3;

/// Standard composer with a next-row output selector and boolean selectors.
///
/// Boolean checks are deferred and packed two to a row when the circuit is finalized.
/// Finalization can also merge pairs of linear rows through a shared intermediate
/// variable, see [`ExtendedComposer::set_gate_merging`].
#[derive(Debug)]
pub struct ExtendedComposer {
    cbd: ComposerBaseData,
    deferred_bool_gates: Vec<u32>,
    merge_gates: bool,
    gate_index_map: Option<Vec<u32>>,
}

impl ExtendedComposer {
    /// A composer drawing its reference strings from `crs_factory`, with gate merging on.
    pub fn new(crs_factory: Arc<dyn ReferenceStringFactory>) -> Self {
        let mut composer = Self {
            cbd: ComposerBaseData::new(crs_factory, extended_selector_properties()),
            deferred_bool_gates: Vec::new(),
            merge_gates: true,
            gate_index_map: None,
        };
        let zero_idx = composer.put_constant_variable(Fr::zero());
        composer.cbd.zero_idx = zero_idx;
        composer.create_dummy_gates();
        composer
    }

    /// Turn the gate merging pass on or off. Has no effect once the circuit is finalized.
    pub fn set_gate_merging(&mut self, enabled: bool) {
        self.merge_gates = enabled;
    }

    /// Row of each pre-merge gate in the finalized table, once merging has run.
    pub fn gate_index_map(&self) -> Option<&[u32]> {
        self.gate_index_map.as_deref()
    }

    /// Boolean checks waiting to be packed into rows.
    pub fn num_deferred_bool_gates(&self) -> usize {
        self.deferred_bool_gates.len()
    }

    fn create_dummy_gates(&mut self) {
        let a = self.add_variable(Fr::one());
        let b = self.add_variable(Fr::zero());
        let c = self.add_variable(Fr::from(2u64));
        // the first row also reads the second row's output, which holds a = 1
        let first = ExtendedRow {
            standard: StandardRow::dummy(-Fr::from(4u64)),
            q_oo: Fr::one(),
            q_left_bools: Fr::one(),
            q_right_bools: Fr::one(),
            ..ExtendedRow::default()
        };
        let second = ExtendedRow {
            standard: StandardRow::dummy(-Fr::from(3u64)),
            q_output_bools: Fr::one(),
            ..ExtendedRow::default()
        };
        self.push_row([a, b, c], first);
        self.push_row([b, c, a], second);
    }

    fn push_row(&mut self, wires: [u32; 3], row: ExtendedRow) {
        self.cbd.push_gate(wires, &row.values());
    }

    /// Pack the deferred boolean checks two to a row.
    fn process_bool_gates(&mut self) {
        let zero_idx = self.cbd.zero_idx;
        let pending = std::mem::take(&mut self.deferred_bool_gates);
        let mut pairs = pending.chunks_exact(2);
        for pair in pairs.by_ref() {
            let row = ExtendedRow {
                q_left_bools: Fr::one(),
                q_right_bools: Fr::one(),
                ..ExtendedRow::default()
            };
            self.push_row([pair[0], pair[1], zero_idx], row);
        }
        if let [last] = pairs.remainder() {
            let row = ExtendedRow {
                q_left_bools: Fr::one(),
                ..ExtendedRow::default()
            };
            self.push_row([*last, zero_idx, zero_idx], row);
        }
    }
}

impl ComposerBase for ExtendedComposer {
    type Settings = ExtendedSettings;

    #[inline(always)]
    fn composer_base(&self) -> &ComposerBaseData {
        &self.cbd
    }

    #[inline(always)]
    fn composer_base_mut(&mut self) -> &mut ComposerBaseData {
        &mut self.cbd
    }

    fn get_num_gates(&self) -> usize {
        match &self.cbd.finalized {
            Some(table) => table.num_gates(),
            None => self.cbd.num_gates + (self.deferred_bool_gates.len() + 1) / 2,
        }
    }

    fn create_add_gate(&mut self, in_: &AddTriple) {
        self.push_row([in_.a, in_.b, in_.c], StandardRow::from_add(in_).into());
    }

    fn create_mul_gate(&mut self, in_: &MulTriple) {
        self.push_row([in_.a, in_.b, in_.c], StandardRow::from_mul(in_).into());
        self.cbd.mark_fixed(in_.a);
        self.cbd.mark_fixed(in_.b);
    }

    /// Defer the check; it is packed with another one when the circuit is finalized.
    fn create_bool_gate(&mut self, variable_index: u32) {
        assert!(
            self.cbd.finalized.is_none(),
            "cannot add gates to a finalized circuit"
        );
        self.cbd.assert_valid_variables(&[variable_index]);
        self.deferred_bool_gates.push(variable_index);
        self.cbd.mark_bool(variable_index);
    }

    fn create_poly_gate(&mut self, in_: &PolyTriple) {
        self.push_row([in_.a, in_.b, in_.c], StandardRow::from_poly(in_).into());
    }

    fn finalize_circuit(&mut self) -> Arc<CircuitTable> {
        if let Some(table) = &self.cbd.finalized {
            return table.clone();
        }
        self.process_bool_gates();

        let public_input_row: ExtendedRow = StandardRow {
            q_1: Fr::one(),
            ..StandardRow::default()
        }
        .into();
        let mut table = self
            .cbd
            .to_circuit_table(ComposerType::Extended, public_input_row.values().to_vec());

        if self.merge_gates {
            let is_public: HashSet<u32> = table.public_inputs.iter().copied().collect();
            let context = MergeContext {
                zero_idx: self.cbd.real_variable_index[self.cbd.zero_idx as usize],
                is_fixed: &self.cbd.is_fixed,
                is_bool: &self.cbd.is_bool,
                is_public: &is_public,
                first_mergeable_row: NUM_RESERVED_GATES,
            };
            let combination = combine_gates(&context, &table);
            info!(
                "gate merging: {} rows -> {}",
                table.num_gates(),
                combination.table.num_gates()
            );
            table = combination.table;
            self.gate_index_map = Some(combination.old_to_new);
        }

        let table = Arc::new(table);
        self.cbd.finalized = Some(table.clone());
        table
    }
}
