use std::sync::Arc;

use ark_bn254::Fr;
use ark_ff::{One, Zero};

use super::composer_base::{
    CircuitTable, ComposerBase, ComposerBaseData, ComposerType, SelectorProperties,
};
use crate::plonk::proof_system::types::prover_settings::StandardSettings;
use crate::proof_system::arithmetization::gate_data::{AddTriple, MulTriple, PolyTriple};
use crate::srs::reference_string::ReferenceStringFactory;

/// Selector columns of the standard composer, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StandardSelectors {
    QM,
    QC,
    Q1,
    Q2,
    Q3,
}

pub(crate) const NUM_STANDARD_SELECTORS: usize = 5;

pub(crate) fn standard_selector_properties() -> Vec<SelectorProperties> {
    vec![
        SelectorProperties {
            name: "q_m",
            commitment_label: "Q_M",
        },
        SelectorProperties {
            name: "q_c",
            commitment_label: "Q_C",
        },
        SelectorProperties {
            name: "q_1",
            commitment_label: "Q_1",
        },
        SelectorProperties {
            name: "q_2",
            commitment_label: "Q_2",
        },
        SelectorProperties {
            name: "q_3",
            commitment_label: "Q_3",
        },
    ]
}

/// Selector values of a row, standard columns only.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct StandardRow {
    pub(crate) q_m: Fr,
    pub(crate) q_c: Fr,
    pub(crate) q_1: Fr,
    pub(crate) q_2: Fr,
    pub(crate) q_3: Fr,
}

impl StandardRow {
    pub(crate) fn values(&self) -> [Fr; NUM_STANDARD_SELECTORS] {
        let mut values = [Fr::zero(); NUM_STANDARD_SELECTORS];
        values[StandardSelectors::QM as usize] = self.q_m;
        values[StandardSelectors::QC as usize] = self.q_c;
        values[StandardSelectors::Q1 as usize] = self.q_1;
        values[StandardSelectors::Q2 as usize] = self.q_2;
        values[StandardSelectors::Q3 as usize] = self.q_3;
        values
    }

    pub(crate) fn from_add(ins: &AddTriple) -> Self {
        Self {
            q_m: Fr::zero(),
            q_c: ins.const_scaling,
            q_1: ins.a_scaling,
            q_2: ins.b_scaling,
            q_3: ins.c_scaling,
        }
    }

    pub(crate) fn from_mul(ins: &MulTriple) -> Self {
        Self {
            q_m: ins.mul_scaling,
            q_c: ins.const_scaling,
            q_1: Fr::zero(),
            q_2: Fr::zero(),
            q_3: ins.c_scaling,
        }
    }

    pub(crate) fn from_poly(ins: &PolyTriple) -> Self {
        Self {
            q_m: ins.q_m,
            q_c: ins.q_c,
            q_1: ins.q_l,
            q_2: ins.q_r,
            q_3: ins.q_o,
        }
    }

    pub(crate) fn bool_check() -> Self {
        Self {
            q_m: Fr::one(),
            q_3: -Fr::one(),
            ..Self::default()
        }
    }

    /// `q_m = q_1 = q_2 = q_3 = 1` with the constant that makes `(1, 0, 2)` and `(0, 2, 1)` pass.
    pub(crate) fn dummy(q_c: Fr) -> Self {
        Self {
            q_m: Fr::one(),
            q_c,
            q_1: Fr::one(),
            q_2: Fr::one(),
            q_3: Fr::one(),
        }
    }
}

/// Width-3 PLONK composer with the `q_m, q_c, q_1, q_2, q_3` selectors.
#[derive(Debug)]
pub struct StandardComposer {
    cbd: ComposerBaseData,
}

impl StandardComposer {
    /// A composer drawing its reference strings from `crs_factory`. Allocates the zero
    /// variable and the dummy gates.
    pub fn new(crs_factory: Arc<dyn ReferenceStringFactory>) -> Self {
        let mut composer = Self {
            cbd: ComposerBaseData::new(crs_factory, standard_selector_properties()),
        };
        let zero_idx = composer.put_constant_variable(Fr::zero());
        composer.cbd.zero_idx = zero_idx;
        composer.create_dummy_gates();
        composer
    }

    /// Two rows over the constants 1, 0 and 2 so that no selector polynomial is zero
    /// and the permutation is not the identity.
    fn create_dummy_gates(&mut self) {
        let a = self.add_variable(Fr::one());
        let b = self.add_variable(Fr::zero());
        let c = self.add_variable(Fr::from(2u64));
        let row = StandardRow::dummy(-Fr::from(3u64));
        self.cbd.push_gate([a, b, c], &row.values());
        self.cbd.push_gate([b, c, a], &row.values());
    }

    fn push_row(&mut self, wires: [u32; 3], row: StandardRow) {
        self.cbd.push_gate(wires, &row.values());
    }
}

impl ComposerBase for StandardComposer {
    type Settings = StandardSettings;

    #[inline(always)]
    fn composer_base(&self) -> &ComposerBaseData {
        &self.cbd
    }

    #[inline(always)]
    fn composer_base_mut(&mut self) -> &mut ComposerBaseData {
        &mut self.cbd
    }

    /// Create an addition gate.
    ///
    /// # Arguments
    /// - `in_` - An add_triple containing the indexes of variables to be placed into the
    /// wires w_l, w_r, w_o and addition coefficients to be placed into q_1, q_2, q_3, q_c.
    fn create_add_gate(&mut self, in_: &AddTriple) {
        self.push_row([in_.a, in_.b, in_.c], StandardRow::from_add(in_));
    }

    /// Create a multiplication gate. Both factors are marked as fixed.
    fn create_mul_gate(&mut self, in_: &MulTriple) {
        self.push_row([in_.a, in_.b, in_.c], StandardRow::from_mul(in_));
        self.cbd.mark_fixed(in_.a);
        self.cbd.mark_fixed(in_.b);
    }

    /// Create a bool gate: `v * v - v == 0` on `(v, v, v)`.
    fn create_bool_gate(&mut self, variable_index: u32) {
        self.push_row(
            [variable_index, variable_index, variable_index],
            StandardRow::bool_check(),
        );
        self.cbd.mark_bool(variable_index);
    }

    /// Create a gate where you set all the indexes and coefficients yourself.
    fn create_poly_gate(&mut self, in_: &PolyTriple) {
        self.push_row([in_.a, in_.b, in_.c], StandardRow::from_poly(in_));
    }

    fn finalize_circuit(&mut self) -> Arc<CircuitTable> {
        if let Some(table) = &self.cbd.finalized {
            return table.clone();
        }
        let public_input_row = StandardRow {
            q_1: Fr::one(),
            ..StandardRow::default()
        };
        let table = Arc::new(
            self.cbd
                .to_circuit_table(ComposerType::Standard, public_input_row.values().to_vec()),
        );
        self.cbd.finalized = Some(table.clone());
        table
    }
}
