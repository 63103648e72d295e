use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use ark_bn254::Fr;
use ark_ff::{Field, One, Zero};
use tracing::{debug, info};

use crate::errors::CircuitError;
use crate::numeric::uint256::fr_to_u256;
use crate::plonk::proof_system::{
    prover::{Prover, Witness},
    proving_key::ProvingKey,
    types::prover_settings::Settings,
    verification_key::VerificationKey,
    verifier::Verifier,
};
use crate::proof_system::arithmetization::gate_data::{AddTriple, MulTriple, PolyTriple};
use crate::srs::reference_string::ReferenceStringFactory;

/// Marks the real variable at the end of an equivalence class.
pub const REAL_VARIABLE: u32 = u32::MAX - 1;
/// Marks the first variable of an equivalence class.
pub const FIRST_VARIABLE_IN_CLASS: u32 = u32::MAX - 2;

/// Wire column of a cell. The discriminant is the tag packed into sigma values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum WireType {
    /// w_l
    Left = 0,
    /// w_r
    Right = 1 << 30,
    /// w_o
    Output = 1 << 31,
}

impl WireType {
    /// All columns in order.
    pub const ALL: [WireType; 3] = [WireType::Left, WireType::Right, WireType::Output];

    /// Column number, 0 to 2.
    #[inline]
    pub fn column(self) -> usize {
        match self {
            WireType::Left => 0,
            WireType::Right => 1,
            WireType::Output => 2,
        }
    }

    /// Inverse of [`WireType::column`].
    #[inline]
    pub fn from_column(column: usize) -> Self {
        Self::ALL[column]
    }

    /// Tag added to a row index in a sigma value.
    #[inline]
    pub fn tag(self) -> u32 {
        self as u32
    }
}

/// One placement of a variable: the cell at `(gate_index, wire_type)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CycleNode {
    /// row the variable sits in
    pub gate_index: u32,
    /// column the variable sits in
    pub wire_type: WireType,
}

impl CycleNode {
    /// new
    pub fn new(gate_index: u32, wire_type: WireType) -> Self {
        Self {
            gate_index,
            wire_type,
        }
    }
}

/// Which family of gates and widgets a circuit uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ComposerType {
    /// `q_m, q_c, q_1, q_2, q_3`
    Standard,
    /// the standard selectors plus `q_oo` and boolean selectors
    Extended,
}

/// A selector column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorProperties {
    /// polynomial name, e.g. `q_m`
    pub name: &'static str,
    /// commitment label in the verification key, e.g. `Q_M`
    pub commitment_label: &'static str,
}

/// The gate table handed to preprocessing, after any deferred work and rewrites.
///
/// Rows hold real variable indices. Public inputs are not rows yet: preprocessing places
/// one row per public input in front of the gates, with `public_input_selectors` as
/// selector values.
#[derive(Debug, Clone)]
pub struct CircuitTable {
    /// gate family
    pub composer_type: ComposerType,
    /// one entry per selector column
    pub selector_properties: Vec<SelectorProperties>,
    /// selector columns over the gate rows
    pub selectors: Vec<Vec<Fr>>,
    /// selector values of a public input row
    pub public_input_selectors: Vec<Fr>,
    /// `w_l, w_r, w_o` over the gate rows
    pub wires: [Vec<u32>; 3],
    /// per real variable, every cell holding it; rows are gate rows
    pub wire_copy_cycles: Vec<Vec<CycleNode>>,
    /// real variable index of each public input, in order
    pub public_inputs: Vec<u32>,
    /// witness values, indexed by variable
    pub variables: Vec<Fr>,
}

impl CircuitTable {
    /// Number of gate rows.
    pub fn num_gates(&self) -> usize {
        self.wires[0].len()
    }

    /// Number of public input rows placed before the gates.
    pub fn num_public_inputs(&self) -> usize {
        self.public_inputs.len()
    }

    /// Gate rows plus public input rows.
    pub fn num_rows(&self) -> usize {
        self.num_gates() + self.num_public_inputs()
    }

    /// Final row of each gate row once the public input rows are in place.
    pub fn adjusted_gate_indices(&self) -> Vec<u32> {
        let offset = self.num_public_inputs() as u32;
        (0..self.num_gates() as u32).map(|i| i + offset).collect()
    }

    /// Selector column called `name`.
    pub fn selector(&self, name: &str) -> Option<&[Fr]> {
        self.selector_properties
            .iter()
            .position(|p| p.name == name)
            .map(|i| self.selectors[i].as_slice())
    }

    /// Values of the public inputs.
    pub fn public_input_values(&self) -> Vec<Fr> {
        self.public_inputs
            .iter()
            .map(|&v| self.variables[v as usize])
            .collect()
    }

    /// Wire values over `n` rows: public input rows, gate rows, then zero padding.
    pub fn compute_wire_values(&self, n: usize) -> [Vec<Fr>; 3] {
        assert!(self.num_rows() <= n, "domain too small for the circuit");
        let mut columns: [Vec<Fr>; 3] = [
            vec![Fr::zero(); n],
            vec![Fr::zero(); n],
            vec![Fr::zero(); n],
        ];
        let offset = self.num_public_inputs();
        for (i, value) in self.public_input_values().into_iter().enumerate() {
            for column in columns.iter_mut() {
                column[i] = value;
            }
        }
        for (column, wire) in columns.iter_mut().zip(self.wires.iter()) {
            for (i, &v) in wire.iter().enumerate() {
                column[i + offset] = self.variables[v as usize];
            }
        }
        columns
    }

    /// First gate row whose identity fails for the stored witness, if any.
    pub fn find_failing_gate(&self) -> Option<usize> {
        let zero_column = vec![Fr::zero(); self.num_gates()];
        let column = |name: &str| self.selector(name).unwrap_or(zero_column.as_slice());
        let (q_m, q_c, q_1, q_2, q_3) = (
            column("q_m"),
            column("q_c"),
            column("q_1"),
            column("q_2"),
            column("q_3"),
        );
        let q_oo = column("q_oo");
        let bools = [
            column("q_left_bools"),
            column("q_right_bools"),
            column("q_output_bools"),
        ];
        let value = |k: usize, i: usize| self.variables[self.wires[k][i] as usize];

        (0..self.num_gates()).find(|&i| {
            let (a, b, c) = (value(0, i), value(1, i), value(2, i));
            let next_c = if i + 1 < self.num_gates() {
                value(2, i + 1)
            } else {
                Fr::zero()
            };
            let arithmetic =
                q_m[i] * a * b + q_1[i] * a + q_2[i] * b + q_3[i] * c + q_c[i] + q_oo[i] * next_c;
            let bools_hold = [a, b, c]
                .iter()
                .zip(bools.iter())
                .all(|(w, q)| q[i].is_zero() || w.square() == *w);
            !arithmetic.is_zero() || !bools_hold
        })
    }
}

/// State shared by every composer: variables and their equivalence classes, the gate rows,
/// copy cycles and the first recorded constraint failure.
#[derive(Debug)]
pub struct ComposerBaseData {
    pub(crate) num_gates: usize,
    pub(crate) crs_factory: Arc<dyn ReferenceStringFactory>,
    pub(crate) selectors: Vec<Vec<Fr>>,
    pub(crate) selector_properties: Vec<SelectorProperties>,
    pub(crate) w_l: Vec<u32>,
    pub(crate) w_r: Vec<u32>,
    pub(crate) w_o: Vec<u32>,
    pub(crate) failed: bool,
    pub(crate) err: Option<String>,
    pub(crate) zero_idx: u32,
    pub(crate) public_inputs: Vec<u32>,
    pub(crate) variables: Vec<Fr>,
    /// index of next variable in equivalence class (=REAL_VARIABLE if you're last)
    pub(crate) next_var_index: Vec<u32>,
    /// index of  previous variable in equivalence class (=FIRST if you're in a cycle alone)
    pub(crate) prev_var_index: Vec<u32>,
    /// indices of corresponding real variables
    pub(crate) real_variable_index: Vec<u32>,
    /// per real variable, every cell the class occupies
    pub(crate) wire_copy_cycles: Vec<Vec<CycleNode>>,
    /// variables that sit in a multiplication, by variable index
    pub(crate) is_fixed: Vec<bool>,
    /// variables carrying a boolean constraint, by variable index
    pub(crate) is_bool: Vec<bool>,
    pub(crate) constant_variable_indices: HashMap<Fr, u32>,
    pub(crate) finalized: Option<Arc<CircuitTable>>,
    pub(crate) circuit_proving_key: Option<Arc<ProvingKey>>,
    pub(crate) circuit_verification_key: Option<Arc<VerificationKey>>,
}

impl ComposerBaseData {
    /// Empty state with the given selector columns.
    pub fn new(
        crs_factory: Arc<dyn ReferenceStringFactory>,
        selector_properties: Vec<SelectorProperties>,
    ) -> Self {
        Self {
            num_gates: 0,
            crs_factory,
            selectors: vec![Vec::new(); selector_properties.len()],
            selector_properties,
            w_l: Vec::new(),
            w_r: Vec::new(),
            w_o: Vec::new(),
            failed: false,
            err: None,
            zero_idx: 0,
            public_inputs: Vec::new(),
            variables: Vec::new(),
            next_var_index: Vec::new(),
            prev_var_index: Vec::new(),
            real_variable_index: Vec::new(),
            wire_copy_cycles: Vec::new(),
            is_fixed: Vec::new(),
            is_bool: Vec::new(),
            constant_variable_indices: HashMap::new(),
            finalized: None,
            circuit_proving_key: None,
            circuit_verification_key: None,
        }
    }

    /// Panics if any index does not name an allocated variable.
    pub fn assert_valid_variables(&self, variable_indices: &[u32]) {
        for &variable_index in variable_indices {
            assert!(
                (variable_index as usize) < self.variables.len(),
                "variable index {variable_index} out of range"
            );
        }
    }

    /// Append `value` and return its index.
    pub fn add_variable(&mut self, value: Fr) -> u32 {
        self.variables.push(value);
        let index = (self.variables.len() - 1) as u32;
        self.real_variable_index.push(index);
        self.next_var_index.push(REAL_VARIABLE);
        self.prev_var_index.push(FIRST_VARIABLE_IN_CLASS);
        self.wire_copy_cycles.push(Vec::new());
        self.is_fixed.push(false);
        self.is_bool.push(false);
        index
    }

    /// Value of the class `index` belongs to.
    #[inline]
    pub fn get_variable(&self, index: u32) -> Fr {
        self.assert_valid_variables(&[index]);
        self.variables[self.real_variable_index[index as usize] as usize]
    }

    /// Index of the first variable in class
    pub(crate) fn get_first_variable_in_class(&self, mut index: u32) -> u32 {
        while self.prev_var_index[index as usize] != FIRST_VARIABLE_IN_CLASS {
            index = self.prev_var_index[index as usize];
        }
        index
    }

    /// Update all variables from index in equivalence class to have real variable new_real_index.
    pub(crate) fn update_real_variable_indices(&mut self, index: u32, new_real_index: u32) {
        let mut cur_index = index;
        loop {
            self.real_variable_index[cur_index as usize] = new_real_index;
            cur_index = self.next_var_index[cur_index as usize];
            if cur_index == REAL_VARIABLE {
                break;
            }
        }
    }

    /// Record the first constraint failure; later ones are ignored.
    pub fn failure(&mut self, msg: &str) {
        if !self.failed {
            debug!("constraint failure: {}", msg);
            self.failed = true;
            self.err = Some(msg.to_string());
        }
    }

    /// Append one gate row. Every wire gets a cycle node on its real variable.
    pub(crate) fn push_gate(&mut self, wires: [u32; 3], selector_values: &[Fr]) {
        assert!(
            self.finalized.is_none(),
            "cannot add gates to a finalized circuit"
        );
        assert_eq!(
            selector_values.len(),
            self.selectors.len(),
            "gate has the wrong number of selectors"
        );
        self.assert_valid_variables(&wires);
        let gate_index = self.num_gates as u32;
        self.w_l.push(wires[0]);
        self.w_r.push(wires[1]);
        self.w_o.push(wires[2]);
        for (column, value) in self.selectors.iter_mut().zip(selector_values) {
            column.push(*value);
        }
        for (variable, wire_type) in wires.iter().zip(WireType::ALL) {
            let real = self.real_variable_index[*variable as usize] as usize;
            self.wire_copy_cycles[real].push(CycleNode::new(gate_index, wire_type));
        }
        self.num_gates += 1;
    }

    pub(crate) fn is_fixed(&self, variable_index: u32) -> bool {
        self.is_fixed[self.real_variable_index[variable_index as usize] as usize]
    }

    pub(crate) fn is_bool(&self, variable_index: u32) -> bool {
        self.is_bool[self.real_variable_index[variable_index as usize] as usize]
    }

    pub(crate) fn mark_fixed(&mut self, variable_index: u32) {
        let real = self.real_variable_index[variable_index as usize] as usize;
        self.is_fixed[real] = true;
    }

    pub(crate) fn mark_bool(&mut self, variable_index: u32) {
        let real = self.real_variable_index[variable_index as usize] as usize;
        self.is_bool[real] = true;
    }

    /// Real indices of the public inputs.
    pub(crate) fn real_public_inputs(&self) -> Vec<u32> {
        self.public_inputs
            .iter()
            .map(|&v| self.real_variable_index[v as usize])
            .collect()
    }

    /// Snapshot of the current rows as a [`CircuitTable`].
    pub(crate) fn to_circuit_table(
        &self,
        composer_type: ComposerType,
        public_input_selectors: Vec<Fr>,
    ) -> CircuitTable {
        let expected = self.num_gates;
        assert!(
            self.w_l.len() == expected
                && self.w_r.len() == expected
                && self.w_o.len() == expected
                && self.selectors.iter().all(|s| s.len() == expected),
            "gate columns out of sync"
        );
        let real = |wire: &[u32]| -> Vec<u32> {
            wire.iter()
                .map(|&v| self.real_variable_index[v as usize])
                .collect()
        };
        CircuitTable {
            composer_type,
            selector_properties: self.selector_properties.clone(),
            selectors: self.selectors.clone(),
            public_input_selectors,
            wires: [real(&self.w_l), real(&self.w_r), real(&self.w_o)],
            wire_copy_cycles: self.wire_copy_cycles.clone(),
            public_inputs: self.real_public_inputs(),
            variables: self.variables.clone(),
        }
    }
}

/// Gate constructors, copy constraints and preprocessing shared by the composers.
pub trait ComposerBase {
    /// Proof system parameters for circuits built by this composer.
    type Settings: Settings;

    /// shared state
    fn composer_base(&self) -> &ComposerBaseData;
    /// shared state, mutably
    fn composer_base_mut(&mut self) -> &mut ComposerBaseData;

    /// Enforce `a_scaling * a + b_scaling * b + c_scaling * c + const_scaling == 0`.
    fn create_add_gate(&mut self, in_: &AddTriple);
    /// Enforce `mul_scaling * a * b + c_scaling * c + const_scaling == 0`.
    fn create_mul_gate(&mut self, in_: &MulTriple);
    /// Enforce `v * v - v == 0`.
    fn create_bool_gate(&mut self, variable_index: u32);
    /// Enforce the generic gate identity with caller-supplied selectors.
    fn create_poly_gate(&mut self, in_: &PolyTriple);
    /// Flush deferred work, run rewrites and freeze the gate table. Idempotent.
    fn finalize_circuit(&mut self) -> Arc<CircuitTable>;

    /// Current number of rows. After finalization, the rows of the frozen table.
    fn get_num_gates(&self) -> usize {
        let base = self.composer_base();
        match &base.finalized {
            Some(table) => table.num_gates(),
            None => base.num_gates,
        }
    }

    /// Number of allocated variables.
    fn get_num_variables(&self) -> usize {
        self.composer_base().variables.len()
    }

    /// Index of the variable holding zero.
    fn zero_idx(&self) -> u32 {
        self.composer_base().zero_idx
    }

    /// Add a witness value and return its index.
    fn add_variable(&mut self, value: Fr) -> u32 {
        self.composer_base_mut().add_variable(value)
    }

    /// Add a witness value and make it a public input.
    fn add_public_variable(&mut self, value: Fr) -> u32 {
        let index = self.add_variable(value);
        self.composer_base_mut().public_inputs.push(index);
        index
    }

    /// Make an existing variable a public input. Repeated calls are ignored.
    fn set_public_input(&mut self, witness_index: u32) {
        let base = self.composer_base_mut();
        base.assert_valid_variables(&[witness_index]);
        if !base.public_inputs.contains(&witness_index) {
            base.public_inputs.push(witness_index);
        }
    }

    /// Number of public inputs.
    fn get_num_public_inputs(&self) -> usize {
        self.composer_base().public_inputs.len()
    }

    /// Value of a variable.
    fn get_variable(&self, index: u32) -> Fr {
        self.composer_base().get_variable(index)
    }

    /// Record a named constraint failure. Only the first one is kept.
    fn failure(&mut self, msg: &str) {
        self.composer_base_mut().failure(msg);
    }

    /// Whether a constraint failure was recorded.
    fn failed(&self) -> bool {
        self.composer_base().failed
    }

    /// The first recorded failure.
    fn err(&self) -> Option<&str> {
        self.composer_base().err.as_deref()
    }

    /// Copy-constrain `a_variable_idx` and `b_variable_idx`, merging their classes.
    /// If the values differ, `msg` becomes the failure reason unless one is already set.
    fn assert_equal(&mut self, a_variable_idx: u32, b_variable_idx: u32, msg: &str) {
        let base = self.composer_base_mut();
        assert!(
            base.finalized.is_none(),
            "cannot add copy constraints to a finalized circuit"
        );
        base.assert_valid_variables(&[a_variable_idx, b_variable_idx]);
        let values_equal = base.get_variable(a_variable_idx) == base.get_variable(b_variable_idx);
        if !values_equal && !base.failed {
            base.failure(msg);
        }
        let a_real_idx = base.real_variable_index[a_variable_idx as usize];
        let b_real_idx = base.real_variable_index[b_variable_idx as usize];
        // If a==b is already enforced, exit method
        if a_real_idx == b_real_idx {
            return;
        }
        // Otherwise update the real_idx of b-chain members to that of a
        let b_start_idx = base.get_first_variable_in_class(b_variable_idx);
        base.update_real_variable_indices(b_start_idx, a_real_idx);
        // Now merge equivalence classes of a and b by tying last (= real) element of b-chain to first element of a-chain
        let a_start_idx = base.get_first_variable_in_class(a_variable_idx);
        base.next_var_index[b_real_idx as usize] = a_start_idx;
        base.prev_var_index[a_start_idx as usize] = b_real_idx;

        let moved = std::mem::take(&mut base.wire_copy_cycles[b_real_idx as usize]);
        base.wire_copy_cycles[a_real_idx as usize].extend(moved);
        base.is_fixed[a_real_idx as usize] |= base.is_fixed[b_real_idx as usize];
        base.is_bool[a_real_idx as usize] |= base.is_bool[b_real_idx as usize];
    }

    /// Constrain `a_idx` to equal the constant `b`.
    fn assert_equal_constant(&mut self, a_idx: u32, b: Fr, msg: &str) {
        if self.get_variable(a_idx) != b && !self.failed() {
            self.failure(msg);
        }
        let b_idx = self.put_constant_variable(b);
        self.assert_equal(a_idx, b_idx, msg);
    }

    /// Pin a variable to a value with a gate of its own.
    fn fix_witness(&mut self, witness_index: u32, witness_value: Fr) {
        let zero_idx = self.zero_idx();
        self.create_poly_gate(&PolyTriple {
            a: witness_index,
            b: zero_idx,
            c: zero_idx,
            q_m: Fr::zero(),
            q_l: Fr::one(),
            q_r: Fr::zero(),
            q_o: Fr::zero(),
            q_c: -witness_value,
        });
    }

    /// A variable fixed to `variable`. Each constant is only created once.
    fn put_constant_variable(&mut self, variable: Fr) -> u32 {
        if let Some(&index) = self.composer_base().constant_variable_indices.get(&variable) {
            return index;
        }
        let variable_index = self.add_variable(variable);
        self.fix_witness(variable_index, variable);
        self.composer_base_mut()
            .constant_variable_indices
            .insert(variable, variable_index);
        variable_index
    }

    /// Split a variable into base-4 quads, most significant first, and constrain
    /// `witness = sum 4^i quad_i`. Returns the running accumulators; the last equals the
    /// witness. A witness of more than `num_bits` bits records `msg` as failure.
    fn decompose_into_base4_accumulators(
        &mut self,
        witness_index: u32,
        num_bits: usize,
        msg: &str,
    ) -> Vec<u32> {
        assert!(num_bits > 0, "cannot decompose into zero bits");
        let target = fr_to_u256(&self.get_variable(witness_index));
        let num_quads = (num_bits + 1) >> 1;
        let four = Fr::from(4u64);

        let mut accumulators: Vec<u32> = Vec::with_capacity(num_quads);
        let mut accumulator = Fr::zero();
        for i in 0..num_quads {
            let bit_index = (num_quads - 1 - i) << 1;
            let lo = target.bit(bit_index);
            let quad_idx = if i == 0 && num_bits & 1 == 1 {
                // top quad of an odd width is a single bit
                let quad_idx = self.add_variable(Fr::from(lo as u64));
                self.create_bool_gate(quad_idx);
                quad_idx
            } else {
                let hi = target.bit(bit_index + 1);
                let lo_idx = self.add_variable(Fr::from(lo as u64));
                let hi_idx = self.add_variable(Fr::from(hi as u64));
                self.create_bool_gate(lo_idx);
                self.create_bool_gate(hi_idx);
                let quad_idx = self.add_variable(Fr::from(lo as u64 + 2 * hi as u64));
                self.create_add_gate(&AddTriple {
                    a: lo_idx,
                    b: hi_idx,
                    c: quad_idx,
                    a_scaling: Fr::one(),
                    b_scaling: Fr::from(2u64),
                    c_scaling: -Fr::one(),
                    const_scaling: Fr::zero(),
                });
                quad_idx
            };
            let quad = self.get_variable(quad_idx);

            match accumulators.last() {
                None => {
                    accumulators.push(quad_idx);
                    accumulator = quad;
                }
                Some(&previous_idx) => {
                    let new_accumulator = accumulator * four + quad;
                    let new_accumulator_idx = self.add_variable(new_accumulator);
                    self.create_add_gate(&AddTriple {
                        a: previous_idx,
                        b: quad_idx,
                        c: new_accumulator_idx,
                        a_scaling: four,
                        b_scaling: Fr::one(),
                        c_scaling: -Fr::one(),
                        const_scaling: Fr::zero(),
                    });
                    accumulators.push(new_accumulator_idx);
                    accumulator = new_accumulator;
                }
            }
        }
        // num_quads >= 1, so there is a last accumulator
        let last = accumulators[accumulators.len() - 1];
        self.assert_equal(witness_index, last, msg);
        accumulators
    }

    /// Constrain a variable to `num_bits` bits.
    fn create_range_constraint(&mut self, witness_index: u32, num_bits: usize, msg: &str) -> Vec<u32> {
        self.decompose_into_base4_accumulators(witness_index, num_bits, msg)
    }

    /// A boolean variable that is 1 iff `a_idx` is zero.
    fn is_zero(&mut self, a_idx: u32) -> u32 {
        let a = self.get_variable(a_idx);
        let inverse = a.inverse().unwrap_or_default();
        let is_zero = if a.is_zero() { Fr::one() } else { Fr::zero() };
        let inverse_idx = self.add_variable(inverse);
        let is_zero_idx = self.add_variable(is_zero);
        // a * inverse + is_zero - 1 == 0
        self.create_poly_gate(&PolyTriple {
            a: a_idx,
            b: inverse_idx,
            c: is_zero_idx,
            q_m: Fr::one(),
            q_l: Fr::zero(),
            q_r: Fr::zero(),
            q_o: Fr::one(),
            q_c: -Fr::one(),
        });
        // a * is_zero == 0
        let zero_idx = self.zero_idx();
        self.create_mul_gate(&MulTriple {
            a: a_idx,
            b: is_zero_idx,
            c: zero_idx,
            mul_scaling: Fr::one(),
            c_scaling: Fr::zero(),
            const_scaling: Fr::zero(),
        });
        self.composer_base_mut().mark_bool(is_zero_idx);
        is_zero_idx
    }

    /// `1 - a` for a boolean `a`.
    fn logical_not(&mut self, a_idx: u32) -> u32 {
        let value = Fr::one() - self.get_variable(a_idx);
        let result_idx = self.add_variable(value);
        let zero_idx = self.zero_idx();
        self.create_add_gate(&AddTriple {
            a: a_idx,
            b: zero_idx,
            c: result_idx,
            a_scaling: Fr::one(),
            b_scaling: Fr::zero(),
            c_scaling: Fr::one(),
            const_scaling: -Fr::one(),
        });
        if self.composer_base().is_bool(a_idx) {
            self.composer_base_mut().mark_bool(result_idx);
        }
        result_idx
    }

    /// `a * b` for booleans `a` and `b`.
    fn logical_and(&mut self, a_idx: u32, b_idx: u32) -> u32 {
        let value = self.get_variable(a_idx) * self.get_variable(b_idx);
        let result_idx = self.add_variable(value);
        self.create_mul_gate(&MulTriple {
            a: a_idx,
            b: b_idx,
            c: result_idx,
            mul_scaling: Fr::one(),
            c_scaling: -Fr::one(),
            const_scaling: Fr::zero(),
        });
        let base = self.composer_base();
        if base.is_bool(a_idx) && base.is_bool(b_idx) {
            self.composer_base_mut().mark_bool(result_idx);
        }
        result_idx
    }

    /// Like [`ComposerBase::check_circuit`], but says why the circuit is not satisfied.
    fn check_circuit_result(&mut self) -> Result<(), CircuitError> {
        if let Some(err) = self.err() {
            return Err(CircuitError(err.to_string()));
        }
        let table = self.finalize_circuit();
        match table.find_failing_gate() {
            Some(gate) => Err(CircuitError(format!("gate {gate} is not satisfied"))),
            None => Ok(()),
        }
    }

    /// Whether the witness satisfies every gate and no named constraint failed.
    /// Finalizes the circuit.
    fn check_circuit(&mut self) -> bool {
        self.check_circuit_result().is_ok()
    }

    /// Preprocess the circuit into selector and permutation polynomials. Cached.
    fn compute_proving_key(&mut self) -> Result<Arc<ProvingKey>> {
        if let Some(key) = &self.composer_base().circuit_proving_key {
            return Ok(key.clone());
        }
        let table = self.finalize_circuit();
        info!(
            "computing proving key: {} gates, {} public inputs",
            table.num_gates(),
            table.num_public_inputs()
        );
        let key = Arc::new(ProvingKey::from_circuit(
            &table,
            self.composer_base().crs_factory.as_ref(),
        )?);
        self.composer_base_mut().circuit_proving_key = Some(key.clone());
        Ok(key)
    }

    /// Commit to the proving key's polynomials. Cached.
    fn compute_verification_key(&mut self) -> Result<Arc<VerificationKey>> {
        if let Some(key) = &self.composer_base().circuit_verification_key {
            return Ok(key.clone());
        }
        let proving_key = self.compute_proving_key()?;
        let verifier_crs = self.composer_base().crs_factory.get_verifier_crs()?;
        let key = Arc::new(VerificationKey::from_proving_key(
            &proving_key,
            verifier_crs.as_ref(),
        )?);
        self.composer_base_mut().circuit_verification_key = Some(key.clone());
        Ok(key)
    }

    /// Wire values over the proving key's domain.
    fn compute_witness(&mut self) -> Result<Witness> {
        let key = self.compute_proving_key()?;
        let table = self.finalize_circuit();
        Ok(Witness::from_circuit(&table, key.circuit_size))
    }

    /// A prover for the current witness.
    fn create_prover(&mut self) -> Result<Prover<Self::Settings>> {
        let key = self.compute_proving_key()?;
        let witness = self.compute_witness()?;
        Prover::new(key, witness)
    }

    /// A verifier for this circuit.
    fn create_verifier(&mut self) -> Result<Verifier<Self::Settings>> {
        let key = self.compute_verification_key()?;
        Ok(Verifier::new(key))
    }
}
