//! Folds pairs of adjacent linear rows that share an intermediate variable into one row.
//!
//! Rows `A: Σ α_i x_i + α_c = 0` and `B: Σ β_i x_i + β_c = 0` sharing a variable `s` that
//! occurs nowhere else are replaced by `β_s A - α_s B`, in which `s` no longer appears.
//! Three remaining variables fit one row. A fourth is read through `q_oo` from the output
//! wire of the row after `B`, which is then locked in place.
//!
//! The pass reads the input table and writes a new one; copy cycles are rebuilt from the
//! new rows.

use std::collections::HashSet;

use ark_bn254::Fr;
use ark_ff::Zero;

use super::composer_base::{CircuitTable, CycleNode, WireType};
use super::extended_composer::{ExtendedSelectors, NUM_EXTENDED_SELECTORS};

type Selectors = [Fr; NUM_EXTENDED_SELECTORS];

const Q_M: usize = ExtendedSelectors::QM as usize;
const Q_C: usize = ExtendedSelectors::QC as usize;
const Q_1: usize = ExtendedSelectors::Q1 as usize;
const Q_3: usize = ExtendedSelectors::Q3 as usize;
const Q_OO: usize = ExtendedSelectors::QOO as usize;
const Q_LEFT_BOOLS: usize = ExtendedSelectors::QLeftBools as usize;
const Q_OUTPUT_BOOLS: usize = ExtendedSelectors::QOutputBools as usize;

/// Variable flags the pass needs, all indexed by real variable.
#[derive(Debug)]
pub(crate) struct MergeContext<'a> {
    pub(crate) zero_idx: u32,
    pub(crate) is_fixed: &'a [bool],
    pub(crate) is_bool: &'a [bool],
    pub(crate) is_public: &'a HashSet<u32>,
    /// rows before this one are never touched
    pub(crate) first_mergeable_row: usize,
}

/// Output of [`combine_gates`].
#[derive(Debug)]
pub(crate) struct GateCombination {
    pub(crate) table: CircuitTable,
    /// new row of every input row
    pub(crate) old_to_new: Vec<u32>,
}

#[derive(Debug, Clone, Copy)]
struct Row {
    wires: [u32; 3],
    selectors: Selectors,
}

impl Row {
    fn is_linear(&self) -> bool {
        self.selectors[Q_M].is_zero()
            && self.selectors[Q_LEFT_BOOLS..=Q_OUTPUT_BOOLS]
                .iter()
                .all(|q| q.is_zero())
    }

    /// `(variable, coefficient)` pairs of a linear row, zero variable and zero
    /// coefficients dropped, repeated variables summed.
    fn linear_terms(&self, zero_idx: u32) -> Vec<(u32, Fr)> {
        let mut terms: Vec<(u32, Fr)> = Vec::with_capacity(3);
        for (k, &variable) in self.wires.iter().enumerate() {
            if variable == zero_idx {
                continue;
            }
            let coefficient = self.selectors[Q_1 + k];
            match terms.iter_mut().find(|(v, _)| *v == variable) {
                Some(term) => term.1 += coefficient,
                None => terms.push((variable, coefficient)),
            }
        }
        terms.retain(|(_, q)| !q.is_zero());
        terms
    }

    fn linear_row(terms: &[(u32, Fr)], constant: Fr, zero_idx: u32) -> Self {
        debug_assert!(terms.len() <= 3);
        let mut row = Row {
            wires: [zero_idx; 3],
            selectors: [Fr::zero(); NUM_EXTENDED_SELECTORS],
        };
        for (k, (variable, coefficient)) in terms.iter().enumerate() {
            row.wires[k] = *variable;
            row.selectors[Q_1 + k] = *coefficient;
        }
        row.selectors[Q_C] = constant;
        row
    }

    /// Swap the cell in column `k` with the output cell, keeping the row's relation.
    fn swap_into_output(&mut self, k: usize) {
        self.wires.swap(k, 2);
        self.selectors.swap(Q_1 + k, Q_3);
    }
}

fn read_rows(table: &CircuitTable) -> Vec<Row> {
    (0..table.num_gates())
        .map(|i| {
            let mut selectors = [Fr::zero(); NUM_EXTENDED_SELECTORS];
            for (s, column) in selectors.iter_mut().zip(table.selectors.iter()) {
                *s = column[i];
            }
            Row {
                wires: [table.wires[0][i], table.wires[1][i], table.wires[2][i]],
                selectors,
            }
        })
        .collect()
}

/// Copy cycles of a set of rows, one list per variable.
pub(crate) fn build_wire_copy_cycles(wires: &[Vec<u32>; 3], num_variables: usize) -> Vec<Vec<CycleNode>> {
    let mut cycles = vec![Vec::new(); num_variables];
    for i in 0..wires[0].len() {
        for wire_type in WireType::ALL {
            let variable = wires[wire_type.column()][i];
            cycles[variable as usize].push(CycleNode::new(i as u32, wire_type));
        }
    }
    cycles
}

struct Merger<'a> {
    context: &'a MergeContext<'a>,
    rows: Vec<Row>,
    occurrences: Vec<u32>,
}

impl<'a> Merger<'a> {
    fn mergeable(&self, i: usize, locked: &[bool]) -> bool {
        let row = &self.rows[i];
        i >= self.context.first_mergeable_row
            && !locked[i]
            && row.is_linear()
            && row.selectors[Q_OO].is_zero()
            && (i == 0 || self.rows[i - 1].selectors[Q_OO].is_zero())
    }

    fn can_eliminate(&self, variable: u32) -> bool {
        let v = variable as usize;
        variable != self.context.zero_idx
            && self.occurrences[v] == 2
            && !self.context.is_fixed[v]
            && !self.context.is_bool[v]
            && !self.context.is_public.contains(&variable)
    }

    /// Fold rows `i` and `i + 1`. Returns the merged row and, when a fourth variable is read
    /// through `q_oo`, the rewired row `i + 2`.
    fn try_merge(&self, i: usize) -> Option<(Row, Option<Row>)> {
        let zero_idx = self.context.zero_idx;
        let a = &self.rows[i];
        let b = &self.rows[i + 1];
        let terms_a = a.linear_terms(zero_idx);
        let terms_b = b.linear_terms(zero_idx);

        let (shared, alpha, beta) = terms_a.iter().find_map(|&(v, alpha)| {
            terms_b
                .iter()
                .find(|(w, _)| *w == v)
                .filter(|_| self.can_eliminate(v))
                .map(|&(_, beta)| (v, alpha, beta))
        })?;

        let mut terms: Vec<(u32, Fr)> = Vec::with_capacity(4);
        let mut accumulate = |variable: u32, coefficient: Fr| {
            if variable == shared {
                return;
            }
            match terms.iter_mut().find(|(v, _)| *v == variable) {
                Some(term) => term.1 += coefficient,
                None => terms.push((variable, coefficient)),
            }
        };
        for &(v, q) in terms_a.iter() {
            accumulate(v, beta * q);
        }
        for &(v, q) in terms_b.iter() {
            accumulate(v, -(alpha * q));
        }
        terms.retain(|(_, q)| !q.is_zero());
        let constant = beta * a.selectors[Q_C] - alpha * b.selectors[Q_C];

        match terms.len() {
            0..=3 => Some((Row::linear_row(&terms, constant, zero_idx), None)),
            4 => {
                let next = *self.rows.get(i + 2)?;
                let (d_position, rewired) = Self::find_output_slot(&terms, next)?;
                let (d, d_coefficient) = terms.remove(d_position);
                debug_assert_eq!(rewired.wires[2], d);
                let mut merged = Row::linear_row(&terms, constant, zero_idx);
                merged.selectors[Q_OO] = d_coefficient;
                Some((merged, Some(rewired)))
            }
            _ => None,
        }
    }

    /// A term whose variable already sits in the output of `next`, or can be moved there
    /// because `next` is linear. Returns the term's position and the rewired `next`.
    fn find_output_slot(terms: &[(u32, Fr)], next: Row) -> Option<(usize, Row)> {
        if let Some(position) = terms.iter().position(|(v, _)| *v == next.wires[2]) {
            return Some((position, next));
        }
        if !next.is_linear() {
            return None;
        }
        terms.iter().enumerate().find_map(|(position, (v, _))| {
            next.wires[..2].iter().position(|w| w == v).map(|k| {
                let mut rewired = next;
                rewired.swap_into_output(k);
                (position, rewired)
            })
        })
    }
}

/// Run the merging pass over a finalized extended-composer table.
pub(crate) fn combine_gates(context: &MergeContext<'_>, table: &CircuitTable) -> GateCombination {
    let rows = read_rows(table);
    let num_rows = rows.len();
    let mut occurrences = vec![0u32; table.variables.len()];
    for row in rows.iter() {
        for &v in row.wires.iter() {
            occurrences[v as usize] += 1;
        }
    }
    let merger = Merger {
        context,
        rows,
        occurrences,
    };

    let mut output: Vec<Row> = Vec::with_capacity(num_rows);
    let mut old_to_new = vec![0u32; num_rows];
    let mut locked = vec![false; num_rows];
    let mut rewired: Option<(usize, Row)> = None;

    let mut i = 0;
    while i < num_rows {
        let current = match rewired {
            Some((index, row)) if index == i => row,
            _ => merger.rows[i],
        };
        if i + 1 < num_rows && merger.mergeable(i, &locked) && merger.mergeable(i + 1, &locked) {
            if let Some((merged, next)) = merger.try_merge(i) {
                output.push(merged);
                old_to_new[i] = (output.len() - 1) as u32;
                old_to_new[i + 1] = (output.len() - 1) as u32;
                if let Some(next) = next {
                    locked[i + 2] = true;
                    rewired = Some((i + 2, next));
                }
                i += 2;
                continue;
            }
        }
        output.push(current);
        old_to_new[i] = (output.len() - 1) as u32;
        i += 1;
    }

    let mut wires: [Vec<u32>; 3] = [
        Vec::with_capacity(output.len()),
        Vec::with_capacity(output.len()),
        Vec::with_capacity(output.len()),
    ];
    let mut selectors = vec![Vec::with_capacity(output.len()); NUM_EXTENDED_SELECTORS];
    for row in output.iter() {
        for (column, &w) in wires.iter_mut().zip(row.wires.iter()) {
            column.push(w);
        }
        for (column, &q) in selectors.iter_mut().zip(row.selectors.iter()) {
            column.push(q);
        }
    }
    let wire_copy_cycles = build_wire_copy_cycles(&wires, table.variables.len());

    GateCombination {
        table: CircuitTable {
            composer_type: table.composer_type,
            selector_properties: table.selector_properties.clone(),
            selectors,
            public_input_selectors: table.public_input_selectors.clone(),
            wires,
            wire_copy_cycles,
            public_inputs: table.public_inputs.clone(),
            variables: table.variables.clone(),
        },
        old_to_new,
    }
}
