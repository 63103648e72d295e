use ark_bn254::Fr;

use crate::{
    ecc::coset_generator,
    plonk::composer::composer_base::{CycleNode, WireType},
    polynomials::{EvaluationDomain, Polynomial},
};

/// Row bits of a packed sigma value; the two bits above hold the column.
pub(crate) const PERMUTATION_INDEX_MASK: u32 = (1 << 30) - 1;

#[inline]
fn pack(node: CycleNode) -> u32 {
    node.gate_index + node.wire_type.tag()
}

/// Build `sigma_1, sigma_2, sigma_3` over `new_n` rows.
///
/// Public input `i` occupies the three cells of row `i`; those cells lead the cycle of the
/// public variable. Gate row `g` of the copy cycles lands on row `adjusted_index[g]`. Every
/// cell of a variable points to the next cell of its cycle, the last back to the first. Cells
/// that hold no variable point to themselves.
pub(crate) fn compute_sigma_permutations(
    wire_copy_cycles: &[Vec<CycleNode>],
    adjusted_index: &[u32],
    public_inputs: &[u32],
    new_n: usize,
) -> [Vec<u32>; 3] {
    assert!(
        new_n as u32 <= PERMUTATION_INDEX_MASK,
        "circuit too large for the sigma encoding"
    );
    let identity = |wire_type: WireType| -> Vec<u32> {
        (0..new_n as u32).map(|i| i + wire_type.tag()).collect()
    };
    let mut sigma = WireType::ALL.map(identity);

    let mut public_cells: Vec<Vec<CycleNode>> = vec![Vec::new(); wire_copy_cycles.len()];
    for (row, &variable) in public_inputs.iter().enumerate() {
        for wire_type in WireType::ALL {
            public_cells[variable as usize].push(CycleNode::new(row as u32, wire_type));
        }
    }

    for (cycle, leading) in wire_copy_cycles.iter().zip(public_cells.iter()) {
        let nodes: Vec<CycleNode> = leading
            .iter()
            .copied()
            .chain(
                cycle
                    .iter()
                    .map(|n| CycleNode::new(adjusted_index[n.gate_index as usize], n.wire_type)),
            )
            .collect();
        for (j, node) in nodes.iter().enumerate() {
            assert!(
                (node.gate_index as usize) < new_n,
                "copy cycle leaves the domain"
            );
            let next = nodes[(j + 1) % nodes.len()];
            sigma[node.wire_type.column()][node.gate_index as usize] = pack(next);
        }
    }
    sigma
}

/// Sigma values as field elements: `ω^row * k_column`, so that an identity cell maps to its
/// own position in `k_i H`.
pub(crate) fn compute_permutation_lagrange_base_single(
    permutation: &[u32],
    small_domain: &EvaluationDomain,
) -> Polynomial {
    assert_eq!(
        permutation.len(),
        small_domain.size,
        "permutation does not cover the domain"
    );
    let roots = small_domain.elements();
    let cosets = WireType::ALL.map(|w| coset_generator(w.column()));
    permutation
        .iter()
        .map(|&packed| {
            let row = (packed & PERMUTATION_INDEX_MASK) as usize;
            let column = (packed >> 30) as usize;
            roots[row] * cosets[column]
        })
        .collect::<Vec<Fr>>()
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use WireType::*;

    fn unpack(packed: u32) -> (usize, usize) {
        ((packed >> 30) as usize, (packed & PERMUTATION_INDEX_MASK) as usize)
    }

    /// Number of steps to return to `(column, row)`.
    fn cycle_length(sigma: &[Vec<u32>; 3], column: usize, row: usize) -> usize {
        let mut current = (column, row);
        let mut steps = 0;
        loop {
            current = unpack(sigma[current.0][current.1]);
            steps += 1;
            if current == (column, row) {
                return steps;
            }
            assert!(steps <= 3 * sigma[0].len(), "sigma is not a permutation");
        }
    }

    #[test]
    fn cycles_follow_copy_constraints() {
        // variable 0 on three cells, variable 1 alone, variable 2 public and used once
        let cycles = vec![
            vec![
                CycleNode::new(0, Left),
                CycleNode::new(1, Right),
                CycleNode::new(2, Output),
            ],
            vec![CycleNode::new(0, Right)],
            vec![CycleNode::new(1, Left)],
        ];
        let adjusted: Vec<u32> = (1..=3).collect();
        let sigma = compute_sigma_permutations(&cycles, &adjusted, &[2], 8);

        assert_eq!(sigma[0][1], 2 + Right.tag());
        assert_eq!(sigma[1][2], 3 + Output.tag());
        assert_eq!(sigma[2][3], 1 + Left.tag());
        assert_eq!(cycle_length(&sigma, 0, 1), 3);
        // lone variable points at itself
        assert_eq!(sigma[1][1], 1 + Right.tag());
        // public row cells lead into the gate cell and back
        assert_eq!(sigma[0][0], Right.tag());
        assert_eq!(sigma[1][0], Output.tag());
        assert_eq!(sigma[2][0], 2 + Left.tag());
        assert_eq!(sigma[0][2], 0);
        assert_eq!(cycle_length(&sigma, 0, 0), 4);
        // padding is the identity
        for row in 4..8 {
            for column in 0..3 {
                assert_eq!(cycle_length(&sigma, column, row), 1);
            }
        }
    }

    #[test]
    fn lagrange_base_uses_column_cosets() {
        let domain = EvaluationDomain::new(4).unwrap();
        let permutation = vec![3 + Output.tag(), 1, 2 + Right.tag(), 0];
        let values = compute_permutation_lagrange_base_single(&permutation, &domain);
        assert_eq!(values[0], domain.element(3) * coset_generator(2));
        assert_eq!(values[1], domain.element(1));
        assert_eq!(values[2], domain.element(2) * coset_generator(1));
        assert_eq!(values[3], Fr::from(1u64));
    }
}
