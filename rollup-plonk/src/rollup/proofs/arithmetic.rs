use ark_bn254::Fr;
use ark_ff::{One, Zero};

use crate::{
    plonk::composer::composer_base::ComposerBase,
    proof_system::arithmetization::gate_data::{AddTriple, MulTriple},
};

/// `a * b` as a new variable.
pub(crate) fn mul<C: ComposerBase>(composer: &mut C, a: u32, b: u32) -> u32 {
    let product = composer.get_variable(a) * composer.get_variable(b);
    let c = composer.add_variable(product);
    composer.create_mul_gate(&MulTriple {
        a,
        b,
        c,
        mul_scaling: Fr::one(),
        c_scaling: -Fr::one(),
        const_scaling: Fr::zero(),
    });
    c
}

/// `constant + sum(scale * variable)` as a new variable. The first two terms share a gate,
/// every further term costs one more.
pub(crate) fn linear_combination<C: ComposerBase>(
    composer: &mut C,
    terms: &[(u32, Fr)],
    constant: Fr,
) -> u32 {
    assert!(!terms.is_empty(), "empty linear combination");
    let zero_idx = composer.zero_idx();
    let (first, first_scale) = terms[0];
    let (second, second_scale) = terms.get(1).copied().unwrap_or((zero_idx, Fr::zero()));

    let mut value = constant
        + first_scale * composer.get_variable(first)
        + second_scale * composer.get_variable(second);
    let mut accumulator = composer.add_variable(value);
    composer.create_add_gate(&AddTriple {
        a: first,
        b: second,
        c: accumulator,
        a_scaling: first_scale,
        b_scaling: second_scale,
        c_scaling: -Fr::one(),
        const_scaling: constant,
    });

    for &(term, scale) in terms.iter().skip(2) {
        value += scale * composer.get_variable(term);
        let next = composer.add_variable(value);
        composer.create_add_gate(&AddTriple {
            a: accumulator,
            b: term,
            c: next,
            a_scaling: Fr::one(),
            b_scaling: scale,
            c_scaling: -Fr::one(),
            const_scaling: Fr::zero(),
        });
        accumulator = next;
    }
    accumulator
}

/// `a - b` as a new variable.
pub(crate) fn subtract<C: ComposerBase>(composer: &mut C, a: u32, b: u32) -> u32 {
    linear_combination(composer, &[(a, Fr::one()), (b, -Fr::one())], Fr::zero())
}
