use ark_bn254::Fr;
use ark_ff::{One, Zero};
use primitive_types::{U256, U512};
use tracing::trace;

use crate::{
    numeric::uint256::{fr_to_u256, slice, split_into_limbs, u256_to_fr, u512_low},
    plonk::composer::composer_base::ComposerBase,
    rollup::{
        constants::{
            DEFI_DEPOSIT_VALUE_BIT_LENGTH, MAX_NO_WRAP_INTEGER_BIT_LENGTH, NOTE_VALUE_BIT_LENGTH,
            NUM_LIMB_BITS,
        },
        proofs::arithmetic::{linear_combination, mul},
    },
};

pub(super) const NUM_LIMBS: usize = 4;
/// A product slot covers two limb columns.
const SLOT_LO_BITS: usize = 2 * NUM_LIMB_BITS;
/// Carry out of a slot.
const SLOT_HI_BITS: usize = 72;

/// Variables of the claim `a1 / a2 == b1 / b2`, where `b1` is rounded down:
/// `a1 * b2 == b1 * a2 + residual` over the integers with `0 <= residual < a2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatioCheckInput {
    /// numerator of the left ratio, at most [`DEFI_DEPOSIT_VALUE_BIT_LENGTH`] bits
    pub a1: u32,
    /// denominator of the left ratio
    pub a2: u32,
    /// numerator of the right ratio
    pub b1: u32,
    /// denominator of the right ratio
    pub b2: u32,
}

/// Constrain the ratios of `ratios` and return a boolean variable that is 1 iff
/// `a2 != 0`, `b2 != 0` and `b1 == floor(a1 * b2 / a2)`.
///
/// Every input, the remainder, every limb and every product slot is range-constrained, so the
/// limb arithmetic never wraps around the field. Out-of-range inputs record a
/// `ratio_check range constraint failure: <name>` failure on the composer.
pub fn ratio_check<C: ComposerBase>(composer: &mut C, ratios: &RatioCheckInput) -> u32 {
    let RatioCheckInput { a1, a2, b1, b2 } = *ratios;
    let residual_value = compute_residual(
        fr_to_u256(&composer.get_variable(a1)),
        fr_to_u256(&composer.get_variable(b2)),
        fr_to_u256(&composer.get_variable(a2)),
    );
    let residual = composer.add_variable(u256_to_fr(residual_value));

    for (variable, num_bits, name) in [
        (a1, DEFI_DEPOSIT_VALUE_BIT_LENGTH, "a1"),
        (a2, NOTE_VALUE_BIT_LENGTH, "a2"),
        (b1, NOTE_VALUE_BIT_LENGTH, "b1"),
        (b2, NOTE_VALUE_BIT_LENGTH, "b2"),
        (residual, NOTE_VALUE_BIT_LENGTH, "residual"),
    ] {
        composer.create_range_constraint(
            variable,
            num_bits,
            &format!("ratio_check range constraint failure: {name}"),
        );
    }

    // a2 - residual - 1 >= 0, waived when a2 == 0 (the remainder is then zero)
    let a2_is_zero = composer.is_zero(a2);
    let bound = linear_combination(
        composer,
        &[(a2, Fr::one()), (residual, -Fr::one()), (a2_is_zero, Fr::one())],
        -Fr::one(),
    );
    composer.create_range_constraint(
        bound,
        NOTE_VALUE_BIT_LENGTH,
        "ratio_check range constraint failure: residual >= a2",
    );

    let a1_limbs = decompose_into_limbs(composer, a1, DEFI_DEPOSIT_VALUE_BIT_LENGTH, "a1");
    let b2_limbs = decompose_into_limbs(composer, b2, NOTE_VALUE_BIT_LENGTH, "b2");
    let b1_limbs = decompose_into_limbs(composer, b1, NOTE_VALUE_BIT_LENGTH, "b1");
    let a2_limbs = decompose_into_limbs(composer, a2, NOTE_VALUE_BIT_LENGTH, "a2");
    let residual_limbs =
        decompose_into_limbs(composer, residual, NOTE_VALUE_BIT_LENGTH, "residual");

    let left = multiply_limbs(composer, &a1_limbs, &b2_limbs, None);
    let right = multiply_limbs(composer, &b1_limbs, &a2_limbs, Some(&residual_limbs));

    let b2_is_zero = composer.is_zero(b2);
    let a2_nonzero = composer.logical_not(a2_is_zero);
    let b2_nonzero = composer.logical_not(b2_is_zero);
    let mut result = composer.logical_and(a2_nonzero, b2_nonzero);
    for (&lhs, &rhs) in left.iter().zip(right.iter()) {
        let difference =
            linear_combination(composer, &[(lhs, Fr::one()), (rhs, -Fr::one())], Fr::zero());
        let equal = composer.is_zero(difference);
        result = composer.logical_and(result, equal);
    }
    trace!(
        "ratio check over {} gates, result {}",
        composer.get_num_gates(),
        composer.get_variable(result)
    );
    result
}

/// `(a1 * b2) mod a2`, or zero when `a2` is zero.
pub(super) fn compute_residual(a1: U256, b2: U256, a2: U256) -> U256 {
    if a2.is_zero() {
        return U256::zero();
    }
    u512_low(a1.full_mul(b2) % U512::from(a2))
}

/// Limb widths for a value of `num_bits` bits. The top limb only gets the bits left over, so
/// the limbs can never recompose past the field modulus.
fn limb_widths(num_bits: usize) -> [usize; NUM_LIMBS] {
    assert!(
        num_bits > (NUM_LIMBS - 1) * NUM_LIMB_BITS && num_bits <= MAX_NO_WRAP_INTEGER_BIT_LENGTH,
        "{num_bits} bits cannot be split into {NUM_LIMBS} limbs"
    );
    std::array::from_fn(|i| (num_bits - i * NUM_LIMB_BITS).min(NUM_LIMB_BITS))
}

fn limb_shift(limb: usize) -> Fr {
    u256_to_fr(U256::one() << (limb * NUM_LIMB_BITS))
}

/// Split `value` into limbs, least significant first.
fn decompose_into_limbs<C: ComposerBase>(
    composer: &mut C,
    value: u32,
    num_bits: usize,
    name: &str,
) -> [u32; NUM_LIMBS] {
    let limbs = split_into_limbs(
        fr_to_u256(&composer.get_variable(value)),
        NUM_LIMB_BITS,
        NUM_LIMBS,
    );
    constrain_limbs(
        composer,
        value,
        std::array::from_fn(|i| u256_to_fr(limbs[i])),
        num_bits,
        name,
    )
}

/// Allocate `limb_values` as the limbs of `value`: range-constrain each limb to its width and
/// constrain their weighted sum to `value`.
pub(super) fn constrain_limbs<C: ComposerBase>(
    composer: &mut C,
    value: u32,
    limb_values: [Fr; NUM_LIMBS],
    num_bits: usize,
    name: &str,
) -> [u32; NUM_LIMBS] {
    let widths = limb_widths(num_bits);
    let msg = format!("ratio_check range constraint failure: {name} limb");
    let limbs = limb_values.map(|limb| composer.add_variable(limb));
    for (&limb, width) in limbs.iter().zip(widths) {
        composer.create_range_constraint(limb, width, &msg);
    }

    let terms: Vec<(u32, Fr)> = limbs
        .iter()
        .enumerate()
        .map(|(i, &limb)| (limb, limb_shift(i)))
        .collect();
    let recomposed = linear_combination(composer, &terms, Fr::zero());
    composer.assert_equal(
        recomposed,
        value,
        &format!("ratio_check limb decomposition failure: {name}"),
    );
    limbs
}

/// Schoolbook product of two limb vectors, plus an optional limb-aligned addend, normalized
/// into four 136-bit slots and the final carry.
///
/// Slot `k` gathers the partial products of columns `2k` and `2k + 1` and the carry of slot
/// `k - 1`; it is split into a 136-bit low part and a 72-bit high part that carries into the
/// next slot. All slot sums stay below 2^211, so each field equation is an integer equation.
fn multiply_limbs<C: ComposerBase>(
    composer: &mut C,
    left: &[u32; NUM_LIMBS],
    right: &[u32; NUM_LIMBS],
    addend: Option<&[u32; NUM_LIMBS]>,
) -> [u32; NUM_LIMBS + 1] {
    let column_shift = limb_shift(1);
    let slot_shift = u256_to_fr(U256::one() << SLOT_LO_BITS);

    let mut columns: Vec<Vec<u32>> = vec![Vec::new(); 2 * NUM_LIMBS - 1];
    for (i, &l) in left.iter().enumerate() {
        for (j, &r) in right.iter().enumerate() {
            let product = mul(composer, l, r);
            columns[i + j].push(product);
        }
    }

    let mut slots = [0u32; NUM_LIMBS + 1];
    let mut carry: Option<u32> = None;
    for (slot, output) in slots.iter_mut().take(NUM_LIMBS).enumerate() {
        let mut terms: Vec<(u32, Fr)> = Vec::new();
        for (column, scale) in [(2 * slot, Fr::one()), (2 * slot + 1, column_shift)] {
            if let Some(products) = columns.get(column) {
                terms.extend(products.iter().map(|&product| (product, scale)));
            }
        }
        if let Some(addend) = addend {
            if 2 * slot + 1 < NUM_LIMBS {
                terms.push((addend[2 * slot], Fr::one()));
                terms.push((addend[2 * slot + 1], column_shift));
            }
        }
        if let Some(carry) = carry {
            terms.push((carry, Fr::one()));
        }

        let sum = linear_combination(composer, &terms, Fr::zero());
        let sum_value = fr_to_u256(&composer.get_variable(sum));
        let lo = composer.add_variable(u256_to_fr(slice(sum_value, 0, SLOT_LO_BITS)));
        let hi = composer.add_variable(u256_to_fr(sum_value >> SLOT_LO_BITS));
        composer.create_range_constraint(
            lo,
            SLOT_LO_BITS,
            "ratio_check range constraint failure: product slot",
        );
        composer.create_range_constraint(
            hi,
            SLOT_HI_BITS,
            "ratio_check range constraint failure: product carry",
        );
        let recomposed =
            linear_combination(composer, &[(lo, Fr::one()), (hi, slot_shift)], Fr::zero());
        composer.assert_equal(recomposed, sum, "ratio_check product carry failure");

        *output = lo;
        carry = Some(hi);
    }
    slots[NUM_LIMBS] = carry.unwrap_or_else(|| composer.zero_idx());
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limb_widths_leave_no_room_above_the_value() {
        assert_eq!(limb_widths(252), [68, 68, 68, 48]);
        assert_eq!(limb_widths(242), [68, 68, 68, 38]);
        assert_eq!(limb_widths(NOTE_VALUE_BIT_LENGTH).iter().sum::<usize>(), 252);
    }

    #[test]
    #[should_panic(expected = "cannot be split")]
    fn narrow_values_are_not_split() {
        limb_widths(200);
    }

    #[test]
    fn residual_is_the_remainder() {
        let r = compute_residual(U256::from(3u64), U256::from(10u64), U256::from(9u64));
        assert_eq!(r, U256::from(3u64));
        assert_eq!(
            compute_residual(U256::from(5u64), U256::from(7u64), U256::zero()),
            U256::zero()
        );
        let big = U256::one() << 240;
        assert_eq!(
            compute_residual(big, big, big - U256::one()),
            U256::one()
        );
    }
}
