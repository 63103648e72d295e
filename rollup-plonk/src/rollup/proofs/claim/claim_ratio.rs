use ark_bn254::Fr;
use ark_ff::{One, Zero};
use primitive_types::{U256, U512};
use tracing::debug;

use super::ratio_check::{ratio_check, RatioCheckInput};
use crate::{
    numeric::uint256::{u256_to_fr, u512_low},
    plonk::composer::composer_base::ComposerBase,
    rollup::{
        constants::{DEFI_DEPOSIT_VALUE_BIT_LENGTH, NOTE_VALUE_BIT_LENGTH},
        proofs::arithmetic::subtract,
    },
};

/// Share of `total_output` owed for `deposit` out of `total_input`, rounded down. Zero when
/// nothing was deposited in total.
pub fn compute_ratio_output(deposit: U256, total_input: U256, total_output: U256) -> U256 {
    if total_input.is_zero() {
        return U256::zero();
    }
    u512_low(deposit.full_mul(total_output) / U512::from(total_input))
}

/// Variables the claim circuit checks the output ratios over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimRatioInput {
    /// this claim's deposit into the interaction
    pub deposit_value: u32,
    /// sum of all deposits into the interaction
    pub total_input_value: u32,
    /// first output asset owed to this claim
    pub output_value_a: u32,
    /// second output asset owed to this claim
    pub output_value_b: u32,
    /// first output asset returned by the interaction
    pub total_output_value_a: u32,
    /// second output asset returned by the interaction
    pub total_output_value_b: u32,
}

/// Witness values for a [`ClaimRatioInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClaimRatioValues {
    /// see [`ClaimRatioInput::deposit_value`]
    pub deposit_value: U256,
    /// see [`ClaimRatioInput::total_input_value`]
    pub total_input_value: U256,
    /// see [`ClaimRatioInput::output_value_a`]
    pub output_value_a: U256,
    /// see [`ClaimRatioInput::output_value_b`]
    pub output_value_b: U256,
    /// see [`ClaimRatioInput::total_output_value_a`]
    pub total_output_value_a: U256,
    /// see [`ClaimRatioInput::total_output_value_b`]
    pub total_output_value_b: U256,
}

impl ClaimRatioValues {
    /// An honest claim: both outputs are the exact share of the deposit.
    pub fn new(
        deposit_value: U256,
        total_input_value: U256,
        total_output_value_a: U256,
        total_output_value_b: U256,
    ) -> Self {
        Self {
            deposit_value,
            total_input_value,
            output_value_a: compute_ratio_output(
                deposit_value,
                total_input_value,
                total_output_value_a,
            ),
            output_value_b: compute_ratio_output(
                deposit_value,
                total_input_value,
                total_output_value_b,
            ),
            total_output_value_a,
            total_output_value_b,
        }
    }

    /// Add the values to `composer` as witnesses.
    pub fn allocate<C: ComposerBase>(&self, composer: &mut C) -> ClaimRatioInput {
        let mut witness = |value: U256| composer.add_variable(u256_to_fr(value));
        ClaimRatioInput {
            deposit_value: witness(self.deposit_value),
            total_input_value: witness(self.total_input_value),
            output_value_a: witness(self.output_value_a),
            output_value_b: witness(self.output_value_b),
            total_output_value_a: witness(self.total_output_value_a),
            total_output_value_b: witness(self.total_output_value_b),
        }
    }
}

/// Constrain the outputs of a claim to be its share of the interaction's outputs.
///
/// In order, the first failure wins:
/// - a zero deposit fails with `Not supported: zero deposit`;
/// - values wider than their bit lengths fail with `safe_uint_t range constraint failure: <name>`;
/// - an output above its total fails with `output_value_a > total_output_value_a` (or `_b`);
/// - a wrong share fails with `ratio check 1 failed` (or `2`), unless that total is zero.
pub fn check_claim_ratios<C: ComposerBase>(composer: &mut C, input: &ClaimRatioInput) {
    let deposit_is_zero = composer.is_zero(input.deposit_value);
    composer.assert_equal_constant(deposit_is_zero, Fr::zero(), "Not supported: zero deposit");

    for (variable, num_bits, name) in [
        (input.deposit_value, DEFI_DEPOSIT_VALUE_BIT_LENGTH, "deposit_value"),
        (input.total_input_value, NOTE_VALUE_BIT_LENGTH, "total_input_value"),
        (input.output_value_a, NOTE_VALUE_BIT_LENGTH, "output_value_a"),
        (input.output_value_b, NOTE_VALUE_BIT_LENGTH, "output_value_b"),
        (input.total_output_value_a, NOTE_VALUE_BIT_LENGTH, "total_output_value_a"),
        (input.total_output_value_b, NOTE_VALUE_BIT_LENGTH, "total_output_value_b"),
    ] {
        composer.create_range_constraint(
            variable,
            num_bits,
            &format!("safe_uint_t range constraint failure: {name}"),
        );
    }

    for (output, total, msg) in [
        (
            input.output_value_a,
            input.total_output_value_a,
            "output_value_a > total_output_value_a",
        ),
        (
            input.output_value_b,
            input.total_output_value_b,
            "output_value_b > total_output_value_b",
        ),
    ] {
        let remaining = subtract(composer, total, output);
        composer.create_range_constraint(remaining, NOTE_VALUE_BIT_LENGTH, msg);
    }

    for (output, total, msg) in [
        (input.output_value_a, input.total_output_value_a, "ratio check 1 failed"),
        (input.output_value_b, input.total_output_value_b, "ratio check 2 failed"),
    ] {
        let valid = ratio_check(
            composer,
            &RatioCheckInput {
                a1: input.deposit_value,
                a2: input.total_input_value,
                b1: output,
                b2: total,
            },
        );
        // a zero total owes nothing, and the range check above already pinned the output to zero
        let total_is_zero = composer.is_zero(total);
        let invalid = composer.logical_not(valid);
        let total_nonzero = composer.logical_not(total_is_zero);
        let rejected = composer.logical_and(invalid, total_nonzero);
        if composer.get_variable(rejected) == Fr::one() {
            debug!("{}", msg);
        }
        composer.assert_equal_constant(rejected, Fr::zero(), msg);
    }
}
