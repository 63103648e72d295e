use ark_bn254::Fr;
use ark_ff::{Field, One, PrimeField, Zero};
use primitive_types::U256;
use proptest::prelude::*;

use super::{
    check_claim_ratios, compute_ratio_output,
    ratio_check::{constrain_limbs, NUM_LIMBS},
    ratio_check, ClaimRatioValues, RatioCheckInput,
};
use crate::{
    numeric::uint256::{split_into_limbs, u256_to_fr},
    plonk::composer::{
        composer_base::ComposerBase, extended_composer::ExtendedComposer,
        standard_composer::StandardComposer,
    },
    rollup::constants::{circuit_vk_hash, NOTE_VALUE_BIT_LENGTH, NUM_LIMB_BITS},
    test_utils::{large_test_crs_factory, strategies::bounded_u64, test_crs_factory},
};

fn new_composer() -> StandardComposer {
    StandardComposer::new(test_crs_factory())
}

fn u256(value: u64) -> U256 {
    U256::from(value)
}

/// Result of a bare ratio check over field values.
fn run_ratio_check<C: ComposerBase>(composer: &mut C, values: [Fr; 4]) -> Fr {
    let [a1, a2, b1, b2] = values.map(|value| composer.add_variable(value));
    let result = ratio_check(composer, &RatioCheckInput { a1, a2, b1, b2 });
    composer.get_variable(result)
}

/// Build the claim circuit over `values`, prove it and verify the proof.
fn prove_claim<C: ComposerBase>(
    mut composer: C,
    values: &ClaimRatioValues,
) -> anyhow::Result<bool> {
    let input = values.allocate(&mut composer);
    check_claim_ratios(&mut composer, &input);
    let proof = composer.create_prover()?.construct_proof()?;
    composer.create_verifier()?.verify_proof(&proof)
}

fn claim_error(values: &ClaimRatioValues) -> Option<String> {
    let mut composer = new_composer();
    let input = values.allocate(&mut composer);
    check_claim_ratios(&mut composer, &input);
    composer.check_circuit_result().err().map(|e| e.tag().to_string())
}

#[test]
fn exact_share_passes() {
    let values = ClaimRatioValues::new(u256(10), u256(100), u256(200), u256(0));
    assert_eq!(values.output_value_a, u256(20));
    assert_eq!(values.output_value_b, U256::zero());
    assert_eq!(claim_error(&values), None);

    let mut composer = new_composer();
    let result = run_ratio_check(
        &mut composer,
        [10u64, 100, 20, 200].map(Fr::from),
    );
    assert_eq!(result, Fr::one());
    assert!(composer.check_circuit());
}

#[test]
fn share_is_rounded_down() {
    assert_eq!(compute_ratio_output(u256(3), u256(9), u256(10)), u256(3));
    let honest = ClaimRatioValues::new(u256(3), u256(9), u256(10), u256(7));
    assert_eq!(claim_error(&honest), None);

    for wrong in [0u64, 2, 4] {
        let values = ClaimRatioValues {
            output_value_a: u256(wrong),
            ..honest
        };
        assert_eq!(
            claim_error(&values).as_deref(),
            Some("ratio check 1 failed"),
            "output {wrong}"
        );
    }
    let values = ClaimRatioValues {
        output_value_b: honest.output_value_b + U256::one(),
        ..honest
    };
    assert_eq!(claim_error(&values).as_deref(), Some("ratio check 2 failed"));
}

#[test]
fn wrong_share_is_false_but_satisfiable() {
    let mut composer = new_composer();
    let result = run_ratio_check(&mut composer, [3u64, 9, 4, 10].map(Fr::from));
    assert_eq!(result, Fr::zero());
    assert!(composer.check_circuit());
}

#[test]
fn field_fraction_is_out_of_range() {
    // 3 * 10 / 9 in the field satisfies the ratio mod p, but is no integer share
    let spoofed = Fr::from(3u64) * Fr::from(9u64).inverse().unwrap() * Fr::from(10u64);
    assert_eq!(spoofed * Fr::from(9u64), Fr::from(30u64));

    let mut composer = new_composer();
    run_ratio_check(
        &mut composer,
        [Fr::from(3u64), Fr::from(9u64), spoofed, Fr::from(10u64)],
    );
    assert_eq!(
        composer.err(),
        Some("ratio_check range constraint failure: b1")
    );

    let mut composer = new_composer();
    let honest = ClaimRatioValues::new(u256(3), u256(9), u256(10), u256(0));
    let mut input = honest.allocate(&mut composer);
    input.output_value_a = composer.add_variable(spoofed);
    check_claim_ratios(&mut composer, &input);
    assert_eq!(
        composer.err(),
        Some("safe_uint_t range constraint failure: output_value_a")
    );
}

#[test]
fn zero_deposit_is_rejected() {
    let values = ClaimRatioValues::new(U256::zero(), u256(100), u256(200), u256(50));
    assert_eq!(
        claim_error(&values).as_deref(),
        Some("Not supported: zero deposit")
    );
}

#[test]
fn output_above_a_zero_total_is_rejected() {
    let values = ClaimRatioValues {
        output_value_a: u256(5),
        ..ClaimRatioValues::new(u256(10), u256(100), U256::zero(), u256(30))
    };
    assert_eq!(
        claim_error(&values).as_deref(),
        Some("output_value_a > total_output_value_a")
    );
}

#[test]
fn zero_denominators_are_false() {
    let mut composer = new_composer();
    assert_eq!(
        run_ratio_check(&mut composer, [10u64, 0, 0, 200].map(Fr::from)),
        Fr::zero()
    );
    assert!(composer.check_circuit());

    let mut composer = new_composer();
    assert_eq!(
        run_ratio_check(&mut composer, [10u64, 100, 0, 0].map(Fr::from)),
        Fr::zero()
    );
    assert!(composer.check_circuit());
}

#[test]
fn limbs_shifted_by_the_modulus_are_rejected() {
    let value = U256::from_dec_str("123456789012345678901234567890").unwrap();
    let modulus = U256(Fr::MODULUS.0);
    let forged = split_into_limbs(value + modulus, NUM_LIMB_BITS, NUM_LIMBS);
    let honest = split_into_limbs(value, NUM_LIMB_BITS, NUM_LIMBS);
    assert_ne!(forged, honest);

    // the forged limbs still recompose to the value in the field
    let recomposed: Fr = forged
        .iter()
        .enumerate()
        .map(|(i, limb)| u256_to_fr(*limb) * u256_to_fr(U256::one() << (i * NUM_LIMB_BITS)))
        .sum();
    assert_eq!(recomposed, u256_to_fr(value));

    let mut composer = new_composer();
    let variable = composer.add_variable(u256_to_fr(value));
    constrain_limbs(
        &mut composer,
        variable,
        std::array::from_fn(|i| u256_to_fr(honest[i])),
        NOTE_VALUE_BIT_LENGTH,
        "honest",
    );
    assert!(composer.check_circuit());

    let mut composer = new_composer();
    let variable = composer.add_variable(u256_to_fr(value));
    constrain_limbs(
        &mut composer,
        variable,
        std::array::from_fn(|i| u256_to_fr(forged[i])),
        NOTE_VALUE_BIT_LENGTH,
        "forged",
    );
    assert_eq!(
        composer.err(),
        Some("ratio_check range constraint failure: forged limb")
    );
}

#[test]
fn widest_values_pass() {
    let max_note = (U256::one() << NOTE_VALUE_BIT_LENGTH) - U256::one();
    let deposit = (U256::one() << 241) + u256(12345);
    let values = ClaimRatioValues::new(deposit, max_note, max_note, max_note - u256(1));
    assert_eq!(values.output_value_a, deposit);
    assert_eq!(claim_error(&values), None);
}

#[test]
fn merged_composer_agrees() {
    let mut composer = ExtendedComposer::new(test_crs_factory());
    let result = run_ratio_check(&mut composer, [3u64, 9, 3, 10].map(Fr::from));
    assert_eq!(result, Fr::one());
    assert!(composer.check_circuit());
}

#[test]
fn claim_circuit_matches_pinned_vk_hash() {
    let mut composer = StandardComposer::new(large_test_crs_factory());
    let values = ClaimRatioValues::new(u256(10), u256(100), u256(200), u256(50));
    let input = values.allocate(&mut composer);
    check_claim_ratios(&mut composer, &input);
    assert!(composer.check_circuit());
    assert_eq!(composer.get_num_gates(), 21837);

    let key = composer.compute_verification_key().unwrap();
    assert_eq!(key.circuit_size, 1 << 15);
    assert_eq!(hex::encode(key.sha256_hash()), circuit_vk_hash::CLAIM_RATIOS);
}

#[test]
#[ignore = "proves a full claim circuit"]
fn claim_proof_verifies_on_the_standard_composer() {
    let values = ClaimRatioValues::new(u256(3), u256(9), u256(10), u256(7));
    let composer = StandardComposer::new(large_test_crs_factory());
    assert!(prove_claim(composer, &values).unwrap());
}

#[test]
#[ignore = "proves a full claim circuit"]
fn claim_proof_verifies_on_the_merged_composer() {
    let values = ClaimRatioValues::new(u256(3), u256(9), u256(10), u256(7));
    let composer = ExtendedComposer::new(large_test_crs_factory());
    assert!(prove_claim(composer, &values).unwrap());
}

#[test]
#[ignore = "proves a full claim circuit"]
fn wrong_share_cannot_be_proven() {
    let values = ClaimRatioValues {
        output_value_a: u256(4),
        ..ClaimRatioValues::new(u256(3), u256(9), u256(10), u256(7))
    };
    let composer = StandardComposer::new(large_test_crs_factory());
    assert!(prove_claim(composer, &values).is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(6))]

    #[test]
    fn honest_shares_pass(
        deposit in 1..=u64::MAX,
        extra in bounded_u64(63),
        total_output in bounded_u64(64),
    ) {
        let total_input = U256::from(deposit) + U256::from(extra);
        let output = compute_ratio_output(U256::from(deposit), total_input, U256::from(total_output));
        let mut composer = new_composer();
        let result = run_ratio_check(
            &mut composer,
            [
                Fr::from(deposit),
                u256_to_fr(total_input),
                u256_to_fr(output),
                Fr::from(total_output),
            ],
        );
        prop_assert_eq!(result, if total_output == 0 { Fr::zero() } else { Fr::one() });
        prop_assert!(composer.check_circuit());
    }
}
