use ark_bn254::Fr;
use ark_ff::{One, Zero};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use primitive_types::U256;
use rollup_plonk::{
    plonk::composer::{
        composer_base::ComposerBase, extended_composer::ExtendedComposer,
        standard_composer::StandardComposer,
    },
    polynomials::evaluation_domain::EvaluationDomain,
    proof_system::arithmetization::gate_data::{AddTriple, MulTriple},
    rollup::proofs::claim::{check_claim_ratios, ClaimRatioValues},
    test_utils::{random_elements, seeded_rng, test_crs_factory},
};

const NUM_GATES: usize = 1000;

/// Alternating additions and squarings, `NUM_GATES` in all.
fn build_circuit<C: ComposerBase>(composer: &mut C) {
    let mut current = composer.add_public_variable(Fr::from(3u64));
    let one = Fr::one();
    for i in 0..NUM_GATES {
        let value = composer.get_variable(current);
        current = if i % 2 == 0 {
            let sum = composer.add_variable(value + value + one);
            composer.create_add_gate(&AddTriple {
                a: current,
                b: current,
                c: sum,
                a_scaling: one,
                b_scaling: one,
                c_scaling: -one,
                const_scaling: one,
            });
            sum
        } else {
            let square = composer.add_variable(value * value);
            composer.create_mul_gate(&MulTriple {
                a: current,
                b: current,
                c: square,
                mul_scaling: one,
                c_scaling: -one,
                const_scaling: Fr::zero(),
            });
            square
        };
    }
}

fn fft(c: &mut Criterion) {
    let mut rng = seeded_rng(1);
    let mut group = c.benchmark_group("fft");
    for log_size in [12usize, 16] {
        let domain = EvaluationDomain::new(1 << log_size).unwrap();
        let coefficients = random_elements(&mut rng, 1 << log_size);
        group.bench_function(format!("fft 2^{log_size}"), |b| {
            b.iter_batched(
                || coefficients.clone(),
                |mut values| domain.fft_inplace(&mut values),
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn preprocess(c: &mut Criterion) {
    let mut group = c.benchmark_group("preprocess");
    group.sample_size(10);
    group.bench_function(format!("standard, {NUM_GATES} gates"), |b| {
        b.iter_batched(
            || {
                let mut composer = StandardComposer::new(test_crs_factory());
                build_circuit(&mut composer);
                composer
            },
            |mut composer| composer.compute_proving_key().unwrap(),
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

fn prove(c: &mut Criterion) {
    let mut group = c.benchmark_group("prover");
    group.sample_size(10);

    let mut standard = StandardComposer::new(test_crs_factory());
    build_circuit(&mut standard);
    group.bench_function(format!("standard, {NUM_GATES} gates"), |b| {
        b.iter(|| standard.create_prover().unwrap().construct_proof().unwrap())
    });

    let mut extended = ExtendedComposer::new(test_crs_factory());
    build_circuit(&mut extended);
    group.bench_function(format!("extended, {NUM_GATES} gates"), |b| {
        b.iter(|| extended.create_prover().unwrap().construct_proof().unwrap())
    });
    group.finish();

    let proof = standard.create_prover().unwrap().construct_proof().unwrap();
    let verifier = standard.create_verifier().unwrap();
    c.bench_function("verify standard", |b| {
        b.iter(|| assert!(verifier.verify_proof(&proof).unwrap()))
    });
}

fn claim_ratios(c: &mut Criterion) {
    let values = ClaimRatioValues::new(
        U256::from(3u64),
        U256::from(9u64),
        U256::from(10u64),
        U256::from(1u64) << 200,
    );
    let mut group = c.benchmark_group("claim");
    group.sample_size(10);
    group.bench_function("check ratios", |b| {
        b.iter(|| {
            let mut composer = StandardComposer::new(test_crs_factory());
            let input = values.allocate(&mut composer);
            check_claim_ratios(&mut composer, &input);
            assert!(composer.check_circuit());
        })
    });
    group.finish();
}

criterion_group!(benches, fft, preprocess, prove, claim_ratios);
criterion_main!(benches);
