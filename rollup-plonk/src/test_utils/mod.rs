//! Shared fixtures for unit tests, integration tests and benches.

use std::sync::Arc;

use ark_bn254::Fr;
use ark_std::UniformRand;
use once_cell::sync::Lazy;
use rand::{rngs::StdRng, SeedableRng};

use crate::srs::reference_string::{
    mem_reference_string::MemReferenceStringFactory, ReferenceStringFactory,
};

/// Points in the shared test setup; enough for circuits of up to 4096 rows.
pub const TEST_CRS_SIZE: usize = 4097;

static TEST_CRS: Lazy<Arc<MemReferenceStringFactory>> = Lazy::new(|| {
    let mut rng = seeded_rng(0x5eed);
    Arc::new(MemReferenceStringFactory::from_secret(
        Fr::rand(&mut rng),
        TEST_CRS_SIZE,
    ))
});

/// An in-memory setup built once per process from a fixed secret.
pub fn test_crs_factory() -> Arc<dyn ReferenceStringFactory> {
    TEST_CRS.clone()
}

/// Points in the large test setup; enough for circuits of up to 2^15 rows.
pub const LARGE_TEST_CRS_SIZE: usize = (1 << 15) + 1;

/// Secret of the large test setup. Commitments over it, and so verification key hashes,
/// are reproducible anywhere.
pub const LARGE_TEST_CRS_SECRET: u64 = 0x5eed;

static LARGE_TEST_CRS: Lazy<Arc<MemReferenceStringFactory>> = Lazy::new(|| {
    Arc::new(MemReferenceStringFactory::from_secret(
        Fr::from(LARGE_TEST_CRS_SECRET),
        LARGE_TEST_CRS_SIZE,
    ))
});

/// The large in-memory setup, for full-size gadget circuits.
pub fn large_test_crs_factory() -> Arc<dyn ReferenceStringFactory> {
    LARGE_TEST_CRS.clone()
}

/// Deterministic rng, so failures reproduce.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// `count` random field elements.
pub fn random_elements(rng: &mut StdRng, count: usize) -> Vec<Fr> {
    (0..count).map(|_| Fr::rand(rng)).collect()
}

/// proptest strategies
pub mod strategies {
    use ark_bn254::Fr;
    use proptest::prelude::*;

    /// Any field element, drawn from a u64 seed so shrinking stays meaningful.
    pub fn field_element() -> impl Strategy<Value = Fr> {
        any::<u64>().prop_map(Fr::from)
    }

    /// An integer of at most `bits` bits, `bits <= 64`.
    pub fn bounded_u64(bits: u32) -> impl Strategy<Value = u64> {
        let max = if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 };
        0..=max
    }
}
