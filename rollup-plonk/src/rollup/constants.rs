/// Bits of a note value.
pub const NOTE_VALUE_BIT_LENGTH: usize = 252;

/// Largest integer width whose products stay exact once split into limbs.
pub const MAX_NO_WRAP_INTEGER_BIT_LENGTH: usize = 252;

/// Bits of a transaction count.
pub const MAX_TXS_BIT_LENGTH: usize = 10;

/// A defi deposit leaves room to sum one per transaction without passing
/// [`MAX_NO_WRAP_INTEGER_BIT_LENGTH`].
pub const DEFI_DEPOSIT_VALUE_BIT_LENGTH: usize =
    MAX_NO_WRAP_INTEGER_BIT_LENGTH - MAX_TXS_BIT_LENGTH;

/// Width of one limb in limb-decomposed integer arithmetic.
pub const NUM_LIMB_BITS: usize = 68;

const _: () = assert!(NOTE_VALUE_BIT_LENGTH <= MAX_NO_WRAP_INTEGER_BIT_LENGTH);

/// SHA-256 verification key hashes of the rollup circuits, as returned by
/// [`VerificationKey::sha256_hash`](crate::plonk::proof_system::verification_key::VerificationKey::sha256_hash)
/// over the large test setup (secret `0x5eed`). If one of these changes, the circuit changed.
pub mod circuit_vk_hash {
    /// `check_claim_ratios` on the standard composer, 21837 gates in a circuit of 2^15 rows.
    pub const CLAIM_RATIOS: &str =
        "dfc27b2e91444f4a8f165f9873b0afd576b99b9b0e9ea1c59b4563ed9b806dca";
}
