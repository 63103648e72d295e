use ark_bn254::Fr;
use ark_ff::{BigInt, PrimeField};
use primitive_types::{U256, U512};

/// Canonical integer value of a field element.
pub fn fr_to_u256(value: &Fr) -> U256 {
    U256(value.into_bigint().0)
}

/// Reduce an integer into the field. Values `>= p` wrap around.
pub fn u256_to_fr(value: U256) -> Fr {
    match Fr::from_bigint(BigInt::new(value.0)) {
        Some(f) => f,
        None => {
            let mut bytes = [0u8; 32];
            value.to_little_endian(&mut bytes);
            Fr::from_le_bytes_mod_order(&bytes)
        }
    }
}

/// Low 256 bits of a 512-bit value.
pub fn u512_low(value: U512) -> U256 {
    let mut bytes = [0u8; 64];
    value.to_little_endian(&mut bytes);
    U256::from_little_endian(&bytes[..32])
}

/// Bits `[lo, hi)` of `value`, shifted down to bit zero.
pub fn slice(value: U256, lo: usize, hi: usize) -> U256 {
    assert!(lo <= hi && hi <= 256);
    if lo == hi {
        return U256::zero();
    }
    let shifted = value >> lo;
    let width = hi - lo;
    if width == 256 {
        shifted
    } else {
        shifted & ((U256::one() << width) - U256::one())
    }
}

/// Split `value` into `num_limbs` limbs of `limb_bits` bits, least significant first.
/// The top limb absorbs whatever is left above `limb_bits * (num_limbs - 1)`.
pub fn split_into_limbs(value: U256, limb_bits: usize, num_limbs: usize) -> Vec<U256> {
    assert!(num_limbs > 0);
    let mut limbs = Vec::with_capacity(num_limbs);
    for i in 0..num_limbs - 1 {
        limbs.push(slice(value, i * limb_bits, (i + 1) * limb_bits));
    }
    let top = (num_limbs - 1) * limb_bits;
    limbs.push(if top >= 256 { U256::zero() } else { value >> top });
    limbs
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::{One, Zero};
    use ark_std::UniformRand;

    #[test]
    fn field_round_trip() {
        let mut rng = ark_std::test_rng();
        for _ in 0..32 {
            let x = Fr::rand(&mut rng);
            assert_eq!(u256_to_fr(fr_to_u256(&x)), x);
        }
        assert_eq!(fr_to_u256(&Fr::zero()), U256::zero());
        assert_eq!(fr_to_u256(&Fr::one()), U256::one());
    }

    #[test]
    fn modulus_wraps_to_zero() {
        let modulus = U256(Fr::MODULUS.0);
        assert_eq!(u256_to_fr(modulus), Fr::zero());
        assert_eq!(u256_to_fr(modulus + U256::from(7u64)), Fr::from(7u64));
    }

    #[test]
    fn low_half_of_a_wide_product() {
        assert_eq!(u512_low(U512::from(42u64) + (U512::one() << 300)), U256::from(42u64));
        let a = U256::one() << 200;
        assert_eq!(u512_low(a.full_mul(U256::from(3u64))), a * U256::from(3u64));
        assert_eq!(u512_low(a.full_mul(a)), U256::zero());
    }

    #[test]
    fn slices_and_limbs() {
        let value = U256::from_dec_str("123456789012345678901234567890123456789").unwrap();
        assert_eq!(slice(value, 0, 8), value & U256::from(0xffu64));
        assert_eq!(slice(value, 3, 3), U256::zero());
        let limbs = split_into_limbs(value, 68, 4);
        let mut recombined = U256::zero();
        for (i, limb) in limbs.iter().enumerate() {
            assert!(limb.bits() <= 68);
            recombined += *limb << (68 * i);
        }
        assert_eq!(recombined, value);
    }

    #[test]
    fn top_limb_keeps_the_excess() {
        let value = U256::MAX;
        let limbs = split_into_limbs(value, 68, 4);
        assert_eq!(limbs[3].bits(), 256 - 204);
    }
}
