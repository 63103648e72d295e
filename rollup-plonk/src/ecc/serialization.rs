//! serde adapters that write curve types as hex strings of their fixed-size encodings.

use serde::{de::Error, Deserialize, Deserializer, Serializer};

fn decode_hex<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let s = String::deserialize(deserializer)?;
    hex::decode(s.trim_start_matches("0x")).map_err(D::Error::custom)
}

/// `#[serde(with = "fr_hex")]` for scalar field elements.
pub mod fr_hex {
    use super::*;
    use ark_bn254::Fr;

    /// serialize
    pub fn serialize<S: Serializer>(value: &Fr, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(crate::ecc::fr_to_buffer(value)))
    }

    /// deserialize
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Fr, D::Error> {
        let bytes = decode_hex(deserializer)?;
        crate::ecc::fr_from_buffer(&bytes).map_err(D::Error::custom)
    }
}

/// `#[serde(with = "g1_hex")]` for affine G1 points.
pub mod g1_hex {
    use super::*;
    use ark_bn254::G1Affine;

    /// serialize
    pub fn serialize<S: Serializer>(value: &G1Affine, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(crate::ecc::g1_to_buffer(value)))
    }

    /// deserialize
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<G1Affine, D::Error> {
        let bytes = decode_hex(deserializer)?;
        crate::ecc::g1_from_buffer(&bytes).map_err(D::Error::custom)
    }
}

/// `#[serde(with = "bytes_hex")]` for raw byte strings.
pub mod bytes_hex {
    use super::*;

    /// serialize
    pub fn serialize<S: Serializer>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(value))
    }

    /// deserialize
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        decode_hex(deserializer)
    }
}

/// `#[serde(with = "g2_hex")]` for affine G2 points, uncompressed.
pub mod g2_hex {
    use super::*;
    use ark_bn254::G2Affine;
    use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

    /// serialize
    pub fn serialize<S: Serializer>(value: &G2Affine, serializer: S) -> Result<S::Ok, S::Error> {
        let mut buf = Vec::with_capacity(128);
        value
            .serialize_uncompressed(&mut buf)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex::encode(buf))
    }

    /// deserialize
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<G2Affine, D::Error> {
        let bytes = decode_hex(deserializer)?;
        G2Affine::deserialize_uncompressed(&bytes[..]).map_err(D::Error::custom)
    }
}
