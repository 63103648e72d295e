use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ecc::serialization::bytes_hex;

/// A PLONK proof: the prover's transcript elements, concatenated in manifest order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// exported transcript
    #[serde(with = "bytes_hex")]
    pub proof_data: Vec<u8>,
}

impl From<Vec<u8>> for Proof {
    fn from(proof_data: Vec<u8>) -> Self {
        Self { proof_data }
    }
}

impl fmt::Display for Proof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for byte in self.proof_data.iter() {
            write!(f, " {byte:02x}")?;
        }
        write!(f, " ]")
    }
}
