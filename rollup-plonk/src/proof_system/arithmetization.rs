use typenum::{Unsigned, U3, U5, U9};

/// Shape of a circuit constructor: how many wire columns and selector columns each gate row has.
///
/// Only circuit-constructor data belongs here, nothing particular to a proving system.
pub trait Arithmetization {
    /// wire columns per row
    type NumWires: Unsigned;
    /// selector columns per row
    type NumSelectors: Unsigned;

    /// `NumWires` as a runtime value.
    fn num_wires() -> usize {
        Self::NumWires::to_usize()
    }

    /// `NumSelectors` as a runtime value.
    fn num_selectors() -> usize {
        Self::NumSelectors::to_usize()
    }
}

/// Width-3 rows with `q_m, q_c, q_1, q_2, q_3`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Standard;

impl Arithmetization for Standard {
    type NumWires = U3;
    type NumSelectors = U5;
}

/// Width-3 rows with the standard selectors plus `q_oo` and the three boolean selectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct Extended;

impl Arithmetization for Extended {
    type NumWires = U3;
    type NumSelectors = U9;
}

/// Gate operands as handed to the composers' gate constructors.
pub mod gate_data {
    use ark_bn254::Fr;
    use serde::{Deserialize, Serialize};

    use crate::ecc::serialization::fr_hex;

    /// `a_scaling * a + b_scaling * b + c_scaling * c + const_scaling == 0`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AddTriple {
        /// left variable
        pub a: u32,
        /// right variable
        pub b: u32,
        /// output variable
        pub c: u32,
        /// left coefficient
        pub a_scaling: Fr,
        /// right coefficient
        pub b_scaling: Fr,
        /// output coefficient
        pub c_scaling: Fr,
        /// constant term
        pub const_scaling: Fr,
    }

    /// `mul_scaling * a * b + c_scaling * c + const_scaling == 0`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MulTriple {
        /// left variable
        pub a: u32,
        /// right variable
        pub b: u32,
        /// output variable
        pub c: u32,
        /// product coefficient
        pub mul_scaling: Fr,
        /// output coefficient
        pub c_scaling: Fr,
        /// constant term
        pub const_scaling: Fr,
    }

    /// A fully generic row: `q_m * a * b + q_l * a + q_r * b + q_o * c + q_c == 0`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct PolyTriple {
        /// left variable
        pub a: u32,
        /// right variable
        pub b: u32,
        /// output variable
        pub c: u32,
        /// product selector
        #[serde(with = "fr_hex")]
        pub q_m: Fr,
        /// left selector
        #[serde(with = "fr_hex")]
        pub q_l: Fr,
        /// right selector
        #[serde(with = "fr_hex")]
        pub q_r: Fr,
        /// output selector
        #[serde(with = "fr_hex")]
        pub q_o: Fr,
        /// constant selector
        #[serde(with = "fr_hex")]
        pub q_c: Fr,
    }

    /// Variables produced by a base-4 decomposition, most significant quad first.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct AccumulatorTriple {
        /// left operand accumulators
        pub left: Vec<u32>,
        /// right operand accumulators
        pub right: Vec<u32>,
        /// output accumulators
        pub out: Vec<u32>,
    }
}

#[cfg(test)]
mod tests {
    use super::gate_data::PolyTriple;
    use super::*;
    use ark_bn254::Fr;

    #[test]
    fn widths() {
        assert_eq!(Standard::num_wires(), 3);
        assert_eq!(Standard::num_selectors(), 5);
        assert_eq!(Extended::num_selectors(), 9);
    }

    #[test]
    fn poly_triple_json() {
        let gate = PolyTriple {
            a: 1,
            b: 2,
            c: 3,
            q_m: Fr::from(4u64),
            q_l: Fr::from(5u64),
            q_r: -Fr::from(6u64),
            q_o: Fr::from(0u64),
            q_c: Fr::from(7u64),
        };
        let json = serde_json::to_string(&gate).unwrap();
        let back: PolyTriple = serde_json::from_str(&json).unwrap();
        assert_eq!(back, gate);
    }
}
