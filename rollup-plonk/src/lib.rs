#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms,
    unreachable_pub
)]

//! rollup-plonk
//!
//! A PLONK composer, permutation builder and quotient-polynomial prover over bn254,
//! together with the rollup claim circuit's ratio-check gadget.

/// random utilities
pub(crate) mod common;
/// elliptic curves stuff (a thin wrapper on ark-bn254)
pub mod ecc;
/// typed errors
pub mod errors;
/// bitops and big unsigned integers
pub mod numeric;
/// plonk
pub mod plonk;
/// math with polynomials
pub mod polynomials;
/// proof system
pub mod proof_system;
/// rollup circuits built on the composers
pub mod rollup;
/// SRS utilities.
pub mod srs;
/// Transcript utilities.
pub mod transcript;

/// Test utilities.
#[cfg(any(test, feature = "test_utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test_utils")))]
pub mod test_utils;
