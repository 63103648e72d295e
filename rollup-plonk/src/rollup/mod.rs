/// bit lengths shared by the rollup circuits
pub mod constants;
/// circuits and the gadgets they are built from
pub mod proofs;
