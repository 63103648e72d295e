/// Circuit builders.
pub mod composer;
/// Keys, prover, verifier and the widgets they share.
pub mod proof_system;
