/// Ignition transcript files.
pub mod io;
/// Prover and verifier reference strings.
pub mod reference_string;

#[cfg(test)]
mod tests;
