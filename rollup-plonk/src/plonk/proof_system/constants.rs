/// Pieces the quotient polynomial is split into before committing.
pub(crate) const NUM_QUOTIENT_PARTS: usize = 3;

/// Ratio of the quotient evaluation domain to the circuit domain.
pub(crate) const LARGE_DOMAIN_FACTOR: usize = 4;
