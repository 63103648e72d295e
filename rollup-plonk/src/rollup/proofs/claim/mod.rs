//! Pieces of the claim circuit: checking that the outputs of a defi interaction were shared
//! out in proportion to each user's deposit.

mod claim_ratio;
mod ratio_check;

pub use claim_ratio::{check_claim_ratios, compute_ratio_output, ClaimRatioInput, ClaimRatioValues};
pub use ratio_check::{ratio_check, RatioCheckInput};

#[cfg(test)]
mod test;
