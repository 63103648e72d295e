pub(crate) mod permutation;
