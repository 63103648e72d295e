pub(crate) mod arithmetic;
/// claim circuit logic
pub mod claim;
