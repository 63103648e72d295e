/// State and gate constructors shared by every composer.
pub mod composer_base;
/// Standard selectors plus next-row output and boolean selectors.
pub mod extended_composer;
pub(crate) mod gate_merging;
/// Width-3 composer with the standard selectors.
pub mod standard_composer;
