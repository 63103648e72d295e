/// grand product argument over the sigma permutations
pub mod permutation_widget;

pub use permutation_widget::PermutationWidget;
