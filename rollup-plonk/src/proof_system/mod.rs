/// Shapes of circuit constructors and their gate operands.
pub mod arithmetization;
/// Named polynomial storage.
pub mod polynomial_store;
