/// Multiplicative subgroups and their precomputed roots.
pub mod evaluation_domain;
/// The polynomial container.
pub mod polynomial;
/// FFTs, vanishing-polynomial division and Kate helpers.
pub mod polynomial_arithmetic;

pub use evaluation_domain::EvaluationDomain;
pub use polynomial::Polynomial;
pub use polynomial_arithmetic::LagrangeEvaluations;
