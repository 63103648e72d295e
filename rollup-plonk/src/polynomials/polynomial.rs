use std::ops::{AddAssign, Index, IndexMut, MulAssign, Range, SubAssign};

use ark_bn254::Fr;
use ark_ff::Zero;

use super::polynomial_arithmetic;

/// A dense polynomial, either in coefficient form or as evaluations over some domain.
/// Which one is up to the owner; the container does not track it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Polynomial {
    coefficients: Vec<Fr>,
}

impl Polynomial {
    /// The zero polynomial with `size` slots.
    #[inline]
    pub fn new(size: usize) -> Self {
        Self {
            coefficients: vec![Fr::zero(); size],
        }
    }

    /// Number of slots.
    #[inline]
    pub fn size(&self) -> usize {
        self.coefficients.len()
    }

    /// Index of the highest non-zero coefficient, or `None` for the zero polynomial.
    pub fn get_degree(&self) -> Option<usize> {
        self.coefficients.iter().rposition(|c| !c.is_zero())
    }

    #[inline]
    pub fn get_coefficients(&self) -> &[Fr] {
        &self.coefficients
    }

    #[inline]
    pub fn get_mut_coefficients(&mut self) -> &mut [Fr] {
        &mut self.coefficients
    }

    #[inline]
    pub fn set_coefficient(&mut self, idx: usize, v: Fr) {
        self.coefficients[idx] = v
    }

    /// Grow or shrink to `new_len` slots, filling with `val`.
    #[inline]
    pub fn resize(&mut self, new_len: usize, val: Fr) {
        self.coefficients.resize(new_len, val);
    }

    /// Evaluate the coefficient form at `z`.
    pub fn evaluate(&self, z: &Fr) -> Fr {
        polynomial_arithmetic::evaluate(&self.coefficients, z, self.size())
    }

    /// `self += scalar * other`, coefficient-wise.
    pub fn add_scaled(&mut self, other: &Polynomial, scalar: &Fr) {
        if other.size() > self.size() {
            self.resize(other.size(), Fr::zero());
        }
        polynomial_arithmetic::add_scaled(&mut self.coefficients, &other.coefficients, scalar);
    }

    /// Consume the polynomial, returning its coefficients.
    pub fn into_coefficients(self) -> Vec<Fr> {
        self.coefficients
    }
}

impl From<Vec<Fr>> for Polynomial {
    fn from(coefficients: Vec<Fr>) -> Self {
        Self { coefficients }
    }
}

impl AddAssign<&Polynomial> for Polynomial {
    fn add_assign(&mut self, rhs: &Polynomial) {
        if rhs.size() > self.size() {
            self.resize(rhs.size(), Fr::zero());
        }
        for (l, r) in self.coefficients.iter_mut().zip(rhs.coefficients.iter()) {
            *l += r;
        }
    }
}

impl SubAssign<&Polynomial> for Polynomial {
    fn sub_assign(&mut self, rhs: &Polynomial) {
        if rhs.size() > self.size() {
            self.resize(rhs.size(), Fr::zero());
        }
        for (l, r) in self.coefficients.iter_mut().zip(rhs.coefficients.iter()) {
            *l -= r;
        }
    }
}

impl MulAssign<Fr> for Polynomial {
    fn mul_assign(&mut self, rhs: Fr) {
        self.coefficients.iter_mut().for_each(|c| *c *= rhs);
    }
}

impl IntoIterator for Polynomial {
    type Item = Fr;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.coefficients.into_iter()
    }
}

impl Index<usize> for Polynomial {
    type Output = Fr;

    fn index(&self, index: usize) -> &Self::Output {
        &self.coefficients[index]
    }
}

impl IndexMut<usize> for Polynomial {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.coefficients[index]
    }
}

impl Index<Range<usize>> for Polynomial {
    type Output = [Fr];

    fn index(&self, index: Range<usize>) -> &Self::Output {
        &self.coefficients[index]
    }
}

impl Index<std::ops::RangeFrom<usize>> for Polynomial {
    type Output = [Fr];

    fn index(&self, index: std::ops::RangeFrom<usize>) -> &Self::Output {
        &self.coefficients[index]
    }
}
