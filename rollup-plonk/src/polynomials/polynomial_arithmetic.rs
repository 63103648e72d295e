use anyhow::{anyhow, ensure, Result};
use ark_bn254::Fr;
use ark_ff::{Field, One, Zero};
use rayon::prelude::*;

use super::evaluation_domain::EvaluationDomain;

/// Lagrange-basis values and the vanishing polynomial at a single point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LagrangeEvaluations {
    /// `Z_H(z) = z^n - 1`
    pub vanishing_poly: Fr,
    /// `L_1(z)`, the basis polynomial that is 1 at `ω^0`
    pub l_1: Fr,
    /// the basis polynomial that is 1 at `ω^{n-1}`
    pub l_n_minus_1: Fr,
}

#[inline]
fn reverse_bits(x: u32, bit_length: u32) -> u32 {
    x.reverse_bits() >> (32 - bit_length)
}

fn bit_reverse_permute(coeffs: &mut [Fr]) {
    let n = coeffs.len();
    if n < 2 {
        return;
    }
    let log2_n = n.trailing_zeros();
    for i in 0..n {
        let j = reverse_bits(i as u32, log2_n) as usize;
        if i < j {
            coeffs.swap(i, j);
        }
    }
}

#[inline]
fn butterfly(chunk: &mut [Fr], roots: &[Fr]) {
    let m = roots.len();
    let (lo, hi) = chunk.split_at_mut(m);
    for j in 0..m {
        let t = roots[j] * hi[j];
        let u = lo[j];
        lo[j] = u + t;
        hi[j] = u - t;
    }
}

fn fft_inner_serial(coeffs: &mut [Fr], round_roots: &[Vec<Fr>]) {
    bit_reverse_permute(coeffs);
    for roots in round_roots {
        let m = roots.len();
        for chunk in coeffs.chunks_mut(2 * m) {
            butterfly(chunk, roots);
        }
    }
}

fn fft_inner_parallel(coeffs: &mut [Fr], round_roots: &[Vec<Fr>]) {
    bit_reverse_permute(coeffs);
    for roots in round_roots {
        let m = roots.len();
        coeffs
            .par_chunks_mut(2 * m)
            .for_each(|chunk| butterfly(chunk, roots));
    }
}

fn scale_by_generator(coeffs: &mut [Fr], generator_start: Fr, generator_shift: Fr) {
    let mut work_generator = generator_start;
    for c in coeffs.iter_mut() {
        *c *= work_generator;
        work_generator *= generator_shift;
    }
}

impl EvaluationDomain {
    fn fft_inner(&self, coeffs: &mut [Fr], round_roots: &[Vec<Fr>]) {
        assert_eq!(
            coeffs.len(),
            self.size,
            "fft input length must equal the domain size"
        );
        tracing::trace!("fft over a domain of size {}", self.size);
        if self.num_threads > 1 {
            fft_inner_parallel(coeffs, round_roots);
        } else {
            fft_inner_serial(coeffs, round_roots);
        }
    }

    /// Evaluate the polynomial with coefficients `coeffs` on `H`, in place.
    pub fn fft_inplace(&self, coeffs: &mut [Fr]) {
        self.fft_inner(coeffs, self.get_round_roots());
    }

    /// Interpolate values on `H` back to coefficients, in place.
    pub fn ifft_inplace(&self, coeffs: &mut [Fr]) {
        self.fft_inner(coeffs, self.get_inverse_round_roots());
        let inv = self.domain_inverse;
        if self.num_threads > 1 {
            coeffs.par_iter_mut().for_each(|c| *c *= inv);
        } else {
            coeffs.iter_mut().for_each(|c| *c *= inv);
        }
    }

    /// Forward FFT followed by multiplication of every output by `value`.
    pub fn fft_with_constant(&self, coeffs: &mut [Fr], value: Fr) {
        self.fft_inplace(coeffs);
        coeffs.iter_mut().for_each(|c| *c *= value);
    }

    /// Evaluate on the coset `g·H`, in place.
    pub fn coset_fft_inplace(&self, coeffs: &mut [Fr]) {
        scale_by_generator(coeffs, Fr::one(), self.generator);
        self.fft_inplace(coeffs);
    }

    /// Interpolate values on the coset `g·H` back to coefficients, in place.
    pub fn coset_ifft_inplace(&self, coeffs: &mut [Fr]) {
        self.ifft_inplace(coeffs);
        scale_by_generator(coeffs, Fr::one(), self.generator_inverse);
    }

    /// Zero-extend `coeffs` to this domain's size and evaluate on the coset.
    pub fn coset_fft_extended(&self, coeffs: &[Fr]) -> Vec<Fr> {
        assert!(coeffs.len() <= self.size);
        let mut out = vec![Fr::zero(); self.size];
        out[..coeffs.len()].copy_from_slice(coeffs);
        self.coset_fft_inplace(&mut out);
        out
    }

    /// Divide coset evaluations over `target_domain` by `Z_H(X) = X^n - 1`, where `n` is this
    /// domain's size. On the coset, `Z_H` only takes `target_domain.size / n` distinct values.
    pub fn divide_by_pseudo_vanishing_polynomial(
        &self,
        coeffs: &mut [Fr],
        target_domain: &EvaluationDomain,
    ) -> Result<()> {
        ensure!(
            coeffs.len() == target_domain.size,
            "expected {} coset evaluations, got {}",
            target_domain.size,
            coeffs.len()
        );
        ensure!(
            target_domain.size >= self.size && target_domain.size % self.size == 0,
            "target domain must be a multiple of the vanishing domain"
        );
        let num_roots = target_domain.size / self.size;
        // (gω_L^i)^n = g^n · (ω_L^n)^i and ω_L^n has order num_roots
        let root_step = target_domain.root.pow([self.size as u64]);
        let generator_n = target_domain.generator.pow([self.size as u64]);
        let mut denominators = Vec::with_capacity(num_roots);
        let mut acc = generator_n;
        for _ in 0..num_roots {
            denominators.push(acc - Fr::one());
            acc *= root_step;
        }
        let mut inverses = Vec::with_capacity(num_roots);
        for d in denominators {
            inverses.push(
                d.inverse()
                    .ok_or_else(|| anyhow!("vanishing polynomial is zero on the coset"))?,
            );
        }
        let apply = |(i, c): (usize, &mut Fr)| *c *= inverses[i % num_roots];
        if target_domain.num_threads > 1 {
            coeffs.par_iter_mut().enumerate().for_each(apply);
        } else {
            coeffs.iter_mut().enumerate().for_each(apply);
        }
        Ok(())
    }

    /// Coefficients of the Lagrange basis polynomial that is 1 at `ω^index` and 0 elsewhere on `H`.
    pub fn compute_lagrange_polynomial(&self, index: usize) -> Vec<Fr> {
        assert!(index < self.size);
        let mut coeffs = vec![Fr::zero(); self.size];
        coeffs[index] = Fr::one();
        self.ifft_inplace(&mut coeffs);
        coeffs
    }

    /// `L_index(z) = ω^index (z^n - 1) / (n (z - ω^index))`.
    pub fn compute_lagrange_evaluation(&self, index: usize, z: &Fr) -> Fr {
        let point = self.element(index);
        if *z == point {
            return Fr::one();
        }
        let vanishing = z.pow([self.size as u64]) - Fr::one();
        if vanishing.is_zero() {
            return Fr::zero();
        }
        let denominator = self.domain * (*z - point);
        // z != point so the denominator is non-zero
        point * vanishing * denominator.inverse().unwrap_or_default()
    }

    /// `Z_H(z)`, `L_1(z)` and `L_{n-1}(z)`.
    pub fn get_lagrange_evaluations(&self, z: &Fr) -> LagrangeEvaluations {
        LagrangeEvaluations {
            vanishing_poly: z.pow([self.size as u64]) - Fr::one(),
            l_1: self.compute_lagrange_evaluation(0, z),
            l_n_minus_1: self.compute_lagrange_evaluation(self.size - 1, z),
        }
    }
}

/// Horner evaluation of the first `n` coefficients at `z`.
pub fn evaluate(coeffs: &[Fr], z: &Fr, n: usize) -> Fr {
    coeffs[..n]
        .iter()
        .rev()
        .fold(Fr::zero(), |acc, c| acc * z + c)
}

/// Replace the first `n` coefficients of `F` by those of `W(X) = (F(X) - F(z)) / (X - z)` and
/// return `F(z)`. The top coefficient becomes zero.
pub fn compute_kate_opening_coefficients_inplace(coeffs: &mut [Fr], z: &Fr, n: usize) -> Result<Fr> {
    ensure!(n > 0 && n <= coeffs.len(), "invalid polynomial size {}", n);
    let f = evaluate(coeffs, z, n);
    // synthetic division from the top: W_{k-1} = F_k + z·W_k
    let mut carry = Fr::zero();
    for k in (1..n).rev() {
        carry = coeffs[k] + carry * z;
        coeffs[k] = carry;
    }
    // shift down by one: W_k lives at index k
    coeffs.copy_within(1..n, 0);
    coeffs[n - 1] = Fr::zero();
    Ok(f)
}

/// Coefficient-wise `dest += scalar * src`.
pub fn add_scaled(dest: &mut [Fr], src: &[Fr], scalar: &Fr) {
    assert!(src.len() <= dest.len());
    dest.iter_mut()
        .zip(src.iter())
        .for_each(|(d, s)| *d += *s * scalar);
}
