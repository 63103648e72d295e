use anyhow::{anyhow, ensure, Result};
use ark_bn254::Fr;
use ark_ff::{FftField, Field, One};

use crate::numeric::bitop::Msb;

pub(crate) const MIN_GROUP_PER_THREAD: usize = 4;

/// A multiplicative subgroup `H = <ω>` of size `n = 2^k`, with the constants FFTs need.
#[derive(Debug, Clone)]
pub struct EvaluationDomain {
    /// n, always a power of 2
    pub size: usize,
    /// num_threads * thread_size = size
    pub num_threads: usize,
    /// elements handled by each worker
    pub thread_size: usize,
    /// log2(n)
    pub log2_size: usize,
    /// omega; the nth root of unity
    pub root: Fr,
    /// omega^{-1}
    pub root_inverse: Fr,
    /// n; same as size
    pub domain: Fr,
    /// n^{-1}
    pub domain_inverse: Fr,
    /// coset shift used by coset FFTs
    pub generator: Fr,
    /// inverse of the coset shift
    pub generator_inverse: Fr,
    /// 4^{-1}
    pub four_inverse: Fr,
    /// One entry per butterfly round: round `r` holds `[ω_{2m}^j for j in 0..m]` with `m = 2^r`.
    round_roots: Vec<Vec<Fr>>,
    inverse_round_roots: Vec<Vec<Fr>>,
}

fn compute_num_threads(size: usize) -> usize {
    let num_threads = crate::common::max_threads::compute_num_threads();
    if size <= num_threads * MIN_GROUP_PER_THREAD {
        return 1;
    }
    num_threads
}

fn compute_lookup_table_single(input_root: &Fr, log2_size: usize) -> Vec<Vec<Fr>> {
    let size = 1usize << log2_size;
    let mut round_roots = Vec::with_capacity(log2_size);
    for r in 0..log2_size {
        let m = 1usize << r;
        // ω_{2m} = ω_n^{n / 2m}
        let round_root = input_root.pow([(size / (2 * m)) as u64]);
        let mut roots = Vec::with_capacity(m);
        let mut acc = Fr::one();
        for _ in 0..m {
            roots.push(acc);
            acc *= round_root;
        }
        round_roots.push(roots);
    }
    round_roots
}

impl EvaluationDomain {
    /// Build the domain of the given size, which must be a power of two supported by the field.
    pub fn new(domain_size: usize) -> Result<Self> {
        ensure!(
            domain_size.is_power_of_two(),
            "evaluation domain size {} is not a power of two",
            domain_size
        );
        let size = domain_size;
        let num_threads = compute_num_threads(size);
        let thread_size = size / num_threads;
        let log2_size = size.get_msb();
        let root = Fr::get_root_of_unity(size as u64)
            .ok_or_else(|| anyhow!("no root of unity of order {}", size))?;
        let root_inverse = root
            .inverse()
            .ok_or_else(|| anyhow!("root of unity is not invertible"))?;
        let domain = Fr::from(size as u64);
        let domain_inverse = domain
            .inverse()
            .ok_or_else(|| anyhow!("domain size is zero in the field"))?;
        let generator = crate::ecc::coset_generator_base();
        let generator_inverse = generator
            .inverse()
            .ok_or_else(|| anyhow!("coset generator is not invertible"))?;
        let four_inverse = Fr::from(4u64)
            .inverse()
            .ok_or_else(|| anyhow!("4 is not invertible"))?;

        let mut result = Self {
            size,
            num_threads,
            thread_size,
            log2_size,
            root,
            root_inverse,
            domain,
            domain_inverse,
            generator,
            generator_inverse,
            four_inverse,
            round_roots: Vec::new(),
            inverse_round_roots: Vec::new(),
        };
        result.compute_lookup_table();
        Ok(result)
    }

    /// Precompute the per-round twiddle factors for forward and inverse transforms.
    pub fn compute_lookup_table(&mut self) {
        self.round_roots = compute_lookup_table_single(&self.root, self.log2_size);
        self.inverse_round_roots = compute_lookup_table_single(&self.root_inverse, self.log2_size);
    }

    /// Twiddles for the forward transform.
    pub fn get_round_roots(&self) -> &[Vec<Fr>] {
        &self.round_roots
    }

    /// Twiddles for the inverse transform.
    pub fn get_inverse_round_roots(&self) -> &[Vec<Fr>] {
        &self.inverse_round_roots
    }

    /// `ω^i`.
    pub fn element(&self, i: usize) -> Fr {
        self.root.pow([(i % self.size) as u64])
    }

    /// All of `H` in order, `[1, ω, ω^2, ...]`.
    pub fn elements(&self) -> Vec<Fr> {
        let mut out = Vec::with_capacity(self.size);
        let mut acc = Fr::one();
        for _ in 0..self.size {
            out.push(acc);
            acc *= self.root;
        }
        out
    }
}
