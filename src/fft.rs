//! Number-theoretic transform over the scalar field.
//!
//! [`RootsOfUnity`] owns the per-depth tables of powers of a primitive
//! `2^depth`-th root. It is meant to be created once by whoever drives the
//! QAP reduction and shared by reference; each depth is built at most once
//! and is read-only afterwards, so concurrent transforms never contend on a
//! populated depth.

use crate::error::{Groth16Error, Result};
use crate::field;
use ark_ff::{FftField, PrimeField};
use log::debug;
use std::sync::OnceLock;

/// Below this many bits the two recursive halves run on the current thread.
const PARALLEL_BITS: usize = 10;

pub struct RootsOfUnity<F: FftField> {
    /// `w[d]` is a primitive `2^d`-th root of unity.
    w: Vec<F>,
    /// `tables[d][i] = w[d]^i` for `i < 2^d`.
    tables: Vec<OnceLock<Vec<F>>>,
}

impl<F: PrimeField> Default for RootsOfUnity<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: PrimeField> RootsOfUnity<F> {
    pub fn new() -> Self {
        let s = F::TWO_ADICITY as usize;
        let mut w = vec![F::one(); s + 1];
        w[s] = F::TWO_ADIC_ROOT_OF_UNITY;
        for n in (0..s).rev() {
            w[n] = w[n + 1].square();
        }

        RootsOfUnity {
            w,
            tables: (0..=s).map(|_| OnceLock::new()).collect(),
        }
    }

    /// Deepest domain the field supports.
    pub fn max_depth(&self) -> usize {
        self.w.len() - 1
    }

    fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_depth() {
            return Err(Groth16Error::DomainTooLarge {
                depth,
                max: self.max_depth(),
            });
        }
        Ok(())
    }

    /// Primitive `2^depth`-th root of unity.
    pub fn primitive_root(&self, depth: usize) -> Result<F> {
        self.check_depth(depth)?;
        Ok(self.w[depth])
    }

    /// `[1, w, w^2, ..., w^(2^depth - 1)]` for the primitive root `w` of this depth.
    pub fn roots(&self, depth: usize) -> Result<&[F]> {
        self.check_depth(depth)?;
        let table = self.tables[depth].get_or_init(|| {
            debug!("Building roots of unity table at depth {}", depth);
            let root = self.w[depth];
            let mut powers = Vec::with_capacity(1 << depth);
            let mut current = F::one();
            for _ in 0..1usize << depth {
                powers.push(current);
                current *= root;
            }
            powers
        });
        Ok(table)
    }

    /// Populate every depth up to and including `depth`.
    pub fn prepare(&self, depth: usize) -> Result<()> {
        for d in (0..=depth).rev() {
            self.roots(d)?;
        }
        Ok(())
    }

    pub fn is_cached(&self, depth: usize) -> bool {
        self.tables.get(depth).is_some_and(|t| t.get().is_some())
    }

    /// Evaluate the polynomial with coefficients `p` on the `2^k` roots of
    /// unity, `k = ceil(log2(len(p)))`. Shorter inputs are zero-padded.
    pub fn fft(&self, p: &[F]) -> Result<Vec<F>> {
        if p.len() <= 1 {
            return Ok(p.to_vec());
        }
        let m = p.len().next_power_of_two();
        let bits = m.trailing_zeros() as usize;
        let tables = (0..=bits)
            .map(|d| self.roots(d))
            .collect::<Result<Vec<_>>>()?;

        let mut extended = p.to_vec();
        extended.resize(m, F::zero());
        Ok(fft_roots(&tables, &extended, bits, 0, 1))
    }

    /// Inverse of [`Self::fft`]: interpolate evaluations on the roots of
    /// unity back into coefficients.
    pub fn ifft(&self, p: &[F]) -> Result<Vec<F>> {
        if p.len() <= 1 {
            return Ok(p.to_vec());
        }
        let evaluations = self.fft(p)?;
        let m = evaluations.len();
        let m_inv = field::inv(F::from(m as u64))?;

        // Evaluating at w^-i is evaluating at w^(m-i).
        Ok((0..m)
            .map(|i| evaluations[(m - i) % m] * m_inv)
            .collect())
    }
}

/// Radix-2 decimation in time over `pall[offset], pall[offset + step], ...`.
fn fft_roots<F: PrimeField>(
    tables: &[&[F]],
    pall: &[F],
    bits: usize,
    offset: usize,
    step: usize,
) -> Vec<F> {
    let n = 1usize << bits;
    if n == 1 {
        return vec![pall[offset]];
    }
    if n == 2 {
        return vec![
            pall[offset] + pall[offset + step],
            pall[offset] - pall[offset + step],
        ];
    }

    let (even, odd) = if bits > PARALLEL_BITS {
        rayon::join(
            || fft_roots(tables, pall, bits - 1, offset, step * 2),
            || fft_roots(tables, pall, bits - 1, offset + step, step * 2),
        )
    } else {
        (
            fft_roots(tables, pall, bits - 1, offset, step * 2),
            fft_roots(tables, pall, bits - 1, offset + step, step * 2),
        )
    };

    let half = n >> 1;
    let twiddles = tables[bits];
    let mut out = vec![F::zero(); n];
    for i in 0..half {
        let t = twiddles[i] * odd[i];
        out[i] = even[i] + t;
        out[i + half] = even[i] - t;
    }
    out
}
