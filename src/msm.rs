//! Windowed multi-scalar multiplication over precomputed subset-sum tables.
//!
//! Bases are consumed in windows of `gsize` elements. For each window a
//! [`Table`] holds all `2^gsize` subset sums, so the `gsize` scalar bits at a
//! given position select a single table entry. The functions are generic over
//! [`CurveGroup`] and serve both G1 and G2.

use crate::error::{Groth16Error, Result};
use crate::helpers::ranges;
use ark_ec::CurveGroup;
use ark_ff::{BigInteger, PrimeField};
use log::trace;
use rayon::prelude::*;

/// Largest window accepted; a table holds `2^gsize` points.
pub const MAX_WINDOW_SIZE: usize = 20;

type BigIntOf<G> = <<G as ark_ec::PrimeGroup>::ScalarField as PrimeField>::BigInt;

fn check_window_size(gsize: usize) -> Result<()> {
    if gsize == 0 || gsize > MAX_WINDOW_SIZE {
        return Err(Groth16Error::InvalidWindowSize(gsize));
    }
    Ok(())
}

fn check_lengths(context: &'static str, capacity: usize, actual: usize) -> Result<()> {
    if actual > capacity {
        return Err(Groth16Error::DimensionMismatch {
            context,
            expected: capacity,
            actual,
        });
    }
    Ok(())
}

/// Scalars as integers, zero-padded to `len`.
fn to_bigints<G: CurveGroup>(scalars: &[G::ScalarField], len: usize) -> Vec<BigIntOf<G>> {
    let mut k: Vec<_> = scalars.iter().map(|s| s.into_bigint()).collect();
    k.resize(len.max(scalars.len()), Default::default());
    k
}

/// Highest bit length among a group of integers.
fn get_msb<B: BigInteger>(k: &[B]) -> usize {
    k.iter().map(|el| el.num_bits() as usize).max().unwrap_or(0)
}

/// Table index formed by bit `i` of every integer in the group, the first
/// integer providing the least significant index bit.
fn get_bit<B: BigInteger>(k: &[B], i: usize) -> usize {
    k.iter()
        .enumerate()
        .fold(0, |idx, (j, el)| idx | ((el.get_bit(i) as usize) << j))
}

/// Subset sums of up to `gsize` bases:
///
/// ```text
/// Table[0]             = identity
/// Table[1]             = a[0]
/// Table[2]             = a[1]
/// Table[3]             = a[0] + a[1]
/// ...
/// Table[2^gsize - 1]   = a[0] + a[1] + ... + a[gsize - 1]
/// ```
#[derive(Clone, Debug)]
pub struct Table<G: CurveGroup> {
    data: Vec<G::Affine>,
}

impl<G: CurveGroup> Table<G> {
    /// Missing bases (fewer than `gsize`) count as the identity.
    pub fn new(bases: &[G::Affine], gsize: usize) -> Result<Self> {
        check_window_size(gsize)?;
        check_lengths("bases in one window", gsize, bases.len())?;

        let size = 1usize << gsize;
        let mut table: Vec<G> = Vec::with_capacity(size);
        table.push(G::zero());
        let mut last_pow2 = 1;
        let mut nelems = 0;
        for i in 1..size {
            if i & (i - 1) == 0 {
                last_pow2 = i;
                table.push(bases.get(nelems).map_or(G::zero(), |b| (*b).into()));
                nelems += 1;
            } else {
                let el = table[last_pow2] + table[i - last_pow2];
                table.push(el);
            }
        }

        Ok(Table {
            data: G::normalize_batch(&table),
        })
    }

    pub fn data(&self) -> &[G::Affine] {
        &self.data
    }

    fn check_size(&self, gsize: usize) -> Result<()> {
        if self.data.len() != 1 << gsize {
            return Err(Groth16Error::DimensionMismatch {
                context: "table size for window",
                expected: 1 << gsize,
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    /// Double-and-add over the window, all scalars sharing one accumulator.
    fn mul_bigints(&self, k: &[BigIntOf<G>], q_prev: G) -> G {
        let mut q = G::zero();
        for i in (0..get_msb(k)).rev() {
            q.double_in_place();
            let b = get_bit(k, i);
            if b != 0 {
                q += self.data[b];
            }
        }
        q + q_prev
    }

    /// `Σ scalars[i] · bases[i] + q_prev` for the bases this table was built from.
    pub fn mul(&self, scalars: &[G::ScalarField], q_prev: G, gsize: usize) -> Result<G> {
        check_window_size(gsize)?;
        check_lengths("scalars in one window", gsize, scalars.len())?;
        self.check_size(gsize)?;
        Ok(self.mul_bigints(&to_bigints::<G>(scalars, gsize), q_prev))
    }
}

/// Build one table per window of `gsize` bases.
pub fn build_tables<G: CurveGroup>(bases: &[G::Affine], gsize: usize) -> Result<Vec<Table<G>>> {
    check_window_size(gsize)?;
    bases
        .chunks(gsize)
        .map(|window| Table::new(window, gsize))
        .collect()
}

/// Windowed MSM building each table on the fly, so at most one table
/// (`2^gsize` points) is alive at a time.
pub fn scalar_mult<G: CurveGroup>(
    bases: &[G::Affine],
    scalars: &[G::ScalarField],
    gsize: usize,
) -> Result<G> {
    check_window_size(gsize)?;
    check_lengths("MSM scalars", bases.len(), scalars.len())?;
    let ntables = bases.len().div_ceil(gsize);
    let k = to_bigints::<G>(scalars, ntables * gsize);

    let mut q = G::zero();
    for (window, chunk) in bases.chunks(gsize).zip(k.chunks(gsize)) {
        let table = Table::<G>::new(window, gsize)?;
        q = table.mul_bigints(chunk, q);
    }
    Ok(q)
}

/// Fold every window's lookups into `accumulators[bit]` instead of doubling.
fn accumulate_window<G: CurveGroup>(accumulators: &mut [G], table: &Table<G>, k: &[BigIntOf<G>]) {
    for i in (0..get_msb(k)).rev() {
        let b = get_bit(k, i);
        if b != 0 {
            accumulators[i] += table.data[b];
        }
    }
}

/// Combine per-bit accumulators from the most significant one down:
/// `Σ 2^i · accumulators[i]`.
fn consolidate<G: CurveGroup>(accumulators: &[G]) -> G {
    let mut r = G::zero();
    for acc in accumulators.iter().rev() {
        r.double_in_place();
        r += acc;
    }
    r
}

fn accumulator_width<G: CurveGroup>() -> usize {
    <G::ScalarField as PrimeField>::MODULUS_BIT_SIZE as usize
}

/// MSM over pre-built window tables without per-window doubling.
pub fn mul_table_no_double<G: CurveGroup>(
    tables: &[Table<G>],
    scalars: &[G::ScalarField],
    gsize: usize,
) -> Result<G> {
    check_window_size(gsize)?;
    check_lengths("MSM scalars", tables.len() * gsize, scalars.len())?;
    for table in tables {
        table.check_size(gsize)?;
    }
    let k = to_bigints::<G>(scalars, tables.len() * gsize);

    let mut accumulators = vec![G::zero(); accumulator_width::<G>()];
    for (table, chunk) in tables.iter().zip(k.chunks(gsize)) {
        accumulate_window(&mut accumulators, table, chunk);
    }
    Ok(consolidate(&accumulators))
}

/// Production MSM: tables built per window, one accumulator per scalar bit,
/// and a single doubling pass at the end.
pub fn scalar_mult_no_double<G: CurveGroup>(
    bases: &[G::Affine],
    scalars: &[G::ScalarField],
    gsize: usize,
) -> Result<G> {
    check_window_size(gsize)?;
    check_lengths("MSM scalars", bases.len(), scalars.len())?;
    let ntables = bases.len().div_ceil(gsize);
    let k = to_bigints::<G>(scalars, ntables * gsize);
    trace!(
        "MSM over {} bases in {} windows of {}",
        bases.len(),
        ntables,
        gsize
    );

    let mut accumulators = vec![G::zero(); accumulator_width::<G>()];
    for (window, chunk) in bases.chunks(gsize).zip(k.chunks(gsize)) {
        let table = Table::<G>::new(window, gsize)?;
        accumulate_window(&mut accumulators, &table, chunk);
    }
    Ok(consolidate(&accumulators))
}

/// [`scalar_mult_no_double`] forked over `workers` disjoint ranges of the
/// input; partial sums are added once every worker has finished.
pub fn scalar_mult_parallel<G: CurveGroup>(
    bases: &[G::Affine],
    scalars: &[G::ScalarField],
    gsize: usize,
    workers: usize,
) -> Result<G> {
    check_window_size(gsize)?;
    check_lengths("MSM scalars", bases.len(), scalars.len())?;

    let partials = ranges(bases.len(), workers)
        .into_par_iter()
        .map(|r| {
            let k_end = r.end.min(scalars.len());
            let k_start = r.start.min(k_end);
            scalar_mult_no_double::<G>(&bases[r], &scalars[k_start..k_end], gsize)
        })
        .collect::<Result<Vec<G>>>()?;

    Ok(partials.into_iter().fold(G::zero(), |acc, p| acc + p))
}
