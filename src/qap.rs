//! Quotient polynomial of the QAP.
//!
//! With `A(x) = Σ w_i·A_i(x)` (and `B`, `C` likewise) a satisfying witness
//! gives `A·B - C = H·Z` for `Z(x) = x^m - 1`. `C` has degree below `m`, so
//! `H` is exactly the upper half of the coefficients of `A·B`. `A·B` is
//! obtained from its evaluations on the `2m`-th roots of unity: the even
//! ones are the constraint evaluations already at hand, the odd ones come
//! from a transform of the coefficients shifted by a primitive `2m`-th root.

use crate::error::{Groth16Error, Result};
use crate::fft::RootsOfUnity;
use crate::keys::{ProvingKey, SparsePolynomial};
use ark_ec::pairing::Pairing;
use ark_ff::PrimeField;
use itertools::izip;
use log::trace;

/// `Σ_i w_i · pols[i]` evaluated on each of the `m` constraints.
fn evaluate_columns<F: PrimeField>(
    pols: &[SparsePolynomial<F>],
    witness: &[F],
    m: usize,
) -> Vec<F> {
    let mut out = vec![F::zero(); m];
    for (column, w) in pols.iter().zip(witness) {
        for (j, coeff) in column {
            out[*j] += *w * coeff;
        }
    }
    out
}

/// Compute the `m` coefficients of `H` for `witness`.
pub fn calculate_h<E: Pairing>(
    pk: &ProvingKey<E>,
    witness: &[E::ScalarField],
    roots: &RootsOfUnity<E::ScalarField>,
) -> Result<Vec<E::ScalarField>> {
    pk.validate()?;
    if witness.len() != pk.n_vars {
        return Err(Groth16Error::DimensionMismatch {
            context: "witness",
            expected: pk.n_vars,
            actual: witness.len(),
        });
    }
    h_coefficients(pk, witness, roots)
}

/// [`calculate_h`] for a key and witness already checked against each other.
pub(crate) fn h_coefficients<E: Pairing>(
    pk: &ProvingKey<E>,
    witness: &[E::ScalarField],
    roots: &RootsOfUnity<E::ScalarField>,
) -> Result<Vec<E::ScalarField>> {
    let m = pk.domain_size;
    let bits = m.trailing_zeros() as usize;
    trace!("Reducing QAP over a domain of {}", m);

    let (pol_at, pol_bt) = rayon::join(
        || evaluate_columns(&pk.pols_a, witness, m),
        || evaluate_columns(&pk.pols_b, witness, m),
    );

    let (pol_as, pol_bs) = rayon::join(|| roots.ifft(&pol_at), || roots.ifft(&pol_bt));
    let (mut pol_as, mut pol_bs) = (pol_as?, pol_bs?);

    // Scaling coefficient i by w_2m^i moves evaluation onto the odd points.
    let shift = roots.roots(bits + 1)?;
    for (a, b, w) in izip!(&mut pol_as, &mut pol_bs, shift) {
        *a *= w;
        *b *= w;
    }

    let (pol_a_odd, pol_b_odd) = rayon::join(|| roots.fft(&pol_as), || roots.fft(&pol_bs));
    let (pol_a_odd, pol_b_odd) = (pol_a_odd?, pol_b_odd?);

    let mut pol_abt = Vec::with_capacity(2 * m);
    for (at, bt, a_odd, b_odd) in izip!(&pol_at, &pol_bt, &pol_a_odd, &pol_b_odd) {
        pol_abt.push(*at * bt);
        pol_abt.push(*a_odd * b_odd);
    }

    let mut h = roots.ifft(&pol_abt)?;
    Ok(h.split_off(m))
}
