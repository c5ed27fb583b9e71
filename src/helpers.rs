use crate::error::{Groth16Error, Result};
use crate::field;
use ark_ff::PrimeField;
use rand::TryRngCore;

/// Draw a scalar in `[0, R)` from `bitlen(R) / 8 - 1` random bytes.
///
/// The byte count keeps the sampled integer below `R`, so the reduction never
/// wraps; the resulting distribution misses the top of the range by a
/// negligible amount.
pub fn random_scalar<R, F>(rng: &mut R) -> Result<F>
where
    R: TryRngCore + ?Sized,
    F: PrimeField,
{
    let mut bytes = vec![0u8; (F::MODULUS_BIT_SIZE as usize / 8) - 1];
    rng.try_fill_bytes(&mut bytes)
        .map_err(|e| Groth16Error::RandomnessFailure {
            message: e.to_string(),
        })?;
    Ok(field::from_be_bytes(&bytes))
}

/// Split `0..n` into `parts` contiguous, disjoint ranges covering all of it.
pub fn ranges(n: usize, parts: usize) -> Vec<std::ops::Range<usize>> {
    let parts = parts.max(1);
    (0..parts)
        .map(|i| (i * n / parts)..((i + 1) * n / parts))
        .collect()
}
