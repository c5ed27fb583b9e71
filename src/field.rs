//! Modular arithmetic over the scalar field.
//!
//! Elements are arkworks prime-field elements, so every value is already
//! reduced into `[0, R)`. These helpers add the fallible operations the rest
//! of the crate needs to surface as [`Groth16Error::FieldInversionOfZero`]
//! instead of an `Option`.

use crate::error::{Groth16Error, Result};
use ark_ff::{BigInteger, PrimeField};

/// `a + b mod R`.
///
/// `add`, `sub`, `mul` and `neg` are the public field operations next to the
/// fallible [`inv`] and [`div`]. Crate code uses the operators directly.
pub fn add<F: PrimeField>(a: F, b: F) -> F {
    a + b
}

/// `a - b mod R`.
pub fn sub<F: PrimeField>(a: F, b: F) -> F {
    a - b
}

/// `a · b mod R`.
pub fn mul<F: PrimeField>(a: F, b: F) -> F {
    a * b
}

/// `-a mod R`, zero for zero.
pub fn neg<F: PrimeField>(a: F) -> F {
    -a
}

/// Multiplicative inverse of `a`.
pub fn inv<F: PrimeField>(a: F) -> Result<F> {
    a.inverse().ok_or(Groth16Error::FieldInversionOfZero)
}

/// `a / b`, i.e. `a` times the inverse of `b`.
pub fn div<F: PrimeField>(a: F, b: F) -> Result<F> {
    Ok(a * inv(b)?)
}

/// `base^e` by square-and-multiply, scanning the exponent from its least
/// significant bit.
pub fn exp<F: PrimeField>(base: F, e: &F::BigInt) -> F {
    let mut result = F::one();
    let mut power = base;
    for i in 0..e.num_bits() as usize {
        if e.get_bit(i) {
            result *= power;
        }
        power.square_in_place();
    }
    result
}

/// `base^e` for a machine-word exponent.
pub fn exp_u64<F: PrimeField>(base: F, e: u64) -> F {
    exp(base, &F::BigInt::from(e))
}

/// Interpret big-endian bytes as an integer and reduce it into the field.
pub fn from_be_bytes<F: PrimeField>(bytes: &[u8]) -> F {
    F::from_be_bytes_mod_order(bytes)
}
