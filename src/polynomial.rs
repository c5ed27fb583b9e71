use crate::error::{Groth16Error, Result};
use crate::field;
use ark_ff::PrimeField;
use std::cmp::Ordering;
use std::iter::{Sum, zip};
use std::ops::{Add, Mul, Sub};

/// Dense polynomial in coefficient form.
///
/// Trailing zero coefficients are kept as they are; `add`/`sub` produce
/// `max(len(a), len(b))` coefficients and `mul` produces `len(a) + len(b) - 1`.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Polynomial<F>
where
    F: PrimeField,
{
    /// x^0, x^1, x^2, ...
    coefficients: Vec<F>,
}

impl<F: PrimeField> Polynomial<F> {
    pub fn new(coefficients: Vec<F>) -> Self {
        Polynomial { coefficients }
    }

    /// `x^m - 1`, the polynomial vanishing on a multiplicative subgroup of order `m`.
    pub fn vanishing(m: usize) -> Self {
        let mut coefficients = vec![F::zero(); m + 1];
        coefficients[0] = -F::one();
        coefficients[m] = F::one();
        Polynomial { coefficients }
    }

    pub fn from_ints(coefficients: Vec<u64>) -> Self {
        Polynomial {
            coefficients: coefficients.into_iter().map(F::from).collect(),
        }
    }

    pub fn coefficients(&self) -> &[F] {
        &self.coefficients
    }

    pub fn into_coefficients(self) -> Vec<F> {
        self.coefficients
    }

    /// Number of stored coefficients, trailing zeros included.
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Index of the highest non-zero coefficient, `None` for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coefficients.iter().rposition(|c| !c.is_zero())
    }

    pub fn is_zero(&self) -> bool {
        self.degree().is_none()
    }

    /// Copy with trailing zero coefficients removed.
    pub fn trimmed(&self) -> Self {
        let len = self.degree().map_or(0, |d| d + 1);
        Polynomial {
            coefficients: self.coefficients[..len].to_vec(),
        }
    }

    pub fn evaluate(&self, x: F) -> F {
        // Horner
        self.coefficients
            .iter()
            .rev()
            .fold(F::zero(), |acc, coefficient| acc * x + coefficient)
    }

    /// Long division, returning `(quotient, remainder)` with
    /// `divisor * quotient + remainder == self` and `deg(remainder) < deg(divisor)`.
    pub fn div_rem(&self, divisor: &Self) -> Result<(Self, Self)> {
        let divisor = divisor.trimmed();
        let leading = *divisor
            .coefficients
            .last()
            .ok_or(Groth16Error::FieldInversionOfZero)?;
        let leading_inv = field::inv(leading)?;

        let mut remainder = self.trimmed().coefficients;
        if remainder.len() < divisor.len() {
            return Ok((Polynomial::default(), Polynomial::new(remainder)));
        }

        let mut quotient = vec![F::zero(); remainder.len() - divisor.len() + 1];
        while remainder.len() >= divisor.len() {
            let lead = remainder[remainder.len() - 1];
            let pos = remainder.len() - divisor.len();
            let factor = lead * leading_inv;
            quotient[pos] = factor;
            for (i, d) in divisor.coefficients.iter().enumerate() {
                remainder[pos + i] -= factor * d;
            }
            // The leading term is now eliminated; drop it along with any
            // zeros it uncovers.
            remainder.pop();
            while remainder.last().is_some_and(|c| c.is_zero()) {
                remainder.pop();
            }
        }

        Ok((Polynomial::new(quotient), Polynomial::new(remainder)))
    }
}

impl<F: PrimeField> From<Vec<F>> for Polynomial<F> {
    fn from(coefficients: Vec<F>) -> Self {
        Polynomial { coefficients }
    }
}

fn pad_to_same_length<F: PrimeField>(a: &mut Vec<F>, b: &mut Vec<F>) {
    match a.len().cmp(&b.len()) {
        Ordering::Less => a.resize(b.len(), F::zero()),
        Ordering::Greater => b.resize(a.len(), F::zero()),
        Ordering::Equal => {}
    }
}

impl<F: PrimeField> Add for &Polynomial<F> {
    type Output = Polynomial<F>;

    fn add(self, rhs: Self) -> Self::Output {
        let mut a = self.coefficients.clone();
        let mut b = rhs.coefficients.clone();
        pad_to_same_length(&mut a, &mut b);

        Polynomial {
            coefficients: zip(a, b).map(|(a_i, b_i)| a_i + b_i).collect(),
        }
    }
}

impl<F: PrimeField> Add for Polynomial<F> {
    type Output = Polynomial<F>;

    fn add(self, rhs: Self) -> Self::Output {
        &self + &rhs
    }
}

impl<F: PrimeField> Sub for &Polynomial<F> {
    type Output = Polynomial<F>;

    fn sub(self, rhs: Self) -> Self::Output {
        let mut a = self.coefficients.clone();
        let mut b = rhs.coefficients.clone();
        pad_to_same_length(&mut a, &mut b);

        Polynomial {
            coefficients: zip(a, b).map(|(a_i, b_i)| a_i - b_i).collect(),
        }
    }
}

impl<F: PrimeField> Sub for Polynomial<F> {
    type Output = Polynomial<F>;

    fn sub(self, rhs: Self) -> Self::Output {
        &self - &rhs
    }
}

impl<F: PrimeField> Mul for &Polynomial<F> {
    type Output = Polynomial<F>;

    /// Schoolbook convolution. Only meant for small inputs and checks;
    /// the prover multiplies through the FFT.
    fn mul(self, rhs: Self) -> Self::Output {
        if self.is_empty() || rhs.is_empty() {
            return Polynomial::default();
        }
        let mut out = vec![F::zero(); self.len() + rhs.len() - 1];
        for (i, a_i) in self.coefficients.iter().enumerate() {
            for (j, b_j) in rhs.coefficients.iter().enumerate() {
                out[i + j] += *a_i * b_j;
            }
        }
        Polynomial { coefficients: out }
    }
}

impl<F: PrimeField> Mul for Polynomial<F> {
    type Output = Polynomial<F>;

    fn mul(self, rhs: Polynomial<F>) -> Self::Output {
        &self * &rhs
    }
}

impl<F: PrimeField> Mul<F> for &Polynomial<F> {
    type Output = Polynomial<F>;

    fn mul(self, rhs: F) -> Self::Output {
        Polynomial {
            coefficients: self.coefficients.iter().map(|x| *x * rhs).collect(),
        }
    }
}

impl<F: PrimeField> Sum for Polynomial<F> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.reduce(std::ops::Add::add).unwrap_or_default()
    }
}
