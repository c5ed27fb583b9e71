use crate::error::{Groth16Error, Result};
use ark_ff::PrimeField;

/// Sparse linear combination over witness variables: `Σ coeff · w[var]`.
pub type LinearCombination<F> = Vec<(usize, F)>;

fn evaluate<F: PrimeField>(lc: &[(usize, F)], witness: &[F]) -> F {
    lc.iter().map(|(var, coeff)| witness[*var] * coeff).sum()
}

/// One constraint `<a, w> · <b, w> = <c, w>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constraint<F: PrimeField> {
    pub a: LinearCombination<F>,
    pub b: LinearCombination<F>,
    pub c: LinearCombination<F>,
}

impl<F: PrimeField> Constraint<F> {
    /// `(<a, w>, <b, w>, <c, w>)`.
    pub fn evaluate(&self, witness: &[F]) -> (F, F, F) {
        (
            evaluate(&self.a, witness),
            evaluate(&self.b, witness),
            evaluate(&self.c, witness),
        )
    }
}

/// Rank 1 Constraint System.
///
/// Witness layout: `w[0] = 1`, then the `n_public` public signals, then the
/// private variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct R1CS<F: PrimeField> {
    pub n_vars: usize,
    pub n_public: usize,
    pub constraints: Vec<Constraint<F>>,
}

impl<F: PrimeField> R1CS<F> {
    pub fn new(n_vars: usize, n_public: usize) -> Self {
        R1CS {
            n_vars,
            n_public,
            constraints: Vec::new(),
        }
    }

    /// Append a constraint, rejecting variables outside the system.
    pub fn enforce(
        &mut self,
        a: LinearCombination<F>,
        b: LinearCombination<F>,
        c: LinearCombination<F>,
    ) -> Result<()> {
        let highest = a.iter().chain(&b).chain(&c).map(|(var, _)| *var).max();
        if let Some(var) = highest {
            if var >= self.n_vars {
                return Err(Groth16Error::DimensionMismatch {
                    context: "constraint variables",
                    expected: self.n_vars,
                    actual: var + 1,
                });
            }
        }
        self.constraints.push(Constraint { a, b, c });
        Ok(())
    }

    pub fn is_satisfied(&self, witness: &[F]) -> Result<bool> {
        if witness.len() != self.n_vars {
            return Err(Groth16Error::DimensionMismatch {
                context: "witness",
                expected: self.n_vars,
                actual: witness.len(),
            });
        }
        Ok(self.constraints.iter().all(|constraint| {
            let (a, b, c) = constraint.evaluate(witness);
            a * b == c
        }))
    }
}

/// `out = x · y · z · u` with `out` public.
///
/// Variables: `[1, out, x, y, z, u, xy, xyz]`.
pub fn product_of_four<F: PrimeField>() -> Result<R1CS<F>> {
    let one = F::one();
    let mut r1cs = R1CS::new(8, 1);
    r1cs.enforce(vec![(2, one)], vec![(3, one)], vec![(6, one)])?;
    r1cs.enforce(vec![(6, one)], vec![(4, one)], vec![(7, one)])?;
    r1cs.enforce(vec![(7, one)], vec![(5, one)], vec![(1, one)])?;
    Ok(r1cs)
}

/// Witness for [`product_of_four`].
pub fn product_of_four_witness<F: PrimeField>(x: F, y: F, z: F, u: F) -> Vec<F> {
    let xy = x * y;
    let xyz = xy * z;
    vec![F::one(), xyz * u, x, y, z, u, xy, xyz]
}
