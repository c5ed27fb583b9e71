//! Development trusted setup.
//!
//! Derives a matching proving/verification key pair for an [`R1CS`] from
//! toxic waste drawn on the spot. Anyone who saw the RNG output can forge
//! proofs, so this is only suitable for tests and local experiments.

use crate::circuits::{Constraint, LinearCombination, R1CS};
use crate::error::{Groth16Error, Result};
use crate::fft::RootsOfUnity;
use crate::field;
use crate::helpers::random_scalar;
use crate::keys::{ProvingKey, SparsePolynomial, VerificationKey};
use ark_ec::pairing::Pairing;
use ark_ec::{CurveGroup, PrimeGroup};
use ark_ff::PrimeField;
use ark_std::Zero;
use itertools::izip;
use log::debug;
use rand::TryRngCore;
use std::collections::BTreeMap;

struct ToxicWaste<F> {
    tau: F,
    alpha: F,
    beta: F,
    gamma: F,
    delta: F,
}

impl<F: PrimeField> ToxicWaste<F> {
    fn sample<R: TryRngCore + ?Sized>(rng: &mut R) -> Result<Self> {
        Ok(ToxicWaste {
            tau: random_scalar(rng)?,
            alpha: random_scalar(rng)?,
            beta: random_scalar(rng)?,
            gamma: random_scalar(rng)?,
            delta: random_scalar(rng)?,
        })
    }
}

/// Number of domain points needed: every constraint plus one binding row per
/// public signal and the constant wire.
pub fn domain_size<F: PrimeField>(r1cs: &R1CS<F>) -> usize {
    (r1cs.constraints.len() + r1cs.n_public + 1)
        .next_power_of_two()
        .max(2)
}

fn accumulate<F: PrimeField>(
    columns: &mut [SparsePolynomial<F>],
    var: usize,
    row: usize,
    coeff: F,
) -> Result<()> {
    let n_vars = columns.len();
    let column = columns
        .get_mut(var)
        .ok_or(Groth16Error::DimensionMismatch {
            context: "constraint variables",
            expected: n_vars,
            actual: var + 1,
        })?;
    *column.entry(row).or_insert_with(F::zero) += coeff;
    Ok(())
}

/// Transpose one side of the constraints into per-variable sparse columns.
fn columns<F: PrimeField>(
    r1cs: &R1CS<F>,
    side: impl Fn(&Constraint<F>) -> &LinearCombination<F>,
) -> Result<Vec<SparsePolynomial<F>>> {
    let mut columns = vec![BTreeMap::new(); r1cs.n_vars];
    for (row, constraint) in r1cs.constraints.iter().enumerate() {
        for (var, coeff) in side(constraint) {
            accumulate(&mut columns, *var, row, *coeff)?;
        }
    }
    Ok(columns)
}

/// `L_j(tau)` for every point `w^j` of the domain:
/// `w^j · (tau^m - 1) / (m · (tau - w^j))`.
fn lagrange_at<F: PrimeField>(domain: &[F], tau: F) -> Result<Vec<F>> {
    let m = F::from(domain.len() as u64);
    let z = field::exp_u64(tau, domain.len() as u64) - F::one();
    domain
        .iter()
        .map(|w| field::div(*w * z, m * (tau - w)))
        .collect()
}

fn at_tau<F: PrimeField>(columns: &[SparsePolynomial<F>], lagrange: &[F]) -> Vec<F> {
    columns
        .iter()
        .map(|column| column.iter().map(|(j, c)| lagrange[*j] * c).sum())
        .collect()
}

/// Run a development trusted setup for `r1cs`.
pub fn setup<E, R>(
    r1cs: &R1CS<E::ScalarField>,
    rng: &mut R,
) -> Result<(ProvingKey<E>, VerificationKey<E>)>
where
    E: Pairing,
    R: TryRngCore + ?Sized,
{
    let n_vars = r1cs.n_vars;
    let n_public = r1cs.n_public;
    let n_constraints = r1cs.constraints.len();
    let m = domain_size(r1cs);
    debug!(
        "Starting setup: {} variables, {} constraints, domain {}",
        n_vars, n_constraints, m
    );

    let mut pols_a = columns(r1cs, |constraint| &constraint.a)?;
    let pols_b = columns(r1cs, |constraint| &constraint.b)?;
    let pols_c = columns(r1cs, |constraint| &constraint.c)?;
    for i in 0..=n_public {
        accumulate(&mut pols_a, i, n_constraints + i, E::ScalarField::from(1u64))?;
    }

    let toxic = ToxicWaste::<E::ScalarField>::sample(rng)?;
    let roots = RootsOfUnity::<E::ScalarField>::new();
    let lagrange = lagrange_at(roots.roots(m.trailing_zeros() as usize)?, toxic.tau)?;
    let a_tau = at_tau(&pols_a, &lagrange);
    let b_tau = at_tau(&pols_b, &lagrange);
    let c_tau = at_tau(&pols_c, &lagrange);
    debug!("Evaluated QAP columns at tau");

    let gamma_inv = field::inv(toxic.gamma)?;
    let delta_inv = field::inv(toxic.delta)?;
    let g1 = E::G1::generator();
    let g2 = E::G2::generator();

    let mut c = Vec::with_capacity(n_vars);
    let mut ic = Vec::with_capacity(n_public + 1);
    for (i, (a, b, cc)) in izip!(&a_tau, &b_tau, &c_tau).enumerate() {
        let combined = toxic.beta * a + toxic.alpha * b + cc;
        if i <= n_public {
            ic.push(g1 * (combined * gamma_inv));
            c.push(E::G1::zero());
        } else {
            c.push(g1 * (combined * delta_inv));
        }
    }

    let z_tau = field::exp_u64(toxic.tau, m as u64) - E::ScalarField::from(1u64);
    let mut power = z_tau * delta_inv;
    let mut h_exps = Vec::with_capacity(m);
    for _ in 0..m {
        h_exps.push(g1 * power);
        power *= toxic.tau;
    }

    let g1_batch = |scalars: &[E::ScalarField]| {
        E::G1::normalize_batch(&scalars.iter().map(|s| g1 * s).collect::<Vec<_>>())
    };

    let pk = ProvingKey {
        n_vars,
        n_public,
        domain_size: m,
        a: g1_batch(&a_tau),
        b1: g1_batch(&b_tau),
        b2: E::G2::normalize_batch(&b_tau.iter().map(|s| g2 * s).collect::<Vec<_>>()),
        c: E::G1::normalize_batch(&c),
        h_exps: E::G1::normalize_batch(&h_exps),
        vk_alpha_1: (g1 * toxic.alpha).into_affine(),
        vk_beta_1: (g1 * toxic.beta).into_affine(),
        vk_delta_1: (g1 * toxic.delta).into_affine(),
        vk_beta_2: (g2 * toxic.beta).into_affine(),
        vk_delta_2: (g2 * toxic.delta).into_affine(),
        pols_a,
        pols_b,
    };
    pk.validate()?;

    let vk = VerificationKey {
        alpha_1: pk.vk_alpha_1,
        beta_2: pk.vk_beta_2,
        gamma_2: (g2 * toxic.gamma).into_affine(),
        delta_2: pk.vk_delta_2,
        ic: E::G1::normalize_batch(&ic),
    };
    debug!("Finished setup");
    Ok((pk, vk))
}
