//! Test fixtures: a small circuit run through the development setup, and a
//! naive prover that shares none of the production MSM or FFT code.

use crate::circuits::{R1CS, product_of_four, product_of_four_witness};
use crate::error::Result;
use crate::keys::{Proof, ProvingKey, VerificationKey};
use crate::polynomial::Polynomial;
use crate::setup::setup;
use ark_bn254::{Bn254, Fr, G1Projective, G2Projective};
use ark_ec::CurveGroup;
use ark_ff::{FftField, Field};
use ark_std::{One, Zero};
use rand::SeedableRng;
use rand::TryRngCore;
use rand::rngs::StdRng;

/// Entropy source that always fails.
pub(crate) struct DeadSource;

impl TryRngCore for DeadSource {
    type Error = &'static str;

    fn try_next_u32(&mut self) -> std::result::Result<u32, Self::Error> {
        Err("entropy source closed")
    }

    fn try_next_u64(&mut self) -> std::result::Result<u64, Self::Error> {
        Err("entropy source closed")
    }

    fn try_fill_bytes(&mut self, _dst: &mut [u8]) -> std::result::Result<(), Self::Error> {
        Err("entropy source closed")
    }
}

pub(crate) struct Fixture {
    pub r1cs: R1CS<Fr>,
    pub pk: ProvingKey<Bn254>,
    pub vk: VerificationKey<Bn254>,
    pub witness: Vec<Fr>,
    pub proof: Proof<Bn254>,
    pub public_signals: Vec<Fr>,
}

/// `out = 3 · 5 · 7 · 11` proven with `r = 5`, `s = 7`.
pub(crate) fn fixture(seed: u64) -> Result<Fixture> {
    let mut rng = StdRng::seed_from_u64(seed);
    let r1cs = product_of_four()?;
    let (pk, vk) = setup(&r1cs, &mut rng)?;
    let witness = product_of_four_witness(
        Fr::from(3u64),
        Fr::from(5u64),
        Fr::from(7u64),
        Fr::from(11u64),
    );
    let (proof, public_signals) =
        reference_proof(&r1cs, &pk, &witness, Fr::from(5u64), Fr::from(7u64))?;
    Ok(Fixture {
        r1cs,
        pk,
        vk,
        witness,
        proof,
        public_signals,
    })
}

fn naive_msm<G: CurveGroup>(bases: &[G::Affine], scalars: &[G::ScalarField]) -> G {
    bases.iter().zip(scalars).map(|(b, s)| *b * s).sum()
}

/// Coefficients from evaluations on `omega^j` via the inverse DFT sum.
fn interpolate(values: &[Fr], omega: Fr) -> Polynomial<Fr> {
    let m = values.len();
    let m_inv = Fr::from(m as u64).inverse().expect("domain size is non-zero");
    let omega_inv = omega.inverse().expect("root of unity is non-zero");
    (0..m)
        .map(|k| {
            let step = omega_inv.pow([k as u64]);
            let mut x = Fr::one();
            let mut acc = Fr::zero();
            for y in values {
                acc += *y * x;
                x *= step;
            }
            acc * m_inv
        })
        .collect::<Vec<_>>()
        .into()
}

/// `(A·B - C) / Z` from the constraint rows directly, binding rows included.
pub(crate) fn reference_h(r1cs: &R1CS<Fr>, witness: &[Fr], m: usize) -> Result<Vec<Fr>> {
    let mut a_rows = vec![Fr::zero(); m];
    let mut b_rows = vec![Fr::zero(); m];
    let mut c_rows = vec![Fr::zero(); m];
    for (j, constraint) in r1cs.constraints.iter().enumerate() {
        (a_rows[j], b_rows[j], c_rows[j]) = constraint.evaluate(witness);
    }
    for i in 0..=r1cs.n_public {
        a_rows[r1cs.constraints.len() + i] = witness[i];
    }

    let omega = Fr::get_root_of_unity(m as u64).expect("domain fits the field");
    let a = interpolate(&a_rows, omega);
    let b = interpolate(&b_rows, omega);
    let c = interpolate(&c_rows, omega);
    let (h, remainder) = (&(&a * &b) - &c).div_rem(&Polynomial::vanishing(m))?;
    assert!(remainder.is_zero(), "witness does not satisfy the circuit");

    let mut h = h.into_coefficients();
    h.resize(m, Fr::zero());
    Ok(h)
}

/// Textbook Groth16 prover with caller-chosen blinding scalars.
pub(crate) fn reference_proof(
    r1cs: &R1CS<Fr>,
    pk: &ProvingKey<Bn254>,
    witness: &[Fr],
    r: Fr,
    s: Fr,
) -> Result<(Proof<Bn254>, Vec<Fr>)> {
    let h = reference_h(r1cs, witness, pk.domain_size)?;
    let private = pk.n_public + 1;
    let delta_1 = G1Projective::from(pk.vk_delta_1);

    let a = naive_msm::<G1Projective>(&pk.a, witness) + pk.vk_alpha_1 + delta_1 * r;
    let b = naive_msm::<G2Projective>(&pk.b2, witness) + pk.vk_beta_2 + pk.vk_delta_2 * s;
    let b1 = naive_msm::<G1Projective>(&pk.b1, witness) + pk.vk_beta_1 + delta_1 * s;
    let c = naive_msm::<G1Projective>(&pk.c[private..], &witness[private..])
        + naive_msm::<G1Projective>(&pk.h_exps, &h)
        + a * s
        + b1 * r
        - delta_1 * (r * s);

    let proof = Proof {
        a: a.into_affine(),
        b: b.into_affine(),
        c: c.into_affine(),
    };
    Ok((proof, witness[1..private].to_vec()))
}
