use crate::keys::{Proof, VerificationKey};
use ark_ec::AffineRepr;
use ark_ec::CurveGroup;
use ark_ec::pairing::Pairing;
use ark_ff::PrimeField;
use ark_std::Zero;
use log::debug;
use thiserror::Error;

/// Why a proof was not accepted.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The key's IC vector does not have one entry per input plus one.
    #[error("expected {expected} public inputs, got {actual}")]
    InputCountMismatch { expected: usize, actual: usize },

    /// A public input is not below the scalar field modulus.
    #[error("public input {index} is not a canonical field element")]
    InputOutOfField { index: usize },

    #[error("pairing check failed")]
    PairingCheckFailed,
}

/// Check `proof` against `vk` and the public inputs, reporting the first
/// reason for rejection.
///
/// Accepts iff `e(-A, B) · e(alpha, beta) · e(vk_x, gamma) · e(C, delta) = 1`
/// where `vk_x = IC[0] + Σ inputs[i] · IC[i + 1]`.
pub fn verify_with_reason<E: Pairing>(
    vk: &VerificationKey<E>,
    proof: &Proof<E>,
    inputs: &[<E::ScalarField as PrimeField>::BigInt],
) -> Result<(), Rejection> {
    if inputs.len() + 1 != vk.ic.len() {
        debug!(
            "Rejecting proof: {} inputs for {} IC entries",
            inputs.len(),
            vk.ic.len()
        );
        return Err(Rejection::InputCountMismatch {
            expected: vk.ic.len().saturating_sub(1),
            actual: inputs.len(),
        });
    }

    let scalars = inputs
        .iter()
        .enumerate()
        .map(|(index, x)| {
            E::ScalarField::from_bigint(*x).ok_or(Rejection::InputOutOfField { index })
        })
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(|e| debug!("Rejecting proof: {}", e))?;

    let vk_x = scalars
        .iter()
        .zip(&vk.ic[1..])
        .fold(vk.ic[0].into_group(), |acc, (s, ic)| acc + *ic * s);

    let neg_a = (-proof.a.into_group()).into_affine();
    let miller = E::multi_miller_loop(
        [neg_a, vk.alpha_1, vk_x.into_affine(), proof.c],
        [proof.b, vk.beta_2, vk.gamma_2, vk.delta_2],
    );
    match E::final_exponentiation(miller) {
        Some(product) if product.is_zero() => Ok(()),
        _ => Err(Rejection::PairingCheckFailed),
    }
}

/// Groth16 verification. Any malformed input yields `false`.
pub fn verify<E: Pairing>(
    vk: &VerificationKey<E>,
    proof: &Proof<E>,
    inputs: &[<E::ScalarField as PrimeField>::BigInt],
) -> bool {
    verify_with_reason(vk, proof, inputs).is_ok()
}

impl<E: Pairing> Proof<E> {
    /// Verify against public signals already reduced into the field.
    pub fn verify(&self, vk: &VerificationKey<E>, public_signals: &[E::ScalarField]) -> bool {
        debug!("Verifying with {} public signals", public_signals.len());
        let inputs: Vec<_> = public_signals.iter().map(|s| s.into_bigint()).collect();
        verify(vk, self, &inputs)
    }
}
