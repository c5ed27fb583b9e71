//! # WARNING
//! This library has not been audited for security, and the development trusted setup in `setup`
//! is insecure by construction. Don't use it to protect anything of value!
//!# Groth16
//!
//!This crate provides a Groth16 prover and verifier for circuits given as a proving key (circuit-specific group
//!elements plus the sparse QAP matrices) and a full witness.
//!
//!The implementation is type generic over any curve that implements `ark_ec::pairing::Pairing`, and is tested with
//!BN254, which is re-exported as [`Bn254`] together with its scalar field [`Fr`].
//!
//!Errors are reported through [`Groth16Error`]. Verification never errors: malformed input simply fails to verify,
//!and [`verifier::verify_with_reason`] says why.
//!
//!The core types are `keys::ProvingKey`, `keys::VerificationKey`, `keys::Proof` and `prover::Prover`.
//!
//!The general flow is:
//!
//!- Obtain a proving key and verification key (or derive a pair from a `circuits::R1CS` with `setup::setup`)
//!- Create a `Prover`, optionally from a `ProverConfig` (MSM window size and worker count)
//!- Generate a proof and the public signals with `prover.generate_proof(&pk, &witness)`
//!- Verify with `proof.verify(&vk, &public_signals)`
//!
//!Proof generation forks its multi-scalar multiplications and FFTs onto the `rayon` thread pool. Progress is
//!reported through the `log` facade.

/// Rank 1 Constraint Systems and a sample circuit.
pub mod circuits;
/// Prover configuration.
pub mod config;
pub mod error;
pub mod fft;
pub mod field;
pub mod helpers;
/// Proving key, verification key and proof types.
pub mod keys;
pub mod msm;
/// Dense univariate polynomials.
pub mod polynomial;
/// Proof generation.
pub mod prover;
pub mod qap;
pub mod setup;
/// Proof verification.
pub mod verifier;

#[cfg(test)]
mod fixtures;

pub use ark_bn254::{Bn254, Fr};
pub use config::ProverConfig;
pub use error::{Groth16Error, Result};
pub use keys::{Proof, ProvingKey, VerificationKey};
pub use prover::Prover;
pub use verifier::{Rejection, verify};
