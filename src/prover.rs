use crate::config::ProverConfig;
use crate::error::{Groth16Error, Result};
use crate::fft::RootsOfUnity;
use crate::helpers::random_scalar;
use crate::keys::{Proof, ProvingKey};
use crate::msm::scalar_mult_parallel;
use crate::qap;
use ark_ec::pairing::Pairing;
use ark_ec::{AffineRepr, CurveGroup};
use log::debug;
use rand::TryRngCore;
use rand::rngs::OsRng;

/// Groth16 prover.
///
/// Owns the roots-of-unity tables, so reusing one `Prover` across proofs
/// over the same domain builds each table once.
pub struct Prover<E: Pairing> {
    config: ProverConfig,
    roots: RootsOfUnity<E::ScalarField>,
}

impl<E: Pairing> Default for Prover<E> {
    fn default() -> Self {
        Prover {
            config: ProverConfig::default(),
            roots: RootsOfUnity::new(),
        }
    }
}

impl<E: Pairing> Prover<E> {
    pub fn new(config: ProverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Prover {
            config,
            roots: RootsOfUnity::new(),
        })
    }

    pub fn config(&self) -> &ProverConfig {
        &self.config
    }

    pub fn roots(&self) -> &RootsOfUnity<E::ScalarField> {
        &self.roots
    }

    /// Prove knowledge of `witness` for the circuit behind `pk`, blinding with
    /// the operating system's entropy source.
    ///
    /// Returns the proof and the public signals `witness[1..=n_public]`.
    pub fn generate_proof(
        &self,
        pk: &ProvingKey<E>,
        witness: &[E::ScalarField],
    ) -> Result<(Proof<E>, Vec<E::ScalarField>)> {
        self.generate_proof_with_rng(pk, witness, &mut OsRng)
    }

    /// [`Self::generate_proof`] drawing `r` and `s` from `rng`.
    pub fn generate_proof_with_rng<R: TryRngCore + ?Sized>(
        &self,
        pk: &ProvingKey<E>,
        witness: &[E::ScalarField],
        rng: &mut R,
    ) -> Result<(Proof<E>, Vec<E::ScalarField>)> {
        pk.validate()?;
        if witness.len() != pk.n_vars {
            return Err(Groth16Error::DimensionMismatch {
                context: "witness",
                expected: pk.n_vars,
                actual: witness.len(),
            });
        }

        let r: E::ScalarField = random_scalar(rng)?;
        let s: E::ScalarField = random_scalar(rng)?;

        let gsize = self.config.gsize;
        let workers = self.config.workers;
        let private = pk.n_public + 1;
        debug!(
            "Generating proof: {} variables, domain {}, gsize {}, {} workers",
            pk.n_vars, pk.domain_size, gsize, workers
        );

        let (((pi_a, pi_b1), (pi_b, pi_c)), h) = rayon::join(
            || {
                rayon::join(
                    || {
                        rayon::join(
                            || scalar_mult_parallel::<E::G1>(&pk.a, witness, gsize, workers),
                            || scalar_mult_parallel::<E::G1>(&pk.b1, witness, gsize, workers),
                        )
                    },
                    || {
                        rayon::join(
                            || scalar_mult_parallel::<E::G2>(&pk.b2, witness, gsize, workers),
                            || {
                                scalar_mult_parallel::<E::G1>(
                                    &pk.c[private..],
                                    &witness[private..],
                                    gsize,
                                    workers,
                                )
                            },
                        )
                    },
                )
            },
            || qap::h_coefficients(pk, witness, &self.roots),
        );
        debug!("Witness MSMs and QAP reduction done");

        let pi_h = scalar_mult_parallel::<E::G1>(&pk.h_exps, &h?, gsize, workers)?;

        let delta_1 = pk.vk_delta_1.into_group();
        let pi_a = pi_a? + pk.vk_alpha_1 + delta_1 * r;
        let pi_b = pi_b? + pk.vk_beta_2 + pk.vk_delta_2 * s;
        let pi_b1 = pi_b1? + pk.vk_beta_1 + delta_1 * s;
        let pi_c = pi_c? + pi_h + pi_a * s + pi_b1 * r - delta_1 * (r * s);

        let proof = Proof {
            a: pi_a.into_affine(),
            b: pi_b.into_affine(),
            c: pi_c.into_affine(),
        };
        debug!("Proof generated");
        Ok((proof, witness[1..private].to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{DeadSource, fixture, reference_h, reference_proof};
    use crate::verifier::verify;
    use ark_bn254::{Bn254, Fr, G1Affine, G2Affine};
    use ark_ff::{PrimeField, Zero};
    use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, Compress, Validate};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn seeded_blinding(seed: u64) -> Result<(Fr, Fr)> {
        let mut rng = StdRng::seed_from_u64(seed);
        Ok((random_scalar(&mut rng)?, random_scalar(&mut rng)?))
    }

    #[test]
    fn proof_verifies() -> Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();
        let f = fixture(21)?;
        let prover = Prover::<Bn254>::default();
        let (proof, public_signals) = prover.generate_proof(&f.pk, &f.witness)?;

        assert_eq!(public_signals, f.public_signals);
        assert!(proof.verify(&f.vk, &public_signals));
        assert!(f.proof.verify(&f.vk, &f.public_signals));
        Ok(())
    }

    #[test]
    fn matches_reference_prover_for_same_blinding() -> Result<()> {
        let f = fixture(22)?;
        let (r, s) = seeded_blinding(99)?;
        let (expected, _) = reference_proof(&f.r1cs, &f.pk, &f.witness, r, s)?;

        let prover = Prover::<Bn254>::new(ProverConfig { gsize: 3, workers: 2 })?;
        let (proof, _) =
            prover.generate_proof_with_rng(&f.pk, &f.witness, &mut StdRng::seed_from_u64(99))?;
        assert_eq!(proof, expected);
        Ok(())
    }

    #[test]
    fn quotient_matches_reference() -> Result<()> {
        let f = fixture(23)?;
        let prover = Prover::<Bn254>::default();
        let h = qap::calculate_h(&f.pk, &f.witness, prover.roots())?;
        assert_eq!(h, reference_h(&f.r1cs, &f.witness, f.pk.domain_size)?);
        Ok(())
    }

    #[test]
    fn window_and_worker_choices_do_not_change_the_proof() -> Result<()> {
        let f = fixture(24)?;
        let mut proofs = Vec::new();
        for (gsize, workers) in [(1, 1), (2, 3), (5, 1), (8, 4), (12, 8)] {
            let prover = Prover::<Bn254>::new(ProverConfig { gsize, workers })?;
            let (proof, _) =
                prover.generate_proof_with_rng(&f.pk, &f.witness, &mut StdRng::seed_from_u64(7))?;
            proofs.push(proof);
        }
        assert!(proofs.windows(2).all(|p| p[0] == p[1]));
        Ok(())
    }

    #[test]
    fn fresh_blinding_gives_distinct_valid_proofs() -> Result<()> {
        let f = fixture(25)?;
        let prover = Prover::<Bn254>::default();
        let (first, signals) = prover.generate_proof(&f.pk, &f.witness)?;
        let (second, _) = prover.generate_proof(&f.pk, &f.witness)?;
        assert_ne!(first, second);
        assert!(first.verify(&f.vk, &signals));
        assert!(second.verify(&f.vk, &signals));
        // 2m = 16 points
        assert!(prover.roots().is_cached(4));
        Ok(())
    }

    #[test]
    fn unsatisfied_witness_does_not_verify() -> Result<()> {
        let f = fixture(26)?;
        let mut witness = f.witness.clone();
        witness[1] += Fr::from(1u64);
        assert!(!f.r1cs.is_satisfied(&witness)?);

        let prover = Prover::<Bn254>::default();
        let (proof, signals) = prover.generate_proof(&f.pk, &witness)?;
        assert!(!proof.verify(&f.vk, &signals));
        assert!(!proof.verify(&f.vk, &f.public_signals));
        Ok(())
    }

    #[test]
    fn randomness_failure_is_reported() -> Result<()> {
        let f = fixture(27)?;
        let prover = Prover::<Bn254>::default();
        assert!(matches!(
            prover.generate_proof_with_rng(&f.pk, &f.witness, &mut DeadSource),
            Err(Groth16Error::RandomnessFailure { .. })
        ));
        Ok(())
    }

    #[test]
    fn witness_length_must_match_key() -> Result<()> {
        let f = fixture(28)?;
        let prover = Prover::<Bn254>::default();
        let mut witness = f.witness.clone();
        witness.push(Fr::zero());
        assert_eq!(
            prover.generate_proof(&f.pk, &witness),
            Err(Groth16Error::DimensionMismatch {
                context: "witness",
                expected: 8,
                actual: 9
            })
        );
        Ok(())
    }

    #[test]
    fn malformed_key_is_rejected_before_proving() -> Result<()> {
        let f = fixture(29)?;
        let prover = Prover::<Bn254>::default();
        let mut pk = f.pk.clone();
        pk.h_exps.pop();
        assert!(matches!(
            prover.generate_proof_with_rng(&pk, &f.witness, &mut DeadSource),
            Err(Groth16Error::MalformedKey { .. })
        ));
        Ok(())
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(Prover::<Bn254>::new(ProverConfig { gsize: 0, workers: 1 }).is_err());
        assert!(Prover::<Bn254>::new(ProverConfig { gsize: 6, workers: 0 }).is_err());
    }

    /// Flip one byte of a serialized point; an unparsable result counts as
    /// a rejection.
    fn flipped<T: CanonicalSerialize + CanonicalDeserialize>(point: &T, byte: usize) -> Option<T> {
        let mut bytes = Vec::new();
        point
            .serialize_with_mode(&mut bytes, Compress::No)
            .expect("serialize into Vec");
        bytes[byte] ^= 0x01;
        T::deserialize_with_mode(bytes.as_slice(), Compress::No, Validate::No).ok()
    }

    #[test]
    fn tampered_proof_is_rejected() -> Result<()> {
        let f = fixture(30)?;
        let prover = Prover::<Bn254>::default();
        let (proof, signals) = prover.generate_proof(&f.pk, &f.witness)?;
        let inputs: Vec<_> = signals.iter().map(|s| s.into_bigint()).collect();
        assert!(verify(&f.vk, &proof, &inputs));

        for byte in 0..proof.a.uncompressed_size() {
            if let Some(a) = flipped::<G1Affine>(&proof.a, byte) {
                assert!(!verify(&f.vk, &Proof { a, ..proof }, &inputs));
            }
            if let Some(c) = flipped::<G1Affine>(&proof.c, byte) {
                assert!(!verify(&f.vk, &Proof { c, ..proof }, &inputs));
            }
        }
        for byte in 0..proof.b.uncompressed_size() {
            if let Some(b) = flipped::<G2Affine>(&proof.b, byte) {
                assert!(!verify(&f.vk, &Proof { b, ..proof }, &inputs));
            }
        }
        Ok(())
    }
}
