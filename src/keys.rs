use crate::error::Groth16Error;
use ark_ec::pairing::Pairing;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use std::collections::BTreeMap;

/// Sparse column of a QAP matrix: constraint index to coefficient.
pub type SparsePolynomial<F> = BTreeMap<usize, F>;

/// Groth16 proving key, loaded once and read-only while proving.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProvingKey<E: Pairing> {
    /// Number of witness variables, the constant wire included.
    pub n_vars: usize,
    /// Number of public signals (not counting the constant wire).
    pub n_public: usize,
    /// Power of two, at least the number of constraints.
    pub domain_size: usize,
    pub a: Vec<E::G1Affine>,
    pub b1: Vec<E::G1Affine>,
    pub b2: Vec<E::G2Affine>,
    /// Only the entries past `n_public` are used.
    pub c: Vec<E::G1Affine>,
    /// `tau^i * Z(tau) / delta` in G1, one per domain point.
    pub h_exps: Vec<E::G1Affine>,
    pub vk_alpha_1: E::G1Affine,
    pub vk_beta_1: E::G1Affine,
    pub vk_delta_1: E::G1Affine,
    pub vk_beta_2: E::G2Affine,
    pub vk_delta_2: E::G2Affine,
    pub pols_a: Vec<SparsePolynomial<E::ScalarField>>,
    pub pols_b: Vec<SparsePolynomial<E::ScalarField>>,
}

fn malformed(message: String) -> Groth16Error {
    Groth16Error::MalformedKey { message }
}

impl<E: Pairing> ProvingKey<E> {
    /// Check the length invariants the prover relies on.
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.domain_size.is_power_of_two() {
            return Err(malformed(format!(
                "domain size {} is not a power of two",
                self.domain_size
            )));
        }
        if self.n_public >= self.n_vars {
            return Err(malformed(format!(
                "{} public signals but only {} variables",
                self.n_public, self.n_vars
            )));
        }

        let per_variable = [
            ("A", self.a.len()),
            ("B1", self.b1.len()),
            ("B2", self.b2.len()),
            ("C", self.c.len()),
            ("PolsA", self.pols_a.len()),
            ("PolsB", self.pols_b.len()),
        ];
        for (name, len) in per_variable {
            if len != self.n_vars {
                return Err(malformed(format!(
                    "{} has {} entries, expected {}",
                    name, len, self.n_vars
                )));
            }
        }
        if self.h_exps.len() != self.domain_size {
            return Err(malformed(format!(
                "HExps has {} entries, expected {}",
                self.h_exps.len(),
                self.domain_size
            )));
        }

        for (name, pols) in [("PolsA", &self.pols_a), ("PolsB", &self.pols_b)] {
            for (variable, column) in pols.iter().enumerate() {
                if let Some((&constraint, _)) = column.last_key_value() {
                    if constraint >= self.domain_size {
                        return Err(malformed(format!(
                            "{}[{}] references constraint {} outside domain of {}",
                            name, variable, constraint, self.domain_size
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Groth16 verification key.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct VerificationKey<E: Pairing> {
    pub alpha_1: E::G1Affine,
    pub beta_2: E::G2Affine,
    pub gamma_2: E::G2Affine,
    pub delta_2: E::G2Affine,
    /// One element per public signal plus the constant term at index 0.
    pub ic: Vec<E::G1Affine>,
}

/// A Groth16 proof.
#[derive(Clone, Copy, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Proof<E: Pairing> {
    pub a: E::G1Affine,
    pub b: E::G2Affine,
    pub c: E::G1Affine,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::fixtures::fixture;
    use ark_bn254::{Bn254, Fr, G1Affine, G2Affine};
    use ark_ec::AffineRepr;
    use ark_serialize::SerializationError;

    fn key(n_vars: usize, n_public: usize, domain_size: usize) -> ProvingKey<Bn254> {
        let g1 = G1Affine::generator();
        let g2 = G2Affine::generator();
        ProvingKey {
            n_vars,
            n_public,
            domain_size,
            a: vec![g1; n_vars],
            b1: vec![g1; n_vars],
            b2: vec![g2; n_vars],
            c: vec![g1; n_vars],
            h_exps: vec![g1; domain_size],
            vk_alpha_1: g1,
            vk_beta_1: g1,
            vk_delta_1: g1,
            vk_beta_2: g2,
            vk_delta_2: g2,
            pols_a: vec![BTreeMap::from([(0, Fr::from(1u64))]); n_vars],
            pols_b: vec![BTreeMap::new(); n_vars],
        }
    }

    #[test]
    fn well_formed_key_passes() -> Result<()> {
        key(4, 1, 8).validate()
    }

    #[test]
    fn domain_must_be_power_of_two() {
        assert!(matches!(
            key(4, 1, 6).validate(),
            Err(Groth16Error::MalformedKey { .. })
        ));
    }

    #[test]
    fn per_variable_lengths_are_checked() {
        let mut pk = key(4, 1, 8);
        pk.b2.pop();
        assert!(matches!(pk.validate(), Err(Groth16Error::MalformedKey { .. })));

        let mut pk = key(4, 1, 8);
        pk.h_exps.push(G1Affine::generator());
        assert!(matches!(pk.validate(), Err(Groth16Error::MalformedKey { .. })));
    }

    #[test]
    fn public_count_must_leave_room_for_constant() {
        assert!(key(4, 4, 8).validate().is_err());
    }

    #[test]
    fn sparse_entries_must_lie_in_domain() {
        let mut pk = key(4, 1, 8);
        pk.pols_b[2].insert(8, Fr::from(3u64));
        assert!(matches!(pk.validate(), Err(Groth16Error::MalformedKey { .. })));
    }

    #[test]
    fn proof_and_verification_key_survive_serialization()
    -> std::result::Result<(), SerializationError> {
        let f = fixture(40).expect("fixture builds");

        let mut bytes = Vec::new();
        f.proof.serialize_compressed(&mut bytes)?;
        assert_eq!(bytes.len(), f.proof.compressed_size());
        assert_eq!(Proof::<Bn254>::deserialize_compressed(bytes.as_slice())?, f.proof);

        let mut bytes = Vec::new();
        f.vk.serialize_uncompressed(&mut bytes)?;
        let vk = VerificationKey::<Bn254>::deserialize_uncompressed(bytes.as_slice())?;
        assert_eq!(vk, f.vk);
        assert_eq!(vk.ic.len(), 2);
        Ok(())
    }
}
