//! Representation proofs
//!
//! Proves knowledge of exponents `x_j` with
//!
//! ```text
//! prod_i lhs_i.base^lhs_i.power == prod_j rhs_j.base^(rhs_j.power * x_j)
//! ```
//!
//! where every left-hand base is public. The structure contributes a single
//! commitment `T = prod_j rhs_j.base^(rhs_j.power * r_j)` built from the
//! randomizers of the right-hand secrets.

use log::trace;
use num_bigint::{BigInt, BigUint};
use num_traits::One;

use crate::error::{KeyproofError, Result};
use crate::group::Group;
use crate::lookup::{BaseLookup, ProofLookup, SecretLookup};
use crate::names::Handle;
use crate::transcript::Transcript;

/// Public factor `base^power` of the left-hand side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LhsContribution {
    pub base: Handle,
    pub power: BigInt,
}

/// Hidden factor `base^(power * secret)` of the right-hand side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RhsContribution {
    pub base: Handle,
    pub secret: Handle,
    pub power: i64,
}

/// Linear relation between public bases and hidden exponents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepresentationProofStructure {
    pub lhs: Vec<LhsContribution>,
    pub rhs: Vec<RhsContribution>,
}

impl RepresentationProofStructure {
    pub fn new(lhs: Vec<LhsContribution>, rhs: Vec<RhsContribution>) -> Self {
        Self { lhs, rhs }
    }

    pub fn num_commitments(&self) -> usize {
        1
    }

    /// Append `prod_j base_j^(power_j * randomizer_j)` to `transcript`
    pub fn commitments_from_secrets(
        &self,
        group: &Group,
        transcript: &mut Transcript,
        bases: &dyn BaseLookup,
        secrets: &dyn SecretLookup,
    ) -> Result<()> {
        let commitment = self.commitment(group, bases, |handle| {
            secrets
                .randomizer(handle)
                .ok_or(KeyproofError::MissingSecret(handle))
        })?;
        transcript.push(commitment);
        Ok(())
    }

    /// Append the commitment implied by `challenge` and the responses
    pub fn commitments_from_proof(
        &self,
        group: &Group,
        transcript: &mut Transcript,
        challenge: &BigInt,
        bases: &dyn BaseLookup,
        proofdata: &dyn ProofLookup,
    ) -> Result<()> {
        let commitment = self.recompute(group, challenge, bases, |handle| {
            proofdata
                .response(handle)
                .cloned()
                .ok_or(KeyproofError::MissingResponse(handle))
        })?;
        transcript.push(commitment);
        Ok(())
    }

    /// Check the relation holds for the witnesses in `secrets`
    pub fn is_true(
        &self,
        group: &Group,
        bases: &dyn BaseLookup,
        secrets: &dyn SecretLookup,
    ) -> Result<bool> {
        let mut lhs = BigUint::one();
        for term in &self.lhs {
            lhs = group.mul(&lhs, &group.exp(base(bases, term.base)?, &term.power));
        }
        let rhs = self.commitment(group, bases, |handle| {
            secrets
                .secret(handle)
                .ok_or(KeyproofError::MissingSecret(handle))
        })?;
        Ok(lhs == rhs)
    }

    /// `prod_j base_j^(power_j * exponent(secret_j))`
    pub(crate) fn commitment<'a, F>(
        &self,
        group: &Group,
        bases: &dyn BaseLookup,
        exponent: F,
    ) -> Result<BigUint>
    where
        F: Fn(Handle) -> Result<&'a BigInt>,
    {
        let mut acc = BigUint::one();
        for term in &self.rhs {
            let e = BigInt::from(term.power) * exponent(term.secret)?;
            acc = group.mul(&acc, &group.exp(base(bases, term.base)?, &e));
        }
        Ok(acc)
    }

    /// `prod_i lhs_i^(-challenge * power_i) * prod_j base_j^(power_j * response(secret_j))`
    pub(crate) fn recompute<F>(
        &self,
        group: &Group,
        challenge: &BigInt,
        bases: &dyn BaseLookup,
        response: F,
    ) -> Result<BigUint>
    where
        F: Fn(Handle) -> Result<BigInt>,
    {
        let mut acc = BigUint::one();
        for term in &self.lhs {
            let e = -(challenge * &term.power);
            acc = group.mul(&acc, &group.exp(base(bases, term.base)?, &e));
        }
        for term in &self.rhs {
            let e = BigInt::from(term.power) * response(term.secret)?;
            acc = group.mul(&acc, &group.exp(base(bases, term.base)?, &e));
        }
        trace!(
            "representation recomputed over {} lhs and {} rhs terms",
            self.lhs.len(),
            self.rhs.len()
        );
        Ok(acc)
    }
}

fn base(bases: &dyn BaseLookup, handle: Handle) -> Result<&BigUint> {
    bases.base(handle).ok_or(KeyproofError::MissingBase(handle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::{BaseMerge, BaseTable, SecretMerge, WitnessTable};
    use crate::names::NameRegistry;
    use crate::secret::Secret;

    /// Knowledge of `x` with `y = g^x`
    fn dlog_fixture(
        group: &Group,
        registry: &mut NameRegistry,
        x: i64,
    ) -> (RepresentationProofStructure, BaseTable, Handle) {
        let y = registry.resolve("y");
        let xh = registry.resolve("x");
        let mut bases = BaseTable::new();
        bases.insert(y, group.exp(group.g(), &BigInt::from(x)));
        let structure = RepresentationProofStructure::new(
            vec![LhsContribution {
                base: y,
                power: BigInt::one(),
            }],
            vec![RhsContribution {
                base: Handle::G,
                secret: xh,
                power: 1,
            }],
        );
        (structure, bases, xh)
    }

    #[test]
    fn test_prove_and_recompute() {
        let group = Group::rfc2409_1024();
        let mut registry = NameRegistry::new();
        let (structure, table, xh) = dlog_fixture(&group, &mut registry, 1234);
        let bases = BaseMerge::new(vec![&group, &table]);

        let secret = Secret::new(&group, xh, BigInt::from(1234));
        let mut transcript = Transcript::new();
        structure
            .commitments_from_secrets(&group, &mut transcript, &bases, &secret)
            .unwrap();
        assert_eq!(transcript.len(), structure.num_commitments());

        let challenge = transcript.challenge(b"test");
        let proof = secret.build_proof(&challenge);

        let mut recomputed = Transcript::new();
        structure
            .commitments_from_proof(&group, &mut recomputed, &challenge, &bases, &proof)
            .unwrap();
        assert_eq!(transcript, recomputed);
    }

    #[test]
    fn test_negative_powers() {
        // y^2 * z^-1 == g^(2x - w) with y = g^x, z = g^w
        let group = Group::rfc2409_1024();
        let mut registry = NameRegistry::new();
        let (y, z) = (registry.resolve("y"), registry.resolve("z"));
        let (x, w) = (registry.resolve("x"), registry.resolve("w"));

        let mut table = BaseTable::new();
        table.insert(y, group.exp(group.g(), &BigInt::from(40)));
        table.insert(z, group.exp(group.g(), &BigInt::from(7)));
        let bases = BaseMerge::new(vec![&group, &table]);

        let structure = RepresentationProofStructure::new(
            vec![
                LhsContribution {
                    base: y,
                    power: BigInt::from(2),
                },
                LhsContribution {
                    base: z,
                    power: BigInt::from(-1),
                },
            ],
            vec![
                RhsContribution {
                    base: Handle::G,
                    secret: x,
                    power: 2,
                },
                RhsContribution {
                    base: Handle::G,
                    secret: w,
                    power: -1,
                },
            ],
        );

        let mut witnesses = WitnessTable::new();
        witnesses.insert(x, BigInt::from(40));
        witnesses.insert(w, BigInt::from(7));
        assert!(structure.is_true(&group, &bases, &witnesses).unwrap());

        let sx = Secret::new(&group, x, BigInt::from(40));
        let sw = Secret::new(&group, w, BigInt::from(7));
        let secrets = SecretMerge::new(vec![&sx, &sw]);

        let mut transcript = Transcript::new();
        structure
            .commitments_from_secrets(&group, &mut transcript, &bases, &secrets)
            .unwrap();
        let challenge = transcript.challenge(b"");

        let (px, pw) = (sx.build_proof(&challenge), sw.build_proof(&challenge));
        let proofs = crate::lookup::ProofMerge::new(vec![&px, &pw]);
        let mut recomputed = Transcript::new();
        structure
            .commitments_from_proof(&group, &mut recomputed, &challenge, &bases, &proofs)
            .unwrap();
        assert_eq!(transcript, recomputed);
    }

    #[test]
    fn test_false_relation() {
        let group = Group::rfc2409_1024();
        let mut registry = NameRegistry::new();
        let (structure, table, xh) = dlog_fixture(&group, &mut registry, 99);
        let bases = BaseMerge::new(vec![&group, &table]);

        let mut witnesses = WitnessTable::new();
        witnesses.insert(xh, BigInt::from(98));
        assert!(!structure.is_true(&group, &bases, &witnesses).unwrap());

        // A wrong witness yields a proof that does not reproduce the transcript
        let secret = Secret::new(&group, xh, BigInt::from(98));
        let mut transcript = Transcript::new();
        structure
            .commitments_from_secrets(&group, &mut transcript, &bases, &secret)
            .unwrap();
        let challenge = transcript.challenge(b"");
        let proof = secret.build_proof(&challenge);
        let mut recomputed = Transcript::new();
        structure
            .commitments_from_proof(&group, &mut recomputed, &challenge, &bases, &proof)
            .unwrap();
        assert_ne!(transcript, recomputed);
    }

    #[test]
    fn test_missing_entries() {
        let group = Group::rfc2409_1024();
        let mut registry = NameRegistry::new();
        let (structure, table, xh) = dlog_fixture(&group, &mut registry, 5);

        let witnesses = WitnessTable::new();
        let mut transcript = Transcript::new();
        assert_eq!(
            structure.commitments_from_secrets(&group, &mut transcript, &group, &witnesses),
            Err(KeyproofError::MissingSecret(xh))
        );

        let bases = BaseMerge::new(vec![&group, &table]);
        let unbound = crate::proof::Proof::new(BigInt::one());
        assert_eq!(
            structure.commitments_from_proof(
                &group,
                &mut transcript,
                &BigInt::one(),
                &bases,
                &unbound
            ),
            Err(KeyproofError::MissingResponse(xh))
        );

        // `y` is not a group generator
        let secret = Secret::new(&group, xh, BigInt::from(5));
        assert!(matches!(
            structure.is_true(&group, &group, &secret),
            Err(KeyproofError::MissingBase(_))
        ));
        assert!(transcript.is_empty());
    }
}
