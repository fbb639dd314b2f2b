//! Range proofs over a representation
//!
//! Proves that one hidden exponent of a [`RepresentationProofStructure`]
//! lies close to `lower`: `|x - lower| < 2^(l + S + 2)` where `S` is
//! [`STATISTICAL_SECURITY_BITS`]. The bound is on the magnitude, which is
//! what relations over a hidden-order group need to rule out wrapped
//! witnesses.
//!
//! ## Protocol
//!
//! The proof runs `range_iterations` binary-challenge rounds of the
//! representation proof. Round `i` uses bit `i` of the shared challenge:
//!
//! - Commit: sample `m` in `[0, 2^(l+S))` for the range secret and `r` in
//!   `[0, 2^(|q|+S))` for every other secret, emit
//!   `T_i = prod base^(power * m/r)`.
//! - Respond with bit `b`: `z = m + b * (x - lower)` for the range secret,
//!   `z = r + b * s` for the others.
//! - Verify: every `z` is short, and `T_i` is recomputed with challenge `b`
//!   and the range exponent `z + b * lower`.
//!
//! A prover who can answer both bits of a round knows `x - lower = z1 - z0`,
//! and the length checks bound that difference. Soundness error is
//! `2^-range_iterations`.

use std::fmt;

use log::debug;
use num_bigint::BigInt;
use num_integer::Integer;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{KeyproofError, Result};
use crate::group::Group;
use crate::lookup::{BaseLookup, SecretLookup};
use crate::names::Handle;
use crate::params::{ProofParameters, STATISTICAL_SECURITY_BITS};
use crate::representation::RepresentationProofStructure;
use crate::secret::{random_bits, wipe};
use crate::transcript::Transcript;

/// Range proof over one secret of a representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeProofStructure {
    representation: RepresentationProofStructure,
    range_secret: Handle,
    /// Distinct right-hand secrets, in order of first appearance
    columns: Vec<Handle>,
    lower: BigInt,
    l: u32,
    iterations: usize,
}

/// Round randomizers kept between commit and response
pub struct RangeCommit {
    randomizers: Vec<Vec<BigInt>>,
}

/// Responses of every round, one row per round
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RangeProof {
    pub l: u32,
    pub lower: BigInt,
    pub results: Vec<Vec<BigInt>>,
}

impl RangeProofStructure {
    /// Bound `range_secret` of `representation` to `l` bits around `lower`
    pub fn new(
        representation: RepresentationProofStructure,
        range_secret: Handle,
        lower: BigInt,
        l: u32,
        params: &ProofParameters,
    ) -> Result<Self> {
        params.validate()?;

        let mut columns: Vec<Handle> = Vec::new();
        for term in &representation.rhs {
            if !columns.contains(&term.secret) {
                columns.push(term.secret);
            }
        }
        if !columns.contains(&range_secret) {
            return Err(KeyproofError::InvalidParameters(format!(
                "range secret {} does not appear in the representation",
                range_secret
            )));
        }

        Ok(Self {
            representation,
            range_secret,
            columns,
            lower,
            l,
            iterations: params.range_iterations,
        })
    }

    pub fn l(&self) -> u32 {
        self.l
    }

    pub fn lower(&self) -> &BigInt {
        &self.lower
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn range_secret(&self) -> Handle {
        self.range_secret
    }

    /// One commitment per round
    pub fn num_commitments(&self) -> usize {
        self.iterations
    }

    /// Sample the round randomizers and append one commitment per round
    pub fn commitments_from_secrets(
        &self,
        group: &Group,
        transcript: &mut Transcript,
        bases: &dyn BaseLookup,
    ) -> Result<RangeCommit> {
        let mut randomizers = Vec::with_capacity(self.iterations);
        for _ in 0..self.iterations {
            let row: Vec<BigInt> = self
                .columns
                .iter()
                .map(|&handle| random_bits(self.randomizer_bits(group, handle)))
                .collect();
            let commitment = self
                .representation
                .commitment(group, bases, |handle| Ok(&row[self.column(handle)?]))?;
            transcript.push(commitment);
            randomizers.push(row);
        }
        debug!(
            "range commit: {} rounds over {} secrets, l = {}",
            self.iterations,
            self.columns.len(),
            self.l
        );
        Ok(RangeCommit { randomizers })
    }

    /// Respond to every round with the matching challenge bit
    pub fn build_proof(
        &self,
        challenge: &BigInt,
        commit: &RangeCommit,
        secrets: &dyn SecretLookup,
    ) -> Result<RangeProof> {
        if commit.randomizers.len() != self.iterations {
            return Err(KeyproofError::InvalidWitness(
                "range commit does not match this structure".into(),
            ));
        }

        let mut offsets = Vec::with_capacity(self.columns.len());
        for &handle in &self.columns {
            let value = secrets
                .secret(handle)
                .ok_or(KeyproofError::MissingSecret(handle))?;
            offsets.push(if handle == self.range_secret {
                value - &self.lower
            } else {
                value.clone()
            });
        }

        let results = commit
            .randomizers
            .iter()
            .enumerate()
            .map(|(round, row)| {
                if challenge_bit(challenge, round) {
                    row.iter().zip(&offsets).map(|(m, x)| m + x).collect::<Vec<_>>()
                } else {
                    row.clone()
                }
            })
            .collect();

        for offset in offsets.iter_mut() {
            wipe(offset);
        }

        Ok(RangeProof {
            l: self.l,
            lower: self.lower.clone(),
            results,
        })
    }

    /// Simulated proof with the shape of a real one
    pub fn fake_proof(&self, group: &Group) -> RangeProof {
        let results = (0..self.iterations)
            .map(|_| {
                self.columns
                    .iter()
                    .map(|&handle| random_bits(self.randomizer_bits(group, handle)))
                    .collect::<Vec<_>>()
            })
            .collect();
        RangeProof {
            l: self.l,
            lower: self.lower.clone(),
            results,
        }
    }

    /// Check round count, row width and response lengths
    pub fn verify_proof_structure(&self, group: &Group, proof: &RangeProof) -> bool {
        if proof.l != self.l || proof.lower != self.lower {
            return false;
        }
        if proof.results.len() != self.iterations {
            return false;
        }
        proof.results.iter().all(|row| {
            row.len() == self.columns.len()
                && row
                    .iter()
                    .zip(&self.columns)
                    .all(|(z, &handle)| z.bits() <= self.randomizer_bits(group, handle) + 1)
        })
    }

    /// Append the commitment of every round implied by `proof`
    pub fn commitments_from_proof(
        &self,
        group: &Group,
        transcript: &mut Transcript,
        challenge: &BigInt,
        bases: &dyn BaseLookup,
        proof: &RangeProof,
    ) -> Result<()> {
        if !self.verify_proof_structure(group, proof) {
            return Err(KeyproofError::MalformedProof(
                "range proof failed its structure check".into(),
            ));
        }

        for (round, row) in proof.results.iter().enumerate() {
            let bit = challenge_bit(challenge, round);
            let commitment = self.representation.recompute(
                group,
                &BigInt::from(u8::from(bit)),
                bases,
                |handle| {
                    let z = &row[self.column(handle)?];
                    Ok(if bit && handle == self.range_secret {
                        z + &self.lower
                    } else {
                        z.clone()
                    })
                },
            )?;
            transcript.push(commitment);
        }
        Ok(())
    }

    /// Check `|x - lower|` fits in `l` bits for the witness in `secrets`
    pub fn is_true(&self, secrets: &dyn SecretLookup) -> Result<bool> {
        let value = secrets
            .secret(self.range_secret)
            .ok_or(KeyproofError::MissingSecret(self.range_secret))?;
        Ok((value - &self.lower).bits() <= u64::from(self.l))
    }

    fn column(&self, handle: Handle) -> Result<usize> {
        self.columns
            .iter()
            .position(|&column| column == handle)
            .ok_or(KeyproofError::MissingSecret(handle))
    }

    fn randomizer_bits(&self, group: &Group, handle: Handle) -> u64 {
        let value_bits = if handle == self.range_secret {
            u64::from(self.l)
        } else {
            group.order_bits()
        };
        value_bits + u64::from(STATISTICAL_SECURITY_BITS)
    }
}

fn challenge_bit(challenge: &BigInt, round: usize) -> bool {
    (challenge.magnitude() >> round).is_odd()
}

impl fmt::Debug for RangeCommit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeCommit")
            .field("rounds", &self.randomizers.len())
            .finish_non_exhaustive()
    }
}

impl Zeroize for RangeCommit {
    fn zeroize(&mut self) {
        for value in self.randomizers.iter_mut().flatten() {
            wipe(value);
        }
    }
}

impl Drop for RangeCommit {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for RangeCommit {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::{BaseMerge, BaseTable, SecretMerge};
    use crate::names::NameRegistry;
    use crate::representation::{LhsContribution, RhsContribution};
    use crate::secret::Secret;
    use num_traits::One;

    struct Fixture {
        group: Group,
        table: BaseTable,
        structure: RangeProofStructure,
        x: Handle,
        r: Handle,
    }

    /// `C = g^x h^r` with `x` range-bounded
    fn fixture(x: i64, l: u32, iterations: usize) -> Fixture {
        let group = Group::rfc2409_1024();
        let mut registry = NameRegistry::new();
        let c = registry.committed("c");
        let commitment = group.mul(
            &group.exp(group.g(), &BigInt::from(x)),
            &group.exp(group.h(), &BigInt::from(77)),
        );
        let mut table = BaseTable::new();
        table.insert(c.value, commitment);

        let representation = RepresentationProofStructure::new(
            vec![LhsContribution {
                base: c.value,
                power: BigInt::one(),
            }],
            vec![
                RhsContribution {
                    base: Handle::G,
                    secret: c.value,
                    power: 1,
                },
                RhsContribution {
                    base: Handle::H,
                    secret: c.hider,
                    power: 1,
                },
            ],
        );
        let params = ProofParameters::new(iterations).unwrap();
        let structure =
            RangeProofStructure::new(representation, c.value, BigInt::from(0), l, &params)
                .unwrap();
        Fixture {
            group,
            table,
            structure,
            x: c.value,
            r: c.hider,
        }
    }

    fn secrets(f: &Fixture, x: i64) -> (Secret, Secret) {
        (
            Secret::new(&f.group, f.x, BigInt::from(x)),
            Secret::new(&f.group, f.r, BigInt::from(77)),
        )
    }

    #[test]
    fn test_completeness() {
        let f = fixture(200, 8, 16);
        let bases = BaseMerge::new(vec![&f.group, &f.table]);
        let (sx, sr) = secrets(&f, 200);
        let merged = SecretMerge::new(vec![&sx, &sr]);

        let mut transcript = Transcript::new();
        let commit = f
            .structure
            .commitments_from_secrets(&f.group, &mut transcript, &bases)
            .unwrap();
        assert_eq!(transcript.len(), f.structure.num_commitments());

        let challenge = transcript.challenge(b"range");
        let proof = f.structure.build_proof(&challenge, &commit, &merged).unwrap();
        assert!(f.structure.verify_proof_structure(&f.group, &proof));

        let mut recomputed = Transcript::new();
        f.structure
            .commitments_from_proof(&f.group, &mut recomputed, &challenge, &bases, &proof)
            .unwrap();
        assert_eq!(transcript, recomputed);
    }

    #[test]
    fn test_negative_value_within_magnitude() {
        let f = fixture(-2, 2, 8);
        let bases = BaseMerge::new(vec![&f.group, &f.table]);
        let (sx, sr) = secrets(&f, -2);
        let merged = SecretMerge::new(vec![&sx, &sr]);
        assert!(f.structure.is_true(&merged).unwrap());

        let mut transcript = Transcript::new();
        let commit = f
            .structure
            .commitments_from_secrets(&f.group, &mut transcript, &bases)
            .unwrap();
        // All-ones challenge exercises the shifted response of every round
        let challenge = (BigInt::one() << 256) - BigInt::one();
        let proof = f.structure.build_proof(&challenge, &commit, &merged).unwrap();

        let mut recomputed = Transcript::new();
        f.structure
            .commitments_from_proof(&f.group, &mut recomputed, &challenge, &bases, &proof)
            .unwrap();
        assert_eq!(transcript, recomputed);
    }

    #[test]
    fn test_fake_shape() {
        let f = fixture(5, 8, 12);
        let fake = f.structure.fake_proof(&f.group);
        assert!(f.structure.verify_proof_structure(&f.group, &fake));
        assert_eq!(fake.results.len(), 12);
        assert!(fake.results.iter().all(|row| row.len() == 2));
    }

    #[test]
    fn test_structure_rejects_long_response() {
        let f = fixture(5, 8, 4);
        let mut proof = f.structure.fake_proof(&f.group);
        proof.results[1][0] = BigInt::one() << (8 + STATISTICAL_SECURITY_BITS + 2);
        assert!(!f.structure.verify_proof_structure(&f.group, &proof));

        let bases = BaseMerge::new(vec![&f.group, &f.table]);
        let mut transcript = Transcript::new();
        assert!(matches!(
            f.structure.commitments_from_proof(
                &f.group,
                &mut transcript,
                &BigInt::one(),
                &bases,
                &proof
            ),
            Err(KeyproofError::MalformedProof(_))
        ));
        assert!(transcript.is_empty());
    }

    #[test]
    fn test_structure_rejects_wrong_shape() {
        let f = fixture(5, 8, 4);
        let mut short = f.structure.fake_proof(&f.group);
        short.results.pop();
        assert!(!f.structure.verify_proof_structure(&f.group, &short));

        let mut narrow = f.structure.fake_proof(&f.group);
        narrow.results[0].pop();
        assert!(!f.structure.verify_proof_structure(&f.group, &narrow));

        let mut relabeled = f.structure.fake_proof(&f.group);
        relabeled.l = 9;
        assert!(!f.structure.verify_proof_structure(&f.group, &relabeled));
    }

    #[test]
    fn test_is_true_boundary() {
        let f = fixture(255, 8, 4);
        let (sx, sr) = secrets(&f, 255);
        assert!(f.structure.is_true(&SecretMerge::new(vec![&sx, &sr])).unwrap());

        let (sx, sr) = secrets(&f, 256);
        assert!(!f.structure.is_true(&SecretMerge::new(vec![&sx, &sr])).unwrap());
    }

    #[test]
    fn test_secret_must_be_in_representation() {
        let f = fixture(1, 4, 4);
        let representation = f.structure.representation.clone();
        let result = RangeProofStructure::new(
            representation,
            Handle::G,
            BigInt::from(0),
            4,
            &ProofParameters::fast(),
        );
        assert!(matches!(result, Err(KeyproofError::InvalidParameters(_))));
    }

    #[test]
    fn test_commit_zeroize() {
        let f = fixture(1, 4, 3);
        let bases = BaseMerge::new(vec![&f.group, &f.table]);
        let mut commit = f
            .structure
            .commitments_from_secrets(&f.group, &mut Transcript::new(), &bases)
            .unwrap();
        commit.zeroize();
        assert!(commit
            .randomizers
            .iter()
            .flatten()
            .all(|value| value.bits() == 0));
        assert!(!format!("{:?}", commit).contains("randomizers"));
    }
}
