//! Modular addition of committed values
//!
//! Proves `result = a1 + a2 (mod m)` for four Pedersen-committed operands
//! without opening any of them. With `k = floor((result - a1 - a2) / m)` and
//! `C_x = g^x h^(x_hider)` the prover shows knowledge of `k` and a combined
//! hider such that
//!
//! ```text
//! C_result * C_a1^-1 * C_a2^-1 == C_m^k * h^hider
//! ```
//!
//! and bounds `k` to `l` bits with a range proof. Without the bound a prover
//! could pick any `k` and satisfy the identity for every `result`.
//!
//! ## Session flow
//!
//! Prover: [`AdditionProofStructure::commitments_from_secrets`], derive the
//! challenge from the transcript, then [`AdditionProofStructure::build_proof`]
//! which consumes the commit state. Verifier:
//! [`AdditionProofStructure::verify_proof_structure`], then
//! [`AdditionProofStructure::commitments_from_proof`] and compare the
//! challenge of the recomputed transcript.

use std::fmt;

use log::debug;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use zeroize::ZeroizeOnDrop;

use crate::error::{KeyproofError, Result};
use crate::group::Group;
use crate::lookup::{BaseLookup, ProofLookup, ProofMerge, SecretLookup, SecretMerge};
use crate::names::{Committed, Handle, NameRegistry, HIDER_SUFFIX};
use crate::params::ProofParameters;
use crate::proof::Proof;
use crate::range::{RangeCommit, RangeProof, RangeProofStructure};
use crate::representation::{LhsContribution, RepresentationProofStructure, RhsContribution};
use crate::secret::Secret;
use crate::transcript::Transcript;

const NAME_SUFFIX: &str = "add";
const QUOTIENT_SUFFIX: &str = "mod";

/// Proof structure for `result = a1 + a2 (mod modulus)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdditionProofStructure {
    a1: Committed,
    a2: Committed,
    modulus: Committed,
    result: Committed,
    name: String,
    mod_add: Handle,
    hider: Handle,
    representation: RepresentationProofStructure,
    range: RangeProofStructure,
}

/// Prover state between commitment and response
///
/// Wiped when dropped, which happens once the proof is built.
pub struct AdditionProofCommit {
    mod_add: Secret,
    hider: Secret,
    range_commit: RangeCommit,
}

impl ZeroizeOnDrop for AdditionProofCommit {}

impl fmt::Debug for AdditionProofCommit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdditionProofCommit")
            .field("mod_add", &self.mod_add)
            .field("hider", &self.hider)
            .field("range_commit", &self.range_commit)
            .finish()
    }
}

/// Transmitted proof of a modular addition
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct AdditionProof {
    pub mod_add_proof: Proof,
    pub hider_proof: Proof,
    pub range_proof: RangeProof,
}

impl AdditionProofStructure {
    /// Build the structure for the committed operands named `a1`, `a2`,
    /// `modulus` and `result`, bounding the quotient to `l` bits
    ///
    /// The operands are shared names; the quotient and combined hider are
    /// declared fresh under `<a1>_<a2>_<modulus>_<result>_add`, so building
    /// the same relation twice in one registry fails with
    /// [`KeyproofError::NameCollision`].
    pub fn new(
        registry: &mut NameRegistry,
        a1: &str,
        a2: &str,
        modulus: &str,
        result: &str,
        l: u32,
        params: &ProofParameters,
    ) -> Result<Self> {
        let name = NameRegistry::join(&[a1, a2, modulus, result, NAME_SUFFIX]);
        let mod_add = registry.declare(&NameRegistry::join(&[&name, QUOTIENT_SUFFIX]))?;
        let hider = registry.declare(&NameRegistry::join(&[&name, HIDER_SUFFIX]))?;

        let a1 = registry.committed(a1);
        let a2 = registry.committed(a2);
        let modulus = registry.committed(modulus);
        let result = registry.committed(result);

        let representation = RepresentationProofStructure::new(
            vec![
                LhsContribution {
                    base: result.value,
                    power: BigInt::one(),
                },
                LhsContribution {
                    base: a1.value,
                    power: BigInt::from(-1),
                },
                LhsContribution {
                    base: a2.value,
                    power: BigInt::from(-1),
                },
            ],
            vec![
                RhsContribution {
                    base: modulus.value,
                    secret: mod_add,
                    power: 1,
                },
                RhsContribution {
                    base: Handle::H,
                    secret: hider,
                    power: 1,
                },
            ],
        );
        let range = RangeProofStructure::new(
            representation.clone(),
            mod_add,
            BigInt::zero(),
            l,
            params,
        )?;

        Ok(Self {
            a1,
            a2,
            modulus,
            result,
            name,
            mod_add,
            hider,
            representation,
            range,
        })
    }

    /// Derived name of this structure
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bit bound on the quotient
    pub fn l(&self) -> u32 {
        self.range.l()
    }

    /// Handle of the hidden quotient
    pub fn mod_add_handle(&self) -> Handle {
        self.mod_add
    }

    /// Handle of the combined hider
    pub fn hider_handle(&self) -> Handle {
        self.hider
    }

    pub fn num_range_proofs(&self) -> usize {
        1
    }

    pub fn num_commitments(&self) -> usize {
        self.representation.num_commitments() + self.range.num_commitments()
    }

    /// Compute the quotient and combined hider and append all commitments
    ///
    /// The representation commitment comes first, then one commitment per
    /// range round.
    pub fn commitments_from_secrets(
        &self,
        group: &Group,
        transcript: &mut Transcript,
        bases: &dyn BaseLookup,
        secrets: &dyn SecretLookup,
    ) -> Result<AdditionProofCommit> {
        let modulus = lookup(secrets, self.modulus.value)?;
        if modulus.is_zero() {
            return Err(KeyproofError::InvalidWitness("modulus is zero".into()));
        }
        let difference = lookup(secrets, self.result.value)?
            - (lookup(secrets, self.a1.value)? + lookup(secrets, self.a2.value)?);
        let quotient = difference.div_floor(modulus);

        // The hider only needs masking, so it is reduced; the quotient is
        // bounded by the range proof instead.
        let hider = lookup(secrets, self.result.hider)?
            - (lookup(secrets, self.a1.hider)?
                + lookup(secrets, self.a2.hider)?
                + lookup(secrets, self.modulus.hider)? * &quotient);
        let hider = group.order_mod(&hider);

        let mod_add = Secret::new(group, self.mod_add, quotient);
        let hider = Secret::new(group, self.hider, hider);

        let start = transcript.len();
        let merged = SecretMerge::new(vec![&hider, &mod_add, secrets]);
        self.representation
            .commitments_from_secrets(group, transcript, bases, &merged)?;
        let range_commit = self.range.commitments_from_secrets(group, transcript, bases)?;
        debug!(
            "{}: appended {} commitments",
            self.name,
            transcript.len() - start
        );

        Ok(AdditionProofCommit {
            mod_add,
            hider,
            range_commit,
        })
    }

    /// Responses for `challenge`, consuming the commit state
    pub fn build_proof(
        &self,
        challenge: &BigInt,
        commit: AdditionProofCommit,
        secrets: &dyn SecretLookup,
    ) -> Result<AdditionProof> {
        let merged = SecretMerge::new(vec![&commit.hider, &commit.mod_add, secrets]);
        let range_proof = self
            .range
            .build_proof(challenge, &commit.range_commit, &merged)?;
        Ok(AdditionProof {
            mod_add_proof: commit.mod_add.build_proof(challenge),
            hider_proof: commit.hider.build_proof(challenge),
            range_proof,
        })
    }

    /// Simulated proof, requiring no witness
    pub fn fake_proof(&self, group: &Group) -> AdditionProof {
        AdditionProof {
            mod_add_proof: Proof::fake(group),
            hider_proof: Proof::fake(group),
            range_proof: self.range.fake_proof(group),
        }
    }

    /// Check the shape of every part of `proof`
    pub fn verify_proof_structure(&self, group: &Group, proof: &AdditionProof) -> bool {
        if !self.range.verify_proof_structure(group, &proof.range_proof) {
            debug!("{}: range proof structure rejected", self.name);
            return false;
        }
        if !proof.hider_proof.verify_structure(group) || !proof.mod_add_proof.verify_structure(group)
        {
            debug!("{}: response structure rejected", self.name);
            return false;
        }
        true
    }

    /// Append the commitments implied by `proof` and `challenge`, in the
    /// order [`Self::commitments_from_secrets`] produced them
    ///
    /// Fails with [`KeyproofError::MalformedProof`] unless `proof` passes
    /// [`Self::verify_proof_structure`].
    pub fn commitments_from_proof(
        &self,
        group: &Group,
        transcript: &mut Transcript,
        challenge: &BigInt,
        bases: &dyn BaseLookup,
        proofdata: &dyn ProofLookup,
        proof: &AdditionProof,
    ) -> Result<()> {
        if !self.verify_proof_structure(group, proof) {
            return Err(KeyproofError::MalformedProof(format!(
                "{} failed its structure check",
                self.name
            )));
        }

        let mut mod_add = proof.mod_add_proof.clone();
        mod_add.set_handle(self.mod_add);
        let mut hider = proof.hider_proof.clone();
        hider.set_handle(self.hider);
        let merged = ProofMerge::new(vec![&hider, &mod_add, proofdata]);

        self.representation
            .commitments_from_proof(group, transcript, challenge, bases, &merged)?;
        self.range
            .commitments_from_proof(group, transcript, challenge, bases, &proof.range_proof)
    }

    /// Prover-side check that the witnesses satisfy the relation and the
    /// quotient fits in `l` bits
    pub fn is_true(&self, secrets: &dyn SecretLookup) -> Result<bool> {
        let modulus = lookup(secrets, self.modulus.value)?;
        if modulus.is_zero() {
            return Ok(false);
        }
        let difference = lookup(secrets, self.result.value)?
            - (lookup(secrets, self.a1.value)? + lookup(secrets, self.a2.value)?);
        let (quotient, remainder) = difference.div_mod_floor(modulus);
        Ok(remainder.is_zero() && quotient.bits() <= u64::from(self.l()))
    }
}

fn lookup(secrets: &dyn SecretLookup, handle: Handle) -> Result<&BigInt> {
    secrets
        .secret(handle)
        .ok_or(KeyproofError::MissingSecret(handle))
}
