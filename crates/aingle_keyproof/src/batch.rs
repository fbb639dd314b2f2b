//! Batch proving and verification of addition relations
//!
//! A credential show usually proves several relations at once. The batch
//! proves all of them under one Fiat-Shamir challenge. Every structure only
//! touches its own secrets, so commitments and responses are computed in
//! parallel with rayon; each structure writes into its own transcript slot
//! and the slots are concatenated in construction order, which keeps the
//! transcript identical on both sides.
//!
//! ## Example
//!
//! ```rust
//! use aingle_keyproof::{
//!     AdditionBatch, AdditionProofStructure, BaseMerge, BaseTable, Group, NameRegistry,
//!     PedersenCommitment, ProofParameters, ResponseTable, WitnessTable,
//! };
//! use num_bigint::BigInt;
//!
//! let group = Group::rfc2409_1024();
//! let params = ProofParameters::new(8).unwrap();
//! let mut registry = NameRegistry::new();
//!
//! let mut batch = AdditionBatch::new();
//! batch.push(AdditionProofStructure::new(&mut registry, "x", "y", "n", "s", 2, &params).unwrap());
//! batch.push(AdditionProofStructure::new(&mut registry, "s", "y", "n", "t", 2, &params).unwrap());
//!
//! let mut table = BaseTable::new();
//! let mut witnesses = WitnessTable::new();
//! for (name, value) in [("x", 4), ("y", 5), ("n", 7), ("s", 2), ("t", 0)] {
//!     let committed = registry.committed(name);
//!     let (commitment, opening) = PedersenCommitment::commit(&group, &BigInt::from(value));
//!     table.insert(committed.value, commitment.into_element());
//!     witnesses.insert_opening(committed, &opening);
//! }
//! let bases = BaseMerge::new(vec![&group, &table]);
//!
//! let proof = batch.prove(&group, &bases, &witnesses, b"show").unwrap();
//! let result = batch
//!     .verify(&group, &bases, &ResponseTable::new(), &proof, b"show")
//!     .unwrap();
//! assert!(result.all_valid);
//! ```

use std::time::Instant;

use log::debug;
use num_bigint::BigInt;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::addition::{AdditionProof, AdditionProofCommit, AdditionProofStructure};
use crate::error::{KeyproofError, Result};
use crate::group::Group;
use crate::lookup::{BaseLookup, ProofLookup, SecretLookup};
use crate::transcript::Transcript;

/// Addition relations proven under one challenge
#[derive(Debug, Clone, Default)]
pub struct AdditionBatch {
    structures: Vec<AdditionProofStructure>,
}

/// Proof for a whole batch
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchProof {
    /// Challenge the prover derived from the full transcript
    pub challenge: BigInt,
    /// One proof per structure, in construction order
    pub proofs: Vec<AdditionProof>,
}

/// Result of batch verification
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// True if every proof is well formed and the challenge matches
    pub all_valid: bool,
    /// True if the recomputed transcript hashes to the proof's challenge
    pub challenge_valid: bool,
    /// Structure check of each proof
    pub structure_results: Vec<bool>,
    /// Time taken to verify all proofs (in milliseconds)
    pub verification_time_ms: u64,
}

impl BatchResult {
    /// Get the total number of proofs checked
    pub fn total_proofs(&self) -> usize {
        self.structure_results.len()
    }

    /// Get the number of well-formed proofs
    pub fn valid_count(&self) -> usize {
        self.structure_results.iter().filter(|&&v| v).count()
    }

    /// Get the number of malformed proofs
    pub fn invalid_count(&self) -> usize {
        self.total_proofs() - self.valid_count()
    }

    /// Check if a specific proof passed its structure check
    pub fn structure_valid(&self, index: usize) -> Option<bool> {
        self.structure_results.get(index).copied()
    }
}

impl AdditionBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self {
            structures: Vec::new(),
        }
    }

    /// Add a structure; its position fixes its transcript slot
    pub fn push(&mut self, structure: AdditionProofStructure) {
        self.structures.push(structure);
    }

    pub fn structures(&self) -> &[AdditionProofStructure] {
        &self.structures
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    /// Total commitments of all structures
    pub fn num_commitments(&self) -> usize {
        self.structures.iter().map(|s| s.num_commitments()).sum()
    }

    /// Total range proofs of all structures
    pub fn num_range_proofs(&self) -> usize {
        self.structures.iter().map(|s| s.num_range_proofs()).sum()
    }

    /// Commit every structure into its own slot and concatenate the slots
    pub fn commit(
        &self,
        group: &Group,
        bases: &dyn BaseLookup,
        secrets: &dyn SecretLookup,
    ) -> Result<(Transcript, Vec<AdditionProofCommit>)> {
        let slots = self
            .structures
            .par_iter()
            .map(|structure| -> Result<_> {
                let mut slot = Transcript::with_capacity(structure.num_commitments());
                let commit =
                    structure.commitments_from_secrets(group, &mut slot, bases, secrets)?;
                Ok((slot, commit))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut transcript = Transcript::with_capacity(self.num_commitments());
        let mut commits = Vec::with_capacity(slots.len());
        for (slot, commit) in slots {
            transcript.append(slot);
            commits.push(commit);
        }
        Ok((transcript, commits))
    }

    /// Prove every relation under the challenge of the joint transcript
    pub fn prove(
        &self,
        group: &Group,
        bases: &dyn BaseLookup,
        secrets: &dyn SecretLookup,
        context: &[u8],
    ) -> Result<BatchProof> {
        let (transcript, commits) = self.commit(group, bases, secrets)?;
        let challenge = transcript.challenge(context);

        let proofs = self
            .structures
            .par_iter()
            .zip(commits.into_par_iter())
            .map(|(structure, commit)| structure.build_proof(&challenge, commit, secrets))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "batch proved: {} structures, {} commitments, transcript {}",
            self.structures.len(),
            transcript.len(),
            transcript.fingerprint()
        );
        Ok(BatchProof { challenge, proofs })
    }

    /// Verify a batch proof
    ///
    /// Structurally invalid proofs are reported in the result without
    /// recomputing any commitment. Missing bases or responses are errors.
    pub fn verify(
        &self,
        group: &Group,
        bases: &dyn BaseLookup,
        proofdata: &dyn ProofLookup,
        proof: &BatchProof,
        context: &[u8],
    ) -> Result<BatchResult> {
        let start = Instant::now();
        if proof.proofs.len() != self.structures.len() {
            return Err(KeyproofError::MalformedProof(format!(
                "expected {} proofs, got {}",
                self.structures.len(),
                proof.proofs.len()
            )));
        }

        let structure_results: Vec<bool> = self
            .structures
            .par_iter()
            .zip(proof.proofs.par_iter())
            .map(|(structure, p)| structure.verify_proof_structure(group, p))
            .collect();

        if !structure_results.iter().all(|&v| v) {
            debug!(
                "batch rejected: {} of {} proofs malformed",
                structure_results.iter().filter(|&&v| !v).count(),
                structure_results.len()
            );
            return Ok(BatchResult {
                all_valid: false,
                challenge_valid: false,
                structure_results,
                verification_time_ms: start.elapsed().as_millis() as u64,
            });
        }

        let slots = self
            .structures
            .par_iter()
            .zip(proof.proofs.par_iter())
            .map(|(structure, p)| -> Result<_> {
                let mut slot = Transcript::with_capacity(structure.num_commitments());
                structure.commitments_from_proof(
                    group,
                    &mut slot,
                    &proof.challenge,
                    bases,
                    proofdata,
                    p,
                )?;
                Ok(slot)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut transcript = Transcript::with_capacity(self.num_commitments());
        for slot in slots {
            transcript.append(slot);
        }
        let expected = transcript.challenge(context);
        let challenge_valid: bool = expected
            .to_signed_bytes_be()
            .ct_eq(&proof.challenge.to_signed_bytes_be())
            .into();

        debug!(
            "batch verified: {} structures, transcript {}, challenge valid: {}",
            self.structures.len(),
            transcript.fingerprint(),
            challenge_valid
        );
        Ok(BatchResult {
            all_valid: challenge_valid,
            challenge_valid,
            structure_results,
            verification_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}
