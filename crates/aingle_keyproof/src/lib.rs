#![doc = include_str!("../README.md")]
//! # AIngle Keyproof - Composable Sigma-protocol proofs
//!
//! Zero-knowledge proofs of arithmetic relations between committed integers,
//! for anonymous credential shows.
//!
//! ## Features
//!
//! - **Modular Addition Proofs**: Prove `result = a1 + a2 (mod m)` over four hidden operands
//! - **Representation Proofs**: Prove linear relations between hidden exponents
//! - **Range Proofs**: Bound a hidden exponent's bit length
//! - **Pedersen Commitments**: Commit to operands in a safe-prime subgroup
//! - **Batch Proving**: Many relations under one Fiat-Shamir challenge, in parallel
//! - **Simulation**: Witness-free fake proofs with the shape of real ones
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     AIngle Keyproof                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Batch  │  Addition  │  Representation  │  Range  │ Secrets │
//! └─────────────────────────────────────────────────────────────┘
//!      │          │              │               │          │
//!      ├─ Slots   ├─ Quotient    ├─ Lhs/Rhs      ├─ Rounds  ├─ Secret
//!      ├─ Rayon   ├─ Hider       └─ Transcript   └─ Bits    ├─ Proof
//!      └─ Verify  └─ Range                                  └─ Lookups
//! ```
//!
//! Every structure follows the same session shape. The prover calls
//! `commitments_from_secrets`, hashes the [`Transcript`] into a challenge and
//! calls `build_proof`. The verifier calls `verify_proof_structure`, then
//! `commitments_from_proof` with the same challenge and compares hashes.
//!
//! ## Quick Start
//!
//! ```rust
//! use aingle_keyproof::{
//!     AdditionProofStructure, BaseMerge, BaseTable, Group, NameRegistry,
//!     PedersenCommitment, ProofParameters, ResponseTable, Transcript, WitnessTable,
//! };
//! use num_bigint::BigInt;
//!
//! let group = Group::rfc2409_1024();
//! let params = ProofParameters::new(16).unwrap();
//! let mut registry = NameRegistry::new();
//!
//! // 5 + 6 = 4 (mod 7), quotient fits in 2 bits
//! let structure =
//!     AdditionProofStructure::new(&mut registry, "a", "b", "m", "r", 2, &params).unwrap();
//!
//! // 1. Commit to the operands
//! let mut table = BaseTable::new();
//! let mut witnesses = WitnessTable::new();
//! for (name, value) in [("a", 5), ("b", 6), ("m", 7), ("r", 4)] {
//!     let committed = registry.committed(name);
//!     let (commitment, opening) = PedersenCommitment::commit(&group, &BigInt::from(value));
//!     table.insert(committed.value, commitment.into_element());
//!     witnesses.insert_opening(committed, &opening);
//! }
//! let bases = BaseMerge::new(vec![&group, &table]);
//! assert!(structure.is_true(&witnesses).unwrap());
//!
//! // 2. Prove
//! let mut transcript = Transcript::new();
//! let commit = structure
//!     .commitments_from_secrets(&group, &mut transcript, &bases, &witnesses)
//!     .unwrap();
//! let challenge = transcript.challenge(b"example");
//! let proof = structure.build_proof(&challenge, commit, &witnesses).unwrap();
//!
//! // 3. Verify
//! assert!(structure.verify_proof_structure(&group, &proof));
//! let mut recomputed = Transcript::new();
//! structure
//!     .commitments_from_proof(&group, &mut recomputed, &challenge, &bases, &ResponseTable::new(), &proof)
//!     .unwrap();
//! assert_eq!(recomputed.challenge(b"example"), challenge);
//! ```
//!
//! ## Security Considerations
//!
//! ### Cryptographic Foundation
//!
//! - **Safe-prime subgroup**: Quadratic residues modulo a safe prime, 1024-bit Oakley group 2 by default
//! - **Discrete Log Problem**: `log_g h` is unknown since both bases are hashed into the group
//! - **Random Oracle Model**: SHA-256 Fiat-Shamir challenges over length-prefixed transcripts
//! - **Integer responses**: Responses are never reduced, randomizers carry 128 bits of masking slack
//!
//! ### Security Warnings
//!
//! - **Range soundness**: The range proof errs with probability `2^-range_iterations`
//! - **Side-channel attacks**: Big-integer arithmetic is NOT constant-time
//! - **Production use**: Audit before using in production systems
//!
//! ### Recommended Practices
//!
//! 1. Never log or expose openings, hiders or commit state
//! 2. Drop commit state right after building the proof; it wipes itself
//! 3. Include context/domain separation in every challenge
//! 4. Use one [`NameRegistry`] per proof tree so name collisions surface at construction

pub mod addition;
pub mod batch;
pub mod commitment;
pub mod error;
pub mod group;
pub mod lookup;
pub mod names;
pub mod params;
pub mod proof;
pub mod range;
pub mod representation;
pub mod secret;
pub mod transcript;

// Re-export main types
pub use addition::{AdditionProof, AdditionProofCommit, AdditionProofStructure};
pub use batch::{AdditionBatch, BatchProof, BatchResult};
pub use commitment::{CommitmentOpening, PedersenCommitment};
pub use error::{KeyproofError, Result};
pub use group::Group;
pub use lookup::{
    BaseLookup, BaseMerge, BaseTable, ProofLookup, ProofMerge, ResponseTable, SecretLookup,
    SecretMerge, WitnessTable,
};
pub use names::{Committed, Handle, NameRegistry};
pub use params::{ProofParameters, CHALLENGE_BITS, STATISTICAL_SECURITY_BITS};
pub use proof::Proof;
pub use range::{RangeCommit, RangeProof, RangeProofStructure};
pub use representation::{LhsContribution, RepresentationProofStructure, RhsContribution};
pub use secret::Secret;
pub use transcript::Transcript;
