//! Commitment transcripts and Fiat-Shamir challenges
//!
//! A [`Transcript`] is the ordered list of commitments a proof tree emits.
//! The prover hashes it into the challenge; the verifier recomputes it from
//! the responses and hashes it again. Both sides must append in the same
//! order, which every structure fixes at construction time.

use num_bigint::{BigInt, BigUint, Sign};
use sha2::{Digest, Sha256};

const CHALLENGE_DOMAIN: &[u8] = b"aingle_keyproof_challenge_v1";

/// Ordered commitments of one proof tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    commitments: Vec<BigUint>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty transcript with room for `capacity` commitments
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commitments: Vec::with_capacity(capacity),
        }
    }

    /// Append one commitment
    pub fn push(&mut self, commitment: BigUint) {
        self.commitments.push(commitment);
    }

    /// Append every commitment of `other`, keeping its order
    pub fn append(&mut self, other: Transcript) {
        self.commitments.extend(other.commitments);
    }

    pub fn len(&self) -> usize {
        self.commitments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commitments.is_empty()
    }

    pub fn as_slice(&self) -> &[BigUint] {
        &self.commitments
    }

    pub fn into_inner(self) -> Vec<BigUint> {
        self.commitments
    }

    /// Non-negative 256-bit challenge bound to `context` and every commitment
    pub fn challenge(&self, context: &[u8]) -> BigInt {
        BigInt::from_bytes_be(Sign::Plus, &self.digest(context))
    }

    /// Short hex digest identifying this transcript in logs
    pub fn fingerprint(&self) -> String {
        hex::encode(&self.digest(b"")[..8])
    }

    fn digest(&self, context: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(CHALLENGE_DOMAIN);
        hasher.update((context.len() as u64).to_be_bytes());
        hasher.update(context);
        hasher.update((self.commitments.len() as u64).to_be_bytes());
        for commitment in &self.commitments {
            let bytes = commitment.to_bytes_be();
            hasher.update((bytes.len() as u64).to_be_bytes());
            hasher.update(&bytes);
        }
        hasher.finalize().into()
    }
}

impl From<Vec<BigUint>> for Transcript {
    fn from(commitments: Vec<BigUint>) -> Self {
        Self { commitments }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::CHALLENGE_BITS;

    #[test]
    fn test_challenge_deterministic() {
        let mut a = Transcript::new();
        a.push(BigUint::from(5u32));
        a.push(BigUint::from(9u32));
        let b = Transcript::from(vec![BigUint::from(5u32), BigUint::from(9u32)]);

        assert_eq!(a.challenge(b"ctx"), b.challenge(b"ctx"));
        assert_ne!(a.challenge(b"ctx"), a.challenge(b"other"));
        assert!(a.challenge(b"ctx").bits() <= u64::from(CHALLENGE_BITS));
        assert!(a.challenge(b"ctx").sign() != Sign::Minus);
    }

    #[test]
    fn test_order_matters() {
        let a = Transcript::from(vec![BigUint::from(1u32), BigUint::from(2u32)]);
        let b = Transcript::from(vec![BigUint::from(2u32), BigUint::from(1u32)]);
        assert_ne!(a.challenge(b""), b.challenge(b""));
    }

    #[test]
    fn test_length_prefix_separates_elements() {
        // 0x0102 as one element must not hash like 0x01, 0x02
        let a = Transcript::from(vec![BigUint::from(0x0102u32)]);
        let b = Transcript::from(vec![BigUint::from(1u32), BigUint::from(2u32)]);
        assert_ne!(a.challenge(b""), b.challenge(b""));
    }

    #[test]
    fn test_append_and_fingerprint() {
        let mut a = Transcript::with_capacity(3);
        a.push(BigUint::from(1u32));
        a.append(Transcript::from(vec![BigUint::from(2u32), BigUint::from(3u32)]));
        assert_eq!(a.len(), 3);
        assert_eq!(a.as_slice()[2], BigUint::from(3u32));
        assert_eq!(a.fingerprint().len(), 16);
        assert!(Transcript::new().is_empty());
    }
}
