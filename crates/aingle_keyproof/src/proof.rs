//! Response objects
//!
//! A [`Proof`] carries the response of one [`Secret`](crate::secret::Secret).
//! Only the response is transmitted; the verifier re-binds the handle the
//! enclosing structure expects with [`Proof::set_handle`] before looking it
//! up.

use num_bigint::{BigInt, Sign};
use serde::{Deserialize, Serialize};

use crate::group::Group;
use crate::lookup::ProofLookup;
use crate::names::Handle;
use crate::secret::{random_bits, randomizer_bits};

/// Response of a single secret
///
/// Equality compares responses only, the handle is local to the verifier.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Proof {
    #[serde(skip)]
    handle: Option<Handle>,
    /// `randomizer + challenge * value`
    pub response: BigInt,
}

impl Proof {
    /// Unbound response, as received from the wire
    pub fn new(response: BigInt) -> Self {
        Self {
            handle: None,
            response,
        }
    }

    pub(crate) fn with_handle(handle: Handle, response: BigInt) -> Self {
        Self {
            handle: Some(handle),
            response,
        }
    }

    /// Simulated response with the same distribution width as a real one
    pub fn fake(group: &Group) -> Self {
        Self::new(random_bits(randomizer_bits(group)))
    }

    /// Bind this response to `handle`
    pub fn set_handle(&mut self, handle: Handle) {
        self.handle = Some(handle);
    }

    pub fn handle(&self) -> Option<Handle> {
        self.handle
    }

    pub fn response(&self) -> &BigInt {
        &self.response
    }

    /// Check the response has the width of a real response
    ///
    /// Honest responses are non-negative and have at most one bit more than
    /// the randomizer that masks them.
    pub fn verify_structure(&self, group: &Group) -> bool {
        self.response.sign() != Sign::Minus
            && self.response.bits() <= randomizer_bits(group) + 1
    }
}

impl PartialEq for Proof {
    fn eq(&self, other: &Self) -> bool {
        self.response == other.response
    }
}

impl Eq for Proof {}

impl ProofLookup for Proof {
    fn response(&self, handle: Handle) -> Option<&BigInt> {
        match self.handle {
            Some(own) if own == handle => Some(&self.response),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;

    #[test]
    fn test_fake_passes_structure() {
        let group = Group::rfc2409_1024();
        for _ in 0..4 {
            assert!(Proof::fake(&group).verify_structure(&group));
        }
    }

    #[test]
    fn test_structure_rejects_oversized() {
        let group = Group::rfc2409_1024();
        let oversized = BigInt::one() << (randomizer_bits(&group) + 1);
        assert!(!Proof::new(oversized.clone()).verify_structure(&group));
        assert!(Proof::new(oversized - BigInt::one()).verify_structure(&group));
    }

    #[test]
    fn test_structure_rejects_negative() {
        let group = Group::rfc2409_1024();
        assert!(!Proof::new(BigInt::from(-5)).verify_structure(&group));
    }

    #[test]
    fn test_lookup_requires_binding() {
        let mut proof = Proof::new(BigInt::from(42));
        assert!(ProofLookup::response(&proof, Handle::G).is_none());

        proof.set_handle(Handle::G);
        assert_eq!(ProofLookup::response(&proof, Handle::G), Some(&BigInt::from(42)));
        assert!(ProofLookup::response(&proof, Handle::H).is_none());
    }

    #[test]
    fn test_serde_drops_handle() {
        let proof = Proof::with_handle(Handle::H, BigInt::from_bytes_be(Sign::Plus, &[7; 40]));
        let json = serde_json::to_string(&proof).unwrap();
        let back: Proof = serde_json::from_str(&json).unwrap();
        assert_eq!(back, proof);
        assert_eq!(back.handle(), None);
    }
}
