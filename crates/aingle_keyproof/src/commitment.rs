//! Pedersen commitments over the proof group
//!
//! Operands of a relation are committed as `C = g^v * h^r`. The commitment is
//! the public base a structure refers to by the operand's name, the opening
//! `(v, r)` is the witness pair looked up under `name` and `name_hider`.

use std::fmt;

use num_bigint::{BigInt, BigUint, RandBigInt};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{KeyproofError, Result};
use crate::group::Group;
use crate::secret::wipe;

/// Opening information for a Pedersen commitment
pub struct CommitmentOpening {
    /// The committed value
    pub value: BigInt,
    /// The blinding factor
    pub hider: BigInt,
}

impl CommitmentOpening {
    pub fn new(value: BigInt, hider: BigInt) -> Self {
        Self { value, hider }
    }
}

impl fmt::Debug for CommitmentOpening {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommitmentOpening").finish_non_exhaustive()
    }
}

impl Zeroize for CommitmentOpening {
    fn zeroize(&mut self) {
        wipe(&mut self.value);
        wipe(&mut self.hider);
    }
}

impl Drop for CommitmentOpening {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for CommitmentOpening {}

/// Pedersen commitment
///
/// A Pedersen commitment to value `v` with blinding factor `r` is:
/// `C = g^v * h^r mod p`
///
/// Properties:
/// - **Hiding**: Given C, you cannot determine v
/// - **Binding**: Given C, you cannot find different (v', r') such that C = g^v' * h^r'
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PedersenCommitment {
    element: BigUint,
}

impl PedersenCommitment {
    /// Create a commitment to a value
    ///
    /// Returns the commitment and its opening, with a blinding factor drawn
    /// uniformly below the group order.
    pub fn commit(group: &Group, value: &BigInt) -> (Self, CommitmentOpening) {
        let mut rng = OsRng;
        let hider = BigInt::from(rng.gen_biguint_below(group.order()));
        let commitment = Self::commit_with_hider(group, value, &hider);
        (commitment, CommitmentOpening::new(value.clone(), hider))
    }

    /// Create a commitment with a specific blinding factor
    pub fn commit_with_hider(group: &Group, value: &BigInt, hider: &BigInt) -> Self {
        let element = group.mul(&group.exp(group.g(), value), &group.exp(group.h(), hider));
        Self { element }
    }

    /// Verify that this commitment opens to `opening`
    pub fn verify(&self, group: &Group, opening: &CommitmentOpening) -> bool {
        Self::commit_with_hider(group, &opening.value, &opening.hider) == *self
    }

    /// Wrap a received group element, rejecting anything outside the subgroup
    pub fn from_element(group: &Group, element: BigUint) -> Result<Self> {
        if !group.contains(&element) {
            return Err(KeyproofError::InvalidGroup(
                "commitment is not a subgroup element".into(),
            ));
        }
        Ok(Self { element })
    }

    /// The group element `C`
    pub fn element(&self) -> &BigUint {
        &self.element
    }

    pub fn into_element(self) -> BigUint {
        self.element
    }

    /// Add two commitments (homomorphic addition)
    ///
    /// If C1 = g^v1 h^r1 and C2 = g^v2 h^r2
    /// Then C1 * C2 = g^(v1+v2) h^(r1+r2)
    pub fn add(&self, group: &Group, other: &Self) -> Self {
        Self {
            element: group.mul(&self.element, &other.element),
        }
    }

    /// Subtract two commitments (homomorphic subtraction)
    pub fn sub(&self, group: &Group, other: &Self) -> Self {
        let inverse = group.exp(&other.element, &BigInt::from(-1));
        Self {
            element: group.mul(&self.element, &inverse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pedersen_commitment() {
        let group = Group::rfc2409_1024();
        let value = BigInt::from(42);
        let (commitment, opening) = PedersenCommitment::commit(&group, &value);

        // Should verify with correct value
        assert!(commitment.verify(&group, &opening));
        assert!(group.contains(commitment.element()));

        // Should not verify with wrong value
        let wrong = CommitmentOpening::new(BigInt::from(43), opening.hider.clone());
        assert!(!commitment.verify(&group, &wrong));
    }

    #[test]
    fn test_pedersen_homomorphic_addition() {
        let group = Group::rfc2409_1024();
        let (v1, v2) = (BigInt::from(100), BigInt::from(50));

        let (c1, o1) = PedersenCommitment::commit(&group, &v1);
        let (c2, o2) = PedersenCommitment::commit(&group, &v2);

        let sum = c1.add(&group, &c2);
        let opening = CommitmentOpening::new(&v1 + &v2, &o1.hider + &o2.hider);
        assert!(sum.verify(&group, &opening));

        let diff = sum.sub(&group, &c2);
        assert_eq!(diff, c1);
    }

    #[test]
    fn test_negative_value() {
        let group = Group::rfc2409_1024();
        let (commitment, opening) = PedersenCommitment::commit(&group, &BigInt::from(-9));
        assert!(commitment.verify(&group, &opening));
    }

    #[test]
    fn test_from_element() {
        let group = Group::rfc2409_1024();
        let (commitment, _) = PedersenCommitment::commit(&group, &BigInt::from(1));
        let element = commitment.element().clone();
        assert_eq!(
            PedersenCommitment::from_element(&group, element).unwrap(),
            commitment
        );
        assert!(PedersenCommitment::from_element(&group, BigUint::from(0u32)).is_err());
    }

    #[test]
    fn test_commitment_serialization() {
        let group = Group::rfc2409_1024();
        let (commitment, opening) = PedersenCommitment::commit(&group, &BigInt::from(42));

        let json = serde_json::to_string(&commitment).unwrap();
        let deserialized: PedersenCommitment = serde_json::from_str(&json).unwrap();

        assert_eq!(commitment, deserialized);
        assert!(deserialized.verify(&group, &opening));
        assert!(!format!("{:?}", opening).contains("42"));
    }
}
