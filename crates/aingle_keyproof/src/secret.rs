//! Atomic witnesses
//!
//! A [`Secret`] wraps one witness together with the randomizer sampled for
//! its Sigma-protocol commitment. Responses are computed over the integers:
//! `response = randomizer + challenge * value`, never reduced.

use std::fmt;

use num_bigint::{BigInt, BigUint, RandBigInt, Sign};
use num_traits::Zero;
use rand::rngs::OsRng;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::group::Group;
use crate::lookup::SecretLookup;
use crate::names::Handle;
use crate::params::{CHALLENGE_BITS, STATISTICAL_SECURITY_BITS};
use crate::proof::Proof;

/// Bit length of commitment randomizers for witnesses bounded by the group order
pub(crate) fn randomizer_bits(group: &Group) -> u64 {
    group.order_bits() + u64::from(CHALLENGE_BITS) + u64::from(STATISTICAL_SECURITY_BITS)
}

/// Uniform integer in `[0, 2^bits)`
pub(crate) fn random_bits(bits: u64) -> BigInt {
    let mut rng = OsRng;
    BigInt::from(rng.gen_biguint(bits))
}

/// Overwrite the digits of `value` in place, then set it to zero
pub(crate) fn wipe(value: &mut BigInt) {
    let digits = vec![0u32; value.iter_u32_digits().len()];
    value.assign_from_slice(Sign::Plus, &digits);
    value.set_zero();
}

/// A named witness with its commitment randomizer
pub struct Secret {
    handle: Handle,
    value: BigInt,
    randomizer: BigInt,
}

impl Secret {
    /// Wrap `value` and sample a fresh randomizer wide enough to mask
    /// `challenge * value` for values below the group order
    pub fn new(group: &Group, handle: Handle, value: BigInt) -> Self {
        Self {
            handle,
            value,
            randomizer: random_bits(randomizer_bits(group)),
        }
    }

    /// Handle this secret answers to in lookups
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Blinded commitment `base^randomizer`
    pub fn commit(&self, group: &Group, base: &BigUint) -> BigUint {
        group.exp(base, &self.randomizer)
    }

    /// Response `randomizer + challenge * value` for `challenge`
    pub fn build_proof(&self, challenge: &BigInt) -> Proof {
        let response = &self.randomizer + challenge * &self.value;
        Proof::with_handle(self.handle, response)
    }
}

impl SecretLookup for Secret {
    fn secret(&self, handle: Handle) -> Option<&BigInt> {
        (handle == self.handle).then_some(&self.value)
    }

    fn randomizer(&self, handle: Handle) -> Option<&BigInt> {
        (handle == self.handle).then_some(&self.randomizer)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

impl Zeroize for Secret {
    fn zeroize(&mut self) {
        wipe(&mut self.value);
        wipe(&mut self.randomizer);
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for Secret {}
