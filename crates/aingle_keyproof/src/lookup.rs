//! Handle-keyed lookups for bases, witnesses and responses
//!
//! Structures never own the values they prove things about. The prover
//! passes a [`SecretLookup`], the verifier a [`ProofLookup`], and both pass a
//! [`BaseLookup`] for the public group elements. Nested structures extend
//! the lookup they were given with their own fresh values through the merge
//! types, which consult their parts in order.

use std::collections::HashMap;

use num_bigint::{BigInt, BigUint};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::commitment::CommitmentOpening;
use crate::names::{Committed, Handle};
use crate::secret::wipe;

/// Public group elements by handle
pub trait BaseLookup: Sync {
    /// Base element for `handle`
    fn base(&self, handle: Handle) -> Option<&BigUint>;
}

/// Prover-side witnesses by handle
pub trait SecretLookup: Sync {
    /// Witness value for `handle`
    fn secret(&self, handle: Handle) -> Option<&BigInt>;

    /// Commitment randomizer for `handle`, if this lookup generated one
    fn randomizer(&self, handle: Handle) -> Option<&BigInt>;
}

/// Verifier-side responses by handle
pub trait ProofLookup: Sync {
    /// Response for `handle`
    fn response(&self, handle: Handle) -> Option<&BigInt>;
}

/// Ordered composition of base lookups
pub struct BaseMerge<'a> {
    parts: Vec<&'a dyn BaseLookup>,
}

impl<'a> BaseMerge<'a> {
    pub fn new(parts: Vec<&'a dyn BaseLookup>) -> Self {
        Self { parts }
    }
}

impl BaseLookup for BaseMerge<'_> {
    fn base(&self, handle: Handle) -> Option<&BigUint> {
        self.parts.iter().find_map(|part| part.base(handle))
    }
}

/// Ordered composition of secret lookups
pub struct SecretMerge<'a> {
    parts: Vec<&'a dyn SecretLookup>,
}

impl<'a> SecretMerge<'a> {
    pub fn new(parts: Vec<&'a dyn SecretLookup>) -> Self {
        Self { parts }
    }
}

impl SecretLookup for SecretMerge<'_> {
    fn secret(&self, handle: Handle) -> Option<&BigInt> {
        self.parts.iter().find_map(|part| part.secret(handle))
    }

    fn randomizer(&self, handle: Handle) -> Option<&BigInt> {
        self.parts.iter().find_map(|part| part.randomizer(handle))
    }
}

/// Ordered composition of proof lookups
pub struct ProofMerge<'a> {
    parts: Vec<&'a dyn ProofLookup>,
}

impl<'a> ProofMerge<'a> {
    pub fn new(parts: Vec<&'a dyn ProofLookup>) -> Self {
        Self { parts }
    }
}

impl ProofLookup for ProofMerge<'_> {
    fn response(&self, handle: Handle) -> Option<&BigInt> {
        self.parts.iter().find_map(|part| part.response(handle))
    }
}

/// Public commitments and other bases supplied by the caller
#[derive(Debug, Clone, Default)]
pub struct BaseTable {
    entries: HashMap<Handle, BigUint>,
}

impl BaseTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the group element for `handle`
    pub fn insert(&mut self, handle: Handle, element: BigUint) {
        self.entries.insert(handle, element);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl BaseLookup for BaseTable {
    fn base(&self, handle: Handle) -> Option<&BigUint> {
        self.entries.get(&handle)
    }
}

/// Witnesses of committed operands
///
/// Holds both the value and the blinding factor of each committed operand.
/// Entries are wiped when the table is dropped.
#[derive(Default)]
pub struct WitnessTable {
    entries: HashMap<Handle, BigInt>,
}

impl WitnessTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the opening `(value, hider)` of a committed operand
    pub fn insert_committed(&mut self, committed: Committed, value: BigInt, hider: BigInt) {
        self.insert(committed.value, value);
        self.insert(committed.hider, hider);
    }

    /// Register the opening of a Pedersen commitment to a committed operand
    pub fn insert_opening(&mut self, committed: Committed, opening: &CommitmentOpening) {
        self.insert_committed(committed, opening.value.clone(), opening.hider.clone());
    }

    /// Register a plain witness
    pub fn insert(&mut self, handle: Handle, value: BigInt) {
        if let Some(mut previous) = self.entries.insert(handle, value) {
            wipe(&mut previous);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SecretLookup for WitnessTable {
    fn secret(&self, handle: Handle) -> Option<&BigInt> {
        self.entries.get(&handle)
    }

    fn randomizer(&self, _handle: Handle) -> Option<&BigInt> {
        None
    }
}

impl Zeroize for WitnessTable {
    fn zeroize(&mut self) {
        for value in self.entries.values_mut() {
            wipe(value);
        }
    }
}

impl Drop for WitnessTable {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for WitnessTable {}

/// Responses of secrets proven outside the structure being verified
#[derive(Debug, Clone, Default)]
pub struct ResponseTable {
    entries: HashMap<Handle, BigInt>,
}

impl ResponseTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, handle: Handle, response: BigInt) {
        self.entries.insert(handle, response);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ProofLookup for ResponseTable {
    fn response(&self, handle: Handle) -> Option<&BigInt> {
        self.entries.get(&handle)
    }
}
