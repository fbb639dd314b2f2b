//! Naming of bases, secrets and responses inside one proof tree
//!
//! Proof structures refer to group bases, witnesses and responses by name.
//! Names are interned once, when a structure is constructed, into copyable
//! [`Handle`]s; every later lookup goes through the handle. Child structures
//! derive their own names deterministically from the names of their
//! operands, so the same construction on the prover and verifier side yields
//! the same handles.

use std::collections::HashMap;
use std::fmt;

use crate::error::{KeyproofError, Result};

/// Separator used when deriving child names
pub const NAME_SEPARATOR: &str = "_";

/// Suffix naming the blinding factor of a committed value
pub const HIDER_SUFFIX: &str = "hider";

/// Interned name of a base, secret or response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u32);

impl Handle {
    /// Generator `g` of the group
    pub const G: Handle = Handle(0);
    /// Generator `h` of the group
    pub const H: Handle = Handle(1);

    /// Position of this handle in its registry
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handles of a Pedersen-committed value `C = g^value h^hider`
///
/// `value` names both the witness and the public commitment used as a base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Committed {
    pub value: Handle,
    pub hider: Handle,
}

/// Registry interning names into handles
#[derive(Debug, Clone)]
pub struct NameRegistry {
    names: Vec<String>,
    index: HashMap<String, Handle>,
}

impl NameRegistry {
    /// Create a registry with the group generators `g` and `h` reserved
    pub fn new() -> Self {
        let mut registry = Self {
            names: Vec::new(),
            index: HashMap::new(),
        };
        registry.insert("g");
        registry.insert("h");
        registry
    }

    /// Deterministic join of name parts
    pub fn join(parts: &[&str]) -> String {
        parts.join(NAME_SEPARATOR)
    }

    /// Get or insert a shared name
    ///
    /// Operands of a relation are usually shared with other relations of the
    /// same credential, so resolving an existing name is not an error.
    pub fn resolve(&mut self, name: &str) -> Handle {
        match self.index.get(name) {
            Some(handle) => *handle,
            None => self.insert(name),
        }
    }

    /// Insert a fresh name owned by exactly one structure
    pub fn declare(&mut self, name: &str) -> Result<Handle> {
        if self.index.contains_key(name) {
            return Err(KeyproofError::NameCollision(name.to_string()));
        }
        Ok(self.insert(name))
    }

    /// Resolve a committed value together with its `<name>_hider` blinding factor
    pub fn committed(&mut self, name: &str) -> Committed {
        let value = self.resolve(name);
        let hider = self.resolve(&Self::join(&[name, HIDER_SUFFIX]));
        Committed { value, hider }
    }

    /// Handle of an already registered name
    pub fn get(&self, name: &str) -> Option<Handle> {
        self.index.get(name).copied()
    }

    /// Name behind a handle
    pub fn name(&self, handle: Handle) -> Option<&str> {
        self.names.get(handle.index()).map(String::as_str)
    }

    /// Number of registered names
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if only the reserved generators are registered
    pub fn is_empty(&self) -> bool {
        self.names.len() <= 2
    }

    fn insert(&mut self, name: &str) -> Handle {
        let handle = Handle(self.names.len() as u32);
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), handle);
        handle
    }
}

impl Default for NameRegistry {
    fn default() -> Self {
        Self::new()
    }
}
