//! Protocol constants and proof parameters

use serde::{Deserialize, Serialize};

use crate::error::{KeyproofError, Result};

/// Bit length of a Fiat-Shamir challenge (SHA-256 output)
pub const CHALLENGE_BITS: u32 = 256;

/// Statistical masking slack for randomizers and range responses
pub const STATISTICAL_SECURITY_BITS: u32 = 128;

/// Tunable parameters shared by all structures of one proof tree
///
/// Prover and verifier must agree on these, they change the number of
/// transcript commitments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProofParameters {
    /// Rounds of the binary-challenge range proof. Soundness error is
    /// `2^-range_iterations`; each round consumes one challenge bit.
    pub range_iterations: usize,
}

impl ProofParameters {
    /// Create parameters with a specific number of range proof rounds
    pub fn new(range_iterations: usize) -> Result<Self> {
        let params = Self { range_iterations };
        params.validate()?;
        Ok(params)
    }

    /// Quicker proofs with 40-bit range soundness
    pub fn fast() -> Self {
        Self {
            range_iterations: 40,
        }
    }

    /// One range round per challenge bit
    pub fn high_assurance() -> Self {
        Self {
            range_iterations: CHALLENGE_BITS as usize,
        }
    }

    /// Check the parameters are usable with a `CHALLENGE_BITS` challenge
    pub fn validate(&self) -> Result<()> {
        if self.range_iterations == 0 || self.range_iterations > CHALLENGE_BITS as usize {
            return Err(KeyproofError::InvalidParameters(format!(
                "range_iterations must be in [1, {}], got {}",
                CHALLENGE_BITS, self.range_iterations
            )));
        }
        Ok(())
    }

    /// Load and validate parameters from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }
}

impl Default for ProofParameters {
    fn default() -> Self {
        Self {
            range_iterations: 128,
        }
    }
}
