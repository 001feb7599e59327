//! Durable node state: current term and vote.
//!
//! The core never touches disk itself; it hands term/vote changes to the
//! `persist_term`/`persist_vote` hooks. [`HardState`] is the record shape
//! those hooks are expected to store, with bincode helpers so an
//! implementer does not have to pick a codec.

use serde::Deserialize;
use serde::Serialize;

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HardState {
    pub current_term: u64,
    pub voted_for: Option<u32>,
}

impl HardState {
    pub fn new(
        current_term: u64,
        voted_for: Option<u32>,
    ) -> Self {
        Self {
            current_term,
            voted_for,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}
