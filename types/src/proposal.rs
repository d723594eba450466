//! Governance proposals as seen by the client.
//!
//! The contract is the only authority over a proposal's tallies and its
//! executed flag. The client mirrors them read-only and refreshes the whole
//! set on every sync.

use ethereum_types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TypesError;

/// A 1-based sequential proposal id, as assigned by the contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct ProposalId(u64);

impl ProposalId {
    pub const FIRST: Self = Self(1);

    /// Create a proposal id. Zero is rejected because contract ids start at 1.
    pub fn new(id: u64) -> Result<Self, TypesError> {
        if id == 0 {
            return Err(TypesError::ZeroProposalId);
        }
        Ok(Self(id))
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// Lazily yield the ids `1..=count` in ascending order.
    pub fn sequence(count: u64) -> impl Iterator<Item = ProposalId> {
        (1..=count).map(ProposalId)
    }
}

impl TryFrom<u64> for ProposalId {
    type Error = TypesError;

    fn try_from(id: u64) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<ProposalId> for u64 {
    fn from(id: ProposalId) -> Self {
        id.0
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Share of the votes a proposal holds, in whole percent (0..=100).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u8")]
pub struct VotePercentage(u8);

impl VotePercentage {
    pub const MAX: u8 = 100;

    pub fn new(value: u128) -> Result<Self, TypesError> {
        Self::from_uint(U256::from(value))
    }

    /// Range-check a raw `uint256` as returned by the contract.
    pub fn from_uint(value: U256) -> Result<Self, TypesError> {
        if value > U256::from(Self::MAX) {
            return Err(TypesError::PercentageOutOfRange(value));
        }
        Ok(Self(value.low_u32() as u8))
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u64> for VotePercentage {
    type Error = TypesError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(u128::from(value))
    }
}

impl From<VotePercentage> for u8 {
    fn from(p: VotePercentage) -> Self {
        p.0
    }
}

impl fmt::Display for VotePercentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// The stored proposal fields returned by the contract's `proposals(id)` getter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalDetail {
    /// Free-text description supplied by the proposer.
    pub description: String,
    /// Votes accumulated so far, as the contract's full `uint256`.
    pub vote_count: U256,
    /// Whether the contract has executed the proposal. Never reverts to false.
    pub executed: bool,
}

/// A proposal assembled from one detail read and one percentage read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub description: String,
    pub vote_count: U256,
    pub executed: bool,
    pub vote_percentage: VotePercentage,
}

impl Proposal {
    /// Combine the two per-id reads into one record.
    pub fn assemble(id: ProposalId, detail: ProposalDetail, vote_percentage: VotePercentage) -> Self {
        Self {
            id,
            description: detail.description,
            vote_count: detail.vote_count,
            executed: detail.executed,
            vote_percentage,
        }
    }

    /// Open proposals are the ones that still accept votes.
    pub fn is_open(&self) -> bool {
        !self.executed
    }
}
