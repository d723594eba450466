//! Fundamental types for the DAO vote client.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account addresses, transaction hashes, proposals, vote percentages and receipts.

pub mod address;
pub mod error;
pub mod hash;
pub mod proposal;
pub mod receipt;

pub use ethereum_types;
pub use ethereum_types::U256;

pub use address::Address;
pub use error::TypesError;
pub use hash::TxHash;
pub use proposal::{Proposal, ProposalDetail, ProposalId, VotePercentage};
pub use receipt::TxReceipt;
