//! Proposal synchronization and voting workflow.
//!
//! [`VotingWorkflow`] owns all client-side UI state and keeps it consistent
//! with the contract across startup, wallet connection and votes:
//! - `initialize` resolves the contract handle and runs the first sync
//! - `sync_proposals` re-reads the full proposal set and commits it atomically
//! - `connect_wallet` authorizes an account and refreshes
//! - `vote_on_proposal` submits a vote and refreshes
//!
//! State lives in an explicit [`WorkflowState`] whose transitions are pure
//! functions; [`ViewModel`] derives what the user sees from it.

pub mod config;
pub mod error;
pub mod state;
pub mod sync;
pub mod view;
pub mod workflow;

pub use config::{ClientConfig, ConfigError};
pub use error::WorkflowError;
pub use state::{Phase, WorkflowState};
pub use sync::{fetch_proposals, ReadMode};
pub use view::{ProposalView, ViewModel};
pub use workflow::{SyncOutcome, VoteOutcome, VotingWorkflow, WALLET_UNAVAILABLE_NOTICE};
