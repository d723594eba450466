//! Workflow state and its transitions.
//!
//! Every transition consumes the state and returns the next one, so each can
//! be exercised on its own without any remote calls.

use daovote_types::{Address, Proposal};
use std::sync::Arc;

/// Lifecycle phase of the workflow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// No contract handle; `initialize` has not succeeded.
    #[default]
    Uninitialized,
    /// Waiting for the contract accessor to resolve.
    Initializing,
    /// Handle present, no remote operation in flight.
    Ready,
    /// A full proposal sync is in flight.
    Syncing,
    /// A vote transaction, and the refresh that follows it, is in flight.
    Voting,
}

/// All mutable client state.
///
/// `proposals` only ever changes as a whole, on a completed sync.
#[derive(Debug)]
pub struct WorkflowState<H> {
    proposals: Vec<Proposal>,
    loading: bool,
    account: Option<Address>,
    contract: Option<Arc<H>>,
    phase: Phase,
    sync_cycles: u64,
}

impl<H> Default for WorkflowState<H> {
    fn default() -> Self {
        Self {
            proposals: Vec::new(),
            loading: false,
            account: None,
            contract: None,
            phase: Phase::Uninitialized,
            sync_cycles: 0,
        }
    }
}

impl<H> WorkflowState<H> {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Accessors ──────────────────────────────────────────────────────

    pub fn proposals(&self) -> &[Proposal] {
        &self.proposals
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn account(&self) -> Option<&Address> {
        self.account.as_ref()
    }

    pub fn contract(&self) -> Option<&Arc<H>> {
        self.contract.as_ref()
    }

    pub fn has_contract(&self) -> bool {
        self.contract.is_some()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of sync cycles started since the workflow was created.
    pub fn sync_cycles(&self) -> u64 {
        self.sync_cycles
    }

    // ── Transitions ────────────────────────────────────────────────────

    pub fn begin_initialize(self) -> Self {
        Self {
            phase: Phase::Initializing,
            ..self
        }
    }

    pub fn contract_resolved(self, handle: H) -> Self {
        Self {
            contract: Some(Arc::new(handle)),
            phase: Phase::Ready,
            ..self
        }
    }

    /// Resolution failed: the handle stays absent.
    pub fn resolution_failed(self) -> Self {
        Self {
            phase: if self.contract.is_some() {
                Phase::Ready
            } else {
                Phase::Uninitialized
            },
            ..self
        }
    }

    pub fn begin_sync(self) -> Self {
        Self {
            loading: true,
            phase: Phase::Syncing,
            sync_cycles: self.sync_cycles + 1,
            ..self
        }
    }

    /// Start a sync cycle nested in an operation that already owns the
    /// phase and the loading flag (the refresh after a vote).
    pub fn begin_refresh(self) -> Self {
        Self {
            sync_cycles: self.sync_cycles + 1,
            ..self
        }
    }

    /// Replace the whole proposal sequence with a completed sync's result.
    pub fn commit_proposals(self, proposals: Vec<Proposal>) -> Self {
        Self { proposals, ..self }
    }

    /// Clears `loading` whether or not the sync committed anything.
    pub fn end_sync(self) -> Self {
        Self {
            loading: false,
            phase: Phase::Ready,
            ..self
        }
    }

    pub fn account_connected(self, account: Address) -> Self {
        Self {
            account: Some(account),
            ..self
        }
    }

    pub fn begin_vote(self) -> Self {
        Self {
            loading: true,
            phase: Phase::Voting,
            ..self
        }
    }

    pub fn end_vote(self) -> Self {
        Self {
            loading: false,
            phase: Phase::Ready,
            ..self
        }
    }
}
