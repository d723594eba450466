//! The sync/vote orchestrator.

use daovote_contract::{ContractAccessor, DaoContract};
use daovote_provider::{Notifier, WalletProvider};
use daovote_types::{Address, ProposalId, TxReceipt};

use crate::error::WorkflowError;
use crate::state::WorkflowState;
use crate::sync::{fetch_proposals, ReadMode};
use crate::view::ViewModel;

/// Notice shown when connecting without any wallet provider configured.
pub const WALLET_UNAVAILABLE_NOTICE: &str =
    "Ethereum wallet is not available. Configure a wallet endpoint (--wallet-url) to connect.";

/// Result of a sync that did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// A full proposal set was committed.
    Committed { count: usize },
    /// No contract handle yet; nothing was read.
    NoContract,
    /// `retry_initialize` found a handle already in place.
    AlreadyResolved,
}

/// Result of a vote that did not fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoteOutcome {
    Submitted(TxReceipt),
    /// No contract handle or no connected account.
    Skipped,
}

/// Keeps the client's state in step with the contract.
///
/// Operations take `&mut self` and run to completion one at a time. Errors
/// are logged (and, for wallet connection, shown through the [`Notifier`])
/// before being returned; the state is always left consistent, with the
/// loading flag cleared.
pub struct VotingWorkflow<A: ContractAccessor, W, N> {
    accessor: A,
    wallet: Option<W>,
    notifier: N,
    read_mode: ReadMode,
    state: WorkflowState<A::Handle>,
}

impl<A, W, N> VotingWorkflow<A, W, N>
where
    A: ContractAccessor,
    W: WalletProvider,
    N: Notifier,
{
    /// `wallet` is `None` when no wallet-capable provider is present.
    pub fn new(accessor: A, wallet: Option<W>, notifier: N) -> Self {
        Self {
            accessor,
            wallet,
            notifier,
            read_mode: ReadMode::default(),
            state: WorkflowState::new(),
        }
    }

    pub fn with_read_mode(mut self, read_mode: ReadMode) -> Self {
        self.read_mode = read_mode;
        self
    }

    pub fn state(&self) -> &WorkflowState<A::Handle> {
        &self.state
    }

    pub fn view(&self) -> ViewModel {
        ViewModel::from_state(&self.state)
    }

    fn apply(&mut self, transition: impl FnOnce(WorkflowState<A::Handle>) -> WorkflowState<A::Handle>) {
        let state = std::mem::take(&mut self.state);
        self.state = transition(state);
    }

    /// Resolve the contract handle and run the initial sync.
    pub async fn initialize(&mut self) -> Result<SyncOutcome, WorkflowError> {
        self.apply(WorkflowState::begin_initialize);

        match self.accessor.resolve().await {
            Ok(handle) => {
                tracing::info!("DAO contract initialized");
                self.apply(|s| s.contract_resolved(handle));
                self.sync_proposals().await
            }
            Err(e) => {
                tracing::error!(error = %e, "error initializing DAO contract");
                self.apply(WorkflowState::resolution_failed);
                Err(e.into())
            }
        }
    }

    /// Run `initialize` again, but only while no handle is present.
    pub async fn retry_initialize(&mut self) -> Result<SyncOutcome, WorkflowError> {
        if self.state.has_contract() {
            tracing::debug!("contract already resolved, retry skipped");
            return Ok(SyncOutcome::AlreadyResolved);
        }
        self.initialize().await
    }

    /// Re-read every proposal and commit the set if all reads succeed.
    pub async fn sync_proposals(&mut self) -> Result<SyncOutcome, WorkflowError> {
        let Some(contract) = self.state.contract().cloned() else {
            tracing::debug!("no contract handle, sync skipped");
            return Ok(SyncOutcome::NoContract);
        };

        self.apply(WorkflowState::begin_sync);
        let outcome = self.fetch_and_commit(&contract).await;
        self.apply(WorkflowState::end_sync);
        outcome
    }

    /// One sync cycle. Phase and loading are left to the caller.
    async fn fetch_and_commit(&mut self, contract: &A::Handle) -> Result<SyncOutcome, WorkflowError> {
        let cycle = self.state.sync_cycles();
        match fetch_proposals(contract, self.read_mode).await {
            Ok(proposals) => {
                let count = proposals.len();
                self.apply(|s| s.commit_proposals(proposals));
                tracing::info!(cycle, count, "proposals synced");
                Ok(SyncOutcome::Committed { count })
            }
            Err(e) => {
                tracing::error!(cycle, error = %e, "error fetching proposals");
                Err(e.into())
            }
        }
    }

    /// Ask the wallet for accounts and keep the first one.
    pub async fn connect_wallet(&mut self) -> Result<Address, WorkflowError> {
        let Some(wallet) = self.wallet.as_ref() else {
            tracing::warn!("no wallet provider available");
            self.notifier.notify(WALLET_UNAVAILABLE_NOTICE);
            return Err(WorkflowError::ProviderUnavailable(
                "no wallet provider configured".into(),
            ));
        };

        let accounts = match wallet.request_accounts().await {
            Ok(accounts) => accounts,
            Err(e) => {
                tracing::error!(provider = wallet.name(), error = %e, "error connecting wallet");
                self.notifier
                    .notify(&format!("Failed to connect wallet: {e}"));
                return Err(e.into());
            }
        };

        let Some(account) = accounts.first().copied() else {
            let err = WorkflowError::ProviderRejected("wallet returned no accounts".into());
            tracing::error!(provider = wallet.name(), error = %err, "error connecting wallet");
            self.notifier
                .notify("Failed to connect wallet: wallet returned no accounts");
            return Err(err);
        };

        self.apply(|s| s.account_connected(account));
        if self.state.has_contract() {
            // A failed refresh is logged and does not undo the connection.
            let _ = self.sync_proposals().await;
        }
        tracing::info!(%account, "wallet connected");
        Ok(account)
    }

    /// Vote on `id` as the connected account, then refresh.
    ///
    /// Skipped without any state change when there is no contract handle or
    /// no connected account.
    pub async fn vote_on_proposal(&mut self, id: ProposalId) -> Result<VoteOutcome, WorkflowError> {
        let (Some(contract), Some(account)) =
            (self.state.contract().cloned(), self.state.account().copied())
        else {
            tracing::debug!(proposal = %id, "vote skipped: no contract or no account");
            return Ok(VoteOutcome::Skipped);
        };

        self.apply(WorkflowState::begin_vote);

        let outcome = match contract.vote(id, &account).await {
            Ok(receipt) => {
                tracing::info!(
                    proposal = %id,
                    tx = %receipt.transaction_hash,
                    block = ?receipt.block_number,
                    "vote accepted"
                );
                // The refresh runs inside the vote: phase stays Voting and loading stays set.
                // A failed refresh is logged; the vote itself went through.
                self.apply(WorkflowState::begin_refresh);
                let _ = self.fetch_and_commit(&contract).await;
                Ok(VoteOutcome::Submitted(receipt))
            }
            Err(e) => {
                tracing::error!(proposal = %id, error = %e, "error voting on proposal");
                Err(e.into())
            }
        };

        self.apply(WorkflowState::end_vote);
        outcome
    }
}
