//! Nullable contract — in-memory proposals with scripted failures.

use async_trait::async_trait;
use daovote_contract::{ContractError, DaoContract};
use daovote_types::{
    Address, ProposalDetail, ProposalId, TxHash, TxReceipt, VotePercentage, U256,
};
use std::sync::{Arc, Mutex};

/// A remote call as recorded by [`NullContract`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Count,
    Proposal(ProposalId),
    Percentage(ProposalId),
    Vote(ProposalId, Address),
}

#[derive(Default)]
struct Inner {
    proposals: Vec<(ProposalDetail, VotePercentage)>,
    fail_count: bool,
    fail_detail_at: Option<ProposalId>,
    fail_percentage_at: Option<ProposalId>,
    reject_votes: Option<String>,
    revert_votes: Option<String>,
    calls: Vec<Call>,
}

/// An in-memory stand-in for the DAO contract.
///
/// Proposal `i` of the script has id `i + 1`. A successful vote adds one to
/// the proposal's vote count; percentages stay as scripted.
#[derive(Clone, Default)]
pub struct NullContract {
    inner: Arc<Mutex<Inner>>,
}

impl std::fmt::Debug for NullContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock().unwrap();
        f.debug_struct("NullContract")
            .field("proposals", &inner.proposals.len())
            .field("calls", &inner.calls.len())
            .finish()
    }
}

impl NullContract {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a proposal to the script.
    ///
    /// # Panics
    /// Panics if `percentage` is above 100.
    pub fn with_proposal(self, description: &str, vote_count: u128, executed: bool, percentage: u8) -> Self {
        self.push_proposal(description, vote_count, executed, percentage);
        self
    }

    /// Append a proposal after construction (e.g. between two syncs).
    pub fn push_proposal(&self, description: &str, vote_count: u128, executed: bool, percentage: u8) {
        let percentage =
            VotePercentage::new(u128::from(percentage)).expect("scripted percentage is 0..=100");
        self.inner.lock().unwrap().proposals.push((
            ProposalDetail {
                description: description.to_string(),
                vote_count: U256::from(vote_count),
                executed,
            },
            percentage,
        ));
    }

    /// Make `proposal_count` fail.
    pub fn fail_count(&self, fail: bool) {
        self.inner.lock().unwrap().fail_count = fail;
    }

    /// Make the detail read of proposal `id` fail.
    pub fn fail_detail_at(&self, id: Option<u64>) {
        self.inner.lock().unwrap().fail_detail_at = id.and_then(|i| ProposalId::new(i).ok());
    }

    /// Make the percentage read of proposal `id` fail.
    pub fn fail_percentage_at(&self, id: Option<u64>) {
        self.inner.lock().unwrap().fail_percentage_at = id.and_then(|i| ProposalId::new(i).ok());
    }

    /// Make the wallet decline every vote transaction.
    pub fn reject_votes(&self, message: Option<&str>) {
        self.inner.lock().unwrap().reject_votes = message.map(str::to_string);
    }

    /// Make every vote transaction revert.
    pub fn revert_votes(&self, message: Option<&str>) {
        self.inner.lock().unwrap().revert_votes = message.map(str::to_string);
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Number of `proposal_count` calls, i.e. sync cycles that reached the contract.
    pub fn count_calls(&self) -> usize {
        self.calls().iter().filter(|c| matches!(c, Call::Count)).count()
    }

    /// Votes received as `(proposal, sender)`.
    pub fn votes(&self) -> Vec<(ProposalId, Address)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Vote(id, sender) => Some((id, sender)),
                _ => None,
            })
            .collect()
    }

    /// Current vote count of proposal `id`, if it exists.
    pub fn vote_count(&self, id: u64) -> Option<U256> {
        let inner = self.inner.lock().unwrap();
        let index = usize::try_from(id.checked_sub(1)?).ok()?;
        inner.proposals.get(index).map(|(detail, _)| detail.vote_count)
    }
}

fn index_of(id: ProposalId) -> usize {
    usize::try_from(id.get() - 1).unwrap_or(usize::MAX)
}

#[async_trait]
impl DaoContract for NullContract {
    async fn proposal_count(&self) -> Result<u64, ContractError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Count);
        if inner.fail_count {
            return Err(ContractError::Read("proposalCount(): null failure".into()));
        }
        Ok(inner.proposals.len() as u64)
    }

    async fn proposal(&self, id: ProposalId) -> Result<ProposalDetail, ContractError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Proposal(id));
        if inner.fail_detail_at == Some(id) {
            return Err(ContractError::Read(format!("proposals {id}: null failure")));
        }
        inner
            .proposals
            .get(index_of(id))
            .map(|(detail, _)| detail.clone())
            .ok_or_else(|| ContractError::Read(format!("proposals {id}: no such proposal")))
    }

    async fn vote_percentage(&self, id: ProposalId) -> Result<VotePercentage, ContractError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Percentage(id));
        if inner.fail_percentage_at == Some(id) {
            return Err(ContractError::Read(format!(
                "getVotePercentage {id}: null failure"
            )));
        }
        inner
            .proposals
            .get(index_of(id))
            .map(|(_, percentage)| *percentage)
            .ok_or_else(|| {
                ContractError::Read(format!("getVotePercentage {id}: no such proposal"))
            })
    }

    async fn vote(&self, id: ProposalId, sender: &Address) -> Result<TxReceipt, ContractError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Vote(id, *sender));

        if let Some(message) = &inner.reject_votes {
            return Err(ContractError::Rejected(message.clone()));
        }
        if let Some(message) = &inner.revert_votes {
            return Err(ContractError::Write(format!("execution reverted: {message}")));
        }

        let nonce = inner.calls.len() as u8;
        let (detail, _) = inner
            .proposals
            .get_mut(index_of(id))
            .ok_or_else(|| ContractError::Write("execution reverted: invalid proposal".into()))?;
        if detail.executed {
            return Err(ContractError::Write(
                "execution reverted: proposal already executed".into(),
            ));
        }
        detail.vote_count = detail.vote_count + U256::one();

        Ok(TxReceipt {
            transaction_hash: TxHash::new([nonce; 32]),
            block_number: Some(u64::from(nonce)),
            gas_used: Some(21_000),
            success: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u64) -> ProposalId {
        ProposalId::new(n).unwrap()
    }

    #[tokio::test]
    async fn serves_scripted_proposals() {
        let contract = NullContract::new()
            .with_proposal("Fund X", 5, false, 40)
            .with_proposal("Fund Y", 10, true, 80);

        assert_eq!(contract.proposal_count().await.unwrap(), 2);
        assert_eq!(contract.proposal(id(2)).await.unwrap().description, "Fund Y");
        assert_eq!(contract.vote_percentage(id(1)).await.unwrap().get(), 40);
        assert!(contract.proposal(id(3)).await.is_err());
        assert_eq!(
            contract.calls(),
            vec![
                Call::Count,
                Call::Proposal(id(2)),
                Call::Percentage(id(1)),
                Call::Proposal(id(3)),
            ]
        );
    }

    #[tokio::test]
    async fn vote_increments_count() {
        let contract = NullContract::new().with_proposal("Fund X", 5, false, 40);
        let sender = Address::new([7u8; 20]);
        let receipt = contract.vote(id(1), &sender).await.unwrap();
        assert!(receipt.success);
        assert_eq!(contract.vote_count(1), Some(U256::from(6)));
        assert_eq!(contract.votes(), vec![(id(1), sender)]);
    }

    #[tokio::test]
    async fn executed_proposal_reverts_vote() {
        let contract = NullContract::new().with_proposal("Fund Y", 10, true, 80);
        let err = contract.vote(id(1), &Address::new([7u8; 20])).await.unwrap_err();
        assert!(matches!(err, ContractError::Write(_)));
        assert_eq!(contract.vote_count(1), Some(U256::from(10)));
    }

    #[tokio::test]
    async fn scripted_failures() {
        let contract = NullContract::new().with_proposal("a", 0, false, 0);
        contract.fail_percentage_at(Some(1));
        assert!(contract.vote_percentage(id(1)).await.is_err());
        contract.fail_percentage_at(None);
        assert!(contract.vote_percentage(id(1)).await.is_ok());

        contract.reject_votes(Some("denied"));
        let err = contract.vote(id(1), &Address::new([7u8; 20])).await.unwrap_err();
        assert!(matches!(err, ContractError::Rejected(_)));
    }
}
