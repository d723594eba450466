//! What the user sees, derived from [`WorkflowState`].

use daovote_types::{Address, Proposal, ProposalId, VotePercentage, U256};
use std::fmt;

use crate::state::WorkflowState;

/// One proposal row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProposalView {
    pub id: ProposalId,
    pub description: String,
    pub vote_count: U256,
    pub vote_percentage: VotePercentage,
    /// Whether the vote action is offered for this row.
    pub can_vote: bool,
}

/// The whole view: connect action, loading indicator and proposal list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewModel {
    /// The connect-wallet action is hidden once an account is connected.
    pub show_connect: bool,
    pub loading: bool,
    pub account: Option<Address>,
    pub proposals: Vec<ProposalView>,
}

/// The vote action is offered only to a connected account, and only for
/// proposals the contract has not executed.
pub fn vote_action_visible(account: Option<&Address>, proposal: &Proposal) -> bool {
    account.is_some() && proposal.is_open()
}

impl ViewModel {
    pub fn from_state<H>(state: &WorkflowState<H>) -> Self {
        let account = state.account();
        Self {
            show_connect: account.is_none(),
            loading: state.loading(),
            account: account.copied(),
            proposals: state
                .proposals()
                .iter()
                .map(|p| ProposalView {
                    id: p.id,
                    description: p.description.clone(),
                    vote_count: p.vote_count,
                    vote_percentage: p.vote_percentage,
                    can_vote: vote_action_visible(account, p),
                })
                .collect(),
        }
    }

    /// Rows offering the vote action.
    pub fn votable(&self) -> impl Iterator<Item = &ProposalView> {
        self.proposals.iter().filter(|p| p.can_vote)
    }
}

impl fmt::Display for ViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DAO Voting System")?;
        match &self.account {
            Some(account) => writeln!(f, "Account: {account}")?,
            None => writeln!(f, "[Connect Wallet]  run `daovote connect`")?,
        }
        if self.loading {
            writeln!(f, "Loading...")?;
        }
        writeln!(f)?;
        writeln!(f, "Proposals")?;
        for p in &self.proposals {
            writeln!(f, "{} {} - Votes: {}", p.id, p.description, p.vote_count)?;
            write!(f, "   Vote Percentage: {}", p.vote_percentage)?;
            if p.can_vote {
                write!(f, "   [Vote]  run `daovote vote {}`", p.id.get())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
