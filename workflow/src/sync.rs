//! Full proposal enumeration against the contract.

use daovote_contract::{ContractError, DaoContract};
use daovote_types::{Proposal, ProposalId};

/// Upper bound on the capacity reserved up front from the contract's count.
const MAX_PREALLOCATED: u64 = 1024;

/// How the two reads for a single proposal are issued.
///
/// Reads for different ids are always sequential so records come back in id
/// order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReadMode {
    /// Detail read, then percentage read.
    #[default]
    Sequential,
    /// Detail and percentage reads for one id issued concurrently.
    PairedPerId,
}

/// Read the count, then every proposal's detail and percentage for ids
/// `1..=count`.
///
/// Records are assembled into a local accumulator that is only returned when
/// every read succeeded. Any failure discards all of it.
pub async fn fetch_proposals<C>(contract: &C, mode: ReadMode) -> Result<Vec<Proposal>, ContractError>
where
    C: DaoContract + ?Sized,
{
    let count = contract.proposal_count().await?;
    tracing::debug!(count, ?mode, "fetching proposals");

    let mut fetched = Vec::with_capacity(count.min(MAX_PREALLOCATED) as usize);
    for id in ProposalId::sequence(count) {
        let (detail, percentage) = match mode {
            ReadMode::Sequential => {
                let detail = contract.proposal(id).await?;
                let percentage = contract.vote_percentage(id).await?;
                (detail, percentage)
            }
            ReadMode::PairedPerId => {
                tokio::try_join!(contract.proposal(id), contract.vote_percentage(id))?
            }
        };
        fetched.push(Proposal::assemble(id, detail, percentage));
    }

    Ok(fetched)
}
