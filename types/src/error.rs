//! Parse and range errors for the shared types.

use ethereum_types::U256;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid transaction hash: {0}")]
    InvalidTxHash(String),

    #[error("proposal ids start at 1")]
    ZeroProposalId,

    #[error("vote percentage {0} is out of range 0..=100")]
    PercentageOutOfRange(U256),
}
