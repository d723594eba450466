//! Transaction receipts returned after a vote submission is mined.

use serde::{Deserialize, Serialize};

use crate::hash::TxHash;

/// The parts of a transaction receipt the client cares about.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub transaction_hash: TxHash,
    /// Block the transaction was included in.
    pub block_number: Option<u64>,
    pub gas_used: Option<u64>,
    /// `false` when the contract reverted the call.
    pub success: bool,
}
