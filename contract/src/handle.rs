//! Callable handle bound to the DAO contract's address.

use async_trait::async_trait;
use daovote_provider::JsonRpcClient;
use daovote_types::{Address, ProposalDetail, ProposalId, TxHash, TxReceipt, VotePercentage};
use serde::Deserialize;
use std::time::Duration;

use crate::abi::{self, DaoAbi};
use crate::error::ContractError;

/// The DAO contract's calls, as seen by the client.
///
/// Read calls never mutate contract state. `vote` submits a transaction and
/// resolves once it has a receipt.
#[async_trait]
pub trait DaoContract: Send + Sync {
    /// Number of proposals; ids run from 1 to this value.
    async fn proposal_count(&self) -> Result<u64, ContractError>;

    async fn proposal(&self, id: ProposalId) -> Result<ProposalDetail, ContractError>;

    async fn vote_percentage(&self, id: ProposalId) -> Result<VotePercentage, ContractError>;

    /// Vote on `id`, signed by `sender`.
    async fn vote(&self, id: ProposalId, sender: &Address) -> Result<TxReceipt, ContractError>;
}

/// How long to wait for a vote transaction's receipt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReceiptPolling {
    pub interval: Duration,
    pub attempts: u32,
}

impl Default for ReceiptPolling {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            attempts: 120,
        }
    }
}

/// Receipt as returned by `eth_getTransactionReceipt`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    transaction_hash: String,
    #[serde(default)]
    block_number: Option<String>,
    #[serde(default)]
    gas_used: Option<String>,
    /// Absent on pre-Byzantium chains; treated as success.
    #[serde(default)]
    status: Option<String>,
}

/// [`DaoContract`] over an Ethereum JSON-RPC endpoint.
#[derive(Clone, Debug)]
pub struct HttpDaoContract {
    rpc: JsonRpcClient,
    abi: DaoAbi,
    address: Address,
    chain_id: u64,
    polling: ReceiptPolling,
}

impl HttpDaoContract {
    pub fn new(
        rpc: JsonRpcClient,
        abi: DaoAbi,
        address: Address,
        chain_id: u64,
        polling: ReceiptPolling,
    ) -> Self {
        Self {
            rpc,
            abi,
            address,
            chain_id,
            polling,
        }
    }

    /// `eth_call` against the latest block, returning raw return data.
    async fn call(&self, method: &str, data: Vec<u8>) -> Result<Vec<u8>, ContractError> {
        let params = serde_json::json!([
            { "to": self.address.to_string(), "data": abi::to_hex_data(&data) },
            "latest"
        ]);
        let raw: String = self
            .rpc
            .call("eth_call", params)
            .await
            .map_err(|e| ContractError::read(method, e))?;
        abi::from_hex_data(&raw).map_err(|e| ContractError::Read(format!("{method}: {e}")))
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<TxReceipt, ContractError> {
        for attempt in 1..=self.polling.attempts {
            let raw: Option<RawReceipt> = self
                .rpc
                .call(
                    "eth_getTransactionReceipt",
                    serde_json::json!([hash.to_string()]),
                )
                .await
                .map_err(|e| ContractError::write(abi::VOTE_ON_PROPOSAL, e))?;

            if let Some(raw) = raw {
                tracing::debug!(%hash, attempt, "receipt available");
                return receipt_from_raw(raw);
            }
            if attempt < self.polling.attempts {
                tokio::time::sleep(self.polling.interval).await;
            }
        }

        Err(ContractError::Write(format!(
            "no receipt for {hash} after {} polls",
            self.polling.attempts
        )))
    }
}

#[async_trait]
impl DaoContract for HttpDaoContract {
    async fn proposal_count(&self) -> Result<u64, ContractError> {
        let read = |e: abi::AbiError| ContractError::Read(format!("{}: {e}", abi::PROPOSAL_COUNT));
        let data = self
            .call(abi::PROPOSAL_COUNT, self.abi.encode_call(abi::PROPOSAL_COUNT).map_err(read)?)
            .await?;
        self.abi.decode_count(&data).map_err(read)
    }

    async fn proposal(&self, id: ProposalId) -> Result<ProposalDetail, ContractError> {
        let read = |e: abi::AbiError| ContractError::Read(format!("{} {id}: {e}", abi::PROPOSALS));
        let data = self
            .call(abi::PROPOSALS, self.abi.encode_id_call(abi::PROPOSALS, id).map_err(read)?)
            .await?;
        self.abi.decode_proposal(&data).map_err(read)
    }

    async fn vote_percentage(&self, id: ProposalId) -> Result<VotePercentage, ContractError> {
        let read =
            |e: &dyn std::fmt::Display| ContractError::Read(format!("{} {id}: {e}", abi::GET_VOTE_PERCENTAGE));
        let calldata = self
            .abi
            .encode_id_call(abi::GET_VOTE_PERCENTAGE, id)
            .map_err(|e| read(&e))?;
        let data = self.call(abi::GET_VOTE_PERCENTAGE, calldata).await?;
        let raw = self
            .abi
            .decode_uint(abi::GET_VOTE_PERCENTAGE, &data)
            .map_err(|e| read(&e))?;
        VotePercentage::from_uint(raw).map_err(|e| read(&e))
    }

    async fn vote(&self, id: ProposalId, sender: &Address) -> Result<TxReceipt, ContractError> {
        let data = self
            .abi
            .encode_id_call(abi::VOTE_ON_PROPOSAL, id)
            .map_err(|e| ContractError::Write(format!("{} {id}: {e}", abi::VOTE_ON_PROPOSAL)))?;
        let params = serde_json::json!([{
            "from": sender.to_string(),
            "to": self.address.to_string(),
            "data": abi::to_hex_data(&data),
        }]);

        let raw_hash: String = self
            .rpc
            .call("eth_sendTransaction", params)
            .await
            .map_err(|e| ContractError::write(abi::VOTE_ON_PROPOSAL, e))?;
        let hash = TxHash::parse(&raw_hash)
            .map_err(|e| ContractError::Write(format!("bad transaction hash: {e}")))?;

        tracing::info!(%hash, chain_id = self.chain_id, proposal = %id, %sender, "vote transaction submitted");
        self.wait_for_receipt(hash).await
    }
}

fn receipt_from_raw(raw: RawReceipt) -> Result<TxReceipt, ContractError> {
    let transaction_hash = TxHash::parse(&raw.transaction_hash)
        .map_err(|e| ContractError::Write(format!("bad receipt hash: {e}")))?;
    let quantity = |field: &str, value: Option<String>| -> Result<Option<u64>, ContractError> {
        value
            .map(|v| abi::parse_quantity(&v))
            .transpose()
            .map_err(|e| ContractError::Write(format!("bad receipt {field}: {e}")))
    };
    let block_number = quantity("blockNumber", raw.block_number)?;
    let gas_used = quantity("gasUsed", raw.gas_used)?;
    let success = quantity("status", raw.status)?.map_or(true, |s| s == 1);

    if !success {
        return Err(ContractError::Write(format!(
            "transaction {transaction_hash} reverted"
        )));
    }

    Ok(TxReceipt {
        transaction_hash,
        block_number,
        gas_used,
        success,
    })
}
