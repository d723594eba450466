//! Resolution of a provider connection into a [`DaoContract`] handle.

use async_trait::async_trait;
use daovote_provider::{JsonRpcClient, TransportOptions};
use daovote_types::Address;

use crate::abi::{self, DaoAbi};
use crate::error::ContractError;
use crate::handle::{DaoContract, HttpDaoContract, ReceiptPolling};

/// Address the DAO contract is deployed at.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x2b048b7f17BeEB8133c31C3ed52CfBA11804A7E9";

/// Produces a contract handle. One attempt per call, no retries.
#[async_trait]
pub trait ContractAccessor: Send + Sync {
    type Handle: DaoContract;

    /// Establish a provider connection and bind the contract.
    ///
    /// Fails with [`ContractError::ProviderUnavailable`] when no provider can
    /// be reached, and [`ContractError::Resolution`] when the handle cannot be
    /// bound to the configured address.
    async fn resolve(&self) -> Result<Self::Handle, ContractError>;
}

/// Candidate JSON-RPC endpoints. The wallet endpoint wins when both are set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Endpoints {
    pub wallet_url: Option<String>,
    pub rpc_url: Option<String>,
}

impl Endpoints {
    pub fn select(&self) -> Option<&str> {
        usable(&self.wallet_url).or_else(|| usable(&self.rpc_url))
    }
}

fn usable(url: &Option<String>) -> Option<&str> {
    url.as_deref().filter(|u| !u.trim().is_empty())
}

/// [`ContractAccessor`] for an HTTP JSON-RPC endpoint.
#[derive(Clone, Debug)]
pub struct HttpContractAccessor {
    endpoints: Endpoints,
    contract_address: String,
    transport: TransportOptions,
    polling: ReceiptPolling,
}

impl HttpContractAccessor {
    pub fn new(
        endpoints: Endpoints,
        contract_address: impl Into<String>,
        transport: TransportOptions,
        polling: ReceiptPolling,
    ) -> Self {
        Self {
            endpoints,
            contract_address: contract_address.into(),
            transport,
            polling,
        }
    }
}

#[async_trait]
impl ContractAccessor for HttpContractAccessor {
    type Handle = HttpDaoContract;

    async fn resolve(&self) -> Result<HttpDaoContract, ContractError> {
        let url = self.endpoints.select().ok_or_else(|| {
            ContractError::ProviderUnavailable(
                "no wallet provider or fallback RPC endpoint configured".into(),
            )
        })?;

        let address = Address::parse(&self.contract_address)
            .map_err(|e| ContractError::Resolution(e.to_string()))?;
        let abi = DaoAbi::load().map_err(|e| ContractError::Resolution(e.to_string()))?;

        let rpc = JsonRpcClient::new(url, self.transport)
            .map_err(|e| ContractError::ProviderUnavailable(e.to_string()))?;

        let raw_chain_id: String = rpc
            .call("eth_chainId", serde_json::json!([]))
            .await
            .map_err(|e| ContractError::ProviderUnavailable(format!("{url}: {e}")))?;
        let chain_id = abi::parse_quantity(&raw_chain_id)
            .map_err(|e| ContractError::ProviderUnavailable(format!("bad chain id: {e}")))?;

        let code: String = rpc
            .call(
                "eth_getCode",
                serde_json::json!([address.to_string(), "latest"]),
            )
            .await
            .map_err(|e| ContractError::Resolution(format!("eth_getCode: {e}")))?;
        if !has_code(&code) {
            return Err(ContractError::Resolution(format!(
                "no contract deployed at {address} on chain {chain_id}"
            )));
        }

        tracing::info!(endpoint = url, chain_id, contract = %address, "contract resolved");
        Ok(HttpDaoContract::new(rpc, abi, address, chain_id, self.polling))
    }
}

fn has_code(raw: &str) -> bool {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    digits.chars().any(|c| c != '0')
}
