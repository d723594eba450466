//! Account authorization against a wallet-capable JSON-RPC endpoint.

use async_trait::async_trait;
use daovote_types::Address;

use crate::error::{ProviderError, METHOD_NOT_FOUND_CODE};
use crate::transport::{JsonRpcClient, TransportOptions};

/// A source of user accounts that can sign transactions.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the wallet to authorize this client and return its accounts in
    /// the wallet's order. May prompt the user.
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// Human-readable provider name for logs.
    fn name(&self) -> &str;
}

/// Wallet provider backed by an HTTP JSON-RPC endpoint.
///
/// Uses `eth_requestAccounts` and falls back to `eth_accounts` for endpoints
/// (development nodes) that do not implement the authorization method.
#[derive(Clone, Debug)]
pub struct HttpWalletProvider {
    rpc: JsonRpcClient,
}

impl HttpWalletProvider {
    pub fn new(url: impl Into<String>, options: TransportOptions) -> Result<Self, ProviderError> {
        Ok(Self {
            rpc: JsonRpcClient::new(url, options)?,
        })
    }
}

#[async_trait]
impl WalletProvider for HttpWalletProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let raw: Vec<String> = match self
            .rpc
            .call("eth_requestAccounts", serde_json::json!([]))
            .await
        {
            Err(ProviderError::Rpc { code, .. }) if code == METHOD_NOT_FOUND_CODE => {
                tracing::debug!(
                    url = self.rpc.url(),
                    "eth_requestAccounts not supported, falling back to eth_accounts"
                );
                self.rpc.call("eth_accounts", serde_json::json!([])).await?
            }
            other => other?,
        };

        parse_accounts(raw)
    }

    fn name(&self) -> &str {
        self.rpc.url()
    }
}

/// Parse the account list returned by the wallet, keeping its order.
pub fn parse_accounts(raw: Vec<String>) -> Result<Vec<Address>, ProviderError> {
    raw.iter()
        .map(|s| {
            Address::parse(s)
                .map_err(|e| ProviderError::InvalidResponse(format!("bad account {s:?}: {e}")))
        })
        .collect()
}
