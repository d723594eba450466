//! Client configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use daovote_contract::{Endpoints, HttpContractAccessor, ReceiptPolling, DEFAULT_CONTRACT_ADDRESS};
use daovote_provider::{HttpWalletProvider, ProviderError, TransportOptions};
use daovote_utils::LogFormat;

use crate::sync::ReadMode;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("failed to serialize config: {0}")]
    Serialize(String),
}

/// Configuration for the vote client.
///
/// Can be loaded from a TOML file via [`ClientConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Wallet-capable JSON-RPC endpoint (a local signer or a dev node with
    /// unlocked accounts). Without it the wallet cannot be connected.
    #[serde(default)]
    pub wallet_url: Option<String>,

    /// Fallback endpoint used for contract reads when no wallet is configured.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: Option<String>,

    /// Address of the DAO contract.
    #[serde(default = "default_contract_address")]
    pub contract_address: String,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// HTTP connection timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Delay between receipt polls after a vote is submitted.
    #[serde(default = "default_receipt_poll_interval_ms")]
    pub receipt_poll_interval_ms: u64,

    /// Number of receipt polls before a vote is reported as failed.
    #[serde(default = "default_receipt_poll_attempts")]
    pub receipt_poll_attempts: u32,

    /// Issue a proposal's detail and percentage reads concurrently.
    #[serde(default)]
    pub parallel_detail_reads: bool,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_rpc_url() -> Option<String> {
    Some("http://127.0.0.1:8545".to_string())
}

fn default_contract_address() -> String {
    DEFAULT_CONTRACT_ADDRESS.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_receipt_poll_interval_ms() -> u64 {
    500
}

fn default_receipt_poll_attempts() -> u32 {
    120
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }

    pub fn receipt_polling(&self) -> ReceiptPolling {
        ReceiptPolling {
            interval: Duration::from_millis(self.receipt_poll_interval_ms),
            attempts: self.receipt_poll_attempts,
        }
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            wallet_url: self.wallet_url.clone(),
            rpc_url: self.rpc_url.clone(),
        }
    }

    pub fn read_mode(&self) -> ReadMode {
        if self.parallel_detail_reads {
            ReadMode::PairedPerId
        } else {
            ReadMode::Sequential
        }
    }

    /// Contract accessor for the configured endpoints and address.
    pub fn contract_accessor(&self) -> HttpContractAccessor {
        HttpContractAccessor::new(
            self.endpoints(),
            self.contract_address.clone(),
            self.transport_options(),
            self.receipt_polling(),
        )
    }

    /// Wallet provider for the configured wallet endpoint, if any.
    pub fn wallet_provider(&self) -> Result<Option<HttpWalletProvider>, ProviderError> {
        match self.wallet_url.as_deref().filter(|u| !u.trim().is_empty()) {
            Some(url) => HttpWalletProvider::new(url, self.transport_options()).map(Some),
            None => Ok(None),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            wallet_url: None,
            rpc_url: default_rpc_url(),
            contract_address: default_contract_address(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            receipt_poll_interval_ms: default_receipt_poll_interval_ms(),
            receipt_poll_attempts: default_receipt_poll_attempts(),
            parallel_detail_reads: false,
            log_format: LogFormat::Human,
            log_level: default_log_level(),
        }
    }
}
