use thiserror::Error;

/// JSON-RPC error code a wallet returns when the user declines a request (EIP-1193).
pub const USER_REJECTED_CODE: i64 = 4001;

/// JSON-RPC error code for an unimplemented method.
pub const METHOD_NOT_FOUND_CODE: i64 = -32601;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider unreachable: {0}")]
    Unreachable(String),

    #[error("request rejected by user: {0}")]
    Rejected(String),

    #[error("provider error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("provider returned HTTP {0}")]
    Http(u16),

    #[error("invalid response from provider: {0}")]
    InvalidResponse(String),

    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    /// Whether the provider could not be reached at all (as opposed to
    /// answering with an error).
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ProviderError::Unreachable(_))
    }
}
