use daovote_provider::ProviderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("contract resolution failed: {0}")]
    Resolution(String),

    #[error("contract read failed: {0}")]
    Read(String),

    #[error("contract write failed: {0}")]
    Write(String),

    #[error("transaction rejected by wallet: {0}")]
    Rejected(String),
}

impl ContractError {
    /// Map a provider failure during a read call.
    pub fn read(method: &str, err: ProviderError) -> Self {
        ContractError::Read(format!("{method}: {err}"))
    }

    /// Map a provider failure during a write call.
    pub fn write(method: &str, err: ProviderError) -> Self {
        match err {
            ProviderError::Rejected(message) => ContractError::Rejected(message),
            other => ContractError::Write(format!("{method}: {other}")),
        }
    }
}
