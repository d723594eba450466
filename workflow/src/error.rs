use daovote_contract::ContractError;
use daovote_provider::ProviderError;
use thiserror::Error;

/// Failures of the workflow operations. None of them is fatal: each is
/// logged where it happens and the operation can simply be repeated.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("wallet provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("wallet provider rejected the request: {0}")]
    ProviderRejected(String),

    #[error("contract read failed: {0}")]
    ContractReadFailure(String),

    #[error("contract write failed: {0}")]
    ContractWriteFailure(String),

    #[error("contract resolution failed: {0}")]
    ContractResolution(String),
}

impl From<ContractError> for WorkflowError {
    fn from(err: ContractError) -> Self {
        match err {
            ContractError::ProviderUnavailable(m) => WorkflowError::ProviderUnavailable(m),
            ContractError::Resolution(m) => WorkflowError::ContractResolution(m),
            ContractError::Read(m) => WorkflowError::ContractReadFailure(m),
            ContractError::Write(m) => WorkflowError::ContractWriteFailure(m),
            ContractError::Rejected(m) => WorkflowError::ProviderRejected(m),
        }
    }
}

impl From<ProviderError> for WorkflowError {
    fn from(err: ProviderError) -> Self {
        if err.is_unavailable() {
            return WorkflowError::ProviderUnavailable(err.to_string());
        }
        match err {
            ProviderError::Rejected(m) => WorkflowError::ProviderRejected(m),
            other => WorkflowError::ProviderRejected(other.to_string()),
        }
    }
}
