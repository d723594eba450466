//! Nullable wallet — scripted account authorization.

use async_trait::async_trait;
use daovote_provider::{ProviderError, WalletProvider};
use daovote_types::Address;
use std::sync::{Arc, Mutex};

enum Response {
    Accounts(Vec<Address>),
    Rejected(String),
    Unreachable,
}

struct Inner {
    response: Response,
    requests: u32,
}

/// A wallet that answers `request_accounts` from a script.
#[derive(Clone)]
pub struct NullWallet {
    inner: Arc<Mutex<Inner>>,
}

impl NullWallet {
    fn with_response(response: Response) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                response,
                requests: 0,
            })),
        }
    }

    /// A wallet holding the given accounts, returned in this order.
    pub fn with_accounts(accounts: Vec<Address>) -> Self {
        Self::with_response(Response::Accounts(accounts))
    }

    /// A wallet whose user declines every request.
    pub fn rejecting(message: &str) -> Self {
        Self::with_response(Response::Rejected(message.to_string()))
    }

    /// A wallet endpoint that cannot be reached.
    pub fn unreachable() -> Self {
        Self::with_response(Response::Unreachable)
    }

    /// Number of `request_accounts` calls so far.
    pub fn requests(&self) -> u32 {
        self.inner.lock().unwrap().requests
    }
}

#[async_trait]
impl WalletProvider for NullWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests += 1;
        match &inner.response {
            Response::Accounts(accounts) => Ok(accounts.clone()),
            Response::Rejected(message) => Err(ProviderError::Rejected(message.clone())),
            Response::Unreachable => Err(ProviderError::Unreachable(
                "null wallet unreachable".to_string(),
            )),
        }
    }

    fn name(&self) -> &str {
        "null-wallet"
    }
}
