//! Nullable accessor — resolves to a shared [`NullContract`] or fails on cue.

use async_trait::async_trait;
use daovote_contract::{ContractAccessor, ContractError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::contract::NullContract;

/// A scripted resolution failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveFailure {
    ProviderUnavailable,
    Resolution,
}

struct Inner {
    failures: VecDeque<ResolveFailure>,
    resolves: u32,
}

/// Resolves to clones of one [`NullContract`], after first working through
/// a queue of scripted failures.
#[derive(Clone)]
pub struct NullAccessor {
    contract: NullContract,
    inner: Arc<Mutex<Inner>>,
}

impl NullAccessor {
    pub fn new(contract: NullContract) -> Self {
        Self {
            contract,
            inner: Arc::new(Mutex::new(Inner {
                failures: VecDeque::new(),
                resolves: 0,
            })),
        }
    }

    /// Fail the next resolutions in the given order, then succeed.
    pub fn failing_first(contract: NullContract, failures: Vec<ResolveFailure>) -> Self {
        let accessor = Self::new(contract);
        accessor.inner.lock().unwrap().failures = failures.into();
        accessor
    }

    /// Number of `resolve` calls so far.
    pub fn resolves(&self) -> u32 {
        self.inner.lock().unwrap().resolves
    }
}

#[async_trait]
impl ContractAccessor for NullAccessor {
    type Handle = NullContract;

    async fn resolve(&self) -> Result<NullContract, ContractError> {
        let mut inner = self.inner.lock().unwrap();
        inner.resolves += 1;
        match inner.failures.pop_front() {
            Some(ResolveFailure::ProviderUnavailable) => Err(ContractError::ProviderUnavailable(
                "null provider unavailable".into(),
            )),
            Some(ResolveFailure::Resolution) => Err(ContractError::Resolution(
                "null contract not deployed".into(),
            )),
            None => Ok(self.contract.clone()),
        }
    }
}
