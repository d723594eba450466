//! Nullable infrastructure for deterministic testing.
//!
//! Every external boundary of the client (contract accessor, contract
//! handle, wallet provider, user notices) is abstracted behind a trait. This
//! crate provides test-friendly implementations that:
//! - Return scripted values
//! - Can be made to fail at a chosen call
//! - Count and record every call for assertions
//! - Never touch the network
//!
//! [`NullRpcServer`] sits one level lower: a local JSON-RPC endpoint for
//! exercising the HTTP implementations of those traits.
//!
//! The trait nullables are cheaply cloneable and clones share state, so a test can
//! hand one clone to the workflow and inspect another.

pub mod accessor;
pub mod contract;
pub mod notifier;
pub mod rpc;
pub mod wallet;

pub use accessor::{NullAccessor, ResolveFailure};
pub use contract::{Call, NullContract};
pub use notifier::NullNotifier;
pub use rpc::{NullRpcServer, Reply};
pub use wallet::NullWallet;
