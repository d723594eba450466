//! Wallet provider boundary for the DAO vote client.
//!
//! A wallet provider is any Ethereum JSON-RPC endpoint that manages accounts
//! on the user's behalf: a local signer, or a development node with unlocked
//! accounts. This crate provides:
//! - the JSON-RPC 2.0 transport shared with the contract crate
//! - the [`WalletProvider`] trait and its HTTP implementation
//! - the [`Notifier`] trait for blocking, user-visible notices

pub mod error;
pub mod notice;
pub mod transport;
pub mod wallet;

pub use error::ProviderError;
pub use notice::{Notifier, StderrNotifier};
pub use transport::{JsonRpcClient, TransportOptions};
pub use wallet::{HttpWalletProvider, WalletProvider};
