//! Contract accessor for the DAO voting contract.
//!
//! [`ContractAccessor::resolve`] establishes a provider connection and binds a
//! [`DaoContract`] handle to the contract's fixed address and interface. The
//! handle exposes the three read-only calls the client needs and vote
//! submission on behalf of a sender account.

pub mod abi;
pub mod accessor;
pub mod error;
pub mod handle;

pub use abi::{AbiError, DaoAbi};
pub use accessor::{ContractAccessor, Endpoints, HttpContractAccessor, DEFAULT_CONTRACT_ADDRESS};
pub use error::ContractError;
pub use handle::{DaoContract, HttpDaoContract, ReceiptPolling};
