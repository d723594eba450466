//! The DAO contract's ABI, encoded and decoded with `ethabi`.
//!
//! The interface is loaded once from `abi/dao.json` when a handle is bound.
//! Return values keep the contract's full `uint256` width.

use daovote_types::{ProposalDetail, ProposalId, U256};
use ethabi::{Contract, Function, Token};
use thiserror::Error;

const DAO_ABI: &str = include_str!("../abi/dao.json");

// ── Interface ──────────────────────────────────────────────────────────

pub const PROPOSAL_COUNT: &str = "proposalCount";
pub const PROPOSALS: &str = "proposals";
pub const GET_VOTE_PERCENTAGE: &str = "getVotePercentage";
pub const VOTE_ON_PROPOSAL: &str = "voteOnProposal";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AbiError {
    #[error("abi codec error: {0}")]
    Codec(String),

    #[error("unexpected return values from {0}")]
    UnexpectedOutput(String),

    #[error("integer does not fit in {bits} bits")]
    Overflow { bits: u32 },

    #[error("invalid hex data: {0}")]
    Hex(String),
}

fn codec(err: ethabi::Error) -> AbiError {
    AbiError::Codec(err.to_string())
}

/// The contract interface the client calls.
#[derive(Clone, Debug)]
pub struct DaoAbi {
    contract: Contract,
}

impl DaoAbi {
    pub fn load() -> Result<Self, AbiError> {
        let contract = Contract::load(DAO_ABI.as_bytes()).map_err(codec)?;
        Ok(Self { contract })
    }

    pub fn function(&self, name: &str) -> Result<&Function, AbiError> {
        self.contract.function(name).map_err(codec)
    }

    /// Calldata for a function without arguments.
    pub fn encode_call(&self, name: &str) -> Result<Vec<u8>, AbiError> {
        self.function(name)?.encode_input(&[]).map_err(codec)
    }

    /// Calldata for a function taking a proposal id.
    pub fn encode_id_call(&self, name: &str, id: ProposalId) -> Result<Vec<u8>, AbiError> {
        self.function(name)?
            .encode_input(&[Token::Uint(U256::from(id.get()))])
            .map_err(codec)
    }

    /// Decode a single `uint256` return value.
    pub fn decode_uint(&self, name: &str, data: &[u8]) -> Result<U256, AbiError> {
        let tokens = self.function(name)?.decode_output(data).map_err(codec)?;
        match tokens.as_slice() {
            [Token::Uint(value)] => Ok(*value),
            _ => Err(AbiError::UnexpectedOutput(name.to_string())),
        }
    }

    /// Decode the `proposalCount()` return value. Counts beyond `u64` cannot
    /// be enumerated and are rejected.
    pub fn decode_count(&self, data: &[u8]) -> Result<u64, AbiError> {
        let count = self.decode_uint(PROPOSAL_COUNT, data)?;
        if count.bits() > 64 {
            return Err(AbiError::Overflow { bits: 64 });
        }
        Ok(count.low_u64())
    }

    /// Decode the `(string description, uint256 voteCount, bool executed)`
    /// tuple returned by the `proposals(uint256)` getter.
    pub fn decode_proposal(&self, data: &[u8]) -> Result<ProposalDetail, AbiError> {
        let tokens = self.function(PROPOSALS)?.decode_output(data).map_err(codec)?;
        match tokens.as_slice() {
            [Token::String(description), Token::Uint(vote_count), Token::Bool(executed)] => {
                Ok(ProposalDetail {
                    description: description.clone(),
                    vote_count: *vote_count,
                    executed: *executed,
                })
            }
            _ => Err(AbiError::UnexpectedOutput(PROPOSALS.to_string())),
        }
    }
}

// ── Hex helpers ────────────────────────────────────────────────────────

/// `0x`-prefixed hex encoding used for JSON-RPC data fields.
pub fn to_hex_data(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode a `0x`-prefixed hex data field.
pub fn from_hex_data(raw: &str) -> Result<Vec<u8>, AbiError> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    hex::decode(digits).map_err(|e| AbiError::Hex(e.to_string()))
}

/// Parse a JSON-RPC hex quantity such as `"0x1a"`.
pub fn parse_quantity(raw: &str) -> Result<u64, AbiError> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    if digits.is_empty() {
        return Err(AbiError::Hex(format!("empty quantity {raw:?}")));
    }
    u64::from_str_radix(digits, 16).map_err(|e| AbiError::Hex(format!("{raw:?}: {e}")))
}
