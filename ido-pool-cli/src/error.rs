//! Error type for the command-line client.

use solana_client::client_error::ClientError;
use solana_sdk::program_error::ProgramError;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

use ido_pool_core::error::{CoreError, PoolError};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("RPC request failed: {0}")]
    Rpc(#[from] ClientError),

    /// A transaction was rejected by one of the programs it called
    #[error("Transaction failed in {program} (instruction {index}): {message}")]
    ProgramFailed {
        program: String,
        index: u8,
        message: String,
    },

    #[error("Failed to read keypair '{path}': {message}")]
    Keypair { path: String, message: String },

    #[error("Program id is required: pass --program-id or set IDO_POOL_PROGRAM_ID")]
    MissingProgramId,

    #[error("Invalid value for {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("Missing required arguments: {}", .0.join(", "))]
    MissingArguments(Vec<String>),

    #[error("Type mismatch for '{name}': expected {expected}, got {value}")]
    TypeMismatch {
        name: String,
        expected: String,
        value: String,
    },

    #[error("Account {0} not found")]
    AccountNotFound(Pubkey),

    #[error("Failed to unpack {kind} account {address}: {message}")]
    Unpack {
        kind: &'static str,
        address: Pubkey,
        message: String,
    },

    #[error("Failed to build token instruction: {0}")]
    TokenInstruction(#[from] ProgramError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn invalid_argument(name: impl Into<String>, message: impl Into<String>) -> Self {
        CliError::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl From<PoolError> for CliError {
    fn from(err: PoolError) -> Self {
        CliError::Core(err.into())
    }
}
