//! # IDO Pool Core
//!
//! Core types for talking to the IDO pool program and its multisig
//! authority: network constants, bundled Anchor IDLs, on-chain state
//! layouts and the preflight checks the client runs before sending.

pub mod constants;
pub mod error;
pub mod types;
pub mod idl;
pub mod validation;

pub mod prelude {
    pub use crate::error::{CoreError, CoreResult, PoolError};
    pub use crate::idl::{AnchorIdl, IdlType};
    pub use crate::types::{IdoSchedule, PoolAccount, PoolPhase, TransactionAccount};
    pub use solana_program::pubkey::Pubkey;
}
