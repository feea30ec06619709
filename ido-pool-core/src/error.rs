//! Error types for the IDO pool client.
//!
//! [`PoolError`] mirrors the custom error codes the pool program returns,
//! so failed transactions and preflight checks report the same message.
//! [`CoreError`] covers everything that can go wrong on the client side
//! before a request reaches the network.

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Custom errors raised by the IDO pool program.
///
/// Anchor numbers user errors from 300 in the program version this client
/// targets, in declaration order.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    #[error("IDO must start in the future")]
    IdoFuture,
    #[error("IDO times are non-sequential")]
    SeqTimes,
    #[error("IDO has not started")]
    StartIdoTime,
    #[error("Deposits period has ended")]
    EndDepositsTime,
    #[error("IDO has ended")]
    EndIdoTime,
    #[error("IDO has not finished yet")]
    IdoNotOver,
    #[error("Insufficient USDC")]
    LowUsdc,
    #[error("Insufficient redeemable tokens")]
    LowRedeemable,
    #[error("USDC total and redeemable total don't match")]
    UsdcNotEqRedeem,
    #[error("Given nonce is invalid")]
    InvalidNonce,
    #[error("Invalid param")]
    InvalidParam,
    #[error("Cannot withdraw USDC after depositing")]
    UsdcWithdrawNotAllowed,
    #[error("Tokens still need to be redeemed")]
    WithdrawTokensNotAllowed,
}

impl PoolError {
    /// First custom error code.
    pub const BASE_CODE: u32 = 300;

    const ALL: [PoolError; 13] = [
        PoolError::IdoFuture,
        PoolError::SeqTimes,
        PoolError::StartIdoTime,
        PoolError::EndDepositsTime,
        PoolError::EndIdoTime,
        PoolError::IdoNotOver,
        PoolError::LowUsdc,
        PoolError::LowRedeemable,
        PoolError::UsdcNotEqRedeem,
        PoolError::InvalidNonce,
        PoolError::InvalidParam,
        PoolError::UsdcWithdrawNotAllowed,
        PoolError::WithdrawTokensNotAllowed,
    ];

    /// Numeric code as seen in `InstructionError::Custom`.
    pub fn code(&self) -> u32 {
        Self::BASE_CODE + *self as u32
    }

    /// Map a custom program error code back to its variant.
    pub fn from_code(code: u32) -> Option<Self> {
        let index = code.checked_sub(Self::BASE_CODE)? as usize;
        Self::ALL.get(index).copied()
    }
}

/// Client-side errors raised before anything is sent.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Bundled or user-supplied IDL is not valid JSON for the expected shape
    #[error("Invalid IDL: {0}")]
    InvalidIdl(#[from] serde_json::Error),

    #[error("Instruction '{0}' not found in IDL")]
    UnknownInstruction(String),

    #[error("Type '{0}' not found in IDL")]
    UnknownType(String),

    /// Account data is shorter than the expected layout
    #[error("Account data too short: expected at least {expected} bytes, got {actual}")]
    AccountTooShort { expected: usize, actual: usize },

    /// First 8 bytes don't match the account discriminator
    #[error("Account is not a {account}: discriminator mismatch")]
    DiscriminatorMismatch { account: String },

    #[error("Account is owned by {actual}, expected {expected}")]
    InvalidOwner { expected: String, actual: String },

    #[error("Failed to deserialize {account}: {message}")]
    Deserialization { account: String, message: String },

    #[error("Failed to serialize {account}: {message}")]
    Serialization { account: String, message: String },

    #[error("Arithmetic overflow: {operation}")]
    Overflow { operation: String },

    /// A preflight check that mirrors a program rule failed
    #[error("{} (code {})", .0, .0.code())]
    Pool(#[from] PoolError),
}

impl CoreError {
    pub fn overflow(operation: impl Into<String>) -> Self {
        CoreError::Overflow {
            operation: operation.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_declaration_order() {
        assert_eq!(PoolError::IdoFuture.code(), 300);
        assert_eq!(PoolError::InvalidParam.code(), 310);
        assert_eq!(PoolError::WithdrawTokensNotAllowed.code(), 312);
    }

    #[test]
    fn test_from_code() {
        assert_eq!(PoolError::from_code(301), Some(PoolError::SeqTimes));
        assert_eq!(PoolError::from_code(311), Some(PoolError::UsdcWithdrawNotAllowed));
        assert_eq!(PoolError::from_code(299), None);
        assert_eq!(PoolError::from_code(313), None);
    }

    #[test]
    fn test_pool_error_display_includes_code() {
        let err = CoreError::from(PoolError::SeqTimes);
        assert_eq!(err.to_string(), "IDO times are non-sequential (code 301)");
    }
}
