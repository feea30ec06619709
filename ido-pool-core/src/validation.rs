//! Preflight checks.
//!
//! Each function mirrors a rule the pool program enforces, so a bad
//! request fails locally with the program's own error instead of costing
//! a transaction fee.

use solana_program::pubkey::Pubkey;

use crate::constants::ALLOWED_DEPLOYER;
use crate::error::{CoreError, PoolError};
use crate::types::IdoSchedule;

/// Schedule check for `initialize_pool`.
///
/// The start must lie in the future and the windows may touch:
/// `start < end_deposits <= end_ido <= withdraw`.
pub fn validate_init_schedule(schedule: &IdoSchedule, now: i64) -> Result<(), PoolError> {
    if now >= schedule.start_ido_ts {
        return Err(PoolError::IdoFuture);
    }
    if !(schedule.start_ido_ts < schedule.end_deposits_ts
        && schedule.end_deposits_ts <= schedule.end_ido_ts
        && schedule.end_ido_ts <= schedule.withdraw_melon_ts)
    {
        return Err(PoolError::SeqTimes);
    }
    Ok(())
}

/// Schedule check for `modify_ido_time`: strictly increasing.
pub fn validate_modify_schedule(schedule: &IdoSchedule) -> Result<(), PoolError> {
    if !(schedule.start_ido_ts < schedule.end_deposits_ts
        && schedule.end_deposits_ts < schedule.end_ido_ts
        && schedule.end_ido_ts < schedule.withdraw_melon_ts)
    {
        return Err(PoolError::SeqTimes);
    }
    Ok(())
}

/// Token amounts passed to the program must be non-zero.
pub fn validate_amount(amount: u64) -> Result<(), PoolError> {
    if amount == 0 {
        return Err(PoolError::InvalidParam);
    }
    Ok(())
}

/// Admin instructions are rejected unless paid by the allowed deployer.
pub fn is_allowed_deployer(payer: &Pubkey) -> bool {
    *payer == ALLOWED_DEPLOYER
}

/// Verify that a fetched account is owned by the expected program.
pub fn verify_owner(account_owner: &Pubkey, expected_owner: &Pubkey) -> Result<(), CoreError> {
    if account_owner != expected_owner {
        return Err(CoreError::InvalidOwner {
            expected: expected_owner.to_string(),
            actual: account_owner.to_string(),
        });
    }
    Ok(())
}
