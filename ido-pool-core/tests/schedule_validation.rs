//! Preflight schedule checks must agree with the program's own rules:
//! `initialize_pool` lets windows touch, `modify_ido_time` does not.

use ido_pool_core::constants::ALLOWED_DEPLOYER;
use ido_pool_core::error::{CoreError, PoolError};
use ido_pool_core::types::IdoSchedule;
use ido_pool_core::validation::{
    is_allowed_deployer, validate_amount, validate_init_schedule, validate_modify_schedule,
    verify_owner,
};
use solana_program::pubkey::Pubkey;

const NOW: i64 = 1_700_000_000;

fn schedule(start: i64, end_deposits: i64, end_ido: i64, withdraw: i64) -> IdoSchedule {
    IdoSchedule {
        start_ido_ts: start,
        end_deposits_ts: end_deposits,
        end_ido_ts: end_ido,
        withdraw_melon_ts: withdraw,
    }
}

#[test]
fn test_from_durations_chains_windows() {
    let s = IdoSchedule::from_durations(NOW + 60, 86_400, 3_600, NOW + 500_000).unwrap();
    assert_eq!(s.end_deposits_ts, NOW + 60 + 86_400);
    assert_eq!(s.end_ido_ts, NOW + 60 + 86_400 + 3_600);
    assert_eq!(s.withdraw_melon_ts, NOW + 500_000);
}

#[test]
fn test_from_durations_overflow() {
    let err = IdoSchedule::from_durations(i64::MAX - 10, 86_400, 0, i64::MAX).unwrap_err();
    assert!(matches!(err, CoreError::Overflow { .. }));
}

#[test]
fn test_init_accepts_touching_windows() {
    let s = schedule(NOW + 10, NOW + 20, NOW + 20, NOW + 20);
    assert!(validate_init_schedule(&s, NOW).is_ok());
}

#[test]
fn test_init_rejects_past_start() {
    let s = schedule(NOW, NOW + 20, NOW + 30, NOW + 40);
    assert_eq!(validate_init_schedule(&s, NOW), Err(PoolError::IdoFuture));
}

#[test]
fn test_init_rejects_empty_deposit_window() {
    let s = schedule(NOW + 10, NOW + 10, NOW + 30, NOW + 40);
    assert_eq!(validate_init_schedule(&s, NOW), Err(PoolError::SeqTimes));
}

#[test]
fn test_init_rejects_withdraw_before_end() {
    let s = schedule(NOW + 10, NOW + 20, NOW + 30, NOW + 25);
    assert_eq!(validate_init_schedule(&s, NOW), Err(PoolError::SeqTimes));
}

#[test]
fn test_modify_requires_strict_order() {
    assert!(validate_modify_schedule(&schedule(1, 2, 3, 4)).is_ok());
    assert_eq!(validate_modify_schedule(&schedule(1, 2, 2, 4)), Err(PoolError::SeqTimes));
    assert_eq!(validate_modify_schedule(&schedule(1, 2, 3, 3)), Err(PoolError::SeqTimes));
}

#[test]
fn test_modify_allows_past_start() {
    // Only initialization requires a future start.
    assert!(validate_modify_schedule(&schedule(NOW - 100, NOW - 50, NOW + 10, NOW + 20)).is_ok());
}

#[test]
fn test_zero_amount_is_invalid_param() {
    assert_eq!(validate_amount(0), Err(PoolError::InvalidParam));
    assert!(validate_amount(1).is_ok());
}

#[test]
fn test_allowed_deployer() {
    assert!(is_allowed_deployer(&ALLOWED_DEPLOYER));
    assert!(!is_allowed_deployer(&Pubkey::new_unique()));
}

#[test]
fn test_verify_owner() {
    let program = Pubkey::new_unique();
    assert!(verify_owner(&program, &program).is_ok());
    let err = verify_owner(&Pubkey::new_unique(), &program).unwrap_err();
    assert!(matches!(err, CoreError::InvalidOwner { .. }));
}
