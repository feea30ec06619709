//! On-chain state layouts for the pool and multisig programs.

use std::fmt;

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::instruction::AccountMeta;
use solana_program::pubkey::Pubkey;

use crate::error::{CoreError, CoreResult};
use crate::idl::account_discriminator;

/// State of one token sale, as stored by the pool program.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct PoolAccount {
    pub redeemable_mint: Pubkey,
    pub pool_watermelon: Pubkey,
    pub watermelon_mint: Pubkey,
    pub pool_usdc: Pubkey,
    pub distribution_authority: Pubkey,
    pub nonce: u8,
    pub num_ido_tokens: u64,
    pub start_ido_ts: i64,
    pub end_deposits_ts: i64,
    pub end_ido_ts: i64,
    pub withdraw_melon_ts: i64,
}

impl PoolAccount {
    pub const NAME: &'static str = "PoolAccount";
    /// Borsh-encoded size of the fields.
    pub const LEN: usize = 32 * 5 + 1 + 8 + 8 * 4;
    /// Bytes to allocate for the account, discriminator included.
    pub const SPACE: usize = 8 + Self::LEN;

    /// Decode raw account data, discriminator included.
    pub fn decode(data: &[u8]) -> CoreResult<Self> {
        let body = check_discriminator(Self::NAME, data, Self::LEN)?;
        Self::deserialize(&mut &body[..]).map_err(|e| CoreError::Deserialization {
            account: Self::NAME.to_string(),
            message: e.to_string(),
        })
    }

    /// Encode with the discriminator, as the program would store it.
    pub fn encode(&self) -> CoreResult<Vec<u8>> {
        let body = borsh::to_vec(self).map_err(|e| CoreError::Serialization {
            account: Self::NAME.to_string(),
            message: e.to_string(),
        })?;
        let mut out = Vec::with_capacity(Self::SPACE);
        out.extend_from_slice(&account_discriminator(Self::NAME));
        out.extend_from_slice(&body);
        Ok(out)
    }

    pub fn schedule(&self) -> IdoSchedule {
        IdoSchedule {
            start_ido_ts: self.start_ido_ts,
            end_deposits_ts: self.end_deposits_ts,
            end_ido_ts: self.end_ido_ts,
            withdraw_melon_ts: self.withdraw_melon_ts,
        }
    }
}

/// Strip and verify the 8-byte Anchor discriminator.
fn check_discriminator<'a>(name: &str, data: &'a [u8], body_len: usize) -> CoreResult<&'a [u8]> {
    if data.len() < 8 + body_len {
        return Err(CoreError::AccountTooShort {
            expected: 8 + body_len,
            actual: data.len(),
        });
    }
    if data[..8] != account_discriminator(name) {
        return Err(CoreError::DiscriminatorMismatch {
            account: name.to_string(),
        });
    }
    Ok(&data[8..])
}

/// Account meta as the multisig program stores it inside a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct TransactionAccount {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl From<&AccountMeta> for TransactionAccount {
    fn from(meta: &AccountMeta) -> Self {
        Self {
            pubkey: meta.pubkey,
            is_signer: meta.is_signer,
            is_writable: meta.is_writable,
        }
    }
}

/// The four timestamps that gate a sale, in unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdoSchedule {
    pub start_ido_ts: i64,
    pub end_deposits_ts: i64,
    pub end_ido_ts: i64,
    pub withdraw_melon_ts: i64,
}

impl IdoSchedule {
    /// Build a schedule from a start time and two window lengths.
    pub fn from_durations(
        start_ido_ts: i64,
        deposit_duration: i64,
        cancel_duration: i64,
        withdraw_melon_ts: i64,
    ) -> CoreResult<Self> {
        let end_deposits_ts = start_ido_ts
            .checked_add(deposit_duration)
            .ok_or_else(|| CoreError::overflow("start_time + deposit_duration"))?;
        let end_ido_ts = end_deposits_ts
            .checked_add(cancel_duration)
            .ok_or_else(|| CoreError::overflow("end_deposits + cancel_duration"))?;
        Ok(Self {
            start_ido_ts,
            end_deposits_ts,
            end_ido_ts,
            withdraw_melon_ts,
        })
    }

    /// Labelled timestamps in chronological order.
    pub fn entries(&self) -> [(&'static str, i64); 4] {
        [
            ("startIdoTs", self.start_ido_ts),
            ("endDepositsTs", self.end_deposits_ts),
            ("endIdoTs", self.end_ido_ts),
            ("withdrawTs", self.withdraw_melon_ts),
        ]
    }

    /// Which window of the sale `now` falls in, using the program's bounds.
    pub fn phase_at(&self, now: i64) -> PoolPhase {
        if now <= self.start_ido_ts {
            PoolPhase::Upcoming
        } else if now < self.end_deposits_ts {
            PoolPhase::Deposits
        } else if now < self.end_ido_ts {
            PoolPhase::WithdrawOnly
        } else if now <= self.withdraw_melon_ts {
            PoolPhase::Closed
        } else {
            PoolPhase::Redeemable
        }
    }
}

/// Sale windows, in the order a pool moves through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolPhase {
    Upcoming,
    Deposits,
    WithdrawOnly,
    Closed,
    Redeemable,
}

impl fmt::Display for PoolPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PoolPhase::Upcoming => "upcoming (sale has not started)",
            PoolPhase::Deposits => "deposits open",
            PoolPhase::WithdrawOnly => "withdraw-only",
            PoolPhase::Closed => "closed (waiting for redemption)",
            PoolPhase::Redeemable => "redeemable",
        };
        f.write_str(s)
    }
}
