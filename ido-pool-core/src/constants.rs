//! Network and program constants.

use solana_program::pubkey;
use solana_program::pubkey::Pubkey;

/// Public mainnet-beta RPC endpoint.
pub const MAINNET_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Commitment used for preflight and confirmation unless overridden.
pub const DEFAULT_COMMITMENT: &str = "processed";

/// Serum-style multisig program that owns the pool's distribution authority.
pub const MULTISIG_PROGRAM_ID: Pubkey = pubkey!("A9HAbnCwoD6f2NkZobKFf6buJoN9gUVVvX5PoUnDHS6u");

/// The only payer the pool program accepts for admin instructions.
pub const ALLOWED_DEPLOYER: Pubkey = pubkey!("9urEjHV3Wm4Pv4Da8uuufRoAuLT9FNAm97wHy3qF9pYy");

/// A multisig account together with the PDA that signs on its behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultisigPreset {
    pub account: Pubkey,
    pub authority: Pubkey,
}

/// Mainnet production multisig.
pub const PRODUCTION_MULTISIG: MultisigPreset = MultisigPreset {
    account: pubkey!("GZXtZrRTaazATgJpWKReqUEYE6L2CSQRHkFnXQDPA2vD"),
    authority: pubkey!("5jwBGfXVpcEY9Hqmw2hCu77NMnoMeVKzgKCChf82d1Te"),
};

/// Mainnet test multisig.
pub const TEST_MULTISIG: MultisigPreset = MultisigPreset {
    account: pubkey!("2xg5VUVr7sPeeuqXdTNghxg2eMqv54JDdLHRjnfigN9p"),
    authority: pubkey!("EkBHKeUfLdJ26oyLSAbKVxzGCRSM4oAmV9GYumS7r7gS"),
};

// ─── Default sale schedule ───────────────────────────────────────

/// Offset from now for the default sale start.
pub const DEFAULT_START_DELAY_SECS: i64 = 60;
/// Default length of the deposit window.
pub const DEFAULT_DEPOSIT_DURATION_SECS: i64 = 24 * 60 * 60;
/// Default length of the withdraw-only window.
pub const DEFAULT_CANCEL_DURATION_SECS: i64 = 24 * 60 * 60;
/// Offset from now for the default watermelon withdraw time.
pub const DEFAULT_WITHDRAW_DELAY_SECS: i64 = 3 * 24 * 60 * 60;

// ─── Multisig transaction account sizes ──────────────────────────

/// Transaction account size for a `modify_ido_time` proposal.
pub const MODIFY_TIME_TX_SIZE: usize = 250;
/// Transaction account size for an `initialize_pool` proposal.
pub const INIT_POOL_TX_SIZE: usize = 590;
/// Transaction account size for a withdraw proposal.
pub const WITHDRAW_TX_SIZE: usize = 400;

/// Decimals assumed for bid amounts when no mint is available.
pub const DEFAULT_BID_DECIMALS: u8 = 6;

/// Rough size of a multisig transaction account holding `ix`.
///
/// `100 + 34 * accounts + data_len`, never below `floor`.
pub fn proposal_account_size(account_count: usize, data_len: usize, floor: usize) -> usize {
    (100 + 34 * account_count + data_len).max(floor)
}
