//! Command-line surface: argument table, IDL help output, display helpers.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Local, SecondsFormat, Utc};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use ido_pool_core::constants::{
    DEFAULT_CANCEL_DURATION_SECS, DEFAULT_DEPOSIT_DURATION_SECS, DEFAULT_START_DELAY_SECS,
    DEFAULT_WITHDRAW_DELAY_SECS, MAINNET_RPC_URL,
};
use ido_pool_core::error::CoreResult;
use ido_pool_core::idl::{camel_to_snake, AnchorIdl, IdlInstruction, IdlType};
use ido_pool_core::types::IdoSchedule;
use solana_sdk::pubkey::Pubkey;

use crate::encoding::decode_pubkey;

#[derive(Debug, Parser)]
#[command(name = "ido-pool", version, about = "Client for the IDO pool and its multisig authority")]
pub struct Opt {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// RPC endpoint
    #[arg(short = 'u', long, env = "IDO_POOL_RPC_URL", default_value = MAINNET_RPC_URL, global = true)]
    pub url: String,

    /// Wallet keypair file [default: ~/.config/solana/id.json]
    #[arg(short = 'k', long, env = "IDO_POOL_KEYPAIR", global = true)]
    pub keypair: Option<PathBuf>,

    /// Deployed IDO pool program
    #[arg(long, env = "IDO_POOL_PROGRAM_ID", value_parser = decode_pubkey, global = true)]
    pub program_id: Option<Pubkey>,

    /// Which multisig proposals are sent to
    #[arg(long, value_enum, default_value_t = MultisigPresetArg::Production, global = true)]
    pub multisig_preset: MultisigPresetArg,

    /// Override the preset's multisig account
    #[arg(long, value_parser = decode_pubkey, global = true)]
    pub multisig: Option<Pubkey>,

    /// Override the preset's multisig signer (the pool's distribution authority)
    #[arg(long, value_parser = decode_pubkey, global = true)]
    pub multisig_authority: Option<Pubkey>,

    /// Override the multisig program
    #[arg(long, value_parser = decode_pubkey, global = true)]
    pub multisig_program_id: Option<Pubkey>,

    #[arg(long, value_enum, default_value_t = Commitment::Processed, global = true)]
    pub commitment: Commitment,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MultisigPresetArg {
    Production,
    Test,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IdlProgram {
    IdoPool,
    Multisig,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Initialize an IDO pool with the wallet as distribution authority
    Init {
        #[command(flatten)]
        pool: NewPoolArgs,
        /// distributionAuthority (must be the wallet)
        #[arg(value_parser = decode_pubkey)]
        authority: Pubkey,
    },

    /// Propose initializing an IDO pool through the multisig
    MultisigInit {
        #[command(flatten)]
        pool: NewPoolArgs,
        #[arg(long)]
        dry_run: bool,
    },

    /// Propose new sale times through the multisig
    MultisigModifyPoolTime {
        /// the token sale pool account 🏦
        #[arg(value_parser = decode_pubkey)]
        pool_account: Pubkey,
        #[arg(allow_negative_numbers = true)]
        start_ido: i64,
        #[arg(allow_negative_numbers = true)]
        end_deposits: i64,
        #[arg(allow_negative_numbers = true)]
        end_ido: i64,
        #[arg(allow_negative_numbers = true)]
        withdraw_melon: i64,
        #[arg(long)]
        dry_run: bool,
    },

    /// Place or adjust a bid in an IDO sale
    Bid {
        /// the token sale pool account 🏦
        #[arg(value_parser = decode_pubkey)]
        pool_account: Pubkey,
        /// the account supplying the token sale bids 💵
        #[arg(value_parser = decode_pubkey)]
        usdc_account: Pubkey,
        /// the total bid for this sale 💵
        usdc_amount: String,
        /// the account receiving the redeemable pool token
        #[arg(value_parser = decode_pubkey)]
        redeemable_account: Pubkey,
    },

    /// Exchange redeemable tokens for the sale token once the IDO is over
    Redeem {
        /// the token sale pool account 🏦
        #[arg(value_parser = decode_pubkey)]
        pool_account: Pubkey,
        /// the account holding the redeemable pool token
        #[arg(value_parser = decode_pubkey)]
        redeemable_account: Pubkey,
        /// the account receiving the token for sale 🍉
        #[arg(value_parser = decode_pubkey)]
        watermelon_account: Pubkey,
        /// amount of redeemable tokens [default: whole balance]
        amount: Option<String>,
    },

    /// Print the pool config
    Inspect {
        /// the token sale pool account 🏦
        #[arg(value_parser = decode_pubkey)]
        pool_account: Pubkey,
    },

    /// Withdraw all pool USDC to the wallet's associated token account
    WithdrawUsdc {
        /// the token sale pool account 🏦
        #[arg(value_parser = decode_pubkey)]
        pool_account: Pubkey,
    },

    /// Propose withdrawing pool USDC through the multisig
    CreateMultisigTxWithdrawUsdc {
        #[command(flatten)]
        withdraw: WithdrawArgs,
    },

    /// Propose withdrawing unsold sale tokens through the multisig
    CreateMultisigTxWithdrawWatermelon {
        #[command(flatten)]
        withdraw: WithdrawArgs,
    },

    /// Print the pool signer PDA for a sale token mint
    PoolSigner {
        /// the mint of the token for sale 🍉
        #[arg(value_parser = decode_pubkey)]
        watermelon_mint: Pubkey,
    },

    /// Print the bundled IDL
    Idl {
        #[arg(value_enum, default_value_t = IdlProgram::IdoPool)]
        program: IdlProgram,
        /// Show one instruction in detail
        instruction: Option<String>,
        /// Print the raw IDL JSON
        #[arg(long, conflicts_with = "instruction")]
        json: bool,
    },

    /// Encode any IDL instruction without sending it
    Encode {
        #[arg(value_enum)]
        program: IdlProgram,
        instruction: String,
        /// --<account-or-arg> <VALUE> pairs
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

/// Positionals and schedule shared by `init` and `multisig-init`.
#[derive(Debug, Args)]
pub struct NewPoolArgs {
    /// the mint of the token sale bids 💵
    #[arg(value_parser = decode_pubkey)]
    pub usdc_mint: Pubkey,
    /// the mint of the token for sale 🍉
    #[arg(value_parser = decode_pubkey)]
    pub watermelon_mint: Pubkey,
    /// the account supplying the token for sale 🍉
    #[arg(value_parser = decode_pubkey)]
    pub watermelon_account: Pubkey,
    /// the amount of tokens offered in this sale 🍉
    pub watermelon_amount: String,
    #[command(flatten)]
    pub schedule: ScheduleOpts,
}

#[derive(Debug, Args)]
pub struct ScheduleOpts {
    /// the unix time at which the token sale is starting [default: now + 60s]
    #[arg(long, alias = "start_time")]
    pub start_time: Option<i64>,
    /// the number of seconds users can deposit into the pool
    #[arg(long, alias = "deposit_duration", default_value_t = DEFAULT_DEPOSIT_DURATION_SECS)]
    pub deposit_duration: i64,
    /// the number of seconds users can withdraw from the pool to cancel their bid
    #[arg(long, alias = "cancel_duration", default_value_t = DEFAULT_CANCEL_DURATION_SECS)]
    pub cancel_duration: i64,
    /// the timestamp users can withdraw watermelon from pool after ido over [default: now + 3 days]
    #[arg(long, alias = "withdraw_ts")]
    pub withdraw_ts: Option<i64>,
}

impl ScheduleOpts {
    pub fn resolve(&self, now: i64) -> CoreResult<IdoSchedule> {
        IdoSchedule::from_durations(
            self.start_time.unwrap_or(now + DEFAULT_START_DELAY_SECS),
            self.deposit_duration,
            self.cancel_duration,
            self.withdraw_ts.unwrap_or(now + DEFAULT_WITHDRAW_DELAY_SECS),
        )
    }
}

#[derive(Debug, Args)]
pub struct WithdrawArgs {
    /// the token sale pool account 🏦
    #[arg(value_parser = decode_pubkey)]
    pub pool_account: Pubkey,
    /// spl token account
    #[arg(value_parser = decode_pubkey)]
    pub receiver: Pubkey,
    /// token amount in minimum unit
    pub amount: u64,
    #[arg(long)]
    pub dry_run: bool,
}

// ─── IDL help ────────────────────────────────────────────────────

/// Print every instruction of an IDL with its accounts and args.
pub fn print_idl(idl: &AnchorIdl) {
    println!("🔧 {} v{}", idl.name, idl.version);
    println!();
    println!("INSTRUCTIONS:");
    for ix in &idl.instructions {
        let args_desc: Vec<String> = ix.args.iter()
            .map(|a| format!("{}: {}", a.name, idl_type_display(&a.type_)))
            .collect();
        println!("  {:<34} ({})", snake_to_kebab(&camel_to_snake(&ix.name)), args_desc.join(", "));
    }
    if !idl.errors.is_empty() {
        println!();
        println!("ERRORS:");
        for err in &idl.errors {
            println!("  {:>5}  {:<26} {}", err.code, err.name, err.msg.as_deref().unwrap_or(""));
        }
    }
}

/// Print detailed help for a single instruction.
pub fn print_instruction_help(ix: &IdlInstruction) {
    println!("📋 {} — {} account(s), {} arg(s)", ix.name, ix.accounts.len(), ix.args.len());
    println!();
    println!("ACCOUNTS:");
    for (i, acc) in ix.accounts.iter().enumerate() {
        let mut flags = vec![];
        if acc.is_mut { flags.push("mut"); }
        if acc.is_signer { flags.push("signer"); }
        let flags_str = if flags.is_empty() { String::new() } else { format!(" [{}]", flags.join(", ")) };
        println!("  {:>2} --{}{}", i, snake_to_kebab(&camel_to_snake(&acc.name)), flags_str);
    }
    println!();
    println!("ARGS:");
    for arg in &ix.args {
        println!("  --{:<25} {} ({}) — format: {}",
            snake_to_kebab(&camel_to_snake(&arg.name)), arg.name, idl_type_display(&arg.type_), idl_type_hint(&arg.type_));
    }
}

/// Parse `--key value` pairs into a map. A flag without a value maps to "true".
pub fn parse_instruction_args(args: &[String]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    let mut i = 0;
    while i < args.len() {
        if let Some(key) = args[i].strip_prefix("--") {
            if i + 1 < args.len() && !args[i + 1].starts_with("--") {
                map.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                map.insert(key.to_string(), "true".to_string());
                i += 1;
            }
        } else {
            i += 1;
        }
    }
    map
}

// ─── String utilities ────────────────────────────────────────────

pub fn snake_to_kebab(s: &str) -> String {
    s.replace('_', "-")
}

pub fn idl_type_display(ty: &IdlType) -> String {
    match ty {
        IdlType::Primitive(s) => s.clone(),
        IdlType::Vec { vec } => format!("Vec<{}>", idl_type_display(vec)),
        IdlType::Option { option } => format!("Option<{}>", idl_type_display(option)),
        IdlType::Defined { defined } => defined.clone(),
        IdlType::Array { array } => format!("[{}; {}]", idl_type_display(&array.0), array.1),
    }
}

pub fn idl_type_hint(ty: &IdlType) -> String {
    match ty {
        IdlType::Primitive(s) => match s.as_str() {
            "u8" | "u16" | "u32" | "u64" | "u128" | "i64" => "NUMBER".to_string(),
            "publicKey" => "BASE58|HEX".to_string(),
            "bytes" => "HEX".to_string(),
            "bool" => "true|false".to_string(),
            _ => s.to_uppercase(),
        },
        IdlType::Vec { vec } => format!("{},...", idl_type_hint(vec)),
        IdlType::Option { option } => format!("OPT<{}>|none", idl_type_hint(option)),
        IdlType::Defined { defined } => defined.clone(),
        IdlType::Array { array } => match &*array.0 {
            IdlType::Primitive(p) if p == "u8" => format!("HEX{}", array.1 * 2),
            _ => format!("[_; {}]", array.1),
        },
    }
}

// ─── Time display ────────────────────────────────────────────────

/// `2023-11-14T22:13:20Z local 2023-11-14 23:13:20 +01:00`
pub fn format_ts(ts: i64) -> String {
    match DateTime::<Utc>::from_timestamp(ts, 0) {
        Some(utc) => format!(
            "{} local {}",
            utc.to_rfc3339_opts(SecondsFormat::Secs, true),
            utc.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S %:z")
        ),
        None => "(out of range)".to_string(),
    }
}

/// Print the four sale timestamps, right-aligned under each other.
pub fn print_schedule(schedule: &IdoSchedule) {
    for (label, ts) in schedule.entries() {
        println!("{:>13} {} {}", label, ts, format_ts(ts));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_instruction_args() {
        let args: Vec<String> = ["--amount", "5", "--flag", "--pool-account", "abc"]
            .iter().map(|s| s.to_string()).collect();
        let map = parse_instruction_args(&args);
        assert_eq!(map.get("amount").map(String::as_str), Some("5"));
        assert_eq!(map.get("flag").map(String::as_str), Some("true"));
        assert_eq!(map.get("pool-account").map(String::as_str), Some("abc"));
    }

    #[test]
    fn test_schedule_defaults_are_relative_to_now() {
        let opts = ScheduleOpts {
            start_time: None,
            deposit_duration: DEFAULT_DEPOSIT_DURATION_SECS,
            cancel_duration: DEFAULT_CANCEL_DURATION_SECS,
            withdraw_ts: None,
        };
        let s = opts.resolve(1_000).unwrap();
        assert_eq!(s.start_ido_ts, 1_060);
        assert_eq!(s.end_deposits_ts, 1_060 + 86_400);
        assert_eq!(s.end_ido_ts, 1_060 + 2 * 86_400);
        assert_eq!(s.withdraw_melon_ts, 1_000 + 3 * 86_400);
    }

    #[test]
    fn test_format_ts_utc_part() {
        assert!(format_ts(0).starts_with("1970-01-01T00:00:00Z local "));
    }

    #[test]
    fn test_type_display() {
        let ty = IdlType::Vec {
            vec: Box::new(IdlType::Defined { defined: "TransactionAccount".into() }),
        };
        assert_eq!(idl_type_display(&ty), "Vec<TransactionAccount>");
    }

    #[test]
    fn test_underscore_option_aliases() {
        let opt = Opt::try_parse_from([
            "ido-pool", "multisig-init",
            "A9HAbnCwoD6f2NkZobKFf6buJoN9gUVVvX5PoUnDHS6u",
            "GZXtZrRTaazATgJpWKReqUEYE6L2CSQRHkFnXQDPA2vD",
            "5jwBGfXVpcEY9Hqmw2hCu77NMnoMeVKzgKCChf82d1Te",
            "1000",
            "--start_time", "1700000000",
            "--dry-run",
        ]).unwrap();
        match opt.command {
            Command::MultisigInit { pool, dry_run } => {
                assert!(dry_run);
                assert_eq!(pool.schedule.start_time, Some(1_700_000_000));
                assert_eq!(pool.watermelon_amount, "1000");
            }
            other => panic!("Expected MultisigInit, got {:?}", other),
        }
    }
}
