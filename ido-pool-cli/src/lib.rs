//! Command-line client for the IDO pool program and its multisig authority.
//!
//! Provides:
//! - IDL-driven instruction encoding (Anchor sighash + Borsh args)
//! - Pool signer PDA derivation
//! - Multisig proposal wrapping with base64 dry-run output
//! - Pool inspection and the bid / redeem / withdraw flows
//!
//! The `ido-pool` binary is a thin wrapper around [`run`].

pub mod cli;
pub mod config;
pub mod encoding;
pub mod error;
pub mod inspect;
pub mod instructions;
pub mod multisig;
pub mod parse;
pub mod pda;
pub mod pool;
pub mod rpc;
pub mod serialize;
pub mod tx;

use ido_pool_core::error::CoreError;
use ido_pool_core::idl::AnchorIdl;

use crate::cli::{Command, IdlProgram, Opt};
use crate::config::Settings;
use crate::error::CliResult;
use crate::rpc::Client;

/// Settings and bundled IDLs shared by every command.
pub struct Context {
    pub settings: Settings,
    pub pool_idl: AnchorIdl,
    pub multisig_idl: AnchorIdl,
}

impl Context {
    pub fn new(settings: Settings) -> CliResult<Self> {
        Ok(Self {
            settings,
            pool_idl: AnchorIdl::ido_pool()?,
            multisig_idl: AnchorIdl::multisig()?,
        })
    }

    pub fn idl(&self, program: IdlProgram) -> &AnchorIdl {
        match program {
            IdlProgram::IdoPool => &self.pool_idl,
            IdlProgram::Multisig => &self.multisig_idl,
        }
    }

    /// Connect with the configured wallet.
    pub fn client(&self) -> CliResult<Client> {
        let payer = self.settings.load_keypair()?;
        let mut known_programs = vec![(self.settings.multisig_program_id, self.multisig_idl.clone())];
        if let Some(program_id) = self.settings.program_id {
            known_programs.push((program_id, self.pool_idl.clone()));
        }
        Ok(Client::new(&self.settings, payer, known_programs))
    }
}

pub async fn run(opt: Opt) -> CliResult<()> {
    let ctx = Context::new(Settings::from_opts(&opt.global)?)?;

    match opt.command {
        Command::Init { pool, authority } => pool::init(&ctx, &pool, authority).await,
        Command::MultisigInit { pool, dry_run } => multisig::init_pool(&ctx, &pool, dry_run).await,
        Command::MultisigModifyPoolTime {
            pool_account,
            start_ido,
            end_deposits,
            end_ido,
            withdraw_melon,
            dry_run,
        } => {
            let schedule = ido_pool_core::types::IdoSchedule {
                start_ido_ts: start_ido,
                end_deposits_ts: end_deposits,
                end_ido_ts: end_ido,
                withdraw_melon_ts: withdraw_melon,
            };
            multisig::modify_pool_time(&ctx, pool_account, &schedule, dry_run).await
        }
        Command::Bid {
            pool_account,
            usdc_account,
            usdc_amount,
            redeemable_account,
        } => pool::bid(&ctx, pool_account, usdc_account, &usdc_amount, redeemable_account).await,
        Command::Redeem {
            pool_account,
            redeemable_account,
            watermelon_account,
            amount,
        } => {
            pool::redeem(&ctx, pool_account, redeemable_account, watermelon_account, amount.as_deref()).await
        }
        Command::Inspect { pool_account } => pool::inspect(&ctx, pool_account).await,
        Command::WithdrawUsdc { pool_account } => pool::withdraw_usdc(&ctx, pool_account).await,
        Command::CreateMultisigTxWithdrawUsdc { withdraw } => {
            multisig::withdraw(&ctx, instructions::WithdrawAsset::Usdc, &withdraw).await
        }
        Command::CreateMultisigTxWithdrawWatermelon { withdraw } => {
            multisig::withdraw(&ctx, instructions::WithdrawAsset::Watermelon, &withdraw).await
        }
        Command::PoolSigner { watermelon_mint } => {
            let program_id = ctx.settings.program_id()?;
            let (signer, nonce) = pda::find_pool_signer(&watermelon_mint, &program_id);
            println!("poolSigner: {}", signer);
            println!("     nonce: {}", nonce);
            Ok(())
        }
        Command::Idl { program, instruction, json } => {
            let idl = ctx.idl(program);
            if json {
                println!("{}", idl.to_json_pretty().map_err(CoreError::from)?);
                return Ok(());
            }
            match instruction {
                Some(name) => cli::print_instruction_help(idl.instruction(&name)?),
                None => cli::print_idl(idl),
            }
            Ok(())
        }
        Command::Encode { program, instruction, args } => {
            let program_id = match program {
                IdlProgram::IdoPool => ctx.settings.program_id()?,
                IdlProgram::Multisig => ctx.settings.multisig_program_id,
            };
            let flags = cli::parse_instruction_args(&args);
            let builder = tx::InstructionBuilder::new(ctx.idl(program), program_id, &instruction)?
                .with_flags(&flags)?;
            let ix = builder.build()?;
            println!("📋 Instruction: {}", builder.idl_instruction().name);
            println!("program id: {}", ix.program_id);
            tx::print_account_table(builder.idl_instruction(), &ix);
            println!("instructionBase64: {}", encoding::base64_encode(&ix.data));
            Ok(())
        }
    }
}
