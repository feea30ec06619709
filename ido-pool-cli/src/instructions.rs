//! Constructors for every pool program instruction, plus the SPL token
//! setup a new pool needs.

use ido_pool_core::idl::AnchorIdl;
use ido_pool_core::types::IdoSchedule;
use solana_sdk::instruction::Instruction;
use solana_sdk::program_pack::Pack;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::{system_instruction, sysvar};

use crate::error::CliResult;
use crate::tx::InstructionBuilder;

/// Accounts of `initialize_pool`.
#[derive(Debug, Clone, Copy)]
pub struct InitPoolAccounts {
    pub pool_account: Pubkey,
    pub pool_signer: Pubkey,
    pub redeemable_mint: Pubkey,
    pub usdc_mint: Pubkey,
    pub watermelon_mint: Pubkey,
    pub pool_watermelon: Pubkey,
    pub pool_usdc: Pubkey,
    pub distribution_authority: Pubkey,
    pub payer: Pubkey,
    pub creator_watermelon: Pubkey,
}

/// `num_ido_tokens` travels as a decimal string of base units.
pub fn initialize_pool(
    idl: &AnchorIdl,
    program_id: Pubkey,
    accounts: &InitPoolAccounts,
    num_ido_tokens: u64,
    nonce: u8,
    schedule: &IdoSchedule,
) -> CliResult<Instruction> {
    with_schedule(InstructionBuilder::new(idl, program_id, "initializePool")?, schedule)
        .account("poolAccount", accounts.pool_account)
        .account("poolSigner", accounts.pool_signer)
        .account("redeemableMint", accounts.redeemable_mint)
        .account("usdcMint", accounts.usdc_mint)
        .account("watermelonMint", accounts.watermelon_mint)
        .account("poolWatermelon", accounts.pool_watermelon)
        .account("poolUsdc", accounts.pool_usdc)
        .account("distributionAuthority", accounts.distribution_authority)
        .account("payer", accounts.payer)
        .account("creatorWatermelon", accounts.creator_watermelon)
        .account("tokenProgram", spl_token::id())
        .account("rent", sysvar::rent::ID)
        .account("clock", sysvar::clock::ID)
        .arg("numIdoTokens", num_ido_tokens.to_string())
        .arg("nonce", nonce)
        .build()
}

pub fn modify_ido_time(
    idl: &AnchorIdl,
    program_id: Pubkey,
    pool_account: Pubkey,
    distribution_authority: Pubkey,
    payer: Pubkey,
    schedule: &IdoSchedule,
) -> CliResult<Instruction> {
    with_schedule(InstructionBuilder::new(idl, program_id, "modifyIdoTime")?, schedule)
        .account("poolAccount", pool_account)
        .account("distributionAuthority", distribution_authority)
        .account("payer", payer)
        .build()
}

fn with_schedule<'a>(builder: InstructionBuilder<'a>, schedule: &IdoSchedule) -> InstructionBuilder<'a> {
    builder
        .arg("startIdoTs", schedule.start_ido_ts)
        .arg("endDepositsTs", schedule.end_deposits_ts)
        .arg("endIdoTs", schedule.end_ido_ts)
        .arg("withdrawMelonTs", schedule.withdraw_melon_ts)
}

/// Accounts shared by the user-side exchange instructions.
#[derive(Debug, Clone, Copy)]
pub struct ExchangeAccounts {
    pub pool_account: Pubkey,
    pub pool_signer: Pubkey,
    pub redeemable_mint: Pubkey,
    pub user_authority: Pubkey,
    pub user_redeemable: Pubkey,
}

/// Deposit USDC, mint redeemable tokens 1:1.
pub fn exchange_usdc_for_redeemable(
    idl: &AnchorIdl,
    program_id: Pubkey,
    accounts: &ExchangeAccounts,
    pool_usdc: Pubkey,
    user_usdc: Pubkey,
    amount: u64,
) -> CliResult<Instruction> {
    exchange(idl, program_id, "exchangeUsdcForRedeemable", accounts)?
        .account("poolUsdc", pool_usdc)
        .account("userUsdc", user_usdc)
        .arg("amount", amount)
        .build()
}

/// Burn redeemable tokens, get USDC back 1:1.
pub fn exchange_redeemable_for_usdc(
    idl: &AnchorIdl,
    program_id: Pubkey,
    accounts: &ExchangeAccounts,
    pool_usdc: Pubkey,
    user_usdc: Pubkey,
    amount: u64,
) -> CliResult<Instruction> {
    exchange(idl, program_id, "exchangeRedeemableForUsdc", accounts)?
        .account("poolUsdc", pool_usdc)
        .account("userUsdc", user_usdc)
        .arg("amount", amount)
        .build()
}

/// Burn redeemable tokens for a pro-rata share of the sale tokens.
pub fn exchange_redeemable_for_watermelon(
    idl: &AnchorIdl,
    program_id: Pubkey,
    accounts: &ExchangeAccounts,
    pool_watermelon: Pubkey,
    user_watermelon: Pubkey,
    amount: u64,
) -> CliResult<Instruction> {
    exchange(idl, program_id, "exchangeRedeemableForWatermelon", accounts)?
        .account("poolWatermelon", pool_watermelon)
        .account("userWatermelon", user_watermelon)
        .arg("amount", amount)
        .build()
}

fn exchange<'a>(
    idl: &'a AnchorIdl,
    program_id: Pubkey,
    name: &str,
    accounts: &ExchangeAccounts,
) -> CliResult<InstructionBuilder<'a>> {
    Ok(InstructionBuilder::new(idl, program_id, name)?
        .account("poolAccount", accounts.pool_account)
        .account("poolSigner", accounts.pool_signer)
        .account("redeemableMint", accounts.redeemable_mint)
        .account("userAuthority", accounts.user_authority)
        .account("userRedeemable", accounts.user_redeemable)
        .account("tokenProgram", spl_token::id())
        .account("clock", sysvar::clock::ID))
}

/// Which pool vault an authority withdrawal drains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawAsset {
    Usdc,
    Watermelon,
}

impl WithdrawAsset {
    pub fn instruction_name(self) -> &'static str {
        match self {
            WithdrawAsset::Usdc => "withdrawPoolUsdc",
            WithdrawAsset::Watermelon => "withdrawPoolWatermelon",
        }
    }
}

/// Accounts of `withdraw_pool_usdc` / `withdraw_pool_watermelon`.
#[derive(Debug, Clone, Copy)]
pub struct WithdrawAccounts {
    pub pool_account: Pubkey,
    pub pool_signer: Pubkey,
    /// `pool_usdc` or `pool_watermelon`
    pub pool_vault: Pubkey,
    pub distribution_authority: Pubkey,
    pub payer: Pubkey,
    /// `creator_usdc` or `creator_watermelon`
    pub receiver: Pubkey,
}

pub fn withdraw(
    idl: &AnchorIdl,
    program_id: Pubkey,
    asset: WithdrawAsset,
    accounts: &WithdrawAccounts,
    amount: u64,
) -> CliResult<Instruction> {
    let (vault, receiver) = match asset {
        WithdrawAsset::Usdc => ("poolUsdc", "creatorUsdc"),
        WithdrawAsset::Watermelon => ("poolWatermelon", "creatorWatermelon"),
    };
    InstructionBuilder::new(idl, program_id, asset.instruction_name())?
        .account("poolAccount", accounts.pool_account)
        .account("poolSigner", accounts.pool_signer)
        .account(vault, accounts.pool_vault)
        .account("distributionAuthority", accounts.distribution_authority)
        .account("payer", accounts.payer)
        .account(receiver, accounts.receiver)
        .account("tokenProgram", spl_token::id())
        .account("clock", sysvar::clock::ID)
        .arg("amount", amount)
        .build()
}

/// Addresses and rent for the token accounts a new pool needs.
#[derive(Debug, Clone, Copy)]
pub struct PoolTokenSetup {
    pub payer: Pubkey,
    pub pool_signer: Pubkey,
    pub usdc_mint: Pubkey,
    pub usdc_decimals: u8,
    pub watermelon_mint: Pubkey,
    pub redeemable_mint: Pubkey,
    pub pool_watermelon: Pubkey,
    pub pool_usdc: Pubkey,
    pub mint_rent: u64,
    pub account_rent: u64,
}

/// Create the redeemable mint (same decimals as USDC) and the pool's two
/// vaults, all controlled by the pool signer.
///
/// The redeemable mint and both vaults must sign.
pub fn token_setup_instructions(setup: &PoolTokenSetup) -> CliResult<Vec<Instruction>> {
    let token_program = spl_token::id();
    let mut ixs = vec![
        system_instruction::create_account(
            &setup.payer,
            &setup.redeemable_mint,
            setup.mint_rent,
            spl_token::state::Mint::LEN as u64,
            &token_program,
        ),
        spl_token::instruction::initialize_mint(
            &token_program,
            &setup.redeemable_mint,
            &setup.pool_signer,
            None,
            setup.usdc_decimals,
        )?,
    ];
    for (account, mint) in [
        (setup.pool_watermelon, setup.watermelon_mint),
        (setup.pool_usdc, setup.usdc_mint),
    ] {
        ixs.push(system_instruction::create_account(
            &setup.payer,
            &account,
            setup.account_rent,
            spl_token::state::Account::LEN as u64,
            &token_program,
        ));
        ixs.push(spl_token::instruction::initialize_account(
            &token_program,
            &account,
            &mint,
            &setup.pool_signer,
        )?);
    }
    Ok(ixs)
}

/// Allocate the pool state account, owned by the pool program.
pub fn create_pool_account(
    payer: &Pubkey,
    pool_account: &Pubkey,
    lamports: u64,
    program_id: &Pubkey,
) -> Instruction {
    system_instruction::create_account(
        payer,
        pool_account,
        lamports,
        ido_pool_core::types::PoolAccount::SPACE as u64,
        program_id,
    )
}
