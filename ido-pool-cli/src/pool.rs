//! Commands signed directly by the wallet: pool creation, bids,
//! redemption, inspection and the authority's USDC withdrawal.

use std::cmp::Ordering;

use chrono::Utc;
use ido_pool_core::constants::DEFAULT_BID_DECIMALS;
use ido_pool_core::error::PoolError;
use ido_pool_core::types::{IdoSchedule, PoolAccount};
use ido_pool_core::validation::{is_allowed_deployer, validate_amount, validate_init_schedule};
use solana_sdk::program_pack::Pack;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};
use spl_associated_token_account::instruction::create_associated_token_account_idempotent;
use tracing::{info, warn};

use crate::cli::NewPoolArgs;
use crate::error::{CliError, CliResult};
use crate::inspect::render_pool;
use crate::instructions::{
    self, ExchangeAccounts, InitPoolAccounts, PoolTokenSetup, WithdrawAccounts, WithdrawAsset,
};
use crate::parse::{format_ui_amount, parse_ui_amount};
use crate::pda::{associated_token_address, find_pool_signer, pool_signer_from_nonce};
use crate::rpc::Client;
use crate::Context;

/// Amount and schedule of a pool about to be created, preflight-checked.
pub(crate) struct NewPool {
    pub schedule: IdoSchedule,
    pub amount: u64,
    pub decimals: u8,
}

pub(crate) async fn prepare_new_pool(client: &Client, args: &NewPoolArgs) -> CliResult<NewPool> {
    let now = Utc::now().timestamp();
    let schedule = args.schedule.resolve(now)?;
    validate_init_schedule(&schedule, now)?;

    let decimals = client.fetch_mint(&args.watermelon_mint).await?.decimals;
    let amount = parse_ui_amount(&args.watermelon_amount, decimals, "watermelon_amount")?;
    validate_amount(amount)?;
    Ok(NewPool {
        schedule,
        amount,
        decimals,
    })
}

/// Accounts created for a pool before `initialize_pool`.
pub(crate) struct PoolVaults {
    pub redeemable_mint: Pubkey,
    pub pool_watermelon: Pubkey,
    pub pool_usdc: Pubkey,
}

/// Create the redeemable mint and both pool vaults in one transaction.
pub(crate) async fn create_pool_vaults(
    client: &Client,
    args: &NewPoolArgs,
    pool_signer: Pubkey,
) -> CliResult<PoolVaults> {
    let usdc_mint = client.fetch_mint(&args.usdc_mint).await?;
    let redeemable_mint = Keypair::new();
    let pool_watermelon = Keypair::new();
    let pool_usdc = Keypair::new();

    let setup = instructions::token_setup_instructions(&PoolTokenSetup {
        payer: client.payer(),
        pool_signer,
        usdc_mint: args.usdc_mint,
        usdc_decimals: usdc_mint.decimals,
        watermelon_mint: args.watermelon_mint,
        redeemable_mint: redeemable_mint.pubkey(),
        pool_watermelon: pool_watermelon.pubkey(),
        pool_usdc: pool_usdc.pubkey(),
        mint_rent: client.rent_exempt(spl_token::state::Mint::LEN).await?,
        account_rent: client.rent_exempt(spl_token::state::Account::LEN).await?,
    })?;
    let signature = client
        .send(&setup, &[&redeemable_mint, &pool_watermelon, &pool_usdc])
        .await?;
    info!(%signature, "pool token accounts created");

    Ok(PoolVaults {
        redeemable_mint: redeemable_mint.pubkey(),
        pool_watermelon: pool_watermelon.pubkey(),
        pool_usdc: pool_usdc.pubkey(),
    })
}

pub(crate) fn print_initialize_args(new_pool: &NewPool, nonce: u8) {
    let s = &new_pool.schedule;
    println!(
        "initializePool {} {} {} {} {} {}",
        new_pool.amount, nonce, s.start_ido_ts, s.end_deposits_ts, s.end_ido_ts, s.withdraw_melon_ts
    );
}

/// Create a pool with the wallet as distribution authority.
///
/// Two transactions: the redeemable mint and pool vaults first, then the
/// pool account together with `initialize_pool`.
pub async fn init(ctx: &Context, args: &NewPoolArgs, authority: Pubkey) -> CliResult<()> {
    let program_id = ctx.settings.program_id()?;
    let client = ctx.client()?;
    let payer = client.payer();
    if authority != payer {
        return Err(CliError::invalid_argument(
            "authority",
            format!(
                "{} cannot sign for the pool; pass the wallet {} or use multisig-init",
                authority, payer
            ),
        ));
    }
    warn_if_not_deployer(&payer);

    let new_pool = prepare_new_pool(&client, args).await?;
    let (pool_signer, nonce) = find_pool_signer(&args.watermelon_mint, &program_id);
    let vaults = create_pool_vaults(&client, args, pool_signer).await?;

    print_initialize_args(&new_pool, nonce);
    let pool_account = Keypair::new();
    let ixs = vec![
        instructions::create_pool_account(
            &payer,
            &pool_account.pubkey(),
            client.rent_exempt(PoolAccount::SPACE).await?,
            &program_id,
        ),
        instructions::initialize_pool(
            &ctx.pool_idl,
            program_id,
            &InitPoolAccounts {
                pool_account: pool_account.pubkey(),
                pool_signer,
                redeemable_mint: vaults.redeemable_mint,
                usdc_mint: args.usdc_mint,
                watermelon_mint: args.watermelon_mint,
                pool_watermelon: vaults.pool_watermelon,
                pool_usdc: vaults.pool_usdc,
                distribution_authority: authority,
                payer,
                creator_watermelon: args.watermelon_account,
            },
            new_pool.amount,
            nonce,
            &new_pool.schedule,
        )?,
    ];
    client.send(&ixs, &[&pool_account]).await?;

    println!(
        "🏦 IDO pool initialized with {} tokens",
        format_ui_amount(new_pool.amount, new_pool.decimals)
    );
    println!("Pool Account: {}", pool_account.pubkey());
    println!("Pool Authority: {}", authority);
    println!("Redeem Mint: {}", vaults.redeemable_mint);
    println!("🍉 Account: {}", vaults.pool_watermelon);
    println!("💵 Account: {}", vaults.pool_usdc);
    Ok(())
}

/// How a bid moves from the current redeemable balance to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidChange {
    /// Deposit this much USDC.
    Increase(u64),
    /// Withdraw this much USDC.
    Decrease(u64),
    Unchanged,
}

pub fn bid_change(current: u64, target: u64) -> BidChange {
    match current.cmp(&target) {
        Ordering::Less => BidChange::Increase(target - current),
        Ordering::Greater => BidChange::Decrease(current - target),
        Ordering::Equal => BidChange::Unchanged,
    }
}

/// Move the wallet's bid to `usdc_amount`: deposit or withdraw the
/// difference against the current redeemable balance.
pub async fn bid(
    ctx: &Context,
    pool_account: Pubkey,
    usdc_account: Pubkey,
    usdc_amount: &str,
    redeemable_account: Pubkey,
) -> CliResult<()> {
    let program_id = ctx.settings.program_id()?;
    let client = ctx.client()?;
    let pool = client.fetch_pool(&pool_account, &program_id).await?;
    let (pool_signer, _) = find_pool_signer(&pool.watermelon_mint, &program_id);

    let decimals = bid_decimals(&client, &pool.redeemable_mint).await;
    let target = parse_ui_amount(usdc_amount, decimals, "usdc_amount")?;
    let current = client.fetch_token_account(&redeemable_account).await?.amount;

    let accounts = ExchangeAccounts {
        pool_account,
        pool_signer,
        redeemable_mint: pool.redeemable_mint,
        user_authority: client.payer(),
        user_redeemable: redeemable_account,
    };
    let ix = match bid_change(current, target) {
        BidChange::Increase(deposit) => {
            println!("increasing bid by {} 💵", format_ui_amount(deposit, decimals));
            instructions::exchange_usdc_for_redeemable(
                &ctx.pool_idl,
                program_id,
                &accounts,
                pool.pool_usdc,
                usdc_account,
                deposit,
            )?
        }
        BidChange::Decrease(withdrawal) => {
            println!("decreasing bid by {} 💵", format_ui_amount(withdrawal, decimals));
            instructions::exchange_redeemable_for_usdc(
                &ctx.pool_idl,
                program_id,
                &accounts,
                pool.pool_usdc,
                usdc_account,
                withdrawal,
            )?
        }
        BidChange::Unchanged => {
            println!("bid unchanged 💎");
            return Ok(());
        }
    };
    let signature = client.send(&[ix], &[]).await?;
    println!("txid: {}", signature);
    Ok(())
}

/// Redeemable tokens share the USDC mint's decimals; fall back to the
/// usual 6 if the mint can't be read.
async fn bid_decimals(client: &Client, redeemable_mint: &Pubkey) -> u8 {
    match client.fetch_mint(redeemable_mint).await {
        Ok(mint) => mint.decimals,
        Err(err) => {
            warn!(%redeemable_mint, %err, "could not read redeemable mint, assuming {} decimals", DEFAULT_BID_DECIMALS);
            DEFAULT_BID_DECIMALS
        }
    }
}

/// Exchange redeemable tokens for sale tokens, by default the whole
/// redeemable balance.
pub async fn redeem(
    ctx: &Context,
    pool_account: Pubkey,
    redeemable_account: Pubkey,
    watermelon_account: Pubkey,
    amount: Option<&str>,
) -> CliResult<()> {
    let program_id = ctx.settings.program_id()?;
    let client = ctx.client()?;
    let pool = client.fetch_pool(&pool_account, &program_id).await?;
    let pool_signer = pool_signer_from_nonce(&pool.watermelon_mint, pool.nonce, &program_id)?;

    let balance = client.fetch_token_account(&redeemable_account).await?.amount;
    let decimals = bid_decimals(&client, &pool.redeemable_mint).await;
    let amount = match amount {
        Some(raw) => parse_ui_amount(raw, decimals, "amount")?,
        None => balance,
    };
    validate_redeem(amount, balance)?;

    let ix = instructions::exchange_redeemable_for_watermelon(
        &ctx.pool_idl,
        program_id,
        &ExchangeAccounts {
            pool_account,
            pool_signer,
            redeemable_mint: pool.redeemable_mint,
            user_authority: client.payer(),
            user_redeemable: redeemable_account,
        },
        pool.pool_watermelon,
        watermelon_account,
        amount,
    )?;
    println!("redeeming {} 🍉", format_ui_amount(amount, decimals));
    let signature = client.send(&[ix], &[]).await?;
    println!("txid: {}", signature);
    Ok(())
}

/// Nothing to redeem, or more than the account holds.
pub fn validate_redeem(amount: u64, balance: u64) -> Result<(), PoolError> {
    validate_amount(amount)?;
    if amount > balance {
        return Err(PoolError::LowRedeemable);
    }
    Ok(())
}

pub async fn inspect(ctx: &Context, pool_account: Pubkey) -> CliResult<()> {
    let program_id = ctx.settings.program_id()?;
    let client = ctx.client()?;
    let data = client.fetch_pool_data(&pool_account, &program_id).await?;
    for line in render_pool(&ctx.pool_idl, &data, &program_id, Utc::now().timestamp())? {
        println!("{}", line);
    }
    Ok(())
}

/// The authority (the wallet) withdraws the whole pool USDC balance into
/// its associated token account, creating it if needed.
pub async fn withdraw_usdc(ctx: &Context, pool_account: Pubkey) -> CliResult<()> {
    let program_id = ctx.settings.program_id()?;
    let client = ctx.client()?;
    let payer = client.payer();
    warn_if_not_deployer(&payer);

    let pool = client.fetch_pool(&pool_account, &program_id).await?;
    let pool_usdc = client.fetch_token_account(&pool.pool_usdc).await?;
    let associated_usdc = associated_token_address(&payer, &pool_usdc.mint);
    println!("associatedUsdc: {}", associated_usdc);

    let mut ixs = vec![];
    if client.try_fetch_token_account(&associated_usdc).await?.is_none() {
        ixs.push(create_associated_token_account_idempotent(
            &payer,
            &payer,
            &pool_usdc.mint,
            &spl_token::id(),
        ));
    }
    ixs.push(instructions::withdraw(
        &ctx.pool_idl,
        program_id,
        WithdrawAsset::Usdc,
        &WithdrawAccounts {
            pool_account,
            pool_signer: pool_usdc.owner,
            pool_vault: pool.pool_usdc,
            distribution_authority: payer,
            payer,
            receiver: associated_usdc,
        },
        pool_usdc.amount,
    )?);
    let signature = client.send(&ixs, &[]).await?;
    println!("txid: {}", signature);
    Ok(())
}

pub(crate) fn warn_if_not_deployer(payer: &Pubkey) {
    if !is_allowed_deployer(payer) {
        warn!(%payer, "payer is not the allowed deployer; the program will reject this instruction");
    }
}
