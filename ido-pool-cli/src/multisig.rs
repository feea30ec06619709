//! Commands that need the multisig's signature: each builds the pool
//! instruction, prints it for review, and unless `--dry-run` proposes it
//! as a multisig transaction.

use ido_pool_core::constants::{INIT_POOL_TX_SIZE, MODIFY_TIME_TX_SIZE, WITHDRAW_TX_SIZE};
use ido_pool_core::types::{IdoSchedule, PoolAccount};
use ido_pool_core::validation::validate_modify_schedule;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};
use tracing::{info, warn};

use crate::cli::{print_schedule, NewPoolArgs, WithdrawArgs};
use crate::encoding::base64_encode;
use crate::error::CliResult;
use crate::instructions::{self, InitPoolAccounts, WithdrawAccounts, WithdrawAsset};
use crate::pda::find_pool_signer;
use crate::pool::{create_pool_vaults, prepare_new_pool, print_initialize_args, warn_if_not_deployer};
use crate::rpc::Client;
use crate::tx::{create_proposal_instructions, print_account_table, proposal_space, ProposalAccounts};
use crate::Context;

/// Propose `modify_ido_time` with the multisig as distribution authority.
pub async fn modify_pool_time(
    ctx: &Context,
    pool_account: Pubkey,
    schedule: &IdoSchedule,
    dry_run: bool,
) -> CliResult<()> {
    println!("multisig program id: {}", ctx.settings.multisig_program_id);
    validate_modify_schedule(schedule)?;
    let program_id = ctx.settings.program_id()?;
    let client = ctx.client()?;
    warn_if_not_deployer(&client.payer());

    let ix = instructions::modify_ido_time(
        &ctx.pool_idl,
        program_id,
        pool_account,
        ctx.settings.multisig.authority,
        client.payer(),
        schedule,
    )?;
    if dry_run {
        print_schedule(schedule);
        println!("instructionBase64: {}", base64_encode(&ix.data));
        println!("dry run");
        return Ok(());
    }
    propose(ctx, &client, &ix, MODIFY_TIME_TX_SIZE, vec![], &[]).await
}

/// Propose `initialize_pool` with the multisig as distribution authority.
///
/// The pool vaults are created up front by the wallet; the pool account is
/// allocated in the proposal transaction so the multisig only has to run
/// `initialize_pool`.
pub async fn init_pool(ctx: &Context, args: &NewPoolArgs, dry_run: bool) -> CliResult<()> {
    println!("multisig program id: {}", ctx.settings.multisig_program_id);
    let program_id = ctx.settings.program_id()?;
    let client = ctx.client()?;
    let payer = client.payer();
    warn_if_not_deployer(&payer);

    let new_pool = prepare_new_pool(&client, args).await?;
    let (pool_signer, nonce) = find_pool_signer(&args.watermelon_mint, &program_id);
    let mut accounts = InitPoolAccounts {
        pool_account: pool_signer,
        pool_signer,
        redeemable_mint: pool_signer,
        usdc_mint: args.usdc_mint,
        watermelon_mint: args.watermelon_mint,
        pool_watermelon: pool_signer,
        pool_usdc: pool_signer,
        distribution_authority: ctx.settings.multisig.authority,
        payer,
        creator_watermelon: args.watermelon_account,
    };

    if dry_run {
        // Accounts not created yet are filled with the pool signer; only the
        // instruction data is meaningful here.
        println!("_poolSigner: {}", pool_signer);
        println!("num_ido_tokens: {}", new_pool.amount);
        print_schedule(&new_pool.schedule);
        let ix = instructions::initialize_pool(
            &ctx.pool_idl,
            program_id,
            &accounts,
            new_pool.amount,
            nonce,
            &new_pool.schedule,
        )?;
        println!("instructionBase64: {}", base64_encode(&ix.data));
        println!("dry run");
        return Ok(());
    }

    let vaults = create_pool_vaults(&client, args, pool_signer).await?;
    let pool_account = Keypair::new();
    accounts.pool_account = pool_account.pubkey();
    accounts.redeemable_mint = vaults.redeemable_mint;
    accounts.pool_watermelon = vaults.pool_watermelon;
    accounts.pool_usdc = vaults.pool_usdc;

    print_initialize_args(&new_pool, nonce);
    let ix = instructions::initialize_pool(
        &ctx.pool_idl,
        program_id,
        &accounts,
        new_pool.amount,
        nonce,
        &new_pool.schedule,
    )?;
    let create_pool = instructions::create_pool_account(
        &payer,
        &pool_account.pubkey(),
        client.rent_exempt(PoolAccount::SPACE).await?,
        &program_id,
    );
    propose(ctx, &client, &ix, INIT_POOL_TX_SIZE, vec![create_pool], &[&pool_account]).await?;
    println!("Pool Account: {}", pool_account.pubkey());
    Ok(())
}

/// Propose `withdraw_pool_usdc` or `withdraw_pool_watermelon`.
///
/// The account table and data are printed before the dry-run stop so
/// signers can compare them with what they approve.
pub async fn withdraw(ctx: &Context, asset: WithdrawAsset, args: &WithdrawArgs) -> CliResult<()> {
    println!("multisig program id: {}", ctx.settings.multisig_program_id);
    let program_id = ctx.settings.program_id()?;
    let client = ctx.client()?;
    let payer = client.payer();
    warn_if_not_deployer(&payer);

    let pool = client.fetch_pool(&args.pool_account, &program_id).await?;
    let vault = match asset {
        WithdrawAsset::Usdc => pool.pool_usdc,
        WithdrawAsset::Watermelon => pool.pool_watermelon,
    };
    let vault_account = client.fetch_token_account(&vault).await?;
    if args.amount > vault_account.amount {
        warn!(amount = args.amount, balance = vault_account.amount, %vault, "withdrawal exceeds the pool balance");
    }

    let ix = instructions::withdraw(
        &ctx.pool_idl,
        program_id,
        asset,
        &WithdrawAccounts {
            pool_account: args.pool_account,
            pool_signer: vault_account.owner,
            pool_vault: vault,
            distribution_authority: pool.distribution_authority,
            payer,
            receiver: args.receiver,
        },
        args.amount,
    )?;
    print_account_table(ctx.pool_idl.instruction(asset.instruction_name())?, &ix);
    println!("instructionBase64: {}", base64_encode(&ix.data));
    if args.dry_run {
        println!("dry-run");
        return Ok(());
    }
    propose(ctx, &client, &ix, WITHDRAW_TX_SIZE, vec![], &[]).await
}

/// Send `pre_instructions` followed by a multisig `create_transaction`
/// holding `ix`, signed by the wallet, a fresh transaction account and
/// `extra_signers`.
async fn propose(
    ctx: &Context,
    client: &Client,
    ix: &Instruction,
    min_size: usize,
    mut pre_instructions: Vec<Instruction>,
    extra_signers: &[&Keypair],
) -> CliResult<()> {
    let transaction = Keypair::new();
    let space = proposal_space(ix, min_size);
    let accounts = ProposalAccounts {
        multisig_program_id: ctx.settings.multisig_program_id,
        multisig: ctx.settings.multisig.account,
        transaction: transaction.pubkey(),
        proposer: client.payer(),
    };
    pre_instructions.extend(create_proposal_instructions(
        &ctx.multisig_idl,
        &accounts,
        ix,
        space,
        client.rent_exempt(space).await?,
    )?);

    let signers: Vec<&Keypair> = extra_signers
        .iter()
        .copied()
        .chain(std::iter::once(&transaction))
        .collect();
    info!(multisig = %accounts.multisig, space, "proposing multisig transaction");
    let signature = client.send(&pre_instructions, &signers).await?;
    println!("transaction {}", transaction.pubkey());
    println!("txid: {}", signature);
    Ok(())
}
