//! Instruction layouts as the pool and multisig programs expect them.

use std::collections::HashMap;

use borsh::BorshDeserialize;
use ido_pool_cli::config::load_keypair;
use ido_pool_cli::error::CliError;
use ido_pool_cli::instructions::{
    self, ExchangeAccounts, InitPoolAccounts, PoolTokenSetup, WithdrawAccounts, WithdrawAsset,
};
use ido_pool_cli::tx::{create_proposal_instructions, proposal_space, InstructionBuilder, ProposalAccounts};
use ido_pool_core::constants::{MULTISIG_PROGRAM_ID, WITHDRAW_TX_SIZE};
use ido_pool_core::idl::{sighash, AnchorIdl};
use ido_pool_core::types::{IdoSchedule, TransactionAccount};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{write_keypair_file, Keypair, Signer};
use solana_sdk::{system_program, sysvar};

fn schedule() -> IdoSchedule {
    IdoSchedule {
        start_ido_ts: 1_700_000_000,
        end_deposits_ts: 1_700_086_400,
        end_ido_ts: 1_700_172_800,
        withdraw_melon_ts: 1_700_259_200,
    }
}

fn init_accounts() -> InitPoolAccounts {
    InitPoolAccounts {
        pool_account: Pubkey::new_unique(),
        pool_signer: Pubkey::new_unique(),
        redeemable_mint: Pubkey::new_unique(),
        usdc_mint: Pubkey::new_unique(),
        watermelon_mint: Pubkey::new_unique(),
        pool_watermelon: Pubkey::new_unique(),
        pool_usdc: Pubkey::new_unique(),
        distribution_authority: Pubkey::new_unique(),
        payer: Pubkey::new_unique(),
        creator_watermelon: Pubkey::new_unique(),
    }
}

#[test]
fn test_initialize_pool_data() {
    let idl = AnchorIdl::ido_pool().unwrap();
    let ix = instructions::initialize_pool(
        &idl,
        Pubkey::new_unique(),
        &init_accounts(),
        5_000_000,
        253,
        &schedule(),
    )
    .unwrap();

    let mut expected = sighash("global", "initialize_pool").to_vec();
    // num_ido_tokens is a decimal string
    expected.extend_from_slice(&7u32.to_le_bytes());
    expected.extend_from_slice(b"5000000");
    expected.push(253);
    for ts in [1_700_000_000i64, 1_700_086_400, 1_700_172_800, 1_700_259_200] {
        expected.extend_from_slice(&ts.to_le_bytes());
    }
    assert_eq!(ix.data, expected);
}

#[test]
fn test_initialize_pool_accounts() {
    let idl = AnchorIdl::ido_pool().unwrap();
    let accounts = init_accounts();
    let ix = instructions::initialize_pool(&idl, Pubkey::new_unique(), &accounts, 1, 255, &schedule())
        .unwrap();

    assert_eq!(ix.accounts.len(), 13);
    assert_eq!(ix.accounts[0].pubkey, accounts.pool_account);
    assert!(ix.accounts[0].is_writable && !ix.accounts[0].is_signer);
    assert_eq!(ix.accounts[5].pubkey, accounts.pool_watermelon);
    assert!(ix.accounts[5].is_writable);
    assert!(!ix.accounts[6].is_writable, "pool_usdc is read-only at init");
    assert_eq!(ix.accounts[7].pubkey, accounts.distribution_authority);
    assert!(ix.accounts[7].is_signer && !ix.accounts[7].is_writable);
    assert!(ix.accounts[8].is_signer);
    assert_eq!(ix.accounts[10].pubkey, spl_token::id());
    assert_eq!(ix.accounts[11].pubkey, sysvar::rent::ID);
    assert_eq!(ix.accounts[12].pubkey, sysvar::clock::ID);
}

#[test]
fn test_modify_ido_time() {
    let idl = AnchorIdl::ido_pool().unwrap();
    let pool = Pubkey::new_unique();
    let authority = Pubkey::new_unique();
    let payer = Pubkey::new_unique();
    let ix = instructions::modify_ido_time(&idl, Pubkey::new_unique(), pool, authority, payer, &schedule())
        .unwrap();

    assert_eq!(&ix.data[..8], &sighash("global", "modify_ido_time"));
    assert_eq!(ix.data.len(), 8 + 4 * 8);
    assert_eq!(&ix.data[8..16], &1_700_000_000i64.to_le_bytes());
    let keys: Vec<_> = ix.accounts.iter().map(|m| (m.pubkey, m.is_writable, m.is_signer)).collect();
    assert_eq!(keys, vec![(pool, true, false), (authority, false, true), (payer, false, true)]);
}

#[test]
fn test_exchange_instructions_share_layout() {
    let idl = AnchorIdl::ido_pool().unwrap();
    let program_id = Pubkey::new_unique();
    let accounts = ExchangeAccounts {
        pool_account: Pubkey::new_unique(),
        pool_signer: Pubkey::new_unique(),
        redeemable_mint: Pubkey::new_unique(),
        user_authority: Pubkey::new_unique(),
        user_redeemable: Pubkey::new_unique(),
    };
    let pool_usdc = Pubkey::new_unique();
    let user_usdc = Pubkey::new_unique();

    let deposit =
        instructions::exchange_usdc_for_redeemable(&idl, program_id, &accounts, pool_usdc, user_usdc, 42)
            .unwrap();
    let withdraw =
        instructions::exchange_redeemable_for_usdc(&idl, program_id, &accounts, pool_usdc, user_usdc, 42)
            .unwrap();

    assert_eq!(deposit.accounts, withdraw.accounts);
    assert_eq!(&deposit.data[..8], &sighash("global", "exchange_usdc_for_redeemable"));
    assert_eq!(&withdraw.data[..8], &sighash("global", "exchange_redeemable_for_usdc"));
    assert_eq!(&deposit.data[8..], &42u64.to_le_bytes());
    assert_eq!(deposit.accounts[3].pubkey, pool_usdc);
    assert_eq!(deposit.accounts[4].pubkey, accounts.user_authority);
    assert!(deposit.accounts[4].is_signer);
    assert_eq!(deposit.accounts[5].pubkey, user_usdc);
}

#[test]
fn test_withdraw_watermelon_uses_its_own_accounts() {
    let idl = AnchorIdl::ido_pool().unwrap();
    let accounts = WithdrawAccounts {
        pool_account: Pubkey::new_unique(),
        pool_signer: Pubkey::new_unique(),
        pool_vault: Pubkey::new_unique(),
        distribution_authority: Pubkey::new_unique(),
        payer: Pubkey::new_unique(),
        receiver: Pubkey::new_unique(),
    };
    let ix = instructions::withdraw(&idl, Pubkey::new_unique(), WithdrawAsset::Watermelon, &accounts, 7)
        .unwrap();

    assert_eq!(&ix.data[..8], &sighash("global", "withdraw_pool_watermelon"));
    assert_eq!(ix.accounts.len(), 8);
    assert_eq!(ix.accounts[2].pubkey, accounts.pool_vault);
    assert!(ix.accounts[2].is_writable);
    assert_eq!(ix.accounts[5].pubkey, accounts.receiver);
    assert!(ix.accounts[5].is_writable);
}

#[test]
fn test_withdraw_encodes_zero_amount() {
    let idl = AnchorIdl::ido_pool().unwrap();
    let accounts = WithdrawAccounts {
        pool_account: Pubkey::new_unique(),
        pool_signer: Pubkey::new_unique(),
        pool_vault: Pubkey::new_unique(),
        distribution_authority: Pubkey::new_unique(),
        payer: Pubkey::new_unique(),
        receiver: Pubkey::new_unique(),
    };
    let ix = instructions::withdraw(&idl, Pubkey::new_unique(), WithdrawAsset::Usdc, &accounts, 0).unwrap();
    assert_eq!(&ix.data[..8], &sighash("global", "withdraw_pool_usdc"));
    assert_eq!(&ix.data[8..], &0u64.to_le_bytes());
}

#[test]
fn test_builder_reports_every_missing_input() {
    let idl = AnchorIdl::ido_pool().unwrap();
    let err = InstructionBuilder::new(&idl, Pubkey::new_unique(), "modify_ido_time")
        .unwrap()
        .account("poolAccount", Pubkey::new_unique())
        .arg("startIdoTs", 1i64)
        .build()
        .unwrap_err();
    match err {
        CliError::MissingArguments(missing) => assert_eq!(
            missing,
            vec!["--distribution-authority", "--payer", "--end-deposits-ts", "--end-ido-ts", "--withdraw-melon-ts"]
        ),
        other => panic!("Expected MissingArguments, got {:?}", other),
    }
}

#[test]
fn test_builder_rejects_wrong_value_type() {
    let idl = AnchorIdl::ido_pool().unwrap();
    let err = InstructionBuilder::new(&idl, Pubkey::new_unique(), "withdrawPoolUsdc")
        .unwrap()
        .arg("amount", 5i64)
        .account("poolAccount", Pubkey::new_unique())
        .account("poolSigner", Pubkey::new_unique())
        .account("poolUsdc", Pubkey::new_unique())
        .account("distributionAuthority", Pubkey::new_unique())
        .account("payer", Pubkey::new_unique())
        .account("creatorUsdc", Pubkey::new_unique())
        .account("tokenProgram", spl_token::id())
        .account("clock", sysvar::clock::ID)
        .build()
        .unwrap_err();
    assert!(matches!(err, CliError::TypeMismatch { .. }));
}

#[derive(BorshDeserialize)]
struct CreateTransactionArgs {
    pid: Pubkey,
    accs: Vec<TransactionAccount>,
    data: Vec<u8>,
}

#[test]
fn test_proposal_wraps_instruction() {
    let pool_idl = AnchorIdl::ido_pool().unwrap();
    let multisig_idl = AnchorIdl::multisig().unwrap();
    let program_id = Pubkey::new_unique();
    let inner = instructions::modify_ido_time(
        &pool_idl,
        program_id,
        Pubkey::new_unique(),
        Pubkey::new_unique(),
        Pubkey::new_unique(),
        &schedule(),
    )
    .unwrap();

    let accounts = ProposalAccounts {
        multisig_program_id: MULTISIG_PROGRAM_ID,
        multisig: Pubkey::new_unique(),
        transaction: Pubkey::new_unique(),
        proposer: Pubkey::new_unique(),
    };
    let space = proposal_space(&inner, WITHDRAW_TX_SIZE);
    let ixs = create_proposal_instructions(&multisig_idl, &accounts, &inner, space, 1_000).unwrap();
    assert_eq!(ixs.len(), 2);

    let create_account = &ixs[0];
    assert_eq!(create_account.program_id, system_program::id());
    assert_eq!(create_account.accounts[1].pubkey, accounts.transaction);
    assert!(create_account.accounts[1].is_signer);

    let create_tx = &ixs[1];
    assert_eq!(create_tx.program_id, MULTISIG_PROGRAM_ID);
    assert_eq!(&create_tx.data[..8], &sighash("global", "create_transaction"));
    let keys: Vec<_> = create_tx.accounts.iter().map(|m| m.pubkey).collect();
    assert_eq!(keys, vec![accounts.multisig, accounts.transaction, accounts.proposer, sysvar::rent::ID]);
    assert!(create_tx.accounts[1].is_writable);
    assert!(create_tx.accounts[2].is_signer);

    let args = CreateTransactionArgs::try_from_slice(&create_tx.data[8..]).unwrap();
    assert_eq!(args.pid, program_id);
    assert_eq!(args.data, inner.data);
    let expected: Vec<TransactionAccount> = inner.accounts.iter().map(TransactionAccount::from).collect();
    assert_eq!(args.accs, expected);
}

#[test]
fn test_create_transaction_from_flags() {
    let idl = AnchorIdl::multisig().unwrap();
    let pid = Pubkey::new_unique();
    let first = Pubkey::new_unique();
    let second = Pubkey::new_unique();
    let flags: HashMap<String, String> = [
        ("multisig", Pubkey::new_unique().to_string()),
        ("transaction", Pubkey::new_unique().to_string()),
        ("proposer", Pubkey::new_unique().to_string()),
        ("rent", sysvar::rent::ID.to_string()),
        ("pid", pid.to_string()),
        ("accs", format!("{}:false:true, {}:true:false", first, second)),
        ("data", "0x0102".to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    let ix = InstructionBuilder::new(&idl, MULTISIG_PROGRAM_ID, "createTransaction")
        .unwrap()
        .with_flags(&flags)
        .unwrap()
        .build()
        .unwrap();

    let args = CreateTransactionArgs::try_from_slice(&ix.data[8..]).unwrap();
    assert_eq!(args.pid, pid);
    assert_eq!(
        args.accs,
        vec![
            TransactionAccount { pubkey: first, is_signer: false, is_writable: true },
            TransactionAccount { pubkey: second, is_signer: true, is_writable: false },
        ]
    );
    assert_eq!(args.data, vec![1, 2]);
}

#[test]
fn test_unknown_flags_are_reported() {
    let idl = AnchorIdl::ido_pool().unwrap();
    let flags: HashMap<String, String> = [
        ("pool-acount".to_string(), Pubkey::new_unique().to_string()),
        ("start-ido-ts".to_string(), "1".to_string()),
    ]
    .into_iter()
    .collect();

    let err = InstructionBuilder::new(&idl, Pubkey::new_unique(), "modifyIdoTime")
        .unwrap()
        .with_flags(&flags)
        .err()
        .expect("misspelled flag accepted");
    match err {
        CliError::InvalidArgument { name, message } => {
            assert_eq!(name, "modifyIdoTime");
            assert!(message.contains("--pool-acount"), "{}", message);
            assert!(!message.contains("--start-ido-ts"), "{}", message);
        }
        other => panic!("Expected InvalidArgument, got {:?}", other),
    }
}

#[test]
fn test_proposal_space_has_floor() {
    let idl = AnchorIdl::ido_pool().unwrap();
    let ix = instructions::modify_ido_time(
        &idl,
        Pubkey::new_unique(),
        Pubkey::new_unique(),
        Pubkey::new_unique(),
        Pubkey::new_unique(),
        &schedule(),
    )
    .unwrap();
    assert_eq!(proposal_space(&ix, 250), 250);
    assert_eq!(proposal_space(&ix, 0), 100 + 3 * 34 + 40);
}

#[test]
fn test_token_setup_creates_mint_and_vaults() {
    let setup = PoolTokenSetup {
        payer: Pubkey::new_unique(),
        pool_signer: Pubkey::new_unique(),
        usdc_mint: Pubkey::new_unique(),
        usdc_decimals: 6,
        watermelon_mint: Pubkey::new_unique(),
        redeemable_mint: Pubkey::new_unique(),
        pool_watermelon: Pubkey::new_unique(),
        pool_usdc: Pubkey::new_unique(),
        mint_rent: 10,
        account_rent: 20,
    };
    let ixs = instructions::token_setup_instructions(&setup).unwrap();
    let programs: Vec<_> = ixs.iter().map(|ix| ix.program_id).collect();
    assert_eq!(
        programs,
        vec![
            system_program::id(),
            spl_token::id(),
            system_program::id(),
            spl_token::id(),
            system_program::id(),
            spl_token::id(),
        ]
    );
    assert_eq!(ixs[1].accounts[0].pubkey, setup.redeemable_mint);
    assert_eq!(ixs[3].accounts[0].pubkey, setup.pool_watermelon);
    assert_eq!(ixs[3].accounts[1].pubkey, setup.watermelon_mint);
    assert_eq!(ixs[5].accounts[1].pubkey, setup.usdc_mint);
}

#[test]
fn test_load_keypair_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("id.json");
    let keypair = Keypair::new();
    write_keypair_file(&keypair, &path).unwrap();

    let loaded = load_keypair(&path).unwrap();
    assert_eq!(loaded.pubkey(), keypair.pubkey());
}

#[test]
fn test_load_missing_keypair_names_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");
    match load_keypair(&path) {
        Err(CliError::Keypair { path: p, .. }) => assert!(p.ends_with("missing.json")),
        other => panic!("Expected Keypair error, got {:?}", other.map(|k| k.pubkey())),
    }
}
