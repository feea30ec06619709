//! IDL-driven instruction building and multisig proposal wrapping.

use std::collections::HashMap;

use ido_pool_core::constants::proposal_account_size;
use ido_pool_core::idl::{camel_to_snake, AnchorIdl, IdlInstruction};
use ido_pool_core::types::TransactionAccount;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::{system_instruction, sysvar};

use crate::cli::snake_to_kebab;
use crate::encoding::decode_pubkey;
use crate::error::{CliError, CliResult};
use crate::parse::{parse_value, ParsedValue};
use crate::serialize::serialize_args;

/// Collects named accounts and args for one IDL instruction, then lays
/// them out in IDL order.
///
/// Names may be given in camelCase or snake_case.
pub struct InstructionBuilder<'a> {
    idl: &'a AnchorIdl,
    ix: &'a IdlInstruction,
    program_id: Pubkey,
    accounts: HashMap<String, Pubkey>,
    args: HashMap<String, ParsedValue>,
}

impl<'a> InstructionBuilder<'a> {
    pub fn new(idl: &'a AnchorIdl, program_id: Pubkey, instruction: &str) -> CliResult<Self> {
        Ok(Self {
            idl,
            ix: idl.instruction(instruction)?,
            program_id,
            accounts: HashMap::new(),
            args: HashMap::new(),
        })
    }

    pub fn account(mut self, name: &str, key: Pubkey) -> Self {
        self.accounts.insert(camel_to_snake(name), key);
        self
    }

    pub fn arg(mut self, name: &str, value: impl Into<ParsedValue>) -> Self {
        self.args.insert(camel_to_snake(name), value.into());
        self
    }

    /// Fill accounts and args from `--kebab-name value` flags.
    ///
    /// Every bad value and every flag the instruction doesn't take is
    /// reported, not just the first.
    pub fn with_flags(mut self, flags: &HashMap<String, String>) -> CliResult<Self> {
        let ix = self.ix;
        let mut errors = vec![];
        let known: Vec<String> = ix
            .accounts
            .iter()
            .map(|acc| acc.name.as_str())
            .chain(ix.args.iter().map(|arg| arg.name.as_str()))
            .map(|name| snake_to_kebab(&camel_to_snake(name)))
            .collect();
        let mut unknown: Vec<&String> = flags.keys().filter(|flag| !known.contains(*flag)).collect();
        unknown.sort();
        for flag in unknown {
            errors.push(format!("--{}: not an account or arg of {}", flag, ix.name));
        }

        for acc in &ix.accounts {
            let snake = camel_to_snake(&acc.name);
            if let Some(raw) = flags.get(&snake_to_kebab(&snake)) {
                match decode_pubkey(raw) {
                    Ok(key) => {
                        self.accounts.insert(snake, key);
                    }
                    Err(e) => errors.push(format!("--{}: {}", snake_to_kebab(&snake), e)),
                }
            }
        }
        for field in &ix.args {
            let snake = camel_to_snake(&field.name);
            if let Some(raw) = flags.get(&snake_to_kebab(&snake)) {
                match parse_value(self.idl, raw, &field.type_) {
                    Ok(val) => {
                        self.args.insert(snake, val);
                    }
                    Err(e) => errors.push(format!("--{}: {}", snake_to_kebab(&snake), e)),
                }
            }
        }
        if !errors.is_empty() {
            return Err(CliError::invalid_argument(ix.name.clone(), errors.join("; ")));
        }
        Ok(self)
    }

    pub fn idl_instruction(&self) -> &'a IdlInstruction {
        self.ix
    }

    pub fn build(&self) -> CliResult<Instruction> {
        let mut missing = vec![];
        let mut metas = Vec::with_capacity(self.ix.accounts.len());
        for acc in &self.ix.accounts {
            let snake = camel_to_snake(&acc.name);
            match self.accounts.get(&snake) {
                Some(key) if acc.is_mut => metas.push(AccountMeta::new(*key, acc.is_signer)),
                Some(key) => metas.push(AccountMeta::new_readonly(*key, acc.is_signer)),
                None => missing.push(format!("--{}", snake_to_kebab(&snake))),
            }
        }
        let mut values = Vec::with_capacity(self.ix.args.len());
        for field in &self.ix.args {
            let snake = camel_to_snake(&field.name);
            match self.args.get(&snake) {
                Some(val) => values.push(val),
                None => missing.push(format!("--{}", snake_to_kebab(&snake))),
            }
        }
        if !missing.is_empty() {
            return Err(CliError::MissingArguments(missing));
        }

        let mut data = self.ix.discriminator().to_vec();
        data.extend(serialize_args(self.idl, &self.ix.args, &values)?);
        Ok(Instruction {
            program_id: self.program_id,
            accounts: metas,
            data,
        })
    }
}

/// Print the account layout of `ix` the way multisig signers review it:
/// a name chain, then one row per meta with its writable/signer flags.
pub fn print_account_table(idl_ix: &IdlInstruction, ix: &Instruction) {
    let chain: Vec<String> = idl_ix
        .accounts
        .iter()
        .enumerate()
        .map(|(i, acc)| format!("{}({})", camel_to_snake(&acc.name), i))
        .collect();
    println!("accounts: {}", chain.join(" -> "));
    for (i, meta) in ix.accounts.iter().enumerate() {
        println!(
            "{} {:<45}  w/s?  {} {}",
            i,
            meta.pubkey.to_string(),
            meta.is_writable,
            meta.is_signer
        );
    }
}

/// Accounts of a multisig proposal.
#[derive(Debug, Clone, Copy)]
pub struct ProposalAccounts {
    pub multisig_program_id: Pubkey,
    pub multisig: Pubkey,
    pub transaction: Pubkey,
    pub proposer: Pubkey,
}

/// Wrap `ix` into a multisig proposal.
///
/// Returns the `create_account` that allocates the transaction account
/// (`space` bytes, owned by the multisig program) followed by
/// `create_transaction`. Both need the proposer and the transaction
/// keypair as signers.
pub fn create_proposal_instructions(
    multisig_idl: &AnchorIdl,
    accounts: &ProposalAccounts,
    ix: &Instruction,
    space: usize,
    lamports: u64,
) -> CliResult<Vec<Instruction>> {
    let accs: Vec<ParsedValue> = ix
        .accounts
        .iter()
        .map(|meta| transaction_account_value(&TransactionAccount::from(meta)))
        .collect();

    let create_tx = InstructionBuilder::new(multisig_idl, accounts.multisig_program_id, "createTransaction")?
        .account("multisig", accounts.multisig)
        .account("transaction", accounts.transaction)
        .account("proposer", accounts.proposer)
        .account("rent", sysvar::rent::ID)
        .arg("pid", ix.program_id)
        .arg("accs", ParsedValue::List(accs))
        .arg("data", ix.data.clone())
        .build()?;

    let create_account = system_instruction::create_account(
        &accounts.proposer,
        &accounts.transaction,
        lamports,
        space as u64,
        &accounts.multisig_program_id,
    );
    Ok(vec![create_account, create_tx])
}

/// Bytes to allocate for a proposal holding `ix`, never below `min_size`.
pub fn proposal_space(ix: &Instruction, min_size: usize) -> usize {
    proposal_account_size(ix.accounts.len(), ix.data.len(), min_size)
}

fn transaction_account_value(acc: &TransactionAccount) -> ParsedValue {
    ParsedValue::Struct(vec![
        ("pubkey".to_string(), acc.pubkey.into()),
        ("isSigner".to_string(), acc.is_signer.into()),
        ("isWritable".to_string(), acc.is_writable.into()),
    ])
}
