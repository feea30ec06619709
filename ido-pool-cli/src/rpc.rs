//! RPC access: typed account fetches and transaction submission.

use ido_pool_core::idl::AnchorIdl;
use ido_pool_core::types::PoolAccount;
use ido_pool_core::validation::verify_owner;
use solana_client::client_error::ClientError;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::account::Account;
use solana_sdk::instruction::{Instruction, InstructionError};
use solana_sdk::program_pack::{IsInitialized, Pack};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::{Transaction, TransactionError};
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{CliError, CliResult};

pub struct Client {
    rpc: RpcClient,
    payer: Keypair,
    /// Programs whose custom errors can be translated, with their IDLs.
    known_programs: Vec<(Pubkey, AnchorIdl)>,
}

impl Client {
    pub fn new(settings: &Settings, payer: Keypair, known_programs: Vec<(Pubkey, AnchorIdl)>) -> Self {
        Self {
            rpc: RpcClient::new_with_commitment(settings.url.clone(), settings.commitment),
            payer,
            known_programs,
        }
    }

    pub fn payer(&self) -> Pubkey {
        self.payer.pubkey()
    }

    pub async fn try_fetch_account(&self, address: &Pubkey) -> CliResult<Option<Account>> {
        debug!(%address, "fetching account");
        Ok(self
            .rpc
            .get_account_with_commitment(address, self.rpc.commitment())
            .await?
            .value)
    }

    pub async fn fetch_account(&self, address: &Pubkey) -> CliResult<Account> {
        self.try_fetch_account(address)
            .await?
            .ok_or(CliError::AccountNotFound(*address))
    }

    /// Fetch a pool, checking the owner program and the discriminator.
    pub async fn fetch_pool(&self, address: &Pubkey, program_id: &Pubkey) -> CliResult<PoolAccount> {
        let account = self.fetch_account(address).await?;
        verify_owner(&account.owner, program_id)?;
        Ok(PoolAccount::decode(&account.data)?)
    }

    /// Raw pool account data, after the owner check.
    pub async fn fetch_pool_data(&self, address: &Pubkey, program_id: &Pubkey) -> CliResult<Vec<u8>> {
        let account = self.fetch_account(address).await?;
        verify_owner(&account.owner, program_id)?;
        Ok(account.data)
    }

    pub async fn fetch_token_account(&self, address: &Pubkey) -> CliResult<spl_token::state::Account> {
        let account = self.fetch_account(address).await?;
        unpack(address, "token", &account.data)
    }

    pub async fn try_fetch_token_account(
        &self,
        address: &Pubkey,
    ) -> CliResult<Option<spl_token::state::Account>> {
        match self.try_fetch_account(address).await? {
            Some(account) => unpack(address, "token", &account.data).map(Some),
            None => Ok(None),
        }
    }

    pub async fn fetch_mint(&self, address: &Pubkey) -> CliResult<spl_token::state::Mint> {
        let account = self.fetch_account(address).await?;
        unpack(address, "mint", &account.data)
    }

    pub async fn rent_exempt(&self, space: usize) -> CliResult<u64> {
        Ok(self.rpc.get_minimum_balance_for_rent_exemption(space).await?)
    }

    /// Sign with the wallet plus `extra_signers`, send, and wait for
    /// confirmation.
    pub async fn send(&self, ixs: &[Instruction], extra_signers: &[&Keypair]) -> CliResult<Signature> {
        let blockhash = self.rpc.get_latest_blockhash().await?;
        let mut signers: Vec<&Keypair> = vec![&self.payer];
        signers.extend_from_slice(extra_signers);
        let tx = Transaction::new_signed_with_payer(ixs, Some(&self.payer.pubkey()), &signers, blockhash);

        info!(instructions = ixs.len(), signers = signers.len(), "sending transaction");
        match self.rpc.send_and_confirm_transaction(&tx).await {
            Ok(signature) => {
                info!(%signature, "transaction confirmed");
                Ok(signature)
            }
            Err(err) => Err(self.explain(ixs, err)),
        }
    }

    fn explain(&self, ixs: &[Instruction], err: ClientError) -> CliError {
        match err
            .get_transaction_error()
            .and_then(|tx_err| translate_program_error(&tx_err, ixs, &self.known_programs))
        {
            Some(translated) => translated,
            None => err.into(),
        }
    }
}

/// Translate a custom program error through the IDL of the program
/// that raised it, found by the failing instruction's index.
///
/// `None` when the error isn't a custom code of a known program.
pub fn translate_program_error(
    err: &TransactionError,
    ixs: &[Instruction],
    known_programs: &[(Pubkey, AnchorIdl)],
) -> Option<CliError> {
    let TransactionError::InstructionError(index, InstructionError::Custom(code)) = err else {
        return None;
    };
    let program_id = ixs.get(*index as usize)?.program_id;
    let (_, idl) = known_programs.iter().find(|(id, _)| *id == program_id)?;
    Some(CliError::ProgramFailed {
        program: idl.name.clone(),
        index: *index,
        message: idl
            .error_message(*code)
            .unwrap_or_else(|| format!("custom program error {}", code)),
    })
}

fn unpack<T: Pack + IsInitialized>(address: &Pubkey, kind: &'static str, data: &[u8]) -> CliResult<T> {
    T::unpack(data).map_err(|e| CliError::Unpack {
        kind,
        address: *address,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ix(program_id: Pubkey) -> Instruction {
        Instruction {
            program_id,
            accounts: vec![],
            data: vec![],
        }
    }

    fn custom(index: u8, code: u32) -> TransactionError {
        TransactionError::InstructionError(index, InstructionError::Custom(code))
    }

    fn programs() -> (Pubkey, Pubkey, Vec<(Pubkey, AnchorIdl)>) {
        let pool = Pubkey::new_unique();
        let multisig = Pubkey::new_unique();
        let known = vec![
            (multisig, AnchorIdl::multisig().unwrap()),
            (pool, AnchorIdl::ido_pool().unwrap()),
        ];
        (pool, multisig, known)
    }

    #[test]
    fn test_pool_error_uses_pool_idl() {
        let (pool, _, known) = programs();
        let ixs = [ix(solana_sdk::system_program::id()), ix(pool)];
        match translate_program_error(&custom(1, 305), &ixs, &known) {
            Some(CliError::ProgramFailed { program, index, message }) => {
                assert_eq!(program, "ido_pool");
                assert_eq!(index, 1);
                assert!(message.starts_with("IdoNotOver"), "{}", message);
            }
            other => panic!("Expected ProgramFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_multisig_error_uses_multisig_idl() {
        let (_, multisig, known) = programs();
        let ixs = [ix(multisig)];
        match translate_program_error(&custom(0, 101), &ixs, &known) {
            Some(CliError::ProgramFailed { program, message, .. }) => {
                assert_eq!(program, "serum_multisig");
                assert!(message.starts_with("NotEnoughSigners"), "{}", message);
            }
            other => panic!("Expected ProgramFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_code_missing_from_idl_keeps_number() {
        let (pool, _, known) = programs();
        match translate_program_error(&custom(0, 9_999), &[ix(pool)], &known) {
            Some(CliError::ProgramFailed { message, .. }) => {
                assert_eq!(message, "custom program error 9999")
            }
            other => panic!("Expected ProgramFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_program_is_not_translated() {
        let (_, _, known) = programs();
        let ixs = [ix(Pubkey::new_unique())];
        assert!(translate_program_error(&custom(0, 305), &ixs, &known).is_none());
        assert!(translate_program_error(&custom(3, 305), &ixs, &known).is_none());
        let not_custom = TransactionError::InstructionError(0, InstructionError::InvalidArgument);
        assert!(translate_program_error(&not_custom, &ixs, &known).is_none());
        assert!(translate_program_error(&TransactionError::AccountNotFound, &ixs, &known).is_none());
    }
}
