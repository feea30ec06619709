//! Program derived addresses used by the pool.

use ido_pool_core::error::PoolError;
use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account::get_associated_token_address;

use crate::error::CliResult;

/// The pool signer: `find_program_address([watermelon_mint], program_id)`.
///
/// Owns the pool's token accounts and the redeemable mint. The bump is
/// what the program calls `nonce`.
pub fn find_pool_signer(watermelon_mint: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[watermelon_mint.as_ref()], program_id)
}

/// Recreate the pool signer from the nonce stored in a pool account.
pub fn pool_signer_from_nonce(
    watermelon_mint: &Pubkey,
    nonce: u8,
    program_id: &Pubkey,
) -> CliResult<Pubkey> {
    Pubkey::create_program_address(&[watermelon_mint.as_ref(), &[nonce]], program_id)
        .map_err(|_| PoolError::InvalidNonce.into())
}

/// Associated token account of `owner` for `mint`.
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address(owner, mint)
}
