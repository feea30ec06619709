//! Resolved runtime settings: global options merged with built-in defaults.

use std::path::{Path, PathBuf};

use ido_pool_core::constants::{MultisigPreset, MULTISIG_PROGRAM_ID, PRODUCTION_MULTISIG, TEST_MULTISIG};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{read_keypair_file, Keypair};

use crate::cli::{Commitment, GlobalOpts, MultisigPresetArg};
use crate::error::{CliError, CliResult};

#[derive(Debug, Clone)]
pub struct Settings {
    pub url: String,
    pub commitment: CommitmentConfig,
    pub keypair_path: PathBuf,
    pub program_id: Option<Pubkey>,
    pub multisig_program_id: Pubkey,
    pub multisig: MultisigPreset,
}

impl Settings {
    pub fn from_opts(opts: &GlobalOpts) -> CliResult<Self> {
        let keypair_path = match &opts.keypair {
            Some(path) => path.clone(),
            None => default_keypair_path()?,
        };
        let preset = match opts.multisig_preset {
            MultisigPresetArg::Production => PRODUCTION_MULTISIG,
            MultisigPresetArg::Test => TEST_MULTISIG,
        };
        let multisig = MultisigPreset {
            account: opts.multisig.unwrap_or(preset.account),
            authority: opts.multisig_authority.unwrap_or(preset.authority),
        };
        let commitment = match opts.commitment {
            Commitment::Processed => CommitmentConfig::processed(),
            Commitment::Confirmed => CommitmentConfig::confirmed(),
            Commitment::Finalized => CommitmentConfig::finalized(),
        };

        Ok(Self {
            url: opts.url.clone(),
            commitment,
            keypair_path,
            program_id: opts.program_id,
            multisig_program_id: opts.multisig_program_id.unwrap_or(MULTISIG_PROGRAM_ID),
            multisig,
        })
    }

    /// The pool program id; every pool command needs one.
    pub fn program_id(&self) -> CliResult<Pubkey> {
        self.program_id.ok_or(CliError::MissingProgramId)
    }

    pub fn load_keypair(&self) -> CliResult<Keypair> {
        load_keypair(&self.keypair_path)
    }
}

/// `~/.config/solana/id.json`
pub fn default_keypair_path() -> CliResult<PathBuf> {
    dirs_next::home_dir()
        .map(|home| home.join(".config").join("solana").join("id.json"))
        .ok_or_else(|| CliError::Keypair {
            path: "~/.config/solana/id.json".to_string(),
            message: "home directory not found".to_string(),
        })
}

/// Read a JSON byte-array keypair file, as written by `solana-keygen`.
pub fn load_keypair(path: &Path) -> CliResult<Keypair> {
    read_keypair_file(path).map_err(|e| CliError::Keypair {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
