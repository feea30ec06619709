//! Anchor IDL types for the programs this client talks to.
//!
//! Both programs predate the Anchor 0.30 IDL format, so this models the legacy
//! JSON shape (`isMut` / `isSigner`, `publicKey`, camelCase names). The
//! IDLs are bundled into the binary so the client never reads them from
//! disk at runtime.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{CoreError, CoreResult};

const IDO_POOL_IDL_JSON: &str = include_str!("../idl/ido_pool.json");
const MULTISIG_IDL_JSON: &str = include_str!("../idl/multisig.json");

/// Top-level IDL for an Anchor program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorIdl {
    pub version: String,
    pub name: String,
    pub instructions: Vec<IdlInstruction>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accounts: Vec<IdlTypeDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<IdlTypeDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<IdlError>,
}

/// An instruction in the IDL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdlInstruction {
    pub name: String,
    pub accounts: Vec<IdlAccountItem>,
    pub args: Vec<IdlField>,
}

/// An account expected by an instruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdlAccountItem {
    pub name: String,
    #[serde(default)]
    pub is_mut: bool,
    #[serde(default)]
    pub is_signer: bool,
}

/// A named, typed value: instruction argument or struct field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdlField {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: IdlType,
}

/// Type representation in the IDL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdlType {
    Primitive(String),
    Vec { vec: Box<IdlType> },
    Option { option: Box<IdlType> },
    Defined { defined: String },
    Array { array: (Box<IdlType>, usize) },
}

/// Named struct or enum definition, used for both `accounts` and `types`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdlTypeDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: IdlTypeDefinitionTy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdlTypeDefinitionTy {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<IdlField>,
}

/// Error definition in the IDL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdlError {
    pub code: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl AnchorIdl {
    /// Parse an IDL from its JSON form.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The bundled IDL of the IDO pool program.
    pub fn ido_pool() -> CoreResult<Self> {
        Self::from_json(IDO_POOL_IDL_JSON)
    }

    /// The bundled IDL of the multisig program.
    pub fn multisig() -> CoreResult<Self> {
        Self::from_json(MULTISIG_IDL_JSON)
    }

    /// Look up an instruction by its camelCase or snake_case name.
    pub fn instruction(&self, name: &str) -> CoreResult<&IdlInstruction> {
        let wanted = camel_to_snake(name);
        self.instructions
            .iter()
            .find(|ix| camel_to_snake(&ix.name) == wanted)
            .ok_or_else(|| CoreError::UnknownInstruction(name.to_string()))
    }

    /// Resolve a `defined` type against `types`, then `accounts`.
    pub fn type_def(&self, name: &str) -> CoreResult<&IdlTypeDefinition> {
        self.types
            .iter()
            .chain(self.accounts.iter())
            .find(|t| t.name == name)
            .ok_or_else(|| CoreError::UnknownType(name.to_string()))
    }

    /// Human-readable message for a custom error code, if this IDL knows it.
    pub fn error_message(&self, code: u32) -> Option<String> {
        self.errors.iter().find(|e| e.code == code).map(|e| match &e.msg {
            Some(msg) => format!("{}: {}", e.name, msg),
            None => e.name.clone(),
        })
    }

    /// Serialize the IDL to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl IdlInstruction {
    /// 8-byte sighash that prefixes this instruction's data.
    pub fn discriminator(&self) -> [u8; 8] {
        sighash("global", &camel_to_snake(&self.name))
    }
}

/// Anchor's namespaced hash: first 8 bytes of `sha256("<namespace>:<name>")`.
pub fn sighash(namespace: &str, name: &str) -> [u8; 8] {
    let digest = Sha256::digest(format!("{}:{}", namespace, name).as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

/// Discriminator stored in the first 8 bytes of an Anchor account.
pub fn account_discriminator(account_name: &str) -> [u8; 8] {
    sighash("account", account_name)
}

/// `initializePool` → `initialize_pool`. Already-snake names pass through.
pub fn camel_to_snake(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, ch) in s.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_to_snake() {
        assert_eq!(camel_to_snake("initializePool"), "initialize_pool");
        assert_eq!(camel_to_snake("exchangeUsdcForRedeemable"), "exchange_usdc_for_redeemable");
        assert_eq!(camel_to_snake("withdraw_pool_usdc"), "withdraw_pool_usdc");
        assert_eq!(camel_to_snake("PoolAccount"), "pool_account");
    }

    #[test]
    fn test_sighash_is_prefix_of_sha256() {
        let digest = Sha256::digest(b"global:initialize_pool");
        assert_eq!(sighash("global", "initialize_pool"), digest[..8]);
    }

    #[test]
    fn test_discriminator_uses_snake_name() {
        let idl = AnchorIdl::ido_pool().unwrap();
        let ix = idl.instruction("modifyIdoTime").unwrap();
        assert_eq!(ix.discriminator(), sighash("global", "modify_ido_time"));
    }
}
