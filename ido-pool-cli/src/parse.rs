//! IDL type-aware value parsing from CLI strings, and token amount
//! conversion between UI units and base units.

use std::fmt;

use ido_pool_core::idl::{AnchorIdl, IdlType};
use solana_sdk::pubkey::Pubkey;

use crate::encoding::{decode_pubkey, hex_decode, hex_encode};
use crate::error::{CliError, CliResult};

/// A typed instruction or account value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedValue {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    I64(i64),
    Str(String),
    PublicKey(Pubkey),
    Bytes(Vec<u8>),                     // bytes / [u8; N]
    List(Vec<ParsedValue>),             // Vec<T>
    Struct(Vec<(String, ParsedValue)>), // defined struct, fields in IDL order
    None,                               // Option::None
    Some(Box<ParsedValue>),             // Option::Some
}

impl fmt::Display for ParsedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedValue::Bool(v) => write!(f, "{}", v),
            ParsedValue::U8(v) => write!(f, "{}", v),
            ParsedValue::U16(v) => write!(f, "{}", v),
            ParsedValue::U32(v) => write!(f, "{}", v),
            ParsedValue::U64(v) => write!(f, "{}", v),
            ParsedValue::U128(v) => write!(f, "{}", v),
            ParsedValue::I64(v) => write!(f, "{}", v),
            ParsedValue::Str(s) => write!(f, "\"{}\"", s),
            ParsedValue::PublicKey(k) => write!(f, "{}", k),
            ParsedValue::Bytes(bytes) => write!(f, "0x{}", hex_encode(bytes)),
            ParsedValue::List(items) => {
                let strs: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", strs.join(", "))
            }
            ParsedValue::Struct(fields) => {
                let strs: Vec<String> = fields.iter().map(|(n, v)| format!("{}: {}", n, v)).collect();
                write!(f, "{{ {} }}", strs.join(", "))
            }
            ParsedValue::None => write!(f, "None"),
            ParsedValue::Some(inner) => write!(f, "Some({})", inner),
        }
    }
}

impl From<bool> for ParsedValue {
    fn from(v: bool) -> Self {
        ParsedValue::Bool(v)
    }
}

impl From<u8> for ParsedValue {
    fn from(v: u8) -> Self {
        ParsedValue::U8(v)
    }
}

impl From<u64> for ParsedValue {
    fn from(v: u64) -> Self {
        ParsedValue::U64(v)
    }
}

impl From<i64> for ParsedValue {
    fn from(v: i64) -> Self {
        ParsedValue::I64(v)
    }
}

impl From<String> for ParsedValue {
    fn from(v: String) -> Self {
        ParsedValue::Str(v)
    }
}

impl From<Pubkey> for ParsedValue {
    fn from(v: Pubkey) -> Self {
        ParsedValue::PublicKey(v)
    }
}

impl From<Vec<u8>> for ParsedValue {
    fn from(v: Vec<u8>) -> Self {
        ParsedValue::Bytes(v)
    }
}

/// Parse a CLI string value according to its IDL type.
///
/// Defined structs are written as their fields in IDL order separated by
/// `:`, e.g. a `TransactionAccount` as `<pubkey>:true:false`.
pub fn parse_value(idl: &AnchorIdl, raw: &str, ty: &IdlType) -> Result<ParsedValue, String> {
    match ty {
        IdlType::Primitive(p) => parse_primitive(raw, p),
        IdlType::Array { array } => parse_array(idl, raw, &array.0, array.1),
        IdlType::Vec { vec } => parse_vec(idl, raw, vec),
        IdlType::Option { option } => {
            if raw == "none" || raw == "null" || raw.is_empty() {
                Ok(ParsedValue::None)
            } else {
                Ok(ParsedValue::Some(Box::new(parse_value(idl, raw, option)?)))
            }
        }
        IdlType::Defined { defined } => parse_struct(idl, raw, defined),
    }
}

fn parse_struct(idl: &AnchorIdl, raw: &str, name: &str) -> Result<ParsedValue, String> {
    let def = idl.type_def(name).map_err(|e| e.to_string())?;
    if def.type_.kind != "struct" {
        return Err(format!("Type '{}' is a {}, only structs can be given on the command line", name, def.type_.kind));
    }
    let parts: Vec<&str> = raw.split(':').map(|s| s.trim()).collect();
    let fields = &def.type_.fields;
    if parts.len() != fields.len() {
        let layout: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        return Err(format!(
            "Expected {} as {}, got {} value(s)",
            name,
            layout.join(":"),
            parts.len()
        ));
    }
    let mut values = Vec::with_capacity(fields.len());
    for (field, part) in fields.iter().zip(parts) {
        let value = parse_value(idl, part, &field.type_).map_err(|e| format!("{}.{}: {}", name, field.name, e))?;
        values.push((field.name.clone(), value));
    }
    Ok(ParsedValue::Struct(values))
}

fn parse_primitive(raw: &str, prim: &str) -> Result<ParsedValue, String> {
    match prim {
        "u8" => raw.parse::<u8>().map(ParsedValue::U8).map_err(|e| format!("Invalid u8 '{}': {}", raw, e)),
        "u16" => raw.parse::<u16>().map(ParsedValue::U16).map_err(|e| format!("Invalid u16 '{}': {}", raw, e)),
        "u32" => raw.parse::<u32>().map(ParsedValue::U32).map_err(|e| format!("Invalid u32 '{}': {}", raw, e)),
        "u64" => raw.parse::<u64>().map(ParsedValue::U64).map_err(|e| format!("Invalid u64 '{}': {}", raw, e)),
        "u128" => raw.parse::<u128>().map(ParsedValue::U128).map_err(|e| format!("Invalid u128 '{}': {}", raw, e)),
        "i64" => raw.parse::<i64>().map(ParsedValue::I64).map_err(|e| format!("Invalid i64 '{}': {}", raw, e)),
        "bool" => match raw {
            "true" | "1" | "yes" => Ok(ParsedValue::Bool(true)),
            "false" | "0" | "no" => Ok(ParsedValue::Bool(false)),
            _ => Err(format!("Invalid bool '{}': expected true/false", raw)),
        },
        "string" => Ok(ParsedValue::Str(raw.to_string())),
        "publicKey" => decode_pubkey(raw).map(ParsedValue::PublicKey),
        "bytes" => {
            let hex = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")).unwrap_or(raw);
            hex_decode(hex).map(ParsedValue::Bytes)
        }
        other => Err(format!("Unsupported primitive type '{}'", other)),
    }
}

fn parse_array(idl: &AnchorIdl, raw: &str, elem_type: &IdlType, size: usize) -> Result<ParsedValue, String> {
    match elem_type {
        IdlType::Primitive(p) if p == "u8" => {
            let hex = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")).unwrap_or(raw);
            let bytes = hex_decode(hex)?;
            if bytes.len() != size {
                return Err(format!("Expected {} bytes, got {}", size, bytes.len()));
            }
            Ok(ParsedValue::Bytes(bytes))
        }
        _ => {
            let parts: Vec<&str> = raw.split(',').map(|s| s.trim()).collect();
            if parts.len() != size {
                return Err(format!("Expected {} values, got {}", size, parts.len()));
            }
            let items = parts
                .iter()
                .map(|p| parse_value(idl, p, elem_type))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ParsedValue::List(items))
        }
    }
}

fn parse_vec(idl: &AnchorIdl, raw: &str, elem_type: &IdlType) -> Result<ParsedValue, String> {
    if raw.is_empty() {
        return Ok(ParsedValue::List(vec![]));
    }
    let mut items = Vec::new();
    for (i, part) in raw.split(',').map(|s| s.trim()).enumerate() {
        items.push(parse_value(idl, part, elem_type).map_err(|e| format!("Element [{}]: {}", i, e))?);
    }
    Ok(ParsedValue::List(items))
}

// ─── Token amounts ───────────────────────────────────────────────

/// Convert a UI amount ("12.5") into base units for a mint with `decimals`.
///
/// Exact decimal arithmetic: more fractional digits than the mint
/// supports is an error, not a rounding.
pub fn parse_ui_amount(raw: &str, decimals: u8, name: &str) -> CliResult<u64> {
    let raw = raw.trim();
    let (whole, frac) = match raw.split_once('.') {
        Some((w, f)) => (w, f),
        None => (raw, ""),
    };
    let is_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !is_digits(whole) || !is_digits(frac) {
        return Err(CliError::invalid_argument(name, format!("'{}' is not a decimal amount", raw)));
    }
    if frac.len() > decimals as usize {
        return Err(CliError::invalid_argument(
            name,
            format!("'{}' has more than {} decimal places", raw, decimals),
        ));
    }

    let scale = 10u64
        .checked_pow(decimals as u32)
        .ok_or_else(|| CliError::invalid_argument(name, "mint decimals too large"))?;
    let overflow = || CliError::invalid_argument(name, format!("'{}' overflows u64", raw));

    let whole_units = if whole.is_empty() {
        0
    } else {
        whole.parse::<u64>().map_err(|_| overflow())?
    };
    let frac_units = if frac.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac, width = decimals as usize);
        padded.parse::<u64>().map_err(|_| overflow())?
    };

    whole_units
        .checked_mul(scale)
        .and_then(|v| v.checked_add(frac_units))
        .ok_or_else(overflow)
}

/// Render base units as a UI amount with two decimals, like the sale
/// summaries print them.
pub fn format_ui_amount(amount: u64, decimals: u8) -> String {
    let value = amount as f64 / 10f64.powi(decimals as i32);
    format!("{:.2}", value)
}
