//! Borsh encoding of instruction arguments and decoding of account data,
//! both driven by IDL types.

use borsh::{BorshDeserialize, BorshSerialize};
use ido_pool_core::idl::{AnchorIdl, IdlField, IdlType};
use solana_sdk::pubkey::Pubkey;

use crate::cli::idl_type_display;
use crate::error::{CliError, CliResult};
use crate::parse::ParsedValue;

/// Serialize instruction arguments in IDL order.
///
/// Produces the Borsh body that follows the 8-byte sighash.
pub fn serialize_args(
    idl: &AnchorIdl,
    fields: &[IdlField],
    values: &[&ParsedValue],
) -> CliResult<Vec<u8>> {
    let mut out = Vec::new();
    for (field, val) in fields.iter().zip(values) {
        serialize_value(idl, &mut out, &field.name, &field.type_, val)?;
    }
    Ok(out)
}

fn serialize_value(
    idl: &AnchorIdl,
    out: &mut Vec<u8>,
    name: &str,
    ty: &IdlType,
    val: &ParsedValue,
) -> CliResult<()> {
    match (ty, val) {
        (IdlType::Primitive(p), _) => serialize_primitive(out, name, p, ty, val),
        (IdlType::Array { array }, ParsedValue::Bytes(bytes)) if is_u8(&array.0) => {
            if bytes.len() != array.1 {
                return Err(mismatch(name, ty, val));
            }
            out.extend_from_slice(bytes);
            Ok(())
        }
        (IdlType::Array { array }, ParsedValue::List(items)) => {
            if items.len() != array.1 {
                return Err(mismatch(name, ty, val));
            }
            for item in items {
                serialize_value(idl, out, name, &array.0, item)?;
            }
            Ok(())
        }
        (IdlType::Vec { vec }, ParsedValue::List(items)) => {
            (items.len() as u32).serialize(out)?;
            for item in items {
                serialize_value(idl, out, name, vec, item)?;
            }
            Ok(())
        }
        (IdlType::Option { .. }, ParsedValue::None) => {
            out.push(0);
            Ok(())
        }
        (IdlType::Option { option }, ParsedValue::Some(inner)) => {
            out.push(1);
            serialize_value(idl, out, name, option, inner)
        }
        (IdlType::Defined { defined }, ParsedValue::Struct(fields)) => {
            let def = idl.type_def(defined)?;
            if def.type_.fields.len() != fields.len() {
                return Err(mismatch(name, ty, val));
            }
            for (field_def, (field_name, field_val)) in def.type_.fields.iter().zip(fields) {
                if field_def.name != *field_name {
                    return Err(mismatch(name, ty, val));
                }
                let path = format!("{}.{}", name, field_name);
                serialize_value(idl, out, &path, &field_def.type_, field_val)?;
            }
            Ok(())
        }
        _ => Err(mismatch(name, ty, val)),
    }
}

fn serialize_primitive(
    out: &mut Vec<u8>,
    name: &str,
    prim: &str,
    ty: &IdlType,
    val: &ParsedValue,
) -> CliResult<()> {
    match (prim, val) {
        ("bool", ParsedValue::Bool(b)) => b.serialize(out)?,
        ("u8", ParsedValue::U8(v)) => v.serialize(out)?,
        ("u16", ParsedValue::U16(v)) => v.serialize(out)?,
        ("u32", ParsedValue::U32(v)) => v.serialize(out)?,
        ("u64", ParsedValue::U64(v)) => v.serialize(out)?,
        ("u128", ParsedValue::U128(v)) => v.serialize(out)?,
        ("i64", ParsedValue::I64(v)) => v.serialize(out)?,
        ("string", ParsedValue::Str(s)) => s.serialize(out)?,
        ("publicKey", ParsedValue::PublicKey(k)) => out.extend_from_slice(k.as_ref()),
        ("bytes", ParsedValue::Bytes(b)) => b.serialize(out)?,
        _ => return Err(mismatch(name, ty, val)),
    }
    Ok(())
}

fn is_u8(ty: &IdlType) -> bool {
    matches!(ty, IdlType::Primitive(p) if p == "u8")
}

fn mismatch(name: &str, ty: &IdlType, val: &ParsedValue) -> CliError {
    CliError::TypeMismatch {
        name: name.to_string(),
        expected: idl_type_display(ty),
        value: format!("{:?}", val),
    }
}

// ─── Decoding ────────────────────────────────────────────────────

/// Decode the fields of a `defined` struct from Borsh bytes.
///
/// `data` starts after the account discriminator.
pub fn decode_fields(
    idl: &AnchorIdl,
    type_name: &str,
    data: &[u8],
) -> CliResult<Vec<(String, ParsedValue)>> {
    let mut buf = data;
    match decode_value(idl, &IdlType::Defined { defined: type_name.to_string() }, &mut buf)? {
        ParsedValue::Struct(fields) => Ok(fields),
        other => Err(CliError::TypeMismatch {
            name: type_name.to_string(),
            expected: "struct".to_string(),
            value: format!("{:?}", other),
        }),
    }
}

fn decode_value(idl: &AnchorIdl, ty: &IdlType, buf: &mut &[u8]) -> CliResult<ParsedValue> {
    let value = match ty {
        IdlType::Primitive(p) => match p.as_str() {
            "bool" => ParsedValue::Bool(bool::deserialize(buf)?),
            "u8" => ParsedValue::U8(u8::deserialize(buf)?),
            "u16" => ParsedValue::U16(u16::deserialize(buf)?),
            "u32" => ParsedValue::U32(u32::deserialize(buf)?),
            "u64" => ParsedValue::U64(u64::deserialize(buf)?),
            "u128" => ParsedValue::U128(u128::deserialize(buf)?),
            "i64" => ParsedValue::I64(i64::deserialize(buf)?),
            "string" => ParsedValue::Str(String::deserialize(buf)?),
            "publicKey" => ParsedValue::PublicKey(Pubkey::new_from_array(<[u8; 32]>::deserialize(buf)?)),
            "bytes" => ParsedValue::Bytes(Vec::<u8>::deserialize(buf)?),
            other => {
                return Err(CliError::TypeMismatch {
                    name: other.to_string(),
                    expected: "known primitive".to_string(),
                    value: other.to_string(),
                })
            }
        },
        IdlType::Array { array } => {
            let mut items = Vec::with_capacity(array.1);
            for _ in 0..array.1 {
                items.push(decode_value(idl, &array.0, buf)?);
            }
            ParsedValue::List(items)
        }
        IdlType::Vec { vec } => {
            let len = u32::deserialize(buf)?;
            let mut items = Vec::new();
            for _ in 0..len {
                items.push(decode_value(idl, vec, buf)?);
            }
            ParsedValue::List(items)
        }
        IdlType::Option { option } => match u8::deserialize(buf)? {
            0 => ParsedValue::None,
            _ => ParsedValue::Some(Box::new(decode_value(idl, option, buf)?)),
        },
        IdlType::Defined { defined } => {
            let def = idl.type_def(defined)?;
            let mut fields = Vec::with_capacity(def.type_.fields.len());
            for field in &def.type_.fields {
                fields.push((field.name.clone(), decode_value(idl, &field.type_, buf)?));
            }
            ParsedValue::Struct(fields)
        }
    };
    Ok(value)
}
