//! Pool inspection: render every field of a pool account.

use ido_pool_core::idl::AnchorIdl;
use ido_pool_core::types::PoolAccount;
use solana_sdk::pubkey::Pubkey;

use crate::cli::format_ts;
use crate::error::CliResult;
use crate::parse::ParsedValue;
use crate::pda::pool_signer_from_nonce;
use crate::serialize::decode_fields;

/// One line per pool field, names right-aligned, followed by the derived
/// pool signer, the current time and the sale phase.
///
/// `data` is the raw account data, discriminator included.
pub fn render_pool(
    idl: &AnchorIdl,
    data: &[u8],
    program_id: &Pubkey,
    now: i64,
) -> CliResult<Vec<String>> {
    let pool = PoolAccount::decode(data)?;
    let fields = decode_fields(idl, PoolAccount::NAME, &data[8..])?;

    let mut lines = Vec::with_capacity(fields.len() + 3);
    for (name, value) in &fields {
        let line = match value {
            ParsedValue::I64(ts) if name.ends_with("Ts") => format!("{:>22} {} {}", name, ts, format_ts(*ts)),
            other => format!("{:>22} {}", name, other),
        };
        lines.push(line);
    }

    let signer = pool_signer_from_nonce(&pool.watermelon_mint, pool.nonce, program_id)
        .map(|s| s.to_string())
        .unwrap_or_else(|e| format!("<{}>", e));
    lines.push(format!("{:>22} {}", "poolSigner", signer));
    lines.push(format!("{:>22} {} {}", "now", now, format_ts(now)));
    lines.push(format!("{:>22} {}", "phase", pool.schedule().phase_at(now)));
    Ok(lines)
}
