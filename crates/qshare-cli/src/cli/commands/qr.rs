//! `qshare qr <token>` – print the QR code image address for a token.

use anyhow::Result;
use qshare_core::config::QshareConfig;
use qshare_core::pipeline::MSG_EMPTY_TOKEN;
use qshare_core::store::Token;

pub fn run_qr(cfg: &QshareConfig, token: &str) -> Result<()> {
    let token = Token::parse(token).ok_or_else(|| anyhow::anyhow!(MSG_EMPTY_TOKEN))?;
    println!("{}", cfg.endpoints()?.qr_code(&token));
    Ok(())
}
