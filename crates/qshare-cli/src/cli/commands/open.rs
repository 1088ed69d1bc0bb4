//! `qshare open <token>` – open the download address without probing the token.

use anyhow::Result;
use qshare_core::config::QshareConfig;

use super::{build_pipeline, report};

pub async fn run_open(cfg: &QshareConfig, token: &str) -> Result<()> {
    let pipeline = build_pipeline(cfg)?;
    let result = pipeline.resolve_and_deliver_immediately(token).await;
    report(&pipeline, result)
}
