//! `qshare receive <token>` – validate a token, then open its download.

use anyhow::Result;
use qshare_core::config::QshareConfig;

use super::{build_pipeline, report};

pub async fn run_receive(cfg: &QshareConfig, token: &str) -> Result<()> {
    let pipeline = build_pipeline(cfg)?;
    let result = pipeline.resolve(token).await;
    report(&pipeline, result)
}
