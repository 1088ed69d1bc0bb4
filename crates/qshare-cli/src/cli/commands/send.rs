//! `qshare send <files>...` – upload files and print the share token.

use anyhow::Result;
use qshare_core::config::QshareConfig;
use qshare_core::delivery::{copy_to_clipboard, DeliveryChain, DeliveryResult};
use qshare_core::notify::{ConsoleSink, Notifier};
use qshare_core::pipeline::{MSG_COPIED, MSG_DELIVERY_FAILED};
use qshare_core::store::StoreEndpoints;
use qshare_core::upload::{UploadReceipt, Uploader, MSG_UPLOADED};
use std::path::PathBuf;

pub async fn run_send(
    cfg: &QshareConfig,
    files: &[PathBuf],
    multiple: bool,
    copy: bool,
    open: bool,
) -> Result<()> {
    let endpoints = cfg.endpoints()?;
    let notifier = Notifier::new(ConsoleSink);
    let uploader = Uploader::new(endpoints.clone(), cfg.upload_options());

    let multiple = multiple || files.len() > 1;
    let receipt = match uploader.upload(files, multiple).await {
        Ok(receipt) => receipt,
        Err(e) => {
            notifier.error(e.to_string());
            return Err(e.into());
        }
    };
    notifier.success(MSG_UPLOADED);
    print_receipt(&receipt, &endpoints);

    if !copy && !open {
        return Ok(());
    }
    let Some(link) = receipt.share_link(&endpoints) else {
        notifier.error("Upload response carried no token");
        return Ok(());
    };

    if copy {
        let tools = cfg.delivery().clipboard;
        match copy_to_clipboard(&link, tools.as_deref()).await {
            Ok(()) => {
                notifier.success("Link copied to clipboard");
            }
            Err(e) => {
                tracing::warn!("copy share link: {}", e);
                notifier.error("Failed to copy");
            }
        }
    }
    if open {
        let chain = DeliveryChain::standard(&cfg.delivery());
        open_share_link(&chain, &notifier, &link).await;
    }
    Ok(())
}

/// Hands the share link to the delivery chain and reports degraded outcomes.
async fn open_share_link(chain: &DeliveryChain, notifier: &Notifier, link: &str) -> DeliveryResult {
    let result = chain.deliver(link).await;
    match result {
        DeliveryResult::Opened => {}
        DeliveryResult::CopiedToClipboard => {
            notifier.info(MSG_COPIED);
        }
        DeliveryResult::Failed => {
            notifier.error(MSG_DELIVERY_FAILED);
            println!("Open manually: {link}");
        }
    }
    result
}

fn print_receipt(receipt: &UploadReceipt, endpoints: &StoreEndpoints) {
    println!("Token: {}", receipt.token);
    if !receipt.files.is_empty() {
        println!("Files:");
        for name in &receipt.files {
            println!("  {name}");
        }
    }
    if let Some(link) = receipt.share_link(endpoints) {
        println!("Link:  {link}");
    }
    if let Some(qr) = receipt.qr_code(endpoints) {
        println!("QR:    {qr}");
    }
}
