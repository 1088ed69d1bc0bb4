//! CLI command handlers, one per file.

mod completions;
mod open;
mod qr;
mod receive;
mod send;

pub use completions::run_completions;
pub use open::run_open;
pub use qr::run_qr;
pub use receive::run_receive;
pub use send::run_send;

use anyhow::Result;
use qshare_core::config::QshareConfig;
use qshare_core::delivery::DeliveryChain;
use qshare_core::notify::{ConsoleSink, Notifier};
use qshare_core::pipeline::{Resolution, ResolveError, TokenResolutionPipeline};
use qshare_core::probe::CurlProbe;

/// Pipeline wired to libcurl, the standard delivery chain, and the console.
pub(super) fn build_pipeline(cfg: &QshareConfig) -> Result<TokenResolutionPipeline<CurlProbe>> {
    let endpoints = cfg.endpoints()?;
    Ok(TokenResolutionPipeline::new(
        endpoints.clone(),
        CurlProbe::new(endpoints, cfg.probe_options()),
        DeliveryChain::standard(&cfg.delivery()),
        Notifier::new(ConsoleSink),
    ))
}

/// Prints what was delivered. When delivery failed the address is still
/// printed so it can be opened by hand.
pub(super) fn report(
    pipeline: &TokenResolutionPipeline<CurlProbe>,
    result: Result<Resolution, ResolveError>,
) -> Result<()> {
    match result {
        Ok(res) => {
            if let Some(name) = &res.download.filename {
                println!("File: {name}");
            }
            println!("{}", res.download.download_address);
            Ok(())
        }
        Err(ResolveError::DeliveryFailure) => {
            if let Some(download) = pipeline.last_resolved() {
                println!("{}", download.download_address);
            }
            Err(ResolveError::DeliveryFailure.into())
        }
        Err(e) => Err(e.into()),
    }
}
