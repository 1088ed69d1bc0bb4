use qshare_core::logging;
use qshare_core::pipeline::ResolveError;
use qshare_core::upload::UploadError;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible; a read-only state dir must not stop the CLI.
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable: {:#}", err);
    }

    // Parse CLI and dispatch.
    if let Err(err) = CliCommand::run_from_args().await {
        // Pipeline and upload failures were already shown as status lines.
        let reported = err.downcast_ref::<ResolveError>().is_some()
            || err.downcast_ref::<UploadError>().is_some();
        if !reported {
            eprintln!("qshare error: {:#}", err);
        }
        std::process::exit(1);
    }
}
