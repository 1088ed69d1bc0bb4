//! CLI for the QuickShare client.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use qshare_core::config;
use std::path::PathBuf;

use commands::{run_completions, run_open, run_qr, run_receive, run_send};

/// Top-level CLI for the QuickShare client.
#[derive(Debug, Parser)]
#[command(name = "qshare")]
#[command(about = "QuickShare: send files and receive them by token", long_about = None)]
pub struct Cli {
    /// Remote store base address (overrides `base_url` in config.toml).
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Check a token with the store, then open its download.
    Receive {
        /// Token received from the sender.
        token: String,
    },

    /// Open the download for a token right away, without checking it first.
    Open {
        /// Token received from the sender.
        token: String,
    },

    /// Upload one or more files and print the share token.
    Send {
        /// Files to upload.
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Use the multi-file endpoint even for a single file.
        #[arg(long)]
        multiple: bool,
        /// Copy the share link to the clipboard.
        #[arg(long)]
        copy: bool,
        /// Open the share link once the upload succeeds.
        #[arg(long)]
        open: bool,
    },

    /// Print the QR code address for a token.
    Qr {
        /// Token to encode.
        token: String,
    },

    /// Print shell completions to stdout.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        if let CliCommand::Completions { shell } = cli.command {
            run_completions(shell);
            return Ok(());
        }

        let mut cfg = config::load_or_init()?;
        if let Some(base_url) = cli.base_url {
            cfg.base_url = base_url;
        }
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Receive { token } => run_receive(&cfg, &token).await?,
            CliCommand::Open { token } => run_open(&cfg, &token).await?,
            CliCommand::Send {
                files,
                multiple,
                copy,
                open,
            } => run_send(&cfg, &files, multiple, copy, open).await?,
            CliCommand::Qr { token } => run_qr(&cfg, &token)?,
            CliCommand::Completions { .. } => {}
        }

        Ok(())
    }
}
