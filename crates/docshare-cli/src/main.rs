#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod command;
mod config;

use std::process;

use anyhow::Context;
use docshare_client::{ApiClient, FileTokenStore, Session};

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "docshare_cli::startup";
pub const TRACING_TARGET_CONFIG: &str = "docshare_cli::config";
pub const TRACING_TARGET_COMMAND: &str = "docshare_cli::command";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        process::exit(0);
    };

    let kind = error
        .downcast_ref::<docshare_core::Error>()
        .map_or("unknown", docshare_core::Error::kind_str);
    tracing::error!(
        target: TRACING_TARGET_COMMAND,
        kind,
        error = ?error,
        "command failed"
    );
    eprintln!("Error: {error:#}");

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log();
    cli.validate()?;

    let session = Session::new(FileTokenStore::new(&cli.session.session_file));
    if let Err(error) = session.restore().await {
        tracing::warn!(
            target: TRACING_TARGET_STARTUP,
            error = %error,
            path = %cli.session.session_file.display(),
            "ignoring unreadable session file"
        );
    }

    let client = ApiClient::new(cli.client.clone(), session).context("failed to create client")?;
    cli.command.execute(&client).await
}
