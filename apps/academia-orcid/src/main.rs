//! academia-orcid - faculty report sections from ORCID records
//!
//! Writes one file per invocation and prints its path on stdout:
//! - `latex`: `orcid-publications.tex` / `orcid-data.tex`
//! - `bibtex`: `orcid-publications.bib`
//! - `json`: `orcid-publications.json` / `orcid-data.json`
//!
//! Exit codes: 0 success (including "nothing to write"), 1 invalid input,
//! 2 ORCID API failure.

mod cli;
mod commands;
mod logging;

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error};

use orcid_fetch::Config;

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let common = cli.command.common();

    if let Err(e) = logging::init_logging(common.log_level, common.log_file.as_deref()) {
        eprintln!("error: cannot open log file: {e}");
        return ExitCode::FAILURE;
    }

    let config = Config::load(common.config.as_deref());
    debug!(
        "Using configuration (cache TTL: {}s, API timeout: {}s)",
        config.cache.ttl_seconds, config.api.timeout_secs
    );

    match commands::run(&cli.command, &config).await {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
