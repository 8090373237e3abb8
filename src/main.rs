//! `bootstrap` binary entry point.
use std::process::ExitCode;
use std::sync::Arc;

use bootstrap_cli::cli::{Cli, Command};
use bootstrap_cli::commands;
use bootstrap_cli::logging::{self, Logger};
use clap::Parser;

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    let opts = match args.subcommand() {
        Command::Version => {
            return match commands::version::run(&mut std::io::stdout().lock()) {
                Ok(()) => ExitCode::SUCCESS,
                Err(_) => ExitCode::FAILURE,
            };
        }
        Command::Install(opts) => opts,
    };

    let home = commands::resolve_home();
    let log_file = home
        .as_ref()
        .ok()
        .map(|h| logging::log_file_path(&logging::default_log_dir(h)));
    logging::init_subscriber(args.verbose, log_file.as_deref());

    if let Err(e) = ctrlc::set_handler(|| {
        tracing::error!("interrupted");
        std::process::exit(1);
    }) {
        tracing::warn!("cannot install interrupt handler: {e}");
    }

    let log = Arc::new(Logger::new(log_file));
    match home.and_then(|home| commands::install::run(&args.global, &opts, &log, &home)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("aborted: {e:#}"));
            ExitCode::FAILURE
        }
    }
}
