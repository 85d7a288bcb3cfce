//! # Catalog CLI
//!
//! Command-line client for the product catalog backend.
//!
//! ## Startup sequence
//!
//! 1. Parse CLI arguments (clap handles `--help` / `--version` early-exit).
//! 2. Load configuration (defaults, file, env, then flags).
//! 3. Initialise the tracing subscriber, including the optional log file.
//! 4. Build the [`OutputManager`] and the tokio runtime.
//! 5. Dispatch to the appropriate command handler; Ctrl-C cancels it.
//! 6. Translate any [`CliError`] into a user-facing message and exit code.
//!
//! ## Exit codes
//!
//! | Code | Meaning                      |
//! |------|------------------------------|
//! |  0   | Success                      |
//! |  1   | Internal / system error      |
//! |  2   | User / validation error      |
//! |  3   | Product not found            |
//! |  4   | Configuration error          |
//! |  5   | Conflict (duplicate product) |
//! |  6   | Backend unreachable          |
//! | 130  | Cancelled                    |

use std::io::IsTerminal as _;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::{
    cli::{Cli, Commands, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

/// How long blocked stdin readers may hold up exit.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(100);

fn main() -> ExitCode {
    // A missing .env is fine; real deployments use the environment.
    let _ = dotenvy::dotenv();

    // ── 1. Parse arguments ────────────────────────────────────────────────
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version arrive here too.
            return if e.use_stderr() {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // ── 2. Load configuration ─────────────────────────────────────────────
    // Loaded before logging so `logging.file` can take effect.
    let config = match AppConfig::load(cli.global.config.as_deref()) {
        Ok(cfg) => cfg.with_overrides(&cli.global),
        Err(e) => {
            eprintln!("Configuration error: {e:#}");
            return ExitCode::from(4);
        }
    };

    // ── 3. Initialise tracing ─────────────────────────────────────────────
    let _log_guard = match init_logging(&cli.global, config.logging.file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialise logging: {e:#}");
            return ExitCode::from(1);
        }
    };

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        base_url = %config.api.base_url,
        "CLI started"
    );

    // ── 4. Output and runtime ─────────────────────────────────────────────
    let output = OutputManager::new(&cli.global, &config);
    let verbose = cli.global.verbose > 0;

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => return handle_error(e.into(), verbose, &output),
    };

    let cancel = CancellationToken::new();
    runtime.spawn(cancel_on_ctrl_c(cancel.clone()));

    // ── 5. Dispatch + 6. Error handling ──────────────────────────────────
    let result = runtime.block_on(run(cli.command, &cli.global, &config, &output, cancel));
    runtime.shutdown_timeout(SHUTDOWN_GRACE);

    match result {
        Ok(()) => {
            info!("Catalog completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, verbose, &output),
    }
}

/// Dispatch to the correct command handler.
#[instrument(skip_all)]
async fn run(
    command: Commands,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
    cancel: CancellationToken,
) -> CliResult<()> {
    let service = || commands::connect(config, cancel.clone());

    match command {
        Commands::List(args) => commands::list::execute(args, &service()?, config, output).await,
        Commands::Get(args) => commands::get::execute(args, &service()?, output).await,
        Commands::Create(args) => commands::create::execute(args, &service()?, output).await,
        Commands::Update(args) => commands::update::execute(args, &service()?, output).await,
        Commands::Delete(args) => commands::delete::execute(args, &service()?, output).await,
        Commands::Search(args) => {
            commands::search::execute(args, &service()?, config, output, cancel.clone()).await
        }
        Commands::Validate(args) => commands::validate::execute(args, output),
        Commands::Init(args) => commands::init::execute(args, output),
        Commands::Completions(args) => commands::completions::execute(args),
        Commands::Config(cmd) => commands::config::execute(cmd, global, config, output),
    }
}

/// Cancel `cancel` on the first Ctrl-C.
async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        warn!("Interrupted, cancelling in-flight requests");
        cancel.cancel();
    }
}

/// Translate a `CliError` into a user message and an exit code.
fn handle_error(err: CliError, verbose: bool, output: &OutputManager) -> ExitCode {
    err.log();

    // Written to stderr so it shows even when stdout is redirected.
    let msg = if output.supports_color() && std::io::stderr().is_terminal() {
        err.format_colored(verbose)
    } else {
        err.format_plain(verbose)
    };
    eprint!("{msg}");

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_version_matches_cargo() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_version(), Some(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn cli_has_author() {
        let cmd = Cli::command();
        assert!(cmd.get_author().is_some());
    }

    #[test]
    fn local_commands_need_no_backend() {
        let cli = Cli::parse_from(["catalog", "config", "get", "search.debounce_ms"]);
        let mut config = AppConfig::default();
        // Unusable, but never dialled.
        config.api.base_url = "not a url".into();
        let output = OutputManager::new(&cli.global, &config);

        let result = tokio_test::block_on(run(
            cli.command,
            &cli.global,
            &config,
            &output,
            CancellationToken::new(),
        ));
        assert!(result.is_ok());
    }
}
