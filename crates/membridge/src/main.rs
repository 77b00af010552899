//! `membridge` binary: run one memory command and print one JSON line.

use anyhow::Context;
use clap::Parser;
use clap::error::ErrorKind;
use log::{error, info};
use membridge::config::{LayeredConfigOptions, MembridgeConfig};
use membridge::memory::{BackendRegistry, Envelope, LogObserver};
use membridge::{Bridge, parse_args};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

/// Exit status for CLI usage errors.
const USAGE_EXIT: u8 = 2;

/// Command-line options for the memory bridge.
#[derive(Parser)]
#[command(name = "membridge", version, about = "Per-user memory store bridge")]
struct Cli {
    /// Optional path to a membridge.json5 config file
    #[arg(long, env = "MEMBRIDGE_CONFIG")]
    config: Option<PathBuf>,
    /// Command to run: add, search, delete, get_all, reset
    command: String,
    /// JSON object with the command arguments
    #[arg(default_value = "{}")]
    args: String,
}

fn print_envelope(envelope: &Envelope) {
    println!("{}", envelope.to_json_line());
}

fn load_config(runtime_path: Option<&Path>) -> anyhow::Result<MembridgeConfig> {
    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    let mut options = LayeredConfigOptions::new(cwd);
    if let Some(path) = runtime_path {
        options = options.with_runtime_path(path);
    }
    let layered = MembridgeConfig::load_layered_with_options(options)
        .context("failed to load config")?;
    Ok(layered.config)
}

async fn run(cli: Cli) -> anyhow::Result<Envelope> {
    let config = load_config(cli.config.as_deref())?;
    let args = parse_args(&cli.args)?;
    let bridge = Bridge::from_config(&config, &BackendRegistry::new(), Arc::new(LogObserver));
    let envelope = bridge.dispatch(&cli.command, args).await?;
    Ok(envelope)
}

/// Entry point for the memory bridge.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    membridge::init_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            let rendered = err.to_string();
            let message = rendered
                .lines()
                .next()
                .unwrap_or("invalid usage")
                .trim_start_matches("error: ");
            print_envelope(&Envelope::failure(message));
            return ExitCode::from(USAGE_EXIT);
        }
    };
    info!("running command {}", cli.command);

    match run(cli).await {
        Ok(envelope) => {
            print_envelope(&envelope);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("command failed: {err:#}");
            print_envelope(&Envelope::failure(format!("{err:#}")));
            ExitCode::FAILURE
        }
    }
}
