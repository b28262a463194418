//! Command-line harness for the Seamark PGN translator.
//!
//! Feeds decoded messages (one JSON object per line, as emitted by the
//! network analyzer) through the translation pipeline without a running
//! host: rules come from a config file, the device registry from an
//! optional snapshot file, and deltas go to stdout as JSON lines.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, warn};

use seamark_core::DecodedMessage;
use seamark_translate::{
    DeviceLookup, NullRegistry, RegistrySnapshot, Translator, TranslatorConfig,
};

/// Seamark - translate marine PGNs into path/value updates.
#[derive(Parser, Debug)]
#[command(name = "seamark")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Action to perform.
    #[command(subcommand)]
    command: Command,

    /// Verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Translate decoded messages from stdin to deltas on stdout.
    Run {
        /// Rule configuration file (JSON, `pgns` key).
        #[arg(short, long)]
        config: PathBuf,
        /// Device registry snapshot file (JSON), if the host exported one.
        #[arg(long)]
        registry: Option<PathBuf>,
        /// Pretty-print emitted deltas.
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    match args.command {
        Command::Run {
            config,
            registry,
            pretty,
        } => run(&config, registry.as_deref(), pretty),
    }
}

fn run(config_path: &std::path::Path, registry_path: Option<&std::path::Path>, pretty: bool) -> Result<()> {
    let raw = fs::read_to_string(config_path)
        .with_context(|| format!("reading config {}", config_path.display()))?;
    let config = TranslatorConfig::from_value(
        serde_json::from_str(&raw).context("config is not valid JSON")?,
    )
    .context("invalid translator configuration")?;

    let registry: Box<dyn DeviceLookup> = match registry_path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading registry snapshot {}", path.display()))?;
            Box::new(
                serde_json::from_str::<RegistrySnapshot>(&raw)
                    .context("registry snapshot is not valid JSON")?,
            )
        }
        None => Box::new(NullRegistry),
    };

    if config.pgns.is_empty() {
        warn!("no transform rules configured; nothing will be emitted");
    }
    let translator = Translator::new(config.pgns);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for (number, line) in stdin.lock().lines().enumerate() {
        let line = line.context("reading stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        // One bad line never stops the stream.
        let message: DecodedMessage = match serde_json::from_str(&line) {
            Ok(message) => message,
            Err(e) => {
                error!(line = number + 1, error = %e, "skipping undecodable message");
                continue;
            }
        };

        let Some(translation) = translator.translate(registry.as_ref(), &message) else {
            continue;
        };
        for failure in &translation.failures {
            error!(pgn = message.pgn, source = message.source, %failure, "placeholder resolution failed");
        }
        if translation.delta.is_empty() {
            continue;
        }

        let json = if pretty {
            serde_json::to_string_pretty(&translation.delta)?
        } else {
            serde_json::to_string(&translation.delta)?
        };
        writeln!(out, "{json}")?;
    }

    Ok(())
}
