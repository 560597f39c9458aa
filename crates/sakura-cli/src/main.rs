//! `sakura` -- an anime maid assistant for the terminal.
//!
//! Provides the following subcommands:
//!
//! - `sakura chat` -- sleep until the wake word, then take requests (default).
//! - `sakura ask` -- send one request and print the reply.
//! - `sakura doctor` -- check Ollama, the model, helper binaries and voice.
//! - `sakura tools` -- list the tools the maid can use.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod art;
mod commands;
mod observer;
mod session;

use commands::GlobalOpts;

/// Anime maid CLI assistant backed by a local Ollama model.
#[derive(Parser)]
#[command(name = "sakura", about = "Anime maid CLI assistant backed by Ollama", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path (overrides SAKURA_CONFIG and auto-discovery).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Ollama model to use instead of the configured one.
    #[arg(long, global = true)]
    model: Option<String>,

    /// Enable voice input.
    #[arg(long, global = true)]
    voice: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Wait for the wake word, then chat (the default).
    Chat(commands::chat::ChatArgs),

    /// Send a single request and print the reply.
    Ask(commands::ask::AskArgs),

    /// Diagnose the local setup.
    Doctor,

    /// List the built-in tools.
    Tools,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let code = runtime.block_on(dispatch(cli));
    // A pending stdin read lives on the blocking pool and would keep a
    // graceful shutdown waiting for one more line after Ctrl-C.
    runtime.shutdown_background();
    code
}

async fn dispatch(cli: Cli) -> anyhow::Result<ExitCode> {
    let opts = GlobalOpts {
        config: cli.config,
        model: cli.model,
        voice: cli.voice,
    };

    match cli.command.unwrap_or(Commands::Chat(Default::default())) {
        Commands::Chat(args) => commands::chat::run(args, &opts).await,
        Commands::Ask(args) => commands::ask::run(args, &opts).await,
        Commands::Doctor => commands::doctor::run(&opts).await,
        Commands::Tools => commands::tools::run(&opts).await,
    }
}
