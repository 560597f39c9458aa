//! `sakura ask` -- one request, one reply.
//!
//! The reply goes to stdout; tool narration and warnings go to stderr so
//! the output can be piped.
//!
//! ```text
//! sakura ask -m "what's using my CPU?"
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use clap::Args;
use sakura_llm::OllamaClient;
use sakura_platform::NativePlatform;
use tracing::warn;

use super::{GlobalOpts, Narration, build_agent, check_ollama, load_startup_config};

/// Arguments for the `sakura ask` subcommand.
#[derive(Args, Debug)]
pub struct AskArgs {
    /// What to ask the maid.
    #[arg(short, long)]
    pub message: String,
}

pub async fn run(args: AskArgs, opts: &GlobalOpts) -> anyhow::Result<ExitCode> {
    let message = args.message.trim();
    if message.is_empty() {
        eprintln!("❌ Nothing to ask, Master. Pass a message with -m.");
        return Ok(ExitCode::FAILURE);
    }

    let platform = Arc::new(NativePlatform::new());
    let Some(config) = load_startup_config(&platform, opts, Narration::Stderr).await? else {
        return Ok(ExitCode::FAILURE);
    };

    let ollama = OllamaClient::new(config.ollama_base_url.clone());
    if let Err(problem) = check_ollama(&ollama).await {
        for line in problem.guidance(&config.ollama_model) {
            eprintln!("{line}");
        }
        return Ok(ExitCode::FAILURE);
    }

    let agent = build_agent(&config, platform, Narration::Stderr);
    match agent.try_process(message).await {
        Ok(reply) => {
            println!("{reply}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            warn!(error = %e, "ask failed");
            eprintln!("Sorry Master, I encountered an error... ({e})");
            Ok(ExitCode::FAILURE)
        }
    }
}
