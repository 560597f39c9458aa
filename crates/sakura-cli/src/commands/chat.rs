//! `sakura chat` -- the interactive wake-word session.
//!
//! Loads the config, makes sure Ollama answers, then hands stdin/stdout to
//! the [`Session`] state machine until Master quits, input ends or Ctrl-C.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Args;
use sakura_llm::OllamaClient;
use sakura_platform::NativePlatform;
use sakura_types::config::Config;
use sakura_voice::VoiceInput;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{GlobalOpts, Narration, build_agent, check_ollama, load_startup_config};
use crate::session::{Session, SessionSettings};

/// Arguments for the `sakura chat` subcommand.
#[derive(Args, Debug, Default)]
pub struct ChatArgs {
    /// Start with thinking mode on.
    #[arg(long)]
    pub thinking: bool,

    /// Skip screen clearing, the wake animation and pauses.
    #[arg(long)]
    pub no_animations: bool,
}

impl ChatArgs {
    fn apply(&self, config: &mut Config) {
        if self.thinking {
            config.show_thinking = true;
        }
        if self.no_animations {
            config.animations = false;
        }
    }
}

pub async fn run(args: ChatArgs, opts: &GlobalOpts) -> anyhow::Result<ExitCode> {
    println!("Setting up Sakura...");

    let platform = Arc::new(NativePlatform::new());
    let Some(mut config) = load_startup_config(&platform, opts, Narration::Stdout).await? else {
        return Ok(ExitCode::FAILURE);
    };
    args.apply(&mut config);

    let ollama = OllamaClient::new(config.ollama_base_url.clone());
    match check_ollama(&ollama).await {
        Ok(version) => info!(version = %version, "ollama is up"),
        Err(problem) => {
            for line in problem.guidance(&config.ollama_model) {
                println!("{line}");
            }
            return Ok(ExitCode::FAILURE);
        }
    }
    match ollama.has_model(&config.ollama_model).await {
        Ok(true) => {}
        Ok(false) => println!(
            "⚠️  Model '{model}' is not pulled yet. Run: ollama pull {model}",
            model = config.ollama_model
        ),
        Err(e) => debug!(error = %e, "could not list ollama models"),
    }

    let voice = if config.voice.enabled {
        match VoiceInput::from_config(&config.voice) {
            Ok(voice) => {
                println!("🎙️ Voice input ready ({})", voice.backend_name());
                Some(voice)
            }
            Err(e) => {
                warn!(error = %e, "voice input disabled");
                println!("⚠️  Voice input unavailable ({e}). Continuing with text only.");
                None
            }
        }
    } else {
        None
    };

    println!("🌸 Anime Maid CLI Assistant - {} 🌸", config.name);

    let agent = build_agent(&config, platform, Narration::Stdout);

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("ctrl-c received");
            on_ctrl_c.cancel();
        }
    });

    let settings = SessionSettings {
        name: config.name.clone(),
        wake_word: config.wake_word.clone(),
        animations: config.animations,
    };
    let mut session = Session::new(&agent, settings).with_cancel(cancel);
    if let Some(voice) = voice.as_ref() {
        session = session.with_listener(voice);
    }

    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    session.run(&mut stdin, &mut stdout).await?;
    Ok(ExitCode::SUCCESS)
}
