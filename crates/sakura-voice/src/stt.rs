//! Speech-to-text backends.
//!
//! - [`ServerTranscriber`]: a running whisper.cpp server (`POST /inference`)
//! - [`LocalTranscriber`]: whisper.cpp in-process via whisper-rs, behind the
//!   `whisper-local` feature

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use sakura_types::config::{VoiceBackend, VoiceConfig};
use tracing::debug;

use crate::error::{Result, VoiceError};

/// Upper bound on a single server transcription.
const SERVER_TIMEOUT: Duration = Duration::from_secs(120);

/// Turns a recorded WAV file into text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Backend name for logs and diagnostics.
    fn name(&self) -> &str;

    /// Transcribe the WAV file at `wav_path`.
    async fn transcribe(&self, wav_path: &Path) -> Result<String>;
}

/// Build the transcriber selected by `config.backend`.
pub fn create_transcriber(config: &VoiceConfig) -> Result<Box<dyn Transcriber>> {
    match config.backend {
        VoiceBackend::Server => Ok(Box::new(ServerTranscriber::new(
            &config.server_url,
            &config.language,
        ))),
        VoiceBackend::Local => {
            let model = model_path(&config.resolved_model_dir(), &config.model_size);
            Ok(Box::new(LocalTranscriber::new(&model, &config.language)?))
        }
    }
}

/// `<dir>/ggml-<size>.bin`
pub fn model_path(dir: &Path, size: &str) -> PathBuf {
    dir.join(format!("ggml-{size}.bin"))
}

// ---------------------------------------------------------------------------
// whisper.cpp server
// ---------------------------------------------------------------------------

/// Client for the whisper.cpp example server.
pub struct ServerTranscriber {
    base_url: String,
    language: String,
    client: reqwest::Client,
}

impl ServerTranscriber {
    pub fn new(base_url: &str, language: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            language: language.to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn inference_url(&self) -> String {
        format!("{}/inference", self.base_url)
    }
}

#[async_trait]
impl Transcriber for ServerTranscriber {
    fn name(&self) -> &str {
        "whisper-server"
    }

    async fn transcribe(&self, wav_path: &Path) -> Result<String> {
        let wav = tokio::fs::read(wav_path).await?;
        debug!(bytes = wav.len(), url = %self.inference_url(), "sending audio to whisper server");

        let file_part = multipart::Part::bytes(wav)
            .file_name("audio.wav")
            .mime_str("audio/wav")?;
        let form = multipart::Form::new()
            .part("file", file_part)
            .text("response_format", "json")
            .text("temperature", "0.0")
            .text("language", self.language.clone());

        let resp = self
            .client
            .post(self.inference_url())
            .timeout(SERVER_TIMEOUT)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    VoiceError::Unreachable(self.base_url.clone())
                } else {
                    VoiceError::Http(e)
                }
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(VoiceError::Transcription(format!("HTTP {status}: {body}")));
        }

        let json: serde_json::Value = resp.json().await?;
        if let Some(err) = json.get("error").and_then(|e| e.as_str()) {
            return Err(VoiceError::Transcription(err.to_string()));
        }
        let text = json["text"]
            .as_str()
            .ok_or_else(|| VoiceError::Transcription("response has no 'text' field".into()))?;
        Ok(text.trim().to_string())
    }
}

// ---------------------------------------------------------------------------
// whisper-rs (local)
// ---------------------------------------------------------------------------

#[cfg(feature = "whisper-local")]
mod local {
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use tracing::info;
    use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

    use super::Transcriber;
    use crate::dsp::resample_linear;
    use crate::error::{Result, VoiceError};
    use crate::wav::read_wav;

    /// whisper.cpp expects 16 kHz mono.
    const WHISPER_RATE: u32 = 16_000;

    fn inference_threads() -> i32 {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        (cores / 2).clamp(1, 8) as i32
    }

    pub struct LocalTranscriber {
        ctx: Arc<Mutex<WhisperContext>>,
        language: String,
        n_threads: i32,
    }

    impl LocalTranscriber {
        /// Load a GGML model from disk.
        pub fn new(model_path: &Path, language: &str) -> Result<Self> {
            if !model_path.exists() {
                return Err(VoiceError::Model(format!(
                    "model not found: {}",
                    model_path.display()
                )));
            }
            let path = model_path
                .to_str()
                .ok_or_else(|| VoiceError::Model("model path is not valid UTF-8".into()))?;
            let ctx = WhisperContext::new_with_params(path, WhisperContextParameters::default())
                .map_err(|e| VoiceError::Model(format!("failed to load model: {e}")))?;
            let n_threads = inference_threads();
            info!(model = %model_path.display(), threads = n_threads, "whisper model loaded");
            Ok(Self {
                ctx: Arc::new(Mutex::new(ctx)),
                language: language.to_string(),
                n_threads,
            })
        }
    }

    #[async_trait]
    impl Transcriber for LocalTranscriber {
        fn name(&self) -> &str {
            "whisper-local"
        }

        async fn transcribe(&self, wav_path: &Path) -> Result<String> {
            let (samples, rate) = read_wav(wav_path)?;
            let audio = resample_linear(&samples, rate, WHISPER_RATE);
            let ctx = Arc::clone(&self.ctx);
            let language = self.language.clone();
            let n_threads = self.n_threads;

            tokio::task::spawn_blocking(move || -> Result<String> {
                let ctx = ctx
                    .lock()
                    .map_err(|_| VoiceError::Transcription("whisper context poisoned".into()))?;
                let mut state = ctx
                    .create_state()
                    .map_err(|e| VoiceError::Transcription(format!("failed to create state: {e}")))?;

                let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
                params.set_language(Some(&language));
                params.set_n_threads(n_threads);
                params.set_print_special(false);
                params.set_print_progress(false);
                params.set_print_realtime(false);
                params.set_print_timestamps(false);

                state
                    .full(params, &audio)
                    .map_err(|e| VoiceError::Transcription(format!("inference failed: {e}")))?;

                let segments = state
                    .full_n_segments()
                    .map_err(|e| VoiceError::Transcription(format!("no segments: {e}")))?;
                let mut text = String::new();
                for i in 0..segments {
                    if let Ok(seg) = state.full_get_segment_text(i) {
                        if !text.is_empty() {
                            text.push(' ');
                        }
                        text.push_str(seg.trim());
                    }
                }
                Ok(text)
            })
            .await
            .map_err(|e| VoiceError::Transcription(format!("whisper task failed: {e}")))?
        }
    }
}

#[cfg(not(feature = "whisper-local"))]
mod local {
    use std::path::Path;

    use async_trait::async_trait;
    use tracing::warn;

    use super::Transcriber;
    use crate::error::{Result, VoiceError};

    const DISABLED: &str =
        "local whisper transcription is not available (compile with --features whisper-local)";

    pub struct LocalTranscriber;

    impl LocalTranscriber {
        pub fn new(model_path: &Path, _language: &str) -> Result<Self> {
            warn!(
                model = %model_path.display(),
                "local whisper requested but the whisper-local feature is disabled"
            );
            Err(VoiceError::Unavailable(DISABLED.into()))
        }
    }

    #[async_trait]
    impl Transcriber for LocalTranscriber {
        fn name(&self) -> &str {
            "whisper-local"
        }

        async fn transcribe(&self, _wav_path: &Path) -> Result<String> {
            Err(VoiceError::Unavailable(DISABLED.into()))
        }
    }
}

pub use local::LocalTranscriber;
