//! Voice input for sakura.
//!
//! [`VoiceInput::listen`] records one utterance from the microphone until
//! told to stop, writes it to a scratch WAV file, transcribes it, and
//! removes the file again.
//!
//! ```rust,no_run
//! use sakura_types::config::VoiceConfig;
//! use sakura_voice::VoiceInput;
//!
//! # async fn example() -> sakura_voice::error::Result<()> {
//! let voice = VoiceInput::from_config(&VoiceConfig::default())?;
//! let (stop, rx) = tokio::sync::oneshot::channel();
//! // ...call stop.send(()) when Master presses Enter...
//! # let _ = stop.send(());
//! let text = voice.listen(rx).await?;
//! # Ok(())
//! # }
//! ```

pub mod capture;
pub mod dsp;
pub mod error;
pub mod stt;
pub mod wav;

use std::path::{Path, PathBuf};

use sakura_types::config::VoiceConfig;
use tokio::sync::oneshot;
use tracing::{info, warn};

pub use capture::Recorder;
pub use error::VoiceError;
pub use stt::{LocalTranscriber, ServerTranscriber, Transcriber, create_transcriber};

use crate::error::Result;

/// Record, transcribe, clean up.
pub struct VoiceInput {
    recorder: Recorder,
    transcriber: Box<dyn Transcriber>,
    wav_path: PathBuf,
}

impl VoiceInput {
    pub fn new(recorder: Recorder, transcriber: Box<dyn Transcriber>) -> Self {
        Self {
            recorder,
            transcriber,
            wav_path: wav::temp_wav_path(),
        }
    }

    /// Recorder and transcriber as described by `config`.
    pub fn from_config(config: &VoiceConfig) -> Result<Self> {
        let recorder = Recorder::new(config.input_device.clone(), config.sample_rate);
        let transcriber = create_transcriber(config)?;
        info!(backend = transcriber.name(), "voice input ready");
        Ok(Self::new(recorder, transcriber))
    }

    /// Use a different scratch file.
    pub fn with_wav_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.wav_path = path.into();
        self
    }

    pub fn wav_path(&self) -> &Path {
        &self.wav_path
    }

    pub fn backend_name(&self) -> &str {
        self.transcriber.name()
    }

    /// Record until `stop` fires, then transcribe.
    pub async fn listen(&self, stop: oneshot::Receiver<()>) -> Result<String> {
        let samples = self.recorder.record(stop).await?;
        self.transcribe_samples(&samples, self.recorder.sample_rate())
            .await
    }

    /// Save `samples` to the scratch file, transcribe it, and remove it.
    ///
    /// The file is removed whether or not transcription succeeded; a failed
    /// removal is only logged.
    pub async fn transcribe_samples(&self, samples: &[f32], sample_rate: u32) -> Result<String> {
        if samples.is_empty() {
            return Err(VoiceError::EmptyRecording);
        }
        wav::write_wav(&self.wav_path, samples, sample_rate)?;
        info!(backend = self.transcriber.name(), "transcribing audio");
        let result = self.transcriber.transcribe(&self.wav_path).await;

        if let Err(e) = tokio::fs::remove_file(&self.wav_path).await {
            warn!(path = %self.wav_path.display(), error = %e, "error removing temp file");
        }
        result.map(|text| text.trim().to_string())
    }
}
