//! Voice pipeline errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceError {
    /// No usable microphone.
    #[error("no input device: {0}")]
    NoDevice(String),

    /// The audio stream could not be configured or started.
    #[error("audio stream error: {0}")]
    Stream(String),

    /// Recording stopped before any audio arrived.
    #[error("no audio was recorded")]
    EmptyRecording,

    /// The requested capability was not compiled in.
    #[error("{0}")]
    Unavailable(String),

    /// Whisper model file missing or unloadable.
    #[error("whisper model error: {0}")]
    Model(String),

    /// The transcription backend returned an error.
    #[error("transcription failed: {0}")]
    Transcription(String),

    /// The whisper server could not be reached.
    #[error("whisper server unreachable at {0}")]
    Unreachable(String),

    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, VoiceError>;
