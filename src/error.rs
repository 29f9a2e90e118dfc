//! Error types for the voxbook library.

use thiserror::Error;

/// Errors produced by the synthesis pipeline and its collaborators.
#[derive(Debug, Error)]
pub enum VoxbookError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// WAV encoding error
    #[error("WAV encoding error: {0}")]
    WavEncoding(#[from] hound::Error),

    /// Audio decoding or processing error
    #[error("Audio processing error: {0}")]
    AudioProcessing(String),

    /// Missing or unusable configuration (engine, tools, voice)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Voice reference could not be turned into a usable voice state
    #[error("Voice resolution error: {0}")]
    VoiceResolution(String),

    /// The TTS engine rejected a request in a way that is fatal for the run
    #[error("TTS engine error: {0}")]
    Engine(String),

    /// An external tool exited with a non-zero status
    #[error("External tool failed: {0}")]
    ToolFailure(String),

    /// A rendered chapter failed the post-encode sanity checks
    #[error("Audio verification failed: {0}")]
    QualityVerification(String),

    /// The whole run finished without producing a single chapter file
    #[error("No audio files were generated (empty text or errors)")]
    NoAudioProduced,

    /// Other error
    #[error("Other error: {0}")]
    Other(String),
}

impl From<&str> for VoxbookError {
    fn from(s: &str) -> Self {
        VoxbookError::Other(s.to_string())
    }
}

impl From<String> for VoxbookError {
    fn from(s: String) -> Self {
        VoxbookError::Other(s)
    }
}

impl From<anyhow::Error> for VoxbookError {
    fn from(err: anyhow::Error) -> Self {
        VoxbookError::Other(err.to_string())
    }
}

/// Result type used throughout the library.
pub type Result<T> = std::result::Result<T, VoxbookError>;
