//! Pipeline configuration.
//!
//! All tunables of the synthesis pipeline live here, with defaults matching
//! the speaking characteristics of the bundled voice engine.

use serde::{Deserialize, Serialize};

/// Sample rate the voice engine produces and every buffer in the pipeline
/// uses. Reference audio is resampled to this rate before cloning.
pub const SAMPLE_RATE: u32 = 24_000;

/// Configuration for the synthesis pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Pause inserted between sentences within a paragraph (seconds)
    pub sentence_pause: f32,
    /// Pause inserted at a paragraph break (seconds)
    pub paragraph_pause: f32,
    /// Minimum plausible audio duration per character of source text (seconds)
    pub min_duration_per_char: f32,
    /// Maximum plausible audio duration per character of source text (seconds)
    pub max_duration_per_char: f32,
    /// RMS amplitude below which a chapter is considered silent
    pub min_rms_threshold: f32,
    /// Bitrate for the final container's audio stream
    pub container_bitrate: String,
    /// VBR quality passed to the per-chapter MP3 encode (`-qscale:a`)
    pub mp3_quality: u8,
    /// Maximum number of characters synthesized by a voice preview
    pub preview_char_limit: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sentence_pause: 0.5,
            paragraph_pause: 0.9,
            min_duration_per_char: 0.03,
            max_duration_per_char: 0.15,
            min_rms_threshold: 0.001,
            container_bitrate: "64k".to_string(),
            mp3_quality: 2,
            preview_char_limit: 500,
        }
    }
}
