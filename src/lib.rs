//! voxbook: chaptered text in, chaptered audiobook out.
//!
//! The library drives an opaque text-to-speech engine sentence by sentence
//! over book chapters, stitches the segments with context-aware silence,
//! sanity-checks every rendered chapter, and muxes the result into a single
//! chaptered container with metadata and cover art via ffmpeg.
//!
//! The GUI shell, EPUB extraction, and engine/model installation are the
//! caller's business: chapters arrive as plain text, an engine arrives as a
//! [`engine::TtsEngine`] implementation, and progress leaves through a
//! callback or the polled [`progress::ProgressStore`].

pub mod audio;
pub mod book;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod media;
pub mod progress;
pub mod runner;
pub mod synth;
pub mod text;

use std::path::Path;

pub use book::{BookMetadata, Chapter};
pub use config::{PipelineConfig, SAMPLE_RATE};
pub use engine::voice::VoiceSpec;
pub use error::{Result, VoxbookError};
pub use progress::{CancellationToken, ProgressSnapshot, ProgressStore};
pub use runner::{SynthesisRequest, SynthesisRunner};
pub use synth::{BookOutcome, SpeechPipeline};

/// Synthesize a whole book with the installed engine and default settings.
///
/// Blocking; runs on the calling thread. Use [`SynthesisRunner`] to run in
/// the background with polled progress instead.
pub fn synthesize_book(
    chapters: &[Chapter],
    output_folder: &Path,
    voice: &VoiceSpec,
    metadata: &BookMetadata,
) -> Result<BookOutcome> {
    synthesize_book_with_progress(chapters, output_folder, voice, metadata, |_, _| {})
}

/// Like [`synthesize_book`], reporting progress through a callback.
pub fn synthesize_book_with_progress(
    chapters: &[Chapter],
    output_folder: &Path,
    voice: &VoiceSpec,
    metadata: &BookMetadata,
    progress: impl FnMut(f32, &str),
) -> Result<BookOutcome> {
    let pipeline = SpeechPipeline::from_installed(voice, PipelineConfig::default())?;
    let book_dir = book::book_output_dir(output_folder, metadata);
    synth::book::generate_audiobook(
        chapters,
        &book_dir,
        &pipeline,
        metadata,
        progress,
        &CancellationToken::new(),
    )
}
