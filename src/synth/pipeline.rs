//! The per-chapter synthesis pipeline.
//!
//! A pipeline binds an engine, a resolved voice, a segmenter and the cached
//! pause buffers for the length of one synthesis run. Chapters are rendered
//! strictly sequentially: the engine and its voice state are stateful,
//! single-instance resources.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::engine::voice::{resolve_voice_state, VoiceSpec};
use crate::engine::{self, TtsEngine, VoiceState};
use crate::error::{Result, VoxbookError};
use crate::progress::CancellationToken;
use crate::synth::pause::{Boundary, PauseBank};
use crate::text::normalize::clean_for_speech;
use crate::text::segment::{is_paragraph_break, RuleSegmenter, SentenceSegmenter};

/// Result of rendering one chapter.
#[derive(Debug)]
pub enum ChapterOutcome {
    /// The concatenated waveform of every segment and pause, in order
    Rendered(Vec<f32>),
    /// No segment produced audio
    Empty,
    /// The cancellation token was observed mid-chapter
    Cancelled,
}

/// Sentence-by-sentence synthesis over chapter text.
pub struct SpeechPipeline {
    engine: Arc<dyn TtsEngine>,
    segmenter: Box<dyn SentenceSegmenter>,
    voice: VoiceState,
    pauses: PauseBank,
    config: PipelineConfig,
}

impl SpeechPipeline {
    /// Build a pipeline against an explicit engine, resolving the voice once.
    ///
    /// Voice resolution failures surface here, before any chapter work
    /// starts (see [`resolve_voice_state`] for which ones are fatal).
    pub fn new(
        engine: Arc<dyn TtsEngine>,
        voice_spec: &VoiceSpec,
        config: PipelineConfig,
    ) -> Result<Self> {
        let voice = resolve_voice_state(engine.as_ref(), voice_spec)?;
        Ok(Self {
            engine,
            segmenter: Box::new(RuleSegmenter::new()),
            voice,
            pauses: PauseBank::new(&config),
            config,
        })
    }

    /// Build a pipeline against the process-wide installed engine.
    pub fn from_installed(voice_spec: &VoiceSpec, config: PipelineConfig) -> Result<Self> {
        let engine = engine::installed().ok_or_else(|| {
            VoxbookError::Configuration("no TTS engine is installed".to_string())
        })?;
        Self::new(engine, voice_spec, config)
    }

    /// Replace the built-in rule segmenter.
    pub fn with_segmenter(mut self, segmenter: Box<dyn SentenceSegmenter>) -> Self {
        self.segmenter = segmenter;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Synthesize one cleaned segment.
    ///
    /// Engine failures are logged and reported as `None`: a missing segment,
    /// never a fatal pipeline error.
    fn synthesize_segment(&self, text: &str) -> Option<Vec<f32>> {
        let cleaned = clean_for_speech(text);
        match self.engine.synthesize(&self.voice, &cleaned) {
            Ok(samples) => Some(samples),
            Err(e) => {
                warn!("Error generating audio for segment {:?}: {}", text, e);
                None
            }
        }
    }

    /// Render a whole chapter into one waveform.
    ///
    /// `progress` is invoked after every sentence (synthesized, skipped or
    /// failed) with `(i+1)/total * 100`, so it deterministically reaches
    /// 100 regardless of how many segments produced audio. The cancellation
    /// token is polled at each sentence boundary.
    pub fn generate_chapter(
        &self,
        text: &str,
        mut progress: impl FnMut(f32),
        cancel: &CancellationToken,
    ) -> ChapterOutcome {
        if text.trim().is_empty() {
            return ChapterOutcome::Empty;
        }

        let spans = self.segmenter.segment(text);
        if spans.is_empty() {
            // The segmenter found nothing in non-empty text; synthesize the
            // whole chapter as a single segment.
            debug!("Segmenter produced no spans, falling back to whole-text synthesis");
            return match self.synthesize_segment(text) {
                Some(samples) if !samples.is_empty() => ChapterOutcome::Rendered(samples),
                _ => ChapterOutcome::Empty,
            };
        }

        let total = spans.len();
        let mut accumulator: Vec<f32> = Vec::new();

        for (i, span) in spans.iter().enumerate() {
            if cancel.is_cancelled() {
                info!("Cancellation observed after {}/{} sentences", i, total);
                return ChapterOutcome::Cancelled;
            }

            let sentence = span.text.trim();
            if !sentence.is_empty() {
                if let Some(samples) = self.synthesize_segment(sentence) {
                    accumulator.extend_from_slice(&samples);

                    if i < total - 1 {
                        let next_start = spans[i + 1].start;
                        let boundary = if is_paragraph_break(text, span.end, Some(next_start)) {
                            Boundary::Paragraph
                        } else {
                            Boundary::Sentence
                        };
                        accumulator.extend_from_slice(self.pauses.for_boundary(boundary));
                    }
                }
            }

            progress((i as f32 + 1.0) / total as f32 * 100.0);
        }

        if accumulator.is_empty() {
            ChapterOutcome::Empty
        } else {
            ChapterOutcome::Rendered(accumulator)
        }
    }

    /// Short synthesis for auditioning a voice choice before a full run.
    ///
    /// Takes at most the configured preview length from the front of `text`
    /// and renders it through the normal chapter path.
    pub fn preview(&self, text: &str) -> Option<Vec<f32>> {
        let snippet: String = text.chars().take(self.config.preview_char_limit).collect();
        match self.generate_chapter(&snippet, |_| {}, &CancellationToken::new()) {
            ChapterOutcome::Rendered(samples) => Some(samples),
            _ => None,
        }
    }
}
