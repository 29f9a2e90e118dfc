//! Chapter-level pipeline behavior against the fake engine.

use std::sync::Arc;

use crate::config::{PipelineConfig, SAMPLE_RATE};
use crate::engine::voice::{VoiceSpec, DEFAULT_PRESET};
use crate::engine::VoicePrompt;
use crate::progress::CancellationToken;
use crate::synth::pipeline::{ChapterOutcome, SpeechPipeline};
use crate::text::segment::{SentenceSegmenter, SentenceSpan};

use super::support::{fake_samples_for, FakeEngine};

fn pipeline_with(engine: Arc<FakeEngine>) -> SpeechPipeline {
    SpeechPipeline::new(engine, &VoiceSpec::Default, PipelineConfig::default()).unwrap()
}

const FIVE_SENTENCES: &str = "One two. Three four. Five six. Seven eight. Nine ten.";

#[test]
fn test_progress_reaches_exactly_100() {
    let engine = Arc::new(FakeEngine::new());
    let pipeline = pipeline_with(engine.clone());

    let mut reported = Vec::new();
    let outcome = pipeline.generate_chapter(
        FIVE_SENTENCES,
        |p| reported.push(p),
        &CancellationToken::new(),
    );

    assert!(matches!(outcome, ChapterOutcome::Rendered(_)));
    // Exactly one call per sentence, strictly increasing, ending on 100.
    assert_eq!(reported.len(), 5);
    for pair in reported.windows(2) {
        assert!(pair[1] > pair[0], "progress must strictly increase: {:?}", reported);
    }
    assert_eq!(*reported.last().unwrap(), 100.0);
}

#[test]
fn test_progress_reaches_100_even_when_everything_fails() {
    // A marker matching every sentence makes all synthesis fail.
    let engine = Arc::new(FakeEngine::failing_on(&[""]));
    let pipeline = pipeline_with(engine);

    let mut reported = Vec::new();
    let outcome = pipeline.generate_chapter(
        FIVE_SENTENCES,
        |p| reported.push(p),
        &CancellationToken::new(),
    );

    assert!(matches!(outcome, ChapterOutcome::Empty));
    assert_eq!(reported.len(), 5);
    assert_eq!(*reported.last().unwrap(), 100.0);
}

#[test]
fn test_pause_selection_by_boundary() {
    let engine = Arc::new(FakeEngine::new());
    let pipeline = pipeline_with(engine.clone());
    let config = PipelineConfig::default();

    let text = "First part. Second part.\n\nThird part.";
    let ChapterOutcome::Rendered(samples) = pipeline.generate_chapter(
        text,
        |_| {},
        &CancellationToken::new(),
    ) else {
        panic!("expected rendered audio");
    };

    let sentence_pause = (config.sentence_pause * SAMPLE_RATE as f32) as usize;
    let paragraph_pause = (config.paragraph_pause * SAMPLE_RATE as f32) as usize;
    let expected = fake_samples_for(&engine, "First part.")
        + sentence_pause
        + fake_samples_for(&engine, "Second part.")
        + paragraph_pause
        + fake_samples_for(&engine, "Third part.");
    assert_eq!(samples.len(), expected);
}

#[test]
fn test_failed_segment_is_omitted_not_fatal() {
    let engine = Arc::new(FakeEngine::failing_on(&["Second"]));
    let pipeline = pipeline_with(engine.clone());
    let config = PipelineConfig::default();

    let text = "First part. Second part. Third part.";
    let mut reported = Vec::new();
    let ChapterOutcome::Rendered(samples) = pipeline.generate_chapter(
        text,
        |p| reported.push(p),
        &CancellationToken::new(),
    ) else {
        panic!("one failing segment must not sink the chapter");
    };

    // The failed sentence contributes neither audio nor a trailing pause.
    let sentence_pause = (config.sentence_pause * SAMPLE_RATE as f32) as usize;
    let expected = fake_samples_for(&engine, "First part.")
        + sentence_pause
        + fake_samples_for(&engine, "Third part.");
    assert_eq!(samples.len(), expected);

    // Progress still covers every sentence.
    assert_eq!(reported.len(), 3);
    assert_eq!(*reported.last().unwrap(), 100.0);
}

#[test]
fn test_cancellation_mid_chapter() {
    let engine = Arc::new(FakeEngine::new());
    let pipeline = pipeline_with(engine);
    let cancel = CancellationToken::new();

    let mut reported = Vec::new();
    let cancel_after = cancel.clone();
    let outcome = pipeline.generate_chapter(
        FIVE_SENTENCES,
        |p| {
            reported.push(p);
            if reported.len() == 2 {
                cancel_after.cancel();
            }
        },
        &cancel,
    );

    assert!(matches!(outcome, ChapterOutcome::Cancelled));
    // The 2nd of 5 sentences reported 40%; nothing ran after the flag was set.
    assert_eq!(reported, vec![20.0, 40.0]);
}

/// Segmenter that never finds a sentence.
struct NullSegmenter;

impl SentenceSegmenter for NullSegmenter {
    fn segment(&self, _text: &str) -> Vec<SentenceSpan> {
        Vec::new()
    }
}

#[test]
fn test_whole_text_fallback_when_segmenter_finds_nothing() {
    let engine = Arc::new(FakeEngine::new());
    let pipeline = pipeline_with(engine.clone()).with_segmenter(Box::new(NullSegmenter));

    let text = "unsegmentable blob of text";
    let outcome = pipeline.generate_chapter(text, |_| {}, &CancellationToken::new());

    assert!(matches!(outcome, ChapterOutcome::Rendered(_)));
    assert_eq!(engine.recorded_calls(), vec![text.to_string()]);
}

#[test]
fn test_empty_text_yields_empty_outcome() {
    let engine = Arc::new(FakeEngine::new());
    let pipeline = pipeline_with(engine.clone());

    let outcome = pipeline.generate_chapter("   \n ", |_| {}, &CancellationToken::new());
    assert!(matches!(outcome, ChapterOutcome::Empty));
    assert!(engine.recorded_calls().is_empty());
}

#[test]
fn test_voice_resolved_once_to_default_preset() {
    let engine = Arc::new(FakeEngine::new());
    let pipeline = pipeline_with(engine.clone());

    pipeline.generate_chapter(FIVE_SENTENCES, |_| {}, &CancellationToken::new());
    pipeline.generate_chapter(FIVE_SENTENCES, |_| {}, &CancellationToken::new());

    // One resolution at construction, reused across chapters.
    assert_eq!(
        engine.recorded_prompts(),
        vec![VoicePrompt::Preset(DEFAULT_PRESET.to_string())]
    );
}

#[test]
fn test_preview_caps_input_length() {
    let engine = Arc::new(FakeEngine::new());
    let pipeline = pipeline_with(engine.clone());

    let long_text = "a".repeat(600);
    let samples = pipeline.preview(&long_text).expect("preview should render");

    let calls = engine.recorded_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].chars().count(), 500);
    assert_eq!(samples.len(), fake_samples_for(&engine, &calls[0]));
}
