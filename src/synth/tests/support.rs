//! Shared test doubles for the synthesis tests.

use std::collections::hash_map::DefaultHasher;
use std::f32::consts::PI;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;

use anyhow::anyhow;

use crate::config::SAMPLE_RATE;
use crate::engine::{TtsEngine, VoicePrompt, VoiceState};

/// Deterministic stand-in for the speech engine.
///
/// Produces a sine wave whose length is proportional to the input text and
/// whose frequency is keyed by the text's hash, so different sentences yield
/// different (but reproducible) waveforms. Texts containing a configured
/// marker fail synthesis, which lets tests exercise the omission path.
pub struct FakeEngine {
    pub seconds_per_char: f32,
    pub fail_markers: Vec<String>,
    pub synth_calls: Mutex<Vec<String>>,
    pub voice_prompts: Mutex<Vec<VoicePrompt>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self {
            seconds_per_char: 0.06,
            fail_markers: Vec::new(),
            synth_calls: Mutex::new(Vec::new()),
            voice_prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_rate(seconds_per_char: f32) -> Self {
        Self {
            seconds_per_char,
            ..Self::new()
        }
    }

    pub fn failing_on(markers: &[&str]) -> Self {
        Self {
            fail_markers: markers.iter().map(|m| m.to_string()).collect(),
            ..Self::new()
        }
    }

    pub fn recorded_calls(&self) -> Vec<String> {
        self.synth_calls.lock().unwrap().clone()
    }

    pub fn recorded_prompts(&self) -> Vec<VoicePrompt> {
        self.voice_prompts.lock().unwrap().clone()
    }
}

impl TtsEngine for FakeEngine {
    fn voice_state(&self, prompt: &VoicePrompt) -> anyhow::Result<VoiceState> {
        self.voice_prompts.lock().unwrap().push(prompt.clone());
        Ok(VoiceState::new(prompt.clone()))
    }

    fn synthesize(&self, _state: &VoiceState, text: &str) -> anyhow::Result<Vec<f32>> {
        self.synth_calls.lock().unwrap().push(text.to_string());

        for marker in &self.fail_markers {
            if text.contains(marker.as_str()) {
                return Err(anyhow!("synthetic failure on {:?}", marker));
            }
        }

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let freq = 200.0 + (hasher.finish() % 600) as f32;

        let num_samples =
            (text.chars().count() as f32 * self.seconds_per_char * SAMPLE_RATE as f32) as usize;
        Ok((0..num_samples)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                (t * freq * 2.0 * PI).sin() * 0.3
            })
            .collect())
    }
}

/// Expected sample count the fake engine produces for `text`.
pub fn fake_samples_for(engine: &FakeEngine, text: &str) -> usize {
    (text.chars().count() as f32 * engine.seconds_per_char * SAMPLE_RATE as f32) as usize
}
