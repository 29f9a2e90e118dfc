//! The speech-engine seam.
//!
//! The pipeline depends on a two-call capability: derive a voice state from
//! a prompt (reference audio or named preset), then synthesize text against
//! that state. Everything behind those calls (model weights, tensors,
//! devices) is the engine's business.

pub mod voice;

use std::any::Any;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

pub use voice::{available_presets, VoiceSpec, DEFAULT_PRESET};

/// What the engine derives a voice state from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoicePrompt {
    /// Reference audio on disk, already resampled for the engine
    Reference(PathBuf),
    /// Named preset shipped with the engine
    Preset(String),
}

/// Opaque, engine-specific speaker state.
///
/// Resolved once per pipeline and reused for every segment. Engines stash
/// whatever they need in here and get it back with [`VoiceState::downcast_ref`].
#[derive(Clone)]
pub struct VoiceState {
    inner: Arc<dyn Any + Send + Sync>,
}

impl VoiceState {
    pub fn new<T: Any + Send + Sync>(state: T) -> Self {
        Self {
            inner: Arc::new(state),
        }
    }

    pub fn downcast_ref<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl std::fmt::Debug for VoiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("VoiceState(..)")
    }
}

/// The opaque text-to-speech capability.
///
/// Implementations are stateful, single-instance resources: the pipeline
/// never calls them from more than one thread at a time.
pub trait TtsEngine: Send + Sync {
    /// Derive a reusable voice state from a prompt.
    fn voice_state(&self, prompt: &VoicePrompt) -> anyhow::Result<VoiceState>;

    /// Synthesize one cleaned sentence into a mono waveform at the pipeline
    /// sample rate, samples in [-1, 1].
    fn synthesize(&self, state: &VoiceState, text: &str) -> anyhow::Result<Vec<f32>>;
}

// Process-wide engine slot. Loading a model is expensive, so one handle is
// shared by every pipeline in the process; tests install a fake instead.
static ENGINE: Lazy<RwLock<Option<Arc<dyn TtsEngine>>>> = Lazy::new(|| RwLock::new(None));

/// Install the process-wide engine, replacing any previous one.
pub fn install(engine: Arc<dyn TtsEngine>) {
    *ENGINE.write().unwrap() = Some(engine);
}

/// Handle to the installed engine, if any.
pub fn installed() -> Option<Arc<dyn TtsEngine>> {
    ENGINE.read().unwrap().clone()
}

/// Drop the process-wide engine, releasing the model.
pub fn uninstall() {
    *ENGINE.write().unwrap() = None;
}
