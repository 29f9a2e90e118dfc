//! Voice identity selection.
//!
//! A pipeline speaks with exactly one voice, picked once at construction:
//! a cloned reference recording, a named preset, or the default preset.

use std::path::PathBuf;

use log::{info, warn};

use crate::engine::{TtsEngine, VoicePrompt, VoiceState};
use crate::error::{Result, VoxbookError};
use crate::media::encode::ensure_compatible_audio;

/// Preset used when the caller expresses no explicit choice, and the
/// fallback when a named preset fails to load.
pub const DEFAULT_PRESET: &str = "marius";

/// Sentinel preset value front-ends send to mean "the user picked a custom
/// reference"; remapped to [`DEFAULT_PRESET`] if it reaches the pipeline
/// without one.
pub const CUSTOM_PRESET_SENTINEL: &str = "custom";

/// The caller's voice choice for a synthesis run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VoiceSpec {
    /// Clone the speaker of a reference recording
    ClonedReference(PathBuf),
    /// Use a preset shipped with the engine
    NamedPreset(String),
    /// No preference; the default preset is used
    #[default]
    Default,
}

/// Presets known to ship with the default engine.
pub fn available_presets() -> Vec<String> {
    ["marius", "cosette", "eponine", "javert"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Resolve a [`VoiceSpec`] into an engine voice state.
///
/// Cloning failures are fatal: the caller explicitly asked for that speaker,
/// so degrading to a preset would be silent data loss. A failing *named*
/// preset instead logs and falls back to [`DEFAULT_PRESET`], which is known
/// to load.
pub fn resolve_voice_state(engine: &dyn TtsEngine, spec: &VoiceSpec) -> Result<VoiceState> {
    match spec {
        VoiceSpec::ClonedReference(path) => {
            let compatible = ensure_compatible_audio(path)?;
            info!("Cloning voice from reference {}", compatible.display());
            engine
                .voice_state(&VoicePrompt::Reference(compatible))
                .map_err(|e| {
                    VoxbookError::VoiceResolution(format!(
                        "reference audio {} was rejected by the engine: {}",
                        path.display(),
                        e
                    ))
                })
        }
        VoiceSpec::NamedPreset(name) => {
            let name = if name == CUSTOM_PRESET_SENTINEL {
                DEFAULT_PRESET
            } else {
                name.as_str()
            };
            match engine.voice_state(&VoicePrompt::Preset(name.to_string())) {
                Ok(state) => Ok(state),
                Err(e) => {
                    warn!(
                        "Preset '{}' failed ({}); falling back to '{}'",
                        name, e, DEFAULT_PRESET
                    );
                    engine
                        .voice_state(&VoicePrompt::Preset(DEFAULT_PRESET.to_string()))
                        .map_err(|e| {
                            VoxbookError::VoiceResolution(format!(
                                "fallback preset '{}' failed: {}",
                                DEFAULT_PRESET, e
                            ))
                        })
                }
            }
        }
        VoiceSpec::Default => engine
            .voice_state(&VoicePrompt::Preset(DEFAULT_PRESET.to_string()))
            .map_err(|e| {
                VoxbookError::VoiceResolution(format!(
                    "default preset '{}' failed: {}",
                    DEFAULT_PRESET, e
                ))
            }),
    }
}
