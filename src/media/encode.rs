//! Audio conversion via ffmpeg: reference-audio preparation and per-chapter
//! lossy encoding.

use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info};

use crate::config::SAMPLE_RATE;
use crate::error::{Result, VoxbookError};
use crate::media::tools::ffmpeg_path;

/// Suffix marking a file already resampled for the engine.
const COMPATIBLE_SUFFIX: &str = "_24k";

/// Make a reference recording compatible with the voice engine
/// (24 kHz mono WAV), converting with ffmpeg when needed.
///
/// The converted file is written next to the original with a `_24k.wav`
/// suffix and reused on subsequent runs. Every failure here is an error:
/// the caller asked to clone this specific voice, so there is nothing safe
/// to degrade to.
pub fn ensure_compatible_audio(file_path: &Path) -> Result<PathBuf> {
    if !file_path.exists() {
        return Err(VoxbookError::VoiceResolution(format!(
            "reference audio not found: {}",
            file_path.display()
        )));
    }

    let stem = file_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("reference");

    // Already produced by us on an earlier run.
    if stem.ends_with(COMPATIBLE_SUFFIX)
        && file_path.extension().and_then(|e| e.to_str()) == Some("wav")
    {
        return Ok(file_path.to_path_buf());
    }

    let parent = file_path.parent().unwrap_or_else(|| Path::new("."));
    let compatible = parent.join(format!("{}{}.wav", stem, COMPATIBLE_SUFFIX));
    if compatible.exists() {
        debug!("Reusing converted reference {}", compatible.display());
        return Ok(compatible);
    }

    let ffmpeg = ffmpeg_path().ok_or_else(|| {
        VoxbookError::VoiceResolution(
            "ffmpeg is required to prepare reference audio for cloning".to_string(),
        )
    })?;

    info!("Converting {} to {} Hz mono WAV...", file_path.display(), SAMPLE_RATE);
    let output = Command::new(ffmpeg)
        .arg("-y")
        .arg("-i")
        .arg(file_path)
        .args(["-ar", &SAMPLE_RATE.to_string(), "-ac", "1"])
        .arg(&compatible)
        .output()?;

    if !output.status.success() {
        return Err(VoxbookError::VoiceResolution(format!(
            "reference audio conversion failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(compatible)
}

/// Encode a lossless intermediate into the per-chapter MP3 artifact.
pub fn encode_mp3(wav_path: &Path, mp3_path: &Path, quality: u8) -> Result<()> {
    let ffmpeg = ffmpeg_path()
        .ok_or_else(|| VoxbookError::ToolFailure("ffmpeg not found".to_string()))?;

    let output = Command::new(ffmpeg)
        .arg("-y")
        .arg("-i")
        .arg(wav_path)
        .args(["-codec:a", "libmp3lame", "-qscale:a", &quality.to_string()])
        .arg(mp3_path)
        .output()?;

    if !output.status.success() {
        return Err(VoxbookError::ToolFailure(format!(
            "MP3 encode of {} failed: {}",
            wav_path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(())
}
