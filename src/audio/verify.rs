//! Post-encode sanity checks for rendered chapters.
//!
//! A multi-hour unattended run must not ship a truncated or silent chapter,
//! so every encoded chapter file is checked against the length of the text
//! it was rendered from. The checks are independent; all findings are
//! collected before returning so a log line shows the full picture.

use std::path::Path;

use crate::audio::codec::{compute_rms, decode_audio_file, duration_in_seconds};
use crate::config::PipelineConfig;

/// Files smaller than this many bytes are suspicious regardless of content.
const MIN_FILE_SIZE: u64 = 1000;

/// Verify an encoded chapter against the source text it was rendered from.
///
/// Returns `(ok, issues)`. `ok` is true iff no issue was found. The checks:
/// file existence (short-circuits), file size, decoded duration within the
/// plausible speaking-rate bounds for `text_length` characters, and RMS
/// loudness above the silence floor. A decode failure is itself an issue,
/// not an error; the caller decides whether any of this is fatal.
pub fn verify_audio_quality(
    audio_file_path: &Path,
    text_length: usize,
    config: &PipelineConfig,
) -> (bool, Vec<String>) {
    let mut issues = Vec::new();

    let metadata = match std::fs::metadata(audio_file_path) {
        Ok(m) => m,
        Err(_) => {
            return (false, vec!["File does not exist".to_string()]);
        }
    };

    let file_size = metadata.len();
    if file_size < MIN_FILE_SIZE {
        issues.push(format!("File size too small: {} bytes", file_size));
    }

    match decode_audio_file(audio_file_path) {
        Ok((samples, sample_rate)) => {
            let duration = duration_in_seconds(samples.len(), sample_rate);
            let expected_min = text_length as f32 * config.min_duration_per_char;
            let expected_max = text_length as f32 * config.max_duration_per_char;

            if duration < expected_min {
                issues.push(format!(
                    "Audio too short: {:.1}s (expected >{:.1}s for {} chars)",
                    duration, expected_min, text_length
                ));
            } else if duration > expected_max {
                issues.push(format!(
                    "Audio too long: {:.1}s (expected <{:.1}s for {} chars)",
                    duration, expected_max, text_length
                ));
            }

            let rms = compute_rms(&samples);
            if rms < config.min_rms_threshold {
                issues.push(format!("Audio appears silent: RMS={:.6}", rms));
            }
        }
        Err(e) => {
            issues.push(format!("Failed to read audio: {}", e));
        }
    }

    (issues.is_empty(), issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::codec::encode_wav;
    use crate::config::SAMPLE_RATE;
    use std::f32::consts::PI;
    use tempfile::tempdir;

    fn write_sine(path: &Path, duration_sec: f32, amplitude: f32) {
        let num_samples = (duration_sec * SAMPLE_RATE as f32) as usize;
        let samples: Vec<f32> = (0..num_samples)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                (t * 440.0 * 2.0 * PI).sin() * amplitude
            })
            .collect();
        encode_wav(&samples, SAMPLE_RATE, path).unwrap();
    }

    #[test]
    fn test_missing_file_short_circuits() {
        let config = PipelineConfig::default();
        let (ok, issues) = verify_audio_quality(Path::new("/no/such/file.wav"), 100, &config);
        assert!(!ok);
        assert_eq!(issues, vec!["File does not exist".to_string()]);
    }

    #[test]
    fn test_plausible_chapter_passes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chapter.wav");
        // 10 chars of text allow 0.3s..1.5s of audio.
        write_sine(&path, 0.5, 0.4);

        let config = PipelineConfig::default();
        let (ok, issues) = verify_audio_quality(&path, 10, &config);
        assert!(ok, "unexpected issues: {:?}", issues);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_too_short_audio_is_flagged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.wav");
        write_sine(&path, 0.5, 0.4);

        // 0.5s of audio for 1000 chars is far below 0.03 s/char.
        let config = PipelineConfig::default();
        let (ok, issues) = verify_audio_quality(&path, 1000, &config);
        assert!(!ok);
        assert!(issues.iter().any(|i| i.contains("too short")));
    }

    #[test]
    fn test_too_long_audio_is_flagged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("long.wav");
        write_sine(&path, 3.0, 0.4);

        // 3s of audio for 10 chars exceeds 0.15 s/char.
        let config = PipelineConfig::default();
        let (ok, issues) = verify_audio_quality(&path, 10, &config);
        assert!(!ok);
        assert!(issues.iter().any(|i| i.contains("too long")));
    }

    #[test]
    fn test_silent_audio_is_flagged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("silent.wav");
        write_sine(&path, 0.5, 0.00001);

        let config = PipelineConfig::default();
        let (ok, issues) = verify_audio_quality(&path, 10, &config);
        assert!(!ok);
        assert!(issues.iter().any(|i| i.contains("appears silent")));
    }

    #[test]
    fn test_issues_accumulate() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tiny.wav");
        // 50 samples: under 1000 bytes, far too short, and silent.
        encode_wav(&vec![0.0f32; 50], SAMPLE_RATE, &path).unwrap();

        let config = PipelineConfig::default();
        let (ok, issues) = verify_audio_quality(&path, 1000, &config);
        assert!(!ok);
        assert!(issues.len() >= 3, "expected all checks to fire: {:?}", issues);
    }
}
