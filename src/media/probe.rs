//! Duration probing via ffprobe.

use std::path::Path;
use std::process::Command;

use log::warn;

use crate::media::tools::ffprobe_path;

/// Audio file duration in seconds.
///
/// Any failure (missing ffprobe, non-zero exit, unparseable output) yields
/// `0.0` with a warning. Chapter-marker generation tolerates a zero-length
/// chapter; aborting a whole assembly over one bad probe would not be worth it.
pub fn probe_duration(file_name: &Path) -> f64 {
    let Some(ffprobe) = ffprobe_path() else {
        warn!("ffprobe unavailable, reporting zero duration for {}", file_name.display());
        return 0.0;
    };

    let output = Command::new(ffprobe)
        .arg("-i")
        .arg(file_name)
        .args([
            "-show_entries",
            "format=duration",
            "-v",
            "quiet",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .output();

    match output {
        Ok(output) if output.status.success() => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            match stdout.trim().parse::<f64>() {
                Ok(duration) => duration,
                Err(e) => {
                    warn!("Error parsing duration for {}: {}", file_name.display(), e);
                    0.0
                }
            }
        }
        Ok(output) => {
            warn!(
                "ffprobe failed for {}: {}",
                file_name.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
            0.0
        }
        Err(e) => {
            warn!("Error probing duration for {}: {}", file_name.display(), e);
            0.0
        }
    }
}
