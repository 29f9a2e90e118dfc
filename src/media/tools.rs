//! Discovery of the external tools the pipeline shells out to.
//!
//! ffmpeg and ffprobe are collaborators, not dependencies: their absence
//! degrades functionality (no reference resampling, no container assembly)
//! but never crashes the process.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use semver::Version;

/// An external tool located on this machine.
#[derive(Debug, Clone)]
pub struct ExternalTool {
    pub name: String,
    pub path: PathBuf,
    pub version: Option<Version>,
    pub min_version: Version,
}

// Global registry filled by init_tools.
static TOOLS: Lazy<Mutex<Vec<ExternalTool>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Locate ffmpeg and ffprobe in PATH and record them in the registry.
///
/// Call once at startup. Not finding a tool is not an error; callers that
/// need one check [`ffmpeg_path`]/[`ffprobe_path`] and degrade.
pub fn init_tools() -> Result<()> {
    info!("Checking external tools...");

    let mut tools = TOOLS.lock().unwrap();
    tools.clear();

    match which::which("ffmpeg") {
        Ok(path) => {
            let version = check_ffmpeg_version(&path).ok();
            if let Some(v) = &version {
                info!("Found ffmpeg {} at {}", v, path.display());
            } else {
                info!("Found ffmpeg at {} (version unknown)", path.display());
            }
            tools.push(ExternalTool {
                name: "ffmpeg".to_string(),
                path,
                version,
                min_version: Version::new(4, 0, 0),
            });
        }
        Err(_) => {
            warn!("ffmpeg not found in PATH; container assembly will be skipped");
        }
    }

    match which::which("ffprobe") {
        Ok(path) => {
            debug!("Found ffprobe at {}", path.display());
            tools.push(ExternalTool {
                name: "ffprobe".to_string(),
                path,
                version: None,
                min_version: Version::new(4, 0, 0),
            });
        }
        Err(_) => {
            warn!("ffprobe not found in PATH; chapter durations will default to zero");
        }
    }

    Ok(())
}

/// Parse `ffmpeg -version` output into a semver version.
fn check_ffmpeg_version(path: &Path) -> Result<Version> {
    let output = Command::new(path)
        .args(["-version"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .context("Failed to execute ffmpeg")?;

    if !output.status.success() {
        return Err(anyhow!("Failed to get ffmpeg version"));
    }

    let version_str = String::from_utf8_lossy(&output.stdout);
    let re = Regex::new(r"ffmpeg version (\d+\.\d+(?:\.\d+)?)")?;
    if let Some(caps) = re.captures(&version_str) {
        let version = caps.get(1).map_or("", |m| m.as_str());
        let parts: Vec<&str> = version.split('.').collect();
        let normalized = match parts.len() {
            1 => format!("{}.0.0", parts[0]),
            2 => format!("{}.{}.0", parts[0], parts[1]),
            _ => version.to_string(),
        };
        Ok(Version::parse(&normalized)?)
    } else {
        debug!("Could not parse ffmpeg version, assuming minimum");
        Ok(Version::new(4, 0, 0))
    }
}

/// Registry lookup with a PATH fallback so the library also works when
/// [`init_tools`] was never called.
fn tool_path(name: &str) -> Option<PathBuf> {
    let registered = TOOLS
        .lock()
        .unwrap()
        .iter()
        .find(|tool| tool.name == name)
        .map(|tool| tool.path.clone());
    registered.or_else(|| which::which(name).ok())
}

/// Path to ffmpeg, if available.
pub fn ffmpeg_path() -> Option<PathBuf> {
    tool_path("ffmpeg")
}

/// Path to ffprobe, if available.
pub fn ffprobe_path() -> Option<PathBuf> {
    tool_path("ffprobe")
}
