//! Final container assembly.
//!
//! Three stages, each its own failure domain: chapter-marker metadata
//! generation, lossless concatenation of the per-chapter files, and the
//! final mux into a chaptered M4B with embedded metadata and cover art.
//! Any stage failing aborts assembly; the caller falls back to shipping the
//! per-chapter files.

use std::path::{Path, PathBuf};
use std::process::Command;

use log::{error, info};

use crate::book::BookMetadata;
use crate::error::{Result, VoxbookError};
use crate::media::probe::probe_duration;
use crate::media::tools::ffmpeg_path;

/// Chapter-marker metadata in ffmpeg's FFMETADATA1 format.
///
/// Offsets are cumulative and contiguous: each chapter starts where the
/// previous one ended, on a 1/1000 time base. This text is an external
/// interface consumed by the mux step; its layout is significant down to the
/// blank lines.
pub fn build_chapter_index(title: &str, author: &str, durations_ms: &[u64]) -> String {
    let mut index = format!(";FFMETADATA1\ntitle={}\nartist={}\n\n", title, author);
    let mut start: u64 = 0;
    for (i, duration_ms) in durations_ms.iter().enumerate() {
        let end = start + duration_ms;
        index.push_str(&format!(
            "[CHAPTER]\nTIMEBASE=1/1000\nSTART={}\nEND={}\ntitle=Chapter {}\n\n",
            start,
            end,
            i + 1
        ));
        start = end;
    }
    index
}

/// Probe every chapter file and write the chapter index next to them.
pub fn write_chapter_index(
    title: &str,
    author: &str,
    chapter_files: &[PathBuf],
    output_folder: &Path,
) -> Result<PathBuf> {
    let durations_ms: Vec<u64> = chapter_files
        .iter()
        .map(|file| (probe_duration(file) * 1000.0) as u64)
        .collect();

    let index_path = output_folder.join("chapters.txt");
    std::fs::write(&index_path, build_chapter_index(title, author, &durations_ms))?;
    Ok(index_path)
}

/// Concat-demuxer manifest: one quoted absolute path per line.
pub fn build_concat_manifest(chapter_files: &[PathBuf]) -> String {
    let mut manifest = String::new();
    for file in chapter_files {
        // Absolute paths avoid resolution relative to the manifest location.
        let abs = std::fs::canonicalize(file).unwrap_or_else(|_| file.clone());
        manifest.push_str(&format!("file '{}'\n", abs.display()));
    }
    manifest
}

/// Losslessly join the chapter files into one intermediate stream.
///
/// Copy mode: no re-encode happens here, the single lossy re-encode is the
/// final mux. The manifest is deleted once ffmpeg has consumed it.
pub fn concat_chapters(
    chapter_files: &[PathBuf],
    output_folder: &Path,
    base_name: &str,
) -> Result<PathBuf> {
    let ffmpeg = ffmpeg_path()
        .ok_or_else(|| VoxbookError::ToolFailure("ffmpeg not found".to_string()))?;

    let manifest_path = output_folder.join(format!("{}_file_list.txt", base_name));
    std::fs::write(&manifest_path, build_concat_manifest(chapter_files))?;

    let concat_path = output_folder.join(format!("{}.tmp.mp4", base_name));
    let output = Command::new(ffmpeg)
        .arg("-y")
        .args(["-f", "concat", "-safe", "0"])
        .arg("-i")
        .arg(&manifest_path)
        .args(["-c", "copy"])
        .arg(&concat_path)
        .output()?;

    if !output.status.success() {
        return Err(VoxbookError::ToolFailure(format!(
            "chapter concatenation failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    std::fs::remove_file(&manifest_path)?;
    Ok(concat_path)
}

/// Assemble the final chaptered container from encoded chapter files.
///
/// Returns the container path, or `None` if any stage failed; the caller
/// then ships the per-chapter files instead. Chapter files are always
/// retained; they double as the resume cache for re-running an interrupted
/// book.
pub fn assemble(
    chapter_files: &[PathBuf],
    metadata: &BookMetadata,
    output_folder: &Path,
    bitrate: &str,
) -> Option<PathBuf> {
    info!("Creating audiobook container...");
    match try_assemble(chapter_files, metadata, output_folder, bitrate) {
        Ok(path) => {
            info!("{} created", path.display());
            Some(path)
        }
        Err(e) => {
            error!("Failed to create audiobook container: {}", e);
            None
        }
    }
}

fn try_assemble(
    chapter_files: &[PathBuf],
    metadata: &BookMetadata,
    output_folder: &Path,
    bitrate: &str,
) -> Result<PathBuf> {
    let ffmpeg = ffmpeg_path()
        .ok_or_else(|| VoxbookError::ToolFailure("ffmpeg not found".to_string()))?;

    let base_name = metadata.base_name();

    let index_path =
        write_chapter_index(&metadata.title, &metadata.author, chapter_files, output_folder)?;
    let concat_path = concat_chapters(chapter_files, output_folder, &base_name)?;

    let final_path = output_folder.join(format!("{}.m4b", base_name));

    let cover_path = match &metadata.cover {
        Some(bytes) => {
            let path = output_folder.join("cover.jpg");
            std::fs::write(&path, bytes)?;
            Some(path)
        }
        // No cover behaves exactly like no cover support: the stream is
        // simply not mapped.
        None => None,
    };

    let mut cmd = Command::new(ffmpeg);
    cmd.arg("-y")
        .arg("-i")
        .arg(&concat_path)
        .arg("-i")
        .arg(&index_path);

    if let Some(cover) = &cover_path {
        cmd.arg("-i")
            .arg(cover)
            .args(["-map", "2:v"])
            .args(["-disposition:v", "attached_pic"])
            .args(["-c:v", "copy"]);
    }

    cmd.args(["-map", "0:a"])
        .args(["-c:a", "aac"])
        .args(["-b:a", bitrate])
        .args(["-map_metadata", "1"])
        .args(["-f", "mp4"])
        .arg(&final_path);

    let output = cmd.output()?;
    if !output.status.success() {
        return Err(VoxbookError::ToolFailure(format!(
            "container mux failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    // Intermediates are only useful for debugging a failed mux; on success
    // they go away. Chapter files stay.
    let _ = std::fs::remove_file(&concat_path);
    let _ = std::fs::remove_file(&index_path);
    if let Some(cover) = &cover_path {
        let _ = std::fs::remove_file(cover);
    }

    Ok(final_path)
}
