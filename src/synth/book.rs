//! The whole-book synthesis loop.
//!
//! Drives the chapter pipeline over every chapter, persists and verifies the
//! per-chapter artifacts, and hands the finished set to the container
//! assembler. Already-rendered chapters are reused, so an interrupted run
//! picks up where it left off.

use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::audio::codec::encode_wav;
use crate::audio::verify::verify_audio_quality;
use crate::book::{sanitize_filename, BookMetadata, Chapter};
use crate::config::SAMPLE_RATE;
use crate::error::{Result, VoxbookError};
use crate::media::container::assemble;
use crate::media::encode::encode_mp3;
use crate::media::tools::ffmpeg_path;
use crate::progress::CancellationToken;
use crate::synth::pipeline::{ChapterOutcome, SpeechPipeline};

/// Terminal result of a book run that did not fail outright.
#[derive(Debug)]
pub enum BookOutcome {
    /// One chaptered container holding the whole book
    Container(PathBuf),
    /// Assembly was unavailable or failed; the per-chapter files stand in
    Chapters(Vec<PathBuf>),
    /// The run was cancelled before finishing
    Stopped,
}

/// Map a chapter's local progress into the run-wide percentage.
///
/// The last 10% of the range is reserved for container assembly, so the
/// run's percent climbs monotonically from 0 to 100 across chapters and
/// assembly alike.
pub fn global_progress(chapter_index: usize, total_chapters: usize, local_percent: f32) -> f32 {
    if total_chapters == 0 {
        return 0.0;
    }
    ((chapter_index as f32 + local_percent / 100.0) / total_chapters as f32) * 90.0
}

/// Synthesize every chapter and assemble the final artifact.
///
/// Fails only on conditions that must not ship silently: a chapter flunking
/// quality verification, an encode error, or a run that produced nothing at
/// all. Cancellation and assembly failure are ordinary outcomes, not errors.
pub fn generate_audiobook(
    chapters: &[Chapter],
    output_folder: &Path,
    pipeline: &SpeechPipeline,
    metadata: &BookMetadata,
    mut progress: impl FnMut(f32, &str),
    cancel: &CancellationToken,
) -> Result<BookOutcome> {
    std::fs::create_dir_all(output_folder)?;

    let has_ffmpeg = ffmpeg_path().is_some();
    if !has_ffmpeg {
        warn!("ffmpeg not found; chapters stay lossless and no container is assembled");
        progress(
            0.0,
            "Warning: ffmpeg not found. Container assembly will be skipped.",
        );
    }

    let total_chapters = chapters.len();
    let mut chapter_files: Vec<PathBuf> = Vec::new();

    for (i, chapter) in chapters.iter().enumerate() {
        if cancel.is_cancelled() {
            info!("Synthesis stopped before chapter {}", chapter.name);
            return Ok(BookOutcome::Stopped);
        }

        // The first chapter opens with a spoken title card.
        let text = if i == 0 {
            format!("{}, by {}.\n\n{}", metadata.title, metadata.author, chapter.text)
        } else {
            chapter.text.clone()
        };

        if text.trim().is_empty() {
            debug!("Skipping empty chapter {}", chapter.name);
            continue;
        }

        let safe_name = sanitize_filename(&chapter.name, &format!("chapter_{}", i + 1));
        let extension = if has_ffmpeg { "mp3" } else { "wav" };
        let chapter_path = output_folder.join(format!("{}.{}", safe_name, extension));

        // Resume cache: an existing artifact is trusted as-is. Delete the
        // file to force a chapter to be re-rendered.
        if chapter_path.exists() {
            info!("Reusing existing {}", chapter_path.display());
            chapter_files.push(chapter_path);
            continue;
        }

        let outcome = pipeline.generate_chapter(
            &text,
            |p| {
                progress(
                    global_progress(i, total_chapters, p),
                    &format!("Generating {} ({}%)...", chapter.name, p as i32),
                );
            },
            cancel,
        );

        match outcome {
            ChapterOutcome::Cancelled => {
                info!("Synthesis stopped during chapter {}", chapter.name);
                return Ok(BookOutcome::Stopped);
            }
            ChapterOutcome::Empty => {
                warn!("Chapter {} produced no audio; omitting it", chapter.name);
                continue;
            }
            ChapterOutcome::Rendered(samples) => {
                let temp_wav = chapter_path.with_extension("tmp.wav");
                encode_wav(&samples, SAMPLE_RATE, &temp_wav)?;

                if has_ffmpeg {
                    encode_mp3(&temp_wav, &chapter_path, pipeline.config().mp3_quality)?;
                    std::fs::remove_file(&temp_wav)?;
                } else {
                    std::fs::rename(&temp_wav, &chapter_path)?;
                }

                let (ok, issues) =
                    verify_audio_quality(&chapter_path, text.chars().count(), pipeline.config());
                if !ok {
                    error!("Quality issues in {}: {:?}", chapter.name, issues);
                    let _ = std::fs::remove_file(&chapter_path);
                    return Err(VoxbookError::QualityVerification(issues.join("; ")));
                }

                chapter_files.push(chapter_path);
            }
        }
    }

    if !chapter_files.is_empty() && has_ffmpeg {
        progress(95.0, "Creating audiobook container...");
        if let Some(container) = assemble(
            &chapter_files,
            metadata,
            output_folder,
            &pipeline.config().container_bitrate,
        ) {
            progress(100.0, "Complete!");
            return Ok(BookOutcome::Container(container));
        }
        // Fall through: the per-chapter files are the deliverable.
    }

    if chapter_files.is_empty() {
        return Err(VoxbookError::NoAudioProduced);
    }

    progress(100.0, "Complete (chapter files only)!");
    Ok(BookOutcome::Chapters(chapter_files))
}
