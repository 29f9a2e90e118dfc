//! Background execution of a whole-book synthesis run.
//!
//! The front-end bridge (GUI, HTTP, whatever) starts a run, then polls the
//! progress store; it never blocks on the worker. One runner hosts at most
//! one run at a time.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use log::{error, info};
use tokio::task::JoinHandle;

use crate::book::{book_output_dir, format_elapsed, BookMetadata, Chapter};
use crate::config::PipelineConfig;
use crate::engine::voice::VoiceSpec;
use crate::error::{Result, VoxbookError};
use crate::progress::{CancellationToken, ProgressSnapshot, ProgressStore};
use crate::synth::book::{generate_audiobook, BookOutcome};
use crate::synth::pipeline::SpeechPipeline;

/// Everything one synthesis run needs.
pub struct SynthesisRequest {
    pub chapters: Vec<Chapter>,
    /// Folder the per-book output directory is created in
    pub output_folder: PathBuf,
    pub voice: VoiceSpec,
    pub metadata: BookMetadata,
    pub config: PipelineConfig,
}

/// Owns the progress store and cancellation flag for book runs.
pub struct SynthesisRunner {
    progress: Arc<ProgressStore>,
    cancel: Mutex<CancellationToken>,
    running: Arc<AtomicBool>,
}

impl SynthesisRunner {
    pub fn new() -> Self {
        Self {
            progress: Arc::new(ProgressStore::new()),
            cancel: Mutex::new(CancellationToken::new()),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shared handle to the progress store, for pollers.
    pub fn progress(&self) -> Arc<ProgressStore> {
        self.progress.clone()
    }

    /// Latest progress snapshot.
    pub fn snapshot(&self) -> Arc<ProgressSnapshot> {
        self.progress.snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Request the active run to stop at the next sentence boundary.
    pub fn stop(&self) {
        info!("Stop requested");
        self.cancel.lock().unwrap().cancel();
    }

    /// Start a book run on a worker thread.
    ///
    /// Returns the join handle carrying the run's outcome; the same outcome
    /// is also reflected into the progress store as a terminal status, so
    /// pollers need never touch the handle. Refuses to start while another
    /// run is active.
    pub fn start(&self, request: SynthesisRequest) -> Result<JoinHandle<Result<BookOutcome>>> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(VoxbookError::Configuration(
                "Synthesis already in progress".to_string(),
            ));
        }

        // Fresh token per run so an old stop request cannot leak in.
        let cancel = CancellationToken::new();
        *self.cancel.lock().unwrap() = cancel.clone();

        let store = self.progress.clone();
        let running = self.running.clone();
        store.publish(0.0, "Starting...", true);

        Ok(tokio::task::spawn_blocking(move || {
            let started = Instant::now();
            let result = run_book(&request, &store, &cancel);

            match &result {
                Ok(BookOutcome::Container(path)) => {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string());
                    store.publish(
                        100.0,
                        format!(
                            "Complete! Saved to {} in {}",
                            name,
                            format_elapsed(started.elapsed().as_secs())
                        ),
                        false,
                    );
                }
                Ok(BookOutcome::Chapters(files)) => {
                    store.publish(
                        100.0,
                        format!(
                            "Complete! Generated {} chapters in {}",
                            files.len(),
                            format_elapsed(started.elapsed().as_secs())
                        ),
                        false,
                    );
                }
                Ok(BookOutcome::Stopped) => {
                    // Percent stays wherever the run was when the flag fired.
                    let pinned = store.snapshot().percent;
                    store.publish(pinned, "Stopped", false);
                }
                Err(e) => {
                    error!("Synthesis failed: {}", e);
                    let pinned = store.snapshot().percent;
                    store.publish(pinned, format!("Error: {}", e), false);
                }
            }

            running.store(false, Ordering::SeqCst);
            result
        }))
    }
}

impl Default for SynthesisRunner {
    fn default() -> Self {
        Self::new()
    }
}

fn run_book(
    request: &SynthesisRequest,
    store: &ProgressStore,
    cancel: &CancellationToken,
) -> Result<BookOutcome> {
    let pipeline = SpeechPipeline::from_installed(&request.voice, request.config.clone())?;
    let book_dir = book_output_dir(&request.output_folder, &request.metadata);

    generate_audiobook(
        &request.chapters,
        &book_dir,
        &pipeline,
        &request.metadata,
        |percent, status| store.publish(percent, status, true),
        cancel,
    )
}
