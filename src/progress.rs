//! Progress reporting and cooperative cancellation.
//!
//! One synthesis run has exactly one writer (the worker thread) and any
//! number of readers polling the current state. The writer publishes whole
//! snapshots; readers clone an `Arc` and never observe a half-written
//! update. A monotonic revision counter lets a poller detect that it missed
//! intermediate states without comparing snapshot contents.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

/// Immutable view of a run's progress at one point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Percent complete across the whole run (0.0 - 100.0)
    pub percent: f32,
    /// Human-readable status line
    pub status: String,
    /// Whether the run is still executing
    pub running: bool,
}

impl ProgressSnapshot {
    pub fn idle() -> Self {
        Self {
            percent: 0.0,
            status: "Idle".to_string(),
            running: false,
        }
    }
}

/// Single-writer, multi-reader store of the latest [`ProgressSnapshot`].
pub struct ProgressStore {
    current: RwLock<Arc<ProgressSnapshot>>,
    revision: AtomicU64,
}

impl ProgressStore {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(ProgressSnapshot::idle())),
            revision: AtomicU64::new(0),
        }
    }

    /// Replace the published snapshot. Only the worker thread calls this.
    pub fn publish(&self, percent: f32, status: impl Into<String>, running: bool) {
        let snapshot = Arc::new(ProgressSnapshot {
            percent: percent.clamp(0.0, 100.0),
            status: status.into(),
            running,
        });
        *self.current.write().unwrap() = snapshot;
        self.revision.fetch_add(1, Ordering::SeqCst);
    }

    /// Latest snapshot. Never blocks on the writer for longer than the swap.
    pub fn snapshot(&self) -> Arc<ProgressSnapshot> {
        self.current.read().unwrap().clone()
    }

    /// Revision of the latest snapshot; strictly increases with each publish.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    /// Latest snapshot serialized for polling bridges (HTTP/IPC layers).
    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(self.snapshot().as_ref())
            .unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for ProgressStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Cooperative cancellation flag, checked at sentence granularity inside the
/// synthesis loop. Observing the flag produces a tagged "cancelled" outcome,
/// never an unwind.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Safe to call from any thread, any number of times.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
