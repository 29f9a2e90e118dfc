//! Speech synthesis: segment, chapter, and book orchestration.

pub mod book;
pub mod pause;
pub mod pipeline;

pub use book::{generate_audiobook, global_progress, BookOutcome};
pub use pause::{Boundary, PauseBank};
pub use pipeline::{ChapterOutcome, SpeechPipeline};
