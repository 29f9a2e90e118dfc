//! External media tooling: discovery, probing, encoding, and container
//! assembly, all via ffmpeg/ffprobe subprocesses.

pub mod container;
pub mod encode;
pub mod probe;
pub mod tools;

pub use container::assemble;
pub use probe::probe_duration;
pub use tools::{ffmpeg_path, ffprobe_path, init_tools};
