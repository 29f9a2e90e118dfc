//! Audio buffers, encoding/decoding, and sanity checks.

pub mod codec;
pub mod verify;

pub use codec::{compute_rms, decode_audio_file, duration_in_seconds, encode_wav};
pub use verify::verify_audio_quality;
