//! Text preparation: cleanup for synthesis and sentence segmentation.

pub mod normalize;
pub mod segment;

pub use normalize::clean_for_speech;
pub use segment::{is_paragraph_break, RuleSegmenter, SentenceSegmenter, SentenceSpan};
