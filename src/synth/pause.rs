//! Silence insertion between synthesized segments.

use crate::config::{PipelineConfig, SAMPLE_RATE};

/// What follows a sentence, as far as pacing is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Next sentence continues the same paragraph
    Sentence,
    /// Next sentence opens a new paragraph
    Paragraph,
    /// Nothing follows (last sentence of the chapter)
    End,
}

/// Pre-rendered silence buffers, built once per pipeline and handed out by
/// reference for every insertion.
pub struct PauseBank {
    sentence: Vec<f32>,
    paragraph: Vec<f32>,
}

impl PauseBank {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            sentence: vec![0.0; (config.sentence_pause * SAMPLE_RATE as f32) as usize],
            paragraph: vec![0.0; (config.paragraph_pause * SAMPLE_RATE as f32) as usize],
        }
    }

    /// Silence matching a boundary; empty for [`Boundary::End`].
    pub fn for_boundary(&self, boundary: Boundary) -> &[f32] {
        match boundary {
            Boundary::Sentence => &self.sentence,
            Boundary::Paragraph => &self.paragraph,
            Boundary::End => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pause_lengths() {
        let bank = PauseBank::new(&PipelineConfig::default());
        // 0.5s and 0.9s at 24 kHz.
        assert_eq!(bank.for_boundary(Boundary::Sentence).len(), 12_000);
        assert_eq!(bank.for_boundary(Boundary::Paragraph).len(), 21_600);
        assert!(bank.for_boundary(Boundary::End).is_empty());
    }

    #[test]
    fn test_pauses_are_silent() {
        let bank = PauseBank::new(&PipelineConfig::default());
        assert!(bank.for_boundary(Boundary::Paragraph).iter().all(|&s| s == 0.0));
    }
}
