//! Sentence segmentation and boundary classification.
//!
//! The segmenter sits behind a trait so a smarter NLP-backed implementation
//! can be swapped in without touching the pipeline; the built-in
//! [`RuleSegmenter`] covers ordinary prose well enough for narration.

/// A contiguous range of the source text classified as one sentence.
///
/// `start` and `end` are byte offsets into the text the span was produced
/// from; the gap between one span's `end` and the next span's `start` is what
/// boundary classification inspects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceSpan {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Capability of splitting chapter text into ordered sentence spans.
pub trait SentenceSegmenter: Send + Sync {
    fn segment(&self, text: &str) -> Vec<SentenceSpan>;
}

/// Words after which a period does not end a sentence.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "st", "vs", "etc", "jr", "sr", "vol",
];

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '\u{2026}')
}

/// Closing marks that stay attached to the sentence they end.
fn is_closer(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '\u{201D}' | '\u{2019}' | '\u{00BB}' | '\u{203A}')
}

/// Rule-based sentence splitter: breaks on terminator runs followed by
/// whitespace, with an abbreviation allow-list, and treats blank lines as
/// hard boundaries even without a terminator (headings, scene breaks).
#[derive(Debug, Clone, Default)]
pub struct RuleSegmenter;

impl RuleSegmenter {
    pub fn new() -> Self {
        Self
    }
}

impl SentenceSegmenter for RuleSegmenter {
    fn segment(&self, text: &str) -> Vec<SentenceSpan> {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let total = chars.len();
        let mut spans = Vec::new();
        let mut span_start: Option<usize> = None;

        let push_span = |start: usize, end: usize, spans: &mut Vec<SentenceSpan>| {
            let slice = &text[start..end];
            let trimmed = slice.trim_end();
            if !trimmed.is_empty() {
                spans.push(SentenceSpan {
                    text: trimmed.to_string(),
                    start,
                    end: start + trimmed.len(),
                });
            }
        };

        let mut i = 0;
        while i < total {
            let (byte_idx, c) = chars[i];

            if span_start.is_none() {
                if c.is_whitespace() {
                    i += 1;
                    continue;
                }
                span_start = Some(byte_idx);
            }

            if is_terminator(c) {
                // Swallow the whole terminator run plus closing marks.
                let mut j = i + 1;
                while j < total && (is_terminator(chars[j].1) || is_closer(chars[j].1)) {
                    j += 1;
                }
                let end_byte = if j < total { chars[j].0 } else { text.len() };
                let at_eof = j >= total;
                let followed_by_ws = !at_eof && chars[j].1.is_whitespace();
                let single_period = c == '.' && j == i + 1;
                let suppressed = single_period
                    && ends_with_abbreviation(&text[span_start.unwrap()..byte_idx]);

                if (at_eof || followed_by_ws) && !suppressed {
                    push_span(span_start.unwrap(), end_byte, &mut spans);
                    span_start = None;
                }
                i = j;
                continue;
            }

            if c == '\n' {
                // A blank line ends the current sentence even without a
                // terminator.
                let mut j = i + 1;
                while j < total && matches!(chars[j].1, ' ' | '\t' | '\r') {
                    j += 1;
                }
                if j < total && chars[j].1 == '\n' {
                    if let Some(start) = span_start.take() {
                        push_span(start, byte_idx, &mut spans);
                    }
                    i = j + 1;
                    continue;
                }
            }

            i += 1;
        }

        if let Some(start) = span_start {
            push_span(start, text.len(), &mut spans);
        }

        spans
    }
}

/// True when the text before a period ends in a word that never closes a
/// sentence: a listed abbreviation or a single-letter initial.
fn ends_with_abbreviation(before: &str) -> bool {
    let word = before
        .rsplit(|c: char| c.is_whitespace())
        .next()
        .unwrap_or("")
        .trim_start_matches(|c: char| !c.is_alphanumeric());
    if word.is_empty() {
        return false;
    }
    let mut word_chars = word.chars();
    if word.chars().count() == 1 && word_chars.next().is_some_and(|c| c.is_uppercase()) {
        return true;
    }
    ABBREVIATIONS.contains(&word.to_lowercase().as_str())
}

/// Classify the gap between two consecutive sentences.
///
/// Returns true iff the source markup placed a paragraph separator (a double
/// newline, with or without an intervening space) between them. No following
/// sentence means no boundary at all.
pub fn is_paragraph_break(text: &str, sentence_end: usize, next_start: Option<usize>) -> bool {
    let Some(next_start) = next_start else {
        return false;
    };
    match text.get(sentence_end..next_start) {
        Some(gap) => gap.contains("\n\n") || gap.contains("\n \n"),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(text: &str) -> Vec<SentenceSpan> {
        RuleSegmenter::new().segment(text)
    }

    #[test]
    fn test_basic_split() {
        let spans = segment("First one. Second one!");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "First one.");
        assert_eq!(spans[1].text, "Second one!");
    }

    #[test]
    fn test_offsets_index_into_source() {
        let text = "A short start. Then a question? And the rest.";
        for span in segment(text) {
            assert_eq!(&text[span.start..span.end], span.text);
        }
    }

    #[test]
    fn test_abbreviations_do_not_split() {
        let spans = segment("Mr. Smith arrived at noon. He sat down.");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "Mr. Smith arrived at noon.");
    }

    #[test]
    fn test_initials_do_not_split() {
        let spans = segment("J. K. Rowling wrote it. It sold well.");
        assert_eq!(spans.len(), 2);
    }

    #[test]
    fn test_ellipsis_and_closers() {
        let spans = segment("He paused\u{2026} Then he spoke.");
        assert_eq!(spans.len(), 2);
        let spans = segment("\u{201C}Done.\u{201D} She left.");
        assert_eq!(spans.len(), 2);
    }

    #[test]
    fn test_blank_line_ends_headings() {
        let spans = segment("Chapter One\n\nIt was a dark night.");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "Chapter One");
        assert_eq!(spans[1].text, "It was a dark night.");
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        assert!(segment("").is_empty());
        assert!(segment("  \n\n \t ").is_empty());
    }

    #[test]
    fn test_no_terminator_yields_single_span() {
        let spans = segment("a fragment without ending");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "a fragment without ending");
    }

    #[test]
    fn test_paragraph_break_classification() {
        let text = "One.\n\nTwo.";
        let spans = segment(text);
        assert_eq!(spans.len(), 2);
        assert!(is_paragraph_break(text, spans[0].end, Some(spans[1].start)));

        let text = "One.\nTwo.";
        let spans = segment(text);
        assert_eq!(spans.len(), 2);
        assert!(!is_paragraph_break(text, spans[0].end, Some(spans[1].start)));

        let text = "One. Two.";
        let spans = segment(text);
        assert!(!is_paragraph_break(text, spans[0].end, Some(spans[1].start)));

        // Double newline separated by a single space still counts.
        let text = "One.\n \nTwo.";
        let spans = segment(text);
        assert!(is_paragraph_break(text, spans[0].end, Some(spans[1].start)));

        // The final sentence has no following boundary.
        assert!(!is_paragraph_break(text, spans[1].end, None));
    }
}
