//! Book-level data types shared between the extraction front-end and the
//! synthesis pipeline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One chapter of source text, as produced by the extraction front-end.
///
/// The pipeline reads `name` and `text`; `index` and `selected` exist for the
/// caller's bookkeeping (chapter pickers, re-ordering) and are carried through
/// untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    /// Stable ordinal assigned at extraction time
    pub index: usize,
    /// Human-readable chapter name, used to derive the artifact filename
    pub name: String,
    /// Chapter text; the caller may edit it before synthesis
    pub text: String,
    /// Length of `text` in characters at extraction time
    pub length: usize,
    /// Whether the caller selected this chapter for synthesis
    pub selected: bool,
}

impl Chapter {
    pub fn new(index: usize, name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            index,
            name: name.into(),
            length: text.chars().count(),
            text,
            selected: true,
        }
    }
}

/// Metadata embedded into the final container.
#[derive(Debug, Clone, Default)]
pub struct BookMetadata {
    pub title: String,
    pub author: String,
    /// Raw bytes of the cover image, if the book has one
    pub cover: Option<Vec<u8>>,
}

impl BookMetadata {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            cover: None,
        }
    }

    /// Base filename (no extension) for artifacts derived from this book.
    pub fn base_name(&self) -> String {
        sanitize_filename(&format!("{} - {}", self.title, self.author), "audiobook")
    }
}

/// Make a name safe to use as a filename on all supported platforms.
///
/// Keeps alphanumeric characters, spaces, `-` and `_`; everything else is
/// dropped. A name that sanitizes to the empty string falls back to
/// `fallback` so every artifact still gets a unique, stable path.
pub fn sanitize_filename(input: &str, fallback: &str) -> String {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-' || *c == '_')
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Per-book output directory under the user-chosen folder.
///
/// Artifacts of one book are grouped in a subdirectory named after its title,
/// which doubles as the resume cache for interrupted runs.
pub fn book_output_dir(output_folder: &Path, metadata: &BookMetadata) -> PathBuf {
    output_folder.join(sanitize_filename(&metadata.title, "audiobook"))
}

/// Format an elapsed duration in seconds as `01h 02m 03s` for status lines.
pub fn format_elapsed(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{:02}h {:02}m {:02}s", hours, minutes, seconds)
    } else {
        format!("{:02}m {:02}s", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Chapter 1: The Start", "x"), "Chapter 1 The Start");
        assert_eq!(sanitize_filename("a/b\\c*d?e", "x"), "abcde");
        assert_eq!(sanitize_filename("under_score-dash", "x"), "under_score-dash");
        assert_eq!(sanitize_filename("  padded  ", "x"), "padded");
    }

    #[test]
    fn test_sanitize_filename_fallback() {
        // An all-punctuation name must fall back to the provided default.
        assert_eq!(sanitize_filename("???///***", "chapter_3"), "chapter_3");
        assert_eq!(sanitize_filename("", "chapter_1"), "chapter_1");
    }

    #[test]
    fn test_base_name() {
        let meta = BookMetadata::new("War & Peace", "Leo Tolstoy");
        assert_eq!(meta.base_name(), "War  Peace - Leo Tolstoy");
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(3), "00m 03s");
        assert_eq!(format_elapsed(65), "01m 05s");
        assert_eq!(format_elapsed(3600 + 120 + 5), "01h 02m 05s");
    }

    #[test]
    fn test_chapter_length() {
        let ch = Chapter::new(0, "intro", "hello");
        assert_eq!(ch.length, 5);
        assert!(ch.selected);
    }
}
