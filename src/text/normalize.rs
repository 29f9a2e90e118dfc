//! Text cleanup before synthesis.
//!
//! Voice engines mis-render quotation glyphs and read full-caps text
//! robotically, so both are normalized away before a sentence reaches the
//! engine.

/// Quote glyphs that are stripped entirely rather than replaced.
const QUOTE_CHARS: [char; 7] = ['"', '\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}', '\u{2039}', '\u{203A}'];

/// Fraction of alphabetic characters that must be uppercase before a
/// segment counts as shouting and is converted to title case.
const SHOUTING_RATIO: f32 = 0.7;

/// Clean a text segment for synthesis.
///
/// Curly apostrophes become straight ones, double quotes and guillemets are
/// removed, and shouting text is converted to title case. Deterministic and
/// idempotent on already-clean text.
pub fn clean_for_speech(text: &str) -> String {
    let mut cleaned: String = text
        .chars()
        .map(|c| match c {
            '\u{2019}' | '\u{2018}' => '\'',
            other => other,
        })
        .filter(|c| !QUOTE_CHARS.contains(c))
        .collect();

    let alpha_total = cleaned.chars().filter(|c| c.is_alphabetic()).count();
    if alpha_total > 0 {
        let upper = cleaned
            .chars()
            .filter(|c| c.is_alphabetic() && c.is_uppercase())
            .count();
        if upper as f32 / alpha_total as f32 > SHOUTING_RATIO {
            cleaned = title_case(&cleaned);
        }
    }

    cleaned
}

/// Uppercase the first letter of each whitespace-separated word, lowercase
/// the rest.
fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            result.push(c);
        } else if at_word_start {
            at_word_start = false;
            result.extend(c.to_uppercase());
        } else {
            result.extend(c.to_lowercase());
        }
    }
    result
}
