//! Completion statistics.

use serde::Serialize;

use super::TranslationDocument;

/// How much of a document has been translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub translated: usize,
    /// Rounded to the nearest integer. An empty document counts as 100.
    pub percent: u8,
}

/// Count source keys and the ones with a non-blank translation.
#[must_use]
pub fn stats(doc: &TranslationDocument) -> Stats {
    let total = doc.source.len();
    let translated = doc.source.keys().filter(|key| !doc.translation(key).trim().is_empty()).count();
    Stats { total, translated, percent: percent(translated, total) }
}

/// `round(part / whole * 100)` in integer arithmetic, half rounding up.
fn percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 100;
    }
    let rounded = (part.saturating_mul(200) + whole) / whole.saturating_mul(2);
    u8::try_from(rounded.min(100)).unwrap_or(100)
}
