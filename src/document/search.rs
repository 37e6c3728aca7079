//! Key filtering for the review list.

use super::TranslationDocument;

/// Keys whose name, source text or translation contains `query`.
///
/// Matching is case-insensitive on the trimmed query; a blank query returns
/// every key. Keys come back in lexicographic order.
#[must_use]
pub fn search<'a>(doc: &'a TranslationDocument, query: &str) -> Vec<&'a str> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return doc.keys().collect();
    }

    doc.source
        .iter()
        .filter(|(key, source)| {
            key.to_lowercase().contains(&needle)
                || source.to_lowercase().contains(&needle)
                || doc.translation(key).to_lowercase().contains(&needle)
        })
        .map(|(key, _)| key.as_str())
        .collect()
}
