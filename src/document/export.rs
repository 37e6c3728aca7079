//! Serialization of documents back to files.

use super::TranslationDocument;
use crate::flat::{
    FlatMap,
    unflatten,
};

/// Nested locale JSON for a target map, pretty-printed.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn to_locale_json(target: &FlatMap) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&unflatten(target))
}

/// The portable review-file form of a document, pretty-printed.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn to_document_json(doc: &TranslationDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(doc)
}
