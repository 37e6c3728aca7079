//! Review document <-> URL-safe token.
//!
//! A token is `base64url(utf8(review-file JSON))` without padding.

use base64::Engine;
use base64::alphabet;
use base64::engine::{
    DecodePaddingMode,
    GeneralPurpose,
    GeneralPurposeConfig,
};
use serde_json::Value;

use crate::document::{
    TranslationDocument,
    to_document_json,
    validate,
};

/// Encodes without padding, decodes with or without it.
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode a document as a share token.
///
/// # Errors
/// Returns an error if the document cannot be serialized.
pub fn encode_token(doc: &TranslationDocument) -> Result<String, serde_json::Error> {
    let json = to_document_json(doc)?;
    Ok(TOKEN_ENGINE.encode(json.as_bytes()))
}

/// Decode and validate a share token.
///
/// Returns `None` on any failure; callers use this to probe text that may
/// or may not be a token.
#[must_use]
pub fn decode_token(token: &str) -> Option<TranslationDocument> {
    // tolerate tokens that went through the standard alphabet
    let normalized: String = token
        .trim()
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    let bytes = TOKEN_ENGINE
        .decode(normalized.as_bytes())
        .inspect_err(|e| tracing::debug!(error = %e, "Share token is not base64url"))
        .ok()?;
    let text = String::from_utf8(bytes)
        .inspect_err(|e| tracing::debug!(error = %e, "Share token is not UTF-8"))
        .ok()?;
    let value: Value = serde_json::from_str(&text)
        .inspect_err(|e| tracing::debug!(error = %e, "Share token is not JSON"))
        .ok()?;
    validate(&value)
        .inspect_err(|e| tracing::debug!(error = %e, "Share token is not a review file"))
        .ok()
}
