//! Locale JSON input (`en.json`, `ko.json`, ...).

use std::path::Path;

use jsonc_parser::ParseOptions;
use serde_json::Value;

use super::InputError;
use crate::document::MalformedInputError;

/// Primary language subtags recognised in directory names.
const PRIMARY_LANGUAGE_SUBTAGS: &[&str] = &[
    "af", "ar", "az", "be", "bg", "bs", "ca", "cs", "cy", "da", "de", "dv", "el", "en", "eo", "es",
    "et", "eu", "fa", "fi", "fo", "fr", "gl", "gu", "he", "hi", "hr", "hu", "hy", "id", "is", "it",
    "ja", "ka", "kk", "kn", "ko", "kok", "ky", "lt", "lv", "mi", "mk", "mn", "mr", "ms", "mt", "nb",
    "nl", "nn", "pa", "pl", "ps", "pt", "qu", "ro", "ru", "sa", "se", "sk", "sl", "sq", "sr", "sv",
    "sw", "syr", "ta", "te", "th", "tl", "tn", "tr", "ts", "tt", "uk", "ur", "uz", "vi", "xh", "zh",
    "zu",
];

/// Parse locale JSON text. Comments and trailing commas are accepted.
///
/// # Errors
/// Returns [`MalformedInputError`] for syntax errors or text without a value.
pub fn parse_locale_json(text: &str) -> Result<Value, MalformedInputError> {
    jsonc_parser::parse_to_serde_value(text, &ParseOptions::default())
        .map_err(|e| MalformedInputError::new(format!("Invalid JSON: {e}")))?
        .ok_or_else(|| MalformedInputError::new("Invalid JSON: no value"))
}

/// Like [`parse_locale_json`], but blank text means "no locale".
///
/// # Errors
/// See [`parse_locale_json`].
pub fn parse_optional_locale_json(text: &str) -> Result<Option<Value>, MalformedInputError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    parse_locale_json(text).map(Some)
}

/// Read and parse a locale file.
///
/// # Errors
/// Returns [`InputError::Read`] if the file cannot be read and
/// [`InputError::Malformed`] if it is not JSON.
pub fn read_locale_file(path: &Path) -> Result<Value, InputError> {
    tracing::debug!(path = %path.display(), "Reading locale file");
    let content = std::fs::read_to_string(path)
        .map_err(|source| InputError::Read { path: path.to_path_buf(), source })?;
    parse_locale_json(&content).map_err(|e| {
        MalformedInputError::new(format!("{} is not valid JSON: {}", path.display(), e.reason))
            .into()
    })
}

/// Guess the language code of a locale file from its path.
///
/// # Examples
/// - `en.json` → `en`
/// - `locales/pt-BR.json` → `pt-br`
/// - `locales/ko/common.json` → `ko`
/// - `strings.json` → `None`
#[must_use]
pub fn infer_language_from_filename(path: &Path) -> Option<String> {
    let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        return None;
    }

    let stem = path.file_stem()?.to_string_lossy().to_lowercase();
    if is_language_tag(&stem) {
        return Some(stem);
    }

    // locales/<lang>/<namespace>.json
    let parent = path.parent()?.file_name()?.to_string_lossy().to_lowercase();
    let primary = parent.split(['-', '_']).next()?;
    (is_language_tag(&parent) && PRIMARY_LANGUAGE_SUBTAGS.contains(&primary)).then_some(parent)
}

/// `xx`, `xxx`, optionally followed by `-yy`/`_yy` (2-3 ASCII letters each).
fn is_language_tag(text: &str) -> bool {
    let is_subtag = |part: &str| (2..=3).contains(&part.len()) && part.bytes().all(|b| b.is_ascii_alphabetic());
    let mut parts = text.split(['-', '_']);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(primary), None, None) => is_subtag(primary),
        (Some(primary), Some(region), None) => is_subtag(primary) && is_subtag(region),
        _ => false,
    }
}
