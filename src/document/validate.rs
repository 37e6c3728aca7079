//! Structural checks for review files crossing a trust boundary.

use chrono::{
    DateTime,
    NaiveDate,
    NaiveDateTime,
    Utc,
};
use serde_json::{
    Map,
    Value,
};
use thiserror::Error;

use super::{
    DocumentMeta,
    FORMAT_TAG,
    FORMAT_VERSION,
    TranslationDocument,
};
use crate::flat::{
    FlatMap,
    number_to_string,
};

/// Why a candidate review file was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid review file: not an object")]
    NotAnObject,
    #[error("Invalid review file: missing id")]
    MissingId,
    #[error("Invalid review file: missing meta")]
    MissingMeta,
    #[error("Invalid review file: meta.formatTag must be '{}'", FORMAT_TAG)]
    WrongFormatTag,
    #[error("Invalid review file: unsupported version (expected {})", FORMAT_VERSION)]
    UnsupportedVersion,
    #[error("Invalid review file: missing languages")]
    MissingLanguages,
    #[error("Invalid review file: missing source")]
    MissingSource,
    #[error("Invalid review file: missing target")]
    MissingTarget,
    /// A `source`/`target` entry holds an object or array.
    #[error("Invalid review file: {field}.{key} must be a string")]
    NonStringEntry { field: &'static str, key: String },
}

/// Checks a parsed JSON value and converts it into a [`TranslationDocument`].
///
/// Checks run in order and stop at the first failure. Scalar entries in
/// `source`/`target` are stringified, `null` becomes `""`. Key alignment
/// between `source` and `target` is left to [`super::merge_progress`].
///
/// # Errors
/// Returns the [`ValidationError`] of the first failed check.
pub fn validate(candidate: &Value) -> Result<TranslationDocument, ValidationError> {
    let Value::Object(root) = candidate else {
        return Err(ValidationError::NotAnObject);
    };

    let id = root
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .ok_or(ValidationError::MissingId)?;

    let meta = root.get("meta").and_then(Value::as_object).ok_or(ValidationError::MissingMeta)?;
    if meta.get("formatTag").and_then(Value::as_str) != Some(FORMAT_TAG) {
        return Err(ValidationError::WrongFormatTag);
    }
    if meta.get("formatVersion").and_then(Value::as_u64) != Some(FORMAT_VERSION) {
        return Err(ValidationError::UnsupportedVersion);
    }
    let (Some(source_language), Some(target_language)) =
        (non_empty_str(meta, "sourceLanguageCode"), non_empty_str(meta, "targetLanguageCode"))
    else {
        return Err(ValidationError::MissingLanguages);
    };

    let source = root.get("source").and_then(Value::as_object).ok_or(ValidationError::MissingSource)?;
    let target = root.get("target").and_then(Value::as_object).ok_or(ValidationError::MissingTarget)?;
    let source = entries_to_flat_map("source", source)?;
    let target = entries_to_flat_map("target", target)?;

    let created_at = parse_created_at(meta.get("createdAt").and_then(Value::as_str));
    let title = meta.get("title").and_then(Value::as_str).map(str::to_string);

    Ok(TranslationDocument {
        id: id.to_string(),
        meta: DocumentMeta::new(source_language, target_language, title, created_at),
        source,
        target,
    })
}

/// `createdAt` is informational: RFC 3339, then a naive date-time or date read
/// as UTC, else the Unix epoch.
fn parse_created_at(text: Option<&str>) -> DateTime<Utc> {
    let Some(text) = text.map(str::trim) else {
        return DateTime::UNIX_EPOCH;
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return dt.with_timezone(&Utc);
    }
    let naive = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d").ok().and_then(|date| date.and_hms_opt(0, 0, 0))
        });
    naive.map_or_else(
        || {
            tracing::debug!(created_at = %text, "Unreadable createdAt, using the epoch");
            DateTime::UNIX_EPOCH
        },
        |naive| naive.and_utc(),
    )
}

fn non_empty_str<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
    object.get(field).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Stringifies the entries of a flat `source`/`target` object.
fn entries_to_flat_map(
    field: &'static str,
    entries: &Map<String, Value>,
) -> Result<FlatMap, ValidationError> {
    entries
        .iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => number_to_string(n),
                Value::Array(_) | Value::Object(_) => {
                    return Err(ValidationError::NonStringEntry { field, key: key.clone() });
                }
            };
            Ok((key.clone(), text))
        })
        .collect()
}
