use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;
use url::Url;

/// Environment variable consulted when `upload.userHash` is unset.
pub const USER_HASH_ENV: &str = "CATBOX_USER_HASH";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "upload.endpoint")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranseditSettings {
    /// Source language used when neither a flag nor the file name gives one.
    pub default_source_language: String,

    /// Directory of the project store, relative to the working directory.
    pub store_dir: String,

    /// Page that opens review links.
    pub share_base_url: String,

    pub upload: UploadConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadConfig {
    /// Multipart upload endpoint.
    pub endpoint: String,

    /// Base URL uploaded files are served from.
    pub download_base_url: String,

    /// Account hash; anonymous uploads when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_hash: Option<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://catbox.moe/user/api.php".to_string(),
            download_base_url: "https://files.catbox.moe".to_string(),
            user_hash: None,
        }
    }
}

impl Default for TranseditSettings {
    fn default() -> Self {
        Self {
            default_source_language: "en".to_string(),
            store_dir: ".transedit".to_string(),
            share_base_url: "https://transedit.app/review".to_string(),
            upload: UploadConfig::default(),
        }
    }
}

impl TranseditSettings {
    /// Fill `upload.userHash` from `lookup(USER_HASH_ENV)` when the file leaves it unset.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.upload.user_hash.is_none() {
            self.upload.user_hash = lookup(USER_HASH_ENV).filter(|hash| !hash.trim().is_empty());
        }
    }

    /// # Errors
    /// - Required field is empty
    /// - Invalid URL
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.default_source_language.trim().is_empty() {
            errors.push(ValidationError::new(
                "defaultSourceLanguage",
                "The language code cannot be empty. Example: \"en\"",
            ));
        }

        if self.store_dir.trim().is_empty() {
            errors.push(ValidationError::new(
                "storeDir",
                "The directory cannot be empty. Example: \".transedit\"",
            ));
        }

        let urls = [
            ("shareBaseUrl", &self.share_base_url),
            ("upload.endpoint", &self.upload.endpoint),
            ("upload.downloadBaseUrl", &self.upload.download_base_url),
        ];
        for (field_path, url) in urls {
            if let Err(e) = Url::parse(url) {
                errors.push(ValidationError::new(field_path, format!("Invalid URL '{url}': {e}")));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
