//! Reading locale files and review files from text or disk.

mod locale;
mod review;

use std::path::PathBuf;

use thiserror::Error;

pub use locale::{
    infer_language_from_filename,
    parse_locale_json,
    parse_optional_locale_json,
    read_locale_file,
};
pub use review::{
    parse_document_json,
    read_document_file,
};

use crate::document::{
    MalformedInputError,
    ValidationError,
};

/// Errors raised while reading user-supplied files.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Malformed(#[from] MalformedInputError),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
