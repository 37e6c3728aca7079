//! Sharing review documents: URL tokens, share links and the upload service.

mod catbox;
mod codec;
mod link;
mod upload;

use thiserror::Error;

pub use catbox::{
    CatboxClient,
    UPLOAD_FILE_NAME,
};
pub use codec::{
    decode_token,
    encode_token,
};
pub use link::{
    LinkTarget,
    fragment_for,
    parse_fragment,
    resolve_fragment,
    resolve_link,
    share_id_url,
    share_url,
};
pub use upload::{
    BlobService,
    MemoryBlobService,
    UploadError,
};

/// Errors raised while building share links.
#[derive(Error, Debug)]
pub enum ShareError {
    #[error("Invalid share base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to serialize review document: {0}")]
    Serialize(#[from] serde_json::Error),
}
