//! [`BlobService`] backed by a Catbox-compatible file host.

use reqwest::multipart::{
    Form,
    Part,
};
use url::Url;

use super::upload::{
    BlobService,
    UploadError,
};

/// File name reported for every upload.
pub const UPLOAD_FILE_NAME: &str = "review.transedit";

/// HTTP client for a Catbox-style host.
///
/// Uploads are `multipart/form-data` posts with `reqtype=fileupload`; the host
/// answers with the public URL of the file, whose last path segment is the
/// remote id. Downloads are plain `GET <download base>/<id>`.
#[derive(Clone, Debug)]
pub struct CatboxClient {
    http: reqwest::Client,
    endpoint: Url,
    download_base: Url,
    user_hash: Option<String>,
}

impl CatboxClient {
    /// # Errors
    /// Returns [`UploadError::InvalidUrl`] if either URL does not parse or
    /// cannot take path segments.
    pub fn new(
        endpoint: &str,
        download_base: &str,
        user_hash: Option<String>,
    ) -> Result<Self, UploadError> {
        let endpoint = Url::parse(endpoint).map_err(|e| UploadError::InvalidUrl(format!("{endpoint}: {e}")))?;
        let download_base = Url::parse(download_base)
            .map_err(|e| UploadError::InvalidUrl(format!("{download_base}: {e}")))?;
        if download_base.cannot_be_a_base() {
            return Err(UploadError::InvalidUrl(download_base.to_string()));
        }
        let user_hash = user_hash.filter(|hash| !hash.trim().is_empty());
        Ok(Self { http: reqwest::Client::new(), endpoint, download_base, user_hash })
    }

    fn download_url(&self, remote_id: &str) -> Result<Url, UploadError> {
        let mut url = self.download_base.clone();
        url.path_segments_mut()
            .map_err(|()| UploadError::InvalidUrl(self.download_base.to_string()))?
            .pop_if_empty()
            .push(remote_id);
        Ok(url)
    }
}

/// Last non-empty path segment of the URL the host answered with.
fn remote_id_from_response(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
        return None;
    }
    trimmed.rsplit('/').find(|segment| !segment.is_empty()).map(str::to_string)
}

impl BlobService for CatboxClient {
    async fn upload(&self, bytes: Vec<u8>) -> Result<String, UploadError> {
        let size = bytes.len();
        let file = Part::bytes(bytes).file_name(UPLOAD_FILE_NAME).mime_str("application/json")?;
        let mut form = Form::new().text("reqtype", "fileupload");
        if let Some(hash) = &self.user_hash {
            form = form.text("userhash", hash.clone());
        }
        let form = form.part("fileToUpload", file);

        tracing::debug!(endpoint = %self.endpoint, size, "Uploading review document");
        let response = self.http.post(self.endpoint.clone()).multipart(form).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::warn!(%status, "Upload rejected");
            return Err(UploadError::Status { status: status.as_u16(), body });
        }

        remote_id_from_response(&body).ok_or(UploadError::UnexpectedResponse(body))
    }

    async fn fetch(&self, remote_id: &str) -> Result<Vec<u8>, UploadError> {
        if remote_id.trim().is_empty() {
            return Err(UploadError::NotFound(remote_id.to_string()));
        }
        let url = self.download_url(remote_id)?;

        tracing::debug!(%url, "Fetching shared review document");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(UploadError::NotFound(remote_id.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Status { status: status.as_u16(), body });
        }
        Ok(response.bytes().await?.to_vec())
    }
}
