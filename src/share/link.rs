//! Share links: `#data=<token>` fragments and `?shareId=` / `?id=` queries.

use url::{
    Url,
    form_urlencoded,
};

use super::ShareError;
use super::codec::{
    decode_token,
    encode_token,
};
use crate::document::TranslationDocument;

/// Fragment parameter carrying a share token.
const DATA_PARAM: &str = "data";
/// Query parameter carrying an upload-service id.
const SHARE_ID_PARAM: &str = "shareId";
/// Query parameter carrying a local project id.
const PROJECT_ID_PARAM: &str = "id";

/// What a review link points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// The document itself, embedded as a token.
    Document(Box<TranslationDocument>),
    /// A project already in local storage.
    ProjectId(String),
    /// A document held by the upload service.
    ShareId(String),
}

/// `data=<token>` for a URL fragment.
///
/// # Errors
/// Returns an error if the document cannot be serialized.
pub fn fragment_for(doc: &TranslationDocument) -> Result<String, serde_json::Error> {
    Ok(format!("{DATA_PARAM}={}", encode_token(doc)?))
}

/// `<base>#data=<token>`.
///
/// # Errors
/// Returns [`ShareError`] for an unparsable base URL or serialization failure.
pub fn share_url(base: &str, doc: &TranslationDocument) -> Result<String, ShareError> {
    let mut url = parse_base(base)?;
    url.set_fragment(Some(&fragment_for(doc)?));
    Ok(url.into())
}

/// `<base>?shareId=<remote_id>`.
///
/// # Errors
/// Returns [`ShareError::InvalidBaseUrl`] for an unparsable base URL.
pub fn share_id_url(base: &str, remote_id: &str) -> Result<String, ShareError> {
    let mut url = parse_base(base)?;
    url.query_pairs_mut().append_pair(SHARE_ID_PARAM, remote_id);
    Ok(url.into())
}

fn parse_base(base: &str) -> Result<Url, ShareError> {
    Url::parse(base).map_err(|source| ShareError::InvalidBaseUrl { url: base.to_string(), source })
}

/// Decode the document embedded in a URL fragment, if any.
///
/// Accepts `#data=<token>`, `data=<token>&...` and a bare `<token>`.
#[must_use]
pub fn parse_fragment(hash: &str) -> Option<TranslationDocument> {
    let clean = hash.strip_prefix('#').unwrap_or(hash);
    if clean.is_empty() {
        return None;
    }
    if clean.contains('=') {
        let (_, token) = form_urlencoded::parse(clean.as_bytes()).find(|(key, _)| key == DATA_PARAM)?;
        decode_token(&token)
    } else {
        decode_token(clean)
    }
}

/// Interpret a URL fragment: an embedded document, else a bare project id.
#[must_use]
pub fn resolve_fragment(hash: &str) -> Option<LinkTarget> {
    if let Some(doc) = parse_fragment(hash) {
        return Some(LinkTarget::Document(Box::new(doc)));
    }
    let clean = hash.strip_prefix('#').unwrap_or(hash).trim();
    (!clean.is_empty() && !clean.contains('=')).then(|| LinkTarget::ProjectId(clean.to_string()))
}

/// Interpret a full review link or a bare fragment.
///
/// `?shareId=` takes precedence over `?id=`, which takes precedence over the
/// fragment.
#[must_use]
pub fn resolve_link(link: &str) -> Option<LinkTarget> {
    let Ok(url) = Url::parse(link.trim()) else {
        return resolve_fragment(link.trim());
    };

    let mut share_id = None;
    let mut project_id = None;
    for (key, value) in url.query_pairs() {
        if value.is_empty() {
            continue;
        }
        if key == SHARE_ID_PARAM {
            share_id = Some(value.into_owned());
        } else if key == PROJECT_ID_PARAM {
            project_id = Some(value.into_owned());
        }
    }

    if let Some(id) = share_id {
        return Some(LinkTarget::ShareId(id));
    }
    if let Some(id) = project_id {
        return Some(LinkTarget::ProjectId(id));
    }
    url.fragment().and_then(resolve_fragment)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::test_utils::document;

    const BASE: &str = "https://transedit.app/review";

    #[googletest::test]
    fn test_share_url_round_trip() {
        let doc = document(&[("a", "Hi")], &[("a", "안녕")]);

        let url = share_url(BASE, &doc).unwrap();

        expect_that!(url, starts_with("https://transedit.app/review#data="));
        assert_eq!(resolve_link(&url), Some(LinkTarget::Document(Box::new(doc))));
    }

    #[googletest::test]
    fn test_parse_fragment_forms() {
        let doc = document(&[("a", "Hi")], &[("a", "")]);
        let token = encode_token(&doc).unwrap();

        assert_eq!(parse_fragment(&format!("#data={token}")), Some(doc.clone()));
        assert_eq!(parse_fragment(&format!("data={token}&theme=dark")), Some(doc.clone()));
        assert_eq!(parse_fragment(&token), Some(doc));
    }

    #[rstest]
    #[case::empty("")]
    #[case::hash_only("#")]
    #[case::other_param("#theme=dark")]
    #[case::garbage_token("#data=%%%")]
    fn test_parse_fragment_none(#[case] hash: &str) {
        assert_eq!(parse_fragment(hash), None);
    }

    #[rstest]
    #[case::bare_id("#project-42", Some(LinkTarget::ProjectId("project-42".to_string())))]
    #[case::params_without_data("#theme=dark", None)]
    #[case::empty("#", None)]
    fn test_resolve_fragment(#[case] hash: &str, #[case] expected: Option<LinkTarget>) {
        assert_eq!(resolve_fragment(hash), expected);
    }

    #[googletest::test]
    fn test_share_id_url_encodes_query() {
        let url = share_id_url(BASE, "abc 1.transedit").unwrap();

        expect_that!(url, eq("https://transedit.app/review?shareId=abc+1.transedit"));
        assert_eq!(resolve_link(&url), Some(LinkTarget::ShareId("abc 1.transedit".to_string())));
    }

    #[rstest]
    #[case::share_id_wins(
        "https://transedit.app/review?id=p1&shareId=s1#p2",
        Some(LinkTarget::ShareId("s1".to_string()))
    )]
    #[case::project_id_query(
        "https://transedit.app/review?id=p1#p2",
        Some(LinkTarget::ProjectId("p1".to_string()))
    )]
    #[case::project_id_fragment(
        "https://transedit.app/review#p2",
        Some(LinkTarget::ProjectId("p2".to_string()))
    )]
    #[case::empty_share_id("https://transedit.app/review?shareId=", None)]
    #[case::nothing("https://transedit.app/review", None)]
    #[case::bare_fragment("#p3", Some(LinkTarget::ProjectId("p3".to_string())))]
    fn test_resolve_link(#[case] link: &str, #[case] expected: Option<LinkTarget>) {
        assert_eq!(resolve_link(link), expected);
    }

    #[googletest::test]
    fn test_invalid_base_url() {
        let result = share_id_url("not a url", "x");

        assert!(matches!(result, Err(ShareError::InvalidBaseUrl { .. })));
    }
}
