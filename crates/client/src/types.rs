//! Results returned by the blob API, and the decoders that build them from
//! response bodies.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::options::ListMode;

/// Naive layouts accepted for `uploadedAt`, interpreted as UTC.
const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse an `uploadedAt` value.
///
/// Accepts RFC 3339 (`2024-01-01T10:00:00.000Z`) as well as timestamps without
/// an offset (`2024-01-01 10:00:00`), which are taken to be UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, Error> {
    let rfc3339_err = match DateTime::parse_from_rfc3339(value) {
        Ok(ts) => return Ok(ts.with_timezone(&Utc)),
        Err(e) => e,
    };

    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|ts| ts.and_utc())
        .ok_or_else(|| Error::InvalidTimestamp {
            value: value.to_string(),
            reason: rfc3339_err.to_string(),
        })
}

/// Result of a `put` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutResult {
    /// Public URL of the blob.
    pub url: String,
    /// URL that forces a download when opened.
    pub download_url: String,
    /// Pathname of the blob within the store.
    pub pathname: String,
    /// Content type, when the API reports one.
    #[serde(default)]
    pub content_type: Option<String>,
    /// `content-disposition` served with the blob.
    pub content_disposition: String,
}

/// Result of a `copy` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyResult {
    /// Public URL of the new blob.
    pub url: String,
    /// URL that forces a download when opened.
    pub download_url: String,
    /// Pathname of the new blob.
    pub pathname: String,
    /// Content type, when the API reports one.
    #[serde(default)]
    pub content_type: Option<String>,
    /// `content-disposition` served with the blob.
    pub content_disposition: String,
}

/// Metadata returned by a `head` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadResult {
    pub url: String,
    pub download_url: String,
    /// Size in bytes.
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
    pub pathname: String,
    pub content_type: String,
    pub content_disposition: String,
    pub cache_control: String,
}

/// One blob in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub url: String,
    pub download_url: String,
    pub pathname: String,
    /// Size in bytes.
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

/// A page of blobs in expanded mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResult {
    pub blobs: Vec<ListItem>,
    /// Pass to the next `list` call to continue.
    pub cursor: Option<String>,
    pub has_more: bool,
}

/// A page of blobs in folded mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFoldedResult {
    pub blobs: Vec<ListItem>,
    pub cursor: Option<String>,
    pub has_more: bool,
    /// Common prefixes one level below the requested prefix, in API order.
    pub folders: Vec<String>,
}

/// Result of a `list` call; the variant follows the requested [`ListMode`].
///
/// # Example
///
/// ```
/// use blobstore_client::{ListResponse, ListResult};
///
/// let response = ListResponse::Expanded(ListResult {
///     blobs: Vec::new(),
///     cursor: None,
///     has_more: false,
/// });
/// assert!(response.folders().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ListResponse {
    /// Returned unless folded mode was requested.
    Expanded(ListResult),
    /// Returned when [`ListMode::Folded`] was requested.
    Folded(ListFoldedResult),
}

impl ListResponse {
    /// Blobs on this page.
    pub fn blobs(&self) -> &[ListItem] {
        match self {
            Self::Expanded(r) => &r.blobs,
            Self::Folded(r) => &r.blobs,
        }
    }

    /// Cursor for the next page.
    pub fn cursor(&self) -> Option<&str> {
        match self {
            Self::Expanded(r) => r.cursor.as_deref(),
            Self::Folded(r) => r.cursor.as_deref(),
        }
    }

    /// Whether more pages are available.
    pub fn has_more(&self) -> bool {
        match self {
            Self::Expanded(r) => r.has_more,
            Self::Folded(r) => r.has_more,
        }
    }

    /// Folders, for folded listings.
    pub fn folders(&self) -> Option<&[String]> {
        match self {
            Self::Expanded(_) => None,
            Self::Folded(r) => Some(&r.folders),
        }
    }
}

// ---------------------------------------------------------------------------
// Wire formats
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HeadBody {
    url: String,
    download_url: String,
    size: u64,
    uploaded_at: String,
    pathname: String,
    content_type: String,
    content_disposition: String,
    cache_control: String,
}

impl TryFrom<HeadBody> for HeadResult {
    type Error = Error;

    fn try_from(body: HeadBody) -> Result<Self, Error> {
        Ok(Self {
            uploaded_at: parse_timestamp(&body.uploaded_at)?,
            url: body.url,
            download_url: body.download_url,
            size: body.size,
            pathname: body.pathname,
            content_type: body.content_type,
            content_disposition: body.content_disposition,
            cache_control: body.cache_control,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListItemBody {
    url: String,
    download_url: String,
    pathname: String,
    size: u64,
    uploaded_at: String,
}

impl TryFrom<ListItemBody> for ListItem {
    type Error = Error;

    fn try_from(body: ListItemBody) -> Result<Self, Error> {
        Ok(Self {
            uploaded_at: parse_timestamp(&body.uploaded_at)?,
            url: body.url,
            download_url: body.download_url,
            pathname: body.pathname,
            size: body.size,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListBody {
    #[serde(default)]
    blobs: Vec<ListItemBody>,
    #[serde(default)]
    cursor: Option<String>,
    has_more: bool,
    #[serde(default)]
    folders: Vec<String>,
}

impl ListBody {
    /// Convert into the result shape matching the requested mode.
    pub(crate) fn into_response(self, mode: Option<ListMode>) -> Result<ListResponse, Error> {
        let blobs = self
            .blobs
            .into_iter()
            .map(ListItem::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(match mode {
            Some(ListMode::Folded) => ListResponse::Folded(ListFoldedResult {
                blobs,
                cursor: self.cursor,
                has_more: self.has_more,
                folders: self.folders,
            }),
            _ => ListResponse::Expanded(ListResult {
                blobs,
                cursor: self.cursor,
                has_more: self.has_more,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn ten_am() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn parses_naive_and_rfc3339_timestamps() {
        assert_eq!(parse_timestamp("2024-01-01 10:00:00").unwrap(), ten_am());
        assert_eq!(parse_timestamp("2024-01-01T10:00:00").unwrap(), ten_am());
        assert_eq!(parse_timestamp("2024-01-01T10:00:00.000Z").unwrap(), ten_am());
        assert_eq!(
            parse_timestamp("2024-01-01T12:00:00+02:00").unwrap(),
            ten_am()
        );
    }

    #[test]
    fn invalid_timestamp_is_an_error() {
        let err = parse_timestamp("yesterday").unwrap_err();
        match err {
            Error::InvalidTimestamp { value, .. } => assert_eq!(value, "yesterday"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn put_result_content_type_is_optional() {
        let result: PutResult = serde_json::from_str(
            r#"{"url":"u","downloadUrl":"d","pathname":"p","contentDisposition":"c"}"#,
        )
        .unwrap();
        assert!(result.content_type.is_none());
        assert_eq!(result.download_url, "d");
    }

    #[test]
    fn put_result_missing_required_field_fails() {
        let result = serde_json::from_str::<PutResult>(r#"{"url":"u","downloadUrl":"d"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn head_body_decodes() {
        let body: HeadBody = serde_json::from_value(serde_json::json!({
            "url": "url",
            "downloadUrl": "downloadUrl",
            "size": 42,
            "uploadedAt": "2024-01-01T10:00:00.000Z",
            "pathname": "pathname",
            "contentType": "text/plain",
            "contentDisposition": "inline",
            "cacheControl": "public, max-age=60",
        }))
        .unwrap();
        let head = HeadResult::try_from(body).unwrap();
        assert_eq!(head.size, 42);
        assert_eq!(head.uploaded_at, ten_am());
        assert_eq!(head.cache_control, "public, max-age=60");
    }

    #[test]
    fn list_body_defaults() {
        let body: ListBody = serde_json::from_str(r#"{"hasMore":false}"#).unwrap();
        let response = body.into_response(Some(ListMode::Folded)).unwrap();
        assert!(response.blobs().is_empty());
        assert!(response.cursor().is_none());
        assert!(!response.has_more());
        assert_eq!(response.folders(), Some(&[][..]));
    }

    #[test]
    fn list_body_requires_has_more() {
        assert!(serde_json::from_str::<ListBody>(r#"{"blobs":[]}"#).is_err());
    }

    #[test]
    fn list_mode_selects_variant() {
        let json = r#"{"blobs":[],"hasMore":true,"cursor":"c","folders":["a/"]}"#;

        let body: ListBody = serde_json::from_str(json).unwrap();
        let response = body.into_response(None).unwrap();
        assert!(matches!(response, ListResponse::Expanded(_)));
        assert!(response.folders().is_none());

        let body: ListBody = serde_json::from_str(json).unwrap();
        let response = body.into_response(Some(ListMode::Expanded)).unwrap();
        assert!(matches!(response, ListResponse::Expanded(_)));

        let body: ListBody = serde_json::from_str(json).unwrap();
        let response = body.into_response(Some(ListMode::Folded)).unwrap();
        assert_eq!(response.folders(), Some(&["a/".to_string()][..]));
        assert_eq!(response.cursor(), Some("c"));
    }

    #[test]
    fn bad_item_timestamp_fails_whole_listing() {
        let body: ListBody = serde_json::from_value(serde_json::json!({
            "blobs": [{
                "url": "url",
                "downloadUrl": "downloadUrl",
                "pathname": "pathname",
                "size": 1,
                "uploadedAt": "not a date",
            }],
            "hasMore": false,
        }))
        .unwrap();
        assert!(matches!(
            body.into_response(None),
            Err(Error::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn results_serialize_camel_case() {
        let item = ListItem {
            url: "url".into(),
            download_url: "downloadUrl".into(),
            pathname: "pathname".into(),
            size: 1,
            uploaded_at: ten_am(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["downloadUrl"], "downloadUrl");
        assert_eq!(json["uploadedAt"], "2024-01-01T10:00:00Z");
    }
}
