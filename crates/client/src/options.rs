//! Per-call options for the blob API.

use serde::{Deserialize, Serialize};

/// Header requesting a random suffix on the stored pathname.
pub const RANDOM_SUFFIX_HEADER: &str = "x-random-suffix";

/// Header overriding the stored content type.
pub const CONTENT_TYPE_HEADER: &str = "x-content-type";

/// Header setting the cache max-age, in seconds.
pub const CACHE_CONTROL_MAX_AGE_HEADER: &str = "x-cache-control-max-age";

/// Options shared by the calls that create a blob (`put` and `copy`).
///
/// # Example
///
/// ```
/// use blobstore_client::CommonCreateOptions;
///
/// let options = CommonCreateOptions::new()
///     .add_random_suffix(true)
///     .content_type("text/plain")
///     .cache_control_max_age(3600);
/// assert_eq!(options.headers().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommonCreateOptions {
    /// Access level of the blob. Only `"public"` is supported by the API,
    /// which infers it from the token; it is not sent on the wire.
    pub access: String,
    /// Append a random suffix to the pathname.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_random_suffix: Option<bool>,
    /// Content type to store instead of the one inferred from the pathname.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// `max-age` of the `cache-control` header served with the blob.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_control_max_age: Option<u64>,
}

impl Default for CommonCreateOptions {
    fn default() -> Self {
        Self {
            access: "public".to_string(),
            add_random_suffix: None,
            content_type: None,
            cache_control_max_age: None,
        }
    }
}

impl CommonCreateOptions {
    /// Create options with every field at its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the access level.
    #[must_use]
    pub fn access(mut self, access: impl Into<String>) -> Self {
        self.access = access.into();
        self
    }

    /// Request a random suffix on the pathname.
    #[must_use]
    pub fn add_random_suffix(mut self, add_random_suffix: bool) -> Self {
        self.add_random_suffix = Some(add_random_suffix);
        self
    }

    /// Set the content type.
    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the cache max-age in seconds.
    #[must_use]
    pub fn cache_control_max_age(mut self, seconds: u64) -> Self {
        self.cache_control_max_age = Some(seconds);
        self
    }

    /// Headers to attach to a create request.
    ///
    /// `x-random-suffix` is only sent when the suffix is requested; the other
    /// headers are sent whenever their option is set.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = Vec::new();
        if self.add_random_suffix == Some(true) {
            headers.push((RANDOM_SUFFIX_HEADER, "true".to_string()));
        }
        if let Some(content_type) = &self.content_type {
            headers.push((CONTENT_TYPE_HEADER, content_type.clone()));
        }
        if let Some(max_age) = self.cache_control_max_age {
            headers.push((CACHE_CONTROL_MAX_AGE_HEADER, max_age.to_string()));
        }
        headers
    }
}

/// Listing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListMode {
    /// Every blob under the prefix, recursively.
    Expanded,
    /// Blobs directly under the prefix, with deeper paths grouped into folders.
    Folded,
}

impl ListMode {
    /// The value sent in the `mode` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expanded => "expanded",
            Self::Folded => "folded",
        }
    }
}

/// Options for [`BlobClient::list`](crate::BlobClient::list).
///
/// Serialized as the query string of the list request; unset fields are
/// left out.
///
/// # Example
///
/// ```
/// use blobstore_client::{ListMode, ListOptions};
///
/// let options = ListOptions::new()
///     .prefix("images/")
///     .limit(100)
///     .mode(ListMode::Folded);
/// assert!(options.is_folded());
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    /// Cursor returned by a previous call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    /// Maximum number of blobs to return.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Listing mode. The API lists in expanded mode when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ListMode>,
    /// Only return blobs whose pathname starts with this prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

impl ListOptions {
    /// Create empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the number of results.
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Filter by pathname prefix.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Continue from a cursor.
    #[must_use]
    pub fn cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Set the listing mode.
    #[must_use]
    pub fn mode(mut self, mode: ListMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Returns `true` if folded results were requested.
    pub fn is_folded(&self) -> bool {
        self.mode == Some(ListMode::Folded)
    }
}
