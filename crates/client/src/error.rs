//! Error types for the blob store client.
//!
//! Every failed API call is turned into one variant of [`Error`]. The API
//! reports failures as `{"error": {"code": "...", "message": "..."}}`; the
//! code is mapped onto a fixed set of failure kinds by
//! [`Error::from_api_error`], so callers can match on the kind instead of
//! parsing messages.

use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// Code assumed when an error response does not carry `error.code`.
pub const UNKNOWN_ERROR_CODE: &str = "unknown_error";

/// Errors that can occur when using the blob store client.
#[derive(Debug, Error)]
pub enum Error {
    /// The store has been suspended (`store_suspended`).
    #[error("This store has been suspended.")]
    StoreSuspended,

    /// The token is missing, invalid, or lacks access (`forbidden`).
    #[error("Access denied, please provide a valid token for this resource.")]
    AccessDenied,

    /// The requested blob does not exist (`not_found`).
    #[error("The requested blob does not exist")]
    BlobNotFound,

    /// The store referenced by the token does not exist (`store_not_found`).
    #[error("This store does not exist.")]
    StoreNotFound,

    /// The request was rejected as malformed (`bad_request`).
    #[error("Vercel Blob: {0}")]
    Blob(String),

    /// The service is temporarily unavailable (`service_unavailable`).
    #[error("The blob service is currently not available. Please try again.")]
    ServiceUnavailable,

    /// Too many requests (`rate_limited`).
    #[error("{}", rate_limited_message(*.retry_after))]
    RateLimited {
        /// Seconds to wait before retrying, from the `retry-after` header.
        retry_after: Option<u64>,
    },

    /// Any error code the client does not know about.
    #[error("Unknown error, please visit https://vercel.com/help.")]
    Unknown,

    /// Connection error (network failure, DNS resolution, timeout, etc.).
    #[error("connection error: {0}")]
    Connection(String),

    /// Response deserialization error.
    #[error("failed to deserialize response: {0}")]
    Deserialization(String),

    /// A timestamp in the response could not be parsed.
    #[error("invalid timestamp `{value}`: {reason}")]
    InvalidTimestamp {
        /// The raw value received from the API.
        value: String,
        /// Why parsing failed.
        reason: String,
    },

    /// Client configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),
}

fn rate_limited_message(retry_after: Option<u64>) -> String {
    let mut message =
        String::from("Too many requests please lower the number of concurrent requests");
    if let Some(seconds) = retry_after.filter(|s| *s > 0) {
        message.push_str(&format!(" - try again in {seconds} seconds"));
    }
    message
}

/// Error body returned by the API.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ErrorResponse {
    /// Error details. Absent details behave like an empty object.
    #[serde(default)]
    pub error: ErrorDetail,
}

/// The `error` object of an [`ErrorResponse`].
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code.
    #[serde(default)]
    pub code: Option<String>,
    /// Human-readable message. Only used for `bad_request`.
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorDetail {
    /// The error code, or [`UNKNOWN_ERROR_CODE`] when none was sent.
    pub fn code(&self) -> &str {
        self.code.as_deref().unwrap_or(UNKNOWN_ERROR_CODE)
    }
}

impl Error {
    /// Map an API error code onto a failure kind.
    ///
    /// `message` is only used for `bad_request` (defaulting to
    /// `"Bad request"`), `retry_after` only for `rate_limited`. Codes the
    /// client does not recognize become [`Error::Unknown`].
    pub fn from_api_error(code: &str, message: Option<String>, retry_after: Option<u64>) -> Self {
        match code {
            "store_suspended" => Self::StoreSuspended,
            "forbidden" => Self::AccessDenied,
            "not_found" => Self::BlobNotFound,
            "store_not_found" => Self::StoreNotFound,
            "bad_request" => Self::Blob(message.unwrap_or_else(|| "Bad request".to_string())),
            "service_unavailable" => Self::ServiceUnavailable,
            "rate_limited" => Self::RateLimited { retry_after },
            _ => Self::Unknown,
        }
    }

    /// Build the error for a non-2xx response.
    ///
    /// A body that is not a JSON error object is treated as carrying no code
    /// and maps to [`Error::Unknown`].
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return Self::Connection(e.to_string()),
        };

        let detail = serde_json::from_str::<ErrorResponse>(&body)
            .map(|r| r.error)
            .unwrap_or_default();

        warn!(
            status = status.as_u16(),
            code = detail.code(),
            "blob API request failed"
        );

        let code = detail.code().to_string();
        Self::from_api_error(&code, detail.message, retry_after)
    }

    /// The API error code this failure was mapped from, if it came from the API.
    ///
    /// [`Error::Unknown`] reports [`UNKNOWN_ERROR_CODE`] since the received
    /// code is not retained.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::StoreSuspended => Some("store_suspended"),
            Self::AccessDenied => Some("forbidden"),
            Self::BlobNotFound => Some("not_found"),
            Self::StoreNotFound => Some("store_not_found"),
            Self::Blob(_) => Some("bad_request"),
            Self::ServiceUnavailable => Some("service_unavailable"),
            Self::RateLimited { .. } => Some("rate_limited"),
            Self::Unknown => Some(UNKNOWN_ERROR_CODE),
            Self::Connection(_)
            | Self::Deserialization(_)
            | Self::InvalidTimestamp { .. }
            | Self::Configuration(_) => None,
        }
    }

    /// Returns `true` if this error is retryable.
    ///
    /// Connection errors, rate limiting and service unavailability return
    /// `true`. The client itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Connection(_) | Self::RateLimited { .. } | Self::ServiceUnavailable
        )
    }

    /// How long the server asked the caller to wait, for rate-limited requests.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited {
                retry_after: Some(seconds),
            } => Some(Duration::from_secs(*seconds)),
            _ => None,
        }
    }

    /// Returns `true` if this error was reported by the API.
    pub fn is_api_error(&self) -> bool {
        self.code().is_some()
    }

    /// Returns `true` if the blob does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::BlobNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_codes() {
        assert!(matches!(
            Error::from_api_error("store_suspended", None, None),
            Error::StoreSuspended
        ));
        assert!(matches!(
            Error::from_api_error("forbidden", None, None),
            Error::AccessDenied
        ));
        assert!(matches!(
            Error::from_api_error("not_found", None, None),
            Error::BlobNotFound
        ));
        assert!(matches!(
            Error::from_api_error("store_not_found", None, None),
            Error::StoreNotFound
        ));
        assert!(matches!(
            Error::from_api_error("bad_request", None, None),
            Error::Blob(_)
        ));
        assert!(matches!(
            Error::from_api_error("service_unavailable", None, None),
            Error::ServiceUnavailable
        ));
        assert!(matches!(
            Error::from_api_error("rate_limited", None, Some(60)),
            Error::RateLimited {
                retry_after: Some(60)
            }
        ));
    }

    #[test]
    fn unrecognized_codes_are_unknown() {
        for code in ["unknown", UNKNOWN_ERROR_CODE, "", "FORBIDDEN", "teapot"] {
            assert!(
                matches!(Error::from_api_error(code, None, None), Error::Unknown),
                "{code} should map to Unknown"
            );
        }
    }

    #[test]
    fn bad_request_message() {
        let err = Error::from_api_error("bad_request", None, None);
        assert_eq!(err.to_string(), "Vercel Blob: Bad request");

        let err = Error::from_api_error("bad_request", Some("pathname is required".into()), None);
        assert_eq!(err.to_string(), "Vercel Blob: pathname is required");
    }

    #[test]
    fn message_ignored_for_other_codes() {
        let err = Error::from_api_error("not_found", Some("ignored".into()), Some(10));
        assert_eq!(err.to_string(), "The requested blob does not exist");
        assert!(err.retry_after().is_none());
    }

    #[test]
    fn rate_limited_message_includes_hint() {
        let err = Error::RateLimited {
            retry_after: Some(60),
        };
        assert_eq!(
            err.to_string(),
            "Too many requests please lower the number of concurrent requests - try again in 60 seconds"
        );
        assert_eq!(err.retry_after(), Some(Duration::from_secs(60)));

        let err = Error::RateLimited { retry_after: None };
        assert_eq!(
            err.to_string(),
            "Too many requests please lower the number of concurrent requests"
        );
        assert!(err.retry_after().is_none());
    }

    #[test]
    fn rate_limited_zero_seconds_omits_hint() {
        let err = Error::RateLimited {
            retry_after: Some(0),
        };
        assert_eq!(
            err.to_string(),
            "Too many requests please lower the number of concurrent requests"
        );
        assert_eq!(err.retry_after(), Some(Duration::ZERO));
    }

    #[test]
    fn store_messages_are_distinct() {
        let suspended = Error::StoreSuspended.to_string();
        let missing = Error::StoreNotFound.to_string();
        let unknown = Error::Unknown.to_string();
        assert_ne!(suspended, missing);
        assert_ne!(missing, unknown);
        assert_ne!(suspended, unknown);
        assert!(suspended.contains("suspended"));
        assert!(missing.contains("does not exist"));
    }

    #[test]
    fn error_body_without_code_defaults() {
        let body: ErrorResponse = serde_json::from_str(r#"{"error":{"message":null}}"#).unwrap();
        assert_eq!(body.error.code(), UNKNOWN_ERROR_CODE);
        assert!(body.error.message.is_none());

        let body: ErrorResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(body.error.code(), UNKNOWN_ERROR_CODE);
    }

    #[test]
    fn error_body_with_code_and_message() {
        let body: ErrorResponse =
            serde_json::from_str(r#"{"error":{"code":"bad_request","message":"nope"}}"#).unwrap();
        assert_eq!(body.error.code(), "bad_request");
        assert_eq!(body.error.message.as_deref(), Some("nope"));
    }

    #[test]
    fn retryable_kinds() {
        assert!(Error::Connection("timeout".into()).is_retryable());
        assert!(Error::ServiceUnavailable.is_retryable());
        assert!(Error::RateLimited { retry_after: None }.is_retryable());

        assert!(!Error::AccessDenied.is_retryable());
        assert!(!Error::BlobNotFound.is_retryable());
        assert!(!Error::Unknown.is_retryable());
        assert!(!Error::Deserialization("bad json".into()).is_retryable());
    }

    #[test]
    fn codes_round_trip_through_mapper() {
        for code in [
            "store_suspended",
            "forbidden",
            "not_found",
            "store_not_found",
            "bad_request",
            "service_unavailable",
            "rate_limited",
            UNKNOWN_ERROR_CODE,
        ] {
            let err = Error::from_api_error(code, None, None);
            assert_eq!(err.code(), Some(code));
            assert!(err.is_api_error());
        }

        assert!(!Error::Connection("refused".into()).is_api_error());
        assert!(Error::BlobNotFound.is_not_found());
    }
}
