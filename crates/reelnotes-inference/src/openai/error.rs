//! Classification of error replies from completion endpoints.
//!
//! Groq and OpenAI wrap failures as `{"error": {"message", "type", "code"}}`;
//! proxies in front of them often answer with HTML instead. Both are folded
//! into a [`FailureKind`], which decides the reelnotes error variant.

use std::fmt;

use serde::Deserialize;

use reelnotes_core::Error;

/// Decoded error body. Missing or unparsable bodies decode as empty.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error: ErrorDetail,
}

#[derive(Debug, Default, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub code: Option<String>,
}

impl ErrorEnvelope {
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    /// True when either the `type` or the `code` field contains `needle`.
    fn mentions(&self, needle: &str) -> bool {
        self.error.kind.contains(needle)
            || self
                .error
                .code
                .as_deref()
                .is_some_and(|code| code.contains(needle))
    }
}

/// Why a completion request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Auth,
    RateLimited,
    ModelUnavailable,
    ContextTooLong,
    Upstream,
    Other,
}

impl FailureKind {
    pub fn classify(status: u16, envelope: &ErrorEnvelope) -> Self {
        match status {
            401 | 403 => Self::Auth,
            429 => Self::RateLimited,
            404 => Self::ModelUnavailable,
            _ if envelope.mentions("model_not_found") || envelope.mentions("model_decommissioned") => {
                Self::ModelUnavailable
            }
            400 | 413 if envelope.mentions("context_length") => Self::ContextTooLong,
            500..=599 => Self::Upstream,
            _ => Self::Other,
        }
    }

    pub fn is_retryable(self) -> bool {
        matches!(self, Self::RateLimited | Self::Upstream)
    }

    /// Bad key or model name: retrying cannot help until the deployment changes.
    pub fn is_misconfiguration(self) -> bool {
        matches!(self, Self::Auth | Self::ModelUnavailable)
    }

    pub fn into_error(self, detail: &str) -> Error {
        let message = match self {
            Self::Other => detail.to_string(),
            kind => format!("{}: {}", kind, detail),
        };
        if self.is_misconfiguration() {
            Error::Config(message)
        } else {
            Error::Inference(message)
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auth => "Authentication failed",
            Self::RateLimited => "Rate limit exceeded",
            Self::ModelUnavailable => "Model not found",
            Self::ContextTooLong => "Context too long",
            Self::Upstream => "Server error",
            Self::Other => "Request failed",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(kind: &str, code: Option<&str>) -> ErrorEnvelope {
        ErrorEnvelope {
            error: ErrorDetail {
                message: "boom".to_string(),
                kind: kind.to_string(),
                code: code.map(str::to_string),
            },
        }
    }

    #[test]
    fn test_parse_groq_error_body() {
        let parsed = ErrorEnvelope::parse(
            r#"{"error": {"message": "Invalid API Key", "type": "invalid_request_error", "code": "invalid_api_key"}}"#,
        );
        assert_eq!(parsed.error.message, "Invalid API Key");
        assert_eq!(parsed.error.kind, "invalid_request_error");
        assert_eq!(parsed.error.code.as_deref(), Some("invalid_api_key"));
    }

    #[test]
    fn test_parse_tolerates_html_and_empty_bodies() {
        assert_eq!(ErrorEnvelope::parse("<html>502</html>").error.message, "");
        assert_eq!(ErrorEnvelope::parse("").error.kind, "");
        assert_eq!(ErrorEnvelope::parse(r#"{"detail": "x"}"#).error.code, None);
    }

    #[test]
    fn test_classify_by_status() {
        let empty = ErrorEnvelope::default();
        assert_eq!(FailureKind::classify(401, &empty), FailureKind::Auth);
        assert_eq!(FailureKind::classify(403, &empty), FailureKind::Auth);
        assert_eq!(FailureKind::classify(429, &empty), FailureKind::RateLimited);
        assert_eq!(FailureKind::classify(404, &empty), FailureKind::ModelUnavailable);
        assert_eq!(FailureKind::classify(503, &empty), FailureKind::Upstream);
        assert_eq!(FailureKind::classify(418, &empty), FailureKind::Other);
        assert_eq!(FailureKind::classify(400, &empty), FailureKind::Other);
    }

    #[test]
    fn test_classify_by_body() {
        assert_eq!(
            FailureKind::classify(400, &envelope("invalid_request_error", Some("model_not_found"))),
            FailureKind::ModelUnavailable
        );
        assert_eq!(
            FailureKind::classify(400, &envelope("invalid_request_error", Some("model_decommissioned"))),
            FailureKind::ModelUnavailable
        );
        assert_eq!(
            FailureKind::classify(400, &envelope("context_length_exceeded", None)),
            FailureKind::ContextTooLong
        );
        assert_eq!(
            FailureKind::classify(413, &envelope("invalid_request_error", Some("context_length_exceeded"))),
            FailureKind::ContextTooLong
        );
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(FailureKind::RateLimited.is_retryable());
        assert!(FailureKind::Upstream.is_retryable());
        assert!(!FailureKind::Auth.is_retryable());
        assert!(!FailureKind::ContextTooLong.is_retryable());
    }

    #[test]
    fn test_into_error_variants() {
        let err = FailureKind::Auth.into_error("groq returned 401");
        assert!(matches!(err, Error::Config(ref m) if m == "Authentication failed: groq returned 401"));

        let err = FailureKind::Upstream.into_error("groq returned 503");
        assert!(matches!(err, Error::Inference(ref m) if m == "Server error: groq returned 503"));

        let err = FailureKind::Other.into_error("groq returned 418");
        assert!(matches!(err, Error::Inference(ref m) if m == "groq returned 418"));
    }
}
