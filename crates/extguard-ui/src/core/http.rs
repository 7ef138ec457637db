//! HTTP failure taxonomy and envelope decoding.
//!
//! # Design
//! - Classification is a pure function of status + body so it runs natively in tests.
//! - Backend messages are preserved verbatim; the UI localises only the generic fallbacks.
//! - A 2xx envelope with `success = false` is a rejection, never a success.

use extguard_api_models::{ApiEnvelope, ApiMessage};
use serde::de::DeserializeOwned;
use std::fmt;

/// Coarse failure category driving how the UI reacts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 401/403: the session is missing or lacks permission.
    Unauthorized,
    /// The backend answered but refused the operation.
    Rejected,
    /// The request never produced a response.
    Transport,
    /// The response could not be decoded.
    Decode,
}

impl ApiErrorKind {
    /// Translation key for the generic message of this category.
    #[must_use]
    pub const fn fallback_key(self) -> &'static str {
        match self {
            Self::Unauthorized => "auth.login_required",
            Self::Rejected => "errors.generic",
            Self::Transport => "errors.network",
            Self::Decode => "errors.decode",
        }
    }

    const fn fallback_text(self) -> &'static str {
        match self {
            Self::Unauthorized => "Sign in to continue.",
            Self::Rejected => "Something went wrong. Please try again.",
            Self::Transport => "Network error. Check your connection.",
            Self::Decode => "Unexpected response from the server.",
        }
    }
}

/// Failure of a single API call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiError {
    /// Failure category.
    pub kind: ApiErrorKind,
    /// HTTP status, when a response arrived.
    pub status: Option<u16>,
    /// Backend-provided message, when there was one.
    pub message: Option<String>,
}

impl ApiError {
    /// Transport-level failure (fetch rejected, CORS, offline).
    #[must_use]
    pub fn transport(detail: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Transport,
            status: None,
            message: Some(detail.into()).filter(|text| !text.trim().is_empty()),
        }
    }

    /// Body could not be decoded.
    #[must_use]
    pub const fn decode(status: Option<u16>) -> Self {
        Self {
            kind: ApiErrorKind::Decode,
            status,
            message: None,
        }
    }

    /// Whether the caller must (re-)authenticate.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.kind, ApiErrorKind::Unauthorized)
    }

    /// Message suitable for a user-facing notification.
    ///
    /// Transport and decode details are technical, so only rejections surface
    /// the raw backend text; everything else uses the localised fallback.
    #[must_use]
    pub fn user_message(&self, localise: impl Fn(&str) -> Option<String>) -> String {
        match (self.kind, self.message.as_deref()) {
            (ApiErrorKind::Rejected | ApiErrorKind::Unauthorized, Some(message)) => {
                message.to_string()
            }
            (kind, _) => {
                localise(kind.fallback_key()).unwrap_or_else(|| kind.fallback_text().to_string())
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(
            self.message
                .as_deref()
                .unwrap_or_else(|| self.kind.fallback_text()),
        )
    }
}

impl std::error::Error for ApiError {}

const fn is_auth_status(status: u16) -> bool {
    matches!(status, 401 | 403)
}

/// Decode an `{success, message, data}` envelope according to the error taxonomy.
///
/// Returns the (possibly absent) payload of a successful envelope.
///
/// # Errors
/// Returns [`ApiErrorKind::Unauthorized`] for 401/403, [`ApiErrorKind::Rejected`]
/// for other non-2xx statuses and `success = false` envelopes, and
/// [`ApiErrorKind::Decode`] when a 2xx body is not an envelope.
pub fn decode_envelope<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<Option<T>, ApiError> {
    if is_auth_status(status) {
        return Err(ApiError {
            kind: ApiErrorKind::Unauthorized,
            status: Some(status),
            message: ApiMessage::from_body(body),
        });
    }
    if !(200..300).contains(&status) {
        return Err(ApiError {
            kind: ApiErrorKind::Rejected,
            status: Some(status),
            message: ApiMessage::from_body(body),
        });
    }
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let envelope: ApiEnvelope<T> =
        serde_json::from_slice(body).map_err(|_| ApiError::decode(Some(status)))?;
    if !envelope.success {
        return Err(ApiError {
            kind: ApiErrorKind::Rejected,
            status: Some(status),
            message: envelope
                .message
                .map(|message| message.trim().to_string())
                .filter(|message| !message.is_empty()),
        });
    }
    Ok(envelope.data)
}

/// Require a payload from a decoded envelope.
///
/// # Errors
/// Returns [`ApiErrorKind::Decode`] when the envelope carried no data.
pub fn require_data<T>(status: u16, data: Option<T>) -> Result<T, ApiError> {
    data.ok_or_else(|| ApiError::decode(Some(status)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use extguard_api_models::Extension;

    #[test]
    fn unauthorized_statuses_classify_first() {
        for status in [401, 403] {
            let err = decode_envelope::<bool>(status, br#"{"success":false,"message":"denied"}"#)
                .expect_err("auth failure");
            assert!(err.is_unauthorized());
            assert_eq!(err.status, Some(status));
            assert_eq!(err.message.as_deref(), Some("denied"));
        }
    }

    #[test]
    fn non_success_status_keeps_backend_message() {
        let err = decode_envelope::<Extension>(
            400,
            r#"{"success":false,"message":"이미 존재하는 확장자입니다","data":null}"#.as_bytes(),
        )
        .expect_err("rejected");
        assert_eq!(err.kind, ApiErrorKind::Rejected);
        assert_eq!(err.to_string(), "이미 존재하는 확장자입니다");
    }

    #[test]
    fn html_error_page_falls_back_to_generic() {
        let err = decode_envelope::<bool>(502, b"<html>bad gateway</html>").expect_err("rejected");
        assert_eq!(err.kind, ApiErrorKind::Rejected);
        assert!(err.message.is_none());
        assert_eq!(err.user_message(|_| None), "Something went wrong. Please try again.");
        assert_eq!(
            err.user_message(|key| Some(format!("[{key}]"))),
            "[errors.generic]"
        );
    }

    #[test]
    fn success_false_on_ok_status_is_rejection() {
        let err = decode_envelope::<bool>(200, br#"{"success":false,"message":"limit reached"}"#)
            .expect_err("rejected");
        assert_eq!(err.kind, ApiErrorKind::Rejected);
        assert_eq!(err.message.as_deref(), Some("limit reached"));
    }

    #[test]
    fn successful_envelope_yields_payload() {
        let data = decode_envelope::<bool>(200, br#"{"success":true,"data":true}"#);
        assert_eq!(data, Ok(Some(true)));
        let void = decode_envelope::<bool>(204, b"");
        assert_eq!(void, Ok(None));
        assert_eq!(require_data(200, Some(3)), Ok(3));
        assert_eq!(
            require_data::<u8>(200, None).map_err(|err| err.kind),
            Err(ApiErrorKind::Decode)
        );
    }

    #[test]
    fn garbage_success_body_is_decode_error() {
        let err = decode_envelope::<bool>(200, b"not json").expect_err("decode");
        assert_eq!(err.kind, ApiErrorKind::Decode);
        assert_eq!(err.user_message(|_| None), "Unexpected response from the server.");
    }

    #[test]
    fn transport_detail_is_not_shown_to_users() {
        let err = ApiError::transport("TypeError: Failed to fetch");
        assert_eq!(err.kind, ApiErrorKind::Transport);
        assert_eq!(err.user_message(|_| None), "Network error. Check your connection.");
    }
}
