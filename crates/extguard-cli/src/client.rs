//! Shared client utilities, error types, and cookie/CSRF plumbing for the CLI.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use extguard_api_models::csrf::{CSRF_HEADER, requires_csrf, token_from_cookies};
use extguard_api_models::{ApiEnvelope, ApiMessage, paths};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::cli::Cli;

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";
pub(crate) const SESSION_COOKIE: &str = "JSESSIONID";

/// CLI-level error type separating validation, authentication and operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    /// Local validation or a business rejection from the backend.
    Validation(String),
    /// The backend answered 401/403.
    Unauthorized(String),
    /// Transport, decoding or I/O failure.
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
            Self::Unauthorized(_) => 4,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) | Self::Unauthorized(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.display_message())
    }
}

impl std::error::Error for CliError {}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) client: Client,
    pub(crate) base_url: Url,
    pub(crate) jar: Arc<Jar>,
    pub(crate) csrf_token: Option<String>,
}

impl AppContext {
    pub(crate) fn from_cli(cli: &Cli, trace_id: &str) -> CliResult<Self> {
        Self::new(
            cli.api_url.clone(),
            cli.session.as_deref(),
            cli.csrf_token.clone(),
            Duration::from_secs(cli.timeout),
            trace_id,
        )
    }

    /// Build the HTTP client, seed the cookie jar with the session and tag
    /// every request with the trace id.
    pub(crate) fn new(
        base_url: Url,
        session: Option<&str>,
        csrf_token: Option<String>,
        timeout: Duration,
        trace_id: &str,
    ) -> CliResult<Self> {
        let mut default_headers = HeaderMap::new();
        let request_id = HeaderValue::from_str(trace_id).map_err(|_| {
            CliError::failure(anyhow!("trace identifier contains invalid characters"))
        })?;
        default_headers.insert(HEADER_REQUEST_ID, request_id);

        let jar = Arc::new(Jar::default());
        if let Some(session) = session.map(str::trim).filter(|s| !s.is_empty()) {
            jar.add_cookie_str(&format!("{SESSION_COOKIE}={session}; Path=/"), &base_url);
        }

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(default_headers)
            .cookie_provider(Arc::clone(&jar))
            .build()
            .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url,
            jar,
            csrf_token: csrf_token.filter(|token| !token.trim().is_empty()),
        })
    }

    /// Absolute URL for an API path (which may carry a query string).
    pub(crate) fn url(&self, path: &str) -> CliResult<Url> {
        paths::join(self.base_url.as_str(), path)
            .parse()
            .map_err(|err| CliError::failure(anyhow!("invalid request URL for {path}: {err}")))
    }

    /// Token to echo on a mutating request.
    ///
    /// An explicit token wins. Otherwise the jar is consulted, priming it with
    /// a GET when the backend has not issued the cookie yet.
    async fn csrf(&self, target: &Url) -> CliResult<Option<String>> {
        if let Some(token) = &self.csrf_token {
            return Ok(Some(token.clone()));
        }
        if let Some(token) = self.jar_token(target) {
            return Ok(Some(token));
        }
        let prime = self.url(paths::CURRENT_USER)?;
        debug!(url = %prime, "priming CSRF cookie");
        let response = self
            .client
            .get(prime)
            .send()
            .await
            .map_err(|err| CliError::failure(anyhow!("failed to prime CSRF cookie: {err}")))?;
        debug!(status = %response.status(), "CSRF priming response");
        let token = self.jar_token(target);
        if token.is_none() {
            warn!("backend did not issue a CSRF cookie; sending the request without one");
        }
        Ok(token)
    }

    fn jar_token(&self, target: &Url) -> Option<String> {
        let cookies = self.jar.cookies(target)?;
        token_from_cookies(cookies.to_str().ok()?)
    }

    /// Send a request and return the raw status and body.
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        form: Option<Form>,
    ) -> CliResult<(StatusCode, Vec<u8>)> {
        let url = self.url(path)?;
        let token = if requires_csrf(method.as_str()) {
            self.csrf(&url).await?
        } else {
            None
        };
        let mut request = self.client.request(method.clone(), url);
        if let Some(token) = token {
            request = request.header(CSRF_HEADER, token);
        }
        if let Some(form) = form {
            request = request.multipart(form);
        }

        debug!(%method, path, "sending request");
        let response = request.send().await.map_err(|err| {
            CliError::failure(anyhow!("request to {method} {path} failed: {err}"))
        })?;
        let status = response.status();
        let body = response.bytes().await.map_err(|err| {
            CliError::failure(anyhow!("failed to read response from {path}: {err}"))
        })?;
        debug!(%method, path, status = %status, "received response");
        Ok((status, body.to_vec()))
    }

    /// Send a request whose envelope must carry data.
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        form: Option<Form>,
    ) -> CliResult<T> {
        let (status, body) = self.send(method, path, form).await?;
        decode(status, &body)?
            .ok_or_else(|| CliError::failure(anyhow!("response from {path} carried no data")))
    }

    /// Send a request whose success carries no payload.
    pub(crate) async fn execute(&self, method: Method, path: &str) -> CliResult<()> {
        let (status, body) = self.send(method, path, None).await?;
        decode::<serde_json::Value>(status, &body).map(|_| ())
    }
}

/// Classify a response into data, a rejection, or an authentication failure.
pub(crate) fn decode<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> CliResult<Option<T>> {
    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        return Err(CliError::unauthorized(format!(
            "authentication required (status {}); sign in through the web UI and pass --session",
            status.as_u16()
        )));
    }
    if status.is_server_error() {
        let detail = ApiMessage::from_body(body).unwrap_or_else(|| "no details".to_string());
        return Err(CliError::failure(anyhow!(
            "server error (status {status}): {detail}"
        )));
    }
    if !status.is_success() {
        return Err(CliError::validation(ApiMessage::from_body(body).unwrap_or_else(
            || format!("request failed with status {status}"),
        )));
    }
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let envelope: ApiEnvelope<T> = serde_json::from_slice(body)
        .map_err(|err| CliError::failure(anyhow!("failed to decode response: {err}")))?;
    if !envelope.success {
        return Err(CliError::validation(
            envelope
                .message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| "the server rejected the request".to_string()),
        ));
    }
    Ok(envelope.data)
}

/// Parse the API URL provided to the CLI.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn exit_codes_follow_the_taxonomy() {
        assert_eq!(CliError::validation("bad").exit_code(), 2);
        assert_eq!(CliError::failure(anyhow!("boom")).exit_code(), 3);
        assert_eq!(CliError::unauthorized("who").exit_code(), 4);
    }

    #[test]
    fn decode_classifies_statuses() {
        let err = decode::<bool>(StatusCode::UNAUTHORIZED, b"").err();
        assert!(matches!(err, Some(CliError::Unauthorized(_))));
        let err = decode::<bool>(StatusCode::FORBIDDEN, b"{}").err();
        assert!(matches!(err, Some(CliError::Unauthorized(_))));

        let body = json!({"success": false, "message": "이미 등록된 확장자입니다"}).to_string();
        match decode::<bool>(StatusCode::BAD_REQUEST, body.as_bytes()) {
            Err(CliError::Validation(message)) => assert_eq!(message, "이미 등록된 확장자입니다"),
            other => panic!("unexpected {other:?}"),
        }

        match decode::<bool>(StatusCode::NOT_FOUND, b"") {
            Err(CliError::Validation(message)) => assert!(message.contains("404")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn server_errors_are_operational_failures() {
        for status in [StatusCode::INTERNAL_SERVER_ERROR, StatusCode::BAD_GATEWAY] {
            let err = decode::<bool>(status, b"<html>bad gateway</html>").err();
            match err {
                Some(err @ CliError::Failure(_)) => {
                    assert_eq!(err.exit_code(), 3);
                    assert!(err.display_message().contains(&status.as_u16().to_string()));
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        let body = json!({"success": false, "message": "database unavailable"}).to_string();
        let err = decode::<bool>(StatusCode::SERVICE_UNAVAILABLE, body.as_bytes()).err();
        assert!(matches!(err, Some(CliError::Failure(e)) if format!("{e}").contains("database unavailable")));
    }

    #[test]
    fn decode_unwraps_envelopes() {
        let body = json!({"success": true, "data": true}).to_string();
        assert_eq!(decode::<bool>(StatusCode::OK, body.as_bytes()).ok(), Some(Some(true)));
        assert_eq!(decode::<bool>(StatusCode::OK, b"  ").ok(), Some(None));

        let rejected = json!({"success": false}).to_string();
        assert!(matches!(
            decode::<bool>(StatusCode::OK, rejected.as_bytes()),
            Err(CliError::Validation(_))
        ));
        assert!(matches!(
            decode::<bool>(StatusCode::OK, b"<html>"),
            Err(CliError::Failure(_))
        ));
    }

    #[test]
    fn parse_url_rejects_garbage() {
        assert!(parse_url("http://localhost:8080/api").is_ok());
        assert!(parse_url("not a url").is_err());
    }
}
