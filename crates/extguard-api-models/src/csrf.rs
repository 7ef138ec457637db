//! CSRF token plumbing shared by the browser and CLI clients.
//!
//! The backend issues an `XSRF-TOKEN` cookie and expects it echoed in the
//! `X-XSRF-TOKEN` header on state-changing requests.

/// Cookie the backend stores the token in.
pub const CSRF_COOKIE: &str = "XSRF-TOKEN";

/// Header the token must be echoed in.
pub const CSRF_HEADER: &str = "X-XSRF-TOKEN";

/// Whether a request with this HTTP method must carry the CSRF header.
#[must_use]
pub fn requires_csrf(method: &str) -> bool {
    matches!(
        method.to_ascii_uppercase().as_str(),
        "POST" | "PUT" | "PATCH" | "DELETE"
    )
}

/// Pull the CSRF token out of a `Cookie` header / `document.cookie` string.
///
/// Values are percent-decoded; an empty value counts as absent.
#[must_use]
pub fn token_from_cookies(cookies: &str) -> Option<String> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| name.trim() == CSRF_COOKIE)
        .map(|(_, value)| {
            let value = value.trim().trim_matches('"');
            urlencoding::decode(value).map_or_else(|_| value.to_string(), |v| v.into_owned())
        })
        .filter(|value| !value.is_empty())
}
