//! REST endpoint paths, relative to the configured API base.

use crate::ExtensionId;

/// Default API base used when nothing is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api";

/// Fixed extensions collection.
pub const FIXED: &str = "/extensions/fixed";
/// Custom extensions collection.
pub const CUSTOM: &str = "/extensions/custom";
/// Every entry that currently blocks (fixed + custom).
pub const BLOCKED: &str = "/extensions/blocked";
/// Multipart upload check.
pub const FILE_CHECK: &str = "/files/check";
/// Current session user.
pub const CURRENT_USER: &str = "/user/me";
/// Session logout.
pub const LOGOUT: &str = "/auth/logout";
/// OAuth entrypoint, relative to the backend origin rather than the API base.
pub const OAUTH_LOGIN: &str = "/oauth2/authorization/google";

/// Multipart field name for uploaded files.
pub const FILE_FIELD: &str = "file";

/// Path toggling a fixed extension's block flag.
#[must_use]
pub fn fixed_block(id: ExtensionId, blocked: bool) -> String {
    format!("{FIXED}/{id}/block?isBlocked={blocked}")
}

/// Path adding a custom extension.
#[must_use]
pub fn custom_add(extension: &str) -> String {
    format!("{CUSTOM}?extension={}", urlencoding::encode(extension))
}

/// Path deleting a custom extension.
#[must_use]
pub fn custom_delete(id: ExtensionId) -> String {
    format!("{CUSTOM}/{id}")
}

/// Join an API base and a path without doubling or dropping slashes.
#[must_use]
pub fn join(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Origin (`scheme://host[:port]`) of an absolute base; empty for relative bases.
#[must_use]
pub fn origin(base: &str) -> &str {
    let Some(scheme_end) = base.find("://") else {
        return "";
    };
    let rest = &base[scheme_end + 3..];
    rest.find('/')
        .map_or(base, |slash| &base[..scheme_end + 3 + slash])
}

/// Browser URL that starts the OAuth login flow for the given API base.
#[must_use]
pub fn login_url(base: &str) -> String {
    format!("{}{OAUTH_LOGIN}", origin(base))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutation_paths_embed_parameters() {
        assert_eq!(fixed_block(7, true), "/extensions/fixed/7/block?isBlocked=true");
        assert_eq!(custom_add("zip"), "/extensions/custom?extension=zip");
        assert_eq!(custom_add("a b"), "/extensions/custom?extension=a%20b");
        assert_eq!(custom_delete(42), "/extensions/custom/42");
    }

    #[test]
    fn join_normalises_slashes() {
        assert_eq!(
            join("http://localhost:8080/api/", "/extensions/fixed"),
            "http://localhost:8080/api/extensions/fixed"
        );
        assert_eq!(join("/api", "user/me"), "/api/user/me");
    }

    #[test]
    fn login_url_uses_backend_origin() {
        assert_eq!(
            login_url("http://localhost:8080/api"),
            "http://localhost:8080/oauth2/authorization/google"
        );
        assert_eq!(
            login_url("https://blocklist.example"),
            "https://blocklist.example/oauth2/authorization/google"
        );
        assert_eq!(login_url("/api"), "/oauth2/authorization/google");
    }
}
