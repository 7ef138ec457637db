//! API helpers for fixed extensions.
//!
//! # Design
//! - Keep HTTP calls localized to the feature layer.
//! - Reuse the shared ApiClient for credentials, CSRF and error classification.

use crate::core::http::ApiError;
use crate::services::api::ApiClient;
use extguard_api_models::{Extension, ExtensionId};

/// Fetch the fixed list.
pub(crate) async fn load_fixed(client: &ApiClient) -> Result<Vec<Extension>, ApiError> {
    client.fetch_fixed().await
}

/// Set a fixed extension's block flag and return the server's view of it.
pub(crate) async fn set_blocked(
    client: &ApiClient,
    id: ExtensionId,
    blocked: bool,
) -> Result<Extension, ApiError> {
    client.set_fixed_blocked(id, blocked).await
}
