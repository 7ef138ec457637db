//! API helpers for custom extensions.

use crate::core::http::ApiError;
use crate::services::api::ApiClient;
use extguard_api_models::{Extension, ExtensionId};

/// Fetch the custom list.
pub(crate) async fn load_custom(client: &ApiClient) -> Result<Vec<Extension>, ApiError> {
    client.fetch_custom().await
}

/// Create a custom extension from an already validated name.
pub(crate) async fn add_extension(
    client: &ApiClient,
    extension: &str,
) -> Result<Extension, ApiError> {
    client.add_custom(extension).await
}

/// Delete a custom extension.
pub(crate) async fn remove_extension(client: &ApiClient, id: ExtensionId) -> Result<(), ApiError> {
    client.delete_custom(id).await
}
