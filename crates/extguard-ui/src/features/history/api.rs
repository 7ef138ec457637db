//! API helpers for the history view.

use crate::core::http::ApiError;
use crate::services::api::ApiClient;
use extguard_api_models::Extension;
use futures_util::future::try_join;

/// Fetch the fixed and custom lists concurrently.
///
/// Fails as soon as either request fails.
pub(crate) async fn load_lists(
    client: &ApiClient,
) -> Result<(Vec<Extension>, Vec<Extension>), ApiError> {
    try_join(client.fetch_fixed(), client.fetch_custom()).await
}
