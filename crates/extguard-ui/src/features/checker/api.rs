//! API helper for the upload check.

use crate::core::http::ApiError;
use crate::services::api::ApiClient;
use web_sys::File;

/// Ask the backend whether `file` would be blocked.
pub(crate) async fn is_blocked(client: &ApiClient, file: &File) -> Result<bool, ApiError> {
    client.check_file(file).await
}
