//! Shared API client context.
//!
//! # Design
//! - Create exactly one API client per app boot.
//! - Compare contexts by pointer so consumers only re-render when the client is replaced.

use crate::services::api::ApiClient;
use std::rc::Rc;

/// API client handed to feature views.
#[derive(Clone)]
pub(crate) struct ApiCtx {
    /// Singleton API client instance.
    pub(crate) client: Rc<ApiClient>,
}

impl ApiCtx {
    /// Create a new context for the configured base URL.
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Rc::new(ApiClient::new(base_url)),
        }
    }
}

impl PartialEq for ApiCtx {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.client, &other.client)
    }
}
