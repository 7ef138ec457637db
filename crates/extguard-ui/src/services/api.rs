//! HTTP client helpers (REST).
//!
//! # Design
//! - One method per backend operation; decoding goes through [`crate::core::http`].
//! - Every request carries browser credentials; mutating verbs echo the CSRF cookie.
//! - The client never redirects: 401/403 come back as unauthorized errors.

use crate::core::http::{ApiError, decode_envelope, require_data};
use extguard_api_models::csrf::{CSRF_HEADER, requires_csrf, token_from_cookies};
use extguard_api_models::{Extension, ExtensionId, UserProfile, paths};
use gloo::console;
use gloo_net::http::Request;
use serde::de::DeserializeOwned;
use serde_json::Value;
use wasm_bindgen::JsCast;
use web_sys::{File, FormData, HtmlDocument, RequestCredentials};

#[derive(Clone, Copy, Debug)]
enum Verb {
    Get,
    Post,
    Patch,
    Delete,
}

impl Verb {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    fn request(self, url: &str) -> Request {
        match self {
            Self::Get => Request::get(url),
            Self::Post => Request::post(url),
            Self::Patch => Request::patch(url),
            Self::Delete => Request::delete(url),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Browser URL that starts the OAuth flow.
    pub(crate) fn login_url(&self) -> String {
        paths::login_url(&self.base_url)
    }

    fn build(&self, verb: Verb, path: &str) -> Request {
        let mut req = verb
            .request(&paths::join(&self.base_url, path))
            .credentials(RequestCredentials::Include);
        if requires_csrf(verb.as_str()) {
            if let Some(token) = csrf_token() {
                req = req.header(CSRF_HEADER, &token);
            }
        }
        req
    }

    async fn call<T: DeserializeOwned>(
        &self,
        verb: Verb,
        path: &str,
        req: Request,
    ) -> Result<(u16, Option<T>), ApiError> {
        let response = req.send().await.map_err(|err| {
            let detail = err.to_string();
            console::warn!("request failed", verb.as_str(), path.to_string(), detail.clone());
            ApiError::transport(detail)
        })?;
        let status = response.status();
        let body = response
            .binary()
            .await
            .map_err(|err| ApiError::transport(err.to_string()))?;
        let data = decode_envelope(status, &body)?;
        Ok((status, data))
    }

    async fn expect<T: DeserializeOwned>(&self, verb: Verb, path: &str) -> Result<T, ApiError> {
        let (status, data) = self.call(verb, path, self.build(verb, path)).await?;
        require_data(status, data)
    }

    async fn expect_void(&self, verb: Verb, path: &str) -> Result<(), ApiError> {
        self.call::<Value>(verb, path, self.build(verb, path))
            .await
            .map(|_| ())
    }

    pub(crate) async fn fetch_fixed(&self) -> Result<Vec<Extension>, ApiError> {
        self.expect(Verb::Get, paths::FIXED).await
    }

    pub(crate) async fn set_fixed_blocked(
        &self,
        id: ExtensionId,
        blocked: bool,
    ) -> Result<Extension, ApiError> {
        self.expect(Verb::Patch, &paths::fixed_block(id, blocked))
            .await
    }

    pub(crate) async fn fetch_custom(&self) -> Result<Vec<Extension>, ApiError> {
        self.expect(Verb::Get, paths::CUSTOM).await
    }

    pub(crate) async fn add_custom(&self, extension: &str) -> Result<Extension, ApiError> {
        self.expect(Verb::Post, &paths::custom_add(extension)).await
    }

    pub(crate) async fn delete_custom(&self, id: ExtensionId) -> Result<(), ApiError> {
        self.expect_void(Verb::Delete, &paths::custom_delete(id))
            .await
    }

    pub(crate) async fn check_file(&self, file: &File) -> Result<bool, ApiError> {
        let form = FormData::new().map_err(|_| ApiError::transport("form-data failed"))?;
        form.append_with_blob_and_filename(paths::FILE_FIELD, file, &file.name())
            .map_err(|_| ApiError::transport("attach file failed"))?;
        let req = self.build(Verb::Post, paths::FILE_CHECK).body(form);
        let (status, data) = self.call(Verb::Post, paths::FILE_CHECK, req).await?;
        require_data(status, data)
    }

    pub(crate) async fn current_user(&self) -> Result<Option<UserProfile>, ApiError> {
        self.call(Verb::Get, paths::CURRENT_USER, self.build(Verb::Get, paths::CURRENT_USER))
            .await
            .map(|(_, data)| data)
    }

    pub(crate) async fn logout(&self) -> Result<(), ApiError> {
        self.expect_void(Verb::Post, paths::LOGOUT).await
    }
}

fn csrf_token() -> Option<String> {
    let document = gloo::utils::document().dyn_into::<HtmlDocument>().ok()?;
    token_from_cookies(&document.cookie().ok()?)
}
