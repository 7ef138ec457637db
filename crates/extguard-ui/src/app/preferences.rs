//! Persistence and environment helpers for the app shell.

use crate::i18n::{DEFAULT_LOCALE, LocaleCode};
use extguard_api_models::history::HistoryFilter;
use extguard_api_models::paths::DEFAULT_API_BASE;
use gloo::console;
use gloo::storage::{LocalStorage, Storage};
use gloo::utils::{document, window};
use serde::Serialize;
use wasm_bindgen::JsCast;
use web_sys::HtmlMetaElement;

pub(crate) const LOCALE_KEY: &str = "extguard.locale";
pub(crate) const HISTORY_FILTER_KEY: &str = "extguard.history.filter";
const API_BASE_META: &str = "meta[name=\"extguard-api-base\"]";

pub(crate) fn load_locale() -> LocaleCode {
    if let Ok(value) = LocalStorage::get::<String>(LOCALE_KEY) {
        if let Some(locale) = LocaleCode::from_lang_tag(&value) {
            return locale;
        }
    }
    if let Some(nav) = window().navigator().language() {
        if let Some(locale) = LocaleCode::from_lang_tag(&nav) {
            return locale;
        }
    }
    DEFAULT_LOCALE
}

pub(crate) fn persist_locale(locale: LocaleCode) {
    set_storage(LOCALE_KEY, locale.code());
}

pub(crate) fn load_history_filter() -> HistoryFilter {
    LocalStorage::get::<String>(HISTORY_FILTER_KEY)
        .map(|value| HistoryFilter::from_value(&value))
        .unwrap_or_default()
}

pub(crate) fn persist_history_filter(filter: HistoryFilter) {
    set_storage(HISTORY_FILTER_KEY, filter.as_str());
}

/// API base: `<meta name="extguard-api-base">`, then the build-time
/// `EXTGUARD_API_URL`, then the local default.
pub(crate) fn api_base_url() -> String {
    let from_meta = document()
        .query_selector(API_BASE_META)
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<HtmlMetaElement>().ok())
        .map(|meta| meta.content())
        .filter(|content| !content.trim().is_empty());
    from_meta
        .or_else(|| option_env!("EXTGUARD_API_URL").map(ToString::to_string))
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Send the browser to the OAuth entrypoint.
pub(crate) fn redirect_to(url: &str) {
    if let Err(err) = window().location().set_href(url) {
        console::error!("redirect failed", url.to_string(), format!("{err:?}"));
    }
}

fn set_storage<T: Serialize>(key: &'static str, value: T) {
    if let Err(err) = LocalStorage::set(key, value) {
        log_storage_error("set", key, &err.to_string());
    }
}

fn log_storage_error(operation: &'static str, key: &'static str, detail: &str) {
    console::error!("storage operation failed", operation, key, detail);
}
