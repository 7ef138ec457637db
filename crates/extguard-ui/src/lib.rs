#![forbid(unsafe_code)]
#![deny(
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(clippy::all, clippy::pedantic, clippy::cargo, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]
//! Extguard web UI.
//!
//! Yew front-end for the file-extension block list: fixed toggles, custom
//! extensions, change history and a one-off upload check. DOM-free state lives
//! in `core` and `features` so it is testable on the host; rendering and
//! transport are compiled for wasm32 only.

pub mod core;
pub mod features;
pub mod i18n;

#[cfg(target_arch = "wasm32")]
pub mod services;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod components;

#[cfg(target_arch = "wasm32")]
pub use app::run_app;

#[cfg(test)]
mod tests {
    use crate::core::store::AppStore;
    use crate::i18n::{LocaleCode, TranslationBundle};

    #[test]
    fn translation_fallbacks_work() {
        let bundle = TranslationBundle::new(LocaleCode::Ko);
        assert_eq!(bundle.text("nav.missing_key", "Default"), "Default");
        assert_ne!(
            bundle.text("nav.manage", "unused"),
            TranslationBundle::new(LocaleCode::En).text("nav.manage", "unused")
        );
    }

    #[test]
    fn fresh_store_starts_checking_with_empty_caches() {
        let store = AppStore::default();
        assert!(!store.session.is_authenticated());
        assert!(store.fixed.entries.is_empty());
        assert!(store.custom.entries.is_empty());
        assert!(store.notice.current().is_none());
    }
}
