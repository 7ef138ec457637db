//! App-wide yewdux store slices.
//!
//! # Design
//! - Keep shared UI state in one store to avoid ad-hoc contexts.
//! - Slices expose pure transition functions; views only call `reduce_mut`.
//! - Refresh revisions live here so any view can publish and any view can subscribe.

use crate::core::auth::SessionState;
use crate::core::http::ApiError;
use crate::core::notify::{NoticeKind, NotificationSlot};
use crate::core::refresh::{ChangeEvent, RefreshBus};
use crate::features::checker::state::CheckerState;
use crate::features::custom::form::AddFormState;
use crate::features::custom::state::CustomListState;
use crate::features::fixed::state::FixedListState;
use crate::features::history::state::HistoryState;
use crate::i18n::TranslationBundle;
use yewdux::prelude::Dispatch;
use yewdux::store::Store;

/// Global application store for shared state.
#[derive(Clone, Debug, PartialEq, Eq, Store, Default)]
pub struct AppStore {
    /// Backend session as last observed.
    pub session: SessionState,
    /// The single notification slot.
    pub notice: NotificationSlot,
    /// Per-topic refresh revisions.
    pub refresh: RefreshBus,
    /// Fixed extension cache.
    pub fixed: FixedListState,
    /// Custom extension cache.
    pub custom: CustomListState,
    /// Add-extension form.
    pub add_form: AddFormState,
    /// History snapshot.
    pub history: HistoryState,
    /// File checker flow.
    pub checker: CheckerState,
}

/// Dispatch handle for the global store.
#[must_use]
pub fn app_dispatch() -> Dispatch<AppStore> {
    Dispatch::<AppStore>::new()
}

/// Show a notification in the global slot.
pub fn notify(message: impl Into<String>, kind: NoticeKind) {
    let message = message.into();
    app_dispatch().reduce_mut(move |store| {
        store.notice.show(message, kind);
    });
}

/// Publish a mutation so subscribed views refetch.
pub fn publish(event: ChangeEvent) {
    app_dispatch().reduce_mut(move |store| {
        store.refresh.publish(event);
    });
}

/// Apply the error taxonomy to a failed call.
///
/// 401/403 marks the session anonymous and prompts for login; everything else
/// surfaces the backend message or a localised fallback.
pub fn report_failure(store: &mut AppStore, err: &ApiError, bundle: &TranslationBundle) {
    if err.is_unauthorized() {
        store.session.expire();
        store.notice.show(
            bundle.text("auth.login_required", "Sign in to change the block list."),
            NoticeKind::Warning,
        );
        return;
    }
    store.notice.show(
        err.user_message(|key| bundle.lookup(key)),
        NoticeKind::Error,
    );
}

/// Refuse a mutation locally because nobody is signed in.
pub fn prompt_login(store: &mut AppStore, bundle: &TranslationBundle) {
    store.notice.show(
        bundle.text("auth.login_required", "Sign in to change the block list."),
        NoticeKind::Warning,
    );
}
