//! Custom extension list cache and delete confirmation.
//!
//! # Design
//! - The displayed count is always `entries.len()`; nothing is stored twice.
//! - Exactly one delete may await confirmation; a second request is refused.
//! - A confirmed delete removes the entry locally without a refetch.

use crate::core::http::ApiError;
use crate::core::lifecycle::LoadPhase;
use crate::core::notify::NoticeKind;
use crate::core::refresh::ChangeEvent;
use crate::core::store::{AppStore, report_failure};
use crate::i18n::TranslationBundle;
use extguard_api_models::{Extension, ExtensionId, MAX_CUSTOM_EXTENSIONS};

/// Cached custom extensions plus the pending delete, if any.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomListState {
    /// Fetch phase.
    pub phase: LoadPhase,
    /// Entries in backend order.
    pub entries: Vec<Extension>,
    /// Delete awaiting confirmation or completion.
    pub pending_delete: Option<PendingDelete>,
}

/// A delete the user has started.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingDelete {
    /// Target id.
    pub id: ExtensionId,
    /// Target name for the dialog.
    pub extension: String,
    /// Whether the request has been sent.
    pub in_flight: bool,
}

/// Replace the cache after a successful fetch.
pub fn set_entries(state: &mut CustomListState, entries: Vec<Extension>) {
    state.entries = entries;
    state.phase = LoadPhase::Ready;
}

/// Record a failed fetch, keeping whatever was cached.
pub fn set_failed(state: &mut CustomListState, message: String) {
    state.phase = LoadPhase::Failed(message);
}

/// Ask for confirmation before deleting `id`.
///
/// Refused (returns `false`) when another delete is pending or the id is unknown.
pub fn request_delete(state: &mut CustomListState, id: ExtensionId) -> bool {
    if state.pending_delete.is_some() {
        return false;
    }
    let Some(entry) = state.entries.iter().find(|entry| entry.id == id) else {
        return false;
    };
    state.pending_delete = Some(PendingDelete {
        id,
        extension: entry.extension.clone(),
        in_flight: false,
    });
    true
}

/// Abandon the pending delete. An in-flight delete cannot be cancelled.
pub fn cancel_delete(state: &mut CustomListState) {
    if state
        .pending_delete
        .as_ref()
        .is_some_and(|pending| !pending.in_flight)
    {
        state.pending_delete = None;
    }
}

/// Confirm the pending delete. Returns the id to send, if there is one to send.
pub fn confirm_delete(state: &mut CustomListState) -> Option<ExtensionId> {
    let pending = state.pending_delete.as_mut()?;
    if pending.in_flight {
        return None;
    }
    pending.in_flight = true;
    Some(pending.id)
}

/// The backend deleted `id`: drop it from the cache and clear the dialog.
pub fn finish_delete(state: &mut CustomListState, id: ExtensionId) -> Option<Extension> {
    if state.pending_delete.as_ref().is_some_and(|p| p.id == id) {
        state.pending_delete = None;
    }
    let index = state.entries.iter().position(|entry| entry.id == id)?;
    Some(state.entries.remove(index))
}

/// The delete failed: the cache stays as it was.
pub fn fail_delete(state: &mut CustomListState, id: ExtensionId) {
    if state.pending_delete.as_ref().is_some_and(|p| p.id == id) {
        state.pending_delete = None;
    }
}

/// The backend created `created`: clear the form, show it in the list right
/// away and invalidate the list and history so both refetch.
pub fn record_created(store: &mut AppStore, created: Extension, bundle: &TranslationBundle) {
    store.add_form.succeed();
    let message = bundle.format("custom.added", "{ext} added.", &[("ext", &created.dotted())]);
    if !store.custom.entries.iter().any(|entry| entry.id == created.id) {
        store.custom.entries.push(created);
    }
    store.notice.show(message, NoticeKind::Success);
    store.refresh.publish(ChangeEvent::CustomAdded);
}

/// The create request failed; the input stays for correction.
pub fn record_add_failed(store: &mut AppStore, err: &ApiError, bundle: &TranslationBundle) {
    store.add_form.fail();
    report_failure(store, err, bundle);
}

/// Count as `(current, cap)` for the `n / 200` indicator.
#[must_use]
pub fn select_count(state: &CustomListState) -> (usize, usize) {
    (state.entries.len(), MAX_CUSTOM_EXTENSIONS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: ExtensionId, name: &str) -> Extension {
        Extension {
            id,
            extension: name.to_string(),
            fixed: false,
            blocked: true,
            created_by_name: None,
            updated_by_name: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn loaded() -> CustomListState {
        let mut state = CustomListState::default();
        set_entries(&mut state, vec![entry(1, "sh"), entry(2, "zip"), entry(3, "iso")]);
        state
    }

    #[test]
    fn only_one_delete_may_be_pending() {
        let mut state = loaded();
        assert!(request_delete(&mut state, 2));
        assert!(!request_delete(&mut state, 3));
        assert_eq!(state.pending_delete.as_ref().map(|p| p.id), Some(2));
        assert!(!request_delete(&mut CustomListState::default(), 1));
    }

    #[test]
    fn cancel_leaves_everything_unchanged() {
        let mut state = loaded();
        let before = state.entries.clone();
        assert!(request_delete(&mut state, 1));
        cancel_delete(&mut state);
        assert!(state.pending_delete.is_none());
        assert_eq!(state.entries, before);
    }

    #[test]
    fn confirmed_delete_removes_entry_and_count_follows() {
        let mut state = loaded();
        assert!(request_delete(&mut state, 2));
        assert_eq!(confirm_delete(&mut state), Some(2));
        assert_eq!(confirm_delete(&mut state), None);
        cancel_delete(&mut state);
        assert!(state.pending_delete.is_some(), "in-flight delete stays");
        let removed = finish_delete(&mut state, 2).expect("removed");
        assert_eq!(removed.extension, "zip");
        assert!(state.pending_delete.is_none());
        assert_eq!(select_count(&state), (2, MAX_CUSTOM_EXTENSIONS));
        assert!(state.entries.iter().all(|e| e.id != 2));
    }

    #[test]
    fn adding_clears_input_grows_list_and_tops_history() {
        use crate::core::http::ApiErrorKind;
        use crate::core::refresh::Topic;
        use crate::i18n::LocaleCode;
        use chrono::NaiveDate;
        use extguard_api_models::history::build_history;

        let bundle = TranslationBundle::new(LocaleCode::En);
        let stamp = |hour| {
            NaiveDate::from_ymd_opt(2024, 6, 1).and_then(|date| date.and_hms_opt(hour, 0, 0))
        };
        let mut store = AppStore::default();
        set_entries(&mut store.custom, vec![Extension { updated_at: stamp(9), ..entry(1, "sh") }]);
        let fixed = vec![Extension {
            fixed: true,
            updated_at: stamp(10),
            ..entry(50, "exe")
        }];

        store.add_form.edit("zip".to_string());
        assert_eq!(store.add_form.begin_submit(), Some("zip".to_string()));
        let created = Extension {
            updated_at: stamp(11),
            ..entry(7, "zip")
        };
        record_created(&mut store, created.clone(), &bundle);

        assert!(store.add_form.value.is_empty());
        assert!(!store.add_form.submitting);
        assert_eq!(select_count(&store.custom).0, 2);
        assert_eq!(store.refresh.revision(Topic::CustomList), 1);
        assert_eq!(store.refresh.revision(Topic::History), 1);
        assert_eq!(
            store.notice.current().map(|notice| notice.kind),
            Some(NoticeKind::Success)
        );

        // The refetch triggered by the bump returns the new entry too.
        let refetched = store.custom.entries.clone();
        set_entries(&mut store.custom, refetched);
        let history = build_history(fixed, store.custom.entries.clone());
        assert_eq!(history.first(), Some(&created));

        record_created(&mut store, created, &bundle);
        assert_eq!(select_count(&store.custom).0, 2, "duplicate ids are not appended");

        store.add_form.edit("iso".to_string());
        assert!(store.add_form.begin_submit().is_some());
        let err = ApiError {
            kind: ApiErrorKind::Rejected,
            status: Some(400),
            message: Some("already registered".to_string()),
        };
        record_add_failed(&mut store, &err, &bundle);
        assert_eq!(store.add_form.value, "iso");
        assert!(!store.add_form.submitting);
    }

    #[test]
    fn failed_delete_keeps_cache() {
        let mut state = loaded();
        assert!(request_delete(&mut state, 3));
        assert_eq!(confirm_delete(&mut state), Some(3));
        fail_delete(&mut state, 3);
        assert!(state.pending_delete.is_none());
        assert_eq!(state.entries.len(), 3);
    }
}
