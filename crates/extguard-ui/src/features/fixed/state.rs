//! Fixed extension list cache and its transitions.
//!
//! # Design
//! - The list is a cache of server state; only confirmed responses change `blocked`.
//! - Pending ids are tracked for rendering; the toggle queue itself lives in
//!   [`crate::features::fixed::logic::ToggleCoordinator`].

use crate::core::auth::{MutationGate, gate_mutation};
use crate::core::http::ApiError;
use crate::core::lifecycle::LoadPhase;
use crate::core::notify::NoticeKind;
use crate::core::refresh::ChangeEvent;
use crate::core::store::{AppStore, prompt_login, report_failure};
use crate::features::fixed::logic::{ToggleCoordinator, ToggleStep};
use crate::i18n::TranslationBundle;
use extguard_api_models::{Extension, ExtensionId};
use std::collections::BTreeSet;

/// Cached fixed extensions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FixedListState {
    /// Fetch phase.
    pub phase: LoadPhase,
    /// Entries in backend order.
    pub entries: Vec<Extension>,
    /// Ids with a toggle request in flight.
    pub pending: BTreeSet<ExtensionId>,
}

/// Replace the cache after a successful fetch.
pub fn set_entries(state: &mut FixedListState, entries: Vec<Extension>) {
    state.entries = entries;
    state.phase = LoadPhase::Ready;
}

/// Record a failed fetch, keeping whatever was cached.
pub fn set_failed(state: &mut FixedListState, message: String) {
    state.phase = LoadPhase::Failed(message);
}

/// Apply a confirmed entry from the toggle endpoint.
///
/// Only the matching id changes. Returns whether an entry was updated.
pub fn apply_confirmed(state: &mut FixedListState, confirmed: &Extension) -> bool {
    state
        .entries
        .iter_mut()
        .find(|entry| entry.id == confirmed.id)
        .map(|entry| entry.absorb(confirmed))
        .is_some()
}

/// Mark or unmark an id as waiting on the backend.
pub fn set_pending(state: &mut FixedListState, id: ExtensionId, pending: bool) {
    if pending {
        state.pending.insert(id);
    } else {
        state.pending.remove(&id);
    }
}

/// Look up an entry by id.
#[must_use]
pub fn select_entry(state: &FixedListState, id: ExtensionId) -> Option<&Extension> {
    state.entries.iter().find(|entry| entry.id == id)
}

/// Number of currently blocking fixed entries.
#[must_use]
pub fn blocked_count(state: &FixedListState) -> usize {
    state.entries.iter().filter(|entry| entry.blocked).count()
}

/// Handle a click on a fixed chip.
///
/// Returns the target to send, or `None` when no request may go out: nobody
/// is signed in (a login prompt is shown instead), the id is unknown, or the
/// click was folded into a request already in flight.
pub fn begin_toggle(
    store: &mut AppStore,
    coordinator: &mut ToggleCoordinator,
    id: ExtensionId,
    bundle: &TranslationBundle,
) -> Option<bool> {
    if gate_mutation(&store.session) == MutationGate::LoginRequired {
        prompt_login(store, bundle);
        return None;
    }
    let displayed = select_entry(&store.fixed, id)?.blocked;
    match coordinator.request(id, displayed) {
        ToggleStep::Send(target) => {
            set_pending(&mut store.fixed, id, true);
            Some(target)
        }
        ToggleStep::Coalesced => None,
    }
}

/// Record a state the backend confirmed. Runs for every response, including
/// ones that arrive after the panel is gone.
pub fn record_confirmed_toggle(store: &mut AppStore, confirmed: &Extension) {
    apply_confirmed(&mut store.fixed, confirmed);
    store.refresh.publish(ChangeEvent::FixedToggled);
}

/// No follow-up is queued: clear the pending mark and announce the result.
pub fn settle_toggle(store: &mut AppStore, confirmed: &Extension, bundle: &TranslationBundle) {
    set_pending(&mut store.fixed, confirmed.id, false);
    let ext = confirmed.dotted();
    let message = if confirmed.blocked {
        bundle.format("fixed.blocked_now", "{ext} is now blocked.", &[("ext", &ext)])
    } else {
        bundle.format("fixed.allowed_now", "{ext} is now allowed.", &[("ext", &ext)])
    };
    store.notice.show(message, NoticeKind::Success);
}

/// A toggle request failed; the cached state is left as the server last said.
pub fn fail_toggle(store: &mut AppStore, id: ExtensionId, err: &ApiError, bundle: &TranslationBundle) {
    set_pending(&mut store.fixed, id, false);
    report_failure(store, err, bundle);
}
