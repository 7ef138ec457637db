//! View lifetime guards and load phases.
//!
//! # Design
//! - Requests are never cancelled; late responses are dropped instead.
//! - A [`ViewScope`] is shared between a mounted view and its in-flight futures:
//!   it closes on unmount and hands out load tickets so only the newest fetch
//!   may write its result.

use std::cell::Cell;
use std::rc::Rc;

/// Proof that a fetch was the most recent one started by its view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug)]
struct ScopeInner {
    live: Cell<bool>,
    generation: Cell<u64>,
}

/// Shared handle tracking whether a view is still mounted.
#[derive(Clone, Debug)]
pub struct ViewScope {
    inner: Rc<ScopeInner>,
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for ViewScope {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl ViewScope {
    /// Open a scope for a freshly mounted view.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ScopeInner {
                live: Cell::new(true),
                generation: Cell::new(0),
            }),
        }
    }

    /// Whether the owning view is still mounted.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.inner.live.get()
    }

    /// Mark the view unmounted. Later responses are ignored.
    pub fn close(&self) {
        self.inner.live.set(false);
    }

    /// Start a fetch, superseding every earlier ticket.
    #[must_use]
    pub fn begin_load(&self) -> LoadTicket {
        let next = self.inner.generation.get().wrapping_add(1);
        self.inner.generation.set(next);
        LoadTicket(next)
    }

    /// Whether a fetch result may still be applied.
    #[must_use]
    pub fn accepts(&self, ticket: LoadTicket) -> bool {
        self.is_live() && self.inner.generation.get() == ticket.0
    }
}

/// Loading state of a cached list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadPhase {
    /// First fetch in progress.
    #[default]
    Loading,
    /// Cache holds server data.
    Ready,
    /// The last fetch failed; the cache keeps the previous data, if any.
    Failed(String),
}

impl LoadPhase {
    /// Whether a spinner should replace the content.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_scope_rejects_everything() {
        let scope = ViewScope::new();
        let ticket = scope.begin_load();
        let shared = scope.clone();
        assert!(shared.accepts(ticket));
        scope.close();
        assert!(!shared.is_live());
        assert!(!shared.accepts(ticket));
    }

    #[test]
    fn newer_ticket_supersedes_older() {
        let scope = ViewScope::new();
        let older = scope.begin_load();
        let newer = scope.begin_load();
        assert!(!scope.accepts(older));
        assert!(scope.accepts(newer));
    }

    #[test]
    fn scopes_compare_by_identity() {
        let scope = ViewScope::new();
        assert_eq!(scope, scope.clone());
        assert_ne!(scope, ViewScope::new());
    }
}
