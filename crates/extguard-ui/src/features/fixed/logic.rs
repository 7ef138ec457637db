//! Per-entity toggle serialisation.
//!
//! # Design
//! - At most one request per fixed extension is in flight.
//! - Clicks during a flight only flip the entity's desired state.
//! - When the flight lands, a follow-up goes out only if the confirmed state
//!   differs from what the user last asked for.

use extguard_api_models::ExtensionId;
use std::collections::HashMap;

/// What the caller must do after a click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleStep {
    /// Send a request setting `blocked` to this value.
    Send(bool),
    /// A request is already in flight; the click was folded into it.
    Coalesced,
}

/// Tracks in-flight toggles and the desired end state per entity.
#[derive(Debug, Default)]
pub struct ToggleCoordinator {
    desired: HashMap<ExtensionId, bool>,
}

impl ToggleCoordinator {
    /// Register a click on an entity currently displayed as `displayed_blocked`.
    pub fn request(&mut self, id: ExtensionId, displayed_blocked: bool) -> ToggleStep {
        if let Some(desired) = self.desired.get_mut(&id) {
            *desired = !*desired;
            return ToggleStep::Coalesced;
        }
        let target = !displayed_blocked;
        self.desired.insert(id, target);
        ToggleStep::Send(target)
    }

    /// Record a confirmed state. Returns the follow-up target, if one is needed.
    pub fn complete(&mut self, id: ExtensionId, confirmed_blocked: bool) -> Option<bool> {
        match self.desired.get(&id).copied() {
            Some(desired) if desired != confirmed_blocked => Some(desired),
            _ => {
                self.desired.remove(&id);
                None
            }
        }
    }

    /// Forget an entity after a failed request.
    pub fn fail(&mut self, id: ExtensionId) {
        self.desired.remove(&id);
    }

    /// Whether a request for `id` is in flight.
    #[must_use]
    pub fn is_pending(&self, id: ExtensionId) -> bool {
        self.desired.contains_key(&id)
    }

    /// Desired end state of an in-flight entity.
    #[must_use]
    pub fn desired(&self, id: ExtensionId) -> Option<bool> {
        self.desired.get(&id).copied()
    }
}
