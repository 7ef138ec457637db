//! Cross-view refresh bus.
//!
//! # Design
//! - Mutations publish a [`ChangeEvent`]; a fixed routing table maps it to topics.
//! - Each topic carries a monotonically increasing revision held in the store.
//! - Views select their topic's revision and refetch whenever it moves.

/// Something a view listens to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Fixed extension list.
    FixedList,
    /// Custom extension list.
    CustomList,
    /// Aggregated history.
    History,
}

/// A mutation observable by other views.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeEvent {
    /// A fixed extension's block flag was confirmed by the backend.
    FixedToggled,
    /// A custom extension was created.
    CustomAdded,
    /// A custom extension was deleted.
    CustomDeleted,
    /// The user signed in or out.
    SessionChanged,
}

impl ChangeEvent {
    /// Topics invalidated by this event.
    #[must_use]
    pub const fn topics(self) -> &'static [Topic] {
        match self {
            Self::FixedToggled | Self::CustomDeleted => &[Topic::History],
            Self::CustomAdded => &[Topic::CustomList, Topic::History],
            Self::SessionChanged => &[Topic::FixedList, Topic::CustomList, Topic::History],
        }
    }
}

/// Per-topic revisions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefreshBus {
    fixed: u64,
    custom: u64,
    history: u64,
}

impl RefreshBus {
    /// Bump every topic routed from `event`.
    pub fn publish(&mut self, event: ChangeEvent) {
        for topic in event.topics() {
            let slot = self.slot_mut(*topic);
            *slot = slot.wrapping_add(1);
        }
    }

    /// Current revision of a topic.
    #[must_use]
    pub const fn revision(&self, topic: Topic) -> u64 {
        match topic {
            Topic::FixedList => self.fixed,
            Topic::CustomList => self.custom,
            Topic::History => self.history,
        }
    }

    fn slot_mut(&mut self, topic: Topic) -> &mut u64 {
        match topic {
            Topic::FixedList => &mut self.fixed,
            Topic::CustomList => &mut self.custom,
            Topic::History => &mut self.history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn revisions(bus: &RefreshBus) -> (u64, u64, u64) {
        (
            bus.revision(Topic::FixedList),
            bus.revision(Topic::CustomList),
            bus.revision(Topic::History),
        )
    }

    #[test]
    fn routing_table_matches_events() {
        let mut bus = RefreshBus::default();
        bus.publish(ChangeEvent::FixedToggled);
        assert_eq!(revisions(&bus), (0, 0, 1));
        bus.publish(ChangeEvent::CustomAdded);
        assert_eq!(revisions(&bus), (0, 1, 2));
        bus.publish(ChangeEvent::CustomDeleted);
        assert_eq!(revisions(&bus), (0, 1, 3));
        bus.publish(ChangeEvent::SessionChanged);
        assert_eq!(revisions(&bus), (1, 2, 4));
    }

    #[test]
    fn every_list_mutation_invalidates_history() {
        for event in [
            ChangeEvent::FixedToggled,
            ChangeEvent::CustomAdded,
            ChangeEvent::CustomDeleted,
        ] {
            assert!(event.topics().contains(&Topic::History), "{event:?}");
        }
    }

    #[test]
    fn revisions_only_increase() {
        let mut bus = RefreshBus::default();
        let mut last = bus.revision(Topic::History);
        for _ in 0..5 {
            bus.publish(ChangeEvent::CustomDeleted);
            let next = bus.revision(Topic::History);
            assert!(next > last);
            last = next;
        }
    }
}
