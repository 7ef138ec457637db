//! History aggregation over fixed + custom snapshots.
//!
//! # Design
//! - The history is a pure projection of the two list endpoints; no state.
//! - Sorting is stable so ties keep fetch order (fixed before custom).
//! - Filters and counts always run against the snapshot they are given.

use chrono::{NaiveDate, NaiveDateTime};

use crate::Extension;

/// Client-side history filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum HistoryFilter {
    /// Everything.
    #[default]
    All,
    /// Pre-seeded entries only.
    Fixed,
    /// User-added entries only.
    Custom,
    /// Entries that currently block.
    Blocked,
}

impl HistoryFilter {
    /// Filters in display order.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::All, Self::Blocked, Self::Fixed, Self::Custom]
    }

    /// Stable string form used in storage and CLI flags.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Fixed => "fixed",
            Self::Custom => "custom",
            Self::Blocked => "blocked",
        }
    }

    /// Parse the string form; unknown values fall back to [`HistoryFilter::All`].
    #[must_use]
    pub fn from_value(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "fixed" => Self::Fixed,
            "custom" => Self::Custom,
            "blocked" => Self::Blocked,
            _ => Self::All,
        }
    }

    /// Whether an entry passes this filter.
    #[must_use]
    pub const fn matches(self, entry: &Extension) -> bool {
        match self {
            Self::All => true,
            Self::Fixed => entry.fixed,
            Self::Custom => !entry.fixed,
            Self::Blocked => entry.blocked,
        }
    }
}

/// Merge both lists into a history, most recently updated first.
///
/// Entries without an `updated_at` sort after every timestamped entry.
#[must_use]
pub fn build_history(fixed: Vec<Extension>, custom: Vec<Extension>) -> Vec<Extension> {
    let mut entries = fixed;
    entries.extend(custom);
    entries.sort_by(|left, right| right.updated_at.cmp(&left.updated_at));
    entries
}

/// Apply a filter to a snapshot without copying entries.
#[must_use]
pub fn filter_history(entries: &[Extension], filter: HistoryFilter) -> Vec<&Extension> {
    entries.iter().filter(|entry| filter.matches(entry)).collect()
}

/// Per-filter counts derived from one snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HistoryCounts {
    /// Every entry.
    pub all: usize,
    /// Blocking entries.
    pub blocked: usize,
    /// Fixed entries.
    pub fixed: usize,
    /// Custom entries.
    pub custom: usize,
}

impl HistoryCounts {
    /// Count a snapshot.
    #[must_use]
    pub fn of(entries: &[Extension]) -> Self {
        entries.iter().fold(
            Self {
                all: entries.len(),
                ..Self::default()
            },
            |mut counts, entry| {
                if entry.blocked {
                    counts.blocked += 1;
                }
                if entry.fixed {
                    counts.fixed += 1;
                } else {
                    counts.custom += 1;
                }
                counts
            },
        )
    }

    /// Count for a given filter.
    #[must_use]
    pub const fn for_filter(&self, filter: HistoryFilter) -> usize {
        match filter {
            HistoryFilter::All => self.all,
            HistoryFilter::Fixed => self.fixed,
            HistoryFilter::Custom => self.custom,
            HistoryFilter::Blocked => self.blocked,
        }
    }
}

/// What the last change to an entry did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryAction {
    /// Fixed entry switched on.
    Blocked,
    /// Fixed entry switched off.
    Unblocked,
    /// Custom entry created.
    Added,
}

impl HistoryAction {
    /// Derive the action from the entry's current state.
    #[must_use]
    pub const fn of(entry: &Extension) -> Self {
        match (entry.fixed, entry.blocked) {
            (true, true) => Self::Blocked,
            (true, false) => Self::Unblocked,
            (false, _) => Self::Added,
        }
    }

    /// Translation key / stable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blocked => "blocked",
            Self::Unblocked => "unblocked",
            Self::Added => "added",
        }
    }
}

/// Coarse age of a timestamp relative to "now".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelativeAge {
    /// Under a minute (or in the future).
    JustNow,
    /// Under an hour.
    Minutes(i64),
    /// Under a day.
    Hours(i64),
    /// Under a week.
    Days(i64),
    /// A week or older; shown as a date.
    Date(NaiveDate),
}

impl RelativeAge {
    /// Bucket the distance between `at` and `now`.
    #[must_use]
    pub fn between(at: NaiveDateTime, now: NaiveDateTime) -> Self {
        let elapsed = now.signed_duration_since(at);
        let minutes = elapsed.num_minutes();
        if minutes < 1 {
            Self::JustNow
        } else if minutes < 60 {
            Self::Minutes(minutes)
        } else if elapsed.num_hours() < 24 {
            Self::Hours(elapsed.num_hours())
        } else if elapsed.num_days() < 7 {
            Self::Days(elapsed.num_days())
        } else {
            Self::Date(at.date())
        }
    }

    /// English rendering used by the CLI and as the UI fallback.
    #[must_use]
    pub fn describe(self) -> String {
        match self {
            Self::JustNow => "just now".to_string(),
            Self::Minutes(n) => format!("{n} min ago"),
            Self::Hours(n) => format!("{n} h ago"),
            Self::Days(n) => format!("{n} d ago"),
            Self::Date(date) => date.format("%Y-%m-%d").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|date| date.and_hms_opt(10, minute, 0))
            .expect("valid timestamp")
    }

    fn entry(id: i64, fixed: bool, blocked: bool, updated: Option<NaiveDateTime>) -> Extension {
        Extension {
            id,
            extension: format!("e{id}"),
            fixed,
            blocked,
            created_by_name: None,
            updated_by_name: None,
            created_at: None,
            updated_at: updated,
        }
    }

    #[test]
    fn history_sorts_newest_first_and_is_stable() {
        let fixed = vec![
            entry(1, true, true, Some(at(5))),
            entry(2, true, false, Some(at(9))),
            entry(3, true, false, None),
        ];
        let custom = vec![entry(10, false, true, Some(at(5))), entry(11, false, true, Some(at(30)))];
        let ids: Vec<i64> = build_history(fixed, custom).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![11, 2, 1, 10, 3]);
    }

    #[test]
    fn filters_select_expected_entries() {
        let snapshot = vec![
            entry(1, true, true, None),
            entry(2, true, false, None),
            entry(3, true, true, None),
            entry(4, false, true, None),
            entry(5, true, false, None),
        ];
        assert_eq!(filter_history(&snapshot, HistoryFilter::Blocked).len(), 3);
        let custom = filter_history(&snapshot, HistoryFilter::Custom);
        assert_eq!(custom.len(), 1);
        assert!(custom.iter().all(|entry| !entry.fixed));
        assert_eq!(filter_history(&snapshot, HistoryFilter::All).len(), 5);
        assert_eq!(filter_history(&snapshot, HistoryFilter::Fixed).len(), 4);
    }

    #[test]
    fn counts_follow_snapshot() {
        let snapshot = vec![
            entry(1, true, true, None),
            entry(2, true, false, None),
            entry(3, false, true, None),
        ];
        let counts = HistoryCounts::of(&snapshot);
        assert_eq!(
            counts,
            HistoryCounts {
                all: 3,
                blocked: 2,
                fixed: 2,
                custom: 1
            }
        );
        assert_eq!(counts.for_filter(HistoryFilter::Custom), 1);
        assert_eq!(HistoryCounts::of(&[]), HistoryCounts::default());
    }

    #[test]
    fn filter_round_trips_through_string() {
        for filter in HistoryFilter::all() {
            assert_eq!(HistoryFilter::from_value(filter.as_str()), filter);
        }
        assert_eq!(HistoryFilter::from_value("bogus"), HistoryFilter::All);
    }

    #[test]
    fn actions_reflect_category_and_flag() {
        assert_eq!(HistoryAction::of(&entry(1, true, true, None)), HistoryAction::Blocked);
        assert_eq!(HistoryAction::of(&entry(1, true, false, None)), HistoryAction::Unblocked);
        assert_eq!(HistoryAction::of(&entry(1, false, true, None)), HistoryAction::Added);
    }

    #[test]
    fn relative_age_buckets() {
        let now = at(30);
        assert_eq!(RelativeAge::between(now, now), RelativeAge::JustNow);
        assert_eq!(RelativeAge::between(now + Duration::minutes(5), now), RelativeAge::JustNow);
        assert_eq!(RelativeAge::between(at(10), now), RelativeAge::Minutes(20));
        assert_eq!(
            RelativeAge::between(now - Duration::hours(3), now),
            RelativeAge::Hours(3)
        );
        assert_eq!(
            RelativeAge::between(now - Duration::days(2), now),
            RelativeAge::Days(2)
        );
        let old = now - Duration::days(30);
        assert_eq!(RelativeAge::between(old, now), RelativeAge::Date(old.date()));
        assert_eq!(RelativeAge::Minutes(4).describe(), "4 min ago");
    }
}
