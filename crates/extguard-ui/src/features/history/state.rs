//! History snapshot, filter and row projection.
//!
//! # Design
//! - The snapshot is rebuilt from both lists on every refresh signal.
//! - Filtering and counting are derived on read; nothing derived is stored.

use crate::core::lifecycle::LoadPhase;
use crate::i18n::TranslationBundle;
use chrono::NaiveDateTime;
use extguard_api_models::Extension;
use extguard_api_models::history::{
    HistoryAction, HistoryCounts, HistoryFilter, RelativeAge, build_history, filter_history,
};

/// Cached history snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HistoryState {
    /// Fetch phase.
    pub phase: LoadPhase,
    /// Merged entries, newest first.
    pub snapshot: Vec<Extension>,
    /// Active filter.
    pub filter: HistoryFilter,
}

/// Rebuild the snapshot from freshly fetched lists.
pub fn set_snapshot(state: &mut HistoryState, fixed: Vec<Extension>, custom: Vec<Extension>) {
    state.snapshot = build_history(fixed, custom);
    state.phase = LoadPhase::Ready;
}

/// Record a failed refresh, keeping the previous snapshot.
pub fn set_failed(state: &mut HistoryState, message: String) {
    state.phase = LoadPhase::Failed(message);
}

/// Error from the last refresh when older rows are still on display.
///
/// `None` while the snapshot is empty: the failure then replaces the list.
#[must_use]
pub fn stale_error(state: &HistoryState) -> Option<&str> {
    match &state.phase {
        LoadPhase::Failed(message) if !state.snapshot.is_empty() => Some(message),
        _ => None,
    }
}

/// Change the active filter.
pub const fn set_filter(state: &mut HistoryState, filter: HistoryFilter) {
    state.filter = filter;
}

/// Entries passing the active filter, in snapshot order.
#[must_use]
pub fn select_visible(state: &HistoryState) -> Vec<Extension> {
    filter_history(&state.snapshot, state.filter)
        .into_iter()
        .cloned()
        .collect()
}

/// Per-filter counts for the current snapshot.
#[must_use]
pub fn select_counts(state: &HistoryState) -> HistoryCounts {
    HistoryCounts::of(&state.snapshot)
}

/// Render-ready history row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRow {
    /// Backend id.
    pub id: i64,
    /// `.ext` label.
    pub label: String,
    /// Whether the entry is fixed.
    pub fixed: bool,
    /// What happened.
    pub action: HistoryAction,
    /// Who did it, if known.
    pub actor: Option<String>,
    /// Localised relative time; empty when the timestamp is missing.
    pub when: String,
}

impl HistoryRow {
    /// Project an entry relative to `now`.
    #[must_use]
    pub fn project(entry: &Extension, now: NaiveDateTime, bundle: &TranslationBundle) -> Self {
        Self {
            id: entry.id,
            label: entry.dotted(),
            fixed: entry.fixed,
            action: HistoryAction::of(entry),
            actor: entry
                .updated_by_name
                .clone()
                .or_else(|| entry.created_by_name.clone())
                .filter(|name| !name.trim().is_empty()),
            when: entry
                .updated_at
                .map(|at| describe_age(RelativeAge::between(at, now), bundle))
                .unwrap_or_default(),
        }
    }
}

/// Localise a relative age.
#[must_use]
pub fn describe_age(age: RelativeAge, bundle: &TranslationBundle) -> String {
    match age {
        RelativeAge::JustNow => bundle.text("history.just_now", "just now"),
        RelativeAge::Minutes(n) => {
            bundle.format("history.minutes_ago", "{n} min ago", &[("n", &n.to_string())])
        }
        RelativeAge::Hours(n) => {
            bundle.format("history.hours_ago", "{n} h ago", &[("n", &n.to_string())])
        }
        RelativeAge::Days(n) => {
            bundle.format("history.days_ago", "{n} d ago", &[("n", &n.to_string())])
        }
        RelativeAge::Date(_) => age.describe(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::LocaleCode;
    use chrono::{Duration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .expect("valid timestamp")
    }

    fn entry(id: i64, fixed: bool, blocked: bool, minutes_ago: Option<i64>) -> Extension {
        Extension {
            id,
            extension: format!("x{id}"),
            fixed,
            blocked,
            created_by_name: Some("creator".to_string()),
            updated_by_name: None,
            created_at: None,
            updated_at: minutes_ago.map(|m| now() - Duration::minutes(m)),
        }
    }

    #[test]
    fn snapshot_filters_and_counts_stay_consistent() {
        let mut state = HistoryState::default();
        set_snapshot(
            &mut state,
            vec![
                entry(1, true, true, Some(30)),
                entry(2, true, false, Some(5)),
                entry(3, true, true, None),
            ],
            vec![entry(4, false, true, Some(1))],
        );
        assert_eq!(
            state.snapshot.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![4, 2, 1, 3]
        );
        set_filter(&mut state, HistoryFilter::Blocked);
        let visible = select_visible(&state);
        assert_eq!(visible.len(), select_counts(&state).blocked);
        assert!(visible.iter().all(|e| e.blocked));

        set_failed(&mut state, "boom".to_string());
        assert_eq!(state.snapshot.len(), 4);
    }

    #[test]
    fn failed_refresh_keeps_rows_and_reports_inline() {
        let mut state = HistoryState::default();
        set_failed(&mut state, "offline".to_string());
        assert_eq!(stale_error(&state), None, "nothing cached yet");

        set_snapshot(&mut state, vec![entry(1, true, true, Some(2))], Vec::new());
        assert_eq!(stale_error(&state), None);
        set_failed(&mut state, "offline".to_string());
        assert_eq!(stale_error(&state), Some("offline"));
        assert_eq!(select_visible(&state).len(), 1);

        set_snapshot(&mut state, vec![entry(1, true, true, Some(2))], Vec::new());
        assert_eq!(stale_error(&state), None);
    }

    #[test]
    fn row_projection_uses_provenance_and_relative_time() {
        let bundle = TranslationBundle::new(LocaleCode::En);
        let row = HistoryRow::project(&entry(1, true, false, Some(90)), now(), &bundle);
        assert_eq!(row.label, ".x1");
        assert_eq!(row.action, HistoryAction::Unblocked);
        assert_eq!(row.actor.as_deref(), Some("creator"));
        assert_eq!(row.when, "1 h ago");

        let undated = HistoryRow::project(&entry(2, false, true, None), now(), &bundle);
        assert_eq!(undated.action, HistoryAction::Added);
        assert!(undated.when.is_empty());
    }

    #[test]
    fn ages_render_in_korean() {
        let bundle = TranslationBundle::new(LocaleCode::Ko);
        assert_eq!(describe_age(RelativeAge::Minutes(3), &bundle), "3분 전");
        assert_eq!(describe_age(RelativeAge::JustNow, &bundle), "방금 전");
    }
}
