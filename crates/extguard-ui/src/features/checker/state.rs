//! File checker flow.
//!
//! # Design
//! - One file at a time; selecting again clears the previous result.
//! - Each selection gets a sequence number so a late answer for an earlier
//!   file never lands on the current one.
//! - The check is answered by the backend only; cached lists are never consulted.

use extguard_api_models::file_extension;
use thiserror::Error;

/// Metadata of the selected file. The `File` handle itself stays in the view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedFile {
    /// File name as reported by the browser.
    pub name: String,
    /// Extension after the last dot; empty when there is none.
    pub extension: String,
    /// Size in bytes.
    pub size: u64,
    /// Selection sequence number.
    pub seq: u64,
}

/// Verdict returned by the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckVerdict {
    /// Upload would be refused.
    Blocked,
    /// Upload would be accepted.
    Allowed,
}

/// Checker state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckerState {
    /// Current selection.
    pub selected: Option<SelectedFile>,
    /// Whether a check is in flight.
    pub checking: bool,
    /// Verdict for the current selection.
    pub verdict: Option<CheckVerdict>,
    last_seq: u64,
}

/// Why a check could not start.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum CheckRefused {
    /// Nothing selected.
    #[error("choose a file first")]
    NoSelection,
    /// A check is already running.
    #[error("a check is already running")]
    Busy,
}

/// Select a file, clearing any previous verdict. Returns its sequence number.
pub fn select_file(state: &mut CheckerState, name: &str, size: u64) -> u64 {
    state.last_seq = state.last_seq.wrapping_add(1);
    state.selected = Some(SelectedFile {
        name: name.to_string(),
        extension: file_extension(name).to_string(),
        size,
        seq: state.last_seq,
    });
    state.verdict = None;
    state.checking = false;
    state.last_seq
}

/// Drop the selection and any verdict, e.g. when the view that held the file
/// handle goes away. Sequence numbers keep increasing.
pub fn clear_selection(state: &mut CheckerState) {
    state.selected = None;
    state.verdict = None;
    state.checking = false;
}

/// Start a check for the current selection.
///
/// # Errors
/// Returns [`CheckRefused`] when nothing is selected or a check is running.
pub fn begin_check(state: &mut CheckerState) -> Result<u64, CheckRefused> {
    if state.checking {
        return Err(CheckRefused::Busy);
    }
    let seq = state
        .selected
        .as_ref()
        .map(|file| file.seq)
        .ok_or(CheckRefused::NoSelection)?;
    state.checking = true;
    state.verdict = None;
    Ok(seq)
}

/// Apply a verdict if it still belongs to the current selection.
pub fn finish_check(state: &mut CheckerState, seq: u64, blocked: bool) -> bool {
    if !is_current(state, seq) {
        return false;
    }
    state.checking = false;
    state.verdict = Some(if blocked {
        CheckVerdict::Blocked
    } else {
        CheckVerdict::Allowed
    });
    true
}

/// A check failed; the selection stays so it can be retried.
pub fn fail_check(state: &mut CheckerState, seq: u64) -> bool {
    if !is_current(state, seq) {
        return false;
    }
    state.checking = false;
    true
}

fn is_current(state: &CheckerState, seq: u64) -> bool {
    state.selected.as_ref().is_some_and(|file| file.seq == seq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_without_selection_is_refused() {
        let mut state = CheckerState::default();
        assert_eq!(begin_check(&mut state), Err(CheckRefused::NoSelection));
        assert!(!state.checking);
    }

    #[test]
    fn selection_extracts_extension_and_clears_verdict() {
        let mut state = CheckerState::default();
        let seq = select_file(&mut state, "invoice.PDF", 10);
        assert_eq!(begin_check(&mut state), Ok(seq));
        assert_eq!(begin_check(&mut state), Err(CheckRefused::Busy));
        assert!(finish_check(&mut state, seq, true));
        assert_eq!(state.verdict, Some(CheckVerdict::Blocked));

        select_file(&mut state, ".bashrc", 1);
        assert!(state.verdict.is_none());
        assert_eq!(state.selected.as_ref().map(|f| f.extension.as_str()), Some(""));
    }

    #[test]
    fn late_verdict_for_previous_file_is_dropped() {
        let mut state = CheckerState::default();
        let first = select_file(&mut state, "a.exe", 1);
        assert_eq!(begin_check(&mut state), Ok(first));
        let second = select_file(&mut state, "b.txt", 1);
        assert!(!finish_check(&mut state, first, true));
        assert!(state.verdict.is_none());
        assert_eq!(begin_check(&mut state), Ok(second));
        assert!(finish_check(&mut state, second, false));
        assert_eq!(state.verdict, Some(CheckVerdict::Allowed));
    }

    #[test]
    fn cleared_selection_refuses_checks_and_keeps_sequence() {
        let mut state = CheckerState::default();
        let first = select_file(&mut state, "a.exe", 1);
        assert_eq!(begin_check(&mut state), Ok(first));
        clear_selection(&mut state);
        assert!(!state.checking);
        assert!(state.selected.is_none());
        assert_eq!(begin_check(&mut state), Err(CheckRefused::NoSelection));
        assert!(!finish_check(&mut state, first, true));

        let second = select_file(&mut state, "a.exe", 1);
        assert!(second > first);
    }

    #[test]
    fn reselecting_the_same_file_clears_the_verdict() {
        let mut state = CheckerState::default();
        let first = select_file(&mut state, "a.exe", 4);
        assert_eq!(begin_check(&mut state), Ok(first));
        assert!(finish_check(&mut state, first, true));
        let again = select_file(&mut state, "a.exe", 4);
        assert_ne!(again, first);
        assert!(state.verdict.is_none());
    }

    #[test]
    fn failure_allows_retry() {
        let mut state = CheckerState::default();
        let seq = select_file(&mut state, "a.sh", 1);
        assert_eq!(begin_check(&mut state), Ok(seq));
        assert!(fail_check(&mut state, seq));
        assert_eq!(begin_check(&mut state), Ok(seq));
    }
}
