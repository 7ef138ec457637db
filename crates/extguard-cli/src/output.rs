//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use chrono::NaiveDateTime;
use extguard_api_models::history::{HistoryAction, RelativeAge};
use extguard_api_models::{Extension, UserProfile};
use serde::Serialize;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

pub(crate) fn render_extensions(entries: &[Extension], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(entries),
        OutputFormat::Table => {
            print!("{}", extension_table(entries));
            Ok(())
        }
    }
}

pub(crate) fn render_extension(entry: &Extension, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(entry),
        OutputFormat::Table => {
            println!(
                "{} {} (id {})",
                entry.dotted(),
                if entry.blocked { "blocked" } else { "allowed" },
                entry.id
            );
            Ok(())
        }
    }
}

pub(crate) fn render_history(
    entries: &[&Extension],
    now: NaiveDateTime,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(entries),
        OutputFormat::Table => {
            print!("{}", history_table(entries, now));
            Ok(())
        }
    }
}

pub(crate) fn render_profile(profile: &UserProfile, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(profile),
        OutputFormat::Table => {
            println!("name: {}", profile.name);
            if let Some(email) = &profile.email {
                println!("email: {email}");
            }
            Ok(())
        }
    }
}

pub(crate) fn render_verdict(file: &str, blocked: bool, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&json!({ "file": file, "blocked": blocked })),
        OutputFormat::Table => {
            println!("{}", verdict_line(file, blocked));
            Ok(())
        }
    }
}

#[must_use]
pub(crate) fn extension_table(entries: &[Extension]) -> String {
    let header = format!("{:>6} {:<22} {:<8} {:<8} UPDATED\n", "ID", "EXT", "KIND", "STATE");
    entries
        .iter()
        .map(extension_row)
        .fold(header, |mut out, row| {
            out.push_str(&row);
            out
        })
}

fn extension_row(entry: &Extension) -> String {
    let updated = entry
        .updated_at
        .map_or_else(|| "-".to_string(), |at| at.format("%Y-%m-%d %H:%M").to_string());
    format!(
        "{:>6} {:<22} {:<8} {:<8} {updated}\n",
        entry.id,
        entry.dotted(),
        kind_label(entry),
        if entry.blocked { "blocked" } else { "allowed" },
    )
}

#[must_use]
pub(crate) fn history_table(entries: &[&Extension], now: NaiveDateTime) -> String {
    let header = format!("{:<22} {:<8} {:<10} {:<12} BY\n", "EXT", "KIND", "ACTION", "WHEN");
    entries
        .iter()
        .map(|entry| history_row(entry, now))
        .fold(header, |mut out, row| {
            out.push_str(&row);
            out
        })
}

fn history_row(entry: &Extension, now: NaiveDateTime) -> String {
    let when = entry
        .updated_at
        .map_or_else(|| "-".to_string(), |at| RelativeAge::between(at, now).describe());
    let actor = entry
        .updated_by_name
        .as_deref()
        .or(entry.created_by_name.as_deref())
        .unwrap_or("-");
    format!(
        "{:<22} {:<8} {:<10} {:<12} {actor}\n",
        entry.dotted(),
        kind_label(entry),
        HistoryAction::of(entry).as_str(),
        when,
    )
}

#[must_use]
pub(crate) fn verdict_line(file: &str, blocked: bool) -> String {
    if blocked {
        format!("{file}: blocked")
    } else {
        format!("{file}: allowed")
    }
}

const fn kind_label(entry: &Extension) -> &'static str {
    if entry.fixed { "fixed" } else { "custom" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .expect("valid timestamp")
    }

    fn entry(id: i64, ext: &str, fixed: bool, blocked: bool) -> Extension {
        Extension {
            id,
            extension: ext.to_string(),
            fixed,
            blocked,
            created_by_name: Some("creator".to_string()),
            updated_by_name: None,
            created_at: None,
            updated_at: Some(now() - Duration::hours(2)),
        }
    }

    #[test]
    fn extension_table_lists_every_entry() {
        let table = extension_table(&[entry(1, "exe", true, true), entry(9, "sh", false, true)]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("    ID"));
        assert!(lines[1].contains(".exe"));
        assert!(lines[1].contains("fixed"));
        assert!(lines[2].contains(".sh"));
        assert!(lines[2].contains("2024-05-01 10:00"));
    }

    #[test]
    fn history_table_shows_action_age_and_actor() {
        let unblocked = entry(2, "bat", true, false);
        let mut added = entry(3, "zip", false, true);
        added.updated_at = None;
        let table = history_table(&[&unblocked, &added], now());
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[1].contains("unblocked"));
        assert!(lines[1].contains("2 h ago"));
        assert!(lines[1].ends_with("creator"));
        assert!(lines[2].contains("added"));
        assert!(lines[2].contains(" - "));
    }

    #[test]
    fn empty_tables_keep_only_the_header() {
        let table = extension_table(&[]);
        assert_eq!(table.lines().count(), 1);
        assert!(table.ends_with("UPDATED\n"));
        assert_eq!(history_table(&[], now()).lines().count(), 1);
    }

    #[test]
    fn verdict_lines_are_plain() {
        assert_eq!(verdict_line("a.exe", true), "a.exe: blocked");
        assert_eq!(verdict_line("a.txt", false), "a.txt: allowed");
    }
}
