//! # Rendering
//!
//! Every function returns a `String` so output can be checked without a
//! terminal. Colors come from `console` and switch off automatically when
//! stdout is not a tty.

use console::style;
use filemap::{ClearReport, ConsistencyReport, RecoveryReport};
use serde_json::Value;
use std::fmt::Write;
use std::path::Path;

pub fn value(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

pub fn list(entries: &[(&str, &Value)], keys_only: bool) -> String {
    if entries.is_empty() {
        return format!("{}\n", style("(empty)").dim());
    }
    let width = entries.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    for (key, val) in entries {
        if keys_only {
            let _ = writeln!(out, "{}", key);
        } else {
            let _ = writeln!(out, "{:<width$}  {}", key, val, width = width);
        }
    }
    out
}

pub fn lines(names: &[String]) -> String {
    names.iter().map(|n| format!("{}\n", n)).collect()
}

pub fn stored(key: &str, replaced: bool) -> String {
    if replaced {
        format!("Updated {}", style(key).bold())
    } else {
        format!("Stored {}", style(key).bold())
    }
}

pub fn removed(key: &str, existed: bool) -> String {
    if existed {
        format!("Removed {}", style(key).bold())
    } else {
        format!("Nothing stored under {}", style(key).bold())
    }
}

pub fn cleared(report: &ClearReport) -> String {
    let mut out = format!("Removed {} entries\n", report.removed);
    for failure in &report.failures {
        let _ = writeln!(out, "  {} {}", style("✗").red(), failure);
    }
    out
}

pub fn doctor(dir: &Path, check: &ConsistencyReport, recovery: &RecoveryReport) -> String {
    let mut out = format!("{}\n", dir.display());
    let _ = writeln!(out, "  recovered: {}", recovery.recovered);

    for failure in &recovery.failures {
        let _ = writeln!(out, "  {} unreadable: {}", style("✗").red(), failure);
    }
    for key in &check.missing_files {
        let _ = writeln!(out, "  {} missing file: {}", style("✗").red(), key);
    }
    for name in &check.untracked_files {
        if recovery.failures.iter().any(|f| f.key() == Some(name.as_str())) {
            continue;
        }
        let _ = writeln!(out, "  {} untracked: {}", style("!").yellow(), name);
    }
    for name in &check.hidden_entries {
        let _ = writeln!(out, "  {} hidden: {}", style("·").dim(), name);
    }

    if check.is_consistent() && recovery.is_clean() {
        let _ = writeln!(out, "  {}", style("ok").green());
    }
    out
}
