// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! TAP-style output parsing.
//!
//! Test files report their individual cases to the dispatcher over a small
//! line protocol on stdout:
//!
//! ```text
//! 1..3
//! ok 1 - renders button
//! not ok 2 - handles click
//! # expected handler to fire once
//! ok 3 - disabled state # SKIP needs DOM clipboard
//! ```
//!
//! Supported directives: `SKIP [reason]`, `TODO [reason]` (both reported as
//! skipped) and `time=<n>[ms|s]` for per-case durations. `# ` comment lines
//! after a failing case are attached to it as failure detail. `Bail out!`
//! aborts the file. Unrecognized lines are harness noise and are ignored;
//! one malformed line never invalidates the rest of the file.

use crate::results::{CaseResult, CaseStatus};

/// Parsed protocol output of one test file.
#[derive(Debug, Default, PartialEq)]
pub struct TapDocument {
    /// Declared plan (`1..N`), if any.
    pub plan: Option<u64>,
    /// Cases in report order.
    pub cases: Vec<CaseResult>,
    /// `Bail out!` reason, if the file aborted.
    pub bailed: Option<String>,
}

impl TapDocument {
    /// `(planned, reported)` when a declared plan was not met.
    pub fn plan_mismatch(&self) -> Option<(u64, u64)> {
        let planned = self.plan?;
        let reported = self.cases.len() as u64;
        (planned != reported).then_some((planned, reported))
    }
}

/// Parse a test file's stdout.
pub fn parse(output: &str) -> TapDocument {
    let mut doc = TapDocument::default();
    // Index of the last failing case; bare diagnostics attach to it.
    let mut last_failed: Option<usize> = None;

    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(reason) = line.strip_prefix("Bail out!") {
            doc.bailed = Some(reason.trim().to_string());
            break;
        }

        if line.starts_with("TAP version") {
            continue;
        }

        if let Some(n) = parse_plan(line) {
            if doc.plan.is_none() {
                doc.plan = Some(n);
            }
            continue;
        }

        if let Some(case) = parse_case_line(line, doc.cases.len() as u64 + 1) {
            last_failed = (case.status == CaseStatus::Failed).then_some(doc.cases.len());
            doc.cases.push(case);
            continue;
        }

        if let Some(diag) = line.strip_prefix('#') {
            if let Some(index) = last_failed
                && let Some(case) = doc.cases.get_mut(index)
            {
                case.detail.push(diag.trim().to_string());
            }
            continue;
        }
    }

    doc
}

fn parse_plan(line: &str) -> Option<u64> {
    let rest = line.strip_prefix("1..")?;
    let digits: &str = &rest[..rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len())];
    digits.parse().ok()
}

fn parse_case_line(line: &str, next_number: u64) -> Option<CaseResult> {
    let (failed, rest) = if let Some(rest) = line.strip_prefix("not ok") {
        (true, rest)
    } else if let Some(rest) = line.strip_prefix("ok") {
        (false, rest)
    } else {
        return None;
    };

    // Word boundary: "okay ..." is not a case line.
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }

    let rest = rest.trim_start();
    let (number, rest) = split_number(rest);
    let (description, directive) = match rest.split_once('#') {
        Some((desc, dir)) => (desc, Some(dir.trim())),
        None => (rest, None),
    };

    let name = description
        .trim()
        .strip_prefix('-')
        .map(str::trim_start)
        .unwrap_or(description.trim());
    let name = if name.is_empty() {
        format!("test {}", number.unwrap_or(next_number))
    } else {
        name.to_string()
    };

    let mut status = if failed {
        CaseStatus::Failed
    } else {
        CaseStatus::Passed
    };
    let mut detail = Vec::new();
    let mut duration_ms = None;

    if let Some(directive) = directive {
        let lowered = directive.to_ascii_lowercase();
        if lowered.starts_with("skip") || lowered.starts_with("todo") {
            // SKIP always skips; TODO marks an expected failure, which must
            // not fail the file either.
            status = CaseStatus::Skipped;
            let reason = directive[4..].trim();
            if !reason.is_empty() {
                detail.push(reason.to_string());
            }
        } else if let Some(value) = lowered.strip_prefix("time=") {
            duration_ms = parse_time_ms(value);
        }
    }

    Some(CaseResult {
        name,
        status,
        duration_ms,
        detail,
    })
}

/// Split a leading case number off, requiring a separator after it so that
/// descriptions like `3rd party works` are not misread as numbered.
fn split_number(rest: &str) -> (Option<u64>, &str) {
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return (None, rest);
    }
    let (digits, tail) = rest.split_at(digits_end);
    if !tail.is_empty() && !tail.starts_with([' ', '\t', '-', '#']) {
        return (None, rest);
    }
    (digits.parse().ok(), tail)
}

fn parse_time_ms(value: &str) -> Option<u64> {
    let value = value.trim();
    let (digits, scale) = if let Some(v) = value.strip_suffix("ms") {
        (v, 1.0)
    } else if let Some(v) = value.strip_suffix('s') {
        (v, 1000.0)
    } else {
        (value, 1.0)
    };
    let parsed: f64 = digits.trim().parse().ok()?;
    (parsed.is_finite() && parsed >= 0.0).then(|| (parsed * scale).round() as u64)
}

#[cfg(test)]
#[path = "tap_tests.rs"]
mod tests;
