// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Text format report output.

use std::io::Write as _;

use termcolor::{Color, ColorSpec, StandardStream, WriteColor};

use crate::latest::LatestReport;
use crate::results::{CaseStatus, FileStatus, ProjectOutcome, ProjectResult};

use super::{ReportFormatter, human_duration};

/// Text format report formatter.
pub struct TextFormatter;

/// Write text report content. This macro handles the common formatting logic
/// for both fmt::Write (String) and io::Write (stdout, files).
macro_rules! write_text_report {
    ($writer:expr, $latest:expr) => {
        writeln!($writer, "Polytest Report")?;
        writeln!($writer, "===============")?;
        let date = $latest.updated.format("%Y-%m-%d %H:%M");
        if let Some(ref commit) = $latest.commit {
            writeln!($writer, "Run: {} ({})", date, commit)?;
        } else {
            writeln!($writer, "Run: {}", date)?;
        }
        writeln!($writer)?;

        for project in &$latest.report.projects {
            write_project($writer, project)?;
        }

        writeln!($writer)?;
        let counts = $latest.report.case_counts();
        writeln!(
            $writer,
            "{} file(s), {} case(s): {} passed, {} failed, {} skipped in {}",
            $latest.report.file_count(),
            counts.total(),
            counts.passed,
            counts.failed,
            counts.skipped,
            human_duration($latest.report.duration),
        )?;
        writeln!(
            $writer,
            "{}",
            if $latest.report.passed() { "PASS" } else { "FAIL" }
        )?;
    };
}

fn write_project<W: std::fmt::Write>(writer: &mut W, project: &ProjectResult) -> std::fmt::Result {
    let label = format!("{} [{}]", project.name, project.environment);

    match &project.outcome {
        ProjectOutcome::Blocked { reason } => {
            writeln!(writer, "{label}: blocked ({reason})")?;
            writeln!(
                writer,
                "  {} file(s) not run due to setup failure",
                project.files.len()
            )?;
            return Ok(());
        }
        ProjectOutcome::Infra { reason } => {
            writeln!(writer, "{label}: error ({reason})")?;
            return Ok(());
        }
        ProjectOutcome::Passed | ProjectOutcome::Failed => {}
    }

    if project.files.is_empty() {
        writeln!(
            writer,
            "{label}: no test files matched in {}",
            human_duration(project.duration)
        )?;
        return Ok(());
    }

    let counts = project.case_counts();
    let mut line = format!("{label}: {} passed", counts.passed);
    if counts.failed > 0 {
        line.push_str(&format!(", {} failed", counts.failed));
    }
    if counts.skipped > 0 {
        line.push_str(&format!(", {} skipped", counts.skipped));
    }
    writeln!(writer, "{line} in {}", human_duration(project.duration))?;

    for file in &project.files {
        if file.status != FileStatus::Failed {
            continue;
        }
        match &file.error {
            Some(error) => writeln!(writer, "  FAIL {} ({error})", file.path.display())?,
            None => writeln!(writer, "  FAIL {}", file.path.display())?,
        }
        for case in &file.cases {
            if case.status != CaseStatus::Failed {
                continue;
            }
            writeln!(writer, "    not ok: {}", case.name)?;
            for detail in &case.detail {
                writeln!(writer, "      {detail}")?;
            }
        }
    }

    if let Some(coverage) = &project.coverage {
        writeln!(
            writer,
            "  coverage: lines {:.1}%, branches {:.1}%, functions {:.1}%, statements {:.1}%",
            coverage.lines.percent(),
            coverage.branches.percent(),
            coverage.functions.percent(),
            coverage.statements.percent(),
        )?;
    }

    Ok(())
}

impl ReportFormatter for TextFormatter {
    fn format(&self, latest: &LatestReport) -> anyhow::Result<String> {
        use std::fmt::Write;

        let mut output = String::new();
        write_text_report!(&mut output, latest);
        Ok(output)
    }

    fn format_empty(&self) -> String {
        "No previous run found.\n".to_string()
    }
}

/// Print the text report to a stream, coloring status markers.
///
/// Layout is identical to [`TextFormatter`]; color is applied per line so
/// the plain renderer stays the single source of truth.
pub fn print_colored(latest: &LatestReport, stream: &mut StandardStream) -> anyhow::Result<()> {
    let plain = TextFormatter.format(latest)?;

    for line in plain.lines() {
        let trimmed = line.trim_start();
        if line == "PASS" {
            stream.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        } else if line == "FAIL" {
            stream.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        } else if trimmed.starts_with("FAIL ") || trimmed.starts_with("not ok:") {
            stream.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
        } else if trimmed.contains(": blocked (") || trimmed.contains(": error (") {
            stream.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        }
        writeln!(stream, "{line}")?;
        stream.reset()?;
    }

    Ok(())
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
