// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Static HTML report output.

use std::fmt::Write;

use crate::latest::LatestReport;
use crate::results::{FileStatus, ProjectOutcome, ProjectResult};

use super::ReportFormatter;

/// HTML format report formatter.
pub struct HtmlFormatter;

const STYLE: &str = "\
body{font-family:monospace;margin:2em;background:#fff;color:#111}\
h1{font-size:1.3em}table{border-collapse:collapse;margin:0.5em 0}\
td,th{border:1px solid #ccc;padding:0.2em 0.6em;text-align:left}\
.pass{color:#0a0}.fail{color:#c00}.blocked{color:#a60}\
.bar{display:inline-block;height:0.6em;background:#0a0}";

impl ReportFormatter for HtmlFormatter {
    fn format(&self, latest: &LatestReport) -> anyhow::Result<String> {
        let mut out = String::new();
        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html><head><meta charset=\"utf-8\">")?;
        writeln!(out, "<title>Polytest Report</title>")?;
        writeln!(out, "<style>{STYLE}</style></head><body>")?;

        let verdict = if latest.report.passed() {
            "<span class=\"pass\">PASS</span>"
        } else {
            "<span class=\"fail\">FAIL</span>"
        };
        writeln!(out, "<h1>Polytest Report {verdict}</h1>")?;
        write!(out, "<p>{}", latest.updated.format("%Y-%m-%d %H:%M"))?;
        if let Some(commit) = &latest.commit {
            write!(out, " @ {}", escape(commit))?;
        }
        writeln!(out, "</p>")?;

        for project in &latest.report.projects {
            write_project(&mut out, project)?;
        }

        writeln!(out, "</body></html>")?;
        Ok(out)
    }

    fn format_empty(&self) -> String {
        "<!DOCTYPE html><html><body><p>No previous run found.</p></body></html>\n".to_string()
    }
}

fn write_project(out: &mut String, project: &ProjectResult) -> std::fmt::Result {
    writeln!(
        out,
        "<h2>{} <small>[{}]</small></h2>",
        escape(&project.name),
        project.environment
    )?;

    match &project.outcome {
        ProjectOutcome::Blocked { reason } => {
            return writeln!(out, "<p class=\"blocked\">blocked: {}</p>", escape(reason));
        }
        ProjectOutcome::Infra { reason } => {
            return writeln!(out, "<p class=\"fail\">error: {}</p>", escape(reason));
        }
        ProjectOutcome::Passed | ProjectOutcome::Failed => {}
    }

    writeln!(out, "<table><tr><th>file</th><th>status</th><th>cases</th></tr>")?;
    for file in &project.files {
        let class = match file.status {
            FileStatus::Passed => "pass",
            FileStatus::Failed => "fail",
            FileStatus::Blocked => "blocked",
        };
        writeln!(
            out,
            "<tr><td>{}</td><td class=\"{class}\">{class}</td><td>{}</td></tr>",
            escape(&file.path.display().to_string()),
            file.cases.len(),
        )?;
    }
    writeln!(out, "</table>")?;

    if let Some(coverage) = &project.coverage {
        let pct = coverage.lines.percent();
        writeln!(
            out,
            "<p>lines {pct:.1}% <span class=\"bar\" style=\"width:{}px\"></span></p>",
            pct as u64,
        )?;
    }

    Ok(())
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
