// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSON format report output.

use serde_json::json;

use crate::latest::LatestReport;

use super::ReportFormatter;

/// JSON format report formatter.
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format(&self, latest: &LatestReport) -> anyhow::Result<String> {
        let counts = latest.report.case_counts();

        let mut output = serde_json::Map::new();
        output.insert("updated".to_string(), json!(latest.updated.to_rfc3339()));
        if let Some(ref commit) = latest.commit {
            output.insert("commit".to_string(), json!(commit));
        }
        output.insert(
            "verdict".to_string(),
            json!(if latest.report.passed() { "pass" } else { "fail" }),
        );
        output.insert(
            "summary".to_string(),
            json!({
                "projects": latest.report.projects.len(),
                "failed_projects": latest.report.failed_project_count(),
                "files": latest.report.file_count(),
                "cases": counts,
            }),
        );
        output.insert(
            "duration".to_string(),
            json!(latest.report.duration.as_secs_f64()),
        );
        output.insert(
            "projects".to_string(),
            serde_json::to_value(&latest.report.projects)?,
        );

        Ok(serde_json::to_string_pretty(&serde_json::Value::Object(
            output,
        ))?)
    }

    fn format_empty(&self) -> String {
        r#"{"projects": []}"#.to_string()
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
