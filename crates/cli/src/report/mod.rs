// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run report rendering.
//!
//! The same formatters back `polytest run` output and `polytest report`
//! re-rendering of the latest-report cache, in text, JSON, or HTML form.

mod html;
mod json;
mod text;

use std::time::Duration;

use crate::cli::OutputFormat;
use crate::latest::LatestReport;

pub use html::HtmlFormatter;
pub use json::JsonFormatter;
pub use text::{TextFormatter, print_colored};

/// Trait for rendering a run report into an output format.
pub trait ReportFormatter {
    /// Render a captured run.
    fn format(&self, latest: &LatestReport) -> anyhow::Result<String>;

    /// Output for when no run has been captured yet.
    fn format_empty(&self) -> String;
}

/// Render a report in the requested format.
///
/// If `latest` is None, returns the format-specific empty output.
pub fn format_report(
    format: OutputFormat,
    latest: Option<&LatestReport>,
) -> anyhow::Result<String> {
    let formatter: Box<dyn ReportFormatter> = match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Html => Box::new(HtmlFormatter),
    };

    match latest {
        Some(latest) => formatter.format(latest),
        None => Ok(formatter.format_empty()),
    }
}

/// Helper to render durations compactly.
pub fn human_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs >= 60.0 {
        format!("{}m{:02}s", (secs / 60.0) as u64, (secs % 60.0) as u64)
    } else if secs >= 1.0 {
        format!("{secs:.1}s")
    } else {
        format!("{}ms", duration.as_millis())
    }
}
