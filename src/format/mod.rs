//! Output formatting for the end-of-run report (text, JSON).

use crate::catalog::CrawlSummary;
use crate::config::ReportFormat;
use serde::Serialize;
use std::path::Path;

/// Formats crawl summaries for output.
pub struct Formatter {
    format: ReportFormat,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    output: &'a Path,
    #[serde(flatten)]
    summary: &'a CrawlSummary,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Formats a crawl summary; `output` is the CSV file that was written.
    pub fn format_summary(&self, summary: &CrawlSummary, output: &Path) -> String {
        match self.format {
            ReportFormat::Text => self.text_summary(summary, output),
            ReportFormat::Json => self.json_summary(summary, output),
        }
    }

    fn text_summary(&self, summary: &CrawlSummary, output: &Path) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Output:         {}", output.display()));
        lines.push(format!("Pages visited:  {}", summary.pages_visited()));
        lines.push(format!("Records:        {}", summary.records_written));

        if !summary.skipped_off_domain.is_empty() {
            lines.push(format!(
                "Skipped:        {} (outside allowed domain)",
                summary.skipped_off_domain.len()
            ));
            for url in &summary.skipped_off_domain {
                lines.push(format!("  - {}", url));
            }
        }

        if !summary.failed.is_empty() {
            lines.push(format!("Failed:         {}", summary.failed.len()));
            for url in &summary.failed {
                lines.push(format!("  - {}", url));
            }
        }

        lines.join("\n")
    }

    fn json_summary(&self, summary: &CrawlSummary, output: &Path) -> String {
        let report = JsonReport { output, summary };
        serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
    }
}
