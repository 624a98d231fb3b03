//! Output formatting for command results
//!
//! Formats results as human-readable text or JSON

use crate::cli::check::FileReport;
use crate::cli::OutputFormat;
use specmine::{Conflict, TranslationSummary};

/// Format consistency check results
pub fn format_reports(reports: &[FileReport], format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => format_reports_human(reports),
        OutputFormat::Json => format_reports_json(reports),
    }
}

/// Format a translation summary
pub fn format_summary(summary: &TranslationSummary, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => format!(
            "Translated {} of {} tags across {} members ({} without a match)\n",
            summary.translated, summary.tags, summary.members, summary.unmatched
        ),
        OutputFormat::Json => {
            let mut output = serde_json::to_string_pretty(&serde_json::json!({
                "summary": summary,
            }))
            .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e));
            output.push('\n');
            output
        }
    }
}

fn format_reports_human(reports: &[FileReport]) -> String {
    let mut output = String::new();
    output.push_str("Checking specifications...\n\n");

    for report in reports {
        output.push_str(&format!("{}\n", report.path.display()));
        if report.conflicts.is_empty() {
            output.push_str(&format!("  ✅ {} members, no conflicts\n", report.members));
        }
        for conflict in &report.conflicts {
            output.push_str(&format!("  ❌ {}\n", conflict));
        }
        output.push('\n');
    }

    let conflicts: usize = reports.iter().map(|r| r.conflicts.len()).sum();
    let members: usize = reports.iter().map(|r| r.members).sum();
    output.push_str(&format!(
        "check result: {}. {} members in {} files; {} conflicts\n",
        if conflicts > 0 { "FAILED" } else { "ok" },
        members,
        reports.len(),
        conflicts
    ));

    output
}

fn format_reports_json(reports: &[FileReport]) -> String {
    use serde_json::json;

    let conflicts: Vec<&Conflict> = reports.iter().flat_map(|r| &r.conflicts).collect();
    let files: Vec<_> = reports
        .iter()
        .map(|report| {
            json!({
                "file": report.path.to_string_lossy(),
                "members": report.members,
                "conflicts": report.conflicts,
            })
        })
        .collect();

    let output = json!({
        "summary": {
            "files": reports.len(),
            "members": reports.iter().map(|r| r.members).sum::<usize>(),
            "conflicts": conflicts.len(),
        },
        "results": files,
    });

    let mut text =
        serde_json::to_string_pretty(&output).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e));
    text.push('\n');
    text
}
