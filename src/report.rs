/*!
 * Reporting functionality for clipfiles
 *
 * Summarizes what was put on the clipboard as console tables rendered with
 * the tabled library. Reports go to stderr so stdout stays clean.
 */

use std::collections::HashMap;
use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

/// Largest file list shown in full
const MAX_LISTED_FILES: usize = 15;
/// Files shown when the list is truncated
const TOP_FILES: usize = 10;

/// Information about a copied file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReportInfo {
    /// Number of lines in the file
    pub lines: usize,
    /// Number of characters in the file
    pub chars: usize,
}

/// Statistics for one clipboard action
#[derive(Debug, Clone, Default)]
pub struct CopyReport {
    /// Action performed, e.g. "Copy open files"
    pub action: String,
    /// Time taken
    pub duration: Duration,
    /// Number of files involved
    pub files: usize,
    /// Total number of lines
    pub total_lines: usize,
    /// Total number of characters copied
    pub total_chars: usize,
    /// Files that were skipped or could not be found
    pub missing: Vec<String>,
    /// Details for each file
    pub file_details: HashMap<String, FileReportInfo>,
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for clipboard actions
pub struct Reporter {
    format: ReportFormat,
}

/// Rough LLM token estimate for `chars` characters
pub fn estimate_tokens(chars: usize) -> usize {
    chars / 4
}

/// Format a number with human-readable units
pub fn format_number(num: usize) -> String {
    if num >= 1_000_000 {
        format!("{:.1}M", num as f64 / 1_000_000.0)
    } else if num >= 1_000 {
        format!("{:.1}K", num as f64 / 1_000.0)
    } else {
        num.to_string()
    }
}

/// Keep the tail of a long path, cutting at a separator when possible
fn shorten_path(path: &str, max_len: usize) -> String {
    let count = path.chars().count();
    if count <= max_len {
        return path.to_string();
    }

    let keep = max_len.saturating_sub(3);
    let tail: String = path.chars().skip(count - keep).collect();
    match tail.find('/') {
        Some(pos) if pos + 1 < tail.len() => format!("...{}", &tail[pos..]),
        _ => format!("...{}", tail),
    }
}

fn styled(mut table: Table) -> String {
    table
        .with(Style::rounded())
        .with(Padding::new(1, 1, 0, 0))
        .with(Modify::new(Columns::new(..)).with(Alignment::left()));
    table.to_string()
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &CopyReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stderr
    pub fn print_report(&self, report: &CopyReport) {
        eprintln!("\n{}", self.generate_report(report));
    }

    fn create_summary_table(&self, report: &CopyReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let mut rows = vec![
            SummaryRow {
                key: "📋 Action".to_string(),
                value: report.action.clone(),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "📄 Files".to_string(),
                value: format_number(report.files),
            },
            SummaryRow {
                key: "📝 Total Lines".to_string(),
                value: format_number(report.total_lines),
            },
            SummaryRow {
                key: "🔤 Characters".to_string(),
                value: format_number(report.total_chars),
            },
            SummaryRow {
                key: "📦 LLM Tokens".to_string(),
                value: format!(
                    "{} tokens (estimated)",
                    format_number(estimate_tokens(report.total_chars))
                ),
            },
        ];

        if !report.missing.is_empty() {
            rows.push(SummaryRow {
                key: "⚠️ Missing".to_string(),
                value: report.missing.join(", "),
            });
        }

        styled(Table::new(rows))
    }

    fn create_files_table(&self, report: &CopyReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Est. Tokens")]
            tokens: String,
        }

        // Largest first, then by path for a stable order
        let mut files: Vec<_> = report.file_details.iter().collect();
        files.sort_by(|(pa, a), (pb, b)| b.chars.cmp(&a.chars).then_with(|| pa.cmp(pb)));

        if files.len() > MAX_LISTED_FILES {
            files.truncate(TOP_FILES);
        }

        let rows: Vec<FileRow> = files
            .iter()
            .map(|(path, info)| FileRow {
                path: shorten_path(path, 60),
                lines: format_number(info.lines),
                tokens: format_number(estimate_tokens(info.chars)),
            })
            .collect();

        styled(Table::new(rows))
    }

    fn generate_console_report(&self, report: &CopyReport) -> String {
        let summary_title = "✅  COPIED";
        let summary_table = self.create_summary_table(report);

        if report.file_details.is_empty() {
            return format!("{}\n{}", summary_title, summary_table);
        }

        let files_title = if report.file_details.len() > MAX_LISTED_FILES {
            "📋  TOP 10 LARGEST FILES BY CHARACTER COUNT  📋"
        } else {
            "📋  COPIED FILES"
        };
        let files_table = self.create_files_table(report);

        format!(
            "{}\n{}\n\n{}\n{}",
            files_title, files_table, summary_title, summary_table
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> CopyReport {
        let mut file_details = HashMap::new();
        file_details.insert(
            "src/main.rs".to_string(),
            FileReportInfo {
                lines: 12,
                chars: 400,
            },
        );
        CopyReport {
            action: "Copy open files".to_string(),
            duration: Duration::from_millis(3),
            files: 1,
            total_lines: 12,
            total_chars: 400,
            missing: vec!["gone.rs".to_string()],
            file_details,
        }
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_500), "1.5K");
        assert_eq!(format_number(2_000_000), "2.0M");
    }

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(400), 100);
        assert_eq!(estimate_tokens(3), 0);
    }

    #[test]
    fn test_console_report_contents() {
        let reporter = Reporter::new(ReportFormat::ConsoleTable);
        let text = reporter.generate_report(&sample_report());

        assert!(text.contains("COPIED FILES"));
        assert!(text.contains("src/main.rs"));
        assert!(text.contains("Copy open files"));
        assert!(text.contains("100 tokens (estimated)"));
        assert!(text.contains("gone.rs"));
    }

    #[test]
    fn test_report_without_files_has_only_summary() {
        let reporter = Reporter::new(ReportFormat::ConsoleTable);
        let report = CopyReport {
            action: "Copy directory structure".to_string(),
            total_chars: 80,
            ..Default::default()
        };
        let text = reporter.generate_report(&report);
        assert!(!text.contains("File Path"));
        assert!(!text.contains("Missing"));
        assert!(text.contains("20 tokens (estimated)"));
    }

    #[test]
    fn test_shorten_path() {
        assert_eq!(shorten_path("src/a.rs", 60), "src/a.rs");
        let long = format!("{}/tail/file.rs", "x".repeat(80));
        let short = shorten_path(&long, 20);
        assert!(short.starts_with("..."));
        assert!(short.ends_with("/tail/file.rs"));
        assert!(short.chars().count() <= 20);
    }
}
