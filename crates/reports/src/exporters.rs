//! Report exporters - terminal table, CSV, JSON, Markdown

use std::fmt;
use std::str::FromStr;

/// Renders any [`ReportData`] into one output format
pub trait ReportExporter {
    fn export(&self, report: &dyn ReportData) -> String;

    /// File extension, without the dot
    fn extension(&self) -> &'static str;

    fn mime_type(&self) -> &'static str;
}

/// Tabular view of a report
pub trait ReportData {
    fn title(&self) -> &str;

    fn headers(&self) -> Vec<String>;

    fn rows(&self) -> Vec<Vec<String>>;

    /// Key figures shown above the table
    fn summary(&self) -> Vec<(String, String)>;
}

/// Output format picked on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Table,
    Csv,
    Json,
    Markdown,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Table,
        ExportFormat::Csv,
        ExportFormat::Json,
        ExportFormat::Markdown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Table => "table",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "markdown",
        }
    }

    pub fn exporter(&self) -> Box<dyn ReportExporter> {
        match self {
            ExportFormat::Table => Box::new(TableExporter::new()),
            ExportFormat::Csv => Box::new(CsvExporter::new()),
            ExportFormat::Json => Box::new(JsonExporter::new()),
            ExportFormat::Markdown => Box::new(MarkdownExporter::new()),
        }
    }

    pub fn render(&self, report: &dyn ReportData) -> String {
        self.exporter().export(report)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" | "text" => Ok(ExportFormat::Table),
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            other => Err(format!("Unknown format: {}", other)),
        }
    }
}

// ============================================================================
// Table Exporter
// ============================================================================

/// Column-aligned plain text for the terminal
pub struct TableExporter {
    include_summary: bool,
}

impl Default for TableExporter {
    fn default() -> Self {
        Self {
            include_summary: true,
        }
    }
}

impl TableExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_summary(mut self) -> Self {
        self.include_summary = false;
        self
    }
}

impl ReportExporter for TableExporter {
    fn export(&self, report: &dyn ReportData) -> String {
        let mut output = String::new();
        output.push_str(report.title());
        output.push('\n');

        if self.include_summary {
            let summary = report.summary();
            let key_width = summary.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
            for (key, value) in summary {
                output.push_str(&format!("  {:<width$}  {}\n", key, value, width = key_width));
            }
        }

        let headers = report.headers();
        let rows = report.rows();
        if headers.is_empty() {
            return output;
        }
        if rows.is_empty() {
            output.push_str("\n(no rows)\n");
            return output;
        }

        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }

        let line = |cells: &[String]| -> String {
            let padded: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, w)| {
                    let cell = cells.get(i).map(String::as_str).unwrap_or("");
                    format!("{:<width$}", cell, width = *w)
                })
                .collect();
            format!("{}\n", padded.join("  ").trim_end())
        };

        output.push('\n');
        output.push_str(&line(&headers));
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        output.push_str(&line(&rule));
        for row in &rows {
            output.push_str(&line(row));
        }
        output
    }

    fn extension(&self) -> &'static str {
        "txt"
    }

    fn mime_type(&self) -> &'static str {
        "text/plain"
    }
}

// ============================================================================
// CSV Exporter
// ============================================================================

pub struct CsvExporter {
    delimiter: char,
    include_header: bool,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
        }
    }
}

impl CsvExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spreadsheets set to Spanish locales expect `;`
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn without_header(mut self) -> Self {
        self.include_header = false;
        self
    }

    fn escape(&self, field: &str) -> String {
        if field.contains(self.delimiter) || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn join(&self, cells: &[String]) -> String {
        cells
            .iter()
            .map(|c| self.escape(c))
            .collect::<Vec<_>>()
            .join(&self.delimiter.to_string())
    }
}

impl ReportExporter for CsvExporter {
    fn export(&self, report: &dyn ReportData) -> String {
        let mut output = String::new();
        if self.include_header {
            output.push_str(&self.join(&report.headers()));
            output.push('\n');
        }
        for row in report.rows() {
            output.push_str(&self.join(&row));
            output.push('\n');
        }
        output
    }

    fn extension(&self) -> &'static str {
        "csv"
    }

    fn mime_type(&self) -> &'static str {
        "text/csv"
    }
}

// ============================================================================
// JSON Exporter
// ============================================================================

pub struct JsonExporter {
    pretty: bool,
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl JsonExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }
}

impl ReportExporter for JsonExporter {
    fn export(&self, report: &dyn ReportData) -> String {
        let headers = report.headers();

        let rows: Vec<serde_json::Value> = report
            .rows()
            .into_iter()
            .map(|row| {
                let mut obj = serde_json::Map::new();
                for (i, header) in headers.iter().enumerate() {
                    let value = row.get(i).cloned().unwrap_or_default();
                    obj.insert(header.clone(), serde_json::Value::String(value));
                }
                serde_json::Value::Object(obj)
            })
            .collect();

        let summary: serde_json::Map<String, serde_json::Value> = report
            .summary()
            .into_iter()
            .map(|(k, v)| (k, serde_json::Value::String(v)))
            .collect();

        let output = serde_json::json!({
            "title": report.title(),
            "summary": summary,
            "data": rows,
        });

        if self.pretty {
            serde_json::to_string_pretty(&output).unwrap_or_default()
        } else {
            serde_json::to_string(&output).unwrap_or_default()
        }
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn mime_type(&self) -> &'static str {
        "application/json"
    }
}

// ============================================================================
// Markdown Exporter
// ============================================================================

pub struct MarkdownExporter {
    include_summary: bool,
}

impl Default for MarkdownExporter {
    fn default() -> Self {
        Self {
            include_summary: true,
        }
    }
}

impl MarkdownExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_summary(mut self) -> Self {
        self.include_summary = false;
        self
    }
}

fn escape_pipes(cell: &str) -> String {
    cell.replace('|', "\\|")
}

impl ReportExporter for MarkdownExporter {
    fn export(&self, report: &dyn ReportData) -> String {
        let mut output = format!("# {}\n\n", report.title());

        if self.include_summary {
            let summary = report.summary();
            if !summary.is_empty() {
                output.push_str("## Summary\n\n");
                for (key, value) in summary {
                    output.push_str(&format!("- **{}**: {}\n", key, value));
                }
                output.push('\n');
            }
        }

        let headers = report.headers();
        if headers.is_empty() {
            return output;
        }

        output.push_str("| ");
        output.push_str(&headers.join(" | "));
        output.push_str(" |\n| ");
        output.push_str(&headers.iter().map(|_| "---").collect::<Vec<_>>().join(" | "));
        output.push_str(" |\n");

        for row in report.rows() {
            let cells: Vec<String> = row.iter().map(|c| escape_pipes(c)).collect();
            output.push_str("| ");
            output.push_str(&cells.join(" | "));
            output.push_str(" |\n");
        }
        output
    }

    fn extension(&self) -> &'static str {
        "md"
    }

    fn mime_type(&self) -> &'static str {
        "text/markdown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sample;

    impl ReportData for Sample {
        fn title(&self) -> &str {
            "Cartera"
        }

        fn headers(&self) -> Vec<String> {
            vec!["Loan".into(), "Borrower".into(), "Amount".into()]
        }

        fn rows(&self) -> Vec<Vec<String>> {
            vec![
                vec!["ANC-1".into(), "Pérez, Juan".into(), "Q150,000.00".into()],
                vec!["ANC-2".into(), "Ana \"Chita\" Ruiz".into(), "Q12,000.00".into()],
            ]
        }

        fn summary(&self) -> Vec<(String, String)> {
            vec![("Loans".into(), "2".into())]
        }
    }

    #[test]
    fn test_csv_escaping() {
        let output = CsvExporter::new().export(&Sample);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "Loan,Borrower,Amount");
        assert_eq!(lines[1], "ANC-1,\"Pérez, Juan\",\"Q150,000.00\"");
        assert_eq!(lines[2], "ANC-2,\"Ana \"\"Chita\"\" Ruiz\",\"Q12,000.00\"");
    }

    #[test]
    fn test_csv_semicolon() {
        let output = CsvExporter::new().with_delimiter(';').without_header().export(&Sample);
        assert!(output.starts_with("ANC-1;Pérez, Juan;Q150,000.00\n"));
    }

    #[test]
    fn test_json_export() {
        let output = JsonExporter::new().compact().export(&Sample);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["title"], "Cartera");
        assert_eq!(value["summary"]["Loans"], "2");
        assert_eq!(value["data"][0]["Borrower"], "Pérez, Juan");
        assert!(!output.contains('\n'));
    }

    #[test]
    fn test_markdown_export() {
        let output = MarkdownExporter::new().export(&Sample);
        assert!(output.starts_with("# Cartera\n"));
        assert!(output.contains("- **Loans**: 2"));
        assert!(output.contains("| Loan | Borrower | Amount |"));
        assert!(output.contains("| --- | --- | --- |"));
        assert!(output.contains("| ANC-1 | Pérez, Juan | Q150,000.00 |"));
    }

    #[test]
    fn test_table_alignment() {
        let output = TableExporter::new().without_summary().export(&Sample);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "Cartera");
        assert_eq!(lines[2], "Loan   Borrower          Amount");
        assert_eq!(lines[3], "-----  ----------------  -----------");
        assert_eq!(lines[4], "ANC-1  Pérez, Juan       Q150,000.00");
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert!("xml".parse::<ExportFormat>().is_err());
        for format in ExportFormat::ALL {
            assert_eq!(format.as_str().parse::<ExportFormat>().unwrap(), format);
        }
        assert_eq!(ExportFormat::Json.exporter().extension(), "json");
    }
}
