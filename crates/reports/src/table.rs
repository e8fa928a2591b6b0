//! Ad-hoc listings built row by row

use crate::exporters::ReportData;

/// A report assembled by the caller, for record lists that need no
/// computed figures.
#[derive(Debug, Clone, Default)]
pub struct TableReport {
    title: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    summary: Vec<(String, String)>,
}

impl TableReport {
    pub fn new(title: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            title: title.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn with_summary(mut self, key: &str, value: impl ToString) -> Self {
        self.summary.push((key.to_string(), value.to_string()));
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl ReportData for TableReport {
    fn title(&self) -> &str {
        &self.title
    }

    fn headers(&self) -> Vec<String> {
        self.headers.clone()
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.rows.clone()
    }

    fn summary(&self) -> Vec<(String, String)> {
        self.summary.clone()
    }
}

/// Two-column `field | value` view of a single record
pub fn detail_report(title: impl Into<String>, fields: Vec<(&str, String)>) -> TableReport {
    let mut report = TableReport::new(title, &["Field", "Value"]);
    for (name, value) in fields {
        report.push_row(vec![name.to_string(), value]);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exporters::{CsvExporter, ReportExporter};

    #[test]
    fn test_table_report() {
        let mut report = TableReport::new("Prestatarios", &["DPI", "Name"]).with_summary("Total", 1);
        report.push_row(vec!["*********0101".into(), "Juan Pérez".into()]);
        assert_eq!(report.len(), 1);
        assert_eq!(report.summary(), vec![("Total".to_string(), "1".to_string())]);
        assert_eq!(
            CsvExporter::new().export(&report),
            "DPI,Name\n*********0101,Juan Pérez\n"
        );
    }

    #[test]
    fn test_detail_report() {
        let report = detail_report("Loan ANC-1", vec![("Status", "Activo".to_string())]);
        assert_eq!(report.headers(), vec!["Field".to_string(), "Value".to_string()]);
        assert_eq!(report.rows()[0], vec!["Status".to_string(), "Activo".to_string()]);
    }
}
