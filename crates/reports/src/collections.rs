//! Collections log

use crate::exporters::ReportData;
use ancla_core::money::format_quetzales;
use ancla_core::CollectionAction;
use chrono::NaiveDate;

/// Contact attempts, newest first, with lapsed promises flagged.
#[derive(Debug, Clone)]
pub struct CollectionsLogReport {
    pub title: String,
    pub actions: Vec<CollectionAction>,
    pub as_of: NaiveDate,
}

impl CollectionsLogReport {
    pub fn new(title: &str, mut actions: Vec<CollectionAction>, as_of: NaiveDate) -> Self {
        actions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self {
            title: title.to_string(),
            actions,
            as_of,
        }
    }

    pub fn lapsed_promises(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| a.promise_lapsed(self.as_of))
            .count()
    }
}

impl ReportData for CollectionsLogReport {
    fn title(&self) -> &str {
        &self.title
    }

    fn headers(&self) -> Vec<String> {
        ["Date", "Loan", "Action", "Contact", "Outcome", "Promise", "Notes"]
            .iter()
            .map(|h| h.to_string())
            .collect()
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.actions
            .iter()
            .map(|a| {
                let promise = match (a.promise_amount, a.promise_date) {
                    (Some(amount), Some(date)) => {
                        let mark = if a.promise_lapsed(self.as_of) { " (lapsed)" } else { "" };
                        format!("{} by {}{}", format_quetzales(amount), date, mark)
                    }
                    _ => String::new(),
                };
                vec![
                    a.created_at
                        .map(|t| t.date_naive().to_string())
                        .unwrap_or_default(),
                    a.loan_id.clone(),
                    a.action_type.label().to_string(),
                    a.contacted_person.clone().unwrap_or_default(),
                    a.outcome.clone().unwrap_or_default(),
                    promise,
                    a.notes.clone().unwrap_or_default(),
                ]
            })
            .collect()
    }

    fn summary(&self) -> Vec<(String, String)> {
        let promises = self
            .actions
            .iter()
            .filter(|a| a.action_type.requires_promise())
            .count();
        vec![
            ("Actions".to_string(), self.actions.len().to_string()),
            ("Payment Promises".to_string(), promises.to_string()),
            ("Lapsed Promises".to_string(), self.lapsed_promises().to_string()),
            ("As Of".to_string(), self.as_of.to_string()),
        ]
    }
}
