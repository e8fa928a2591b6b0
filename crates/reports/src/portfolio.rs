//! Portfolio-level reports: loan listings and the dashboard snapshot

use crate::exporters::ReportData;
use ancla_core::money::{format_percentage, format_quetzales};
use ancla_core::{DashboardMetrics, Loan, LoanStatus, PortfolioStats};
use chrono::{DateTime, Utc};

// ============================================================================
// Loan Portfolio Report
// ============================================================================

/// One row per loan plus locally computed portfolio figures
#[derive(Debug, Clone)]
pub struct LoanPortfolioReport {
    pub title: String,
    pub loans: Vec<Loan>,
    pub stats: PortfolioStats,
    pub generated_at: DateTime<Utc>,
}

impl LoanPortfolioReport {
    pub fn new(title: &str, loans: Vec<Loan>) -> Self {
        let stats = PortfolioStats::from_loans(&loans);
        Self {
            title: title.to_string(),
            loans,
            stats,
            generated_at: Utc::now(),
        }
    }
}

impl ReportData for LoanPortfolioReport {
    fn title(&self) -> &str {
        &self.title
    }

    fn headers(&self) -> Vec<String> {
        ["Loan", "Borrower", "Department", "Amount", "Rate", "Term", "LTV", "Status"]
            .iter()
            .map(|h| h.to_string())
            .collect()
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.loans
            .iter()
            .map(|loan| {
                vec![
                    loan.reference_number.clone(),
                    loan.borrower_name(),
                    loan.department().unwrap_or("-").to_string(),
                    format_quetzales(loan.amount),
                    format_percentage(loan.interest_rate),
                    format!("{} m", loan.term_months),
                    format_percentage(loan.ltv),
                    loan.status.label().to_string(),
                ]
            })
            .collect()
    }

    fn summary(&self) -> Vec<(String, String)> {
        let s = &self.stats;
        vec![
            ("Loans".to_string(), s.loan_count.to_string()),
            ("Outstanding Loans".to_string(), s.outstanding_count.to_string()),
            ("Outstanding Principal".to_string(), format_quetzales(s.outstanding_principal)),
            ("Monthly Interest".to_string(), format_quetzales(s.monthly_interest)),
            ("Default Rate".to_string(), format_percentage(s.default_rate)),
            ("Average LTV".to_string(), format_percentage(s.average_ltv)),
            ("Generated At".to_string(), self.generated_at.to_rfc3339()),
        ]
    }
}

// ============================================================================
// Dashboard Report
// ============================================================================

/// Backend dashboard metrics; rows break the portfolio down by status.
#[derive(Debug, Clone)]
pub struct DashboardReport {
    pub metrics: DashboardMetrics,
    pub top_departments: usize,
}

impl DashboardReport {
    pub fn new(metrics: DashboardMetrics) -> Self {
        Self {
            metrics,
            top_departments: 5,
        }
    }
}

impl ReportData for DashboardReport {
    fn title(&self) -> &str {
        "Dashboard"
    }

    fn headers(&self) -> Vec<String> {
        vec!["Status".to_string(), "Loans".to_string()]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        LoanStatus::ALL
            .iter()
            .filter_map(|status| {
                let count = self.metrics.count_for(*status);
                (count > 0).then(|| vec![status.label().to_string(), count.to_string()])
            })
            .collect()
    }

    fn summary(&self) -> Vec<(String, String)> {
        let m = &self.metrics;
        let departments = m
            .top_departments(self.top_departments)
            .into_iter()
            .map(|(name, count)| format!("{} ({})", name, count))
            .collect::<Vec<_>>()
            .join(", ");
        vec![
            ("Portfolio Value".to_string(), format_quetzales(m.total_portfolio_value)),
            ("Active Loans".to_string(), m.active_loans_count.to_string()),
            ("Default Rate".to_string(), format_percentage(m.default_rate)),
            ("Average LTV".to_string(), format_percentage(m.average_ltv)),
            ("Monthly Interest".to_string(), format_quetzales(m.monthly_interest_income)),
            (
                "Overdue".to_string(),
                format!("{} ({})", m.overdue_payments_count, format_quetzales(m.overdue_amount)),
            ),
            ("Top Departments".to_string(), departments),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exporters::{CsvExporter, ReportExporter};

    fn loans() -> Vec<Loan> {
        serde_json::from_str(
            r#"[
                {"id": "1", "loanNumber": "ANC-0001", "amount": 100000, "termMonths": 6,
                 "interestRate": 0.10, "ltv": 0.40, "status": "Active",
                 "borrower": {"id": "b1", "dpi": "1234567890101", "phone": "55551234", "firstName": "Juan", "lastName": "Pérez", "department": "Escuintla"}},
                {"id": "2", "loanNumber": "ANC-0002", "amount": 50000, "termMonths": 3,
                 "interestRate": 0.10, "ltv": 0.20, "status": "Defaulted"},
                {"id": "3", "loanNumber": "ANC-0003", "amount": 20000, "termMonths": 3,
                 "interestRate": 0.10, "status": "Draft"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_portfolio_summary() {
        let report = LoanPortfolioReport::new("Cartera", loans());
        let summary: std::collections::HashMap<_, _> = report.summary().into_iter().collect();
        assert_eq!(summary["Loans"], "3");
        assert_eq!(summary["Outstanding Loans"], "2");
        assert_eq!(summary["Outstanding Principal"], "Q150,000.00");
        assert_eq!(summary["Monthly Interest"], "Q15,000.00");
        assert_eq!(summary["Default Rate"], "50.00%");
        assert_eq!(summary["Average LTV"], "30.00%");
    }

    #[test]
    fn test_portfolio_rows() {
        let report = LoanPortfolioReport::new("Cartera", loans());
        let csv = CsvExporter::new().export(&report);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Loan,Borrower,Department,Amount,Rate,Term,LTV,Status");
        assert!(lines[1].starts_with("ANC-0001,Juan Pérez,Escuintla,\"Q100,000.00\",10.00%,6 m,40.00%,"));
        assert!(lines[3].contains(",-,"));
    }

    #[test]
    fn test_dashboard_rows_skip_empty_statuses() {
        let metrics: DashboardMetrics = serde_json::from_str(
            r#"{
                "totalPortfolioValue": 2500000, "activeLoansCount": 45, "defaultRate": 0.033,
                "averageLtv": 0.32, "monthlyInterestIncome": 250000,
                "overduePaymentsCount": 3, "overdueAmount": 45000,
                "loansByStatus": {"Active": 45, "Draft": 2},
                "loansByDepartment": {"Guatemala": 25, "Escuintla": 10}
            }"#,
        )
        .unwrap();
        let report = DashboardReport::new(metrics);
        let rows = report.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][1], "2");

        let summary: std::collections::HashMap<_, _> = report.summary().into_iter().collect();
        assert_eq!(summary["Portfolio Value"], "Q2,500,000.00");
        assert_eq!(summary["Overdue"], "3 (Q45,000.00)");
        assert_eq!(summary["Top Departments"], "Guatemala (25), Escuintla (10)");
    }
}
