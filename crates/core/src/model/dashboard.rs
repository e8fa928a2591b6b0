//! Dashboard aggregates

use super::loan::{Loan, LoanStatus};
use crate::money::round_money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_portfolio_value: Decimal,
    pub active_loans_count: u32,
    pub default_rate: Decimal,
    pub average_ltv: Decimal,
    pub monthly_interest_income: Decimal,
    pub overdue_payments_count: u32,
    pub overdue_amount: Decimal,
    #[serde(default)]
    pub loans_by_status: BTreeMap<LoanStatus, u32>,
    #[serde(default)]
    pub loans_by_department: BTreeMap<String, u32>,
    #[serde(default)]
    pub recent_loans: Vec<Loan>,
}

impl DashboardMetrics {
    pub fn count_for(&self, status: LoanStatus) -> u32 {
        self.loans_by_status.get(&status).copied().unwrap_or(0)
    }

    /// Departments ordered by loan count, largest first.
    pub fn top_departments(&self, limit: usize) -> Vec<(&str, u32)> {
        let mut rows: Vec<(&str, u32)> = self
            .loans_by_department
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        rows.truncate(limit);
        rows
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioPoint {
    /// `YYYY-MM`
    pub month: String,
    pub value: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    #[serde(default)]
    pub portfolio_trend: Vec<PortfolioPoint>,
}

/// Aggregates computed locally over a page of loans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioStats {
    pub loan_count: usize,
    pub outstanding_count: usize,
    pub outstanding_principal: Decimal,
    pub monthly_interest: Decimal,
    pub default_rate: Decimal,
    pub average_ltv: Decimal,
    pub by_status: BTreeMap<LoanStatus, u32>,
}

impl PortfolioStats {
    pub fn from_loans(loans: &[Loan]) -> Self {
        let mut stats = Self {
            loan_count: loans.len(),
            ..Self::default()
        };
        let mut ltv_sum = Decimal::ZERO;
        let mut in_default = 0usize;

        for loan in loans {
            *stats.by_status.entry(loan.status).or_insert(0) += 1;
            if !loan.status.is_outstanding() {
                continue;
            }
            stats.outstanding_count += 1;
            stats.outstanding_principal += loan.amount;
            stats.monthly_interest += loan.amount * loan.interest_rate;
            ltv_sum += loan.ltv;
            if loan.status.is_in_default() {
                in_default += 1;
            }
        }

        if stats.outstanding_count > 0 {
            let n = Decimal::from(stats.outstanding_count as u64);
            stats.average_ltv = (ltv_sum / n).round_dp(4);
            stats.default_rate = (Decimal::from(in_default as u64) / n).round_dp(4);
        }
        stats.monthly_interest = round_money(stats.monthly_interest);
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn loan(status: &str, amount: u32, ltv: &str) -> Loan {
        let json = format!(
            r#"{{"id": "x", "amount": {}, "termMonths": 6, "interestRate": 0.10, "ltv": {}, "status": "{}"}}"#,
            amount, ltv, status
        );
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_decode_metrics() {
        let json = r#"{
            "totalPortfolioValue": 2500000,
            "activeLoansCount": 45,
            "defaultRate": 0.033,
            "averageLtv": 0.32,
            "monthlyInterestIncome": 250000,
            "overduePaymentsCount": 3,
            "overdueAmount": 45000,
            "loansByStatus": {"Draft": 2, "Active": 45, "LegalReady": 1},
            "loansByDepartment": {"Guatemala": 25, "Escuintla": 10, "Petén": 10}
        }"#;
        let metrics: DashboardMetrics = serde_json::from_str(json).unwrap();
        assert_eq!(metrics.count_for(LoanStatus::Active), 45);
        assert_eq!(metrics.count_for(LoanStatus::Closed), 0);
        assert_eq!(
            metrics.top_departments(2),
            vec![("Guatemala", 25), ("Escuintla", 10)]
        );
        assert!(metrics.recent_loans.is_empty());
    }

    #[test]
    fn test_stats_from_loans() {
        let loans = vec![
            loan("Active", 100000, "0.4"),
            loan("Defaulted", 50000, "0.2"),
            loan("Closed", 80000, "0.3"),
            loan("Draft", 20000, "0.1"),
        ];
        let stats = PortfolioStats::from_loans(&loans);
        assert_eq!(stats.loan_count, 4);
        assert_eq!(stats.outstanding_count, 2);
        assert_eq!(stats.outstanding_principal, dec!(150000));
        assert_eq!(stats.monthly_interest, dec!(15000.00));
        assert_eq!(stats.average_ltv, dec!(0.3));
        assert_eq!(stats.default_rate, dec!(0.5));
        assert_eq!(stats.by_status[&LoanStatus::Closed], 1);
    }

    #[test]
    fn test_stats_empty() {
        let stats = PortfolioStats::from_loans(&[]);
        assert_eq!(stats.default_rate, Decimal::ZERO);
        assert_eq!(stats.average_ltv, Decimal::ZERO);
    }
}
