//! Schedule reports: offline quotes and backend installment lists

use crate::exporters::ReportData;
use ancla_core::constants::LATE_FEE_RATE;
use ancla_core::finance::{
    amortization_table, amortized_payment, interest_only_schedule, late_fee, AmortizationRow,
    LoanCost, ScheduledInstallment,
};
use ancla_core::money::{format_percentage, format_quetzales};
use ancla_core::{CollectionStage, CoreResult, Decimal, PaymentScheduleEntry};
use chrono::NaiveDate;

fn strings<const N: usize>(items: [&str; N]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ============================================================================
// Amortization Report
// ============================================================================

/// Level-payment quote
#[derive(Debug, Clone)]
pub struct AmortizationReport {
    pub principal: Decimal,
    pub rate: Decimal,
    pub periods: u32,
    pub payment: Decimal,
    pub rows: Vec<AmortizationRow>,
}

impl AmortizationReport {
    pub fn new(principal: Decimal, rate: Decimal, periods: u32) -> CoreResult<Self> {
        Ok(Self {
            principal,
            rate,
            periods,
            payment: amortized_payment(principal, rate, periods)?,
            rows: amortization_table(principal, rate, periods)?,
        })
    }

    /// Sum of the interest column, so rounding matches the rows.
    pub fn total_interest(&self) -> Decimal {
        self.rows.iter().map(|r| r.interest).sum()
    }
}

impl ReportData for AmortizationReport {
    fn title(&self) -> &str {
        "Amortization Table"
    }

    fn headers(&self) -> Vec<String> {
        strings(["#", "Payment", "Interest", "Principal", "Balance"])
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|r| {
                vec![
                    r.number.to_string(),
                    format_quetzales(r.payment),
                    format_quetzales(r.interest),
                    format_quetzales(r.principal),
                    format_quetzales(r.balance),
                ]
            })
            .collect()
    }

    fn summary(&self) -> Vec<(String, String)> {
        vec![
            ("Principal".to_string(), format_quetzales(self.principal)),
            ("Monthly Rate".to_string(), format_percentage(self.rate)),
            ("Term".to_string(), format!("{} months", self.periods)),
            ("Payment".to_string(), format_quetzales(self.payment)),
            ("Total Interest".to_string(), format_quetzales(self.total_interest())),
        ]
    }
}

// ============================================================================
// Installment Plan Report
// ============================================================================

/// Interest-only plan as generated on activation
#[derive(Debug, Clone)]
pub struct InstallmentPlanReport {
    pub principal: Decimal,
    pub rate: Decimal,
    pub cost: LoanCost,
    pub installments: Vec<ScheduledInstallment>,
}

impl InstallmentPlanReport {
    pub fn new(principal: Decimal, rate: Decimal, periods: u32, start: NaiveDate) -> CoreResult<Self> {
        Ok(Self {
            principal,
            rate,
            cost: LoanCost::interest_only(principal, rate, periods)?,
            installments: interest_only_schedule(principal, rate, periods, start)?,
        })
    }
}

impl ReportData for InstallmentPlanReport {
    fn title(&self) -> &str {
        "Payment Plan"
    }

    fn headers(&self) -> Vec<String> {
        strings(["#", "Due Date", "Principal", "Interest", "Total"])
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.installments
            .iter()
            .map(|i| {
                vec![
                    i.number.to_string(),
                    i.due_date.to_string(),
                    format_quetzales(i.principal_due),
                    format_quetzales(i.interest_due),
                    format_quetzales(i.total_due()),
                ]
            })
            .collect()
    }

    fn summary(&self) -> Vec<(String, String)> {
        let maturity = self
            .installments
            .last()
            .map(|i| i.due_date.to_string())
            .unwrap_or_default();
        vec![
            ("Principal".to_string(), format_quetzales(self.principal)),
            ("Monthly Rate".to_string(), format_percentage(self.rate)),
            ("Monthly Interest".to_string(), format_quetzales(self.cost.monthly_interest)),
            ("Total Interest".to_string(), format_quetzales(self.cost.total_interest)),
            ("Total Repayment".to_string(), format_quetzales(self.cost.total_repayment)),
            ("Maturity".to_string(), maturity),
        ]
    }
}

// ============================================================================
// Payment Schedule Report
// ============================================================================

/// Backend schedule of one loan, with statuses as of `as_of`
#[derive(Debug, Clone)]
pub struct PaymentScheduleReport {
    pub title: String,
    pub entries: Vec<PaymentScheduleEntry>,
    pub as_of: NaiveDate,
}

impl PaymentScheduleReport {
    pub fn new(loan_reference: &str, entries: Vec<PaymentScheduleEntry>, as_of: NaiveDate) -> Self {
        Self {
            title: format!("Payment Schedule {}", loan_reference),
            entries,
            as_of,
        }
    }
}

impl ReportData for PaymentScheduleReport {
    fn title(&self) -> &str {
        &self.title
    }

    fn headers(&self) -> Vec<String> {
        strings(["#", "Due Date", "Principal", "Interest", "Late Fee", "Paid", "Outstanding", "Status"])
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.entries
            .iter()
            .map(|e| {
                vec![
                    e.payment_number.to_string(),
                    e.due_date.to_string(),
                    format_quetzales(e.principal_due),
                    format_quetzales(e.interest_due),
                    format_quetzales(e.late_fee_due),
                    format_quetzales(e.total_paid()),
                    format_quetzales(e.outstanding()),
                    e.effective_status(self.as_of).label().to_string(),
                ]
            })
            .collect()
    }

    fn summary(&self) -> Vec<(String, String)> {
        let settled = self.entries.iter().filter(|e| e.is_settled()).count();
        let overdue = self.entries.iter().filter(|e| e.is_overdue(self.as_of)).count();
        let paid: Decimal = self.entries.iter().map(|e| e.total_paid()).sum();
        let outstanding: Decimal = self.entries.iter().map(|e| e.outstanding()).sum();
        vec![
            ("Installments".to_string(), self.entries.len().to_string()),
            ("Settled".to_string(), settled.to_string()),
            ("Overdue".to_string(), overdue.to_string()),
            ("Paid".to_string(), format_quetzales(paid)),
            ("Outstanding".to_string(), format_quetzales(outstanding)),
            ("As Of".to_string(), self.as_of.to_string()),
        ]
    }
}

// ============================================================================
// Overdue Report
// ============================================================================

/// Unsettled installments past their due date, oldest first
#[derive(Debug, Clone)]
pub struct OverdueReport {
    pub entries: Vec<PaymentScheduleEntry>,
    pub as_of: NaiveDate,
}

impl OverdueReport {
    pub fn new(entries: Vec<PaymentScheduleEntry>, as_of: NaiveDate) -> Self {
        let mut entries: Vec<_> = entries.into_iter().filter(|e| e.is_overdue(as_of)).collect();
        entries.sort_by_key(|e| e.due_date);
        Self { entries, as_of }
    }

    /// The fee the backend would charge if none has been assessed yet.
    fn fee(entry: &PaymentScheduleEntry) -> CoreResult<Decimal> {
        if entry.late_fee_due > Decimal::ZERO {
            Ok(entry.late_fee_due)
        } else {
            late_fee(
                entry.principal_due - entry.principal_paid,
                entry.interest_due - entry.interest_paid,
                LATE_FEE_RATE,
            )
        }
    }
}

impl ReportData for OverdueReport {
    fn title(&self) -> &str {
        "Overdue Installments"
    }

    fn headers(&self) -> Vec<String> {
        strings(["Loan", "#", "Due Date", "Days", "Stage", "Outstanding", "Late Fee"])
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.entries
            .iter()
            .map(|e| {
                let days = e.days_overdue(self.as_of);
                vec![
                    e.loan_id.clone().unwrap_or_default(),
                    e.payment_number.to_string(),
                    e.due_date.to_string(),
                    days.to_string(),
                    CollectionStage::from_days_past_due(days).label().to_string(),
                    format_quetzales(e.outstanding()),
                    Self::fee(e)
                        .map(format_quetzales)
                        .unwrap_or_else(|_| "n/a".to_string()),
                ]
            })
            .collect()
    }

    fn summary(&self) -> Vec<(String, String)> {
        let outstanding: Decimal = self.entries.iter().map(|e| e.outstanding()).sum();
        let legal = self
            .entries
            .iter()
            .filter(|e| {
                CollectionStage::from_days_past_due(e.days_overdue(self.as_of))
                    == CollectionStage::LegalReady
            })
            .count();
        vec![
            ("Installments".to_string(), self.entries.len().to_string()),
            ("Outstanding".to_string(), format_quetzales(outstanding)),
            ("Legal Ready".to_string(), legal.to_string()),
            ("As Of".to_string(), self.as_of.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(number: u32, due: NaiveDate, interest_paid: Decimal) -> PaymentScheduleEntry {
        PaymentScheduleEntry {
            id: format!("s-{}", number),
            loan_id: Some("L-1".into()),
            payment_number: number,
            due_date: due,
            principal_due: Decimal::ZERO,
            interest_due: dec!(1000),
            late_fee_due: Decimal::ZERO,
            principal_paid: Decimal::ZERO,
            interest_paid,
            late_fee_paid: Decimal::ZERO,
            status: Default::default(),
            paid_at: None,
        }
    }

    #[test]
    fn test_amortization_report() {
        let report = AmortizationReport::new(dec!(12000), Decimal::ZERO, 12).unwrap();
        assert_eq!(report.rows().len(), 12);
        assert_eq!(report.rows()[11][4], "Q0.00");
        let summary = report.summary();
        assert_eq!(summary[3], ("Payment".to_string(), "Q1,000.00".to_string()));
        assert_eq!(summary[4].1, "Q0.00");

        assert!(AmortizationReport::new(dec!(12000), dec!(0.01), 0).is_err());
    }

    #[test]
    fn test_installment_plan() {
        let report = InstallmentPlanReport::new(dec!(100000), dec!(0.10), 3, date(2026, 1, 31)).unwrap();
        let rows = report.rows();
        assert_eq!(rows[0][1], "2026-02-28");
        assert_eq!(rows[2][4], "Q110,000.00");
        let summary: std::collections::HashMap<_, _> = report.summary().into_iter().collect();
        assert_eq!(summary["Total Repayment"], "Q130,000.00");
        assert_eq!(summary["Maturity"], "2026-04-30");
    }

    #[test]
    fn test_schedule_statuses() {
        let today = date(2026, 3, 10);
        let report = PaymentScheduleReport::new(
            "ANC-0001",
            vec![
                entry(1, date(2026, 2, 1), dec!(1000)),
                entry(2, date(2026, 3, 1), dec!(400)),
                entry(3, date(2026, 4, 1), Decimal::ZERO),
            ],
            today,
        );
        let rows = report.rows();
        assert_eq!(rows[0][7], "Pagado");
        assert_eq!(rows[1][7], "Vencido");
        assert_eq!(rows[1][6], "Q600.00");
        assert_eq!(rows[2][7], "Pendiente");

        let summary: std::collections::HashMap<_, _> = report.summary().into_iter().collect();
        assert_eq!(summary["Settled"], "1");
        assert_eq!(summary["Overdue"], "1");
        assert_eq!(summary["Outstanding"], "Q1,600.00");
    }

    #[test]
    fn test_overdue_report() {
        let today = date(2026, 3, 10);
        let report = OverdueReport::new(
            vec![
                entry(3, date(2026, 3, 1), Decimal::ZERO),
                entry(1, date(2026, 1, 1), Decimal::ZERO),
                entry(4, date(2026, 4, 1), Decimal::ZERO),
            ],
            today,
        );
        let rows = report.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][1], "1");
        assert_eq!(rows[0][3], "68");
        assert_eq!(rows[0][4], "Listo para Legal");
        assert_eq!(rows[1][3], "9");
        assert_eq!(rows[1][4], "Periodo de Gracia");
        assert_eq!(rows[1][6], "Q50.00");

        let summary: std::collections::HashMap<_, _> = report.summary().into_iter().collect();
        assert_eq!(summary["Legal Ready"], "1");
        assert_eq!(summary["Outstanding"], "Q2,000.00");
    }
}
