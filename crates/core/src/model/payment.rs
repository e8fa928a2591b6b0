//! Payment schedule entries and recorded payments

use super::serde_util::{self, optional_string_or_number};
use crate::money::round_money;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

labeled_enum! {
    pub enum ScheduleStatus as "schedule status" {
        Pending => ("Pending", "Pendiente"),
        Paid => ("Paid", "Pagado"),
        Partial => ("Partial", "Parcial"),
        Overdue => ("Overdue", "Vencido"),
    }
}

impl Default for ScheduleStatus {
    fn default() -> Self {
        ScheduleStatus::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentScheduleEntry {
    pub id: String,
    #[serde(default)]
    pub loan_id: Option<String>,
    pub payment_number: u32,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub principal_due: Decimal,
    #[serde(default)]
    pub interest_due: Decimal,
    #[serde(default)]
    pub late_fee_due: Decimal,
    #[serde(default)]
    pub principal_paid: Decimal,
    #[serde(default)]
    pub interest_paid: Decimal,
    #[serde(default)]
    pub late_fee_paid: Decimal,
    #[serde(default)]
    pub status: ScheduleStatus,
    #[serde(default, with = "serde_util::timestamp")]
    pub paid_at: Option<DateTime<Utc>>,
}

impl PaymentScheduleEntry {
    pub fn total_due(&self) -> Decimal {
        self.principal_due + self.interest_due + self.late_fee_due
    }

    pub fn total_paid(&self) -> Decimal {
        self.principal_paid + self.interest_paid + self.late_fee_paid
    }

    /// Never negative; overpayment counts as settled.
    pub fn outstanding(&self) -> Decimal {
        (self.total_due() - self.total_paid()).max(Decimal::ZERO)
    }

    pub fn is_settled(&self) -> bool {
        self.status == ScheduleStatus::Paid || self.outstanding().is_zero()
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_settled() && self.due_date < today
    }

    pub fn days_overdue(&self, today: NaiveDate) -> i64 {
        if self.is_overdue(today) {
            (today - self.due_date).num_days()
        } else {
            0
        }
    }

    /// Status as of `today`, which may lag behind what the backend stored.
    pub fn effective_status(&self, today: NaiveDate) -> ScheduleStatus {
        if self.is_settled() {
            ScheduleStatus::Paid
        } else if self.is_overdue(today) {
            ScheduleStatus::Overdue
        } else if self.total_paid() > Decimal::ZERO {
            ScheduleStatus::Partial
        } else {
            ScheduleStatus::Pending
        }
    }
}

labeled_enum! {
    pub enum PaymentType as "payment type" {
        Principal => ("Principal", "Capital"),
        Interest => ("Interest", "Interés"),
        LateFee => ("LateFee", "Mora"),
        Other => ("Other", "Otro"),
    }
}

labeled_enum! {
    pub enum PaymentMethod as "payment method" {
        Cash => ("Cash", "Efectivo"),
        Transfer => ("Transfer", "Transferencia"),
        Check => ("Check", "Cheque"),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub loan_id: String,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub schedule_id: Option<String>,
    pub amount: Decimal,
    pub payment_type: PaymentType,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub reference_number: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub recorded_by: Option<String>,
    #[serde(default, alias = "paymentDate", with = "serde_util::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentForm {
    pub loan_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_id: Option<String>,
    pub amount: Decimal,
    pub payment_type: PaymentType,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<PaymentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

/// Totals over a set of payments, split by type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub count: usize,
    pub total: Decimal,
    pub principal: Decimal,
    pub interest: Decimal,
    pub late_fees: Decimal,
    pub other: Decimal,
}

impl PaymentSummary {
    pub fn from_payments<'a>(payments: impl IntoIterator<Item = &'a Payment>) -> Self {
        let mut summary = Self::default();
        for payment in payments {
            summary.count += 1;
            summary.total += payment.amount;
            let bucket = match payment.payment_type {
                PaymentType::Principal => &mut summary.principal,
                PaymentType::Interest => &mut summary.interest,
                PaymentType::LateFee => &mut summary.late_fees,
                PaymentType::Other => &mut summary.other,
            };
            *bucket += payment.amount;
        }
        summary.total = round_money(summary.total);
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(due: &str, principal_paid: Decimal, interest_paid: Decimal) -> PaymentScheduleEntry {
        PaymentScheduleEntry {
            id: "s-1".into(),
            loan_id: Some("l-1".into()),
            payment_number: 1,
            due_date: NaiveDate::parse_from_str(due, "%Y-%m-%d").unwrap(),
            principal_due: dec!(0),
            interest_due: dec!(10000),
            late_fee_due: dec!(0),
            principal_paid,
            interest_paid,
            late_fee_paid: dec!(0),
            status: ScheduleStatus::Pending,
            paid_at: None,
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_totals() {
        let e = entry("2026-03-15", dec!(0), dec!(4000));
        assert_eq!(e.total_due(), dec!(10000));
        assert_eq!(e.total_paid(), dec!(4000));
        assert_eq!(e.outstanding(), dec!(6000));
    }

    #[test]
    fn test_overdue_by_date() {
        let e = entry("2026-03-15", dec!(0), dec!(0));
        assert!(!e.is_overdue(day("2026-03-15")));
        assert!(e.is_overdue(day("2026-03-16")));
        assert_eq!(e.days_overdue(day("2026-03-31")), 16);
        assert_eq!(e.days_overdue(day("2026-03-01")), 0);
    }

    #[test]
    fn test_paid_entry_never_overdue() {
        let e = entry("2026-03-15", dec!(0), dec!(10000));
        assert!(!e.is_overdue(day("2026-06-01")));
        assert_eq!(e.effective_status(day("2026-06-01")), ScheduleStatus::Paid);
    }

    #[test]
    fn test_effective_status() {
        assert_eq!(
            entry("2026-03-15", dec!(0), dec!(500)).effective_status(day("2026-03-01")),
            ScheduleStatus::Partial
        );
        assert_eq!(
            entry("2026-03-15", dec!(0), dec!(0)).effective_status(day("2026-03-01")),
            ScheduleStatus::Pending
        );
        assert_eq!(
            entry("2026-03-15", dec!(0), dec!(500)).effective_status(day("2026-04-01")),
            ScheduleStatus::Overdue
        );
    }

    #[test]
    fn test_summary_by_type() {
        let json = r#"[
            {"id": "p1", "loanId": "l", "amount": 1000, "paymentType": "Interest", "paymentMethod": "Cash"},
            {"id": "p2", "loanId": "l", "amount": 250.5, "paymentType": "LateFee", "paymentMethod": "Transfer", "scheduleId": 3},
            {"id": "p3", "loanId": "l", "amount": 5000, "paymentType": "Principal", "paymentMethod": "Check"}
        ]"#;
        let payments: Vec<Payment> = serde_json::from_str(json).unwrap();
        assert_eq!(payments[1].schedule_id.as_deref(), Some("3"));

        let summary = PaymentSummary::from_payments(&payments);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.total, dec!(6250.50));
        assert_eq!(summary.late_fees, dec!(250.5));
        assert_eq!(summary.other, dec!(0));
    }

    #[test]
    fn test_method_labels() {
        assert_eq!(PaymentMethod::Transfer.label(), "Transferencia");
        assert_eq!("latefee".parse::<PaymentType>().unwrap(), PaymentType::LateFee);
    }
}
