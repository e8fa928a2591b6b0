//! Loans, loan products and the loan lifecycle

use super::borrower::Borrower;
use super::property::Property;
use super::serde_util::{self, string_or_number};
use crate::constants::{DEFAULT_INTEREST_RATE, LATE_FEE_RATE, MAX_LTV, MIN_LOAN_AMOUNT};
use crate::error::{CoreError, CoreResult};
use crate::finance::{self, LoanCost};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

labeled_enum! {
    /// Lifecycle:
    /// `Draft → UnderReview → Approved → Active → {Matured | Defaulted | LegalReady} → Closed`
    pub enum LoanStatus as "loan status" {
        Draft => ("Draft", "Borrador"),
        UnderReview => ("UnderReview", "En Revisión"),
        Approved => ("Approved", "Aprobado"),
        Active => ("Active", "Activo"),
        Matured => ("Matured", "Vencido"),
        Defaulted => ("Defaulted", "En Mora"),
        LegalReady => ("LegalReady", "Listo para Legal"),
        Closed => ("Closed", "Cerrado"),
    }
}

impl Default for LoanStatus {
    fn default() -> Self {
        LoanStatus::Draft
    }
}

impl LoanStatus {
    /// Statuses reachable in one step.
    pub fn allowed_transitions(&self) -> &'static [LoanStatus] {
        use LoanStatus::*;
        match self {
            Draft => &[UnderReview],
            UnderReview => &[Approved, Draft],
            Approved => &[Active],
            Active => &[Matured, Defaulted, Closed],
            Matured => &[Defaulted, Closed],
            Defaulted => &[LegalReady, Closed],
            LegalReady => &[Closed],
            Closed => &[],
        }
    }

    pub fn can_transition_to(&self, next: LoanStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    pub fn transition_to(self, next: LoanStatus) -> CoreResult<LoanStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Terms can still be changed.
    pub fn is_editable(&self) -> bool {
        matches!(self, LoanStatus::Draft | LoanStatus::UnderReview)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LoanStatus::Closed)
    }

    /// Disbursed and not yet closed.
    pub fn is_outstanding(&self) -> bool {
        matches!(
            self,
            LoanStatus::Active | LoanStatus::Matured | LoanStatus::Defaulted | LoanStatus::LegalReady
        )
    }

    pub fn is_in_default(&self) -> bool {
        matches!(self, LoanStatus::Defaulted | LoanStatus::LegalReady)
    }
}

fn default_max_ltv() -> Decimal {
    MAX_LTV
}

fn default_late_fee_rate() -> Decimal {
    LATE_FEE_RATE
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanProduct {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub min_amount: Decimal,
    pub max_amount: Decimal,
    pub min_term_months: u32,
    pub max_term_months: u32,
    /// Monthly rate
    #[serde(alias = "interestRate")]
    pub default_interest_rate: Decimal,
    #[serde(default = "default_max_ltv")]
    pub max_ltv: Decimal,
    #[serde(default = "default_late_fee_rate")]
    pub late_fee_rate: Decimal,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl LoanProduct {
    /// Short-term loan secured by land (promesa de compraventa).
    pub fn standard() -> Self {
        Self {
            id: "standard".to_string(),
            name: "Standard Land Loan".to_string(),
            description: Some("Short-term loan secured by land".to_string()),
            min_amount: MIN_LOAN_AMOUNT,
            max_amount: Decimal::from(500_000),
            min_term_months: 3,
            max_term_months: 6,
            default_interest_rate: DEFAULT_INTEREST_RATE,
            max_ltv: MAX_LTV,
            late_fee_rate: LATE_FEE_RATE,
            is_active: true,
        }
    }

    /// Higher value loans for established borrowers.
    pub fn premium() -> Self {
        Self {
            id: "premium".to_string(),
            name: "Premium Land Loan".to_string(),
            description: Some("Higher value loans for established borrowers".to_string()),
            min_amount: Decimal::from(100_000),
            max_amount: Decimal::from(2_000_000),
            min_term_months: 3,
            max_term_months: 6,
            default_interest_rate: Decimal::new(8, 2),
            max_ltv: Decimal::new(35, 2),
            late_fee_rate: LATE_FEE_RATE,
            is_active: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: String,
    #[serde(default, alias = "loanNumber")]
    pub reference_number: String,
    #[serde(default)]
    pub borrower_id: Option<String>,
    #[serde(default)]
    pub property_id: Option<String>,
    #[serde(default)]
    pub borrower: Option<Borrower>,
    #[serde(default)]
    pub property: Option<Property>,
    #[serde(default)]
    pub loan_product: Option<LoanProduct>,
    #[serde(alias = "loanAmount")]
    pub amount: Decimal,
    pub term_months: u32,
    /// Periodic (monthly) rate
    pub interest_rate: Decimal,
    #[serde(default)]
    pub ltv: Decimal,
    #[serde(default)]
    pub status: LoanStatus,
    #[serde(default, with = "serde_util::timestamp")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default, with = "serde_util::timestamp")]
    pub activated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub maturity_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, with = "serde_util::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "serde_util::timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Loan {
    pub fn borrower_name(&self) -> String {
        self.borrower
            .as_ref()
            .map(Borrower::display_name)
            .unwrap_or_default()
    }

    pub fn department(&self) -> Option<&str> {
        self.property
            .as_ref()
            .map(|p| p.department.as_str())
            .filter(|d| !d.is_empty())
            .or_else(|| {
                self.borrower
                    .as_ref()
                    .map(|b| b.department.as_str())
                    .filter(|d| !d.is_empty())
            })
    }

    /// LTV recomputed from the embedded property, if there is one.
    pub fn computed_ltv(&self) -> Option<Decimal> {
        self.property.as_ref().map(|p| p.ltv_for(self.amount))
    }

    /// Level payment if the loan were fully amortizing.
    pub fn amortized_payment(&self) -> CoreResult<Decimal> {
        finance::amortized_payment(self.amount, self.interest_rate, self.term_months)
    }

    /// Cost under the portfolio's interest-only terms.
    pub fn cost(&self) -> CoreResult<LoanCost> {
        LoanCost::interest_only(self.amount, self.interest_rate, self.term_months)
    }
}

/// Create / update payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanForm {
    pub borrower_id: String,
    pub property_id: String,
    pub loan_product_id: String,
    pub amount: Decimal,
    pub term_months: u32,
    pub interest_rate: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LoanStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrower_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_transition_table() {
        use LoanStatus::*;
        assert!(Draft.can_transition_to(UnderReview));
        assert!(!Draft.can_transition_to(Approved));
        assert!(UnderReview.can_transition_to(Draft));
        assert!(Active.can_transition_to(Defaulted));
        assert!(Defaulted.can_transition_to(LegalReady));
        assert!(!LegalReady.can_transition_to(Active));
        assert!(Closed.allowed_transitions().is_empty());

        for status in LoanStatus::ALL {
            assert!(!status.can_transition_to(*status));
        }
    }

    #[test]
    fn test_transition_to() {
        assert_eq!(
            LoanStatus::Approved.transition_to(LoanStatus::Active).unwrap(),
            LoanStatus::Active
        );
        let err = LoanStatus::Closed.transition_to(LoanStatus::Active).unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition { .. }));
    }

    #[test]
    fn test_status_predicates() {
        assert!(LoanStatus::Draft.is_editable());
        assert!(!LoanStatus::Approved.is_editable());
        assert!(LoanStatus::Closed.is_terminal());
        assert!(LoanStatus::Matured.is_outstanding());
        assert!(!LoanStatus::Approved.is_outstanding());
        assert!(LoanStatus::LegalReady.is_in_default());
        assert_eq!(LoanStatus::UnderReview.label(), "En Revisión");
    }

    #[test]
    fn test_decode_loan_with_aliases() {
        let json = r#"{
            "id": "l-1",
            "loanNumber": "ANC-202601-0001",
            "loanAmount": 100000,
            "termMonths": 6,
            "interestRate": 0.10,
            "ltv": 0.4,
            "status": "UnderReview",
            "maturityDate": "2026-07-15"
        }"#;
        let loan: Loan = serde_json::from_str(json).unwrap();
        assert_eq!(loan.reference_number, "ANC-202601-0001");
        assert_eq!(loan.amount, dec!(100000));
        assert_eq!(loan.status, LoanStatus::UnderReview);
        assert!(loan.borrower.is_none());
        assert_eq!(loan.borrower_name(), "");
        assert!(loan.computed_ltv().is_none());

        let cost = loan.cost().unwrap();
        assert_eq!(cost.total_interest, dec!(60000));
    }

    #[test]
    fn test_decode_product_numeric_id() {
        let json = r#"{
            "id": 1,
            "name": "Standard Land Loan",
            "minAmount": 10000,
            "maxAmount": 500000,
            "minTermMonths": 3,
            "maxTermMonths": 6,
            "interestRate": 0.10
        }"#;
        let product: LoanProduct = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, "1");
        assert_eq!(product.max_ltv, dec!(0.40));
        assert_eq!(product.late_fee_rate, dec!(0.05));
        assert!(product.is_active);
    }

    #[test]
    fn test_presets() {
        assert_eq!(LoanProduct::standard().min_amount, dec!(10000));
        assert_eq!(LoanProduct::premium().max_ltv, dec!(0.35));
    }
}
