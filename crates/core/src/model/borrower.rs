//! Borrowers

use super::serde_util;
use crate::money::mask_dpi;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

labeled_enum! {
    pub enum RiskTier as "risk tier" {
        Low => ("Low", "Bajo"),
        Medium => ("Medium", "Medio"),
        High => ("High", "Alto"),
    }
}

impl Default for RiskTier {
    fn default() -> Self {
        RiskTier::Medium
    }
}

labeled_enum! {
    /// Backend-assigned review state of a borrower or property record.
    pub enum VerificationStatus as "verification status" {
        Pending => ("Pending", "Pendiente"),
        Verified => ("Verified", "Verificado"),
        Rejected => ("Rejected", "Rechazado"),
    }
}

impl Default for VerificationStatus {
    fn default() -> Self {
        VerificationStatus::Pending
    }
}

/// Body of `POST /borrowers/:id/verify` and `POST /properties/:id/verify`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub status: VerificationStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Borrower {
    pub id: String,
    /// Documento Personal de Identificación, 13 digits
    pub dpi: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub phone: String,
    #[serde(default)]
    pub alternate_phone: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub municipality: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub employer: Option<String>,
    #[serde(default)]
    pub monthly_income: Option<Decimal>,
    #[serde(default)]
    pub risk_tier: RiskTier,
    #[serde(default)]
    pub verification_status: VerificationStatus,
    #[serde(default, with = "serde_util::timestamp")]
    pub verified_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, with = "serde_util::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "serde_util::timestamp")]
    pub updated_at: Option<DateTime<Utc>>,

    // Aggregates computed by the backend; absent on list endpoints
    #[serde(default)]
    pub active_loan_count: Option<u32>,
    #[serde(default)]
    pub total_borrowed: Option<Decimal>,
    #[serde(default)]
    pub total_outstanding: Option<Decimal>,
}

impl Borrower {
    pub fn display_name(&self) -> String {
        if self.full_name.trim().is_empty() {
            format!("{} {}", self.first_name, self.last_name).trim().to_string()
        } else {
            self.full_name.clone()
        }
    }

    pub fn masked_dpi(&self) -> String {
        mask_dpi(&self.dpi)
    }

    pub fn is_verified(&self) -> bool {
        self.verification_status == VerificationStatus::Verified
    }
}

/// Create / update payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowerForm {
    pub dpi: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_phone: Option<String>,
    pub address: String,
    pub municipality: String,
    pub department: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_income: Option<Decimal>,
    pub risk_tier: RiskTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowerFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_status: Option<VerificationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_tier: Option<RiskTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const BORROWER_JSON: &str = r#"{
        "id": "b-1",
        "dpi": "2456789010101",
        "firstName": "María",
        "lastName": "López",
        "phone": "55551234",
        "department": "Escuintla",
        "monthlyIncome": 8500.50,
        "riskTier": "Low",
        "verificationStatus": "Verified",
        "activeLoanCount": 2
    }"#;

    #[test]
    fn test_decode_borrower() {
        let b: Borrower = serde_json::from_str(BORROWER_JSON).unwrap();
        assert_eq!(b.display_name(), "María López");
        assert_eq!(b.masked_dpi(), "*********0101");
        assert!(b.is_verified());
        assert_eq!(b.monthly_income, Some(dec!(8500.50)));
        assert_eq!(b.active_loan_count, Some(2));
        assert_eq!(b.risk_tier, RiskTier::Low);
    }

    #[test]
    fn test_defaults_when_missing() {
        let json = r#"{"id": "b-2", "dpi": "1", "firstName": "A", "lastName": "B", "phone": "1"}"#;
        let b: Borrower = serde_json::from_str(json).unwrap();
        assert_eq!(b.verification_status, VerificationStatus::Pending);
        assert_eq!(b.risk_tier, RiskTier::Medium);
        assert!(b.total_outstanding.is_none());
    }

    #[test]
    fn test_filters_skip_empty() {
        let filters = BorrowerFilters {
            verification_status: Some(VerificationStatus::Pending),
            page: Some(2),
            ..Default::default()
        };
        let json = serde_json::to_value(&filters).unwrap();
        assert_eq!(json, serde_json::json!({"verificationStatus": "Pending", "page": 2}));
    }

    #[test]
    fn test_verification_labels() {
        assert_eq!(VerificationStatus::Rejected.label(), "Rechazado");
        assert_eq!("verified".parse::<VerificationStatus>().unwrap(), VerificationStatus::Verified);
    }
}
