//! Properties offered as collateral

use super::borrower::VerificationStatus;
use super::serde_util;
use crate::finance::loan_to_value;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    // Registro General de la Propiedad identifiers
    pub finca: String,
    pub folio: String,
    pub libro: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub municipality: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub area_m2: Decimal,
    #[serde(default)]
    pub market_value: Decimal,
    #[serde(default)]
    pub appraisal_value: Option<Decimal>,
    #[serde(default)]
    pub appraisal_date: Option<NaiveDate>,
    #[serde(default)]
    pub verification_status: VerificationStatus,
    #[serde(default, with = "serde_util::timestamp")]
    pub verified_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, with = "serde_util::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "serde_util::timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Property {
    /// Appraisal when there is a positive one, market value otherwise.
    pub fn collateral_value(&self) -> Decimal {
        match self.appraisal_value {
            Some(v) if v > Decimal::ZERO => v,
            _ => self.market_value,
        }
    }

    pub fn ltv_for(&self, loan_amount: Decimal) -> Decimal {
        loan_to_value(loan_amount, self.collateral_value())
    }

    pub fn registry_reference(&self) -> String {
        format!("Finca {}, Folio {}, Libro {}", self.finca, self.folio, self.libro)
    }

    pub fn is_verified(&self) -> bool {
        self.verification_status == VerificationStatus::Verified
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyForm {
    pub finca: String,
    pub folio: String,
    pub libro: String,
    pub address: String,
    pub municipality: String,
    pub department: String,
    pub area_m2: Decimal,
    pub market_value: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appraisal_value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appraisal_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_status: Option<VerificationStatus>,
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

    fn property(market: Decimal, appraisal: Option<Decimal>) -> Property {
        let json = serde_json::json!({
            "id": "p-1",
            "finca": "1234",
            "folio": "56",
            "libro": "78E",
            "areaM2": 450.5,
            "marketValue": market,
            "appraisalValue": appraisal,
        });
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_collateral_prefers_appraisal() {
        let p = property(dec!(300000), Some(dec!(250000)));
        assert_eq!(p.collateral_value(), dec!(250000));
        assert_eq!(p.ltv_for(dec!(100000)), dec!(0.4));
    }

    #[test]
    fn test_collateral_falls_back_to_market() {
        assert_eq!(property(dec!(300000), None).collateral_value(), dec!(300000));
        assert_eq!(property(dec!(300000), Some(dec!(0))).collateral_value(), dec!(300000));
    }

    #[test]
    fn test_registry_reference() {
        let p = property(dec!(1), None);
        assert_eq!(p.registry_reference(), "Finca 1234, Folio 56, Libro 78E");
        assert_eq!(p.area_m2, dec!(450.5));
        assert!(!p.is_verified());
    }
}
