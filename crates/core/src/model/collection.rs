//! Collection actions and delinquency staging

use super::loan::LoanStatus;
use super::serde_util;
use crate::constants::{DEFAULT_TRIGGER_DAYS, GRACE_PERIOD_DAYS, LEGAL_READY_DAYS};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

labeled_enum! {
    pub enum CollectionActionType as "collection action" {
        PhoneCall => ("PhoneCall", "Llamada"),
        Visit => ("Visit", "Visita"),
        Letter => ("Letter", "Carta"),
        PaymentPromise => ("PaymentPromise", "Promesa de Pago"),
        Extension => ("Extension", "Prórroga"),
        LegalNotice => ("LegalNotice", "Aviso Legal"),
    }
}

impl CollectionActionType {
    /// Types whose form carries promise-to-pay terms.
    pub fn requires_promise(&self) -> bool {
        matches!(self, CollectionActionType::PaymentPromise)
    }

    pub fn requires_extension_date(&self) -> bool {
        matches!(self, CollectionActionType::Extension)
    }
}

labeled_enum! {
    /// Delinquency stage by days past due.
    pub enum CollectionStage as "collection stage" {
        Current => ("Current", "Al Día"),
        Reminder => ("Reminder", "Recordatorio"),
        Grace => ("Grace", "Periodo de Gracia"),
        Delinquent => ("Delinquent", "Moroso"),
        LegalReady => ("LegalReady", "Listo para Legal"),
    }
}

impl CollectionStage {
    pub fn from_days_past_due(days: i64) -> Self {
        if days <= 0 {
            CollectionStage::Current
        } else if days <= GRACE_PERIOD_DAYS {
            CollectionStage::Reminder
        } else if days < DEFAULT_TRIGGER_DAYS {
            CollectionStage::Grace
        } else if days < LEGAL_READY_DAYS {
            CollectionStage::Delinquent
        } else {
            CollectionStage::LegalReady
        }
    }

    /// Next status the backend's default check would move the loan to, if any.
    pub fn suggested_loan_status(status: LoanStatus, days_past_due: i64) -> Option<LoanStatus> {
        match status {
            LoanStatus::Active if days_past_due >= DEFAULT_TRIGGER_DAYS => Some(LoanStatus::Defaulted),
            LoanStatus::Defaulted if days_past_due >= LEGAL_READY_DAYS => Some(LoanStatus::LegalReady),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionAction {
    pub id: String,
    pub loan_id: String,
    pub action_type: CollectionActionType,
    #[serde(default)]
    pub contacted_person: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub promise_amount: Option<Decimal>,
    #[serde(default)]
    pub promise_date: Option<NaiveDate>,
    #[serde(default)]
    pub extension_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub performed_by: Option<String>,
    #[serde(default, with = "serde_util::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl CollectionAction {
    /// A promise whose date has passed.
    pub fn promise_lapsed(&self, today: NaiveDate) -> bool {
        self.action_type.requires_promise()
            && self.promise_date.map(|d| d < today).unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionForm {
    pub loan_id: String,
    pub action_type: CollectionActionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contacted_person: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promise_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promise_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_type: Option<CollectionActionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}
