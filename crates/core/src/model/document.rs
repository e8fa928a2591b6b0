//! Loan documents

use super::serde_util;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upload extensions the backend accepts.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png", "doc", "docx"];

/// Upload size limit in bytes.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

labeled_enum! {
    pub enum DocumentType as "document type" {
        MutuoMercantil => ("MutuoMercantil", "Mutuo Mercantil"),
        Pagare => ("Pagare", "Pagaré"),
        PromesaCompraventa => ("PromesaCompraventa", "Promesa de Compraventa"),
        #[serde(rename = "DPI")]
        Dpi => ("DPI", "DPI"),
        IncomeProof => ("IncomeProof", "Constancia de Ingresos"),
        Appraisal => ("Appraisal", "Avalúo"),
        Other => ("Other", "Otro"),
    }
}

impl DocumentType {
    /// Contracts that are signed before disbursement.
    pub fn is_contract(&self) -> bool {
        matches!(
            self,
            DocumentType::MutuoMercantil | DocumentType::Pagare | DocumentType::PromesaCompraventa
        )
    }
}

labeled_enum! {
    pub enum DocumentStatus as "document status" {
        Pending => ("Pending", "Pendiente"),
        Uploaded => ("Uploaded", "Cargado"),
        Executed => ("Executed", "Firmado"),
    }
}

impl Default for DocumentStatus {
    fn default() -> Self {
        DocumentStatus::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub document_type: DocumentType,
    #[serde(default)]
    pub loan_id: Option<String>,
    #[serde(default)]
    pub borrower_id: Option<String>,
    #[serde(default)]
    pub property_id: Option<String>,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default = "first_version")]
    pub version: u32,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, with = "serde_util::timestamp")]
    pub uploaded_at: Option<DateTime<Utc>>,
    #[serde(default, with = "serde_util::timestamp")]
    pub executed_at: Option<DateTime<Utc>>,
}

fn first_version() -> u32 {
    1
}

impl Document {
    pub fn is_executed(&self) -> bool {
        self.status == DocumentStatus::Executed
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<DocumentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DocumentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrower_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

/// Case-insensitive check of the file name's extension.
pub fn is_allowed_upload(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(stem, ext)| {
            !stem.is_empty() && ALLOWED_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// MIME type sent with a multipart upload.
pub fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, e)| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}
