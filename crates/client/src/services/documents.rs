use super::item_path;
use crate::error::{ClientError, ClientResult};
use crate::http::{ApiClient, Upload};
use ancla_core::model::document::{is_allowed_upload, mime_for, MAX_UPLOAD_BYTES};
use ancla_core::validation::Errors;
use ancla_core::{Document, DocumentFilters, DocumentType, Page};
use std::path::Path;

const BASE: &str = "/api/documents";

/// A file to attach to a loan, borrower or property.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub document_type: DocumentType,
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub loan_id: Option<String>,
    pub borrower_id: Option<String>,
    pub property_id: Option<String>,
    pub notes: Option<String>,
}

impl DocumentUpload {
    /// Read a file from disk; the file name is taken from the path.
    pub async fn from_path(document_type: DocumentType, path: &Path) -> ClientResult<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            document_type,
            file_name,
            bytes,
            loan_id: None,
            borrower_id: None,
            property_id: None,
            notes: None,
        })
    }

    pub fn for_loan(mut self, loan_id: impl Into<String>) -> Self {
        self.loan_id = Some(loan_id.into());
        self
    }

    pub fn for_borrower(mut self, borrower_id: impl Into<String>) -> Self {
        self.borrower_id = Some(borrower_id.into());
        self
    }

    pub fn for_property(mut self, property_id: impl Into<String>) -> Self {
        self.property_id = Some(property_id.into());
        self
    }

    pub fn validate(&self) -> ClientResult<()> {
        let mut errors = Errors::new();
        errors.check(
            is_allowed_upload(&self.file_name),
            "file",
            "Allowed file types: PDF, JPG, PNG, DOC, DOCX",
        );
        errors.check(
            (self.bytes.len() as u64) <= MAX_UPLOAD_BYTES,
            "file",
            "File is larger than 10 MB",
        );
        errors.check(!self.bytes.is_empty(), "file", "File is empty");
        errors.check(
            self.loan_id.is_some() || self.borrower_id.is_some() || self.property_id.is_some(),
            "loanId",
            "Attach the document to a loan, borrower or property",
        );
        errors.finish().map_err(ClientError::from)
    }

    fn into_upload(self) -> Upload {
        let mut fields = vec![("documentType".to_string(), self.document_type.as_str().to_string())];
        let links = [
            ("loanId", self.loan_id),
            ("borrowerId", self.borrower_id),
            ("propertyId", self.property_id),
            ("notes", self.notes),
        ];
        for (name, value) in links {
            if let Some(value) = value {
                fields.push((name.to_string(), value));
            }
        }
        Upload {
            field: "file".to_string(),
            mime: mime_for(&self.file_name).to_string(),
            file_name: self.file_name,
            bytes: self.bytes,
            fields,
        }
    }
}

pub struct DocumentsService<'a> {
    api: &'a ApiClient,
}

impl<'a> DocumentsService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, filters: &DocumentFilters) -> ClientResult<Page<Document>> {
        let mut filters = filters.clone();
        filters.page_size.get_or_insert(self.api.page_size());
        self.api.get_with(BASE, &filters).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Document> {
        self.api.get(&item_path(BASE, id, None)).await
    }

    /// Multipart upload
    pub async fn upload(&self, upload: DocumentUpload) -> ClientResult<Document> {
        upload.validate()?;
        self.api.upload(BASE, upload.into_upload()).await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.api.delete(&item_path(BASE, id, None)).await
    }
}
