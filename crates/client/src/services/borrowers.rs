use super::item_path;
use crate::error::ClientResult;
use crate::http::ApiClient;
use ancla_core::validation::validate_borrower;
use ancla_core::{
    Borrower, BorrowerFilters, BorrowerForm, DataList, Document, Loan, Page, VerificationStatus,
    VerifyRequest,
};

const BASE: &str = "/api/borrowers";

pub struct BorrowersService<'a> {
    api: &'a ApiClient,
}

impl<'a> BorrowersService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, filters: &BorrowerFilters) -> ClientResult<Page<Borrower>> {
        let mut filters = filters.clone();
        filters.page_size.get_or_insert(self.api.page_size());
        self.api.get_with(BASE, &filters).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Borrower> {
        self.api.get(&item_path(BASE, id, None)).await
    }

    /// Validated locally before it is sent.
    pub async fn create(&self, form: &BorrowerForm) -> ClientResult<Borrower> {
        validate_borrower(form)?;
        self.api.post(BASE, form).await
    }

    pub async fn update(&self, id: &str, form: &BorrowerForm) -> ClientResult<Borrower> {
        validate_borrower(form)?;
        self.api.put(&item_path(BASE, id, None), form).await
    }

    pub async fn verify(&self, id: &str, status: VerificationStatus) -> ClientResult<Borrower> {
        self.api
            .post(&item_path(BASE, id, Some("verify")), &VerifyRequest { status })
            .await
    }

    pub async fn loans(&self, id: &str) -> ClientResult<Vec<Loan>> {
        let list: DataList<Loan> = self.api.get(&item_path(BASE, id, Some("loans"))).await?;
        Ok(list.into_vec())
    }

    pub async fn documents(&self, id: &str) -> ClientResult<Vec<Document>> {
        let list: DataList<Document> =
            self.api.get(&item_path(BASE, id, Some("documents"))).await?;
        Ok(list.into_vec())
    }
}
