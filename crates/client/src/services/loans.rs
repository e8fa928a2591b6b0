use super::item_path;
use crate::error::ClientResult;
use crate::http::ApiClient;
use ancla_core::{
    ApprovalRequest, CollectionAction, DataList, Document, Loan, LoanFilters, LoanForm, Page,
    Payment, PaymentScheduleEntry,
};

const BASE: &str = "/api/loans";

pub struct LoansService<'a> {
    api: &'a ApiClient,
}

impl<'a> LoansService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, filters: &LoanFilters) -> ClientResult<Page<Loan>> {
        let mut filters = filters.clone();
        filters.page_size.get_or_insert(self.api.page_size());
        self.api.get_with(BASE, &filters).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Loan> {
        self.api.get(&item_path(BASE, id, None)).await
    }

    pub async fn create(&self, form: &LoanForm) -> ClientResult<Loan> {
        self.api.post(BASE, form).await
    }

    pub async fn update(&self, id: &str, form: &LoanForm) -> ClientResult<Loan> {
        self.api.put(&item_path(BASE, id, None), form).await
    }

    /// Draft -> UnderReview
    pub async fn submit(&self, id: &str) -> ClientResult<Loan> {
        self.api.post_empty(&item_path(BASE, id, Some("submit"))).await
    }

    /// UnderReview -> Approved
    pub async fn approve(&self, id: &str, notes: Option<String>) -> ClientResult<Loan> {
        self.api
            .post(&item_path(BASE, id, Some("approve")), &ApprovalRequest { notes })
            .await
    }

    /// Approved -> Active; the backend generates the payment schedule
    pub async fn activate(&self, id: &str) -> ClientResult<Loan> {
        self.api.post_empty(&item_path(BASE, id, Some("activate"))).await
    }

    pub async fn schedule(&self, id: &str) -> ClientResult<Vec<PaymentScheduleEntry>> {
        let list: DataList<PaymentScheduleEntry> =
            self.api.get(&item_path(BASE, id, Some("schedule"))).await?;
        Ok(list.into_vec())
    }

    pub async fn payments(&self, id: &str) -> ClientResult<Vec<Payment>> {
        let list: DataList<Payment> = self.api.get(&item_path(BASE, id, Some("payments"))).await?;
        Ok(list.into_vec())
    }

    pub async fn collections(&self, id: &str) -> ClientResult<Vec<CollectionAction>> {
        let list: DataList<CollectionAction> =
            self.api.get(&item_path(BASE, id, Some("collections"))).await?;
        Ok(list.into_vec())
    }

    pub async fn documents(&self, id: &str) -> ClientResult<Vec<Document>> {
        let list: DataList<Document> =
            self.api.get(&item_path(BASE, id, Some("documents"))).await?;
        Ok(list.into_vec())
    }

    /// Loans of the signed-in borrower
    pub async fn mine(&self) -> ClientResult<DataList<Loan>> {
        self.api.get("/api/my-loans").await
    }
}
