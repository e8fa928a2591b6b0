use super::item_path;
use crate::error::ClientResult;
use crate::http::ApiClient;
use ancla_core::validation::validate_payment;
use ancla_core::{DataList, Page, Payment, PaymentFilters, PaymentForm, PaymentScheduleEntry};

const BASE: &str = "/api/payments";

pub struct PaymentsService<'a> {
    api: &'a ApiClient,
}

impl<'a> PaymentsService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, filters: &PaymentFilters) -> ClientResult<Page<Payment>> {
        let mut filters = filters.clone();
        filters.page_size.get_or_insert(self.api.page_size());
        self.api.get_with(BASE, &filters).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Payment> {
        self.api.get(&item_path(BASE, id, None)).await
    }

    pub async fn create(&self, form: &PaymentForm) -> ClientResult<Payment> {
        validate_payment(form)?;
        self.api.post(BASE, form).await
    }

    /// Installments past due across the portfolio
    pub async fn overdue(&self) -> ClientResult<DataList<PaymentScheduleEntry>> {
        self.api.get(&format!("{}/overdue", BASE)).await
    }
}
