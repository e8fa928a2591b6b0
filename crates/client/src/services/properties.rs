use super::item_path;
use crate::error::ClientResult;
use crate::http::ApiClient;
use ancla_core::validation::validate_property;
use ancla_core::{Page, Property, PropertyFilters, PropertyForm, VerificationStatus, VerifyRequest};

const BASE: &str = "/api/properties";

pub struct PropertiesService<'a> {
    api: &'a ApiClient,
}

impl<'a> PropertiesService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, filters: &PropertyFilters) -> ClientResult<Page<Property>> {
        let mut filters = filters.clone();
        filters.page_size.get_or_insert(self.api.page_size());
        self.api.get_with(BASE, &filters).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Property> {
        self.api.get(&item_path(BASE, id, None)).await
    }

    pub async fn create(&self, form: &PropertyForm) -> ClientResult<Property> {
        validate_property(form)?;
        self.api.post(BASE, form).await
    }

    pub async fn update(&self, id: &str, form: &PropertyForm) -> ClientResult<Property> {
        validate_property(form)?;
        self.api.put(&item_path(BASE, id, None), form).await
    }

    /// Legal's review of the registry data
    pub async fn verify(&self, id: &str, status: VerificationStatus) -> ClientResult<Property> {
        self.api
            .post(&item_path(BASE, id, Some("verify")), &VerifyRequest { status })
            .await
    }
}
