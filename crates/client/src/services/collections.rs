use super::item_path;
use crate::error::ClientResult;
use crate::http::ApiClient;
use ancla_core::validation::validate_collection;
use ancla_core::{CollectionAction, CollectionFilters, CollectionForm, Page};

const BASE: &str = "/api/collections";

pub struct CollectionsService<'a> {
    api: &'a ApiClient,
}

impl<'a> CollectionsService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, filters: &CollectionFilters) -> ClientResult<Page<CollectionAction>> {
        let mut filters = filters.clone();
        filters.page_size.get_or_insert(self.api.page_size());
        self.api.get_with(BASE, &filters).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<CollectionAction> {
        self.api.get(&item_path(BASE, id, None)).await
    }

    /// Log a contact attempt
    pub async fn create(&self, form: &CollectionForm) -> ClientResult<CollectionAction> {
        validate_collection(form)?;
        self.api.post(BASE, form).await
    }
}
