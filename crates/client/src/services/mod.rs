//! Per-resource services
//!
//! Thin typed wrappers over [`ApiClient`], one per backend collection.
//! Obtain them from the client: `client.loans().list(&filters)`.

mod auth;
mod borrowers;
mod collections;
mod dashboard;
mod documents;
mod loans;
mod payments;
mod properties;

pub use auth::AuthService;
pub use borrowers::BorrowersService;
pub use collections::CollectionsService;
pub use dashboard::DashboardService;
pub use documents::{DocumentUpload, DocumentsService};
pub use loans::LoansService;
pub use payments::PaymentsService;
pub use properties::PropertiesService;

use crate::http::ApiClient;

impl ApiClient {
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self)
    }

    pub fn loans(&self) -> LoansService<'_> {
        LoansService::new(self)
    }

    pub fn borrowers(&self) -> BorrowersService<'_> {
        BorrowersService::new(self)
    }

    pub fn properties(&self) -> PropertiesService<'_> {
        PropertiesService::new(self)
    }

    pub fn payments(&self) -> PaymentsService<'_> {
        PaymentsService::new(self)
    }

    pub fn collections(&self) -> CollectionsService<'_> {
        CollectionsService::new(self)
    }

    pub fn documents(&self) -> DocumentsService<'_> {
        DocumentsService::new(self)
    }

    pub fn dashboard(&self) -> DashboardService<'_> {
        DashboardService::new(self)
    }
}

/// `base/id` or `base/id/suffix`
fn item_path(base: &str, id: &str, suffix: Option<&str>) -> String {
    match suffix {
        Some(suffix) => format!("{}/{}/{}", base, id, suffix),
        None => format!("{}/{}", base, id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_path() {
        assert_eq!(item_path("/api/loans", "7", None), "/api/loans/7");
        assert_eq!(item_path("/api/loans", "7", Some("schedule")), "/api/loans/7/schedule");
    }
}
