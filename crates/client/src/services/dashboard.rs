use crate::error::ClientResult;
use crate::http::ApiClient;
use ancla_core::{DashboardMetrics, PortfolioSummary};

const BASE: &str = "/api/dashboard";

pub struct DashboardService<'a> {
    api: &'a ApiClient,
}

impl<'a> DashboardService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn metrics(&self) -> ClientResult<DashboardMetrics> {
        self.api.get(&format!("{}/metrics", BASE)).await
    }

    pub async fn portfolio(&self) -> ClientResult<PortfolioSummary> {
        self.api.get(&format!("{}/portfolio", BASE)).await
    }
}
