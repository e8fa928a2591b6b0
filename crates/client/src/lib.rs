//! # Ancla Client
//!
//! Async REST client for the Ancla backend.
//!
//! ## Pieces
//!
//! - [`SessionContext`] - tokens, current user and the observable auth state
//! - [`ApiClient`] - request pipeline with single-flight 401 refresh and retry
//! - [`ResponseCache`] - GET responses kept for the configured TTL
//! - [`ViewScope`] - drops results for views that were left
//! - [`services`] - one typed service per backend collection
//!
//! ```no_run
//! # async fn demo() -> ancla_client::ClientResult<()> {
//! use ancla_client::{ApiClient, SessionContext};
//! use std::sync::Arc;
//!
//! let config = ancla_config::AnclaConfig::default();
//! let session = Arc::new(SessionContext::in_memory());
//! let api = ApiClient::from_config(&config, session)?;
//! api.auth().bootstrap().await;
//! let page = api.loans().list(&Default::default()).await?;
//! println!("{} loans", page.total);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod credentials;
pub mod error;
pub mod http;
pub mod scope;
pub mod services;
pub mod session;

pub use cache::{Generation, ResponseCache};
pub use credentials::{CredentialStore, Credentials, FileCredentialStore, MemoryCredentialStore};
pub use error::{ApiError, ClientError, ClientResult};
pub use http::{ApiClient, Upload};
pub use scope::ViewScope;
pub use services::{
    AuthService, BorrowersService, CollectionsService, DashboardService, DocumentUpload,
    DocumentsService, LoansService, PaymentsService, PropertiesService,
};
pub use session::SessionContext;
