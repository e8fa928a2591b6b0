//! # Model Module
//!
//! Records exchanged with the backend. The backend owns and mutates all of
//! them; the client only holds request-scoped copies.
//!
//! JSON is camelCase, enum values are the PascalCase variant names
//! (`UnderReview`, `LegalReady`, ...).

/// Enum with a wire code, a Spanish display label, `Display` and `FromStr`.
macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident as $kind:literal {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => ($code:literal, $label:literal)
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant
            ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire code
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }

            /// Spanish label for display
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| $crate::error::CoreError::unknown($kind, s))
            }
        }
    };
}

pub mod borrower;
pub mod collection;
pub mod dashboard;
pub mod document;
pub mod loan;
pub mod page;
pub mod payment;
pub mod property;
pub mod serde_util;
pub mod user;

pub use borrower::{Borrower, BorrowerFilters, BorrowerForm, RiskTier, VerificationStatus, VerifyRequest};
pub use collection::{
    CollectionAction, CollectionActionType, CollectionFilters, CollectionForm, CollectionStage,
};
pub use dashboard::{DashboardMetrics, PortfolioPoint, PortfolioStats, PortfolioSummary};
pub use document::{Document, DocumentFilters, DocumentStatus, DocumentType};
pub use loan::{ApprovalRequest, Loan, LoanFilters, LoanForm, LoanProduct, LoanStatus};
pub use page::{DataList, Page};
pub use payment::{
    Payment, PaymentFilters, PaymentForm, PaymentMethod, PaymentScheduleEntry, PaymentSummary,
    PaymentType, ScheduleStatus,
};
pub use property::{Property, PropertyFilters, PropertyForm};
pub use user::{AuthTokens, LoginCredentials, RegisterData, Role, User, UserRole};
