//! # Ancla Core
//!
//! Domain layer for the Ancla loan-management client: the records exchanged
//! with the backend, the amortization calculator, the route guard and the
//! client-side validation rules. No I/O happens here.
//!
//! ## Modules
//!
//! - [`finance`] - payments, interest, LTV, schedules
//! - [`access`] - route table and guard decision
//! - [`model`] - backend records, filters and form payloads
//! - [`validation`] - form checks before submission
//! - [`money`] - Quetzal formatting and rounding

pub mod access;
pub mod constants;
pub mod error;
pub mod finance;
pub mod model;
pub mod money;
pub mod validation;

pub use access::{authorize, home_route, AuthState, GuardDecision};
pub use error::{CoreError, CoreResult, FieldErrors};
pub use model::*;
pub use rust_decimal::Decimal;
