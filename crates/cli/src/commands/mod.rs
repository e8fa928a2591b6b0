//! Subcommand handlers

pub mod auth;
pub mod loans;
pub mod offline;
pub mod parties;
pub mod servicing;
