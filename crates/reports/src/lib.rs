//! # Ancla Reports
//!
//! Tabular reports over loan data, rendered as a terminal table, CSV, JSON
//! or Markdown.
//!
//! ## Exporters
//!
//! - [`TableExporter`] - aligned columns for the terminal
//! - [`CsvExporter`] - CSV with quoting
//! - [`JsonExporter`] - `{title, summary, data}`, pretty or compact
//! - [`MarkdownExporter`] - Markdown tables
//!
//! ## Reports
//!
//! - [`LoanPortfolioReport`], [`DashboardReport`]
//! - [`AmortizationReport`], [`InstallmentPlanReport`] - offline quotes
//! - [`PaymentScheduleReport`], [`OverdueReport`]
//! - [`CollectionsLogReport`]
//! - [`TableReport`] - plain record listings
//!
//! ## Example
//!
//! ```rust,ignore
//! use ancla_reports::{AmortizationReport, ExportFormat};
//!
//! let report = AmortizationReport::new(dec!(150000), dec!(0.10), 12)?;
//! println!("{}", ExportFormat::Markdown.render(&report));
//! ```

pub mod collections;
pub mod exporters;
pub mod portfolio;
pub mod schedules;
pub mod table;

pub use collections::CollectionsLogReport;
pub use exporters::{
    CsvExporter, ExportFormat, JsonExporter, MarkdownExporter, ReportData, ReportExporter,
    TableExporter,
};
pub use portfolio::{DashboardReport, LoanPortfolioReport};
pub use schedules::{AmortizationReport, InstallmentPlanReport, OverdueReport, PaymentScheduleReport};
pub use table::{detail_report, TableReport};
