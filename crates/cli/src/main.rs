//! Ancla CLI - loan management from the command line
//!
//! Usage:
//! ```bash
//! ancla login --email ana@ancla.gt
//! ancla dashboard
//! ancla loans list --status Active --format csv
//! ancla loans schedule 42
//! ancla payments record 42 1500 --type Interest --method Transfer
//! ancla calc payment 150000 0.10 12
//! ancla route --role Borrower /collections
//! ```

use ancla_core::{
    CollectionActionType, DocumentType, LoanStatus, PaymentMethod, PaymentType, RiskTier, Role,
    VerificationStatus,
};
use ancla_reports::ExportFormat;
use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

mod commands;
mod context;

use commands::{auth, loans, offline, parties, servicing};
use context::AppContext;

/// Ancla - land-secured microloans for Guatemala
#[derive(Parser)]
#[command(name = "ancla")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to $ANCLA_CONFIG, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend origin, overrides the configuration
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(long, global = true, default_value = "table")]
    pub format: ExportFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session
    Login {
        #[arg(long, short)]
        email: String,
        /// Read from stdin when omitted
        #[arg(long, env = "ANCLA_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// End the session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Portfolio metrics
    Dashboard,

    /// Loan origination and servicing
    Loans {
        #[command(subcommand)]
        action: LoanAction,
    },

    Borrowers {
        #[command(subcommand)]
        action: BorrowerAction,
    },

    Properties {
        #[command(subcommand)]
        action: PropertyAction,
    },

    Payments {
        #[command(subcommand)]
        action: PaymentAction,
    },

    Collections {
        #[command(subcommand)]
        action: CollectionAction,
    },

    Documents {
        #[command(subcommand)]
        action: DocumentAction,
    },

    /// Loan arithmetic, no backend needed
    Calc {
        #[command(subcommand)]
        action: CalcAction,
    },

    /// Show how the route guard decides a navigation
    Route {
        /// Evaluate as this role; unauthenticated when omitted
        #[arg(long)]
        role: Option<Role>,
        /// Treat the session as still loading
        #[arg(long, conflicts_with = "role")]
        loading: bool,
        path: String,
    },
}

#[derive(Subcommand)]
pub enum LoanAction {
    List {
        #[arg(long)]
        status: Option<LoanStatus>,
        #[arg(long)]
        borrower: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        page: Option<u32>,
    },
    Show {
        id: String,
    },
    /// Create a draft loan
    Create {
        #[arg(long)]
        borrower: String,
        #[arg(long)]
        property: String,
        /// `standard` or `premium`
        #[arg(long, default_value = "standard")]
        product: String,
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        term: u32,
        /// Monthly rate; the product default when omitted
        #[arg(long)]
        rate: Option<Decimal>,
    },
    /// Send a draft to review
    Submit {
        id: String,
    },
    Approve {
        id: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Disburse an approved loan
    Activate {
        id: String,
    },
    Schedule {
        id: String,
    },
    /// Loans of the signed-in borrower
    Mine,
}

#[derive(Subcommand)]
pub enum BorrowerAction {
    List {
        #[arg(long)]
        status: Option<VerificationStatus>,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        page: Option<u32>,
    },
    Show {
        id: String,
    },
    Create {
        #[arg(long)]
        dpi: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        address: String,
        #[arg(long)]
        municipality: String,
        #[arg(long)]
        department: String,
        #[arg(long)]
        income: Option<Decimal>,
        #[arg(long, default_value = "Medium")]
        risk: RiskTier,
    },
    Verify {
        id: String,
        #[arg(long, default_value = "Verified")]
        status: VerificationStatus,
    },
}

#[derive(Subcommand)]
pub enum PropertyAction {
    List {
        #[arg(long)]
        status: Option<VerificationStatus>,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        page: Option<u32>,
    },
    Show {
        id: String,
    },
    Create {
        #[arg(long)]
        finca: String,
        #[arg(long)]
        folio: String,
        #[arg(long)]
        libro: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        municipality: String,
        #[arg(long)]
        department: String,
        #[arg(long)]
        area: Decimal,
        #[arg(long)]
        value: Decimal,
        #[arg(long)]
        appraisal: Option<Decimal>,
    },
    Verify {
        id: String,
        #[arg(long, default_value = "Verified")]
        status: VerificationStatus,
    },
}

#[derive(Subcommand)]
pub enum PaymentAction {
    List {
        #[arg(long)]
        loan: Option<String>,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long)]
        page: Option<u32>,
    },
    /// Record a received payment
    Record {
        loan_id: String,
        amount: Decimal,
        #[arg(long = "type", default_value = "Interest")]
        payment_type: PaymentType,
        #[arg(long, default_value = "Cash")]
        method: PaymentMethod,
        #[arg(long)]
        schedule: Option<String>,
        #[arg(long)]
        reference: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Installments past due
    Overdue,
}

#[derive(Subcommand)]
pub enum CollectionAction {
    List {
        #[arg(long)]
        loan: Option<String>,
        #[arg(long)]
        page: Option<u32>,
    },
    /// Log a contact attempt
    Log {
        loan_id: String,
        #[arg(long = "type")]
        action_type: CollectionActionType,
        #[arg(long)]
        contact: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        outcome: Option<String>,
        #[arg(long)]
        promise_amount: Option<Decimal>,
        #[arg(long)]
        promise_date: Option<NaiveDate>,
        #[arg(long)]
        extension_date: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum DocumentAction {
    List {
        #[arg(long)]
        loan: Option<String>,
        #[arg(long)]
        borrower: Option<String>,
        #[arg(long = "type")]
        document_type: Option<DocumentType>,
    },
    Upload {
        file: PathBuf,
        #[arg(long = "type")]
        document_type: DocumentType,
        #[arg(long)]
        loan: Option<String>,
        #[arg(long)]
        borrower: Option<String>,
        #[arg(long)]
        property: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum CalcAction {
    /// Level monthly payment
    Payment {
        principal: Decimal,
        /// Monthly rate, e.g. 0.10
        rate: Decimal,
        months: u32,
        /// Treat the rate as annual
        #[arg(long)]
        annual: bool,
    },
    /// Loan-to-value ratio
    Ltv {
        amount: Decimal,
        property_value: Decimal,
    },
    /// Full amortization table
    Table {
        principal: Decimal,
        rate: Decimal,
        months: u32,
        #[arg(long)]
        annual: bool,
    },
    /// Interest-only plan with the principal due at maturity
    Schedule {
        principal: Decimal,
        rate: Decimal,
        months: u32,
        /// Disbursement date, today when omitted
        #[arg(long)]
        start: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.format;

    match cli.command {
        Commands::Calc { action } => {
            context::init_logging(None);
            offline::calc(action, format)
        }
        Commands::Route {
            role,
            loading,
            path,
        } => {
            context::init_logging(None);
            offline::route(role, loading, &path)
        }
        command => {
            let ctx = AppContext::open(cli.config.as_deref(), cli.api_url.as_deref(), format)?;
            dispatch(&ctx, command).await
        }
    }
}

async fn dispatch(ctx: &AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::Login { email, password } => auth::login(ctx, &email, password).await,
        Commands::Logout => auth::logout(ctx).await,
        Commands::Whoami => auth::whoami(ctx).await,
        Commands::Dashboard => loans::dashboard(ctx).await,
        Commands::Loans { action } => loans::handle(ctx, action).await,
        Commands::Borrowers { action } => parties::borrowers(ctx, action).await,
        Commands::Properties { action } => parties::properties(ctx, action).await,
        Commands::Payments { action } => servicing::payments(ctx, action).await,
        Commands::Collections { action } => servicing::collections(ctx, action).await,
        Commands::Documents { action } => servicing::documents(ctx, action).await,
        Commands::Calc { .. } | Commands::Route { .. } => Ok(()),
    }
}
