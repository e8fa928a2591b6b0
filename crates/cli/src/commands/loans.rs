//! Loan origination and servicing commands

use crate::context::{AppContext, ClientResultExt};
use crate::LoanAction;
use ancla_client::ClientError;
use ancla_core::money::{format_percentage, format_quetzales};
use ancla_core::validation::{activation_blockers, approval_blockers, validate_loan};
use ancla_core::{Loan, LoanFilters, LoanForm, LoanProduct};
use ancla_reports::{detail_report, DashboardReport, LoanPortfolioReport, PaymentScheduleReport};
use anyhow::{bail, Result};
use chrono::Local;

pub async fn dashboard(ctx: &AppContext) -> Result<()> {
    ctx.require("/dashboard").await?;
    let metrics = ctx.api.dashboard().metrics().await.or_describe()?;
    ctx.print(&DashboardReport::new(metrics));
    Ok(())
}

pub async fn handle(ctx: &AppContext, action: LoanAction) -> Result<()> {
    match action {
        LoanAction::List {
            status,
            borrower,
            search,
            page,
        } => {
            ctx.require("/loans").await?;
            let filters = LoanFilters {
                status,
                borrower_id: borrower,
                search,
                page,
                ..LoanFilters::default()
            };
            let page = ctx.api.loans().list(&filters).await.or_describe()?;
            let title = format!(
                "Préstamos (página {} de {}, {} en total)",
                page.page,
                page.total_pages.max(1),
                page.total
            );
            ctx.print(&LoanPortfolioReport::new(&title, page.data));
        }

        LoanAction::Show { id } => {
            ctx.require(&format!("/loans/{}", id)).await?;
            let loan = ctx.api.loans().get(&id).await.or_describe()?;
            ctx.print(&loan_detail(&loan));
        }

        LoanAction::Create {
            borrower,
            property,
            product,
            amount,
            term,
            rate,
        } => {
            ctx.require("/loans/new").await?;
            let product = match product.to_ascii_lowercase().as_str() {
                "standard" => LoanProduct::standard(),
                "premium" => LoanProduct::premium(),
                other => bail!("Unknown loan product '{}' (standard, premium)", other),
            };
            let collateral = ctx.api.properties().get(&property).await.or_describe()?;

            let form = LoanForm {
                borrower_id: borrower,
                property_id: property,
                loan_product_id: product.id.clone(),
                amount,
                term_months: term,
                interest_rate: rate.unwrap_or(product.default_interest_rate),
            };
            validate_loan(&form, &product, Some(collateral.collateral_value()))
                .map_err(ClientError::from)
                .or_describe()?;

            let loan = ctx.api.loans().create(&form).await.or_describe()?;
            println!(
                "✅ Loan {} created for {} ({})",
                loan.reference_number,
                format_quetzales(loan.amount),
                loan.status.label()
            );
        }

        LoanAction::Submit { id } => {
            ctx.require(&format!("/loans/{}/edit", id)).await?;
            let loan = ctx.api.loans().submit(&id).await.or_describe()?;
            println!("✅ Loan {} is {}", loan.reference_number, loan.status.label());
        }

        LoanAction::Approve { id, notes } => {
            ctx.require(&format!("/loans/{}/edit", id)).await?;
            let loan = ctx.api.loans().get(&id).await.or_describe()?;
            let blockers = approval_blockers(&loan);
            if !blockers.is_empty() {
                bail!("Loan {} cannot be approved:\n  {}", loan.reference_number, blockers.join("\n  "));
            }
            let loan = ctx.api.loans().approve(&id, notes).await.or_describe()?;
            println!("✅ Loan {} is {}", loan.reference_number, loan.status.label());
        }

        LoanAction::Activate { id } => {
            ctx.require(&format!("/loans/{}/edit", id)).await?;
            let loans = ctx.api.loans();
            let (loan, documents) = tokio::try_join!(loans.get(&id), loans.documents(&id)).or_describe()?;
            let blockers = activation_blockers(&loan, &documents);
            if !blockers.is_empty() {
                bail!("Loan {} cannot be activated:\n  {}", loan.reference_number, blockers.join("\n  "));
            }
            let loan = loans.activate(&id).await.or_describe()?;
            println!(
                "✅ Loan {} is {}, matures {}",
                loan.reference_number,
                loan.status.label(),
                loan.maturity_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string())
            );
        }

        LoanAction::Schedule { id } => {
            ctx.require(&format!("/loans/{}", id)).await?;
            let loans = ctx.api.loans();
            let (loan, entries) = tokio::try_join!(loans.get(&id), loans.schedule(&id)).or_describe()?;
            let today = Local::now().date_naive();
            ctx.print(&PaymentScheduleReport::new(&loan.reference_number, entries, today));
        }

        LoanAction::Mine => {
            ctx.require("/my-loans").await?;
            let loans = ctx.api.loans().mine().await.or_describe()?;
            ctx.print(&LoanPortfolioReport::new("Mis Préstamos", loans.into_vec()));
        }
    }

    Ok(())
}

fn loan_detail(loan: &Loan) -> ancla_reports::TableReport {
    let mut fields = vec![
        ("Reference", loan.reference_number.clone()),
        ("Status", loan.status.label().to_string()),
        ("Borrower", loan.borrower_name()),
        ("Amount", format_quetzales(loan.amount)),
        ("Term", format!("{} months", loan.term_months)),
        ("Monthly Rate", format_percentage(loan.interest_rate)),
        ("LTV", format_percentage(loan.computed_ltv().unwrap_or(loan.ltv))),
    ];
    if let Some(property) = &loan.property {
        fields.push(("Property", property.registry_reference()));
    }
    if let Some(department) = loan.department() {
        fields.push(("Department", department.to_string()));
    }
    if let Ok(cost) = loan.cost() {
        fields.push(("Monthly Interest", format_quetzales(cost.monthly_interest)));
        fields.push(("Total Repayment", format_quetzales(cost.total_repayment)));
    }
    if let Some(date) = loan.maturity_date {
        fields.push(("Maturity", date.to_string()));
    }
    if let Some(notes) = &loan.notes {
        fields.push(("Notes", notes.clone()));
    }
    detail_report(format!("Préstamo {}", loan.reference_number), fields)
}
