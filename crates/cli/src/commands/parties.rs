//! Borrowers and the properties pledged as collateral

use crate::context::{AppContext, ClientResultExt};
use crate::{BorrowerAction, PropertyAction};
use ancla_core::money::{format_percentage, format_quetzales};
use ancla_core::{Borrower, BorrowerFilters, BorrowerForm, Property, PropertyFilters, PropertyForm};
use ancla_reports::{detail_report, TableReport};
use anyhow::Result;

pub async fn borrowers(ctx: &AppContext, action: BorrowerAction) -> Result<()> {
    match action {
        BorrowerAction::List {
            status,
            department,
            search,
            page,
        } => {
            ctx.require("/borrowers").await?;
            let filters = BorrowerFilters {
                verification_status: status,
                department,
                search,
                page,
                ..BorrowerFilters::default()
            };
            let page = ctx.api.borrowers().list(&filters).await.or_describe()?;

            let mut report = TableReport::new(
                "Prestatarios",
                &["ID", "DPI", "Name", "Phone", "Department", "Risk", "Status"],
            )
            .with_summary("Total", page.total)
            .with_summary("Page", format!("{} / {}", page.page, page.total_pages.max(1)));
            for b in &page.data {
                report.push_row(vec![
                    b.id.clone(),
                    b.masked_dpi(),
                    b.display_name(),
                    b.phone.clone(),
                    b.department.clone(),
                    b.risk_tier.label().to_string(),
                    b.verification_status.label().to_string(),
                ]);
            }
            ctx.print(&report);
        }

        BorrowerAction::Show { id } => {
            ctx.require(&format!("/borrowers/{}", id)).await?;
            let borrowers = ctx.api.borrowers();
            let (borrower, loans) =
                tokio::try_join!(borrowers.get(&id), borrowers.loans(&id)).or_describe()?;
            let mut report = borrower_detail(&borrower);
            for loan in &loans {
                report.push_row(vec![
                    "Loan".to_string(),
                    format!(
                        "{} {} ({})",
                        loan.reference_number,
                        format_quetzales(loan.amount),
                        loan.status.label()
                    ),
                ]);
            }
            ctx.print(&report);
        }

        BorrowerAction::Create {
            dpi,
            first_name,
            last_name,
            phone,
            email,
            address,
            municipality,
            department,
            income,
            risk,
        } => {
            ctx.require("/borrowers/new").await?;
            let form = BorrowerForm {
                dpi,
                first_name,
                last_name,
                email,
                phone,
                alternate_phone: None,
                address,
                municipality,
                department,
                occupation: None,
                employer: None,
                monthly_income: income,
                risk_tier: risk,
                notes: None,
            };
            let borrower = ctx.api.borrowers().create(&form).await.or_describe()?;
            println!("✅ Borrower {} registered as {}", borrower.display_name(), borrower.id);
        }

        BorrowerAction::Verify { id, status } => {
            ctx.require(&format!("/borrowers/{}/edit", id)).await?;
            let borrower = ctx.api.borrowers().verify(&id, status).await.or_describe()?;
            println!(
                "✅ {} is {}",
                borrower.display_name(),
                borrower.verification_status.label()
            );
        }
    }

    Ok(())
}

pub async fn properties(ctx: &AppContext, action: PropertyAction) -> Result<()> {
    match action {
        PropertyAction::List {
            status,
            department,
            page,
        } => {
            ctx.require("/properties").await?;
            let filters = PropertyFilters {
                verification_status: status,
                department,
                page,
                ..PropertyFilters::default()
            };
            let page = ctx.api.properties().list(&filters).await.or_describe()?;

            let mut report = TableReport::new(
                "Propiedades",
                &["ID", "Registry", "Municipality", "Department", "Collateral", "Status"],
            )
            .with_summary("Total", page.total);
            for p in &page.data {
                report.push_row(vec![
                    p.id.clone(),
                    p.registry_reference(),
                    p.municipality.clone(),
                    p.department.clone(),
                    format_quetzales(p.collateral_value()),
                    p.verification_status.label().to_string(),
                ]);
            }
            ctx.print(&report);
        }

        PropertyAction::Show { id } => {
            ctx.require(&format!("/properties/{}", id)).await?;
            let property = ctx.api.properties().get(&id).await.or_describe()?;
            ctx.print(&property_detail(&property));
        }

        PropertyAction::Create {
            finca,
            folio,
            libro,
            address,
            municipality,
            department,
            area,
            value,
            appraisal,
        } => {
            ctx.require("/properties/new").await?;
            let form = PropertyForm {
                finca,
                folio,
                libro,
                address,
                municipality,
                department,
                area_m2: area,
                market_value: value,
                appraisal_value: appraisal,
                appraisal_date: None,
                latitude: None,
                longitude: None,
                notes: None,
            };
            let property = ctx.api.properties().create(&form).await.or_describe()?;
            println!(
                "✅ Property {} registered as {}",
                property.registry_reference(),
                property.id
            );
        }

        PropertyAction::Verify { id, status } => {
            ctx.require(&format!("/properties/{}/edit", id)).await?;
            let property = ctx.api.properties().verify(&id, status).await.or_describe()?;
            println!(
                "✅ {} is {}",
                property.registry_reference(),
                property.verification_status.label()
            );
        }
    }

    Ok(())
}

fn borrower_detail(b: &Borrower) -> TableReport {
    let mut fields = vec![
        ("DPI", b.masked_dpi()),
        ("Name", b.display_name()),
        ("Phone", b.phone.clone()),
        ("Address", format!("{}, {}, {}", b.address, b.municipality, b.department)),
        ("Risk", b.risk_tier.label().to_string()),
        ("Status", b.verification_status.label().to_string()),
    ];
    if let Some(email) = &b.email {
        fields.push(("Email", email.clone()));
    }
    if let Some(income) = b.monthly_income {
        fields.push(("Monthly Income", format_quetzales(income)));
    }
    if let Some(outstanding) = b.total_outstanding {
        fields.push(("Outstanding", format_quetzales(outstanding)));
    }
    detail_report(format!("Prestatario {}", b.id), fields)
}

fn property_detail(p: &Property) -> TableReport {
    let mut fields = vec![
        ("Registry", p.registry_reference()),
        ("Address", format!("{}, {}, {}", p.address, p.municipality, p.department)),
        ("Market Value", format_quetzales(p.market_value)),
    ];
    if let Some(appraisal) = p.appraisal_value {
        let date = p.appraisal_date.map(|d| format!(" ({})", d)).unwrap_or_default();
        fields.push(("Appraisal", format!("{}{}", format_quetzales(appraisal), date)));
    }
    fields.push(("Collateral", format_quetzales(p.collateral_value())));
    fields.push((
        "Max Loan at LTV Cap",
        format_quetzales(p.collateral_value() * ancla_core::constants::MAX_LTV),
    ));
    fields.push(("LTV Cap", format_percentage(ancla_core::constants::MAX_LTV)));
    fields.push(("Status", p.verification_status.label().to_string()));
    detail_report(format!("Propiedad {}", p.id), fields)
}
