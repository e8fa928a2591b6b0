//! Payments, collections and documents

use crate::context::{AppContext, ClientResultExt};
use crate::{CollectionAction, DocumentAction, PaymentAction};
use ancla_client::DocumentUpload;
use ancla_core::money::format_quetzales;
use ancla_core::{CollectionFilters, CollectionForm, DocumentFilters, PaymentFilters, PaymentForm, PaymentSummary};
use ancla_reports::{CollectionsLogReport, OverdueReport, TableReport};
use anyhow::Result;
use chrono::Local;

pub async fn payments(ctx: &AppContext, action: PaymentAction) -> Result<()> {
    match action {
        PaymentAction::List {
            loan,
            from,
            to,
            page,
        } => {
            ctx.require("/payments").await?;
            let filters = PaymentFilters {
                loan_id: loan,
                from_date: from,
                to_date: to,
                page,
                ..PaymentFilters::default()
            };
            let page = ctx.api.payments().list(&filters).await.or_describe()?;
            let summary = PaymentSummary::from_payments(&page.data);

            let mut report = TableReport::new(
                "Pagos",
                &["Date", "Loan", "Type", "Method", "Amount", "Reference"],
            )
            .with_summary("Payments", summary.count)
            .with_summary("Total", format_quetzales(summary.total))
            .with_summary("Interest", format_quetzales(summary.interest))
            .with_summary("Principal", format_quetzales(summary.principal))
            .with_summary("Late Fees", format_quetzales(summary.late_fees));
            for p in &page.data {
                report.push_row(vec![
                    p.created_at
                        .map(|t| t.date_naive().to_string())
                        .unwrap_or_default(),
                    p.loan_id.clone(),
                    p.payment_type.label().to_string(),
                    p.payment_method.label().to_string(),
                    format_quetzales(p.amount),
                    p.reference_number.clone().unwrap_or_default(),
                ]);
            }
            ctx.print(&report);
        }

        PaymentAction::Record {
            loan_id,
            amount,
            payment_type,
            method,
            schedule,
            reference,
            notes,
        } => {
            ctx.require("/payments/new").await?;
            let form = PaymentForm {
                loan_id,
                schedule_id: schedule,
                amount,
                payment_type,
                payment_method: method,
                reference_number: reference,
                notes,
            };
            let payment = ctx.api.payments().create(&form).await.or_describe()?;
            println!(
                "✅ {} payment of {} recorded on loan {}",
                payment.payment_type.label(),
                format_quetzales(payment.amount),
                payment.loan_id
            );
        }

        PaymentAction::Overdue => {
            ctx.require("/payments/overdue").await?;
            let entries = ctx.api.payments().overdue().await.or_describe()?;
            let today = Local::now().date_naive();
            ctx.print(&OverdueReport::new(entries.into_vec(), today));
        }
    }

    Ok(())
}

pub async fn collections(ctx: &AppContext, action: CollectionAction) -> Result<()> {
    match action {
        CollectionAction::List { loan, page } => {
            ctx.require("/collections").await?;
            let title = match &loan {
                Some(id) => format!("Cobros {}", id),
                None => "Cobros".to_string(),
            };
            let filters = CollectionFilters {
                loan_id: loan,
                page,
                ..CollectionFilters::default()
            };
            let page = ctx.api.collections().list(&filters).await.or_describe()?;
            let today = Local::now().date_naive();
            ctx.print(&CollectionsLogReport::new(&title, page.data, today));
        }

        CollectionAction::Log {
            loan_id,
            action_type,
            contact,
            phone,
            outcome,
            promise_amount,
            promise_date,
            extension_date,
            notes,
        } => {
            ctx.require(&format!("/collections/new/{}", loan_id)).await?;
            let form = CollectionForm {
                loan_id,
                action_type,
                contacted_person: contact,
                contact_phone: phone,
                outcome,
                promise_amount,
                promise_date,
                extension_date,
                notes,
            };
            let logged = ctx.api.collections().create(&form).await.or_describe()?;
            println!(
                "✅ {} logged on loan {}",
                logged.action_type.label(),
                logged.loan_id
            );
        }
    }

    Ok(())
}

pub async fn documents(ctx: &AppContext, action: DocumentAction) -> Result<()> {
    ctx.require("/documents").await?;

    match action {
        DocumentAction::List {
            loan,
            borrower,
            document_type,
        } => {
            let filters = DocumentFilters {
                document_type,
                loan_id: loan,
                borrower_id: borrower,
                ..DocumentFilters::default()
            };
            let page = ctx.api.documents().list(&filters).await.or_describe()?;

            let mut report = TableReport::new(
                "Documentos",
                &["ID", "Type", "File", "Linked To", "Status", "Version", "Uploaded"],
            )
            .with_summary("Total", page.total);
            for d in &page.data {
                let linked = [
                    d.loan_id.as_ref().map(|id| format!("loan {}", id)),
                    d.borrower_id.as_ref().map(|id| format!("borrower {}", id)),
                    d.property_id.as_ref().map(|id| format!("property {}", id)),
                ]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(", ");
                report.push_row(vec![
                    d.id.clone(),
                    d.document_type.label().to_string(),
                    d.file_name.clone(),
                    linked,
                    d.status.label().to_string(),
                    d.version.to_string(),
                    d.uploaded_at
                        .map(|t| t.date_naive().to_string())
                        .unwrap_or_default(),
                ]);
            }
            ctx.print(&report);
        }

        DocumentAction::Upload {
            file,
            document_type,
            loan,
            borrower,
            property,
            notes,
        } => {
            let mut upload = DocumentUpload::from_path(document_type, &file)
                .await
                .or_describe()?;
            if let Some(id) = loan {
                upload = upload.for_loan(id);
            }
            if let Some(id) = borrower {
                upload = upload.for_borrower(id);
            }
            if let Some(id) = property {
                upload = upload.for_property(id);
            }
            upload.notes = notes;

            let document = ctx.api.documents().upload(upload).await.or_describe()?;
            println!(
                "✅ {} uploaded as {} (version {})",
                document.file_name, document.id, document.version
            );
        }

        DocumentAction::Delete { id } => {
            ctx.api.documents().delete(&id).await.or_describe()?;
            println!("✅ Document {} deleted", id);
        }
    }

    Ok(())
}
