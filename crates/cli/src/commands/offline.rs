//! Commands that never reach the backend

use crate::CalcAction;
use ancla_core::constants::MAX_LTV;
use ancla_core::finance::{amortized_payment, annual_to_periodic, loan_to_value, total_interest};
use ancla_core::money::{format_percentage, format_quetzales};
use ancla_core::{authorize, AuthState, Decimal, GuardDecision, Role};
use ancla_reports::{
    detail_report, AmortizationReport, ExportFormat, InstallmentPlanReport, ReportData, TableReport,
};
use anyhow::{Context, Result};
use chrono::Local;

pub fn calc(action: CalcAction, format: ExportFormat) -> Result<()> {
    let report = calc_report(action)?;
    print!("{}", format.render(report.as_ref()));
    Ok(())
}

fn monthly(rate: Decimal, annual: bool) -> Decimal {
    if annual {
        annual_to_periodic(rate)
    } else {
        rate
    }
}

fn calc_report(action: CalcAction) -> Result<Box<dyn ReportData>> {
    let report: Box<dyn ReportData> = match action {
        CalcAction::Payment {
            principal,
            rate,
            months,
            annual,
        } => Box::new(payment_quote(principal, monthly(rate, annual), months)?),

        CalcAction::Ltv {
            amount,
            property_value,
        } => Box::new(ltv_quote(amount, property_value)),

        CalcAction::Table {
            principal,
            rate,
            months,
            annual,
        } => Box::new(
            AmortizationReport::new(principal, monthly(rate, annual), months)
                .context("Cannot build amortization table")?,
        ),

        CalcAction::Schedule {
            principal,
            rate,
            months,
            start,
        } => {
            let start = start.unwrap_or_else(|| Local::now().date_naive());
            Box::new(
                InstallmentPlanReport::new(principal, rate, months, start)
                    .context("Cannot build payment plan")?,
            )
        }
    };
    Ok(report)
}

fn payment_quote(principal: Decimal, rate: Decimal, months: u32) -> Result<TableReport> {
    let payment = amortized_payment(principal, rate, months).context("Cannot compute payment")?;
    let interest = total_interest(principal, rate, months).context("Cannot compute interest")?;
    Ok(detail_report(
        "Cuota Nivelada",
        vec![
            ("Principal", format_quetzales(principal)),
            ("Monthly Rate", format_percentage(rate)),
            ("Months", months.to_string()),
            ("Monthly Payment", format_quetzales(payment)),
            ("Total Interest", format_quetzales(interest)),
            ("Total Repayment", format_quetzales(principal + interest)),
        ],
    ))
}

fn ltv_quote(amount: Decimal, property_value: Decimal) -> TableReport {
    let mut fields = vec![
        ("Loan Amount", format_quetzales(amount)),
        ("Property Value", format_quetzales(property_value)),
    ];
    if property_value <= Decimal::ZERO {
        fields.push(("LTV", "n/a (no collateral value)".to_string()));
    } else {
        let ltv = loan_to_value(amount, property_value);
        fields.push(("LTV", format_percentage(ltv)));
        fields.push(("Maximum", format_percentage(MAX_LTV)));
        fields.push((
            "Within Limit",
            if ltv <= MAX_LTV { "yes" } else { "no" }.to_string(),
        ));
    }
    detail_report("Loan-to-Value", fields)
}

pub fn route(role: Option<Role>, loading: bool, path: &str) -> Result<()> {
    let decision = decide(role, loading, path);
    println!("{} {} -> {}", auth_state(role, loading), path, decision);
    if let Some(target) = decision.redirect_target() {
        println!("navigate to {}", target);
    }
    Ok(())
}

fn auth_state(role: Option<Role>, loading: bool) -> AuthState {
    match (role, loading) {
        (_, true) => AuthState::Loading,
        (Some(role), false) => AuthState::Authenticated(role),
        (None, false) => AuthState::Unauthenticated,
    }
}

fn decide(role: Option<Role>, loading: bool, path: &str) -> GuardDecision {
    authorize(auth_state(role, loading), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn value(report: &TableReport, field: &str) -> String {
        report
            .rows()
            .into_iter()
            .find(|row| row[0] == field)
            .map(|row| row[1].clone())
            .unwrap_or_default()
    }

    #[test]
    fn test_payment_quote() {
        let report = payment_quote(dec!(150000), dec!(0.10), 12).unwrap();
        assert_eq!(value(&report, "Monthly Payment"), "Q22,014.50");
        assert_eq!(value(&report, "Monthly Rate"), "10.00%");
    }

    #[test]
    fn test_annual_rate_is_split_by_month() {
        assert_eq!(monthly(dec!(0.12), true), dec!(0.01));
        assert_eq!(monthly(dec!(0.12), false), dec!(0.12));
    }

    #[test]
    fn test_ltv_quote() {
        let report = ltv_quote(dec!(110000), dec!(250000));
        assert_eq!(value(&report, "LTV"), "44.00%");
        assert_eq!(value(&report, "Within Limit"), "no");

        let report = ltv_quote(dec!(50000), Decimal::ZERO);
        assert_eq!(value(&report, "LTV"), "n/a (no collateral value)");
    }

    #[test]
    fn test_calc_rejects_zero_term() {
        let action = CalcAction::Table {
            principal: dec!(1000),
            rate: dec!(0.1),
            months: 0,
            annual: false,
        };
        assert!(calc_report(action).is_err());
    }

    #[test]
    fn test_route_decisions() {
        assert_eq!(decide(None, true, "/loans"), GuardDecision::Wait);
        assert_eq!(
            decide(None, false, "/loans/7"),
            GuardDecision::RedirectToLogin {
                return_to: "/loans/7".to_string()
            }
        );
        assert_eq!(
            decide(Some(Role::Borrower), false, "/collections"),
            GuardDecision::RedirectToHome { route: "/my-loans" }
        );
        assert_eq!(decide(Some(Role::Collections), false, "/collections"), GuardDecision::Allow);
    }
}
