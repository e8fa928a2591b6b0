//! # Finance Module
//!
//! Closed-form loan arithmetic: level annuity payment, total interest,
//! loan-to-value, and the schedules derived from them.
//!
//! Rates are *periodic* (per installment). Products in this portfolio are
//! quoted monthly, so a 10% rate over 12 periods means 10% per month.

use crate::constants::MAX_TERM_MONTHS;
use crate::error::{CoreError, CoreResult};
use crate::money::round_money;
use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

fn check_inputs(principal: Decimal, rate: Decimal, periods: u32) -> CoreResult<()> {
    if principal <= Decimal::ZERO {
        return Err(CoreError::InvalidAmount(format!(
            "principal must be positive: {}",
            principal
        )));
    }
    if rate.is_sign_negative() && !rate.is_zero() {
        return Err(CoreError::InvalidRate(rate));
    }
    if periods == 0 || periods > MAX_TERM_MONTHS {
        return Err(CoreError::InvalidTerm(periods));
    }
    Ok(())
}

/// Level payment that fully amortizes `principal` over `periods` at `rate`.
///
/// `A = P·r·(1+r)^n / ((1+r)^n − 1)`, or `P/n` when `r` is exactly zero.
///
/// # Examples
/// ```
/// use ancla_core::finance::amortized_payment;
/// use rust_decimal::Decimal;
///
/// let payment = amortized_payment(Decimal::from(1200), Decimal::ZERO, 12).unwrap();
/// assert_eq!(payment, Decimal::from(100));
/// ```
pub fn amortized_payment(principal: Decimal, rate: Decimal, periods: u32) -> CoreResult<Decimal> {
    check_inputs(principal, rate, periods)?;
    let n = Decimal::from(periods);

    if rate.is_zero() {
        return Ok(principal / n);
    }

    let growth = (Decimal::ONE + rate)
        .checked_powu(u64::from(periods))
        .ok_or(CoreError::Overflow("(1 + r)^n"))?;
    let denominator = growth - Decimal::ONE;

    // growth rounded back to exactly 1: the rate is below decimal precision
    if denominator.is_zero() {
        return Ok(principal / n);
    }

    principal
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(growth))
        .and_then(|v| v.checked_div(denominator))
        .ok_or(CoreError::Overflow("amortized payment"))
}

/// Total interest paid over the life of an amortized loan: `A·n − P`.
pub fn total_interest(principal: Decimal, rate: Decimal, periods: u32) -> CoreResult<Decimal> {
    let payment = amortized_payment(principal, rate, periods)?;
    payment
        .checked_mul(Decimal::from(periods))
        .map(|total| total - principal)
        .ok_or(CoreError::Overflow("total interest"))
}

/// Loan-to-value ratio. Zero when the collateral value is not positive.
///
/// A zero result does not mean "no risk": callers have to look at
/// `property_value` before reading anything into it. A ratio beyond the
/// decimal range saturates at `Decimal::MAX` (or `MIN` for a negative amount).
pub fn loan_to_value(loan_amount: Decimal, property_value: Decimal) -> Decimal {
    if property_value <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    loan_amount
        .checked_div(property_value)
        .unwrap_or(if loan_amount.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
}

/// Annual nominal rate to a monthly periodic rate.
pub fn annual_to_periodic(annual_rate: Decimal) -> Decimal {
    annual_rate / Decimal::from(12)
}

/// One period of an amortization table, rounded to cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationRow {
    pub number: u32,
    pub payment: Decimal,
    pub interest: Decimal,
    pub principal: Decimal,
    pub balance: Decimal,
}

/// Full amortization table. The last row absorbs rounding so the balance
/// ends at exactly zero.
pub fn amortization_table(
    principal: Decimal,
    rate: Decimal,
    periods: u32,
) -> CoreResult<Vec<AmortizationRow>> {
    let payment = round_money(amortized_payment(principal, rate, periods)?);
    let mut balance = principal;
    let mut rows = Vec::with_capacity(periods as usize);

    for number in 1..=periods {
        let interest = round_money(balance * rate);
        let (principal_part, row_payment) = if number == periods {
            (balance, balance + interest)
        } else {
            let part = (payment - interest).min(balance);
            (part, payment)
        };
        balance -= principal_part;

        rows.push(AmortizationRow {
            number,
            payment: row_payment,
            interest,
            principal: principal_part,
            balance,
        });
    }

    Ok(rows)
}

/// Installment of an interest-only loan with a balloon principal payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledInstallment {
    pub number: u32,
    pub due_date: NaiveDate,
    pub principal_due: Decimal,
    pub interest_due: Decimal,
}

impl ScheduledInstallment {
    pub fn total_due(&self) -> Decimal {
        self.principal_due + self.interest_due
    }
}

/// Schedule generated when a loan is activated: interest `P·r` every month,
/// the whole principal due with the last installment.
pub fn interest_only_schedule(
    principal: Decimal,
    rate: Decimal,
    periods: u32,
    start: NaiveDate,
) -> CoreResult<Vec<ScheduledInstallment>> {
    check_inputs(principal, rate, periods)?;
    let monthly_interest = round_money(
        principal
            .checked_mul(rate)
            .ok_or(CoreError::Overflow("monthly interest"))?,
    );

    (1..=periods)
        .map(|number| {
            let due_date = add_months(start, number)?;
            let principal_due = if number == periods {
                principal
            } else {
                Decimal::ZERO
            };
            Ok(ScheduledInstallment {
                number,
                due_date,
                principal_due,
                interest_due: monthly_interest,
            })
        })
        .collect()
}

/// Late fee on an overdue installment: `(principal + interest)·rate`.
pub fn late_fee(principal_due: Decimal, interest_due: Decimal, fee_rate: Decimal) -> CoreResult<Decimal> {
    principal_due
        .checked_add(interest_due)
        .and_then(|due| due.checked_mul(fee_rate))
        .map(round_money)
        .ok_or(CoreError::Overflow("late fee"))
}

/// Date of the last installment.
pub fn maturity_date(start: NaiveDate, periods: u32) -> CoreResult<NaiveDate> {
    add_months(start, periods)
}

fn add_months(start: NaiveDate, months: u32) -> CoreResult<NaiveDate> {
    start
        .checked_add_months(Months::new(months))
        .ok_or(CoreError::Overflow("due date"))
}

/// Cost of an interest-only loan as the portfolio quotes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanCost {
    pub monthly_interest: Decimal,
    pub total_interest: Decimal,
    pub total_repayment: Decimal,
}

impl LoanCost {
    pub fn interest_only(principal: Decimal, rate: Decimal, periods: u32) -> CoreResult<Self> {
        check_inputs(principal, rate, periods)?;
        let monthly_interest = principal
            .checked_mul(rate)
            .ok_or(CoreError::Overflow("monthly interest"))?;
        let total_interest = monthly_interest
            .checked_mul(Decimal::from(periods))
            .ok_or(CoreError::Overflow("total interest"))?;
        let total_repayment = principal
            .checked_add(total_interest)
            .ok_or(CoreError::Overflow("total repayment"))?;
        Ok(Self {
            monthly_interest,
            total_interest,
            total_repayment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_zero_rate_is_straight_division() {
        for (p, n) in [(dec!(150000), 12), (dec!(1000), 3), (dec!(10000.50), 7)] {
            assert_eq!(amortized_payment(p, Decimal::ZERO, n).unwrap(), p / Decimal::from(n));
        }
    }

    #[test]
    fn test_regression_fixture() {
        let payment = amortized_payment(dec!(150000), dec!(0.10), 12).unwrap();
        assert_eq!(round_money(payment), dec!(22014.50));
    }

    #[test]
    fn test_total_interest_consistency() {
        for (p, r, n) in [
            (dec!(150000), dec!(0.10), 12),
            (dec!(25000), dec!(0.035), 6),
            (dec!(500000), dec!(0.08), 36),
        ] {
            let a = amortized_payment(p, r, n).unwrap();
            let interest = total_interest(p, r, n).unwrap();
            assert_eq!(a * Decimal::from(n) - p, interest);
            assert!(interest > Decimal::ZERO);
        }
    }

    #[test]
    fn test_monotonic_in_rate() {
        let p = dec!(100000);
        let payments: Vec<Decimal> = [dec!(0), dec!(0.01), dec!(0.05), dec!(0.10), dec!(0.25)]
            .into_iter()
            .map(|r| amortized_payment(p, r, 12).unwrap())
            .collect();
        assert!(payments.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_monotonic_in_term() {
        let p = dec!(100000);
        let payments: Vec<Decimal> = [1u32, 3, 6, 12, 24, 60]
            .into_iter()
            .map(|n| amortized_payment(p, dec!(0.10), n).unwrap())
            .collect();
        assert!(payments.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_single_period() {
        let payment = amortized_payment(dec!(1000), dec!(0.10), 1).unwrap();
        assert_eq!(round_money(payment), dec!(1100.00));
    }

    #[test]
    fn test_tiny_rate_does_not_divide_by_zero() {
        let payment = amortized_payment(dec!(1200), dec!(0.0000000000000000000000000001), 12).unwrap();
        assert_eq!(round_money(payment), dec!(100.00));
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            amortized_payment(dec!(1000), dec!(0.1), 0),
            Err(CoreError::InvalidTerm(0))
        ));
        assert!(matches!(
            amortized_payment(dec!(0), dec!(0.1), 12),
            Err(CoreError::InvalidAmount(_))
        ));
        assert!(matches!(
            amortized_payment(dec!(1000), dec!(-0.1), 12),
            Err(CoreError::InvalidRate(_))
        ));
    }

    #[test]
    fn test_term_above_limit_is_rejected() {
        let too_long = MAX_TERM_MONTHS + 1;
        assert!(amortized_payment(dec!(1000), dec!(0.1), MAX_TERM_MONTHS).is_ok());
        assert!(matches!(
            amortization_table(dec!(1000), Decimal::ZERO, u32::MAX),
            Err(CoreError::InvalidTerm(u32::MAX))
        ));
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!(matches!(
            interest_only_schedule(dec!(1000), dec!(0.1), too_long, start),
            Err(CoreError::InvalidTerm(_))
        ));
        assert!(LoanCost::interest_only(dec!(1000), dec!(0.1), too_long).is_err());
    }

    #[test]
    fn test_huge_amounts_overflow_without_panicking() {
        let huge = dec!(40000000000000000000000000000);
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();

        assert!(matches!(
            LoanCost::interest_only(huge, dec!(1), 2),
            Err(CoreError::Overflow(_))
        ));
        assert!(matches!(
            interest_only_schedule(huge, dec!(3), 2, start),
            Err(CoreError::Overflow(_))
        ));
        assert!(matches!(late_fee(huge, huge, dec!(1)), Err(CoreError::Overflow(_))));
        assert_eq!(loan_to_value(Decimal::MAX, dec!(0.5)), Decimal::MAX);
        assert_eq!(loan_to_value(Decimal::MIN, dec!(0.5)), Decimal::MIN);
    }

    #[test]
    fn test_overflow_is_an_error() {
        let result = amortized_payment(dec!(1000), dec!(10), 200);
        assert!(matches!(result, Err(CoreError::Overflow(_))));
    }

    #[test]
    fn test_loan_to_value() {
        assert_eq!(loan_to_value(dec!(0), dec!(250000)), Decimal::ZERO);
        assert_eq!(loan_to_value(dec!(100000), dec!(250000)), dec!(0.4));
        assert_eq!(loan_to_value(dec!(100000), dec!(0)), Decimal::ZERO);
        assert_eq!(loan_to_value(dec!(100000), dec!(-5)), Decimal::ZERO);
    }

    #[test]
    fn test_annual_to_periodic() {
        assert_eq!(annual_to_periodic(dec!(0.12)), dec!(0.01));
    }

    #[test]
    fn test_amortization_table_closes_balance() {
        let rows = amortization_table(dec!(150000), dec!(0.10), 12).unwrap();
        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0].interest, dec!(15000.00));
        assert_eq!(rows[0].payment, dec!(22014.50));
        assert_eq!(rows.last().unwrap().balance, Decimal::ZERO);

        let principal_sum: Decimal = rows.iter().map(|r| r.principal).sum();
        assert_eq!(principal_sum, dec!(150000));
    }

    #[test]
    fn test_interest_only_schedule() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        let schedule = interest_only_schedule(dec!(50000), dec!(0.10), 3, start).unwrap();

        assert_eq!(schedule.len(), 3);
        assert_eq!(schedule[0].due_date, NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
        assert_eq!(schedule[2].due_date, NaiveDate::from_ymd_opt(2026, 4, 30).unwrap());
        assert!(schedule.iter().all(|s| s.interest_due == dec!(5000.00)));
        assert_eq!(schedule[0].principal_due, Decimal::ZERO);
        assert_eq!(schedule[2].principal_due, dec!(50000));
        assert_eq!(schedule[2].total_due(), dec!(55000.00));
    }

    #[test]
    fn test_late_fee_and_maturity() {
        assert_eq!(late_fee(dec!(0), dec!(5000), dec!(0.05)).unwrap(), dec!(250.00));
        let start = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        assert_eq!(
            maturity_date(start, 6).unwrap(),
            NaiveDate::from_ymd_opt(2026, 9, 15).unwrap()
        );
    }

    #[test]
    fn test_interest_only_cost() {
        let cost = LoanCost::interest_only(dec!(100000), dec!(0.10), 6).unwrap();
        assert_eq!(cost.monthly_interest, dec!(10000.00));
        assert_eq!(cost.total_interest, dec!(60000.00));
        assert_eq!(cost.total_repayment, dec!(160000.00));
    }
}
