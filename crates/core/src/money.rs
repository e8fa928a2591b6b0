//! # Money Module
//!
//! Quetzal amounts on top of `rust_decimal` plus the display helpers the
//! views share: currency, percentages and masked national IDs.

use crate::error::{CoreError, CoreResult};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// ISO 4217 code of the Guatemalan quetzal
pub const CURRENCY_CODE: &str = "GTQ";

/// Display symbol
pub const CURRENCY_SYMBOL: &str = "Q";

/// Round to cents, midpoint away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format as quetzales with thousands separators.
///
/// # Examples
/// ```
/// use ancla_core::money::format_quetzales;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_quetzales(Decimal::new(123456789, 2)), "Q1,234,567.89");
/// ```
pub fn format_quetzales(amount: Decimal) -> String {
    let rounded = round_money(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    format!(
        "{}{}{}.{}",
        sign,
        CURRENCY_SYMBOL,
        group_thousands(whole),
        cents
    )
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Parse a user-typed amount such as `Q 12,500.00` or `12500`.
pub fn parse_amount(input: &str) -> CoreResult<Decimal> {
    let cleaned: String = input
        .trim()
        .trim_start_matches(CURRENCY_SYMBOL)
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();

    Decimal::from_str(&cleaned).map_err(|_| CoreError::InvalidAmount(input.to_string()))
}

/// Format a ratio as a percentage with two decimals (`0.4` -> `40.00%`).
pub fn format_percentage(ratio: Decimal) -> String {
    let pct = (ratio * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}%", pct)
}

/// Mask a DPI for display, keeping only the last four characters.
pub fn mask_dpi(dpi: &str) -> String {
    let chars: Vec<char> = dpi.chars().collect();
    if chars.len() <= 4 {
        return dpi.to_string();
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money() {
        assert_eq!(round_money(dec!(21972.295)), dec!(21972.30));
        assert_eq!(round_money(dec!(-1.005)), dec!(-1.01));
        assert_eq!(round_money(dec!(10)), dec!(10));
    }

    #[test]
    fn test_format_quetzales() {
        assert_eq!(format_quetzales(dec!(0)), "Q0.00");
        assert_eq!(format_quetzales(dec!(999.5)), "Q999.50");
        assert_eq!(format_quetzales(dec!(150000)), "Q150,000.00");
        assert_eq!(format_quetzales(dec!(2500000.456)), "Q2,500,000.46");
        assert_eq!(format_quetzales(dec!(-45000)), "-Q45,000.00");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("Q 12,500.00").unwrap(), dec!(12500.00));
        assert_eq!(parse_amount("10000").unwrap(), dec!(10000));
        assert!(parse_amount("diez mil").is_err());
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(dec!(0.4)), "40.00%");
        assert_eq!(format_percentage(dec!(0.033)), "3.30%");
        assert_eq!(format_percentage(dec!(0.12345)), "12.35%");
    }

    #[test]
    fn test_mask_dpi() {
        assert_eq!(mask_dpi("1234567890101"), "*********0101");
        assert_eq!(mask_dpi("0101"), "0101");
        assert_eq!(mask_dpi(""), "");
    }
}
