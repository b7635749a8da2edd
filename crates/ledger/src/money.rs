use rust_decimal::Decimal;

use crate::error::LedgerError;

/// Formats an amount with two decimals and the currency sign, e.g. `¥12.50`.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}¥{:.2}", rounded.abs())
}

/// Parses a user-entered amount.
///
/// Accepts `.` or `,` as decimal separator and surrounding whitespace;
/// rejects signs, empty input and more than two decimals.
pub fn parse_amount(input: &str) -> Result<Decimal, LedgerError> {
    let invalid = || LedgerError::InvalidAmount("invalid amount".to_string());

    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::InvalidAmount("empty amount".to_string()));
    }

    let normalized = trimmed.replace(',', ".");
    let mut parts = normalized.split('.');
    let whole = parts.next().ok_or_else(invalid)?;
    let fraction = parts.next();
    if parts.next().is_some() {
        return Err(invalid());
    }

    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if let Some(fraction) = fraction {
        if !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if fraction.len() > 2 {
            return Err(LedgerError::InvalidAmount("too many decimals".to_string()));
        }
    }

    normalized
        .trim_end_matches('.')
        .parse::<Decimal>()
        .map_err(|_| LedgerError::InvalidAmount("amount too large".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_uses_two_decimals() {
        assert_eq!(format_amount(Decimal::ZERO), "¥0.00");
        assert_eq!(format_amount(Decimal::new(1050, 2)), "¥10.50");
        assert_eq!(format_amount(Decimal::new(125, 1)), "¥12.50");
        assert_eq!(format_amount(Decimal::new(-3, 0)), "-¥3.00");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!(parse_amount("10").unwrap(), Decimal::from(10));
        assert_eq!(parse_amount("10.5").unwrap(), Decimal::new(105, 1));
        assert_eq!(parse_amount("10,50").unwrap(), Decimal::new(1050, 2));
        assert_eq!(parse_amount(" 2. ").unwrap(), Decimal::from(2));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_amount("").is_err());
        assert!(parse_amount("-1").is_err());
        assert!(parse_amount("1.2.3").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("12.345").is_err());
    }
}
