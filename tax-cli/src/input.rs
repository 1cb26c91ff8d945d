use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

/// Largest income accepted from user input; larger values are clamped to it.
pub const MAX_INCOME: Decimal = dec!(9007199254740991);

/// Fractional digits kept before parsing; anything finer is dropped.
const MAX_FRACTION_DIGITS: usize = 10;

/// Keeps only the characters that can form a number: digits, `.` and `-`.
fn strip_non_numeric(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-'))
        .collect()
}

/// True for an unsigned run of digits with at most one decimal point.
fn is_plain_number(body: &str) -> bool {
    body.chars().any(|c| c.is_ascii_digit())
        && body.chars().all(|c| c.is_ascii_digit() || c == '.')
        && body.matches('.').count() <= 1
}

/// Turns an income string into a non-negative amount.
///
/// Currency symbols, thousands separators and whitespace are stripped, so
/// `"$150,000"` reads as 150000. Empty or malformed input (for example
/// `"1.2.3"` or `"--5"`) becomes zero. Negative amounts become zero.
/// Amounts above [`MAX_INCOME`] are clamped to it.
///
/// This never fails: bad input degrades to zero income.
pub fn sanitize_income(raw: &str) -> Decimal {
    let cleaned = strip_non_numeric(raw);
    if cleaned.is_empty() {
        return Decimal::ZERO;
    }

    let (negative, body) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.as_str()),
    };

    if !is_plain_number(body) {
        debug!(input = %raw, "malformed income, using zero");
        return Decimal::ZERO;
    }
    if negative {
        return Decimal::ZERO;
    }

    let (whole, fraction) = body.split_once('.').unwrap_or((body, ""));
    let whole = if whole.is_empty() { "0" } else { whole };
    let fraction = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
    let normalized = if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    };

    match normalized.parse::<Decimal>() {
        Ok(value) => value.min(MAX_INCOME),
        Err(e) => {
            debug!(input = %raw, "income out of range ({e}), clamping");
            MAX_INCOME
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn sanitize_plain_number() {
        assert_eq!(sanitize_income("150000"), dec!(150000));
        assert_eq!(sanitize_income("11925.50"), dec!(11925.50));
    }

    #[test]
    fn sanitize_strips_currency_formatting() {
        assert_eq!(sanitize_income("$150,000"), dec!(150000));
        assert_eq!(sanitize_income("  1 234.56 USD "), dec!(1234.56));
    }

    #[test]
    fn sanitize_empty_is_zero() {
        assert_eq!(sanitize_income(""), Decimal::ZERO);
        assert_eq!(sanitize_income("   "), Decimal::ZERO);
        assert_eq!(sanitize_income("abc"), Decimal::ZERO);
    }

    #[test]
    fn sanitize_malformed_is_zero() {
        assert_eq!(sanitize_income("1.2.3"), Decimal::ZERO);
        assert_eq!(sanitize_income("--5"), Decimal::ZERO);
        assert_eq!(sanitize_income("5-5"), Decimal::ZERO);
        assert_eq!(sanitize_income("-"), Decimal::ZERO);
        assert_eq!(sanitize_income("."), Decimal::ZERO);
    }

    #[test]
    fn sanitize_negative_clamps_to_zero() {
        assert_eq!(sanitize_income("-5000"), Decimal::ZERO);
        assert_eq!(sanitize_income("-.5"), Decimal::ZERO);
    }

    #[test]
    fn sanitize_partial_decimal_points() {
        assert_eq!(sanitize_income(".5"), dec!(0.5));
        assert_eq!(sanitize_income("42."), dec!(42));
    }

    #[test]
    fn sanitize_clamps_to_max_income() {
        assert_eq!(sanitize_income("9007199254740992"), MAX_INCOME);
        assert_eq!(
            sanitize_income("123456789012345678901234567890123456789"),
            MAX_INCOME
        );
    }

    #[test]
    fn sanitize_drops_excess_fraction_digits() {
        assert_eq!(
            sanitize_income("1.123456789012345678901234567890123"),
            dec!(1.1234567890)
        );
    }

    #[test]
    fn sanitize_exponent_letters_are_stripped() {
        // The 'e' is not a numeric character, leaving "15".
        assert_eq!(sanitize_income("1e5"), dec!(15));
    }
}
