use bigdecimal::{BigDecimal, RoundingMode};
use num_traits::ToPrimitive;
use std::str::FromStr;

/// Strips everything but digits and left-pads with zeros to the 11-digit CPF
/// width. Inputs with no digits at all yield `None`.
pub(crate) fn normalize_cpf(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        None
    } else {
        Some(format!("{:0>11}", digits))
    }
}

/// Parses a monetary string that may use comma as the decimal separator into
/// integer centavos, rounding half-up to two decimal places. Returns `None`
/// on any parse failure; the caller keeps the row with a null amount.
pub(crate) fn parse_valor(raw: &str) -> Option<i64> {
    let normalized = raw.trim().replace(',', ".");
    let valor = BigDecimal::from_str(&normalized).ok()?;
    let centavos = valor.with_scale_round(2, RoundingMode::HalfUp) * BigDecimal::from(100);
    centavos.with_scale(0).to_i64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpf_keeps_digits_in_order() {
        assert_eq!(normalize_cpf("123.456.789-01"), Some("12345678901".to_string()));
    }

    #[test]
    fn cpf_pads_to_eleven_digits() {
        assert_eq!(normalize_cpf("1234567"), Some("00001234567".to_string()));
    }

    #[test]
    fn cpf_longer_than_eleven_is_kept() {
        assert_eq!(normalize_cpf("123456789012"), Some("123456789012".to_string()));
    }

    #[test]
    fn cpf_without_digits_is_none() {
        assert_eq!(normalize_cpf(""), None);
        assert_eq!(normalize_cpf("***"), None);
    }

    #[test]
    fn valor_with_comma_separator() {
        assert_eq!(parse_valor("1234,56"), Some(123_456));
    }

    #[test]
    fn valor_rounds_half_up() {
        assert_eq!(parse_valor("10,005"), Some(1001));
        assert_eq!(parse_valor("10,004"), Some(1000));
    }

    #[test]
    fn valor_plain_integer() {
        assert_eq!(parse_valor(" 500 "), Some(50_000));
    }

    #[test]
    fn valor_garbage_is_none() {
        assert_eq!(parse_valor(""), None);
        assert_eq!(parse_valor("abc"), None);
        // thousands separators are not supported, as in the source data
        assert_eq!(parse_valor("1.234,56"), None);
    }
}
