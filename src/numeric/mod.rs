// Exact-precision numeric text handling: big integers, scientific notation,
// scaled decimals and trailing-zero trimming.
mod integer;
mod scientific;
mod trim;
mod units;

pub use integer::{Integer, f64_to_i64};
pub use scientific::normalize_scientific;
pub use trim::trim_fraction_zeros;
pub use units::{Scale, format_units, parse_units};

use crate::error::{ConvertError, Result};

/// A validated plain decimal literal, split into its parts.
/// `-12.50` -> negative, "12", "50", point present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DecimalParts<'a> {
    pub negative: bool,
    pub integer: &'a str,
    pub fraction: &'a str,
    pub has_point: bool,
}

impl<'a> DecimalParts<'a> {
    pub(crate) fn parse(text: &'a str) -> Result<Self> {
        let (negative, unsigned) = split_sign(text);

        let (integer, fraction, has_point) = match unsigned.split_once('.') {
            Some((int, frac)) => (int, frac, true),
            None => (unsigned, "", false),
        };

        if fraction.contains('.') {
            return Err(ConvertError::invalid(text, "more than one decimal point"));
        }
        if integer.is_empty() && fraction.is_empty() {
            return Err(ConvertError::invalid(text, "no digits"));
        }
        if !integer.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(ConvertError::invalid(text, "unexpected character"));
        }

        Ok(Self {
            negative,
            integer,
            fraction,
            has_point,
        })
    }
}

pub(crate) fn split_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (false, rest)
    } else {
        (false, text)
    }
}

/// Reads the leading integer of `text` the way form inputs are usually read:
/// surrounding whitespace, an optional sign, then as many digits as follow.
/// `"6abc"` -> `Some((false, "6"))`, `"abc"` -> `None`.
pub(crate) fn leading_integer(text: &str) -> Option<(bool, &str)> {
    let (negative, rest) = split_sign(text.trim_start());
    let end = rest
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(rest.len());

    (end > 0).then(|| (negative, &rest[..end]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_parts_split() {
        let parts = DecimalParts::parse("-12.50").unwrap();
        assert!(parts.negative);
        assert_eq!(parts.integer, "12");
        assert_eq!(parts.fraction, "50");
        assert!(parts.has_point);

        let parts = DecimalParts::parse(".5").unwrap();
        assert_eq!(parts.integer, "");
        assert_eq!(parts.fraction, "5");
    }

    #[test]
    fn decimal_parts_rejects_malformed() {
        for text in ["", ".", "-", "1.2.3", "12a", "1,5", " 1", "--1"] {
            assert!(DecimalParts::parse(text).is_err(), "accepted {text:?}");
        }
    }

    #[test]
    fn leading_integer_prefix() {
        assert_eq!(leading_integer("  42px"), Some((false, "42")));
        assert_eq!(leading_integer("-7"), Some((true, "7")));
        assert_eq!(leading_integer("12.9"), Some((false, "12")));
        assert_eq!(leading_integer("x1"), None);
        assert_eq!(leading_integer(""), None);
    }
}
