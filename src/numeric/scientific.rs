use super::DecimalParts;
use crate::error::{ConvertError, Result};

// Exponents beyond this would only ever come from garbage input and would
// expand into megabytes of zeros.
const MAX_EXPONENT: u32 = 1_000;

/// Rewrites `mantissa[.fraction]e[+|-]exponent` as a plain decimal string
/// without ever going through a float. Text with no exponent marker is
/// returned as-is.
///
/// `"1.23e5"` -> `"123000"`, `"1.23e-5"` -> `"0.0000123"`.
pub fn normalize_scientific(text: &str) -> Result<String> {
    let Some(marker) = text.find(['e', 'E']) else {
        return Ok(text.to_string());
    };

    let (mantissa, exponent) = (&text[..marker], &text[marker + 1..]);
    let parts = DecimalParts::parse(mantissa)?;
    let exponent = parse_exponent(text, exponent)?;

    let digits = format!("{}{}", parts.integer, parts.fraction);
    let point = i64::try_from(parts.integer.len())
        .map_err(|_| ConvertError::invalid(text, "mantissa too long"))?
        + exponent;

    let plain = if point <= 0 {
        let zeros = usize::try_from(-point).unwrap_or(0);
        format!("0.{}{digits}", "0".repeat(zeros))
    } else {
        let point = usize::try_from(point).unwrap_or(usize::MAX);
        if point >= digits.len() {
            format!("{digits}{}", "0".repeat(point - digits.len()))
        } else {
            let (int, frac) = digits.split_at(point);
            format!("{}.{frac}", strip_leading_zeros(int))
        }
    };

    let plain = if plain.contains('.') {
        plain
    } else {
        strip_leading_zeros(&plain).to_string()
    };

    Ok(if parts.negative {
        format!("-{plain}")
    } else {
        plain
    })
}

fn parse_exponent(text: &str, exponent: &str) -> Result<i64> {
    let (negative, digits) = match exponent.as_bytes().first() {
        Some(b'-') => (true, &exponent[1..]),
        Some(b'+') => (false, &exponent[1..]),
        _ => (false, exponent),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ConvertError::invalid(text, "malformed exponent"));
    }

    let magnitude: u32 = digits
        .parse()
        .ok()
        .filter(|m| *m <= MAX_EXPONENT)
        .ok_or_else(|| ConvertError::invalid(text, "exponent out of range"))?;

    Ok(if negative {
        -i64::from(magnitude)
    } else {
        i64::from(magnitude)
    })
}

// keeps a single zero for all-zero input
fn strip_leading_zeros(digits: &str) -> &str {
    let stripped = digits.trim_start_matches('0');
    if stripped.is_empty() && !digits.is_empty() {
        "0"
    } else {
        stripped
    }
}
