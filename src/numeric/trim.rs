/// Drops insignificant trailing zeros from the fractional part, then a
/// dangling decimal point. Text without a point is returned untouched.
#[must_use]
pub fn trim_fraction_zeros(text: &str) -> &str {
    if !text.contains('.') {
        return text;
    }

    let trimmed = text.trim_end_matches('0');
    trimmed.strip_suffix('.').unwrap_or(trimmed)
}
