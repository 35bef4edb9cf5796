// Text selected in decoded output can seed one of the converters.
use crate::numeric::Integer;

// unix seconds are ten digits from 2001 until 2286
const TIMESTAMP_DIGITS: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Seed {
    Timestamp(i64),
    Amount(Integer),
}

/// Routes a selection to the converter it most likely belongs to. Only
/// plain decimal digit runs qualify; `0x` words and partial tokens are
/// ignored.
#[must_use]
pub fn route(selected: &str) -> Option<Seed> {
    if selected.is_empty()
        || selected.starts_with("0x")
        || !selected.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    if selected.len() == TIMESTAMP_DIGITS {
        if let Some(seconds) = selected.parse::<i64>().ok().filter(|s| *s > 0) {
            return Some(Seed::Timestamp(seconds));
        }
    }

    Integer::parse_decimal(selected).ok().map(Seed::Amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_digits_is_a_timestamp() {
        assert_eq!(route("1700000000"), Some(Seed::Timestamp(1_700_000_000)));
    }

    #[test]
    fn other_digit_runs_are_amounts() {
        assert_eq!(
            route("1000000000000000000"),
            Some(Seed::Amount(Integer::pow10(18)))
        );
        assert_eq!(route("42"), Some(Seed::Amount(Integer::from(42i64))));
        assert_eq!(
            route("0000000000"),
            Some(Seed::Amount(Integer::zero()))
        );
    }

    #[test]
    fn non_numeric_selections_are_ignored() {
        for selected in ["", "0x1234", "12a", " 12", "-5", "1.5"] {
            assert_eq!(route(selected), None, "routed {selected:?}");
        }
    }
}
