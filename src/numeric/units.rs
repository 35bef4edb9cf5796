use super::{DecimalParts, Integer, leading_integer, normalize_scientific};
use crate::error::{ConvertError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Scale
/// number of fractional digits a smallest-unit integer is rendered with
///

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Scale(u8);

impl Scale {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 30;

    /// Smallest units shown as-is.
    pub const ZERO: Self = Self(0);

    /// Ether and most ERC-20 tokens.
    pub const ETHER: Self = Self(18);

    /// Rejects anything outside `[0, 30]`.
    pub fn new(digits: u32) -> Result<Self> {
        u8::try_from(digits)
            .ok()
            .filter(|d| *d <= Self::MAX)
            .map(Self)
            .ok_or_else(|| ConvertError::invalid(&digits.to_string(), "scale out of range"))
    }

    /// Saturates into `[0, 30]`.
    #[must_use]
    pub fn clamped(digits: i64) -> Self {
        let digits = digits.clamp(i64::from(Self::MIN), i64::from(Self::MAX));
        Self(u8::try_from(digits).unwrap_or(Self::MAX))
    }

    /// Reads free text typed into a scale field: the leading integer is
    /// taken and clamped, anything without one is `None`.
    #[must_use]
    pub fn sanitize(text: &str) -> Option<Self> {
        let (negative, digits) = leading_integer(text)?;
        if negative {
            return Some(Self::ZERO);
        }

        // every byte is a digit, so the only failure is overflow
        let digits = digits.parse::<i64>().unwrap_or(i64::MAX);
        Some(Self::clamped(digits))
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0 as u32
    }

    #[must_use]
    pub const fn digits(self) -> usize {
        self.0 as usize
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::ETHER
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Scale {
    type Error = ConvertError;

    fn try_from(digits: u32) -> Result<Self> {
        Self::new(digits)
    }
}

impl From<Scale> for u32 {
    fn from(scale: Scale) -> Self {
        scale.get()
    }
}

/// Decimal text -> smallest units at `scale`.
///
/// Scientific notation is expanded first. Fractional digits beyond `scale`
/// are discarded, which rounds toward zero.
pub fn parse_units(text: &str, scale: Scale) -> Result<Integer> {
    let plain = normalize_scientific(text.trim())?;
    let parts = DecimalParts::parse(&plain)?;

    let fraction = parts.fraction;
    let mut digits = String::with_capacity(parts.integer.len() + scale.digits());
    digits.push_str(parts.integer);

    if fraction.len() >= scale.digits() {
        digits.push_str(&fraction[..scale.digits()]);
    } else {
        digits.push_str(fraction);
        digits.push_str(&"0".repeat(scale.digits() - fraction.len()));
    }

    Ok(Integer::from_digits(parts.negative, &digits))
}

/// Smallest units -> decimal text with exactly `scale` fractional digits.
/// `scale == 0` renders a plain integer.
#[must_use]
pub fn format_units(value: &Integer, scale: Scale) -> String {
    let mut digits = value.abs_digits();
    let width = scale.digits() + 1;
    if digits.len() < width {
        digits.insert_str(0, &"0".repeat(width - digits.len()));
    }

    let sign = if value.is_negative() { "-" } else { "" };
    if scale == Scale::ZERO {
        return format!("{sign}{digits}");
    }

    let (integer, fraction) = digits.split_at(digits.len() - scale.digits());
    format!("{sign}{integer}.{fraction}")
}
