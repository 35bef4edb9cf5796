use super::{DecimalParts, split_sign};
use crate::error::{ConvertError, Result};
use num_bigint::{BigInt, Sign};
use num_traits::{Pow, Signed, ToPrimitive, Zero};
use std::fmt;

///
/// Integer
/// arbitrary-width signed integer, the canonical value of every converter
///

#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Integer(BigInt);

impl Integer {
    #[must_use]
    pub fn zero() -> Self {
        Self(BigInt::zero())
    }

    /// `10^exponent`
    #[must_use]
    pub fn pow10(exponent: u32) -> Self {
        Self(BigInt::from(10u8).pow(exponent))
    }

    #[must_use]
    pub const fn from_bigint(value: BigInt) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn as_bigint(&self) -> &BigInt {
        &self.0
    }

    /// Parses a base-10 integer literal with an optional sign.
    /// A decimal point is rejected even when the fraction is empty.
    pub fn parse_decimal(text: &str) -> Result<Self> {
        let parts = DecimalParts::parse(text.trim())?;
        if parts.has_point {
            return Err(ConvertError::invalid(text, "fractional part in integer"));
        }

        Ok(Self::from_digits(parts.negative, parts.integer))
    }

    /// Parses a base-16 literal; the `0x` prefix is optional, digits are
    /// case-insensitive.
    pub fn parse_hex(text: &str) -> Result<Self> {
        let (negative, unsigned) = split_sign(text.trim());
        let digits = unsigned
            .strip_prefix("0x")
            .or_else(|| unsigned.strip_prefix("0X"))
            .unwrap_or(unsigned);

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ConvertError::invalid(text, "not a hexadecimal number"));
        }

        let magnitude = BigInt::parse_bytes(digits.as_bytes(), 16)
            .ok_or_else(|| ConvertError::invalid(text, "not a hexadecimal number"))?;

        Ok(Self(if negative { -magnitude } else { magnitude }))
    }

    /// Accepts either form: `0x`-prefixed text is hex, anything else must be
    /// a decimal integer.
    pub fn parse_any(text: &str) -> Result<Self> {
        let (_, unsigned) = split_sign(text.trim());
        if unsigned.starts_with("0x") || unsigned.starts_with("0X") {
            Self::parse_hex(text)
        } else {
            Self::parse_decimal(text)
        }
    }

    // digits are pre-validated ASCII; an empty string is zero
    pub(crate) fn from_digits(negative: bool, digits: &str) -> Self {
        let magnitude = if digits.is_empty() {
            BigInt::zero()
        } else {
            BigInt::parse_bytes(digits.as_bytes(), 10).unwrap_or_default()
        };

        Self(if negative { -magnitude } else { magnitude })
    }

    #[must_use]
    pub fn to_decimal_string(&self) -> String {
        self.0.to_string()
    }

    /// Minimal lower-case hex: `0x0`, `0xff`, `0x100`, `-0x1`.
    #[must_use]
    pub fn to_hex_string(&self) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!("{sign}0x{:x}", self.0.magnitude())
    }

    /// Decimal digits of the absolute value.
    #[must_use]
    pub fn abs_digits(&self) -> String {
        self.0.magnitude().to_string()
    }

    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.sign() == Sign::Minus
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Checked narrowing; values outside `i64` fail instead of wrapping.
    pub fn to_i64(&self) -> Result<i64> {
        self.0
            .to_i64()
            .ok_or_else(|| ConvertError::invalid(&self.to_decimal_string(), "out of i64 range"))
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Self(BigInt::from(value))
    }
}

impl From<u64> for Integer {
    fn from(value: u64) -> Self {
        Self(BigInt::from(value))
    }
}

impl From<BigInt> for Integer {
    fn from(value: BigInt) -> Self {
        Self(value)
    }
}

/// Checked float-to-integer conversion for values coming from host APIs
/// (clock readings, date arithmetic). Non-finite, fractional or out-of-range
/// inputs fail closed.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn f64_to_i64(value: f64) -> Result<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    if !value.is_finite() {
        return Err(ConvertError::non_finite(value.to_string()));
    }
    if value.fract() != 0.0 || value >= LIMIT || value < -LIMIT {
        return Err(ConvertError::non_finite(value.to_string()));
    }

    Ok(value as i64)
}
