use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, ConvertError>;

///
/// ConvertError
///
/// Every failure the engine can produce. None of these escape an edit: the
/// converter that hit it decides whether to reset or keep its fields.
///

#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ConvertError {
    #[error("invalid number {text:?}: {reason}")]
    InvalidNumber { text: String, reason: &'static str },

    #[error("negative value {0} is not a valid amount")]
    NegativeValue(String),

    #[error("not a finite timestamp: {0}")]
    NonFinite(String),

    #[error("decode failed: {0}")]
    DecodeFailure(String),

    #[error("network request failed: {0}")]
    NetworkFailure(String),
}

impl ConvertError {
    pub(crate) fn invalid(text: &str, reason: &'static str) -> Self {
        Self::InvalidNumber {
            text: text.to_string(),
            reason,
        }
    }

    pub(crate) fn non_finite(text: impl Into<String>) -> Self {
        Self::NonFinite(text.into())
    }

    pub(crate) fn decode(err: impl std::fmt::Display) -> Self {
        Self::DecodeFailure(err.to_string())
    }
}
