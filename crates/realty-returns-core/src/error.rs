use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RealtyError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Format error: {0}")]
    Format(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl RealtyError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        RealtyError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for RealtyError {
    fn from(e: serde_json::Error) -> Self {
        RealtyError::SerializationError(e.to_string())
    }
}

/// Turns a failed `checked_*` operation into `InvalidInput` on `field`.
pub(crate) trait OrOverflow<T> {
    fn or_overflow(self, field: &str) -> crate::RealtyResult<T>;
}

impl<T> OrOverflow<T> for Option<T> {
    fn or_overflow(self, field: &str) -> crate::RealtyResult<T> {
        self.ok_or_else(|| RealtyError::invalid(field, "value exceeds decimal range"))
    }
}
