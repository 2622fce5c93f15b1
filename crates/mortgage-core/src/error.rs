use thiserror::Error;

#[derive(Debug, Error)]
pub enum MortgageError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid share state: {0}")]
    InvalidShareState(String),

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for MortgageError {
    fn from(e: serde_json::Error) -> Self {
        MortgageError::SerializationError(e.to_string())
    }
}

#[cfg(feature = "share")]
impl From<base64::DecodeError> for MortgageError {
    fn from(e: base64::DecodeError) -> Self {
        MortgageError::InvalidShareState(format!("payload is not valid base64: {e}"))
    }
}
