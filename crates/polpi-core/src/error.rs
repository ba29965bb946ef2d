use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolpiError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for PolpiError {
    fn from(e: serde_json::Error) -> Self {
        PolpiError::SerializationError(e.to_string())
    }
}
