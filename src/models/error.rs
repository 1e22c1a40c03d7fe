use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersonaError {
    #[error("Invalid address format: {0}")]
    InvalidAddress(String),

    #[error("No on-chain footprint found for {0}")]
    NoFootprint(String),

    #[error("Upstream error from {service}: {message}")]
    Upstream { service: String, message: String },

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, PersonaError>;
