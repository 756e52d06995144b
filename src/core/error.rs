use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid session: {0}")]
    InvalidSession(String),

    #[error("Invalid database URL: {0}")]
    InvalidUrl(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PersistError>;

impl From<postgres::Error> for PersistError {
    fn from(err: postgres::Error) -> Self {
        Self::Backend(err.to_string())
    }
}
