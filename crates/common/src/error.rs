use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("sink error: {0}")]
    Sink(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type TaResult<T> = Result<T, TaError>;

impl From<std::io::Error> for TaError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
