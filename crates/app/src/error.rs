use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("storage error: {0}")]
    Storage(#[from] snus_db::DbError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    InvalidConfiguration(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("background task failed: {0}")]
    Task(String),
}

impl From<snus_core::CoreError> for AppError {
    fn from(err: snus_core::CoreError) -> Self {
        match err {
            snus_core::CoreError::InvalidConfiguration(message) => {
                AppError::InvalidConfiguration(message)
            }
        }
    }
}

impl From<snus_core::ParseWindowError> for AppError {
    fn from(err: snus_core::ParseWindowError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
