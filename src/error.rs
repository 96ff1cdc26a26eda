use thiserror::Error;

pub type GfixResult<T> = Result<T, GfixError>;

#[derive(Error, Debug)]
pub enum GfixError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Report error: {0}")]
    Report(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
