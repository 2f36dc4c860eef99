use thiserror::Error;

#[derive(Error, Debug)]
pub enum Pc80bError {
    #[error("Input file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV export failed: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Plot rendering failed: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl Pc80bError {
    /// True for errors caused by caller-supplied parameters rather than I/O.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Pc80bError::Configuration(_))
    }
}

pub type Result<T> = std::result::Result<T, Pc80bError>;
