use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Config parse error: {0}")]
    ConfigParseError(String),

    #[error("Invalid map directory: {0}")]
    InvalidMapDirectory(String),

    #[error("Frame capture failed: {0}")]
    CaptureFailed(String),

    #[error("OCR failed for region {region}: {message}")]
    OcrFailed { region: String, message: String },

    #[error("Invalid recording at line {line}: {message}")]
    InvalidRecording { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::ConfigParseError(e.message().to_string())
    }
}
