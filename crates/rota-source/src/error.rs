use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Schedule not found: {id}")]
    NotFound { id: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Source unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Every requested schedule failed to load.
    #[error("all {attempted} schedule fetches failed")]
    AllFailed { attempted: usize },
}

pub type Result<T> = std::result::Result<T, SourceError>;
