use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The asset root or the database could not be opened. Fatal for the whole request.
    #[error("{source_name} unavailable: {reason}")]
    SourceUnavailable { source_name: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn source_unavailable(source_name: impl Into<String>, reason: impl ToString) -> Self {
        Error::SourceUnavailable {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}
