use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed file tree: {0}")]
    MalformedTree(String),
    #[error("path not found: /{0}")]
    NotFound(String),
    #[error("size unavailable for {path}: {reason}")]
    SizeUnavailable { path: String, reason: String },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    pub(crate) fn size_unavailable(path: &str, reason: impl Into<String>) -> Self {
        Error::SizeUnavailable {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}
