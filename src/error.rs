use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Raised by the depth guard before the filter engine recurses into a document.
    #[error("document nesting depth exceeds limit of {limit} (reached {depth})")]
    TooDeep { depth: usize, limit: usize },

    #[error("no document loaded")]
    NoDocument,

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("invalid config file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}
