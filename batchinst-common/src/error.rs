use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed config line {line}: {reason}")]
    ConfigParse { line: usize, reason: String },

    #[error("malformed install log line {line}: {content:?}")]
    LogParse { line: usize, content: String },

    #[error("failed to download {name} from {url}: {reason}")]
    Download {
        name: String,
        url: String,
        reason: String,
    },

    #[error("command for {name} failed: {reason}")]
    Command { name: String, reason: String },

    #[error("{0} not found in installation log")]
    NotFound(String),

    #[error("invalid application number: {0:?}")]
    InvalidSelection(String),

    #[error("i/o error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Errors that must abort the whole run instead of just the current operation.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::ConfigParse { .. } | Error::LogParse { .. } | Error::Io { .. }
        )
    }

    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Error::Io { path, source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
