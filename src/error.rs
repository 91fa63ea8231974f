//! Error type shared by every layer of the crate.

use std::{num::ParseIntError, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The Photos or OAuth endpoint answered with a non-success status.
    #[error("{endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("refusing unsafe media filename {0:?}")]
    UnsafeFilename(String),

    #[error("WebDAV error: {0}")]
    WebDav(String),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("authorization failed: {0}")]
    Auth(String),

    #[error("cannot load {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("invalid album selection: {0}")]
    Selection(#[from] ParseIntError),

    #[error("album index {index} is out of range (1-{count})")]
    OutOfRange { index: usize, count: usize },
}

impl From<quick_xml::Error> for Error {
    fn from(e: quick_xml::Error) -> Self {
        Self::Xml(e.to_string())
    }
}

impl Error {
    pub fn config(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Config {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
