//! Error types for courier-files.

use courier_fetch::{HttpError, HttpErrorKind};
use thiserror::Error;

use crate::data_uri::DataUriError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid data URI: {0}")]
    DataUri(#[from] DataUriError),

    #[error("expected bytes or text but received {found}")]
    UnexpectedChunkType { found: String },

    #[error("cannot infer mimetype from input data, specify it manually")]
    UnknownMimetype,

    #[error("reader is already open")]
    AlreadyOpen,

    #[error("reader isn't open")]
    NotOpen,

    #[error("one-shot data source was already consumed by an earlier stream")]
    SourceConsumed,

    #[error(transparent)]
    Fs(#[from] courier_fs::Error),

    #[error(transparent)]
    Fetch(#[from] courier_fetch::Error),

    #[error("source read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("no executor configured and not running inside a tokio runtime")]
    NoRuntime,

    #[error("no HTTP transport configured and the `reqwest` feature is disabled")]
    NoTransport,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Bad caller input: malformed data URIs, unusable chunk values.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::DataUri(_) | Error::UnexpectedChunkType { .. } | Error::UnknownMimetype
        )
    }

    /// Misuse of a reader handle or a one-shot source.
    pub fn is_state(&self) -> bool {
        matches!(self, Error::AlreadyOpen | Error::NotOpen | Error::SourceConsumed)
    }

    pub fn http(&self) -> Option<&HttpError> {
        match self {
            Error::Fetch(err) => err.as_http(),
            _ => None,
        }
    }

    pub fn http_kind(&self) -> Option<HttpErrorKind> { self.http().map(|err| err.kind) }

    pub fn fs(&self) -> Option<&courier_fs::Error> {
        match self {
            Error::Fs(err) => Some(err),
            _ => None,
        }
    }
}
