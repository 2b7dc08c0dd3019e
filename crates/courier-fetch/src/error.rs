//! Error types for courier-fetch.

use std::fmt;

use bytes::Bytes;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn transport(err: impl Into<BoxError>) -> Self { Error::Transport(err.into()) }

    /// The HTTP error carried by this error, if the server answered at all.
    pub fn as_http(&self) -> Option<&HttpError> {
        match self {
            Error::Http(err) => Some(err),
            _ => None,
        }
    }
}

/// Classification of a non-success HTTP status.
///
/// The common client failures are distinguished individually; everything else
/// falls into the client, server or unexpected bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Client,
    Server,
    Unexpected,
}

impl HttpErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => HttpErrorKind::BadRequest,
            401 => HttpErrorKind::Unauthorized,
            403 => HttpErrorKind::Forbidden,
            404 => HttpErrorKind::NotFound,
            400..=499 => HttpErrorKind::Client,
            500..=599 => HttpErrorKind::Server,
            _ => HttpErrorKind::Unexpected,
        }
    }

    pub fn is_client(&self) -> bool {
        matches!(
            self,
            HttpErrorKind::BadRequest
                | HttpErrorKind::Unauthorized
                | HttpErrorKind::Forbidden
                | HttpErrorKind::NotFound
                | HttpErrorKind::Client
        )
    }
}

impl fmt::Display for HttpErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpErrorKind::BadRequest => write!(f, "Bad Request"),
            HttpErrorKind::Unauthorized => write!(f, "Unauthorized"),
            HttpErrorKind::Forbidden => write!(f, "Forbidden"),
            HttpErrorKind::NotFound => write!(f, "Not Found"),
            HttpErrorKind::Client => write!(f, "Client Error"),
            HttpErrorKind::Server => write!(f, "Server Error"),
            HttpErrorKind::Unexpected => write!(f, "Unexpected Response"),
        }
    }
}

/// A non-success HTTP response.
///
/// The raw body is kept for diagnostics. When the body is a JSON object in the
/// platform's error format, `message`, `code` and (for bad requests) `errors`
/// are lifted out of it.
#[derive(Debug, Clone, Error)]
#[error("{status} {kind}: '{message}' for {url}")]
pub struct HttpError {
    pub kind: HttpErrorKind,
    pub status: u16,
    pub url: String,
    pub body: Bytes,
    pub message: String,
    pub code: i64,
    pub errors: Option<serde_json::Value>,
}

impl HttpError {
    pub fn from_response(url: impl Into<String>, status: u16, body: Bytes) -> Self {
        let kind = HttpErrorKind::from_status(status);
        let mut error = Self {
            kind,
            status,
            url: url.into(),
            body,
            message: String::new(),
            code: 0,
            errors: None,
        };

        if let Ok(serde_json::Value::Object(mut object)) =
            serde_json::from_slice::<serde_json::Value>(&error.body)
        {
            error.message = object
                .get("message")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_owned();
            error.code = object.get("code").and_then(|v| v.as_i64()).unwrap_or(0);
            if kind == HttpErrorKind::BadRequest {
                error.errors = object.remove("errors");
            }
        }

        error
    }
}
