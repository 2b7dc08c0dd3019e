//! Minimal HTTP transport contract used to stream remote resources.
//!
//! The crate deliberately stops at "open a request, read its head, pull body
//! chunks, close": connection pooling, retries and timeouts belong to the
//! transport implementation or the caller.
//!
//! - [`HttpTransport`] / [`HttpSession`] / [`HttpResponse`]: the contract
//! - [`send`]: one request with status checking and guaranteed cleanup
//! - [`HttpError`]: non-success statuses mapped to a closed set of kinds
//! - [`ReqwestTransport`]: default implementation (feature `reqwest`)
//! - [`mock::MockTransport`]: scripted transport that records releases

mod error;
mod http;
pub mod mock;

pub use error::{BoxError, Error, HttpError, HttpErrorKind, Result};
pub use http::{Exchange, HttpResponse, HttpSession, HttpTransport, Method, ResponseHead, send};

#[cfg(feature = "reqwest")]
pub use http::ReqwestTransport;
