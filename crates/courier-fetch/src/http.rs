use async_trait::async_trait;
use bytes::{Bytes, BytesMut};

use crate::error::{Error, HttpError, Result};

/// Request method. Only what resource streaming needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
        }
    }
}

/// Status line and the headers resource streaming cares about.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseHead {
    /// Final URL, after redirects.
    pub url: String,
    pub status: u16,
    pub reason: String,
    /// Media type without parameters, lowercased.
    pub content_type: Option<String>,
    pub charset: Option<String>,
    pub content_length: Option<u64>,
}

impl ResponseHead {
    pub fn new(url: impl Into<String>, status: u16) -> Self {
        Self {
            url: url.into(),
            status,
            ..Self::default()
        }
    }

    /// Fill `content_type` and `charset` from a raw `Content-Type` value.
    #[must_use]
    pub fn content_type_header(mut self, raw: &str) -> Self {
        let mut parts = raw.split(';');
        let essence = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
        self.content_type = (!essence.is_empty()).then_some(essence);
        self.charset = parts.find_map(|param| {
            let (key, value) = param.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim().trim_matches('"').to_owned())
        });
        self
    }

    #[must_use]
    pub fn content_length(mut self, length: Option<u64>) -> Self {
        self.content_length = length;
        self
    }

    #[must_use]
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    /// Anything in `200..400` counts as success.
    pub fn is_success(&self) -> bool { (200..400).contains(&self.status) }
}

/// Opens sessions. One session is opened per streamed request and closed with it.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn HttpSession>>;
}

#[async_trait]
pub trait HttpSession: Send {
    async fn request(&mut self, method: Method, url: &str) -> Result<Box<dyn HttpResponse>>;

    /// Release the session. Called exactly once, after its response is closed.
    async fn close(&mut self);
}

#[async_trait]
pub trait HttpResponse: Send {
    fn head(&self) -> &ResponseHead;

    /// Next body chunk at the transport's native boundaries, `None` at end.
    async fn chunk(&mut self) -> Result<Option<Bytes>>;

    /// The rest of the body in one buffer.
    async fn body(&mut self) -> Result<Bytes> {
        let mut body = BytesMut::new();
        while let Some(chunk) = self.chunk().await? {
            body.extend_from_slice(&chunk);
        }
        Ok(body.freeze())
    }

    /// Release the response. Called exactly once, even if the body was not drained.
    async fn close(&mut self);
}

/// An open request: the session and the successful response it produced.
pub struct Exchange {
    pub session: Box<dyn HttpSession>,
    pub response: Box<dyn HttpResponse>,
}

impl Exchange {
    /// Close the response, then its session.
    pub async fn close(mut self) {
        self.response.close().await;
        self.session.close().await;
        tracing::trace!("closed HTTP exchange");
    }
}

impl std::fmt::Debug for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exchange")
            .field("head", self.response.head())
            .finish_non_exhaustive()
    }
}

/// Open a session, send one request and check its status.
///
/// A status outside `200..400` becomes an [`HttpError`] carrying the response
/// body. Whatever was opened before a failure is closed before the error is
/// returned.
pub async fn send(transport: &dyn HttpTransport, method: Method, url: &str) -> Result<Exchange> {
    let mut session = transport.connect().await?;

    let mut response = match session.request(method, url).await {
        Ok(response) => response,
        Err(err) => {
            session.close().await;
            return Err(err);
        }
    };

    let head = response.head().clone();
    if head.is_success() {
        tracing::debug!(method = method.as_str(), url, status = head.status, "opened HTTP exchange");
        return Ok(Exchange { session, response });
    }

    let body = response.body().await.unwrap_or_default();
    response.close().await;
    session.close().await;

    tracing::debug!(method = method.as_str(), url, status = head.status, "HTTP request failed");
    Err(Error::Http(HttpError::from_response(head.url, head.status, body)))
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use super::*;

    /// Production transport backed by `reqwest`.
    ///
    /// By default every session builds its own client and drops it on close.
    /// [`with_client`](ReqwestTransport::with_client) shares one client (and
    /// its connection pool) across sessions instead.
    #[derive(Debug, Clone, Default)]
    pub struct ReqwestTransport {
        client: Option<reqwest::Client>,
    }

    impl ReqwestTransport {
        pub fn new() -> Self { Self::default() }

        pub fn with_client(client: reqwest::Client) -> Self { Self { client: Some(client) } }
    }

    #[async_trait]
    impl HttpTransport for ReqwestTransport {
        async fn connect(&self) -> Result<Box<dyn HttpSession>> {
            let client = match &self.client {
                Some(client) => client.clone(),
                None => reqwest::Client::builder().build().map_err(Error::transport)?,
            };
            Ok(Box::new(ReqwestSession { client: Some(client) }))
        }
    }

    struct ReqwestSession {
        client: Option<reqwest::Client>,
    }

    #[async_trait]
    impl HttpSession for ReqwestSession {
        async fn request(&mut self, method: Method, url: &str) -> Result<Box<dyn HttpResponse>> {
            let client = self
                .client
                .as_ref()
                .ok_or_else(|| Error::transport("session already closed"))?;
            let verb = match method {
                Method::Get => reqwest::Method::GET,
                Method::Head => reqwest::Method::HEAD,
            };

            let response = client.request(verb, url).send().await.map_err(|e| {
                if e.is_builder() {
                    Error::InvalidUrl(url.to_owned())
                } else {
                    Error::transport(e)
                }
            })?;

            let status = response.status();
            let mut head = ResponseHead::new(response.url().as_str(), status.as_u16())
                .reason(status.canonical_reason().unwrap_or_default())
                .content_length(content_length(&response, method));
            if let Some(raw) = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
            {
                head = head.content_type_header(raw);
            }

            Ok(Box::new(ReqwestResponse {
                head,
                inner: Some(response),
            }))
        }

        async fn close(&mut self) { self.client.take(); }
    }

    /// The `Content-Length` header as sent. A HEAD response has an empty body,
    /// so its size hint says nothing about the resource.
    fn content_length(response: &reqwest::Response, method: Method) -> Option<u64> {
        response
            .headers()
            .get(reqwest::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
            .or_else(|| match method {
                Method::Get => response.content_length(),
                Method::Head => None,
            })
    }

    struct ReqwestResponse {
        head: ResponseHead,
        inner: Option<reqwest::Response>,
    }

    #[async_trait]
    impl HttpResponse for ReqwestResponse {
        fn head(&self) -> &ResponseHead { &self.head }

        async fn chunk(&mut self) -> Result<Option<Bytes>> {
            match self.inner.as_mut() {
                Some(response) => response.chunk().await.map_err(Error::transport),
                None => Ok(None),
            }
        }

        async fn body(&mut self) -> Result<Bytes> {
            match self.inner.take() {
                Some(response) => response.bytes().await.map_err(Error::transport),
                None => Ok(Bytes::new()),
            }
        }

        async fn close(&mut self) { self.inner.take(); }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestTransport;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_header() {
        let head = ResponseHead::new("u", 200).content_type_header("Text/HTML; Charset=\"utf-8\"");
        assert_eq!(head.content_type.as_deref(), Some("text/html"));
        assert_eq!(head.charset.as_deref(), Some("utf-8"));

        let head = ResponseHead::new("u", 200).content_type_header("image/png");
        assert_eq!(head.content_type.as_deref(), Some("image/png"));
        assert_eq!(head.charset, None);
    }

    #[test]
    fn test_is_success() {
        assert!(ResponseHead::new("u", 200).is_success());
        assert!(ResponseHead::new("u", 304).is_success());
        assert!(!ResponseHead::new("u", 199).is_success());
        assert!(!ResponseHead::new("u", 404).is_success());
    }
}
