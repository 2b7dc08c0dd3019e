//! Scripted transport for tests.
//!
//! [`MockTransport`] answers every request with the same status, headers and
//! body chunks, and counts how many sessions and responses were opened, closed
//! and dropped so tests can assert that nothing leaks.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{Error, Result};
use crate::http::{HttpResponse, HttpSession, HttpTransport, Method, ResponseHead};

#[derive(Debug, Default)]
struct Counters {
    sessions_opened: AtomicUsize,
    sessions_closed: AtomicUsize,
    sessions_dropped: AtomicUsize,
    responses_opened: AtomicUsize,
    responses_closed: AtomicUsize,
    responses_dropped: AtomicUsize,
    requests: Mutex<Vec<(Method, String)>>,
}

#[derive(Debug, Clone)]
pub struct MockTransport {
    status: u16,
    content_type: Option<String>,
    chunks: Vec<Bytes>,
    fail_after: Option<usize>,
    counters: Arc<Counters>,
}

impl MockTransport {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            content_type: None,
            chunks: Vec::new(),
            fail_after: None,
            counters: Arc::default(),
        }
    }

    #[must_use]
    pub fn content_type(mut self, raw: impl Into<String>) -> Self {
        self.content_type = Some(raw.into());
        self
    }

    #[must_use]
    pub fn chunks<I, B>(mut self, chunks: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        self.chunks = chunks.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn body(self, body: impl Into<Bytes>) -> Self { self.chunks([body.into()]) }

    /// Make the body fail with a transport error after `n` chunks.
    #[must_use]
    pub fn fail_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    pub fn sessions_opened(&self) -> usize { self.counters.sessions_opened.load(Ordering::SeqCst) }

    pub fn sessions_closed(&self) -> usize { self.counters.sessions_closed.load(Ordering::SeqCst) }

    pub fn sessions_dropped(&self) -> usize { self.counters.sessions_dropped.load(Ordering::SeqCst) }

    pub fn responses_opened(&self) -> usize { self.counters.responses_opened.load(Ordering::SeqCst) }

    pub fn responses_closed(&self) -> usize { self.counters.responses_closed.load(Ordering::SeqCst) }

    pub fn responses_dropped(&self) -> usize { self.counters.responses_dropped.load(Ordering::SeqCst) }

    /// Requests seen so far, in order.
    pub fn requests(&self) -> Vec<(Method, String)> {
        self.counters
            .requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn connect(&self) -> Result<Box<dyn HttpSession>> {
        self.counters.sessions_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockSession { transport: self.clone() }))
    }
}

struct MockSession {
    transport: MockTransport,
}

#[async_trait]
impl HttpSession for MockSession {
    async fn request(&mut self, method: Method, url: &str) -> Result<Box<dyn HttpResponse>> {
        let transport = &self.transport;
        if let Ok(mut requests) = transport.counters.requests.lock() {
            requests.push((method, url.to_owned()));
        }
        transport.counters.responses_opened.fetch_add(1, Ordering::SeqCst);

        let length = transport.chunks.iter().map(|c| c.len() as u64).sum();
        let mut head = ResponseHead::new(url, transport.status).content_length(Some(length));
        if let Some(raw) = &transport.content_type {
            head = head.content_type_header(raw);
        }

        let chunks = match method {
            Method::Get => transport.chunks.clone(),
            Method::Head => Vec::new(),
        };

        Ok(Box::new(MockResponse {
            head,
            chunks: chunks.into_iter(),
            served: 0,
            fail_after: transport.fail_after,
            counters: Arc::clone(&transport.counters),
        }))
    }

    async fn close(&mut self) {
        self.transport.counters.sessions_closed.fetch_add(1, Ordering::SeqCst);
    }
}

impl Drop for MockSession {
    fn drop(&mut self) {
        self.transport.counters.sessions_dropped.fetch_add(1, Ordering::SeqCst);
    }
}

struct MockResponse {
    head: ResponseHead,
    chunks: std::vec::IntoIter<Bytes>,
    served: usize,
    fail_after: Option<usize>,
    counters: Arc<Counters>,
}

#[async_trait]
impl HttpResponse for MockResponse {
    fn head(&self) -> &ResponseHead { &self.head }

    async fn chunk(&mut self) -> Result<Option<Bytes>> {
        if self.fail_after.is_some_and(|n| self.served >= n) {
            return Err(Error::transport("connection reset by mock"));
        }
        self.served += 1;
        Ok(self.chunks.next())
    }

    async fn close(&mut self) { self.counters.responses_closed.fetch_add(1, Ordering::SeqCst); }
}

impl Drop for MockResponse {
    fn drop(&mut self) { self.counters.responses_dropped.fetch_add(1, Ordering::SeqCst); }
}
