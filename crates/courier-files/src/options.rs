use std::fmt;
use std::sync::Arc;

use courier_fetch::HttpTransport;

use crate::error::Result;
use crate::executor::Executor;

/// Block size for file reads and in-memory rebuffering: 50 KiB.
pub const DEFAULT_CHUNK_SIZE: usize = 50 * 1024;

/// Configuration for a single [`stream`](crate::Streamable::stream) call.
///
/// # Examples
///
/// ```
/// use courier_files::StreamOptions;
///
/// let options = StreamOptions::default()
///     .head_only(true)
///     .chunk_size(8 * 1024);
/// ```
#[derive(Clone)]
pub struct StreamOptions {
    /// Worker pool for blocking file I/O. Default: the ambient runtime; file
    /// reads and saves fail with [`Error::NoRuntime`](crate::Error::NoRuntime)
    /// when there is none.
    pub executor: Option<Executor>,

    /// Transport for remote resources. Default: a fresh `reqwest` client per
    /// stream (feature `reqwest`).
    pub transport: Option<Arc<dyn HttpTransport>>,

    /// Only fetch the response head of remote resources; the reader then
    /// yields a single empty chunk. Ignored by local and in-memory resources.
    pub head_only: bool,

    /// Block size for file reads and the rebuffering of in-memory sources.
    ///
    /// Default: [`DEFAULT_CHUNK_SIZE`]
    pub chunk_size: usize,
}

impl fmt::Debug for StreamOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamOptions")
            .field("executor", &self.executor)
            .field("transport", &self.transport.as_ref().map(|_| "{ ... }"))
            .field("head_only", &self.head_only)
            .field("chunk_size", &self.chunk_size)
            .finish()
    }
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            executor: None,
            transport: None,
            head_only: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl StreamOptions {
    #[must_use]
    pub fn executor(mut self, executor: Executor) -> Self {
        self.executor = Some(executor);
        self
    }

    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    #[must_use]
    pub fn head_only(mut self, head_only: bool) -> Self {
        self.head_only = head_only;
        self
    }

    /// Set the block size. Zero is treated as one.
    #[must_use]
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub(crate) fn resolve_executor(&self) -> Result<Executor> {
        match &self.executor {
            Some(executor) => Ok(executor.clone()),
            None => Executor::try_current().ok_or(crate::Error::NoRuntime),
        }
    }

    pub(crate) fn resolve_transport(&self) -> Result<Arc<dyn HttpTransport>> {
        if let Some(transport) = &self.transport {
            return Ok(Arc::clone(transport));
        }

        #[cfg(feature = "reqwest")]
        {
            Ok(Arc::new(courier_fetch::ReqwestTransport::new()))
        }

        #[cfg(not(feature = "reqwest"))]
        {
            Err(crate::Error::NoTransport)
        }
    }
}

/// Configuration for [`Resource::save`](crate::Resource::save).
#[derive(Debug, Clone, Default)]
pub struct SaveOptions {
    /// Options for the read side of the save.
    pub stream: StreamOptions,

    /// Overwrite an existing target file.
    ///
    /// Default: false
    pub force: bool,
}

impl SaveOptions {
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    #[must_use]
    pub fn stream(mut self, stream: StreamOptions) -> Self {
        self.stream = stream;
        self
    }

    #[must_use]
    pub fn executor(mut self, executor: Executor) -> Self {
        self.stream.executor = Some(executor);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = StreamOptions::default();
        assert!(!options.head_only);
        assert_eq!(options.chunk_size, DEFAULT_CHUNK_SIZE);
        assert!(options.executor.is_none());
        assert!(!SaveOptions::new().force);
    }

    #[test]
    fn test_zero_chunk_size_clamped() {
        assert_eq!(StreamOptions::default().chunk_size(0).chunk_size, 1);
    }

    #[test]
    fn test_no_runtime_is_an_error() {
        let err = StreamOptions::default().resolve_executor().unwrap_err();
        assert!(matches!(err, crate::Error::NoRuntime));
    }

    #[test]
    fn test_injected_executor_works_outside_runtime() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let options = StreamOptions::default().executor(Executor::new(runtime.handle().clone()));
        assert!(options.resolve_executor().is_ok());
    }

    #[test]
    fn test_injected_transport_wins() {
        let mock = Arc::new(courier_fetch::mock::MockTransport::new(200));
        let options = StreamOptions::default().transport(mock);
        assert!(options.resolve_transport().is_ok());
        assert!(format!("{options:?}").contains("{ ... }"));
    }
}
