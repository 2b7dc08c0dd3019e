use std::fmt;
use std::path::PathBuf;

use courier_fetch::Method;

use crate::error::{Error, Result};
use crate::options::StreamOptions;
use crate::reader::ChunkedReader;
use crate::source::LazySource;

/// What to open when the handle is entered.
pub(crate) enum Opener {
    File { path: PathBuf },
    Remote { url: String },
    Memory { source: LazySource, mimetype: String },
}

/// Scoped access to one read of a resource.
///
/// Created by [`Streamable::stream`](crate::Streamable::stream) without doing
/// any I/O. [`enter`](Self::enter) opens the file or HTTP exchange and hands
/// out the [`ChunkedReader`]; [`exit`](Self::exit) closes it again. A handle
/// dropped while open (for example because the surrounding task was
/// cancelled) releases its transport synchronously.
///
/// # Examples
///
/// ```no_run
/// use courier_files::{InMemoryResource, StreamOptions, Streamable};
///
/// # async fn example() -> courier_files::Result<()> {
/// let resource = InMemoryResource::new(b"hello".to_vec(), "hello.txt");
/// let data = resource
///     .stream(&StreamOptions::default())
///     .scope(async |reader| reader.read().await)
///     .await?;
/// assert_eq!(&data[..], b"hello");
/// # Ok(())
/// # }
/// ```
pub struct ReaderHandle {
    filename: String,
    opener: Opener,
    options: StreamOptions,
    reader: Option<ChunkedReader>,
}

impl ReaderHandle {
    pub(crate) fn new(filename: String, opener: Opener, options: &StreamOptions) -> Self {
        Self {
            filename,
            opener,
            options: options.clone(),
            reader: None,
        }
    }

    pub fn is_open(&self) -> bool { self.reader.is_some() }

    /// The open reader, if [`enter`](Self::enter) succeeded and no
    /// [`exit`](Self::exit) followed.
    pub fn reader(&mut self) -> Option<&mut ChunkedReader> { self.reader.as_mut() }

    /// Open the underlying transport.
    ///
    /// Fails with [`Error::AlreadyOpen`] while a reader is open. A handle can
    /// be entered again after [`exit`](Self::exit); one-shot in-memory sources
    /// then fail with [`Error::SourceConsumed`].
    pub async fn enter(&mut self) -> Result<&mut ChunkedReader> {
        if self.reader.is_some() {
            return Err(Error::AlreadyOpen);
        }

        let reader = open(&self.opener, self.filename.clone(), &self.options).await?;
        tracing::debug!(filename = %self.filename, "opened reader");
        Ok(self.reader.insert(reader))
    }

    /// Close the reader and release its file or HTTP exchange.
    ///
    /// Fails with [`Error::NotOpen`] when nothing is open.
    pub async fn exit(&mut self) -> Result<()> {
        let mut reader = self.reader.take().ok_or(Error::NotOpen)?;
        reader.close().await?;
        tracing::debug!(filename = %self.filename, "closed reader");
        Ok(())
    }

    /// Enter, run `body` on the reader and exit, even when `body` fails.
    ///
    /// An error from `body` takes precedence over one from closing.
    pub async fn scope<T, F>(mut self, body: F) -> Result<T>
    where
        F: AsyncFnOnce(&mut ChunkedReader) -> Result<T>,
    {
        let reader = self.enter().await?;
        let result = body(reader).await;
        let closed = self.exit().await;

        let value = result?;
        closed?;
        Ok(value)
    }
}

async fn open(opener: &Opener, filename: String, options: &StreamOptions) -> Result<ChunkedReader> {
    let chunk_size = options.chunk_size;

    match opener {
        Opener::File { path } => {
            let executor = options.resolve_executor()?;
            let target = path.clone();
            let file = executor.run(move || courier_fs::open_read(target)).await??;
            let path = courier_fs::expand_home(path);
            Ok(ChunkedReader::from_file(filename, path, file, executor, chunk_size))
        }
        Opener::Remote { url } => {
            let transport = options.resolve_transport()?;
            let method = if options.head_only { Method::Head } else { Method::Get };
            let exchange = courier_fetch::send(transport.as_ref(), method, url).await?;
            Ok(ChunkedReader::from_exchange(filename, exchange, options.head_only))
        }
        Opener::Memory { source, mimetype } => {
            let chunks = source.open(chunk_size)?;
            Ok(ChunkedReader::from_chunks(filename, Some(mimetype.clone()), chunks, chunk_size))
        }
    }
}

impl Drop for ReaderHandle {
    fn drop(&mut self) {
        if let Some(mut reader) = self.reader.take()
            && reader.release_now()
        {
            tracing::debug!(filename = %self.filename, "released reader dropped while open");
        }
    }
}

impl fmt::Debug for ReaderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.opener {
            Opener::File { .. } => "file",
            Opener::Remote { .. } => "web",
            Opener::Memory { .. } => "memory",
        };
        f.debug_struct("ReaderHandle")
            .field("filename", &self.filename)
            .field("source", &kind)
            .field("open", &self.is_open())
            .finish()
    }
}
