use std::fmt;
use std::fs::File;
use std::path::PathBuf;

use bytes::{Bytes, BytesMut};
use courier_fetch::{Exchange, ResponseHead};
use futures_util::stream::{self, Stream, StreamExt};

use crate::data_uri::to_data_uri;
use crate::error::{Error, Result};
use crate::executor::Executor;
use crate::mime::guess_mimetype_from_filename;
use crate::source::ChunkStream;

/// An open, forward-only read of a resource.
///
/// Obtained from [`ReaderHandle::enter`](crate::ReaderHandle::enter). Chunks
/// come out in the source's order and the reader cannot be rewound; open a new
/// stream to read again.
pub struct ChunkedReader {
    filename: String,
    mimetype: Option<String>,
    source: Source,
}

enum Source {
    File(FileSource),
    Web(WebSource),
    Memory(MemorySource),
}

struct FileSource {
    file: Option<File>,
    path: PathBuf,
    executor: Executor,
    chunk_size: usize,
    done: bool,
}

struct WebSource {
    exchange: Option<Exchange>,
    head: ResponseHead,
    head_only: bool,
    finished: bool,
}

struct MemorySource {
    chunks: ChunkStream,
    buffer: BytesMut,
    chunk_size: usize,
    exhausted: bool,
}

impl ChunkedReader {
    pub(crate) fn from_file(
        filename: String,
        path: PathBuf,
        file: File,
        executor: Executor,
        chunk_size: usize,
    ) -> Self {
        let mimetype = guess_mimetype_from_filename(&filename).map(str::to_owned);
        Self {
            filename,
            mimetype,
            source: Source::File(FileSource {
                file: Some(file),
                path,
                executor,
                chunk_size: chunk_size.max(1),
                done: false,
            }),
        }
    }

    pub(crate) fn from_exchange(filename: String, exchange: Exchange, head_only: bool) -> Self {
        let head = exchange.response.head().clone();
        Self {
            filename,
            mimetype: head.content_type.clone(),
            source: Source::Web(WebSource {
                exchange: Some(exchange),
                head,
                head_only,
                finished: false,
            }),
        }
    }

    pub(crate) fn from_chunks(
        filename: String,
        mimetype: Option<String>,
        chunks: ChunkStream,
        chunk_size: usize,
    ) -> Self {
        Self {
            filename,
            mimetype,
            source: Source::Memory(MemorySource {
                chunks,
                buffer: BytesMut::new(),
                chunk_size: chunk_size.max(1),
                exhausted: false,
            }),
        }
    }

    pub fn filename(&self) -> &str { &self.filename }

    /// For remote reads this is the `Content-Type` the server answered with.
    pub fn mimetype(&self) -> Option<&str> { self.mimetype.as_deref() }

    /// Status line and headers of a remote read.
    pub fn response(&self) -> Option<&ResponseHead> {
        match &self.source {
            Source::Web(web) => Some(&web.head),
            _ => None,
        }
    }

    pub fn head_only(&self) -> bool { matches!(&self.source, Source::Web(web) if web.head_only) }

    /// `Content-Length` of a remote read, when the server sent one.
    pub fn size(&self) -> Option<u64> { self.response().and_then(|head| head.content_length) }

    /// The next chunk, or `None` once the source is drained.
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        match &mut self.source {
            Source::File(file) => file.next_chunk().await,
            Source::Web(web) => web.next_chunk().await,
            Source::Memory(memory) => memory.next_chunk().await,
        }
    }

    /// The remaining chunks as a stream.
    pub fn chunks(&mut self) -> impl Stream<Item = Result<Bytes>> + Send + '_ {
        stream::try_unfold(self, |reader| async move {
            let chunk = reader.next_chunk().await?;
            Ok::<_, Error>(chunk.map(|chunk| (chunk, reader)))
        })
    }

    /// Drain the reader into one buffer.
    ///
    /// A head-only remote read returns an empty buffer.
    pub async fn read(&mut self) -> Result<Bytes> {
        if let Source::Web(web) = &mut self.source {
            return web.read().await;
        }

        let mut data = BytesMut::new();
        while let Some(chunk) = self.next_chunk().await? {
            data.extend_from_slice(&chunk);
        }
        Ok(data.freeze())
    }

    /// Drain the reader and encode the content as a base64 data URI.
    pub async fn data_uri(&mut self) -> Result<String> {
        let data = self.read().await?;
        to_data_uri(&data, self.mimetype.as_deref())
    }

    /// Release the file or HTTP exchange behind this reader.
    ///
    /// The reader yields nothing afterwards.
    pub(crate) async fn close(&mut self) -> Result<()> {
        match &mut self.source {
            Source::File(source) => {
                source.done = true;
                if let Some(file) = source.file.take() {
                    source.executor.run(move || drop(file)).await?;
                }
            }
            Source::Web(web) => {
                web.finished = true;
                if let Some(exchange) = web.exchange.take() {
                    exchange.close().await;
                }
            }
            Source::Memory(memory) => memory.release(),
        }
        Ok(())
    }

    /// Synchronous counterpart of [`close`](Self::close) for `Drop` paths.
    ///
    /// An HTTP exchange is dropped without its async close.
    pub(crate) fn release_now(&mut self) -> bool {
        match &mut self.source {
            Source::File(source) => {
                source.done = true;
                source.file.take().is_some()
            }
            Source::Web(web) => {
                web.finished = true;
                web.exchange.take().is_some()
            }
            Source::Memory(memory) => {
                memory.release();
                false
            }
        }
    }
}

impl FileSource {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        if self.done {
            return Ok(None);
        }
        let Some(mut file) = self.file.take() else {
            return Ok(None);
        };

        let size = self.chunk_size;
        let (file, block) = self
            .executor
            .run(move || {
                let block = courier_fs::read_block(&mut file, size);
                (file, block)
            })
            .await?;
        self.file = Some(file);

        let block = block.map_err(|e| courier_fs::from_io(&self.path, e))?;
        if block.len() < size {
            self.done = true;
        }
        if block.is_empty() {
            return Ok(None);
        }
        Ok(Some(Bytes::from(block)))
    }
}

impl WebSource {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        if self.finished {
            return Ok(None);
        }
        if self.head_only {
            self.finished = true;
            return Ok(Some(Bytes::new()));
        }
        let Some(exchange) = self.exchange.as_mut() else {
            return Ok(None);
        };

        let chunk = exchange.response.chunk().await?;
        if chunk.is_none() {
            self.finished = true;
        }
        Ok(chunk)
    }

    async fn read(&mut self) -> Result<Bytes> {
        if self.finished || self.head_only {
            self.finished = true;
            return Ok(Bytes::new());
        }
        let Some(exchange) = self.exchange.as_mut() else {
            return Ok(Bytes::new());
        };

        let body = exchange.response.body().await?;
        self.finished = true;
        Ok(body)
    }
}

impl MemorySource {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        loop {
            if self.buffer.len() >= self.chunk_size {
                return Ok(Some(self.buffer.split_to(self.chunk_size).freeze()));
            }
            if self.exhausted {
                return Ok((!self.buffer.is_empty()).then(|| self.buffer.split().freeze()));
            }

            match self.chunks.next().await {
                Some(chunk) => {
                    let chunk = chunk?;
                    if self.buffer.is_empty() && chunk.len() >= self.chunk_size {
                        return Ok(Some(chunk));
                    }
                    self.buffer.extend_from_slice(&chunk);
                }
                None => self.exhausted = true,
            }
        }
    }

    fn release(&mut self) {
        self.chunks = stream::empty().boxed();
        self.buffer.clear();
        self.exhausted = true;
    }
}

impl fmt::Debug for ChunkedReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.source {
            Source::File(_) => "file",
            Source::Web(_) => "web",
            Source::Memory(_) => "memory",
        };
        f.debug_struct("ChunkedReader")
            .field("filename", &self.filename)
            .field("mimetype", &self.mimetype)
            .field("source", &kind)
            .finish_non_exhaustive()
    }
}
