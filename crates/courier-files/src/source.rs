use std::fmt;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use bytes::{Bytes, BytesMut};
use futures_util::stream::{self, BoxStream, Stream, StreamExt};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{Error, Result};
use crate::options::DEFAULT_CHUNK_SIZE;

/// The single internal shape every in-memory source is adapted to.
pub type ChunkStream = BoxStream<'static, Result<Bytes>>;

/// A value a lazy source may yield.
///
/// Byte values pass through, text is encoded as UTF-8. Dynamically typed
/// values ([`serde_json::Value`]) must be strings; anything else is rejected
/// with [`Error::UnexpectedChunkType`].
pub trait IntoChunk {
    fn into_chunk(self) -> Result<Bytes>;
}

impl IntoChunk for Bytes {
    fn into_chunk(self) -> Result<Bytes> { Ok(self) }
}

impl IntoChunk for Vec<u8> {
    fn into_chunk(self) -> Result<Bytes> { Ok(Bytes::from(self)) }
}

impl IntoChunk for &'static [u8] {
    fn into_chunk(self) -> Result<Bytes> { Ok(Bytes::from_static(self)) }
}

impl IntoChunk for String {
    fn into_chunk(self) -> Result<Bytes> { Ok(Bytes::from(self)) }
}

impl IntoChunk for &'static str {
    fn into_chunk(self) -> Result<Bytes> { Ok(Bytes::from_static(self.as_bytes())) }
}

impl IntoChunk for serde_json::Value {
    fn into_chunk(self) -> Result<Bytes> {
        let found = match self {
            serde_json::Value::String(text) => return Ok(Bytes::from(text)),
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "bool",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        };
        Err(Error::UnexpectedChunkType {
            found: found.to_owned(),
        })
    }
}

impl<T: IntoChunk> IntoChunk for std::io::Result<T> {
    fn into_chunk(self) -> Result<Bytes> { self?.into_chunk() }
}

fn adapt_iter<I>(iter: I) -> ChunkStream
where
    I: IntoIterator,
    I::IntoIter: Send + 'static,
    I::Item: IntoChunk + 'static,
{
    stream::iter(iter.into_iter().map(IntoChunk::into_chunk)).boxed()
}

fn adapt_stream<S>(source: S) -> ChunkStream
where
    S: Stream + Send + 'static,
    S::Item: IntoChunk,
{
    source.map(IntoChunk::into_chunk).boxed()
}

fn adapt_reader<R>(reader: R) -> ChunkStream
where
    R: AsyncRead + Send + Unpin + 'static,
{
    stream::try_unfold(reader, |mut reader| async move {
        let mut block = BytesMut::with_capacity(DEFAULT_CHUNK_SIZE);
        let read = reader.read_buf(&mut block).await?;
        Ok::<_, Error>((read > 0).then(|| (block.freeze(), reader)))
    })
    .boxed()
}

fn slice_buffer(data: Bytes, chunk_size: usize) -> ChunkStream {
    let len = data.len();
    let chunk_size = chunk_size.max(1);
    stream::iter((0..len).step_by(chunk_size).map(move |start| {
        Ok::<_, Error>(data.slice(start..(start + chunk_size).min(len)))
    }))
    .boxed()
}

type Factory = Arc<dyn Fn() -> ChunkStream + Send + Sync>;

#[derive(Clone)]
enum Repr {
    Buffer(Bytes),
    Once(Arc<Mutex<Option<ChunkStream>>>),
    Reusable(Factory),
}

/// Data behind an [`InMemoryResource`](crate::InMemoryResource).
///
/// The input shape is fixed when the source is built and adapted once into a
/// [`ChunkStream`]:
///
/// - a flat buffer, sliced into blocks on every stream;
/// - a one-shot iterator, stream or async reader, which can back exactly one
///   stream. Later streams fail with [`Error::SourceConsumed`];
/// - a reusable factory, called once per stream.
#[derive(Clone)]
pub struct LazySource(Repr);

impl LazySource {
    pub fn bytes(data: impl Into<Bytes>) -> Self { Self(Repr::Buffer(data.into())) }

    /// A one-shot synchronous iterator (or generator-like adaptor).
    pub fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator,
        I::IntoIter: Send + 'static,
        I::Item: IntoChunk + 'static,
    {
        Self::once(adapt_iter(iter))
    }

    /// A one-shot asynchronous stream.
    pub fn from_stream<S>(source: S) -> Self
    where
        S: Stream + Send + 'static,
        S::Item: IntoChunk,
    {
        Self::once(adapt_stream(source))
    }

    /// A one-shot async reader, read in [`DEFAULT_CHUNK_SIZE`] blocks.
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        Self::once(adapt_reader(reader))
    }

    /// A reusable iterable: `factory` builds a fresh iterator per stream.
    pub fn reusable_iter<F, I>(factory: F) -> Self
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: IntoIterator,
        I::IntoIter: Send + 'static,
        I::Item: IntoChunk + 'static,
    {
        Self(Repr::Reusable(Arc::new(move || adapt_iter(factory()))))
    }

    /// A reusable async iterable: `factory` builds a fresh stream per stream.
    pub fn reusable_stream<F, S>(factory: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Stream + Send + 'static,
        S::Item: IntoChunk,
    {
        Self(Repr::Reusable(Arc::new(move || adapt_stream(factory()))))
    }

    fn once(chunks: ChunkStream) -> Self { Self(Repr::Once(Arc::new(Mutex::new(Some(chunks))))) }

    /// The flat buffer, if this source is one.
    pub fn as_buffer(&self) -> Option<&Bytes> {
        match &self.0 {
            Repr::Buffer(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_one_shot(&self) -> bool { matches!(self.0, Repr::Once(_)) }

    pub(crate) fn open(&self, chunk_size: usize) -> Result<ChunkStream> {
        match &self.0 {
            Repr::Buffer(data) => Ok(slice_buffer(data.clone(), chunk_size)),
            Repr::Once(slot) => slot
                .lock()
                .ok()
                .and_then(|mut slot| slot.take())
                .ok_or(Error::SourceConsumed),
            Repr::Reusable(factory) => Ok(factory()),
        }
    }
}

impl fmt::Debug for LazySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::Buffer(data) => f.debug_tuple("Buffer").field(&data.len()).finish(),
            Repr::Once(_) => f.write_str("Once"),
            Repr::Reusable(_) => f.write_str("Reusable"),
        }
    }
}

impl From<Rawish> for LazySource {
    fn from(raw: Rawish) -> Self { Self::bytes(unwrap_bytes(raw)) }
}

impl From<Bytes> for LazySource {
    fn from(data: Bytes) -> Self { Self::bytes(data) }
}

impl From<Vec<u8>> for LazySource {
    fn from(data: Vec<u8>) -> Self { Self::bytes(data) }
}

impl From<&[u8]> for LazySource {
    fn from(data: &[u8]) -> Self { Self::bytes(Bytes::copy_from_slice(data)) }
}

impl<const N: usize> From<&[u8; N]> for LazySource {
    fn from(data: &[u8; N]) -> Self { Self::bytes(Bytes::copy_from_slice(data)) }
}

/// Raw byte-like inputs.
#[derive(Debug, Clone)]
pub enum Rawish {
    Bytes(Bytes),
    /// Read from its current position to the end.
    ByteBuffer(Cursor<Vec<u8>>),
    /// Read from its current position to the end, as UTF-8.
    TextBuffer(Cursor<String>),
}

impl From<Bytes> for Rawish {
    fn from(data: Bytes) -> Self { Rawish::Bytes(data) }
}

impl From<Vec<u8>> for Rawish {
    fn from(data: Vec<u8>) -> Self { Rawish::Bytes(Bytes::from(data)) }
}

impl From<&[u8]> for Rawish {
    fn from(data: &[u8]) -> Self { Rawish::Bytes(Bytes::copy_from_slice(data)) }
}

impl<const N: usize> From<&[u8; N]> for Rawish {
    fn from(data: &[u8; N]) -> Self { Rawish::Bytes(Bytes::copy_from_slice(data)) }
}

impl From<Cursor<Vec<u8>>> for Rawish {
    fn from(buffer: Cursor<Vec<u8>>) -> Self { Rawish::ByteBuffer(buffer) }
}

impl From<Cursor<String>> for Rawish {
    fn from(buffer: Cursor<String>) -> Self { Rawish::TextBuffer(buffer) }
}

fn remaining(data: Bytes, position: u64) -> Bytes {
    let start = usize::try_from(position).map_or(data.len(), |p| p.min(data.len()));
    data.slice(start..)
}

/// Convert a byte-like value to [`Bytes`].
pub fn unwrap_bytes(raw: impl Into<Rawish>) -> Bytes {
    match raw.into() {
        Rawish::Bytes(data) => data,
        Rawish::ByteBuffer(buffer) => {
            let position = buffer.position();
            remaining(Bytes::from(buffer.into_inner()), position)
        }
        Rawish::TextBuffer(buffer) => {
            let position = buffer.position();
            remaining(Bytes::from(buffer.into_inner()), position)
        }
    }
}
