//! The [`Resource`] sum type and its variants.

mod file;
mod memory;
mod remote;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use courier_fs::StagedFile;

pub use file::LocalFileResource;
pub use memory::InMemoryResource;
pub use remote::RemoteResource;

use crate::error::Result;
use crate::executor::Executor;
use crate::handle::ReaderHandle;
use crate::naming::SPOILER_TAG;
use crate::options::{SaveOptions, StreamOptions};
use crate::reader::ChunkedReader;

/// Something with a name that can be read as a sequence of byte chunks.
pub trait Streamable {
    /// Identity of the resource. Equality and hashing use only this.
    fn url(&self) -> String;

    /// Name of the content. Never requires I/O.
    fn filename(&self) -> String;

    /// Text after the last `.` of the filename.
    fn extension(&self) -> Option<String> {
        self.filename()
            .rsplit_once('.')
            .map(|(_, extension)| extension.to_owned())
    }

    /// A fresh, unopened handle. No I/O happens until it is entered.
    fn stream(&self, options: &StreamOptions) -> ReaderHandle;
}

/// Any of the supported resource kinds.
#[derive(Clone)]
pub enum Resource {
    Remote(RemoteResource),
    File(LocalFileResource),
    Memory(InMemoryResource),
}

impl Resource {
    /// Read the whole resource into memory.
    pub async fn read(&self, options: &StreamOptions) -> Result<Bytes> {
        match self {
            Resource::Remote(remote) => remote.read(options).await,
            Resource::File(file) => file.read(options).await,
            Resource::Memory(memory) => memory.read(options).await,
        }
    }

    /// Write the resource to `path`.
    ///
    /// `~` is expanded. When `path` is a directory the resource's filename is
    /// appended. An existing target is rejected with
    /// [`courier_fs::Error::AlreadyExists`] unless [`SaveOptions::force`] is
    /// set. Content goes to a staging file next to the target and is renamed
    /// into place once complete. Returns the final path.
    pub async fn save(&self, path: impl AsRef<Path>, options: &SaveOptions) -> Result<PathBuf> {
        match self {
            Resource::Remote(remote) => remote.save(path, options).await,
            Resource::File(file) => file.save(path, options).await,
            Resource::Memory(memory) => memory.save(path, options).await,
        }
    }

    pub fn is_remote(&self) -> bool { matches!(self, Resource::Remote(_)) }

    pub fn as_remote(&self) -> Option<&RemoteResource> {
        match self {
            Resource::Remote(remote) => Some(remote),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&LocalFileResource> {
        match self {
            Resource::File(file) => Some(file),
            _ => None,
        }
    }

    pub fn as_memory(&self) -> Option<&InMemoryResource> {
        match self {
            Resource::Memory(memory) => Some(memory),
            _ => None,
        }
    }
}

impl Streamable for Resource {
    fn url(&self) -> String {
        match self {
            Resource::Remote(remote) => remote.url(),
            Resource::File(file) => file.url(),
            Resource::Memory(memory) => memory.url(),
        }
    }

    fn filename(&self) -> String {
        match self {
            Resource::Remote(remote) => remote.filename(),
            Resource::File(file) => file.filename(),
            Resource::Memory(memory) => memory.filename(),
        }
    }

    fn stream(&self, options: &StreamOptions) -> ReaderHandle {
        match self {
            Resource::Remote(remote) => remote.stream(options),
            Resource::File(file) => file.stream(options),
            Resource::Memory(memory) => memory.stream(options),
        }
    }
}

impl From<RemoteResource> for Resource {
    fn from(remote: RemoteResource) -> Self { Resource::Remote(remote) }
}

impl From<LocalFileResource> for Resource {
    fn from(file: LocalFileResource) -> Self { Resource::File(file) }
}

impl From<InMemoryResource> for Resource {
    fn from(memory: InMemoryResource) -> Self { Resource::Memory(memory) }
}

macro_rules! identified_by_url {
    ($($ty:ident),+ $(,)?) => {$(
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool { self.url() == other.url() }
        }

        impl Eq for $ty {}

        impl Hash for $ty {
            fn hash<H: Hasher>(&self, state: &mut H) { self.url().hash(state) }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.url()) }
        }

        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($ty))
                    .field("url", &self.url())
                    .field("filename", &self.filename())
                    .finish()
            }
        }
    )+};
}

identified_by_url!(Resource, RemoteResource, LocalFileResource, InMemoryResource);

fn spoiler_filename(base: String, spoiler: bool) -> String {
    if spoiler { format!("{SPOILER_TAG}{base}") } else { base }
}

fn attachment_url(filename: &str) -> String { format!("attachment://{filename}") }

/// Enter, drain and exit `handle`. A read error takes precedence over one
/// from closing.
async fn read_all(mut handle: ReaderHandle) -> Result<Bytes> {
    let read = match handle.enter().await {
        Ok(reader) => reader.read().await,
        Err(err) => return Err(err),
    };
    let closed = handle.exit().await;

    let data = read?;
    closed?;
    Ok(data)
}

/// Write every chunk of `handle` to `path` through a staging file.
async fn save_streamed(
    mut handle: ReaderHandle,
    filename: String,
    path: &Path,
    options: &SaveOptions,
) -> Result<PathBuf> {
    let executor = options.stream.resolve_executor()?;
    let force = options.force;

    let target = path.to_path_buf();
    let staged = executor
        .run(move || {
            courier_fs::resolve_write_path(target, &filename, force).and_then(StagedFile::create)
        })
        .await??;

    let written = match handle.enter().await {
        Ok(reader) => write_chunks(reader, staged, &executor).await,
        Err(err) => Err(err),
    };
    let closed = if handle.is_open() { handle.exit().await } else { Ok(()) };

    let staged = written?;
    closed?;
    Ok(executor.run(move || staged.commit(force)).await??)
}

async fn write_chunks(
    reader: &mut ChunkedReader,
    mut staged: StagedFile,
    executor: &Executor,
) -> Result<StagedFile> {
    while let Some(chunk) = reader.next_chunk().await? {
        let (returned, written) = executor
            .run(move || {
                let written = staged.write_all(&chunk);
                (staged, written)
            })
            .await?;
        staged = returned;
        written?;
    }
    Ok(staged)
}
