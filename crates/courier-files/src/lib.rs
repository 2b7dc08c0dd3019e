//! Streamable resources for uploading to and downloading from the chat API.
//!
//! # Architecture
//!
//! - [`Resource`] - a named, typed handle to byte content: a remote URL, a
//!   local file, or in-memory data (a buffer or a lazy chunk producer)
//! - [`ReaderHandle`] - scoped acquisition of the transport behind one read;
//!   entering opens the file or HTTP exchange, exiting (or dropping) releases it
//! - [`ChunkedReader`] - the open, forward-only sequence of byte chunks
//! - [`ensure_resource`] - classifies paths, URLs, data URIs and raw bytes
//!
//! Blocking filesystem work always runs on an [`Executor`] (tokio's blocking
//! pool); remote reads go through an injectable
//! [`HttpTransport`](courier_fetch::HttpTransport).
//!
//! # Examples
//!
//! ```no_run
//! use courier_files::{StreamOptions, Streamable, ensure_resource};
//!
//! # async fn example() -> courier_files::Result<()> {
//! let resource = ensure_resource("https://example.com/cat.png");
//! let mut handle = resource.stream(&StreamOptions::default());
//! let reader = handle.enter().await?;
//! while let Some(chunk) = reader.next_chunk().await? {
//!     println!("{} bytes", chunk.len());
//! }
//! handle.exit().await?;
//! # Ok(())
//! # }
//! ```

mod data_uri;
mod ensure;
mod error;
mod executor;
mod handle;
mod mime;
mod naming;
mod options;
mod reader;
mod resource;
mod source;

pub use data_uri::{DataUri, DataUriError, parse_data_uri, to_data_uri};
pub use ensure::{Resourceish, ensure_path, ensure_resource};
pub use error::{Error, Result};
pub use executor::Executor;
pub use handle::ReaderHandle;
pub use mime::{guess_file_extension, guess_mimetype_from_data, guess_mimetype_from_filename};
pub use naming::{SPOILER_TAG, generate_filename_from_details};
pub use options::{DEFAULT_CHUNK_SIZE, SaveOptions, StreamOptions};
pub use reader::ChunkedReader;
pub use resource::{InMemoryResource, LocalFileResource, RemoteResource, Resource, Streamable};
pub use source::{ChunkStream, IntoChunk, LazySource, Rawish, unwrap_bytes};
