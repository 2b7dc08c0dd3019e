//! Building blocks for a chat-platform API client.
//!
//! - [`files`] - attachments: local files, in-memory data and remote URLs
//!   behind one chunked streaming contract
//! - [`events`] - the boundary where gateway payloads become typed events
//! - [`fetch`] - the HTTP transport contract remote attachments are read through
//! - [`fs`] - blocking filesystem primitives used when saving
//!
//! The most common items are re-exported at the root and in [`prelude`].

pub use courier_events as events;
pub use courier_fetch as fetch;
pub use courier_files as files;
pub use courier_fs as fs;

pub use courier_events::{EventError, EventFactory, JsonObject, SerdeEventFactory, ShardEvent, ShardId};
pub use courier_fetch::{HttpError, HttpErrorKind, HttpTransport};
pub use courier_files::{
    ChunkedReader, Error, Executor, InMemoryResource, LazySource, LocalFileResource, ReaderHandle,
    RemoteResource, Resource, Resourceish, Result, SaveOptions, StreamOptions, Streamable,
    ensure_resource,
};

pub mod prelude {
    pub use courier_events::EventFactory;
    pub use courier_files::{SaveOptions, StreamOptions, Streamable, ensure_resource};
}
