//! Blocking filesystem primitives used when reading and saving resources.
//!
//! Every function in this crate performs blocking syscalls. Async callers are
//! expected to run them on a worker pool rather than on the scheduler thread.
//!
//! Writes never land on the destination directly: content is written to a
//! [`StagedFile`] next to the destination and renamed into place on commit,
//! so a failed save never leaves a partially written target behind.

mod error;
mod path;
mod rw;
mod staged;

pub use error::{Error, Result, from_io};
pub use path::{expand_home, resolve_write_path};
pub use rw::{copy_to, open_read, read_block, write_bytes};
pub use staged::StagedFile;
