//! Event ingestion boundary.
//!
//! A gateway shard receives JSON payloads; an [`EventFactory`] turns each
//! payload into a typed event. How individual events map their fields is up
//! to the factory. [`SerdeEventFactory`] covers the common case where the
//! event type implements [`serde::Deserialize`].

mod error;
mod factory;

pub use error::{EventError, Result};
pub use factory::{EventFactory, JsonObject, SerdeEventFactory, ShardEvent, ShardId};
