use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{EventError, Result};

/// A decoded JSON object, as delivered by the gateway.
pub type JsonObject = serde_json::Map<String, Value>;

/// Index of the gateway shard a payload arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ShardId(pub u32);

impl fmt::Display for ShardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "shard {}", self.0) }
}

impl From<u32> for ShardId {
    fn from(id: u32) -> Self { Self(id) }
}

/// Turns raw event payloads into typed events.
pub trait EventFactory {
    type Event;

    fn deserialize(&self, shard: ShardId, payload: &JsonObject) -> Result<Self::Event>;

    /// Like [`deserialize`](Self::deserialize), for a payload that has not
    /// been checked to be an object yet.
    fn deserialize_value(&self, shard: ShardId, payload: &Value) -> Result<Self::Event> {
        match payload {
            Value::Object(object) => self.deserialize(shard, object),
            other => Err(EventError::NotAnObject {
                found: json_type(other),
            }),
        }
    }
}

/// An event together with the shard that received it.
#[derive(Debug, Clone, PartialEq)]
pub struct ShardEvent<E> {
    pub shard: ShardId,
    pub event: E,
}

/// [`EventFactory`] for any event type implementing [`serde::Deserialize`].
///
/// ```
/// use courier_events::{EventFactory, SerdeEventFactory, ShardId};
///
/// #[derive(serde::Deserialize)]
/// struct TypingStart {
///     channel_id: String,
/// }
///
/// let payload = serde_json::json!({"channel_id": "123"});
/// let factory = SerdeEventFactory::<TypingStart>::new();
/// let typed = factory.deserialize_value(ShardId(0), &payload).unwrap();
/// assert_eq!(typed.event.channel_id, "123");
/// ```
pub struct SerdeEventFactory<E> {
    _event: PhantomData<fn() -> E>,
}

impl<E> SerdeEventFactory<E> {
    pub fn new() -> Self { Self { _event: PhantomData } }
}

impl<E> Default for SerdeEventFactory<E> {
    fn default() -> Self { Self::new() }
}

impl<E> Clone for SerdeEventFactory<E> {
    fn clone(&self) -> Self { Self::new() }
}

impl<E> fmt::Debug for SerdeEventFactory<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerdeEventFactory")
            .field("event", &std::any::type_name::<E>())
            .finish()
    }
}

impl<E: DeserializeOwned> EventFactory for SerdeEventFactory<E> {
    type Event = ShardEvent<E>;

    fn deserialize(&self, shard: ShardId, payload: &JsonObject) -> Result<Self::Event> {
        match serde_json::from_value(Value::Object(payload.clone())) {
            Ok(event) => Ok(ShardEvent { shard, event }),
            Err(err) => {
                tracing::debug!(%shard, event = std::any::type_name::<E>(), error = %err, "rejected event payload");
                Err(EventError::Validation(err))
            }
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
