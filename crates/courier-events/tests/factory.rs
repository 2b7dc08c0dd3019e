use courier_events::{EventError, EventFactory, JsonObject, Result, ShardId};
use serde_json::{Value, json};

#[derive(Debug, PartialEq)]
enum Event {
    Ready { shard: ShardId, session: String },
    Unknown(String),
}

/// Dispatches on the `t` field the way a gateway client would.
struct Dispatcher;

impl EventFactory for Dispatcher {
    type Event = Event;

    fn deserialize(&self, shard: ShardId, payload: &JsonObject) -> Result<Event> {
        match payload.get("t").and_then(Value::as_str) {
            Some("READY") => {
                #[derive(serde::Deserialize)]
                struct Ready {
                    session_id: String,
                }

                let data = payload.get("d").cloned().unwrap_or(Value::Null);
                let ready: Ready = serde_json::from_value(data)?;
                Ok(Event::Ready {
                    shard,
                    session: ready.session_id,
                })
            }
            Some(other) => Ok(Event::Unknown(other.to_owned())),
            None => Ok(Event::Unknown(String::new())),
        }
    }
}

#[test]
fn test_custom_factory_dispatch() {
    let payload = json!({"t": "READY", "d": {"session_id": "abc"}});
    let event = Dispatcher.deserialize_value(ShardId(2), &payload).unwrap();
    assert_eq!(event, Event::Ready {
        shard: ShardId(2),
        session: "abc".into(),
    });

    let other = Dispatcher.deserialize_value(ShardId(0), &json!({"t": "TYPING_START"})).unwrap();
    assert_eq!(other, Event::Unknown("TYPING_START".into()));
}

#[test]
fn test_custom_factory_validation_error() {
    let payload = json!({"t": "READY", "d": {"session": 1}});
    let err = Dispatcher.deserialize_value(ShardId(0), &payload).unwrap_err();
    assert!(matches!(err, EventError::Validation(_)));
}

#[test]
fn test_string_payload_is_rejected() {
    let err = Dispatcher.deserialize_value(ShardId(0), &json!("READY")).unwrap_err();
    assert_eq!(err.to_string(), "expected a JSON object payload but received string");
}
