//! Inbound and outbound messages
//!
//! A message is a JSON object. Handlers read fields from the inbound message
//! and return a [`Fragment`] which is merged into it to form the outbound
//! message; fields the handler does not mention pass through unchanged.

use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// A message flowing through the node
pub type Message = Map<String, Value>;

/// The part of the outbound message a handler produces
pub type Fragment = Map<String, Value>;

/// Field a command result is returned in
pub const PAYLOAD: &str = "payload";

/// Build a message from a JSON value, which must be an object.
pub fn from_value(value: Value) -> Result<Message> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::InvalidInput(format!(
            "message must be a JSON object, got {}",
            other
        ))),
    }
}

/// Copy every field of `fragment` into `message`, replacing existing ones.
pub fn merge(message: &mut Message, fragment: Fragment) {
    for (key, value) in fragment {
        message.insert(key, value);
    }
}

/// A fragment without fields, returned by commands that only act.
pub fn empty() -> Fragment {
    Fragment::new()
}

/// `{ payload: value }`
pub fn with_payload(value: impl Into<Value>) -> Fragment {
    let mut fragment = Fragment::new();
    fragment.insert(PAYLOAD.to_string(), value.into());
    fragment
}

/// `{ payload: value }` for any serializable value
pub fn with_serialized_payload<T: Serialize>(value: &T) -> Result<Fragment> {
    Ok(with_payload(to_json(value)?))
}

pub fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|e| Error::InvalidState(format!("could not serialize result: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_replaces_and_keeps() {
        let mut message = from_value(json!({"topic": "group.get.volume", "payload": "x", "_msgid": "1"})).unwrap();
        merge(&mut message, with_payload(12));

        assert_eq!(message["payload"], json!(12));
        assert_eq!(message["_msgid"], json!("1"));
        assert_eq!(message["topic"], json!("group.get.volume"));
    }

    #[test]
    fn test_serialization_failure_is_reported() {
        let mut tuple_keys = std::collections::BTreeMap::new();
        tuple_keys.insert((1, 2), "x");

        let err = with_serialized_payload(&tuple_keys).unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
        assert!(to_json(&tuple_keys).is_err());
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(from_value(json!([1, 2])).is_err());
        assert!(from_value(json!("play")).is_err());
    }
}
