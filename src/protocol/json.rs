//! JSON key coercion

use serde_json::Value;

use crate::codec::{Key, KeyType};
use crate::error::{KvError, Result};

/// Convert a JSON key into a key of the declared type
///
/// Fails with `InvalidKeyType` when the JSON value cannot represent a key of
/// that type (wrong kind, or a number out of range).
pub fn key_from_json(value: &Value, key_type: KeyType) -> Result<Key> {
    let key = match key_type {
        KeyType::Integer => value
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(Key::Integer),
        KeyType::Long => value.as_i64().map(Key::Long),
        KeyType::String => value.as_str().map(Key::from),
        KeyType::Bytes => match value {
            Value::String(s) => Some(Key::Bytes(s.as_bytes().to_vec())),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_u64().and_then(|b| u8::try_from(b).ok()))
                .collect::<Option<Vec<u8>>>()
                .map(Key::Bytes),
            _ => None,
        },
    };

    key.ok_or_else(|| KvError::invalid_key_type(key_type, describe(value)))
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(n) => format!("number {}", n),
        Value::String(_) => "string".to_string(),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}
