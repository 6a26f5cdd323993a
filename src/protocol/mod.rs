//! Protocol Module
//!
//! JSON payloads of the HTTP front end.
//!
//! ## Endpoints
//! - `POST /create`: `{"storageName": "s1", "keyType": "integer"}`
//! - `PUT  /put`:    `{"storageName": "s1", "key": 1, "value": "a"}`
//! - `GET  /get`:    `{"storageName": "s1", "key": 1}`
//!
//! ## Values
//! The `value` of a put is stored as its JSON encoding and returned verbatim
//! by get, so any JSON document (including `null` and `""`) round-trips.
//!
//! ## Keys
//! Keys are coerced to the storage's declared key type:
//! - integer: JSON number within i32
//! - long:    JSON number within i64
//! - string:  JSON string
//! - bytes:   JSON string (UTF-8 bytes) or array of 0–255

mod json;
mod request;

pub use json::key_from_json;
pub use request::{CreateRequest, GetRequest, PutRequest};
