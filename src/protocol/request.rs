//! Request payloads

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /create`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    pub storage_name: String,
    pub key_type: String,
}

/// Body of `PUT /put`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutRequest {
    pub storage_name: String,
    pub key: Value,
    pub value: Value,
}

/// Body of `GET /get`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetRequest {
    pub storage_name: String,
    pub key: Value,
}
