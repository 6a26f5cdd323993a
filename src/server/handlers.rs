//! Request handlers

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;

use crate::error::Result;
use crate::protocol::{CreateRequest, GetRequest, PutRequest};
use crate::service::StorageService;

use super::ApiError;

/// `POST /create`
pub async fn create_storage(
    State(service): State<Arc<StorageService>>,
    Json(request): Json<CreateRequest>,
) -> std::result::Result<String, ApiError> {
    let message = format!("Storage {} created successfully", request.storage_name);
    run_blocking(move || service.create(&request.storage_name, &request.key_type)).await?;
    Ok(message)
}

/// `PUT /put`
pub async fn put_value(
    State(service): State<Arc<StorageService>>,
    Json(request): Json<PutRequest>,
) -> std::result::Result<String, ApiError> {
    let value = serde_json::to_vec(&request.value)
        .map(Bytes::from)
        .map_err(|e| ApiError::internal(format!("Failed to encode value: {}", e)))?;

    run_blocking(move || service.put(&request.storage_name, &request.key, value)).await?;
    Ok("Object successfully mapped to given key".to_string())
}

/// `GET /get`, answering with the stored JSON value as the body
pub async fn get_value(
    State(service): State<Arc<StorageService>>,
    Json(request): Json<GetRequest>,
) -> std::result::Result<Response, ApiError> {
    let value = run_blocking(move || service.get(&request.storage_name, &request.key)).await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], value).into_response())
}

/// Run a blocking engine call off the async workers
async fn run_blocking<T, F>(f: F) -> std::result::Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::internal(format!("Worker task failed: {}", e)))?
        .map_err(ApiError::from)
}
