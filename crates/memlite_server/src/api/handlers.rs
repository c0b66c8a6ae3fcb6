//! Endpoint handlers.
//!
//! # Responsibility
//! - Marshal JSON bodies to and from [`SqliteSession`] calls.
//! - Run blocking SQLite work off the async executor.
//!
//! # Invariants
//! - Handlers never touch the connection directly; the session owns it.

use super::error::ApiError;
use super::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use memlite_core::{QueryRows, SessionResult, SqlValue, StatusReport};
use serde::{Deserialize, Serialize};

pub const SHUTDOWN_MESSAGE: &str = "Server is shutting down...";

#[derive(Debug, Clone, Serialize)]
pub struct ConnectResponse {
    pub connected: bool,
}

/// Body of `POST /sqlite/query`.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    /// Untyped here; converted to [`SqlValue`] after the connection check.
    pub parameters: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub results: QueryRows,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// `POST /sqlite/connect_in_memory`
pub async fn connect_in_memory(
    State(state): State<AppState>,
) -> Result<Json<ConnectResponse>, ApiError> {
    let session = state.session();
    run_blocking(move || session.connect()).await?;
    Ok(Json(ConnectResponse { connected: true }))
}

/// `POST /sqlite/query`
pub async fn query(
    State(state): State<AppState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, ApiError> {
    let Json(request) = payload?;
    let session = state.session();
    let results = run_blocking(move || {
        session.ensure_connected()?;
        let parameters = SqlValue::from_json_params(&request.parameters)?;
        session.execute(&request.query, &parameters)
    })
    .await?;
    Ok(Json(QueryResponse { results }))
}

/// `GET /sqlite/status`
pub async fn status(State(state): State<AppState>) -> Result<Json<StatusReport>, ApiError> {
    let session = state.session();
    let report = run_blocking(move || session.status()).await?;
    Ok(Json(report))
}

/// `POST /terminate`
///
/// The graceful-shutdown hook fires after this response is written, so the
/// caller always receives the acknowledgement.
pub async fn terminate(State(state): State<AppState>) -> Json<MessageResponse> {
    state.shutdown().request("terminate_endpoint");
    Json(MessageResponse {
        message: SHUTDOWN_MESSAGE.to_string(),
    })
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn run_blocking<T, F>(task: F) -> Result<T, ApiError>
where
    F: FnOnce() -> SessionResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| ApiError::Internal(format!("database task failed: {err}")))?
        .map_err(ApiError::from)
}
