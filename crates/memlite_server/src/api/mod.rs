//! HTTP surface: routing, handlers and error mapping.
//!
//! # Responsibility
//! - Route the fixed endpoint set into the shared session.
//! - Log one metadata line per request.

use crate::shutdown::ShutdownController;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use log::info;
use memlite_core::SqliteSession;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

pub mod error;
pub mod handlers;

pub use error::{ApiError, ErrorBody};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    session: Arc<SqliteSession>,
    shutdown: ShutdownController,
}

impl AppState {
    pub fn new(session: Arc<SqliteSession>, shutdown: ShutdownController) -> Self {
        Self { session, shutdown }
    }

    pub fn session(&self) -> Arc<SqliteSession> {
        Arc::clone(&self.session)
    }

    pub fn shutdown(&self) -> &ShutdownController {
        &self.shutdown
    }
}

/// Builds the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/sqlite/connect_in_memory",
            post(handlers::connect_in_memory).fallback(handlers::method_not_allowed),
        )
        .route(
            "/sqlite/query",
            post(handlers::query).fallback(handlers::method_not_allowed),
        )
        .route(
            "/sqlite/status",
            get(handlers::status).fallback(handlers::method_not_allowed),
        )
        .route(
            "/terminate",
            post(handlers::terminate).fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

async fn log_requests(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started_at = Instant::now();

    let response = next.run(request).await;

    info!(
        "event=http_request module=server request_id={} method={} path={} status={} duration_ms={}",
        request_id,
        method,
        path,
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}
