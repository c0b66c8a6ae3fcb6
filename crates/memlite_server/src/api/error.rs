//! HTTP error envelope and status mapping.
//!
//! Every failure leaves the server as `{"detail": <message>}`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::warn;
use memlite_core::SessionError;
use serde::Serialize;

/// Wire body for every error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Error kinds returned by handlers, mapped to a status code in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A required earlier call has not happened yet.
    PreconditionFailed(String),
    /// The request body is not the expected JSON shape.
    UnprocessableEntity(String),
    NotFound,
    MethodNotAllowed,
    /// Engine failure; the message is SQLite's text verbatim.
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::PreconditionFailed(_) => StatusCode::BAD_REQUEST,
            Self::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            Self::PreconditionFailed(message)
            | Self::UnprocessableEntity(message)
            | Self::Internal(message) => message.clone(),
            Self::NotFound => "Not Found".to_string(),
            Self::MethodNotAllowed => "Method Not Allowed".to_string(),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(value: SessionError) -> Self {
        if value.is_precondition() {
            Self::PreconditionFailed(value.to_string())
        } else {
            Self::Internal(value.to_string())
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::UnprocessableEntity(value.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(
                "event=http_error module=server status={}",
                status.as_u16()
            );
        }
        let body = ErrorBody {
            detail: self.detail(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use axum::http::StatusCode;
    use memlite_core::{BindingError, SessionError, NOT_CONNECTED_MESSAGE};

    #[test]
    fn not_connected_maps_to_bad_request() {
        let err = ApiError::from(SessionError::NotConnected);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.detail(), NOT_CONNECTED_MESSAGE);
    }

    #[test]
    fn binding_errors_map_to_internal_with_verbatim_text() {
        let err = ApiError::from(SessionError::Binding(BindingError {
            index: 1,
            kind: "dict",
        }));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.detail(),
            "Error binding parameter 1: type 'dict' is not supported"
        );
    }

    #[test]
    fn routing_errors_use_fixed_details() {
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::NotFound.detail(), "Not Found");
        assert_eq!(
            ApiError::MethodNotAllowed.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }
}
