//! HTTP error mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::{debug, error};
use serde_json::json;
use serendigo_rs_core::SerendigoCoreError;
use serendigo_rs_protocol::ValidationError;
use serendigo_rs_providers::{NarrationError, ProviderError};
use serendigo_rs_store::StoreError;
use thiserror::Error;

/// Failure of a single request, rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),
    /// Request could not be decoded at all (bad query string or JSON body).
    #[error("malformed request: {0}")]
    Malformed(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// A place lookup upstream failed.
    #[error("place lookup failed: {0}")]
    Upstream(#[from] ProviderError),
    #[error(transparent)]
    Core(#[from] SerendigoCoreError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Core(SerendigoCoreError::Store(err))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Malformed(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(ProviderError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Core(err) => match err {
                SerendigoCoreError::Validation(_) => StatusCode::BAD_REQUEST,
                SerendigoCoreError::Store(StoreError::Conflict(_)) => StatusCode::CONFLICT,
                SerendigoCoreError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
                SerendigoCoreError::Narration(NarrationError::Unavailable(_)) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                SerendigoCoreError::Narration(_) => StatusCode::BAD_GATEWAY,
                SerendigoCoreError::Store(_)
                | SerendigoCoreError::Media { .. }
                | SerendigoCoreError::Provider(_)
                | SerendigoCoreError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            error!("request failed (status={}, error={message})", status.as_u16());
        } else {
            debug!("request rejected (status={}, error={message})", status.as_u16());
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Errors that stop the listener itself.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid CORS origin {0:?}")]
    InvalidOrigin(String),
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn store_errors_map_to_http_statuses() {
        let conflict: ApiError = StoreError::Conflict("place_id".to_string()).into();
        assert_eq!(conflict.status(), StatusCode::CONFLICT);
        let missing: ApiError = StoreError::NotFound("d-1".to_string()).into();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        let decode: ApiError = StoreError::Decode("bad row".to_string()).into();
        assert_eq!(decode.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn narration_errors_split_gateway_and_unavailable() {
        let unavailable = ApiError::Core(SerendigoCoreError::Narration(
            NarrationError::Unavailable("no key".to_string()),
        ));
        assert_eq!(unavailable.status(), StatusCode::SERVICE_UNAVAILABLE);
        let upstream = ApiError::Core(SerendigoCoreError::Narration(
            NarrationError::EmptyResponse("choices"),
        ));
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn lookup_errors_are_gateway_failures() {
        let denied = ApiError::from(ProviderError::Unavailable("quota".to_string()));
        assert_eq!(denied.status(), StatusCode::BAD_GATEWAY);
        let slow = ApiError::from(ProviderError::Timeout(std::time::Duration::from_secs(5)));
        assert_eq!(slow.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            ApiError::NotFound("place x".to_string()).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn validation_is_bad_request() {
        let err = ApiError::from(ValidationError::MissingField("lat"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "invalid request: missing field: lat");
    }
}
