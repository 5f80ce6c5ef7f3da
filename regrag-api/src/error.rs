//! Maps orchestrator-level errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use regrag_core::error::OrchestratorError;
use serde::Serialize;

/// An error ready to be turned into an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    status: u16,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            status: self.status.as_u16(),
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<OrchestratorError> for ApiError {
    fn from(err: OrchestratorError) -> Self {
        let status = match &err {
            OrchestratorError::Request(_) => StatusCode::BAD_REQUEST,
            OrchestratorError::RequestTimeout => StatusCode::GATEWAY_TIMEOUT,
            OrchestratorError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(status, err.to_string())
    }
}

/// Handler return type: a successful body or a mapped [`ApiError`].
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use regrag_core::error::RequestError;

    #[test]
    fn invalid_question_maps_to_bad_request() {
        let err: ApiError = OrchestratorError::Request(RequestError::InvalidQuestion).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn question_too_long_maps_to_bad_request() {
        let err: ApiError = OrchestratorError::Request(RequestError::QuestionTooLong { limit: 4000 }).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn timeout_maps_to_gateway_timeout() {
        let err: ApiError = OrchestratorError::RequestTimeout.into();
        assert_eq!(err.status, StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn configuration_error_maps_to_internal_server_error() {
        let err: ApiError = OrchestratorError::Configuration("bad value".into()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
