use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::grpc::UpstreamError;
use crate::services::tasks::TaskError;

/// API Error returned by handlers
///
/// Locale and timezone problems never show up here: negotiation and
/// resolution always degrade to defaults.
#[derive(Error, Debug)]
pub enum ApiError {
    // System errors 5xxx
    #[error("Background task failed: {0}")]
    TaskFailed(#[from] TaskError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl ApiError {
    pub fn error_code(&self) -> i32 {
        match self {
            Self::TaskFailed(_) => 5002,
            Self::Upstream(UpstreamError::Connect(_)) => 5003,
            Self::Upstream(UpstreamError::Call(_)) => 5004,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::TaskFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub code: i32,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.error_code();
        tracing::error!("Request failed ({}): {}", code, self);

        let response = ApiErrorResponse { code, message: self.to_string() };

        (self.status_code(), Json(response)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_error_response_shape() {
        let error = ApiError::from(UpstreamError::from(tonic::Status::unavailable("down")));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], 5004);
        assert!(json["message"].as_str().unwrap().starts_with("gRPC call failed"));
    }

    #[tokio::test]
    async fn test_task_failure_is_internal() {
        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = ApiError::from(TaskError::Decode(decode));
        assert_eq!(error.error_code(), 5002);
        assert_eq!(error.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
