//! HTTP mapping for service errors.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use crate::service::ServiceError;

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::EmptyRoster => StatusCode::NOT_FOUND,
            ServiceError::RosterSourceUnavailable { operation, source } => {
                error!(operation, error = %source, "roster source failure");
                StatusCode::BAD_GATEWAY
            }
            ServiceError::NotifierUnconfigured => StatusCode::SERVICE_UNAVAILABLE,
        };

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(err: ServiceError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn empty_roster_is_404() {
        let (status, body) = render(ServiceError::EmptyRoster).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "no brokers found in the roster");
    }

    #[tokio::test]
    async fn backend_failure_is_502_with_cause() {
        let err = ServiceError::roster_source(
            "read the roster",
            std::io::Error::other("connection refused"),
        );
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(
            body["detail"]
                .as_str()
                .unwrap()
                .contains("connection refused")
        );
    }

    #[tokio::test]
    async fn unconfigured_notifier_is_503() {
        let (status, _) = render(ServiceError::NotifierUnconfigured).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
