//! Maps pipeline failures onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::inference::model::ModelError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("text must not be empty")]
    EmptyText,

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("metrics encoding failed: {0}")]
    Metrics(#[from] prometheus::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::EmptyText => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Model(_) => StatusCode::BAD_GATEWAY,
            ApiError::Store(_) | ApiError::Metrics(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), "Request failed: {self}");
        } else {
            warn!(status = status.as_u16(), "Request rejected: {self}");
        }

        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::EmptyText.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            ApiError::Model(ModelError::WorkerGone).status(),
            StatusCode::BAD_GATEWAY
        );
        let store = StoreError::Io {
            path: "data.json".into(),
            source: std::io::Error::other("disk"),
        };
        assert_eq!(
            ApiError::Store(store).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
