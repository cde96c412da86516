use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::db::StoreError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// Store failure. Only `message` reaches the client; `source` is logged.
    #[error("{message}: {source}")]
    Internal {
        message: &'static str,
        #[source]
        source: StoreError,
    },
}

impl AppError {
    pub fn product_not_found() -> Self {
        Self::NotFound("Produit non trouvé".to_string())
    }

    /// Adapter for `map_err`: wraps a store error with a short, client-safe
    /// description of the failed operation.
    pub fn internal(message: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Internal { message, source }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal { message, source } => {
                error!(error = %source, "{}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
