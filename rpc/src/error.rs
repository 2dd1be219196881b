//! API error types and their JSON envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use birthright_balance::BalanceError;
use birthright_verification::ProxyError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error(transparent)]
    Verification(#[from] ProxyError),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("server error: {0}")]
    Server(String),
}

impl From<BalanceError> for RpcError {
    fn from(e: BalanceError) -> Self {
        RpcError::InvalidRequest(e.to_string())
    }
}

/// Body of every non-2xx API response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl RpcError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Verification(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Verification(_) | Self::Config(_) | Self::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn body(&self) -> ErrorBody {
        let (error, detail) = match self {
            Self::Verification(e) => (e.error_code(), e.detail()),
            Self::InvalidRequest(msg) => (msg.clone(), None),
            Self::Config(_) => ("Server configuration error".to_string(), None),
            Self::Server(_) => ("Internal server error".to_string(), None),
        };
        ErrorBody {
            success: false,
            error,
            detail,
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
