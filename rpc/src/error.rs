//! RPC error types and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use surety_node::NodeError;
use surety_registry::RegistryError;
use surety_types::TypesError;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    InvalidAddress(#[from] TypesError),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("metrics are disabled on this node")]
    MetricsDisabled,

    #[error("node error: {0}")]
    Node(#[from] NodeError),

    #[error("server error: {0}")]
    Server(String),
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
}

impl RpcError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Registry(e) => e.kind(),
            Self::InvalidAddress(_) => "invalid_address",
            Self::InvalidRequest(_) => "invalid_request",
            Self::MetricsDisabled => "metrics_disabled",
            Self::Node(_) => "node",
            Self::Server(_) => "server",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Registry(e) => match e {
                RegistryError::SystemPaused => StatusCode::SERVICE_UNAVAILABLE,
                RegistryError::Unauthorized { .. } => StatusCode::FORBIDDEN,
                RegistryError::InsufficientAmount { .. } | RegistryError::Overflow(_) => {
                    StatusCode::BAD_REQUEST
                }
                RegistryError::DuplicateVote { .. } | RegistryError::AlreadyRegistered(_) => {
                    StatusCode::CONFLICT
                }
                RegistryError::InconsistentSnapshot(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::InvalidAddress(_) | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::MetricsDisabled => StatusCode::NOT_FOUND,
            Self::Node(_) | Self::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
            kind: self.kind(),
        };
        (self.status(), Json(body)).into_response()
    }
}
