use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use invopress_mailer::MailError;
use invopress_orders::StoreError;
use invopress_render::RenderError;

/// Actions advertised to clients on an invalid-action rejection.
///
/// `sendemail` is deliberately absent from this list (it is reachable but
/// not advertised), matching the service's documented behavior.
pub const ALLOWED_ACTIONS: [&str; 4] = ["preview", "download", "generate", "upload"];

/// Everything that can terminate an invoice action. All variants are
/// terminal for the current request; nothing is retried.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("invalid id")]
    InvalidInput,

    #[error("order not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("invoice file error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Mail(#[from] MailError),

    #[error("invalid action: {0}")]
    UnsupportedAction(String),

    #[error("upload action not implemented yet")]
    NotImplemented,

    #[error("internal error: {0}")]
    Internal(String),
}

pub fn action_error_to_response(err: ActionError) -> axum::response::Response {
    match err {
        ActionError::InvalidInput => json_error(StatusCode::BAD_REQUEST, "invalid id"),
        ActionError::NotFound => json_error(StatusCode::NOT_FOUND, "order not found"),
        ActionError::UnsupportedAction(action) => {
            tracing::warn!(action = %action, "rejected invoice action");
            (
                StatusCode::BAD_REQUEST,
                axum::Json(json!({
                    "error": "invalid action",
                    "allowed": ALLOWED_ACTIONS,
                })),
            )
                .into_response()
        }
        ActionError::NotImplemented => (
            StatusCode::NOT_IMPLEMENTED,
            axum::Json(json!({
                "message": "upload action not implemented yet",
            })),
        )
            .into_response(),
        ActionError::Store(e) => {
            tracing::error!(error = %e, "order lookup failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        ActionError::Render(e) => {
            tracing::error!(error = %e, "invoice render failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        ActionError::Io(e) => {
            tracing::error!(error = %e, "invoice file io failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        ActionError::Mail(e) => {
            tracing::error!(error = %e, "invoice email failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        ActionError::Internal(msg) => {
            tracing::error!(error = %msg, "internal failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, msg)
        }
    }
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": message.into(),
        })),
    )
        .into_response()
}
