//! The invoice action endpoint.
//!
//! `GET /v1/invoices/:id/document?action=...` turns one logical "produce an
//! invoice representation" operation into four behaviors sharing a single
//! data-preparation step: the document is built once from the fetched order,
//! then each action picks its own delivery channel (file + inline bytes,
//! streamed bytes, JSON, file + mail).

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use serde_json::json;

use invopress_core::OrderId;
use invopress_document::RenderRequest;
use invopress_orders::Order;
use invopress_render::render;

use crate::app::dto::{self, InvoiceAction};
use crate::app::errors::{self, ActionError};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/:id/document", get(invoice_document))
}

pub async fn invoice_document(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Query(query): Query<dto::DocumentQuery>,
) -> axum::response::Response {
    // Malformed ids fail before any lookup; the store is never touched.
    let id: OrderId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid id"),
    };

    // Lookup precedes action validation: a missing order is 404 regardless
    // of what the action parameter says.
    let order = match services.orders.get(id) {
        Ok(Some(o)) => o,
        Ok(None) => return errors::action_error_to_response(ActionError::NotFound),
        Err(e) => return errors::action_error_to_response(e.into()),
    };

    let action = match InvoiceAction::parse(query.action.as_deref()) {
        Ok(a) => a,
        Err(e) => return errors::action_error_to_response(e),
    };

    let request = dto::render_request_for(&order, &services.company);

    let result = match action {
        InvoiceAction::Preview => preview(&services, id, &request),
        InvoiceAction::Download => download(id, &request),
        InvoiceAction::Generate => generate(id, &request),
        InvoiceAction::SendEmail => send_email(&services, id, &order, &request).await,
        InvoiceAction::Upload => Err(ActionError::NotImplemented),
    };

    match result {
        Ok(response) => response,
        Err(e) => errors::action_error_to_response(e),
    }
}

/// Render, persist the on-disk artifact, serve the same bytes inline.
fn preview(
    services: &AppServices,
    id: OrderId,
    request: &RenderRequest,
) -> Result<axum::response::Response, ActionError> {
    let bytes = render(request)?;
    let path = services.write_invoice_file(id, &bytes)?;
    tracing::info!(order_id = id.as_u64(), path = %path.display(), "invoice preview rendered");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!(r#"inline; filename="{}""#, AppServices::invoice_filename(id)),
            ),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        bytes,
    )
        .into_response())
}

/// Render straight into the response; nothing is persisted.
fn download(id: OrderId, request: &RenderRequest) -> Result<axum::response::Response, ActionError> {
    let bytes = render(request)?;
    tracing::info!(order_id = id.as_u64(), "invoice download");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!(r#"attachment; filename="{}""#, AppServices::invoice_filename(id)),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Skip rendering entirely; expose the prepared document as JSON.
fn generate(id: OrderId, request: &RenderRequest) -> Result<axum::response::Response, ActionError> {
    tracing::info!(order_id = id.as_u64(), "invoice data generated");
    Ok((
        StatusCode::OK,
        Json(json!({
            "invoice": request.header,
            "items": request.items,
            "totals": request.totals,
        })),
    )
        .into_response())
}

/// Render and persist as for preview, then hand the file to the mailer and
/// wait for delivery confirmation before answering. A mail failure after a
/// successful write leaves the file on disk.
async fn send_email(
    services: &AppServices,
    id: OrderId,
    order: &Order,
    request: &RenderRequest,
) -> Result<axum::response::Response, ActionError> {
    let bytes = render(request)?;
    let path = services.write_invoice_file(id, &bytes)?;

    let mailer = services.mailer.clone();
    let recipient = order.customer_email.clone();
    let mail_path = path.clone();
    tokio::task::spawn_blocking(move || mailer.send_invoice(id, &recipient, &mail_path))
        .await
        .map_err(|e| ActionError::Internal(e.to_string()))??;

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "invoice email sent successfully",
            "file": path.to_string_lossy(),
        })),
    )
        .into_response())
}
