use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::invoice_controller::InvoiceController;
use crate::dto::common::ApiResponse;
use crate::dto::invoice_dto::{CreateInvoiceRequest, InvoiceResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;
use uuid::Uuid;

pub fn create_invoice_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_invoice))
        .route("/", get(list_invoices))
        .route("/:id", get(get_invoice))
        .route("/work-order/:work_order_id", get(list_by_work_order))
}

async fn create_invoice(
    State(state): State<AppState>,
    Json(request): Json<CreateInvoiceRequest>,
) -> Result<Json<ApiResponse<InvoiceResponse>>, AppError> {
    let controller = InvoiceController::new(state);
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InvoiceResponse>, AppError> {
    let controller = InvoiceController::new(state);
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn list_invoices(
    State(state): State<AppState>,
) -> Result<Json<Vec<InvoiceResponse>>, AppError> {
    let controller = InvoiceController::new(state);
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn list_by_work_order(
    State(state): State<AppState>,
    Path(work_order_id): Path<String>,
) -> Result<Json<Vec<InvoiceResponse>>, AppError> {
    let controller = InvoiceController::new(state);
    let response = controller.list_by_work_order(&work_order_id).await?;
    Ok(Json(response))
}
