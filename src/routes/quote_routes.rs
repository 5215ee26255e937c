use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::controllers::quote_controller::QuoteController;
use crate::dto::common::ApiResponse;
use crate::dto::quote_dto::{
    CreateQuoteRequest, QuoteActionRequest, QuoteResponse, ToggleItemRequest, ToggleItemResponse,
    UpdateQuoteRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppError;
use uuid::Uuid;

pub fn create_quote_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_quote))
        .route("/", get(list_quotes))
        .route("/work-order/:work_order_id", get(list_by_work_order))
        .route("/:id", get(get_quote))
        .route("/:id", put(update_quote))
        .route("/:id", delete(delete_quote))
        .route("/:id/send", post(send_quote))
        .route("/:id/approve", post(approve_quote))
        .route("/:id/reject", post(reject_quote))
        .route("/:id/items/:item_id/complete", post(toggle_item))
}

async fn create_quote(
    State(state): State<AppState>,
    Json(request): Json<CreateQuoteRequest>,
) -> Result<Json<ApiResponse<QuoteResponse>>, AppError> {
    let controller = QuoteController::new(state);
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn list_quotes(
    State(state): State<AppState>,
) -> Result<Json<Vec<QuoteResponse>>, AppError> {
    let controller = QuoteController::new(state);
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn list_by_work_order(
    State(state): State<AppState>,
    Path(work_order_id): Path<String>,
) -> Result<Json<Vec<QuoteResponse>>, AppError> {
    let controller = QuoteController::new(state);
    let response = controller.list_by_work_order(&work_order_id).await?;
    Ok(Json(response))
}

async fn get_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuoteResponse>, AppError> {
    let controller = QuoteController::new(state);
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateQuoteRequest>,
) -> Result<Json<ApiResponse<QuoteResponse>>, AppError> {
    let controller = QuoteController::new(state);
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = QuoteController::new(state);
    let response = controller.delete(id).await?;
    Ok(Json(response))
}

async fn send_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<QuoteActionRequest>,
) -> Result<Json<ApiResponse<QuoteResponse>>, AppError> {
    let controller = QuoteController::new(state);
    let response = controller.send(id, request).await?;
    Ok(Json(response))
}

async fn approve_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<QuoteActionRequest>,
) -> Result<Json<ApiResponse<QuoteResponse>>, AppError> {
    let controller = QuoteController::new(state);
    let response = controller.approve(id, request).await?;
    Ok(Json(response))
}

async fn reject_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<QuoteActionRequest>,
) -> Result<Json<ApiResponse<QuoteResponse>>, AppError> {
    let controller = QuoteController::new(state);
    let response = controller.reject(id, request).await?;
    Ok(Json(response))
}

async fn toggle_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<ToggleItemRequest>,
) -> Result<Json<ApiResponse<ToggleItemResponse>>, AppError> {
    let controller = QuoteController::new(state);
    let response = controller.toggle_item(id, item_id, request).await?;
    Ok(Json(response))
}
