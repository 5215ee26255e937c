use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};

use crate::controllers::work_order_controller::WorkOrderController;
use crate::dto::common::ApiResponse;
use crate::dto::work_order_dto::{
    CreateWorkOrderRequest, QualityVerdictRequest, ReconcileResponse, ReportIssueRequest,
    SaveDiagnosticRequest, StageActionRequest, WorkOrderResponse,
};
use crate::models::notification::Notification;
use crate::models::work_order::HistoryEntry;
use crate::services::stage_service::ReconciliationReport;
use crate::state::AppState;
use crate::utils::errors::AppError;
use uuid::Uuid;

pub fn create_work_order_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_work_order))
        .route("/", get(list_work_orders))
        .route("/reconcile", post(reconcile_all))
        .route("/:id", get(get_work_order))
        .route("/:id", delete(delete_work_order))
        .route("/:id/history", get(get_history))
        .route("/:id/diagnostic", post(save_diagnostic))
        .route("/:id/advance", post(advance_stage))
        .route("/:id/retreat", post(retreat_stage))
        .route("/:id/issues", post(report_issue))
        .route("/:id/deliver", post(deliver))
        .route("/:id/cancel", post(cancel))
        .route("/:id/quality-control/approve", post(quality_approve))
        .route("/:id/quality-control/reject", post(quality_reject))
        .route("/:id/progress", get(completion_state))
        .route("/:id/reconcile", post(reconcile_one))
        .route("/:id/notifications", get(list_notifications))
        .route("/notifications/:notification_id/read", post(mark_notification_read))
}

async fn create_work_order(
    State(state): State<AppState>,
    Json(request): Json<CreateWorkOrderRequest>,
) -> Result<Json<ApiResponse<WorkOrderResponse>>, AppError> {
    let controller = WorkOrderController::new(state);
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn get_work_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WorkOrderResponse>, AppError> {
    let controller = WorkOrderController::new(state);
    let response = controller.get_by_id(&id).await?;
    Ok(Json(response))
}

async fn list_work_orders(
    State(state): State<AppState>,
) -> Result<Json<Vec<WorkOrderResponse>>, AppError> {
    let controller = WorkOrderController::new(state);
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    let controller = WorkOrderController::new(state);
    let response = controller.history(&id).await?;
    Ok(Json(response))
}

async fn save_diagnostic(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SaveDiagnosticRequest>,
) -> Result<Json<ApiResponse<WorkOrderResponse>>, AppError> {
    let controller = WorkOrderController::new(state);
    let response = controller.save_diagnostic(&id, request).await?;
    Ok(Json(response))
}

async fn advance_stage(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<StageActionRequest>,
) -> Result<Json<ApiResponse<WorkOrderResponse>>, AppError> {
    let controller = WorkOrderController::new(state);
    let response = controller.advance_stage(&id, request).await?;
    Ok(Json(response))
}

async fn retreat_stage(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<StageActionRequest>,
) -> Result<Json<ApiResponse<WorkOrderResponse>>, AppError> {
    let controller = WorkOrderController::new(state);
    let response = controller.retreat_stage(&id, request).await?;
    Ok(Json(response))
}

async fn report_issue(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ReportIssueRequest>,
) -> Result<Json<ApiResponse<WorkOrderResponse>>, AppError> {
    let controller = WorkOrderController::new(state);
    let response = controller.report_issue(&id, request).await?;
    Ok(Json(response))
}

async fn deliver(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<StageActionRequest>,
) -> Result<Json<ApiResponse<WorkOrderResponse>>, AppError> {
    let controller = WorkOrderController::new(state);
    let response = controller.deliver(&id, request).await?;
    Ok(Json(response))
}

async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<StageActionRequest>,
) -> Result<Json<ApiResponse<WorkOrderResponse>>, AppError> {
    let controller = WorkOrderController::new(state);
    let response = controller.cancel(&id, request).await?;
    Ok(Json(response))
}

async fn quality_approve(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<QualityVerdictRequest>,
) -> Result<Json<ApiResponse<WorkOrderResponse>>, AppError> {
    let controller = WorkOrderController::new(state);
    let response = controller.quality_verdict(&id, request, true).await?;
    Ok(Json(response))
}

async fn quality_reject(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<QualityVerdictRequest>,
) -> Result<Json<ApiResponse<WorkOrderResponse>>, AppError> {
    let controller = WorkOrderController::new(state);
    let response = controller.quality_verdict(&id, request, false).await?;
    Ok(Json(response))
}

async fn completion_state(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = WorkOrderController::new(state);
    let response = controller.completion_state(&id).await?;
    Ok(Json(response))
}

async fn reconcile_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReconcileResponse>>, AppError> {
    let controller = WorkOrderController::new(state);
    let response = controller.reconcile(&id).await?;
    Ok(Json(response))
}

async fn reconcile_all(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ReconciliationReport>>, AppError> {
    let controller = WorkOrderController::new(state);
    let response = controller.reconcile_all().await?;
    Ok(Json(response))
}

async fn list_notifications(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let controller = WorkOrderController::new(state);
    let response = controller.notifications(&id).await?;
    Ok(Json(response))
}

async fn mark_notification_read(
    State(state): State<AppState>,
    Path(notification_id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = WorkOrderController::new(state);
    let response = controller.mark_notification_read(notification_id).await?;
    Ok(Json(response))
}

async fn delete_work_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = WorkOrderController::new(state);
    let response = controller.delete(&id).await?;
    Ok(Json(response))
}
