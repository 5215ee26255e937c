//! DTOs de orden de servicio

use crate::models::quality_check::QualityCheckInput;
use crate::models::work_order::{DiagnosticData, HistoryEntry, UnforeseenIssue, WorkOrder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request para abrir una orden en recepción
#[derive(Debug, Deserialize, Validate)]
pub struct CreateWorkOrderRequest {
    pub client_id: Uuid,
    pub vehicle_id: Uuid,
    pub location_id: Option<Uuid>,

    #[validate(length(min = 1, max = 100))]
    pub user: String,

    pub notes: Option<String>,
}

/// Request para guardar el diagnóstico
#[derive(Debug, Deserialize, Validate)]
pub struct SaveDiagnosticRequest {
    #[validate(length(min = 1, max = 100))]
    pub user: String,

    pub data: DiagnosticData,
}

/// Request para acciones de etapa (avance, retroceso, entrega, cancelación)
#[derive(Debug, Deserialize, Validate)]
pub struct StageActionRequest {
    #[validate(length(min = 1, max = 100))]
    pub user: String,

    pub notes: Option<String>,
}

/// Request para reportar un imprevisto
#[derive(Debug, Deserialize, Validate)]
pub struct ReportIssueRequest {
    #[validate(length(min = 1, max = 100))]
    pub user: String,

    #[validate(length(min = 3, max = 500))]
    pub description: String,
}

/// Request del veredicto de control de calidad
#[derive(Debug, Deserialize, Validate)]
pub struct QualityVerdictRequest {
    #[validate(length(min = 1, max = 100))]
    pub user: String,

    #[validate(length(min = 1, max = 100))]
    pub inspector: String,

    #[validate(length(min = 1, max = 1000))]
    pub final_notes: String,

    pub checks: Vec<QualityCheckInput>,
}

/// Response de orden para la API
#[derive(Debug, Serialize)]
pub struct WorkOrderResponse {
    pub id: String,
    pub client_id: String,
    pub client_name: String,
    pub vehicle_id: String,
    pub vehicle_label: String,
    pub location_id: Option<String>,
    pub stage: String,
    pub stage_label: String,
    pub status: String,
    pub linked_quote_ids: Vec<String>,
    pub diagnostic_data: Option<DiagnosticData>,
    pub history: Vec<HistoryEntry>,
    pub unforeseen_issues: Vec<UnforeseenIssue>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<WorkOrder> for WorkOrderResponse {
    fn from(order: WorkOrder) -> Self {
        Self {
            id: order.id.clone(),
            client_id: order.client_id.to_string(),
            client_name: order.client_name.clone(),
            vehicle_id: order.vehicle_id.to_string(),
            vehicle_label: order.vehicle_label.clone(),
            location_id: order.location_id.map(|id| id.to_string()),
            stage: order.stage.as_str().to_string(),
            stage_label: order.stage.label().to_string(),
            status: order.status.as_str().to_string(),
            linked_quote_ids: order
                .linked_quote_ids()
                .iter()
                .map(|id| id.to_string())
                .collect(),
            diagnostic_data: order.diagnostic_data.as_ref().map(|d| d.0.clone()),
            history: order.history.0.clone(),
            unforeseen_issues: order.unforeseen_issues.0.clone(),
            created_at: order.created_at.to_rfc3339(),
            updated_at: order.updated_at.to_rfc3339(),
        }
    }
}

/// Response de reconciliación individual
#[derive(Debug, Serialize)]
pub struct ReconcileResponse {
    pub changed: bool,
    pub previous_stage: Option<String>,
    pub order: WorkOrderResponse,
}
