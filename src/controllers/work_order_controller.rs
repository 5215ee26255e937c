//! Controller de órdenes de servicio
//!
//! Coordina recepción, diagnóstico, movimientos manuales de etapa,
//! imprevistos, control de calidad, entrega, cancelación y la
//! reconciliación de etapas.

use crate::dto::common::ApiResponse;
use crate::dto::work_order_dto::{
    CreateWorkOrderRequest, QualityVerdictRequest, ReconcileResponse, ReportIssueRequest,
    SaveDiagnosticRequest, StageActionRequest, WorkOrderResponse,
};
use crate::models::work_order::{
    status_for_stage, HistoryEntry, UnforeseenIssue, WorkOrder, WorkOrderStage,
};
use crate::repositories::client_repository::ClientRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::repositories::work_order_repository::WorkOrderRepository;
use crate::services::notification_service::NotificationService;
use crate::services::progress_service::ProgressService;
use crate::services::quality_service::QualityService;
use crate::services::stage_service::{
    ReconcileOutcome, ReconciliationReport, ReconciliationService,
};
use crate::state::AppState;
use crate::utils::errors::{required_field_error, AppError};
use chrono::Utc;
use tracing::info;
use validator::Validate;

pub struct WorkOrderController {
    state: AppState,
    repository: WorkOrderRepository,
    clients: ClientRepository,
    vehicles: VehicleRepository,
    notifications: NotificationService,
    reconciliation: ReconciliationService,
    quality: QualityService,
    progress: ProgressService,
}

impl WorkOrderController {
    pub fn new(state: AppState) -> Self {
        let pool = state.pool.clone();
        Self {
            repository: WorkOrderRepository::new(pool.clone()),
            clients: ClientRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool.clone()),
            notifications: NotificationService::new(pool),
            reconciliation: ReconciliationService::new(state.clone()),
            quality: QualityService::new(state.clone()),
            progress: ProgressService::new(state.clone()),
            state,
        }
    }

    /// Abrir una orden en recepción
    pub async fn create(
        &self,
        request: CreateWorkOrderRequest,
    ) -> Result<ApiResponse<WorkOrderResponse>, AppError> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let client = self
            .clients
            .find_by_id(request.client_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cliente no encontrado".to_string()))?;
        let vehicle = self
            .vehicles
            .find_by_id(request.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if vehicle.client_id != client.id {
            return Err(AppError::BadRequest(
                "El vehículo no pertenece al cliente indicado".to_string(),
            ));
        }

        let folio = self.repository.next_folio().await?;
        let notes = request
            .notes
            .unwrap_or_else(|| "Vehículo recibido en recepción".to_string());
        let entry = HistoryEntry::new(WorkOrderStage::Recepcion, &request.user, &notes);

        let order = self
            .repository
            .create(
                folio,
                client.id,
                client.name.clone(),
                vehicle.id,
                vehicle.display_label(),
                request.location_id,
                entry,
            )
            .await?;

        info!("✅ Orden {} abierta para {}", order.id, client.name);
        self.state.put_work_order(order.clone()).await;
        Ok(ApiResponse::success_with_message(
            order.into(),
            "Orden de servicio creada".to_string(),
        ))
    }

    /// El espejo se refresca tras cada escritura confirmada, así que la
    /// lectura puntual lo consulta primero y solo cae a la base en un miss
    pub async fn get_by_id(&self, id: &str) -> Result<WorkOrderResponse, AppError> {
        if let Some(order) = self.state.get_work_order(id).await {
            return Ok(order.into());
        }
        let order = self.require(id).await?;
        self.state.put_work_order(order.clone()).await;
        Ok(order.into())
    }

    pub async fn list(&self) -> Result<Vec<WorkOrderResponse>, AppError> {
        let orders = self.repository.find_all().await?;
        Ok(orders.into_iter().map(WorkOrderResponse::from).collect())
    }

    pub async fn history(&self, id: &str) -> Result<Vec<crate::models::work_order::HistoryEntry>, AppError> {
        let order = self.require(id).await?;
        Ok(order.history.0)
    }

    /// Guardar el diagnóstico; desde recepción/diagnóstico la orden pasa a
    /// Pendiente de Cotización
    pub async fn save_diagnostic(
        &self,
        id: &str,
        request: SaveDiagnosticRequest,
    ) -> Result<ApiResponse<WorkOrderResponse>, AppError> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let order = self.require(id).await?;
        if order.stage.is_terminal() {
            return Err(AppError::Conflict(format!(
                "La orden está en etapa terminal '{}'",
                order.stage.label()
            )));
        }
        if request.data.inspector.trim().is_empty() {
            return Err(required_field_error("inspector"));
        }

        let order = self.repository.set_diagnostic_data(id, &request.data).await?;

        let updated = if matches!(
            order.stage,
            WorkOrderStage::Recepcion | WorkOrderStage::Diagnostico
        ) {
            let target = WorkOrderStage::PendienteCotizacion;
            let entry = HistoryEntry::new(target, &request.user, "Diagnóstico registrado");
            let order = self
                .repository
                .update_stage_with_history(id, target, status_for_stage(target, order.status), entry)
                .await?;
            self.notifications
                .notify_stage_change(&order, "Diagnóstico registrado")
                .await;
            order
        } else {
            order
        };

        self.state.put_work_order(updated.clone()).await;
        Ok(ApiResponse::success_with_message(
            updated.into(),
            "Diagnóstico guardado".to_string(),
        ))
    }

    /// Avance manual a la etapa siguiente del pipeline
    pub async fn advance_stage(
        &self,
        id: &str,
        request: StageActionRequest,
    ) -> Result<ApiResponse<WorkOrderResponse>, AppError> {
        let order = self.require(id).await?;
        let target = order.stage.next().ok_or_else(|| {
            AppError::BadRequest(format!(
                "No hay etapa siguiente desde '{}'",
                order.stage.label()
            ))
        })?;
        self.move_stage(order, target, &request, "Avance manual de etapa")
            .await
    }

    /// Retroceso manual a la etapa anterior del pipeline
    pub async fn retreat_stage(
        &self,
        id: &str,
        request: StageActionRequest,
    ) -> Result<ApiResponse<WorkOrderResponse>, AppError> {
        let order = self.require(id).await?;
        let target = order.stage.previous().ok_or_else(|| {
            AppError::BadRequest(format!(
                "No hay etapa anterior desde '{}'",
                order.stage.label()
            ))
        })?;
        self.move_stage(order, target, &request, "Retroceso manual de etapa")
            .await
    }

    /// Reportar un imprevisto; desde En Reparación la orden pasa a
    /// Atención Requerida
    pub async fn report_issue(
        &self,
        id: &str,
        request: ReportIssueRequest,
    ) -> Result<ApiResponse<WorkOrderResponse>, AppError> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let order = self.require(id).await?;
        if order.stage.is_terminal() {
            return Err(AppError::Conflict(format!(
                "La orden está en etapa terminal '{}'",
                order.stage.label()
            )));
        }

        let issue = UnforeseenIssue {
            description: request.description.clone(),
            reported_by: request.user.clone(),
            date: Utc::now(),
        };
        let order = self.repository.append_issue(id, &issue).await?;

        let target = if order.stage == WorkOrderStage::EnReparacion {
            WorkOrderStage::AtencionRequerida
        } else {
            order.stage
        };
        let entry = HistoryEntry::new(
            target,
            &request.user,
            &format!("Imprevisto reportado: {}", request.description),
        );
        let updated = self
            .repository
            .update_stage_with_history(id, target, status_for_stage(target, order.status), entry)
            .await?;

        self.notifications
            .notify(
                id,
                &format!("Imprevisto en orden {}", id),
                &request.description,
            )
            .await;
        self.state.put_work_order(updated.clone()).await;
        Ok(ApiResponse::success_with_message(
            updated.into(),
            "Imprevisto registrado".to_string(),
        ))
    }

    /// Registrar la entrega del vehículo
    pub async fn deliver(
        &self,
        id: &str,
        request: StageActionRequest,
    ) -> Result<ApiResponse<WorkOrderResponse>, AppError> {
        let order = self.require(id).await?;
        if order.stage != WorkOrderStage::ListoEntrega {
            return Err(AppError::Conflict(format!(
                "Solo una orden Lista para Entrega puede entregarse; está en '{}'",
                order.stage.label()
            )));
        }
        self.move_stage(
            order,
            WorkOrderStage::Entregado,
            &request,
            "Vehículo entregado al cliente",
        )
        .await
    }

    /// Cancelar la orden (absorbente)
    pub async fn cancel(
        &self,
        id: &str,
        request: StageActionRequest,
    ) -> Result<ApiResponse<WorkOrderResponse>, AppError> {
        let order = self.require(id).await?;
        if order.stage.is_terminal() {
            return Err(AppError::Conflict(format!(
                "La orden ya está en etapa terminal '{}'",
                order.stage.label()
            )));
        }
        self.move_stage(order, WorkOrderStage::Cancelado, &request, "Orden cancelada")
            .await
    }

    /// Veredicto de control de calidad
    pub async fn quality_verdict(
        &self,
        id: &str,
        request: QualityVerdictRequest,
        approved: bool,
    ) -> Result<ApiResponse<WorkOrderResponse>, AppError> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let order = if approved {
            self.quality
                .approve(id, &request.inspector, &request.final_notes, request.checks, &request.user)
                .await?
        } else {
            self.quality
                .reject(id, &request.inspector, &request.final_notes, request.checks, &request.user)
                .await?
        };

        let message = if approved {
            "Control de calidad aprobado"
        } else {
            "Control de calidad rechazado"
        };
        Ok(ApiResponse::success_with_message(order.into(), message.to_string()))
    }

    /// Estado de la compuerta de término de reparación
    pub async fn completion_state(&self, id: &str) -> Result<serde_json::Value, AppError> {
        self.require(id).await?;
        let all_complete = self.progress.completion_state(id).await?;
        Ok(serde_json::json!({ "work_order_id": id, "all_complete": all_complete }))
    }

    /// Reconciliar una orden puntual
    pub async fn reconcile(&self, id: &str) -> Result<ApiResponse<ReconcileResponse>, AppError> {
        match self.reconciliation.reconcile_order(id).await? {
            ReconcileOutcome::Updated { order, previous } => Ok(ApiResponse::success_with_message(
                ReconcileResponse {
                    changed: true,
                    previous_stage: Some(previous.label().to_string()),
                    order: order.into(),
                },
                "Etapa corregida".to_string(),
            )),
            ReconcileOutcome::Skipped => {
                let order = self.require(id).await?;
                Ok(ApiResponse::success_with_message(
                    ReconcileResponse {
                        changed: false,
                        previous_stage: None,
                        order: order.into(),
                    },
                    "La orden ya estaba en la etapa correcta".to_string(),
                ))
            }
        }
    }

    /// Barrido de reconciliación sobre todas las órdenes
    pub async fn reconcile_all(&self) -> Result<ApiResponse<ReconciliationReport>, AppError> {
        let report = self.reconciliation.reconcile_all().await?;
        Ok(ApiResponse::success(report))
    }

    /// Avisos generados sobre la orden
    pub async fn notifications(
        &self,
        id: &str,
    ) -> Result<Vec<crate::models::notification::Notification>, AppError> {
        self.require(id).await?;
        self.notifications.list_for_order(id).await
    }

    pub async fn mark_notification_read(
        &self,
        notification_id: uuid::Uuid,
    ) -> Result<ApiResponse<()>, AppError> {
        if !self.notifications.mark_read(notification_id).await? {
            return Err(AppError::NotFound(format!(
                "Notificación '{}' no encontrada",
                notification_id
            )));
        }
        Ok(ApiResponse::success_with_message(
            (),
            "Notificación marcada como leída".to_string(),
        ))
    }

    /// Borrado administrativo
    pub async fn delete(&self, id: &str) -> Result<ApiResponse<()>, AppError> {
        if !self.repository.delete(id).await? {
            return Err(AppError::NotFound(format!("Orden '{}' no encontrada", id)));
        }
        self.state.remove_work_order(id).await;
        Ok(ApiResponse::success_with_message(
            (),
            "Orden eliminada".to_string(),
        ))
    }

    async fn require(&self, id: &str) -> Result<WorkOrder, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Orden '{}' no encontrada", id)))
    }

    async fn move_stage(
        &self,
        order: WorkOrder,
        target: WorkOrderStage,
        request: &StageActionRequest,
        cause: &str,
    ) -> Result<ApiResponse<WorkOrderResponse>, AppError> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let notes = match &request.notes {
            Some(notes) if !notes.trim().is_empty() => format!("{}. {}", cause, notes),
            _ => cause.to_string(),
        };
        let entry = HistoryEntry::new(target, &request.user, &notes);
        let updated = self
            .repository
            .update_stage_with_history(
                &order.id,
                target,
                status_for_stage(target, order.status),
                entry,
            )
            .await?;

        info!("✅ Orden {}: {} → {}", order.id, order.stage.label(), target.label());
        self.notifications.notify_stage_change(&updated, cause).await;
        self.state.put_work_order(updated.clone()).await;
        Ok(ApiResponse::success_with_message(
            updated.into(),
            cause.to_string(),
        ))
    }
}
