//! Servicio de control de calidad
//!
//! Resolución del checklist final de inspección. La aprobación exige todos
//! los puntos resueltos, un inspector y notas finales; el veredicto queda
//! en el historial con los datos estructurados y el resumen legado que
//! consumen los reportes imprimibles.

use crate::models::quality_check::{
    encode_checklist_summary, find_check_definition, QualityCheckInput, QualityCheckRecord,
    QUALITY_CHECKLIST,
};
use crate::models::work_order::{
    status_for_stage, HistoryEntry, WorkOrder, WorkOrderStage,
};
use crate::repositories::work_order_repository::WorkOrderRepository;
use crate::services::notification_service::NotificationService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use tracing::info;

pub struct QualityService {
    state: AppState,
    work_orders: WorkOrderRepository,
    notifications: NotificationService,
}

impl QualityService {
    pub fn new(state: AppState) -> Self {
        let pool = state.pool.clone();
        Self {
            state,
            work_orders: WorkOrderRepository::new(pool.clone()),
            notifications: NotificationService::new(pool),
        }
    }

    /// Aprobar la inspección: la orden pasa a Listo para Entrega
    pub async fn approve(
        &self,
        work_order_id: &str,
        inspector: &str,
        final_notes: &str,
        checks: Vec<QualityCheckInput>,
        user: &str,
    ) -> Result<WorkOrder, AppError> {
        let records = validate_verdict(inspector, final_notes, checks)?;
        self.apply_verdict(
            work_order_id,
            WorkOrderStage::ListoEntrega,
            inspector,
            final_notes,
            records,
            user,
            "Control de calidad aprobado",
        )
        .await
    }

    /// Rechazar la inspección: la orden vuelve a En Reparación
    pub async fn reject(
        &self,
        work_order_id: &str,
        inspector: &str,
        final_notes: &str,
        checks: Vec<QualityCheckInput>,
        user: &str,
    ) -> Result<WorkOrder, AppError> {
        let records = validate_verdict(inspector, final_notes, checks)?;
        self.apply_verdict(
            work_order_id,
            WorkOrderStage::EnReparacion,
            inspector,
            final_notes,
            records,
            user,
            "Control de calidad rechazado",
        )
        .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn apply_verdict(
        &self,
        work_order_id: &str,
        target: WorkOrderStage,
        inspector: &str,
        final_notes: &str,
        records: Vec<QualityCheckRecord>,
        user: &str,
        cause: &str,
    ) -> Result<WorkOrder, AppError> {
        let order = self
            .work_orders
            .find_by_id(work_order_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Orden '{}' no encontrada", work_order_id))
            })?;

        if order.stage != WorkOrderStage::ControlCalidad {
            return Err(AppError::Conflict(format!(
                "La orden está en '{}', no en Control de Calidad",
                order.stage.label()
            )));
        }

        let mut entry = HistoryEntry::new(
            target,
            user,
            &format!("{} por {}. {}", cause, inspector, final_notes),
        );
        entry.checklist_summary = Some(encode_checklist_summary(&records));
        entry.quality_checks_data = Some(records);

        let status = status_for_stage(target, order.status);
        let updated = self
            .work_orders
            .update_stage_with_history(work_order_id, target, status, entry)
            .await?;

        info!("✅ {} para orden {} ({})", cause, work_order_id, inspector);
        self.notifications.notify_stage_change(&updated, cause).await;

        let fresh = self
            .work_orders
            .find_by_id(work_order_id)
            .await?
            .unwrap_or(updated);
        self.state.put_work_order(fresh.clone()).await;
        Ok(fresh)
    }
}

/// Validar un veredicto completo: inspector y notas presentes, y cada
/// punto del catálogo resuelto exactamente una vez.
pub fn validate_verdict(
    inspector: &str,
    final_notes: &str,
    checks: Vec<QualityCheckInput>,
) -> Result<Vec<QualityCheckRecord>, AppError> {
    if inspector.trim().is_empty() {
        return Err(AppError::Validation(
            "Debe seleccionarse un inspector".to_string(),
        ));
    }
    if final_notes.trim().is_empty() {
        return Err(AppError::Validation(
            "Las notas finales son requeridas".to_string(),
        ));
    }

    let mut records = Vec::with_capacity(QUALITY_CHECKLIST.len());
    for definition in QUALITY_CHECKLIST.iter() {
        let input = checks
            .iter()
            .find(|c| c.id == definition.id)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Falta resolver el punto '{}' del checklist",
                    definition.description
                ))
            })?;

        if !input.status.is_resolved() {
            return Err(AppError::Validation(format!(
                "El punto '{}' sigue sin revisar",
                definition.description
            )));
        }

        records.push(QualityCheckRecord {
            id: definition.id.to_string(),
            description: definition.description.to_string(),
            category: definition.category.to_string(),
            status: input.status,
            notes: input.notes.clone(),
        });
    }

    for check in &checks {
        if find_check_definition(&check.id).is_none() {
            return Err(AppError::Validation(format!(
                "Punto desconocido en el checklist: '{}'",
                check.id
            )));
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quality_check::QualityCheckStatus;

    fn full_checks(status: QualityCheckStatus) -> Vec<QualityCheckInput> {
        QUALITY_CHECKLIST
            .iter()
            .map(|d| QualityCheckInput {
                id: d.id.to_string(),
                status,
                notes: None,
            })
            .collect()
    }

    #[test]
    fn test_complete_verdict_is_accepted() {
        let records = validate_verdict("Carlos", "Todo en orden", full_checks(QualityCheckStatus::Ok));
        let records = records.unwrap();
        assert_eq!(records.len(), QUALITY_CHECKLIST.len());
        assert!(!records[0].description.is_empty());
    }

    #[test]
    fn test_missing_inspector_is_rejected() {
        assert!(validate_verdict("  ", "notas", full_checks(QualityCheckStatus::Ok)).is_err());
    }

    #[test]
    fn test_empty_notes_are_rejected() {
        assert!(validate_verdict("Carlos", "", full_checks(QualityCheckStatus::Ok)).is_err());
    }

    #[test]
    fn test_unresolved_item_is_rejected() {
        let mut checks = full_checks(QualityCheckStatus::Ok);
        checks[3].status = QualityCheckStatus::SinRevisar;
        assert!(validate_verdict("Carlos", "notas", checks).is_err());
    }

    #[test]
    fn test_missing_item_is_rejected() {
        let mut checks = full_checks(QualityCheckStatus::Ok);
        checks.pop();
        assert!(validate_verdict("Carlos", "notas", checks).is_err());
    }

    #[test]
    fn test_unknown_item_is_rejected() {
        let mut checks = full_checks(QualityCheckStatus::Ok);
        checks.push(QualityCheckInput {
            id: "punto_inventado".to_string(),
            status: QualityCheckStatus::Ok,
            notes: None,
        });
        assert!(validate_verdict("Carlos", "notas", checks).is_err());
    }

    #[test]
    fn test_na_counts_as_resolved() {
        assert!(validate_verdict("Carlos", "notas", full_checks(QualityCheckStatus::NoAplica)).is_ok());
    }
}
