//! Motor de reconciliación de etapas
//!
//! Recalcula la etapa que una orden *debería* tener a partir del estado
//! de sus cotizaciones vinculadas, con protección de etapas terminales y
//! regla de avance monotónico para aprobaciones. La función de cálculo es
//! pura; la reconciliación masiva tolera fallos parciales y los reporta
//! por orden sin abortar el barrido.

use crate::models::quote::{Quote, QuoteStatus};
use crate::models::work_order::{
    status_for_stage, HistoryEntry, WorkOrder, WorkOrderStage, WorkOrderStatus,
};
use crate::repositories::quote_repository::QuoteRepository;
use crate::repositories::work_order_repository::WorkOrderRepository;
use crate::services::notification_service::NotificationService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

/// Usuario que firma las correcciones automáticas en el historial
const SYSTEM_USER: &str = "sistema";

/// Etapa correcta de una orden dada la evidencia de sus cotizaciones.
///
/// Precedencia estricta: Aprobado > Rechazado > Enviado > solo borradores.
/// Entregado y Cancelado nunca se sobreescriben. Con una aprobación
/// presente solo se avanza: si la orden ya está en o después de
/// En Reparación, se deja donde está.
pub fn determine_correct_stage(order: &WorkOrder, quotes: &[Quote]) -> WorkOrderStage {
    if order.stage == WorkOrderStage::Cancelado || order.status == WorkOrderStatus::Cancelado {
        return WorkOrderStage::Cancelado;
    }
    if order.stage == WorkOrderStage::Entregado {
        return WorkOrderStage::Entregado;
    }
    if !order.has_diagnostic() {
        return WorkOrderStage::Recepcion;
    }
    if quotes.is_empty() {
        return WorkOrderStage::PendienteCotizacion;
    }

    let has_status = |status: QuoteStatus| quotes.iter().any(|q| q.status == status);

    if has_status(QuoteStatus::Aprobado) {
        let current = order.stage.pipeline_index().unwrap_or(0);
        let target = WorkOrderStage::EnReparacion
            .pipeline_index()
            .unwrap_or(usize::MAX);
        if current >= target {
            order.stage
        } else {
            WorkOrderStage::EnReparacion
        }
    } else if has_status(QuoteStatus::Rechazado) {
        WorkOrderStage::AtencionRequerida
    } else if has_status(QuoteStatus::Enviado) {
        WorkOrderStage::EsperaAprobacion
    } else {
        WorkOrderStage::PendienteCotizacion
    }
}

/// Resultado de reconciliar una orden
#[derive(Debug)]
pub enum ReconcileOutcome {
    Updated { order: WorkOrder, previous: WorkOrderStage },
    Skipped,
}

/// Reporte del barrido masivo
#[derive(Debug, Default, Serialize)]
pub struct ReconciliationReport {
    pub updated: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

pub struct ReconciliationService {
    state: AppState,
    work_orders: WorkOrderRepository,
    quotes: QuoteRepository,
    notifications: NotificationService,
}

impl ReconciliationService {
    pub fn new(state: AppState) -> Self {
        let pool = state.pool.clone();
        Self {
            state,
            work_orders: WorkOrderRepository::new(pool.clone()),
            quotes: QuoteRepository::new(pool.clone()),
            notifications: NotificationService::new(pool),
        }
    }

    /// Reparar el vínculo de cotizaciones cuando quedó vacío.
    ///
    /// Reconstruye el conjunto escaneando `quotes.work_order_id` (fuente
    /// de verdad) y persiste solo ese campo: la etapa no se toca. Devuelve
    /// la lista reconstruida; vacía significa que realmente no hay
    /// cotizaciones y el caller debe reportarlo en vez de seguir con
    /// partidas de costo cero.
    pub async fn fix_linked_quote_ids(&self, order: &WorkOrder) -> Result<Vec<Uuid>, AppError> {
        let found = self.quotes.find_by_work_order(&order.id).await?;
        let ids: Vec<Uuid> = found.iter().map(|q| q.id).collect();

        if ids.is_empty() {
            warn!("⚠️ Orden {} sin cotizaciones recuperables", order.id);
            return Ok(ids);
        }

        info!(
            "🔧 Reparando vínculo de orden {}: {} cotizaciones recuperadas",
            order.id,
            ids.len()
        );
        let repaired = self.work_orders.update_linked_quote_ids(&order.id, &ids).await?;
        self.state.put_work_order(repaired).await;
        Ok(ids)
    }

    /// Resolver las cotizaciones vinculadas de una orden, reparando el
    /// vínculo si está vacío
    pub async fn resolve_linked_quotes(&self, order: &WorkOrder) -> Result<Vec<Quote>, AppError> {
        let ids = if order.linked_quote_ids().is_empty() {
            self.fix_linked_quote_ids(order).await?
        } else {
            order.linked_quote_ids().to_vec()
        };

        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.quotes.find_by_ids(&ids).await
    }

    /// Reconciliar una sola orden por folio
    pub async fn reconcile_order(&self, id: &str) -> Result<ReconcileOutcome, AppError> {
        let order = self
            .work_orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Orden '{}' no encontrada", id)))?;
        self.reconcile(&order).await
    }

    async fn reconcile(&self, order: &WorkOrder) -> Result<ReconcileOutcome, AppError> {
        let quotes = self.resolve_linked_quotes(order).await?;
        let correct = determine_correct_stage(order, &quotes);

        if correct == order.stage {
            return Ok(ReconcileOutcome::Skipped);
        }

        let previous = order.stage;
        let entry = HistoryEntry::new(
            correct,
            SYSTEM_USER,
            &format!(
                "Corrección automática de etapa: {} → {}",
                previous.label(),
                correct.label()
            ),
        );
        let status = status_for_stage(correct, order.status);
        let updated = self
            .work_orders
            .update_stage_with_history(&order.id, correct, status, entry)
            .await?;

        info!(
            "✅ Orden {} reconciliada: {} → {}",
            order.id,
            previous.label(),
            correct.label()
        );
        self.notifications
            .notify_stage_change(&updated, "Corrección automática de etapa")
            .await;

        // Lectura confirmada post-escritura para refrescar el espejo
        let fresh = self
            .work_orders
            .find_by_id(&order.id)
            .await?
            .unwrap_or_else(|| updated.clone());
        self.state.put_work_order(fresh.clone()).await;

        Ok(ReconcileOutcome::Updated { order: fresh, previous })
    }

    /// Barrido masivo: reconcilia todas las órdenes sin abortar por
    /// fallos individuales
    pub async fn reconcile_all(&self) -> Result<ReconciliationReport, AppError> {
        let orders = self.work_orders.find_all().await?;
        let mut report = ReconciliationReport::default();

        info!("🔄 Barrido de reconciliación sobre {} órdenes", orders.len());
        for order in &orders {
            match self.reconcile(order).await {
                Ok(ReconcileOutcome::Updated { .. }) => report.updated += 1,
                Ok(ReconcileOutcome::Skipped) => report.skipped += 1,
                Err(e) => {
                    warn!("❌ Error reconciliando orden {}: {}", order.id, e);
                    report.errors.push(format!("orden {}: {}", order.id, e));
                }
            }
        }

        info!(
            "📊 Reconciliación completada: {} actualizadas, {} sin cambio, {} errores",
            report.updated,
            report.skipped,
            report.errors.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quote::{QuoteItem, QuoteTotals};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use sqlx::types::Json;

    fn order_with(stage: WorkOrderStage, diagnostic: bool, quote_ids: Vec<Uuid>) -> WorkOrder {
        WorkOrder {
            id: "0001".to_string(),
            client_id: Uuid::new_v4(),
            client_name: "Juan Pérez".to_string(),
            vehicle_id: Uuid::new_v4(),
            vehicle_label: "Toyota Corolla (ABC-123)".to_string(),
            location_id: None,
            stage,
            status: if stage == WorkOrderStage::Cancelado {
                WorkOrderStatus::Cancelado
            } else {
                WorkOrderStatus::EnProceso
            },
            linked_quote_ids: Json(quote_ids),
            diagnostic_data: if diagnostic {
                Some(Json(crate::models::work_order::DiagnosticData {
                    inspector: "Carlos".to_string(),
                    mileage: Some(85_000),
                    fuel_level: None,
                    observations: None,
                    points: Vec::new(),
                }))
            } else {
                None
            },
            history: Json(Vec::new()),
            unforeseen_issues: Json(Vec::new()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn quote_with(status: QuoteStatus) -> Quote {
        let totals = QuoteTotals {
            subtotal: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            total: Decimal::ZERO,
        };
        Quote {
            id: Uuid::new_v4(),
            folio: Some("C-0001".to_string()),
            folio_number: 1,
            work_order_id: "0001".to_string(),
            status,
            items: Json(Vec::<QuoteItem>::new()),
            subtotal: totals.subtotal,
            tax_amount: totals.tax_amount,
            total: totals.total,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_cancelled_is_absorbing() {
        let order = order_with(WorkOrderStage::Cancelado, true, Vec::new());
        let quotes = vec![quote_with(QuoteStatus::Aprobado)];
        assert_eq!(determine_correct_stage(&order, &quotes), WorkOrderStage::Cancelado);
    }

    #[test]
    fn test_delivered_is_protected() {
        let order = order_with(WorkOrderStage::Entregado, true, Vec::new());
        // Ninguna cotización aprobada: aun así la entrega no se degrada
        let quotes = vec![quote_with(QuoteStatus::Rechazado)];
        assert_eq!(determine_correct_stage(&order, &quotes), WorkOrderStage::Entregado);
    }

    #[test]
    fn test_no_diagnostic_means_reception() {
        let order = order_with(WorkOrderStage::Diagnostico, false, Vec::new());
        assert_eq!(determine_correct_stage(&order, &[]), WorkOrderStage::Recepcion);
    }

    #[test]
    fn test_diagnostic_without_quotes_means_pending_quote() {
        let order = order_with(WorkOrderStage::Diagnostico, true, Vec::new());
        assert_eq!(
            determine_correct_stage(&order, &[]),
            WorkOrderStage::PendienteCotizacion
        );
    }

    #[test]
    fn test_sent_quote_means_awaiting_approval() {
        let order = order_with(WorkOrderStage::PendienteCotizacion, true, Vec::new());
        let quotes = vec![quote_with(QuoteStatus::Enviado)];
        assert_eq!(
            determine_correct_stage(&order, &quotes),
            WorkOrderStage::EsperaAprobacion
        );
    }

    #[test]
    fn test_approved_quote_means_in_repair() {
        let order = order_with(WorkOrderStage::EsperaAprobacion, true, Vec::new());
        let quotes = vec![quote_with(QuoteStatus::Aprobado)];
        assert_eq!(
            determine_correct_stage(&order, &quotes),
            WorkOrderStage::EnReparacion
        );
    }

    #[test]
    fn test_rejected_quote_means_attention_required() {
        let order = order_with(WorkOrderStage::EsperaAprobacion, true, Vec::new());
        let quotes = vec![quote_with(QuoteStatus::Rechazado)];
        assert_eq!(
            determine_correct_stage(&order, &quotes),
            WorkOrderStage::AtencionRequerida
        );
    }

    #[test]
    fn test_drafts_only_means_pending_quote() {
        let order = order_with(WorkOrderStage::EsperaAprobacion, true, Vec::new());
        let quotes = vec![quote_with(QuoteStatus::Borrador)];
        assert_eq!(
            determine_correct_stage(&order, &quotes),
            WorkOrderStage::PendienteCotizacion
        );
    }

    #[test]
    fn test_approved_takes_precedence_over_rejected() {
        let order = order_with(WorkOrderStage::EsperaAprobacion, true, Vec::new());
        let quotes = vec![
            quote_with(QuoteStatus::Rechazado),
            quote_with(QuoteStatus::Aprobado),
            quote_with(QuoteStatus::Enviado),
        ];
        assert_eq!(
            determine_correct_stage(&order, &quotes),
            WorkOrderStage::EnReparacion
        );
    }

    #[test]
    fn test_monotonic_forward_never_retreats_past_in_repair() {
        // Ya en Control de Calidad con aprobación: no retrocede
        let order = order_with(WorkOrderStage::ControlCalidad, true, Vec::new());
        let quotes = vec![quote_with(QuoteStatus::Aprobado)];
        assert_eq!(
            determine_correct_stage(&order, &quotes),
            WorkOrderStage::ControlCalidad
        );

        // En Atención Requerida (después de En Reparación en el arreglo)
        let order = order_with(WorkOrderStage::AtencionRequerida, true, Vec::new());
        assert_eq!(
            determine_correct_stage(&order, &quotes),
            WorkOrderStage::AtencionRequerida
        );
    }

    #[test]
    fn test_reconciliation_is_idempotent() {
        let quotes = vec![quote_with(QuoteStatus::Aprobado), quote_with(QuoteStatus::Enviado)];
        let mut order = order_with(WorkOrderStage::EsperaAprobacion, true, Vec::new());

        let first = determine_correct_stage(&order, &quotes);
        order.stage = first;
        let second = determine_correct_stage(&order, &quotes);
        assert_eq!(first, second);
    }

    #[test]
    fn test_idempotence_across_all_stages() {
        for stage in crate::models::work_order::STAGE_ORDER {
            for status in [
                QuoteStatus::Borrador,
                QuoteStatus::Enviado,
                QuoteStatus::Aprobado,
                QuoteStatus::Rechazado,
            ] {
                let quotes = vec![quote_with(status)];
                let mut order = order_with(stage, true, Vec::new());
                let first = determine_correct_stage(&order, &quotes);
                order.stage = first;
                assert_eq!(
                    determine_correct_stage(&order, &quotes),
                    first,
                    "no idempotente desde {:?} con {:?}",
                    stage,
                    status
                );
            }
        }
    }
}
