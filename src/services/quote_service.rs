//! Servicio de cotizaciones
//!
//! Ciclo de vida Borrador → Enviado → Aprobado | Rechazado. Cada mutación
//! de estado ejecuta, en orden: persistir la cotización, fusionar su id en
//! el vínculo de la orden, recalcular la etapa, anexar una entrada de
//! historial si cambió, notificar best-effort y refrescar el espejo con
//! una lectura confirmada post-escritura.

use crate::models::quote::{compute_totals, Quote, QuoteItem, QuoteStatus};
use crate::models::work_order::{status_for_stage, HistoryEntry, WorkOrder};
use crate::repositories::quote_repository::QuoteRepository;
use crate::repositories::work_order_repository::WorkOrderRepository;
use crate::services::notification_service::NotificationService;
use crate::services::stage_service::{determine_correct_stage, ReconciliationService};
use crate::state::AppState;
use crate::utils::errors::AppError;
use tracing::info;
use uuid::Uuid;

pub struct QuoteService {
    state: AppState,
    quotes: QuoteRepository,
    work_orders: WorkOrderRepository,
    notifications: NotificationService,
    reconciliation: ReconciliationService,
}

impl QuoteService {
    pub fn new(state: AppState) -> Self {
        let pool = state.pool.clone();
        Self {
            reconciliation: ReconciliationService::new(state.clone()),
            state,
            quotes: QuoteRepository::new(pool.clone()),
            work_orders: WorkOrderRepository::new(pool.clone()),
            notifications: NotificationService::new(pool),
        }
    }

    pub async fn get_quote(&self, id: Uuid) -> Result<Quote, AppError> {
        self.quotes
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Cotización '{}' no encontrada", id)))
    }

    pub async fn list_quotes(&self) -> Result<Vec<Quote>, AppError> {
        self.quotes.find_all().await
    }

    pub async fn list_by_work_order(&self, work_order_id: &str) -> Result<Vec<Quote>, AppError> {
        self.quotes.find_by_work_order(work_order_id).await
    }

    /// Crear una cotización en borrador para una orden existente
    pub async fn create_quote(
        &self,
        work_order_id: &str,
        items: Vec<QuoteItem>,
        user: &str,
    ) -> Result<Quote, AppError> {
        let order = self.require_order(work_order_id).await?;
        if order.stage.is_terminal() {
            return Err(AppError::Forbidden(format!(
                "No se puede cotizar una orden en etapa '{}'",
                order.stage.label()
            )));
        }

        let totals = compute_totals(&items);
        let quote = self.quotes.create(work_order_id, &items, totals).await?;
        info!("✅ Cotización {} creada para orden {}", quote.id, work_order_id);

        self.apply_side_effects(
            &quote,
            &format!("Cotización {} creada", quote.folio.as_deref().unwrap_or("")),
            user,
        )
        .await?;
        Ok(quote)
    }

    /// Reemplazar partidas de un borrador; los totales se derivan siempre
    pub async fn update_quote(&self, id: Uuid, items: Vec<QuoteItem>) -> Result<Quote, AppError> {
        let quote = self.get_quote(id).await?;
        if !quote.status.is_mutable() {
            return Err(AppError::Forbidden(format!(
                "Solo un borrador es editable; la cotización está '{}'",
                quote.status.as_str()
            )));
        }

        let totals = compute_totals(&items);
        self.quotes.update_items(id, &items, totals).await
    }

    /// Eliminar un borrador, retirándolo del vínculo de su orden
    pub async fn delete_quote(&self, id: Uuid) -> Result<(), AppError> {
        let quote = self.get_quote(id).await?;
        if !quote.status.is_mutable() {
            return Err(AppError::Forbidden(format!(
                "Solo un borrador es eliminable; la cotización está '{}'",
                quote.status.as_str()
            )));
        }

        self.quotes.delete(id).await?;

        if let Some(order) = self.work_orders.find_by_id(&quote.work_order_id).await? {
            let remaining: Vec<Uuid> = order
                .linked_quote_ids()
                .iter()
                .copied()
                .filter(|qid| *qid != id)
                .collect();
            if remaining.len() != order.linked_quote_ids().len() {
                let updated = self
                    .work_orders
                    .update_linked_quote_ids(&order.id, &remaining)
                    .await?;
                self.state.put_work_order(updated).await;
            }
        }
        Ok(())
    }

    /// Enviar un borrador al cliente
    pub async fn send_quote(&self, id: Uuid, user: &str) -> Result<Quote, AppError> {
        let quote = self.get_quote(id).await?;
        if quote.status != QuoteStatus::Borrador {
            return Err(AppError::Conflict(format!(
                "Solo un borrador puede enviarse; la cotización está '{}'",
                quote.status.as_str()
            )));
        }

        let quote = self.quotes.update_status(id, QuoteStatus::Enviado).await?;
        self.apply_side_effects(
            &quote,
            &format!(
                "Cotización {} enviada al cliente",
                quote.folio.as_deref().unwrap_or("")
            ),
            user,
        )
        .await?;
        Ok(quote)
    }

    /// Registrar la aprobación del cliente
    pub async fn approve_quote(&self, id: Uuid, user: &str) -> Result<Quote, AppError> {
        let quote = self.get_quote(id).await?;
        if matches!(quote.status, QuoteStatus::Aprobado | QuoteStatus::Rechazado) {
            return Err(AppError::Conflict(format!(
                "La cotización ya fue resuelta como '{}'",
                quote.status.as_str()
            )));
        }

        let quote = self.quotes.update_status(id, QuoteStatus::Aprobado).await?;
        self.apply_side_effects(
            &quote,
            &format!(
                "Cotización {} aprobada por el cliente",
                quote.folio.as_deref().unwrap_or("")
            ),
            user,
        )
        .await?;
        Ok(quote)
    }

    /// Registrar el rechazo del cliente
    pub async fn reject_quote(&self, id: Uuid, user: &str) -> Result<Quote, AppError> {
        let quote = self.get_quote(id).await?;
        if matches!(quote.status, QuoteStatus::Aprobado | QuoteStatus::Rechazado) {
            return Err(AppError::Conflict(format!(
                "La cotización ya fue resuelta como '{}'",
                quote.status.as_str()
            )));
        }

        let quote = self.quotes.update_status(id, QuoteStatus::Rechazado).await?;
        self.apply_side_effects(
            &quote,
            &format!(
                "Cotización {} rechazada por el cliente",
                quote.folio.as_deref().unwrap_or("")
            ),
            user,
        )
        .await?;
        Ok(quote)
    }

    async fn require_order(&self, work_order_id: &str) -> Result<WorkOrder, AppError> {
        self.work_orders
            .find_by_id(work_order_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Orden '{}' no encontrada", work_order_id))
            })
    }

    /// Cadena de efectos sobre la orden tras persistir la cotización
    async fn apply_side_effects(
        &self,
        quote: &Quote,
        cause: &str,
        user: &str,
    ) -> Result<WorkOrder, AppError> {
        let mut order = self.require_order(&quote.work_order_id).await?;

        // Fusionar el id en el vínculo (dedup por identidad)
        if !order.linked_quote_ids().contains(&quote.id) {
            let mut ids = order.linked_quote_ids().to_vec();
            ids.push(quote.id);
            order = self.work_orders.update_linked_quote_ids(&order.id, &ids).await?;
        }

        // Mapear el nuevo estado de cotización a la etapa objetivo
        let quotes = self.reconciliation.resolve_linked_quotes(&order).await?;
        let target = determine_correct_stage(&order, &quotes);

        if target != order.stage {
            let entry = HistoryEntry::new(target, user, cause);
            let status = status_for_stage(target, order.status);
            order = self
                .work_orders
                .update_stage_with_history(&order.id, target, status, entry)
                .await?;
            info!("✅ Orden {} pasó a '{}' ({})", order.id, target.label(), cause);
            self.notifications.notify_stage_change(&order, cause).await;
        }

        // Lectura confirmada post-escritura; reemplaza el antiguo retardo fijo
        let fresh = self
            .work_orders
            .find_by_id(&order.id)
            .await?
            .unwrap_or(order);
        self.state.put_work_order(fresh.clone()).await;
        Ok(fresh)
    }
}
