//! Servicio de notificaciones
//!
//! Canal lateral de avisos. Toda escritura es best-effort: si falla, se
//! registra un warning y la mutación principal continúa intacta.

use crate::models::notification::Notification;
use crate::models::work_order::WorkOrder;
use crate::repositories::notification_repository::NotificationRepository;
use crate::utils::errors::AppError;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

pub struct NotificationService {
    repository: NotificationRepository,
}

impl NotificationService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: NotificationRepository::new(pool),
        }
    }

    /// Avisar un cambio de etapa. Nunca propaga errores.
    pub async fn notify_stage_change(&self, order: &WorkOrder, cause: &str) {
        let title = format!("Orden {} → {}", order.id, order.stage.label());
        let message = format!(
            "La orden {} de {} pasó a '{}'. Motivo: {}",
            order.id, order.client_name, order.stage.label(), cause
        );

        if let Err(e) = self.repository.create(&order.id, &title, &message).await {
            warn!("⚠️ No se pudo crear la notificación para orden {}: {}", order.id, e);
        }
    }

    /// Aviso genérico sobre una orden. Nunca propaga errores.
    pub async fn notify(&self, work_order_id: &str, title: &str, message: &str) {
        if let Err(e) = self.repository.create(work_order_id, title, message).await {
            warn!(
                "⚠️ No se pudo crear la notificación para orden {}: {}",
                work_order_id, e
            );
        }
    }

    /// Avisos de una orden, de más reciente a más antiguo
    pub async fn list_for_order(&self, work_order_id: &str) -> Result<Vec<Notification>, AppError> {
        self.repository.find_by_work_order(work_order_id).await
    }

    pub async fn mark_read(&self, id: Uuid) -> Result<bool, AppError> {
        self.repository.mark_read(id).await
    }
}
