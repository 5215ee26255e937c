//! Modelo de notificación
//!
//! Canal lateral de avisos por cambio de etapa. Su escritura es
//! best-effort: un fallo aquí nunca aborta la mutación principal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Notificación - mapea a la tabla notifications
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub work_order_id: String,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
