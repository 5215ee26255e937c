//! Modelo de vehículo
//!
//! Vehículos registrados en el taller, siempre asociados a un cliente.
//! La placa es única.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Vehículo - mapea a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub client_id: Uuid,
    pub plate: String,
    pub brand: String,
    pub model: String,
    pub year: Option<i32>,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    /// Etiqueta corta para denormalizar en la orden de servicio
    pub fn display_label(&self) -> String {
        format!("{} {} ({})", self.brand, self.model, self.plate)
    }
}
