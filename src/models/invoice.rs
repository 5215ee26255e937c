//! Modelo de factura
//!
//! Factura emitida sobre una orden entregada; copia los totales de las
//! cotizaciones aprobadas al momento de la emisión.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Factura - mapea a la tabla invoices
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    pub id: Uuid,
    /// Folio legible ("F-0001")
    pub folio: String,
    pub folio_number: i32,
    pub work_order_id: String,
    pub client_name: String,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
    pub issued_at: DateTime<Utc>,
}
