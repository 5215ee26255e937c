//! DTOs de cotización

use crate::models::quote::{Quote, QuoteItem};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Partida tal como llega del asesor
#[derive(Debug, Deserialize, Validate)]
pub struct QuoteItemInput {
    #[validate(length(min = 2, max = 300))]
    pub description: String,

    pub quantity: Decimal,
    pub unit_price: Decimal,

    #[serde(default)]
    pub discount_percent: Decimal,

    #[serde(default)]
    pub tax_rate: Decimal,

    pub cost_price: Option<Decimal>,
    pub supplier_id: Option<Uuid>,
}

impl QuoteItemInput {
    /// Materializar la partida; una partida nueva nace sin avance ni evidencia
    pub fn into_item(self) -> QuoteItem {
        QuoteItem {
            id: Uuid::new_v4(),
            description: self.description,
            quantity: self.quantity,
            unit_price: self.unit_price,
            discount_percent: self.discount_percent,
            tax_rate: self.tax_rate,
            is_completed: false,
            image_urls: Vec::new(),
            cost_price: self.cost_price,
            supplier_id: self.supplier_id,
        }
    }
}

/// Request para crear una cotización
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuoteRequest {
    pub work_order_id: String,

    #[validate(length(min = 1, max = 100))]
    pub user: String,

    pub items: Vec<QuoteItemInput>,
}

/// Request para reemplazar partidas de un borrador
#[derive(Debug, Deserialize)]
pub struct UpdateQuoteRequest {
    pub items: Vec<QuoteItemInput>,
}

/// Request para acciones de ciclo de vida (enviar/aprobar/rechazar)
#[derive(Debug, Deserialize, Validate)]
pub struct QuoteActionRequest {
    #[validate(length(min = 1, max = 100))]
    pub user: String,
}

/// Request para marcar avance en una partida
#[derive(Debug, Deserialize, Validate)]
pub struct ToggleItemRequest {
    #[validate(length(min = 1, max = 100))]
    pub user: String,

    pub completed: bool,

    #[serde(default)]
    pub evidence_urls: Vec<String>,
}

/// Response de cotización para la API
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub id: String,
    pub folio: Option<String>,
    pub work_order_id: String,
    pub status: String,
    pub items: Vec<QuoteItem>,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Quote> for QuoteResponse {
    fn from(quote: Quote) -> Self {
        Self {
            id: quote.id.to_string(),
            folio: quote.folio.clone(),
            work_order_id: quote.work_order_id.clone(),
            status: quote.status.as_str().to_string(),
            items: quote.items.0.clone(),
            subtotal: quote.subtotal,
            tax_amount: quote.tax_amount,
            total: quote.total,
            created_at: quote.created_at.to_rfc3339(),
            updated_at: quote.updated_at.to_rfc3339(),
        }
    }
}

/// Response de avance de partida
#[derive(Debug, Serialize)]
pub struct ToggleItemResponse {
    pub quote: QuoteResponse,
    /// true cuando toda partida aprobada quedó completada; la UI decide
    /// si propone pasar a Control de Calidad
    pub all_complete: bool,
}
