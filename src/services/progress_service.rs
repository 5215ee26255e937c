//! Servicio de avance de reparación
//!
//! Marca partidas completadas acumulando evidencia fotográfica y expone la
//! compuerta de término: la reparación está completa cuando toda partida
//! de toda cotización aprobada quedó marcada.

use crate::models::quote::{Quote, QuoteStatus};
use crate::repositories::quote_repository::QuoteRepository;
use crate::state::AppState;
use crate::utils::errors::AppError;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// Compuerta de término: toda partida de toda cotización Aprobada está
/// completada, y existe al menos una. Las partidas de cotizaciones no
/// aprobadas nunca afectan la compuerta.
pub fn all_items_complete(quotes: &[Quote]) -> bool {
    let mut any_item = false;
    for quote in quotes.iter().filter(|q| q.status == QuoteStatus::Aprobado) {
        for item in quote.items() {
            any_item = true;
            if !item.is_completed {
                return false;
            }
        }
    }
    any_item
}

/// Resultado de marcar una partida
#[derive(Debug, Serialize)]
pub struct ToggleItemResult {
    pub quote: Quote,
    /// true cuando la compuerta quedó satisfecha con este cambio; el
    /// consumidor decide si propone pasar a Control de Calidad
    pub all_complete: bool,
}

pub struct ProgressService {
    quotes: QuoteRepository,
}

impl ProgressService {
    pub fn new(state: AppState) -> Self {
        Self {
            quotes: QuoteRepository::new(state.pool.clone()),
        }
    }

    /// Marcar o desmarcar una partida, acumulando evidencia.
    ///
    /// Las URLs de evidencia se anexan antes de cambiar la marca y nunca
    /// reemplazan las existentes.
    pub async fn toggle_item(
        &self,
        quote_id: Uuid,
        item_id: Uuid,
        completed: bool,
        evidence_urls: Vec<String>,
    ) -> Result<ToggleItemResult, AppError> {
        let quote = self
            .quotes
            .find_by_id(quote_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Cotización '{}' no encontrada", quote_id)))?;

        if quote.status != QuoteStatus::Aprobado {
            return Err(AppError::Forbidden(
                "Solo se registran avances sobre cotizaciones aprobadas".to_string(),
            ));
        }

        let mut items = quote.items().to_vec();
        let item = items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| AppError::NotFound(format!("Partida '{}' no encontrada", item_id)))?;

        for url in evidence_urls {
            if !item.image_urls.contains(&url) {
                item.image_urls.push(url);
            }
        }
        item.is_completed = completed;

        let totals = crate::models::quote::compute_totals(&items);
        let updated = self.quotes.update_items(quote_id, &items, totals).await?;
        info!(
            "✅ Partida {} de cotización {} marcada como {}",
            item_id,
            quote_id,
            if completed { "completada" } else { "pendiente" }
        );

        // Evaluar la compuerta sobre todas las cotizaciones de la orden
        let order_quotes = self.quotes.find_by_work_order(&updated.work_order_id).await?;
        let all_complete = all_items_complete(&order_quotes);

        Ok(ToggleItemResult {
            quote: updated,
            all_complete,
        })
    }

    /// Estado actual de la compuerta para una orden
    pub async fn completion_state(&self, work_order_id: &str) -> Result<bool, AppError> {
        let quotes = self.quotes.find_by_work_order(work_order_id).await?;
        Ok(all_items_complete(&quotes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quote::{QuoteItem, QuoteTotals};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use sqlx::types::Json;

    fn item(completed: bool) -> QuoteItem {
        QuoteItem {
            id: Uuid::new_v4(),
            description: "Cambio de pastillas".to_string(),
            quantity: Decimal::ONE,
            unit_price: Decimal::from(100),
            discount_percent: Decimal::ZERO,
            tax_rate: Decimal::ZERO,
            is_completed: completed,
            image_urls: Vec::new(),
            cost_price: None,
            supplier_id: None,
        }
    }

    fn quote(status: QuoteStatus, items: Vec<QuoteItem>) -> Quote {
        let totals = QuoteTotals {
            subtotal: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            total: Decimal::ZERO,
        };
        Quote {
            id: Uuid::new_v4(),
            folio: None,
            folio_number: 1,
            work_order_id: "0001".to_string(),
            status,
            items: Json(items),
            subtotal: totals.subtotal,
            tax_amount: totals.tax_amount,
            total: totals.total,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_gate_true_when_all_approved_items_complete() {
        let quotes = vec![quote(QuoteStatus::Aprobado, vec![item(true), item(true)])];
        assert!(all_items_complete(&quotes));
    }

    #[test]
    fn test_gate_false_with_pending_item() {
        let quotes = vec![quote(QuoteStatus::Aprobado, vec![item(true), item(false)])];
        assert!(!all_items_complete(&quotes));
    }

    #[test]
    fn test_gate_ignores_unapproved_quotes() {
        let quotes = vec![
            quote(QuoteStatus::Aprobado, vec![item(true)]),
            // Un borrador nuevo con partidas pendientes no cierra la compuerta
            quote(QuoteStatus::Borrador, vec![item(false)]),
            quote(QuoteStatus::Rechazado, vec![item(false)]),
        ];
        assert!(all_items_complete(&quotes));
    }

    #[test]
    fn test_gate_false_without_approved_items() {
        assert!(!all_items_complete(&[]));
        let quotes = vec![quote(QuoteStatus::Borrador, vec![item(true)])];
        assert!(!all_items_complete(&quotes));
        let quotes = vec![quote(QuoteStatus::Aprobado, Vec::new())];
        assert!(!all_items_complete(&quotes));
    }

    #[test]
    fn test_gate_spans_multiple_approved_quotes() {
        let quotes = vec![
            quote(QuoteStatus::Aprobado, vec![item(true)]),
            quote(QuoteStatus::Aprobado, vec![item(false)]),
        ];
        assert!(!all_items_complete(&quotes));
    }
}
