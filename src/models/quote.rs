//! Modelo de cotización
//!
//! Cotización con partidas, totales derivados y ciclo de vida
//! Borrador → Enviado → Aprobado | Rechazado. `work_order_id` es la
//! fuente de verdad de la relación con la orden.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Estado de la cotización - mapea al ENUM quote_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "quote_status", rename_all = "snake_case")]
pub enum QuoteStatus {
    Borrador,
    Enviado,
    Aprobado,
    Rechazado,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Borrador => "borrador",
            QuoteStatus::Enviado => "enviado",
            QuoteStatus::Aprobado => "aprobado",
            QuoteStatus::Rechazado => "rechazado",
        }
    }

    /// Solo los borradores son mutables/eliminables
    pub fn is_mutable(&self) -> bool {
        matches!(self, QuoteStatus::Borrador)
    }
}

/// Partida de la cotización.
/// `is_completed` marca el avance de la reparación por tarea;
/// `image_urls` acumula evidencia y nunca se reemplaza.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteItem {
    pub id: Uuid,
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    #[serde(default)]
    pub discount_percent: Decimal,
    #[serde(default)]
    pub tax_rate: Decimal,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub image_urls: Vec<String>,
    /// Costo real, llenado post-aprobación para margen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<Uuid>,
}

/// Cotización - mapea a la tabla quotes
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Quote {
    pub id: Uuid,
    /// Folio legible ("C-0001")
    pub folio: Option<String>,
    pub folio_number: i32,
    pub work_order_id: String,
    pub status: QuoteStatus,
    pub items: Json<Vec<QuoteItem>>,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quote {
    pub fn items(&self) -> &[QuoteItem] {
        &self.items.0
    }
}

/// Totales derivados de las partidas
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuoteTotals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
}

/// Calcular totales: línea = cantidad × precio × (1 − descuento%),
/// impuesto por línea según su tasa; total = subtotal + impuestos.
pub fn compute_totals(items: &[QuoteItem]) -> QuoteTotals {
    let hundred = Decimal::from(100);
    let mut subtotal = Decimal::ZERO;
    let mut tax_amount = Decimal::ZERO;

    for item in items {
        let line = item.quantity * item.unit_price * (Decimal::ONE - item.discount_percent / hundred);
        subtotal += line;
        tax_amount += line * item.tax_rate / hundred;
    }

    let subtotal = subtotal.round_dp(2);
    let tax_amount = tax_amount.round_dp(2);
    QuoteTotals {
        subtotal,
        tax_amount,
        total: subtotal + tax_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn item(quantity: &str, unit_price: &str, discount: &str, tax: &str) -> QuoteItem {
        QuoteItem {
            id: Uuid::new_v4(),
            description: "Cambio de aceite".to_string(),
            quantity: dec(quantity),
            unit_price: dec(unit_price),
            discount_percent: dec(discount),
            tax_rate: dec(tax),
            is_completed: false,
            image_urls: Vec::new(),
            cost_price: None,
            supplier_id: None,
        }
    }

    #[test]
    fn test_totals_single_item() {
        let totals = compute_totals(&[item("2", "100", "0", "18")]);
        assert_eq!(totals.subtotal, dec("200.00"));
        assert_eq!(totals.tax_amount, dec("36.00"));
        assert_eq!(totals.total, dec("236.00"));
    }

    #[test]
    fn test_totals_with_discount() {
        let totals = compute_totals(&[item("1", "100", "10", "18")]);
        assert_eq!(totals.subtotal, dec("90.00"));
        assert_eq!(totals.tax_amount, dec("16.20"));
        assert_eq!(totals.total, dec("106.20"));
    }

    #[test]
    fn test_totals_mixed_tax_rates() {
        let totals = compute_totals(&[item("1", "100", "0", "18"), item("1", "50", "0", "0")]);
        assert_eq!(totals.subtotal, dec("150.00"));
        assert_eq!(totals.tax_amount, dec("18.00"));
        assert_eq!(totals.total, dec("168.00"));
    }

    #[test]
    fn test_totals_empty_items() {
        let totals = compute_totals(&[]);
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::ZERO);
    }

    #[test]
    fn test_invariant_total_is_subtotal_plus_tax() {
        let totals = compute_totals(&[
            item("3", "33.33", "5", "18"),
            item("1.5", "80", "0", "18"),
            item("2", "12.75", "50", "0"),
        ]);
        assert_eq!(totals.total, totals.subtotal + totals.tax_amount);
    }

    #[test]
    fn test_only_draft_is_mutable() {
        assert!(QuoteStatus::Borrador.is_mutable());
        assert!(!QuoteStatus::Enviado.is_mutable());
        assert!(!QuoteStatus::Aprobado.is_mutable());
        assert!(!QuoteStatus::Rechazado.is_mutable());
    }
}
