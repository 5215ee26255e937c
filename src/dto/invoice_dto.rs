//! DTOs de factura

use crate::models::invoice::Invoice;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request para emitir una factura sobre una orden entregada
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
    pub work_order_id: String,

    #[validate(length(min = 1, max = 100))]
    pub user: String,
}

/// Response de factura para la API
#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    pub id: String,
    pub folio: String,
    pub work_order_id: String,
    pub client_name: String,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
    pub issued_at: String,
}

impl From<Invoice> for InvoiceResponse {
    fn from(invoice: Invoice) -> Self {
        Self {
            id: invoice.id.to_string(),
            folio: invoice.folio,
            work_order_id: invoice.work_order_id,
            client_name: invoice.client_name,
            subtotal: invoice.subtotal,
            tax_amount: invoice.tax_amount,
            total: invoice.total,
            issued_at: invoice.issued_at.to_rfc3339(),
        }
    }
}
