//! Controller de facturación
//!
//! Emite facturas sobre órdenes entregadas sumando los totales de las
//! cotizaciones aprobadas al momento de la emisión.

use crate::dto::common::ApiResponse;
use crate::dto::invoice_dto::{CreateInvoiceRequest, InvoiceResponse};
use crate::models::quote::QuoteStatus;
use crate::models::work_order::{HistoryEntry, WorkOrderStage};
use crate::repositories::invoice_repository::InvoiceRepository;
use crate::repositories::work_order_repository::WorkOrderRepository;
use crate::services::notification_service::NotificationService;
use crate::services::stage_service::ReconciliationService;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

pub struct InvoiceController {
    state: AppState,
    repository: InvoiceRepository,
    work_orders: WorkOrderRepository,
    notifications: NotificationService,
    reconciliation: ReconciliationService,
}

impl InvoiceController {
    pub fn new(state: AppState) -> Self {
        let pool = state.pool.clone();
        Self {
            repository: InvoiceRepository::new(pool.clone()),
            work_orders: WorkOrderRepository::new(pool.clone()),
            notifications: NotificationService::new(pool),
            reconciliation: ReconciliationService::new(state.clone()),
            state,
        }
    }

    /// Emitir la factura de una orden entregada
    pub async fn create(
        &self,
        request: CreateInvoiceRequest,
    ) -> Result<ApiResponse<InvoiceResponse>, AppError> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let order = self
            .work_orders
            .find_by_id(&request.work_order_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Orden '{}' no encontrada", request.work_order_id))
            })?;

        if order.stage != WorkOrderStage::Entregado {
            return Err(AppError::Conflict(format!(
                "Solo una orden entregada puede facturarse; está en '{}'",
                order.stage.label()
            )));
        }

        let quotes = self.reconciliation.resolve_linked_quotes(&order).await?;
        let approved: Vec<_> = quotes
            .into_iter()
            .filter(|q| q.status == QuoteStatus::Aprobado)
            .collect();
        if approved.is_empty() {
            return Err(AppError::Conflict(
                "La orden no tiene cotizaciones aprobadas que facturar".to_string(),
            ));
        }

        let subtotal: Decimal = approved.iter().map(|q| q.subtotal).sum();
        let tax_amount: Decimal = approved.iter().map(|q| q.tax_amount).sum();
        let total: Decimal = approved.iter().map(|q| q.total).sum();

        let invoice = self
            .repository
            .create(&order.id, &order.client_name, subtotal, tax_amount, total)
            .await?;
        info!("✅ Factura {} emitida para orden {}", invoice.folio, order.id);

        let entry = HistoryEntry::new(
            order.stage,
            &request.user,
            &format!("Factura {} emitida por ${}", invoice.folio, invoice.total),
        );
        let updated = self.work_orders.mark_invoiced(&order.id, entry).await?;

        self.notifications
            .notify(
                &order.id,
                &format!("Factura {} emitida", invoice.folio),
                &format!("Total facturado: ${}", invoice.total),
            )
            .await;
        self.state.put_work_order(updated).await;

        Ok(ApiResponse::success_with_message(
            invoice.into(),
            "Factura emitida".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<InvoiceResponse, AppError> {
        let invoice = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Factura", &id.to_string()))?;
        Ok(invoice.into())
    }

    pub async fn list(&self) -> Result<Vec<InvoiceResponse>, AppError> {
        let invoices = self.repository.find_all().await?;
        Ok(invoices.into_iter().map(InvoiceResponse::from).collect())
    }

    pub async fn list_by_work_order(
        &self,
        work_order_id: &str,
    ) -> Result<Vec<InvoiceResponse>, AppError> {
        let invoices = self.repository.find_by_work_order(work_order_id).await?;
        Ok(invoices.into_iter().map(InvoiceResponse::from).collect())
    }
}
