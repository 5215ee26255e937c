//! Controller de cotizaciones
//!
//! Delegado fino sobre QuoteService y ProgressService: valida la entrada,
//! traduce DTOs y deja la orquestación de efectos al servicio.

use crate::dto::common::ApiResponse;
use crate::dto::quote_dto::{
    CreateQuoteRequest, QuoteActionRequest, QuoteResponse, ToggleItemRequest, ToggleItemResponse,
    UpdateQuoteRequest,
};
use crate::services::progress_service::ProgressService;
use crate::services::quote_service::QuoteService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::{
    validate_non_negative, validate_not_empty, validate_percent, validate_positive,
};
use uuid::Uuid;
use validator::Validate;

/// Validar los montos de cada partida antes de materializarla
fn validate_items(items: &[crate::dto::quote_dto::QuoteItemInput]) -> Result<(), AppError> {
    if items.is_empty() {
        return Err(AppError::Validation(
            "Una cotización requiere al menos una partida".to_string(),
        ));
    }
    for input in items {
        validate_not_empty(&input.description)
            .map_err(|_| AppError::Validation("La descripción de la partida es requerida".to_string()))?;
        validate_positive(input.quantity)
            .map_err(|_| AppError::Validation("La cantidad debe ser mayor a cero".to_string()))?;
        validate_non_negative(input.unit_price)
            .map_err(|_| AppError::Validation("El precio unitario no puede ser negativo".to_string()))?;
        validate_percent(input.discount_percent)
            .map_err(|_| AppError::Validation("El descuento debe estar entre 0 y 100".to_string()))?;
        validate_percent(input.tax_rate)
            .map_err(|_| AppError::Validation("La tasa de impuesto debe estar entre 0 y 100".to_string()))?;
    }
    Ok(())
}

pub struct QuoteController {
    service: QuoteService,
    progress: ProgressService,
}

impl QuoteController {
    pub fn new(state: AppState) -> Self {
        Self {
            service: QuoteService::new(state.clone()),
            progress: ProgressService::new(state),
        }
    }

    pub async fn create(
        &self,
        request: CreateQuoteRequest,
    ) -> Result<ApiResponse<QuoteResponse>, AppError> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        validate_items(&request.items)?;

        let items = request
            .items
            .into_iter()
            .map(|input| input.into_item())
            .collect();
        let quote = self
            .service
            .create_quote(&request.work_order_id, items, &request.user)
            .await?;

        Ok(ApiResponse::success_with_message(
            quote.into(),
            "Cotización creada".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<QuoteResponse, AppError> {
        let quote = self.service.get_quote(id).await?;
        Ok(quote.into())
    }

    pub async fn list(&self) -> Result<Vec<QuoteResponse>, AppError> {
        let quotes = self.service.list_quotes().await?;
        Ok(quotes.into_iter().map(QuoteResponse::from).collect())
    }

    pub async fn list_by_work_order(
        &self,
        work_order_id: &str,
    ) -> Result<Vec<QuoteResponse>, AppError> {
        let quotes = self.service.list_by_work_order(work_order_id).await?;
        Ok(quotes.into_iter().map(QuoteResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateQuoteRequest,
    ) -> Result<ApiResponse<QuoteResponse>, AppError> {
        validate_items(&request.items)?;

        let items = request
            .items
            .into_iter()
            .map(|input| input.into_item())
            .collect();
        let quote = self.service.update_quote(id, items).await?;

        Ok(ApiResponse::success_with_message(
            quote.into(),
            "Cotización actualizada".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        self.service.delete_quote(id).await?;
        Ok(ApiResponse::success_with_message(
            (),
            "Cotización eliminada".to_string(),
        ))
    }

    pub async fn send(
        &self,
        id: Uuid,
        request: QuoteActionRequest,
    ) -> Result<ApiResponse<QuoteResponse>, AppError> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let quote = self.service.send_quote(id, &request.user).await?;
        Ok(ApiResponse::success_with_message(
            quote.into(),
            "Cotización enviada al cliente".to_string(),
        ))
    }

    pub async fn approve(
        &self,
        id: Uuid,
        request: QuoteActionRequest,
    ) -> Result<ApiResponse<QuoteResponse>, AppError> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let quote = self.service.approve_quote(id, &request.user).await?;
        Ok(ApiResponse::success_with_message(
            quote.into(),
            "Cotización aprobada".to_string(),
        ))
    }

    pub async fn reject(
        &self,
        id: Uuid,
        request: QuoteActionRequest,
    ) -> Result<ApiResponse<QuoteResponse>, AppError> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let quote = self.service.reject_quote(id, &request.user).await?;
        Ok(ApiResponse::success_with_message(
            quote.into(),
            "Cotización rechazada".to_string(),
        ))
    }

    /// Marcar avance en una partida de una cotización aprobada
    pub async fn toggle_item(
        &self,
        quote_id: Uuid,
        item_id: Uuid,
        request: ToggleItemRequest,
    ) -> Result<ApiResponse<ToggleItemResponse>, AppError> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let result = self
            .progress
            .toggle_item(quote_id, item_id, request.completed, request.evidence_urls)
            .await?;

        let message = if result.all_complete {
            "Partida actualizada; todas las partidas aprobadas están completas"
        } else {
            "Partida actualizada"
        };
        Ok(ApiResponse::success_with_message(
            ToggleItemResponse {
                quote: result.quote.into(),
                all_complete: result.all_complete,
            },
            message.to_string(),
        ))
    }
}
