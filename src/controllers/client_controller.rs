//! Controller de clientes

use crate::dto::client_dto::{ClientResponse, CreateClientRequest, UpdateClientRequest};
use crate::dto::common::ApiResponse;
use crate::repositories::client_repository::ClientRepository;
use crate::utils::errors::{conflict_error, AppError};
use crate::utils::validation::{validate_document, validate_email, validate_phone};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct ClientController {
    repository: ClientRepository,
}

impl ClientController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ClientRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        request: CreateClientRequest,
    ) -> Result<ApiResponse<ClientResponse>, AppError> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        validate_document(&request.document)
            .map_err(|_| AppError::Validation("Documento inválido: se esperan 8 a 13 dígitos".to_string()))?;
        if let Some(phone) = &request.phone {
            validate_phone(phone)
                .map_err(|_| AppError::Validation("Teléfono inválido".to_string()))?;
        }
        if let Some(email) = &request.email {
            validate_email(email)
                .map_err(|_| AppError::Validation("Email inválido".to_string()))?;
        }

        if self.repository.document_exists(&request.document).await? {
            return Err(conflict_error("un cliente", "documento", &request.document));
        }

        let client = self
            .repository
            .create(request.name, request.document, request.phone, request.email)
            .await?;

        Ok(ApiResponse::success_with_message(
            client.into(),
            "Cliente registrado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<ClientResponse, AppError> {
        let client = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cliente no encontrado".to_string()))?;
        Ok(client.into())
    }

    pub async fn list(&self) -> Result<Vec<ClientResponse>, AppError> {
        let clients = self.repository.find_all().await?;
        Ok(clients.into_iter().map(ClientResponse::from).collect())
    }

    pub async fn find_by_document(&self, document: &str) -> Result<ClientResponse, AppError> {
        let client = self
            .repository
            .find_by_document(document)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Cliente con documento '{}' no encontrado", document))
            })?;
        Ok(client.into())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateClientRequest,
    ) -> Result<ApiResponse<ClientResponse>, AppError> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let client = self
            .repository
            .update(id, request.name, request.phone, request.email)
            .await?;

        Ok(ApiResponse::success_with_message(
            client.into(),
            "Cliente actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        if !self.repository.delete(id).await? {
            return Err(AppError::NotFound("Cliente no encontrado".to_string()));
        }
        Ok(ApiResponse::success_with_message(
            (),
            "Cliente eliminado".to_string(),
        ))
    }
}
