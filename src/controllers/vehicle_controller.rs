//! Controller de vehículos

use crate::dto::common::ApiResponse;
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleResponse};
use crate::repositories::client_repository::ClientRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::{conflict_error, AppError};
use crate::utils::validation::validate_plate;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct VehicleController {
    repository: VehicleRepository,
    clients: ClientRepository,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool.clone()),
            clients: ClientRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        validate_plate(&request.plate)
            .map_err(|_| AppError::Validation("Placa inválida".to_string()))?;

        // El vehículo siempre pertenece a un cliente registrado
        if self.clients.find_by_id(request.client_id).await?.is_none() {
            return Err(AppError::NotFound("Cliente no encontrado".to_string()));
        }

        if self.repository.plate_exists(&request.plate).await? {
            return Err(conflict_error("un vehículo", "placa", &request.plate));
        }

        let vehicle = self
            .repository
            .create(
                request.client_id,
                request.plate,
                request.brand,
                request.model,
                request.year,
                request.color,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            vehicle.into(),
            "Vehículo registrado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<VehicleResponse, AppError> {
        let vehicle = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;
        Ok(vehicle.into())
    }

    pub async fn list(&self) -> Result<Vec<VehicleResponse>, AppError> {
        let vehicles = self.repository.find_all().await?;
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    pub async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<VehicleResponse>, AppError> {
        let vehicles = self.repository.find_by_client(client_id).await?;
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    pub async fn find_by_plate(&self, plate: &str) -> Result<VehicleResponse, AppError> {
        let vehicle = self
            .repository
            .find_by_plate(plate)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Vehículo con placa '{}' no encontrado", plate))
            })?;
        Ok(vehicle.into())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let vehicle = self
            .repository
            .update(id, request.brand, request.model, request.year, request.color)
            .await?;

        Ok(ApiResponse::success_with_message(
            vehicle.into(),
            "Vehículo actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        if !self.repository.delete(id).await? {
            return Err(AppError::NotFound("Vehículo no encontrado".to_string()));
        }
        Ok(ApiResponse::success_with_message(
            (),
            "Vehículo eliminado".to_string(),
        ))
    }
}
