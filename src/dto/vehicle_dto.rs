//! DTOs de vehículo

use crate::models::vehicle::Vehicle;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request para registrar un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    pub client_id: Uuid,

    #[validate(length(min = 5, max = 10))]
    pub plate: String,

    #[validate(length(min = 2, max = 100))]
    pub brand: String,

    #[validate(length(min = 1, max = 100))]
    pub model: String,

    #[validate(range(min = 1950, max = 2030))]
    pub year: Option<i32>,

    #[validate(length(min = 2, max = 50))]
    pub color: Option<String>,
}

/// Request para actualizar un vehículo existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 2, max = 100))]
    pub brand: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,

    #[validate(range(min = 1950, max = 2030))]
    pub year: Option<i32>,

    #[validate(length(min = 2, max = 50))]
    pub color: Option<String>,
}

/// Response de vehículo para la API
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: String,
    pub client_id: String,
    pub plate: String,
    pub brand: String,
    pub model: String,
    pub year: Option<i32>,
    pub color: Option<String>,
    pub created_at: String,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id.to_string(),
            client_id: vehicle.client_id.to_string(),
            plate: vehicle.plate,
            brand: vehicle.brand,
            model: vehicle.model,
            year: vehicle.year,
            color: vehicle.color,
            created_at: vehicle.created_at.to_rfc3339(),
        }
    }
}
