//! DTOs de cliente

use crate::models::client::Client;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request para registrar un cliente
#[derive(Debug, Deserialize, Validate)]
pub struct CreateClientRequest {
    #[validate(length(min = 2, max = 150))]
    pub name: String,

    #[validate(length(min = 8, max = 13))]
    pub document: String,

    pub phone: Option<String>,

    #[validate(email)]
    pub email: Option<String>,
}

/// Request para actualizar un cliente existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateClientRequest {
    #[validate(length(min = 2, max = 150))]
    pub name: Option<String>,

    pub phone: Option<String>,

    #[validate(email)]
    pub email: Option<String>,
}

/// Response de cliente para la API
#[derive(Debug, Serialize)]
pub struct ClientResponse {
    pub id: String,
    pub name: String,
    pub document: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: String,
}

impl From<Client> for ClientResponse {
    fn from(client: Client) -> Self {
        Self {
            id: client.id.to_string(),
            name: client.name,
            document: client.document,
            phone: client.phone,
            email: client.email,
            created_at: client.created_at.to_rfc3339(),
        }
    }
}
