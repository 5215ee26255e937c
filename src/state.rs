//! Shared application state
//!
//! Estado compartido de la aplicación que se pasa a través del router de
//! Axum. Incluye el espejo en memoria de órdenes de servicio, refrescado
//! desde la base tras cada escritura confirmada.

use crate::config::environment::EnvironmentConfig;
use crate::models::work_order::WorkOrder;
use crate::repositories::work_order_repository::WorkOrderRepository;
use crate::utils::errors::AppError;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    /// Espejo en memoria de órdenes, indexado por folio
    pub work_orders: Arc<RwLock<HashMap<String, WorkOrder>>>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            pool,
            config,
            work_orders: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Carga inicial del espejo desde la base
    pub async fn load_work_orders(&self) -> Result<usize, AppError> {
        let repository = WorkOrderRepository::new(self.pool.clone());
        let orders = repository.find_all().await?;
        let count = orders.len();

        let mut mirror = self.work_orders.write().await;
        mirror.clear();
        for order in orders {
            mirror.insert(order.id.clone(), order);
        }
        info!("🔄 Espejo de órdenes cargado: {} órdenes", count);
        Ok(count)
    }

    /// Actualizar una orden en el espejo tras una escritura confirmada
    pub async fn put_work_order(&self, order: WorkOrder) {
        let mut mirror = self.work_orders.write().await;
        mirror.insert(order.id.clone(), order);
    }

    pub async fn get_work_order(&self, id: &str) -> Option<WorkOrder> {
        let mirror = self.work_orders.read().await;
        mirror.get(id).cloned()
    }

    pub async fn remove_work_order(&self, id: &str) {
        let mut mirror = self.work_orders.write().await;
        mirror.remove(id);
    }
}
