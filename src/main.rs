use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use taller_backend::config::environment::EnvironmentConfig;
use taller_backend::database::DatabaseConnection;
use taller_backend::middleware::cors::{cors_middleware, cors_middleware_with_origins};
use taller_backend::routes;
use taller_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🔧 Taller Mecánico - Backend de gestión de órdenes");
    info!("==================================================");

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let pool = db_connection.pool().clone();
    let config = EnvironmentConfig::default();

    let app_state = AppState::new(pool, config.clone());

    // Precargar el espejo en memoria de órdenes activas
    match app_state.load_work_orders().await {
        Ok(count) => info!("✅ Espejo de órdenes precargado ({} órdenes)", count),
        Err(e) => error!("⚠️ No se pudo precargar el espejo de órdenes: {}", e),
    }

    // CORS restringido por entorno; permisivo solo en desarrollo
    let cors = if config.cors_origins.is_empty() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(config.cors_origins.clone())
    };

    let app = Router::new()
        .route("/health", get(health_endpoint))
        .nest("/api/client", routes::client_routes::create_client_router())
        .nest("/api/vehicle", routes::vehicle_routes::create_vehicle_router())
        .nest(
            "/api/work-order",
            routes::work_order_routes::create_work_order_router(),
        )
        .nest("/api/quote", routes::quote_routes::create_quote_router())
        .nest("/api/invoice", routes::invoice_routes::create_invoice_router())
        .layer(cors)
        .with_state(app_state);

    // Puerto del servidor
    let port = std::env::var("PORT").unwrap_or_else(|_| config.port.to_string());
    let addr: SocketAddr = format!("{}:{}", config.host, port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("👤 Endpoints - Cliente:");
    info!("   POST /api/client - Registrar cliente");
    info!("   GET  /api/client - Listar clientes");
    info!("   GET  /api/client/:id - Obtener cliente");
    info!("   GET  /api/client/document/:document - Buscar por documento");
    info!("🚗 Endpoints - Vehículo:");
    info!("   POST /api/vehicle - Registrar vehículo");
    info!("   GET  /api/vehicle/plate/:plate - Buscar por placa");
    info!("   GET  /api/vehicle/client/:client_id - Vehículos de un cliente");
    info!("📋 Endpoints - Orden de servicio:");
    info!("   POST /api/work-order - Abrir orden en recepción");
    info!("   POST /api/work-order/:id/diagnostic - Guardar diagnóstico");
    info!("   POST /api/work-order/:id/advance - Avance manual de etapa");
    info!("   POST /api/work-order/:id/retreat - Retroceso manual de etapa");
    info!("   POST /api/work-order/:id/issues - Reportar imprevisto");
    info!("   POST /api/work-order/:id/deliver - Entregar vehículo");
    info!("   POST /api/work-order/:id/cancel - Cancelar orden");
    info!("   POST /api/work-order/:id/quality-control/approve - Aprobar QC");
    info!("   POST /api/work-order/:id/quality-control/reject - Rechazar QC");
    info!("   POST /api/work-order/:id/reconcile - Reconciliar etapa");
    info!("   POST /api/work-order/reconcile - Reconciliación masiva");
    info!("   GET  /api/work-order/:id/history - Historial de la orden");
    info!("   GET  /api/work-order/:id/progress - Compuerta de término");
    info!("   GET  /api/work-order/:id/notifications - Avisos de la orden");
    info!("💰 Endpoints - Cotización:");
    info!("   POST /api/quote - Crear cotización en borrador");
    info!("   GET  /api/quote/work-order/:id - Cotizaciones de una orden");
    info!("   POST /api/quote/:id/send - Enviar al cliente");
    info!("   POST /api/quote/:id/approve - Registrar aprobación");
    info!("   POST /api/quote/:id/reject - Registrar rechazo");
    info!("   POST /api/quote/:id/items/:item_id/complete - Marcar avance");
    info!("🧾 Endpoints - Factura:");
    info!("   POST /api/invoice - Emitir factura");
    info!("   GET  /api/invoice/work-order/:id - Facturas de una orden");

    // Iniciar servidor en background
    let server_handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("❌ Error del servidor: {}", e);
                e
            })
    });

    // Esperar a que el servidor termine
    if let Err(e) = server_handle.await? {
        error!("❌ Servidor terminó con error: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "taller-backend",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal SIGTERM recibida, apagando servidor...");
        },
    }
}
