//! Repositorio de órdenes de servicio
//!
//! Acceso a la tabla work_orders. El historial es append-only y se
//! concatena en el mismo UPDATE que cambia la etapa; los ids de
//! cotizaciones vinculadas se escriben en una columna aparte para que la
//! reparación de vínculos nunca toque la etapa.

use crate::models::work_order::{
    format_folio, DiagnosticData, HistoryEntry, UnforeseenIssue, WorkOrder, WorkOrderStage,
    WorkOrderStatus,
};
use crate::utils::errors::AppError;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

pub struct WorkOrderRepository {
    pool: PgPool,
}

impl WorkOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Siguiente folio correlativo (4 dígitos con ceros a la izquierda)
    pub async fn next_folio(&self) -> Result<String, AppError> {
        let row: (i64,) =
            sqlx::query_as("SELECT COALESCE(MAX(id::bigint), 0) + 1 FROM work_orders")
                .fetch_one(&self.pool)
                .await?;
        Ok(format_folio(row.0))
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        id: String,
        client_id: Uuid,
        client_name: String,
        vehicle_id: Uuid,
        vehicle_label: String,
        location_id: Option<Uuid>,
        initial_entry: HistoryEntry,
    ) -> Result<WorkOrder, AppError> {
        let order = sqlx::query_as::<_, WorkOrder>(
            r#"
            INSERT INTO work_orders
                (id, client_id, client_name, vehicle_id, vehicle_label, location_id,
                 stage, status, linked_quote_ids, diagnostic_data, history,
                 unforeseen_issues, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, 'recepcion', 'en_proceso', '[]'::jsonb,
                    NULL, jsonb_build_array($7::jsonb), '[]'::jsonb, $8, $8)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(client_id)
        .bind(client_name)
        .bind(vehicle_id)
        .bind(vehicle_label)
        .bind(location_id)
        .bind(Json(initial_entry))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(order)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<WorkOrder>, AppError> {
        let order = sqlx::query_as::<_, WorkOrder>("SELECT * FROM work_orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(order)
    }

    pub async fn find_all(&self) -> Result<Vec<WorkOrder>, AppError> {
        let orders =
            sqlx::query_as::<_, WorkOrder>("SELECT * FROM work_orders ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(orders)
    }

    /// Cambiar etapa y estado anexando exactamente una entrada de historial
    pub async fn update_stage_with_history(
        &self,
        id: &str,
        stage: WorkOrderStage,
        status: WorkOrderStatus,
        entry: HistoryEntry,
    ) -> Result<WorkOrder, AppError> {
        let order = sqlx::query_as::<_, WorkOrder>(
            r#"
            UPDATE work_orders
            SET stage = $2, status = $3, history = history || $4::jsonb, updated_at = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(stage)
        .bind(status)
        .bind(Json(entry))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(order)
    }

    /// Reescribir solo el vínculo de cotizaciones (la etapa no se toca)
    pub async fn update_linked_quote_ids(
        &self,
        id: &str,
        quote_ids: &[Uuid],
    ) -> Result<WorkOrder, AppError> {
        let order = sqlx::query_as::<_, WorkOrder>(
            r#"
            UPDATE work_orders
            SET linked_quote_ids = $2::jsonb, updated_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Json(quote_ids.to_vec()))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(order)
    }

    /// Guardar el checklist de diagnóstico (la etapa la cambia el caller)
    pub async fn set_diagnostic_data(
        &self,
        id: &str,
        data: &DiagnosticData,
    ) -> Result<WorkOrder, AppError> {
        let order = sqlx::query_as::<_, WorkOrder>(
            r#"
            UPDATE work_orders
            SET diagnostic_data = $2::jsonb, updated_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Json(data.clone()))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(order)
    }

    /// Anexar un imprevisto (lista append-only)
    pub async fn append_issue(
        &self,
        id: &str,
        issue: &UnforeseenIssue,
    ) -> Result<WorkOrder, AppError> {
        let order = sqlx::query_as::<_, WorkOrder>(
            r#"
            UPDATE work_orders
            SET unforeseen_issues = unforeseen_issues || $2::jsonb, updated_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Json(issue.clone()))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(order)
    }

    /// Marcar la orden como facturada sin alterar la etapa
    pub async fn mark_invoiced(&self, id: &str, entry: HistoryEntry) -> Result<WorkOrder, AppError> {
        let order = sqlx::query_as::<_, WorkOrder>(
            r#"
            UPDATE work_orders
            SET status = 'facturado', history = history || $2::jsonb, updated_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Json(entry))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(order)
    }

    /// Borrado administrativo; el flujo normal nunca elimina órdenes
    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM work_orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
