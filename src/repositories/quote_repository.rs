//! Repositorio de cotizaciones
//!
//! Acceso a la tabla quotes. Las partidas viven como JSONB en la misma
//! fila; los totales se persisten ya derivados.

use crate::models::quote::{Quote, QuoteItem, QuoteStatus, QuoteTotals};
use crate::utils::errors::AppError;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

pub struct QuoteRepository {
    pool: PgPool,
}

impl QuoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Siguiente número de folio legible ("C-0001")
    pub async fn next_folio_number(&self) -> Result<i32, AppError> {
        let row: (i32,) = sqlx::query_as("SELECT COALESCE(MAX(folio_number), 0) + 1 FROM quotes")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    pub async fn create(
        &self,
        work_order_id: &str,
        items: &[QuoteItem],
        totals: QuoteTotals,
    ) -> Result<Quote, AppError> {
        let id = Uuid::new_v4();
        let folio_number = self.next_folio_number().await?;
        let folio = format!("C-{:04}", folio_number);

        let quote = sqlx::query_as::<_, Quote>(
            r#"
            INSERT INTO quotes
                (id, folio, folio_number, work_order_id, status, items,
                 subtotal, tax_amount, total, created_at, updated_at)
            VALUES ($1, $2, $3, $4, 'borrador', $5::jsonb, $6, $7, $8, $9, $9)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(folio)
        .bind(folio_number)
        .bind(work_order_id)
        .bind(Json(items.to_vec()))
        .bind(totals.subtotal)
        .bind(totals.tax_amount)
        .bind(totals.total)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(quote)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Quote>, AppError> {
        let quote = sqlx::query_as::<_, Quote>("SELECT * FROM quotes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(quote)
    }

    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Quote>, AppError> {
        let quotes = sqlx::query_as::<_, Quote>("SELECT * FROM quotes WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(quotes)
    }

    /// Cotizaciones cuya dueña es la orden (fuente de verdad del vínculo)
    pub async fn find_by_work_order(&self, work_order_id: &str) -> Result<Vec<Quote>, AppError> {
        let quotes = sqlx::query_as::<_, Quote>(
            "SELECT * FROM quotes WHERE work_order_id = $1 ORDER BY created_at",
        )
        .bind(work_order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(quotes)
    }

    pub async fn find_all(&self) -> Result<Vec<Quote>, AppError> {
        let quotes = sqlx::query_as::<_, Quote>("SELECT * FROM quotes ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(quotes)
    }

    /// Reemplazar partidas y totales derivados
    pub async fn update_items(
        &self,
        id: Uuid,
        items: &[QuoteItem],
        totals: QuoteTotals,
    ) -> Result<Quote, AppError> {
        let quote = sqlx::query_as::<_, Quote>(
            r#"
            UPDATE quotes
            SET items = $2::jsonb, subtotal = $3, tax_amount = $4, total = $5, updated_at = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Json(items.to_vec()))
        .bind(totals.subtotal)
        .bind(totals.tax_amount)
        .bind(totals.total)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(quote)
    }

    pub async fn update_status(&self, id: Uuid, status: QuoteStatus) -> Result<Quote, AppError> {
        let quote = sqlx::query_as::<_, Quote>(
            r#"
            UPDATE quotes
            SET status = $2, updated_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(quote)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM quotes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
