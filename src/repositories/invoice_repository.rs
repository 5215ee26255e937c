//! Repositorio de facturas

use crate::models::invoice::Invoice;
use crate::utils::errors::AppError;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

pub struct InvoiceRepository {
    pool: PgPool,
}

impl InvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn next_folio_number(&self) -> Result<i32, AppError> {
        let row: (i32,) =
            sqlx::query_as("SELECT COALESCE(MAX(folio_number), 0) + 1 FROM invoices")
                .fetch_one(&self.pool)
                .await?;
        Ok(row.0)
    }

    pub async fn create(
        &self,
        work_order_id: &str,
        client_name: &str,
        subtotal: Decimal,
        tax_amount: Decimal,
        total: Decimal,
    ) -> Result<Invoice, AppError> {
        let folio_number = self.next_folio_number().await?;
        let folio = format!("F-{:04}", folio_number);

        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices
                (id, folio, folio_number, work_order_id, client_name,
                 subtotal, tax_amount, total, issued_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(folio)
        .bind(folio_number)
        .bind(work_order_id)
        .bind(client_name)
        .bind(subtotal)
        .bind(tax_amount)
        .bind(total)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(invoice)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, AppError> {
        let invoice = sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(invoice)
    }

    pub async fn find_by_work_order(&self, work_order_id: &str) -> Result<Vec<Invoice>, AppError> {
        let invoices = sqlx::query_as::<_, Invoice>(
            "SELECT * FROM invoices WHERE work_order_id = $1 ORDER BY issued_at DESC",
        )
        .bind(work_order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(invoices)
    }

    pub async fn find_all(&self) -> Result<Vec<Invoice>, AppError> {
        let invoices =
            sqlx::query_as::<_, Invoice>("SELECT * FROM invoices ORDER BY issued_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(invoices)
    }
}
