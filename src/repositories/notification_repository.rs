//! Repositorio de notificaciones

use crate::models::notification::Notification;
use crate::utils::errors::AppError;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        work_order_id: &str,
        title: &str,
        message: &str,
    ) -> Result<Notification, AppError> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (id, work_order_id, title, message, read, created_at)
            VALUES ($1, $2, $3, $4, false, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(work_order_id)
        .bind(title)
        .bind(message)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(notification)
    }

    pub async fn find_by_work_order(
        &self,
        work_order_id: &str,
    ) -> Result<Vec<Notification>, AppError> {
        let notifications = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE work_order_id = $1 ORDER BY created_at DESC",
        )
        .bind(work_order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(notifications)
    }

    pub async fn mark_read(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE notifications SET read = true WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
