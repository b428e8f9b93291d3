use crate::domain::{models::rule::RecurringRule, ports::RuleRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteRuleRepo {
    pool: SqlitePool,
}

impl SqliteRuleRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RuleRepository for SqliteRuleRepo {
    async fn create(&self, rule: &RecurringRule) -> Result<RecurringRule, AppError> {
        sqlx::query_as::<_, RecurringRule>(
            r#"INSERT INTO recurring_rules (id, day_of_week, start_time, end_time, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?)
               RETURNING *"#
        )
            .bind(&rule.id)
            .bind(rule.day_of_week)
            .bind(&rule.start_time)
            .bind(&rule.end_time)
            .bind(rule.created_at)
            .bind(rule.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from_db)
    }

    async fn find_by_day_of_week(&self, day_of_week: i32) -> Result<Vec<RecurringRule>, AppError> {
        sqlx::query_as::<_, RecurringRule>(
            "SELECT * FROM recurring_rules WHERE day_of_week = ? ORDER BY start_time ASC"
        )
            .bind(day_of_week)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Storage)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<RecurringRule>, AppError> {
        sqlx::query_as::<_, RecurringRule>("SELECT * FROM recurring_rules WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Storage)
    }

    async fn find_all(&self) -> Result<Vec<RecurringRule>, AppError> {
        sqlx::query_as::<_, RecurringRule>(
            "SELECT * FROM recurring_rules ORDER BY day_of_week ASC, start_time ASC"
        )
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Storage)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let res = sqlx::query("DELETE FROM recurring_rules WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Storage)?;

        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("Slot not found".into()));
        }
        Ok(())
    }
}
