use crate::domain::{models::rule_exception::RuleException, ports::ExceptionRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use chrono::NaiveDate;

pub struct PostgresExceptionRepo {
    pool: PgPool,
}

impl PostgresExceptionRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl ExceptionRepository for PostgresExceptionRepo {
    async fn upsert(&self, entity: &RuleException) -> Result<RuleException, AppError> {
        sqlx::query_as::<_, RuleException>(
            r#"INSERT INTO rule_exceptions (id, rule_id, date, kind, override_start, override_end, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               ON CONFLICT(rule_id, date) DO UPDATE SET
               kind=excluded.kind,
               override_start=excluded.override_start,
               override_end=excluded.override_end,
               updated_at=excluded.updated_at
               RETURNING *"#
        )
            .bind(&entity.id)
            .bind(&entity.rule_id)
            .bind(entity.date)
            .bind(entity.kind.as_str())
            .bind(&entity.override_start)
            .bind(&entity.override_end)
            .bind(entity.created_at)
            .bind(entity.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from_db)
    }

    async fn find_by_rule_and_date(&self, rule_id: &str, date: NaiveDate) -> Result<Option<RuleException>, AppError> {
        sqlx::query_as::<_, RuleException>(
            "SELECT * FROM rule_exceptions WHERE rule_id = $1 AND date = $2"
        )
            .bind(rule_id)
            .bind(date)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Storage)
    }

    async fn list_by_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<RuleException>, AppError> {
        sqlx::query_as::<_, RuleException>(
            "SELECT * FROM rule_exceptions WHERE date >= $1 AND date <= $2 ORDER BY date ASC"
        )
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Storage)
    }

    async fn list_by_rule(&self, rule_id: &str) -> Result<Vec<RuleException>, AppError> {
        sqlx::query_as::<_, RuleException>(
            "SELECT * FROM rule_exceptions WHERE rule_id = $1 ORDER BY date ASC"
        )
            .bind(rule_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Storage)
    }
}
