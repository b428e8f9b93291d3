use slot_backend::{
    api::router::create_router,
    config::{default_offset, Config, SlotPolicy},
    infra::repositories::{
        sqlite_exception_repo::SqliteExceptionRepo,
        sqlite_rule_repo::SqliteRuleRepo,
    },
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use tower::ServiceExt;
use serde_json::Value;

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        Self::with_policy(SlotPolicy::default()).await
    }

    pub async fn with_policy(policy: SlotPolicy) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(10));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            civil_offset: default_offset(),
            policy,
        };

        let state = Arc::new(AppState::new(
            &config,
            Arc::new(SqliteRuleRepo::new(pool.clone())),
            Arc::new(SqliteExceptionRepo::new(pool.clone())),
        ));

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    /// Sends a request through the router and returns the status plus the
    /// JSON body (`Value::Null` when the body is empty).
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    /// Creates a rule over HTTP and returns its id.
    pub async fn create_rule(&self, day_of_week: i32, start: &str, end: &str) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/api/v1/slots",
                Some(serde_json::json!({
                    "day_of_week": day_of_week,
                    "start_time": start,
                    "end_time": end,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
        body["slot"]["id"].as_str().unwrap().to_string()
    }

    pub async fn week(&self, week_start: &str) -> Vec<Value> {
        let (status, body) = self
            .send("GET", &format!("/api/v1/slots?weekStart={}", week_start), None)
            .await;
        assert_eq!(status, StatusCode::OK, "week query failed: {body}");
        body["slots"].as_array().unwrap().clone()
    }

    pub async fn exception_rows(&self, rule_id: &str) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM rule_exceptions WHERE rule_id = ?")
            .bind(rule_id)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
