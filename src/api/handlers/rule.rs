use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::responses::RulesResponse;
use crate::error::AppError;
use std::sync::Arc;
use serde_json::json;

pub async fn list_rules(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let rules = state.schedule_service.list_rules().await?;
    Ok(Json(RulesResponse { rules }))
}

/// Irreversible: removes the pattern and every per-date exception under it.
pub async fn delete_rule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let deletion = state.schedule_service.delete_rule(&id).await?;
    Ok(Json(json!({
        "status": "deleted",
        "rule_id": deletion.rule_id,
        "exceptions_removed": deletion.exceptions_removed,
    })))
}
