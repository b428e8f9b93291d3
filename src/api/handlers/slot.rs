use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::json_body::JsonBody;
use crate::api::dtos::{
    requests::{CreateSlotRequest, DeleteSlotRequest, UpdateSlotRequest, WeekQuery},
    responses::{OccurrenceResponse, RuleResponse, WeekSlotsResponse},
};
use crate::domain::services::{
    civil_time::{parse_calendar_date, sunday_on_or_before},
    schedule_service::{NewRule, OccurrenceChange},
};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WeekQuery>,
) -> Result<impl IntoResponse, AppError> {
    // Any date is accepted and snapped back to its week's Sunday.
    let week_start = match params.week_start.as_deref() {
        Some(raw) => sunday_on_or_before(parse_calendar_date(raw)?),
        None => state.clock.current_week_start(),
    };

    let slots = state.resolver.occurrences_for_week(week_start).await?;
    Ok(Json(WeekSlotsResponse { week_start, slots }))
}

pub async fn create_slot(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<CreateSlotRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(day_of_week), Some(start_time), Some(end_time)) =
        (payload.day_of_week, payload.start_time, payload.end_time)
    else {
        return Err(AppError::MalformedInput(
            "day_of_week, start_time, and end_time are required".into(),
        ));
    };

    let slot = state
        .schedule_service
        .create_rule(NewRule { day_of_week, start_time, end_time })
        .await?;

    Ok((StatusCode::CREATED, Json(RuleResponse { slot })))
}

pub async fn update_slot(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateSlotRequest>,
) -> Result<impl IntoResponse, AppError> {
    let date = payload
        .date
        .ok_or(AppError::MalformedInput("Date is required for slot updates".into()))?;

    let change = OccurrenceChange {
        start_time: payload.start_time,
        end_time: payload.end_time,
    };

    let slot = state.schedule_service.update_occurrence(&id, &date, change).await?;
    info!("Updated slot {} on {}", id, date);
    Ok(Json(OccurrenceResponse { slot }))
}

pub async fn delete_slot(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<DeleteSlotRequest>,
) -> Result<impl IntoResponse, AppError> {
    let date = payload
        .date
        .ok_or(AppError::MalformedInput("Date is required for slot deletion".into()))?;

    state.schedule_service.delete_occurrence(&id, &date).await?;
    info!("Deleted slot {} on {}", id, date);
    Ok(StatusCode::NO_CONTENT)
}
