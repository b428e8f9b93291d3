use serde::Deserialize;

/// Fields are optional so a missing one is reported by the handler with a
/// field-specific message.
#[derive(Deserialize)]
pub struct CreateSlotRequest {
    pub day_of_week: Option<i32>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateSlotRequest {
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Deserialize)]
pub struct DeleteSlotRequest {
    pub date: Option<String>,
}

#[derive(Deserialize)]
pub struct WeekQuery {
    #[serde(rename = "weekStart")]
    pub week_start: Option<String>,
}
