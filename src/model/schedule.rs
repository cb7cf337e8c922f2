use chrono::{DateTime, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Standard hours",
        "check_in_time": "09:00:00",
        "check_out_time": "18:00:00",
        "is_active": true,
        "created_at": "2026-01-01T08:00:00Z",
        "updated_at": "2026-01-01T08:00:00Z"
    })
)]
pub struct WorkSchedule {
    pub id: u64,
    pub name: String,
    #[schema(example = "09:00:00", value_type = String, format = "time")]
    pub check_in_time: NaiveTime,
    #[schema(example = "18:00:00", value_type = String, format = "time")]
    pub check_out_time: NaiveTime,
    pub is_active: bool,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewWorkSchedule {
    #[schema(example = "Standard hours")]
    pub name: String,
    #[schema(example = "09:00:00", value_type = String, format = "time")]
    pub check_in_time: NaiveTime,
    #[schema(example = "18:00:00", value_type = String, format = "time")]
    pub check_out_time: NaiveTime,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct WorkSchedulePatch {
    #[schema(example = "Adjusted hours")]
    pub name: Option<String>,
    #[schema(example = "08:30:00", value_type = Option<String>, format = "time")]
    pub check_in_time: Option<NaiveTime>,
    #[schema(example = "17:30:00", value_type = Option<String>, format = "time")]
    pub check_out_time: Option<NaiveTime>,
    pub is_active: Option<bool>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct WorkScheduleRow {
    pub id: u64,
    pub name: String,
    pub check_in_time: NaiveTime,
    pub check_out_time: NaiveTime,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<WorkScheduleRow> for WorkSchedule {
    fn from(row: WorkScheduleRow) -> Self {
        WorkSchedule {
            id: row.id,
            name: row.name,
            check_in_time: row.check_in_time,
            check_out_time: row.check_out_time,
            is_active: row.is_active,
            created_at: row.created_at.and_utc(),
            updated_at: row.updated_at.and_utc(),
        }
    }
}
