use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use super::employee::Employee;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttendanceType {
    CheckIn,
    CheckOut,
}

/// Daily state derived from the latest record of the current UTC day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttendanceState {
    NotCheckedIn,
    CheckedIn,
    CheckedOut,
}

impl AttendanceState {
    /// State implied by the latest record of the day, if any.
    pub fn from_latest(latest: Option<&AttendanceRecord>) -> Self {
        match latest.map(|r| r.attendance_type) {
            None => AttendanceState::NotCheckedIn,
            Some(AttendanceType::CheckIn) => AttendanceState::CheckedIn,
            Some(AttendanceType::CheckOut) => AttendanceState::CheckedOut,
        }
    }

    /// Check-in is allowed unless already checked in; check-out only right after a check-in.
    pub fn allows(self, next: AttendanceType) -> bool {
        match next {
            AttendanceType::CheckIn => self != AttendanceState::CheckedIn,
            AttendanceType::CheckOut => self == AttendanceState::CheckedIn,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1)]
    pub employee_id: u64,
    pub attendance_type: AttendanceType,
    #[schema(example = "2026-01-05T09:01:12Z", value_type = String, format = "date-time")]
    pub timestamp: DateTime<Utc>,
    #[schema(example = "39.9042", nullable = true)]
    pub latitude: Option<String>,
    #[schema(example = "116.4074", nullable = true)]
    pub longitude: Option<String>,
    #[schema(example = "Arrived on time", nullable = true)]
    pub notes: Option<String>,
    #[schema(example = "2026-01-05T09:01:12Z", value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
}

/// Record as returned by the monthly report, joined to its owner.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AttendanceRecordWithEmployee {
    #[serde(flatten)]
    pub record: AttendanceRecord,
    pub employee: Employee,
}

#[derive(Debug, Clone)]
pub struct NewAttendanceRecord {
    pub employee_id: u64,
    pub attendance_type: AttendanceType,
    pub timestamp: DateTime<Utc>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(example = json!({
    "employee_id": 1,
    "status": "checked_in",
    "last_action": "check_in",
    "last_timestamp": "2026-01-05T09:01:12Z"
}))]
pub struct AttendanceStatus {
    pub employee_id: u64,
    pub status: AttendanceState,
    pub last_action: Option<AttendanceType>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub last_timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AttendanceStats {
    #[schema(example = 2)]
    pub total_records: usize,
    #[schema(example = 1)]
    pub check_in_count: usize,
    #[schema(example = 1)]
    pub check_out_count: usize,
    pub records: Vec<AttendanceRecordWithEmployee>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct AttendanceRow {
    pub id: u64,
    pub employee_id: u64,
    pub attendance_type: String,
    pub timestamp: NaiveDateTime,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = sqlx::Error;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        let attendance_type = row
            .attendance_type
            .parse::<AttendanceType>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(AttendanceRecord {
            id: row.id,
            employee_id: row.employee_id,
            attendance_type,
            timestamp: row.timestamp.and_utc(),
            latitude: row.latitude,
            longitude: row.longitude,
            notes: row.notes,
            created_at: row.created_at.and_utc(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: AttendanceType) -> AttendanceRecord {
        let now = Utc::now();
        AttendanceRecord {
            id: 7,
            employee_id: 1,
            attendance_type: kind,
            timestamp: now,
            latitude: None,
            longitude: None,
            notes: None,
            created_at: now,
        }
    }

    #[test]
    fn state_follows_latest_record() {
        assert_eq!(AttendanceState::from_latest(None), AttendanceState::NotCheckedIn);
        assert_eq!(
            AttendanceState::from_latest(Some(&record(AttendanceType::CheckIn))),
            AttendanceState::CheckedIn
        );
        assert_eq!(
            AttendanceState::from_latest(Some(&record(AttendanceType::CheckOut))),
            AttendanceState::CheckedOut
        );
    }

    #[test]
    fn transitions_alternate_within_a_day() {
        use AttendanceState::*;
        use AttendanceType::*;

        assert!(NotCheckedIn.allows(CheckIn));
        assert!(!NotCheckedIn.allows(CheckOut));
        assert!(!CheckedIn.allows(CheckIn));
        assert!(CheckedIn.allows(CheckOut));
        assert!(CheckedOut.allows(CheckIn));
        assert!(!CheckedOut.allows(CheckOut));
    }

    #[test]
    fn wire_names_are_snake_case() {
        assert_eq!(
            serde_json::to_value(AttendanceType::CheckOut).unwrap(),
            serde_json::json!("check_out")
        );
        assert_eq!(
            serde_json::to_value(AttendanceState::NotCheckedIn).unwrap(),
            serde_json::json!("not_checked_in")
        );
        assert_eq!(AttendanceType::CheckIn.as_ref(), "check_in");
    }
}
