//! Attendance state machine and monthly aggregation.
//!
//! Daily state is never stored: it is derived from the latest record of the
//! current UTC day every time it is needed.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use super::clock::{Clock, utc_day};
use crate::error::{AppError, AppResult};
use crate::model::attendance::{
    AttendanceRecord, AttendanceRecordWithEmployee, AttendanceState, AttendanceStats,
    AttendanceStatus, AttendanceType, NewAttendanceRecord,
};
use crate::repository::{EmployeeRepository, RecordRepository, TimeRange};
use crate::utils::employee_locks::EmployeeLocks;
use crate::utils::validation::optional_len;

/// Optional context attached to a check-in or check-out.
#[derive(Debug, Clone, Default)]
pub struct CheckDetails {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub notes: Option<String>,
}

impl CheckDetails {
    fn validate(&self) -> AppResult<()> {
        optional_len("latitude", self.latitude.as_deref(), 50)?;
        optional_len("longitude", self.longitude.as_deref(), 50)?;
        optional_len("notes", self.notes.as_deref(), 500)
    }
}

#[derive(Clone)]
pub struct AttendanceService {
    employees: Arc<dyn EmployeeRepository>,
    records: Arc<dyn RecordRepository>,
    clock: Arc<dyn Clock>,
    locks: EmployeeLocks,
}

impl AttendanceService {
    pub fn new(
        employees: Arc<dyn EmployeeRepository>,
        records: Arc<dyn RecordRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            employees,
            records,
            clock,
            locks: EmployeeLocks::new(),
        }
    }

    pub async fn check_in(&self, employee_id: u64, details: CheckDetails) -> AppResult<AttendanceRecord> {
        self.transition(employee_id, AttendanceType::CheckIn, details).await
    }

    pub async fn check_out(&self, employee_id: u64, details: CheckDetails) -> AppResult<AttendanceRecord> {
        self.transition(employee_id, AttendanceType::CheckOut, details).await
    }

    async fn transition(
        &self,
        employee_id: u64,
        next: AttendanceType,
        details: CheckDetails,
    ) -> AppResult<AttendanceRecord> {
        details.validate()?;

        // Held until the record is appended so concurrent requests see it.
        let lock = self.locks.handle(employee_id).await;
        let _guard = lock.lock().await;

        let employee = self
            .employees
            .find_employee(employee_id)
            .await?
            .ok_or_else(|| AppError::not_found("Employee not found"))?;

        if !employee.is_active {
            warn!(employee_id, action = %next, "Inactive employee attempted attendance action");
            return Err(AppError::InactiveEmployee);
        }

        let now = self.clock.now();
        let latest = self
            .records
            .latest_record_in(employee_id, utc_day(now))
            .await?;
        let state = AttendanceState::from_latest(latest.as_ref());

        if !state.allows(next) {
            warn!(employee_id, state = %state, action = %next, "Rejected attendance transition");
            return Err(AppError::invalid_transition(match next {
                AttendanceType::CheckIn => "Already checked in today. Please check out first.",
                AttendanceType::CheckOut => "Please check in first before checking out.",
            }));
        }

        let record = self
            .records
            .append_record(NewAttendanceRecord {
                employee_id,
                attendance_type: next,
                timestamp: now,
                latitude: details.latitude,
                longitude: details.longitude,
                notes: details.notes,
            })
            .await?;

        info!(employee_id, record_id = record.id, action = %next, "Attendance recorded");
        Ok(record)
    }

    pub async fn status(&self, employee_id: u64) -> AppResult<AttendanceStatus> {
        self.employees
            .find_employee(employee_id)
            .await?
            .ok_or_else(|| AppError::not_found("Employee not found"))?;

        let latest = self
            .records
            .latest_record_in(employee_id, utc_day(self.clock.now()))
            .await?;

        Ok(AttendanceStatus {
            employee_id,
            status: AttendanceState::from_latest(latest.as_ref()),
            last_action: latest.as_ref().map(|r| r.attendance_type),
            last_timestamp: latest.as_ref().map(|r| r.timestamp),
        })
    }

    pub async fn list_records(
        &self,
        employee_id: Option<u64>,
        skip: u64,
        limit: u64,
    ) -> AppResult<Vec<AttendanceRecord>> {
        self.records.list_records(employee_id, skip, limit).await
    }

    /// Counts and employee-annotated records for one calendar month (UTC),
    /// newest first. A record whose employee cannot be resolved fails the
    /// whole report.
    pub async fn monthly_stats(
        &self,
        year: i32,
        month: u32,
        employee_id: Option<u64>,
    ) -> AppResult<AttendanceStats> {
        let range = month_range(year, month)?;
        let records = self.records.records_in(range, employee_id).await?;

        let ids: Vec<u64> = records
            .iter()
            .map(|r| r.employee_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let employees: HashMap<u64, _> = self
            .employees
            .find_employees(&ids)
            .await?
            .into_iter()
            .map(|e| (e.id, e))
            .collect();

        let check_in_count = records
            .iter()
            .filter(|r| r.attendance_type == AttendanceType::CheckIn)
            .count();
        let check_out_count = records.len() - check_in_count;

        let records = records
            .into_iter()
            .map(|record| {
                let employee = employees.get(&record.employee_id).cloned().ok_or_else(|| {
                    AppError::not_found(format!(
                        "Employee {} referenced by record {} not found",
                        record.employee_id, record.id
                    ))
                })?;
                Ok(AttendanceRecordWithEmployee { record, employee })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(AttendanceStats {
            total_records: records.len(),
            check_in_count,
            check_out_count,
            records,
        })
    }
}

/// `[first day of month, first day of next month)` in UTC.
fn month_range(year: i32, month: u32) -> AppResult<TimeRange> {
    if !(1..=12).contains(&month) {
        return Err(AppError::validation("month must be between 1 and 12"));
    }

    let out_of_range = || AppError::validation(format!("year {year} is out of range"));
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1).ok_or_else(out_of_range)?, 1)
    } else {
        (year, month + 1)
    };
    let start = NaiveDate::from_ymd_opt(year, month, 1);
    let end = NaiveDate::from_ymd_opt(next_year, next_month, 1);

    match (start, end) {
        (Some(start), Some(end)) => Ok(TimeRange {
            start: start.and_time(chrono::NaiveTime::MIN).and_utc(),
            end: end.and_time(chrono::NaiveTime::MIN).and_utc(),
        }),
        _ => Err(out_of_range()),
    }
}
