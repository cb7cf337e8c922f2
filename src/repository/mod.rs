//! Storage ports for the three tables.
//!
//! Services only see these traits. [`MySqlRepository`] backs deployments and
//! [`MemoryRepository`] backs tests and database-less local runs. Both
//! implement all three traits so one instance can be shared.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::AppResult;
use crate::model::attendance::{AttendanceRecord, NewAttendanceRecord};
use crate::model::employee::{Employee, EmployeePatch, NewEmployee};
use crate::model::schedule::{NewWorkSchedule, WorkSchedule, WorkSchedulePatch};

pub mod memory;
pub mod mysql;

pub use memory::MemoryRepository;
pub use mysql::MySqlRepository;

/// Half-open time window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn insert_employee(&self, employee: NewEmployee, now: DateTime<Utc>) -> AppResult<Employee>;

    async fn find_employee(&self, id: u64) -> AppResult<Option<Employee>>;

    async fn find_employee_by_code(&self, code: &str) -> AppResult<Option<Employee>>;

    async fn find_employee_by_email(&self, email: &str) -> AppResult<Option<Employee>>;

    /// Employees whose id is in `ids`, in no particular order. Unknown ids are skipped.
    async fn find_employees(&self, ids: &[u64]) -> AppResult<Vec<Employee>>;

    /// Ordered by id.
    async fn list_employees(&self, skip: u64, limit: u64) -> AppResult<Vec<Employee>>;

    /// Returns `None` when no employee has this id.
    async fn update_employee(
        &self,
        id: u64,
        patch: EmployeePatch,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Employee>>;
}

#[async_trait]
pub trait RecordRepository: Send + Sync {
    async fn append_record(&self, record: NewAttendanceRecord) -> AppResult<AttendanceRecord>;

    /// Latest record of the employee inside `range`, by `(timestamp, id)`.
    async fn latest_record_in(
        &self,
        employee_id: u64,
        range: TimeRange,
    ) -> AppResult<Option<AttendanceRecord>>;

    /// Newest first, by `(timestamp, id)`.
    async fn list_records(
        &self,
        employee_id: Option<u64>,
        skip: u64,
        limit: u64,
    ) -> AppResult<Vec<AttendanceRecord>>;

    /// Every record inside `range`, newest first.
    async fn records_in(
        &self,
        range: TimeRange,
        employee_id: Option<u64>,
    ) -> AppResult<Vec<AttendanceRecord>>;
}

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// New schedules are stored inactive.
    async fn insert_schedule(
        &self,
        schedule: NewWorkSchedule,
        now: DateTime<Utc>,
    ) -> AppResult<WorkSchedule>;

    async fn find_schedule(&self, id: u64) -> AppResult<Option<WorkSchedule>>;

    /// Newest-created first.
    async fn list_schedules(&self, active_only: bool) -> AppResult<Vec<WorkSchedule>>;

    async fn active_schedule(&self) -> AppResult<Option<WorkSchedule>>;

    /// Applies every field but `is_active`. Returns `None` when absent.
    async fn update_schedule(
        &self,
        id: u64,
        patch: WorkSchedulePatch,
        now: DateTime<Utc>,
    ) -> AppResult<Option<WorkSchedule>>;

    /// Atomically clears `is_active` everywhere and sets it on `id`.
    /// Returns `None`, changing nothing, when `id` is absent.
    async fn activate_schedule(&self, id: u64, now: DateTime<Utc>) -> AppResult<Option<WorkSchedule>>;

    async fn deactivate_schedule(&self, id: u64, now: DateTime<Utc>) -> AppResult<Option<WorkSchedule>>;

    /// Returns false when nothing was deleted.
    async fn delete_schedule(&self, id: u64) -> AppResult<bool>;
}
