use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{EmployeeRepository, RecordRepository, ScheduleRepository, TimeRange};
use crate::error::{AppError, AppResult};
use crate::model::attendance::{AttendanceRecord, NewAttendanceRecord};
use crate::model::employee::{Employee, EmployeePatch, NewEmployee};
use crate::model::schedule::{NewWorkSchedule, WorkSchedule, WorkSchedulePatch};

#[derive(Default)]
struct Tables {
    employees: Vec<Employee>,
    records: Vec<AttendanceRecord>,
    schedules: Vec<WorkSchedule>,
    employee_seq: u64,
    record_seq: u64,
    schedule_seq: u64,
}

/// Process-local store. Enforces the same unique keys as the MySQL schema.
#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn page<T: Clone>(items: impl Iterator<Item = T>, skip: u64, limit: u64) -> Vec<T> {
    let skip = usize::try_from(skip).unwrap_or(usize::MAX);
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    items.skip(skip).take(limit).collect()
}

fn newest_first(records: &mut [AttendanceRecord]) {
    records.sort_by(|a, b| (b.timestamp, b.id).cmp(&(a.timestamp, a.id)));
}

#[async_trait]
impl EmployeeRepository for MemoryRepository {
    async fn insert_employee(&self, employee: NewEmployee, now: DateTime<Utc>) -> AppResult<Employee> {
        let mut tables = self.write();

        if tables
            .employees
            .iter()
            .any(|e| e.employee_code == employee.employee_code)
        {
            return Err(AppError::conflict("Employee code already registered"));
        }
        if tables.employees.iter().any(|e| e.email == employee.email) {
            return Err(AppError::conflict("Email already registered"));
        }

        tables.employee_seq += 1;
        let created = Employee {
            id: tables.employee_seq,
            employee_code: employee.employee_code,
            name: employee.name,
            email: employee.email,
            role: employee.role,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        tables.employees.push(created.clone());
        Ok(created)
    }

    async fn find_employee(&self, id: u64) -> AppResult<Option<Employee>> {
        Ok(self.read().employees.iter().find(|e| e.id == id).cloned())
    }

    async fn find_employee_by_code(&self, code: &str) -> AppResult<Option<Employee>> {
        Ok(self
            .read()
            .employees
            .iter()
            .find(|e| e.employee_code == code)
            .cloned())
    }

    async fn find_employee_by_email(&self, email: &str) -> AppResult<Option<Employee>> {
        Ok(self.read().employees.iter().find(|e| e.email == email).cloned())
    }

    async fn find_employees(&self, ids: &[u64]) -> AppResult<Vec<Employee>> {
        Ok(self
            .read()
            .employees
            .iter()
            .filter(|e| ids.contains(&e.id))
            .cloned()
            .collect())
    }

    async fn list_employees(&self, skip: u64, limit: u64) -> AppResult<Vec<Employee>> {
        Ok(page(self.read().employees.iter().cloned(), skip, limit))
    }

    async fn update_employee(
        &self,
        id: u64,
        patch: EmployeePatch,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Employee>> {
        let mut tables = self.write();

        if let Some(email) = &patch.email {
            if tables.employees.iter().any(|e| e.id != id && &e.email == email) {
                return Err(AppError::conflict("Email already registered"));
            }
        }

        let Some(employee) = tables.employees.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };

        if let Some(name) = patch.name {
            employee.name = name;
        }
        if let Some(email) = patch.email {
            employee.email = email;
        }
        if let Some(role) = patch.role {
            employee.role = role;
        }
        if let Some(is_active) = patch.is_active {
            employee.is_active = is_active;
        }
        employee.updated_at = now;

        Ok(Some(employee.clone()))
    }
}

#[async_trait]
impl RecordRepository for MemoryRepository {
    async fn append_record(&self, record: NewAttendanceRecord) -> AppResult<AttendanceRecord> {
        let mut tables = self.write();

        if !tables.employees.iter().any(|e| e.id == record.employee_id) {
            return Err(AppError::not_found("Employee not found"));
        }

        tables.record_seq += 1;
        let created = AttendanceRecord {
            id: tables.record_seq,
            employee_id: record.employee_id,
            attendance_type: record.attendance_type,
            timestamp: record.timestamp,
            latitude: record.latitude,
            longitude: record.longitude,
            notes: record.notes,
            created_at: record.timestamp,
        };
        tables.records.push(created.clone());
        Ok(created)
    }

    async fn latest_record_in(
        &self,
        employee_id: u64,
        range: TimeRange,
    ) -> AppResult<Option<AttendanceRecord>> {
        Ok(self
            .read()
            .records
            .iter()
            .filter(|r| r.employee_id == employee_id && range.contains(r.timestamp))
            .max_by_key(|r| (r.timestamp, r.id))
            .cloned())
    }

    async fn list_records(
        &self,
        employee_id: Option<u64>,
        skip: u64,
        limit: u64,
    ) -> AppResult<Vec<AttendanceRecord>> {
        let mut records: Vec<_> = self
            .read()
            .records
            .iter()
            .filter(|r| employee_id.is_none_or(|id| r.employee_id == id))
            .cloned()
            .collect();
        newest_first(&mut records);
        Ok(page(records.into_iter(), skip, limit))
    }

    async fn records_in(
        &self,
        range: TimeRange,
        employee_id: Option<u64>,
    ) -> AppResult<Vec<AttendanceRecord>> {
        let mut records: Vec<_> = self
            .read()
            .records
            .iter()
            .filter(|r| range.contains(r.timestamp))
            .filter(|r| employee_id.is_none_or(|id| r.employee_id == id))
            .cloned()
            .collect();
        newest_first(&mut records);
        Ok(records)
    }
}

#[async_trait]
impl ScheduleRepository for MemoryRepository {
    async fn insert_schedule(
        &self,
        schedule: NewWorkSchedule,
        now: DateTime<Utc>,
    ) -> AppResult<WorkSchedule> {
        let mut tables = self.write();

        tables.schedule_seq += 1;
        let created = WorkSchedule {
            id: tables.schedule_seq,
            name: schedule.name,
            check_in_time: schedule.check_in_time,
            check_out_time: schedule.check_out_time,
            is_active: false,
            created_at: now,
            updated_at: now,
        };
        tables.schedules.push(created.clone());
        Ok(created)
    }

    async fn find_schedule(&self, id: u64) -> AppResult<Option<WorkSchedule>> {
        Ok(self.read().schedules.iter().find(|s| s.id == id).cloned())
    }

    async fn list_schedules(&self, active_only: bool) -> AppResult<Vec<WorkSchedule>> {
        let mut schedules: Vec<_> = self
            .read()
            .schedules
            .iter()
            .filter(|s| !active_only || s.is_active)
            .cloned()
            .collect();
        schedules.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(schedules)
    }

    async fn active_schedule(&self) -> AppResult<Option<WorkSchedule>> {
        Ok(self.read().schedules.iter().find(|s| s.is_active).cloned())
    }

    async fn update_schedule(
        &self,
        id: u64,
        patch: WorkSchedulePatch,
        now: DateTime<Utc>,
    ) -> AppResult<Option<WorkSchedule>> {
        let mut tables = self.write();
        let Some(schedule) = tables.schedules.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };

        if let Some(name) = patch.name {
            schedule.name = name;
        }
        if let Some(check_in_time) = patch.check_in_time {
            schedule.check_in_time = check_in_time;
        }
        if let Some(check_out_time) = patch.check_out_time {
            schedule.check_out_time = check_out_time;
        }
        schedule.updated_at = now;

        Ok(Some(schedule.clone()))
    }

    async fn activate_schedule(&self, id: u64, now: DateTime<Utc>) -> AppResult<Option<WorkSchedule>> {
        let mut tables = self.write();

        if !tables.schedules.iter().any(|s| s.id == id) {
            return Ok(None);
        }

        let mut activated = None;
        for schedule in tables.schedules.iter_mut() {
            schedule.is_active = schedule.id == id;
            if schedule.is_active {
                schedule.updated_at = now;
                activated = Some(schedule.clone());
            }
        }
        Ok(activated)
    }

    async fn deactivate_schedule(&self, id: u64, now: DateTime<Utc>) -> AppResult<Option<WorkSchedule>> {
        let mut tables = self.write();
        let Some(schedule) = tables.schedules.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };

        schedule.is_active = false;
        schedule.updated_at = now;
        Ok(Some(schedule.clone()))
    }

    async fn delete_schedule(&self, id: u64) -> AppResult<bool> {
        let mut tables = self.write();
        let before = tables.schedules.len();
        tables.schedules.retain(|s| s.id != id);
        Ok(tables.schedules.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveTime, TimeZone};

    use super::*;
    use crate::model::attendance::AttendanceType;
    use crate::model::employee::Role;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, hour, 0, 0).unwrap()
    }

    async fn seeded() -> (MemoryRepository, Employee) {
        let repo = MemoryRepository::new();
        let employee = repo
            .insert_employee(
                NewEmployee {
                    employee_code: "EMP001".into(),
                    name: "Jane".into(),
                    email: "jane@example.com".into(),
                    role: Role::Employee,
                },
                at(8),
            )
            .await
            .unwrap();
        (repo, employee)
    }

    fn new_record(employee_id: u64, kind: AttendanceType, timestamp: DateTime<Utc>) -> NewAttendanceRecord {
        NewAttendanceRecord {
            employee_id,
            attendance_type: kind,
            timestamp,
            latitude: None,
            longitude: None,
            notes: None,
        }
    }

    #[actix_web::test]
    async fn latest_record_breaks_timestamp_ties_by_id() {
        let (repo, employee) = seeded().await;
        repo.append_record(new_record(employee.id, AttendanceType::CheckIn, at(9)))
            .await
            .unwrap();
        let second = repo
            .append_record(new_record(employee.id, AttendanceType::CheckOut, at(9)))
            .await
            .unwrap();

        let range = TimeRange {
            start: at(0),
            end: at(0) + Duration::days(1),
        };
        let latest = repo.latest_record_in(employee.id, range).await.unwrap();

        assert_eq!(latest.map(|r| r.id), Some(second.id));
    }

    #[actix_web::test]
    async fn range_excludes_its_end() {
        let (repo, employee) = seeded().await;
        repo.append_record(new_record(employee.id, AttendanceType::CheckIn, at(12)))
            .await
            .unwrap();

        let range = TimeRange {
            start: at(0),
            end: at(12),
        };

        assert!(repo.records_in(range, None).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn unique_keys_are_enforced() {
        let (repo, _) = seeded().await;
        let err = repo
            .insert_employee(
                NewEmployee {
                    employee_code: "EMP002".into(),
                    name: "Other".into(),
                    email: "jane@example.com".into(),
                    role: Role::Employee,
                },
                at(8),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[actix_web::test]
    async fn activating_a_missing_schedule_changes_nothing() {
        let repo = MemoryRepository::new();
        let schedule = repo
            .insert_schedule(
                NewWorkSchedule {
                    name: "Standard".into(),
                    check_in_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                    check_out_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
                },
                at(8),
            )
            .await
            .unwrap();
        repo.activate_schedule(schedule.id, at(8)).await.unwrap();

        assert!(repo.activate_schedule(99, at(9)).await.unwrap().is_none());
        assert_eq!(
            repo.active_schedule().await.unwrap().map(|s| s.id),
            Some(schedule.id)
        );
    }
}
