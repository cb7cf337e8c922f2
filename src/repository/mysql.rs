use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Executor, MySql, MySqlPool};
use tracing::debug;

use super::{EmployeeRepository, RecordRepository, ScheduleRepository, TimeRange};
use crate::error::AppResult;
use crate::model::attendance::{AttendanceRecord, AttendanceRow, NewAttendanceRecord};
use crate::model::employee::{Employee, EmployeePatch, EmployeeRow, NewEmployee};
use crate::model::schedule::{NewWorkSchedule, WorkSchedule, WorkSchedulePatch, WorkScheduleRow};
use crate::utils::db_utils::{SqlValue, build_update_sql, execute_update};

const SELECT_EMPLOYEE: &str = r#"
    SELECT id, employee_code, name, email, role, is_active, created_at, updated_at
    FROM employees
"#;

const SELECT_RECORD: &str = r#"
    SELECT id, employee_id, attendance_type, `timestamp`, latitude, longitude, notes, created_at
    FROM attendance_records
"#;

const SELECT_SCHEDULE: &str = r#"
    SELECT id, name, check_in_time, check_out_time, is_active, created_at, updated_at
    FROM work_schedules
"#;

#[derive(Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

async fn fetch_employee<'e, E>(executor: E, column: &str, value: SqlValue) -> AppResult<Option<Employee>>
where
    E: Executor<'e, Database = MySql>,
{
    let sql = format!("{SELECT_EMPLOYEE} WHERE {column} = ?");
    let query = sqlx::query_as::<_, EmployeeRow>(&sql);
    let query = match value {
        SqlValue::U64(v) => query.bind(v),
        SqlValue::String(v) => query.bind(v),
        SqlValue::Bool(v) => query.bind(v),
        SqlValue::Time(v) => query.bind(v),
        SqlValue::DateTime(v) => query.bind(v),
    };

    let row = query.fetch_optional(executor).await?;
    Ok(row.map(Employee::try_from).transpose()?)
}

async fn fetch_schedule<'e, E>(executor: E, id: u64) -> AppResult<Option<WorkSchedule>>
where
    E: Executor<'e, Database = MySql>,
{
    let sql = format!("{SELECT_SCHEDULE} WHERE id = ?");
    let row = sqlx::query_as::<_, WorkScheduleRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row.map(WorkSchedule::from))
}

fn into_records(rows: Vec<AttendanceRow>) -> AppResult<Vec<AttendanceRecord>> {
    Ok(rows
        .into_iter()
        .map(AttendanceRecord::try_from)
        .collect::<Result<Vec<_>, _>>()?)
}

#[async_trait]
impl EmployeeRepository for MySqlRepository {
    async fn insert_employee(&self, employee: NewEmployee, now: DateTime<Utc>) -> AppResult<Employee> {
        let result = sqlx::query(
            r#"
            INSERT INTO employees
            (employee_code, name, email, role, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, TRUE, ?, ?)
            "#,
        )
        .bind(&employee.employee_code)
        .bind(&employee.name)
        .bind(&employee.email)
        .bind(employee.role.as_ref())
        .bind(now.naive_utc())
        .bind(now.naive_utc())
        .execute(&self.pool)
        .await?;

        Ok(Employee {
            id: result.last_insert_id(),
            employee_code: employee.employee_code,
            name: employee.name,
            email: employee.email,
            role: employee.role,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    async fn find_employee(&self, id: u64) -> AppResult<Option<Employee>> {
        fetch_employee(&self.pool, "id", SqlValue::U64(id)).await
    }

    async fn find_employee_by_code(&self, code: &str) -> AppResult<Option<Employee>> {
        fetch_employee(&self.pool, "employee_code", SqlValue::String(code.to_string())).await
    }

    async fn find_employee_by_email(&self, email: &str) -> AppResult<Option<Employee>> {
        fetch_employee(&self.pool, "email", SqlValue::String(email.to_string())).await
    }

    async fn find_employees(&self, ids: &[u64]) -> AppResult<Vec<Employee>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("{SELECT_EMPLOYEE} WHERE id IN ({placeholders})");
        debug!(sql = %sql, count = ids.len(), "Resolving employees");

        let mut query = sqlx::query_as::<_, EmployeeRow>(&sql);
        for id in ids {
            query = query.bind(*id);
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows
            .into_iter()
            .map(Employee::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn list_employees(&self, skip: u64, limit: u64) -> AppResult<Vec<Employee>> {
        let sql = format!("{SELECT_EMPLOYEE} ORDER BY id LIMIT ? OFFSET ?");
        let rows = sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(Employee::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn update_employee(
        &self,
        id: u64,
        patch: EmployeePatch,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Employee>> {
        let mut tx = self.pool.begin().await?;

        let locked = sqlx::query_scalar::<_, u64>("SELECT id FROM employees WHERE id = ? FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Ok(None);
        }

        let mut assignments = Vec::new();
        if let Some(name) = patch.name {
            assignments.push(("name", SqlValue::String(name)));
        }
        if let Some(email) = patch.email {
            assignments.push(("email", SqlValue::String(email)));
        }
        if let Some(role) = patch.role {
            assignments.push(("role", SqlValue::String(role.to_string())));
        }
        if let Some(is_active) = patch.is_active {
            assignments.push(("is_active", SqlValue::Bool(is_active)));
        }
        assignments.push(("updated_at", SqlValue::DateTime(now.naive_utc())));

        let update = build_update_sql("employees", assignments, "id", id);
        debug!(sql = %update.sql, "Updating employee");
        execute_update(&mut *tx, update).await?;

        let employee = fetch_employee(&mut *tx, "id", SqlValue::U64(id)).await?;
        tx.commit().await?;
        Ok(employee)
    }
}

#[async_trait]
impl RecordRepository for MySqlRepository {
    async fn append_record(&self, record: NewAttendanceRecord) -> AppResult<AttendanceRecord> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance_records
            (employee_id, attendance_type, `timestamp`, latitude, longitude, notes, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.employee_id)
        .bind(record.attendance_type.as_ref())
        .bind(record.timestamp.naive_utc())
        .bind(&record.latitude)
        .bind(&record.longitude)
        .bind(&record.notes)
        .bind(record.timestamp.naive_utc())
        .execute(&self.pool)
        .await?;

        Ok(AttendanceRecord {
            id: result.last_insert_id(),
            employee_id: record.employee_id,
            attendance_type: record.attendance_type,
            timestamp: record.timestamp,
            latitude: record.latitude,
            longitude: record.longitude,
            notes: record.notes,
            created_at: record.timestamp,
        })
    }

    async fn latest_record_in(
        &self,
        employee_id: u64,
        range: TimeRange,
    ) -> AppResult<Option<AttendanceRecord>> {
        let sql = format!(
            "{SELECT_RECORD} WHERE employee_id = ? AND `timestamp` >= ? AND `timestamp` < ? \
             ORDER BY `timestamp` DESC, id DESC LIMIT 1"
        );
        let row = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(employee_id)
            .bind(range.start.naive_utc())
            .bind(range.end.naive_utc())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(AttendanceRecord::try_from).transpose()?)
    }

    async fn list_records(
        &self,
        employee_id: Option<u64>,
        skip: u64,
        limit: u64,
    ) -> AppResult<Vec<AttendanceRecord>> {
        let sql = format!(
            "{SELECT_RECORD} WHERE (? IS NULL OR employee_id = ?) \
             ORDER BY `timestamp` DESC, id DESC LIMIT ? OFFSET ?"
        );
        let rows = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(employee_id)
            .bind(employee_id)
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await?;
        into_records(rows)
    }

    async fn records_in(
        &self,
        range: TimeRange,
        employee_id: Option<u64>,
    ) -> AppResult<Vec<AttendanceRecord>> {
        let sql = format!(
            "{SELECT_RECORD} WHERE `timestamp` >= ? AND `timestamp` < ? \
             AND (? IS NULL OR employee_id = ?) \
             ORDER BY `timestamp` DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(range.start.naive_utc())
            .bind(range.end.naive_utc())
            .bind(employee_id)
            .bind(employee_id)
            .fetch_all(&self.pool)
            .await?;
        into_records(rows)
    }
}

#[async_trait]
impl ScheduleRepository for MySqlRepository {
    async fn insert_schedule(
        &self,
        schedule: NewWorkSchedule,
        now: DateTime<Utc>,
    ) -> AppResult<WorkSchedule> {
        let result = sqlx::query(
            r#"
            INSERT INTO work_schedules
            (name, check_in_time, check_out_time, is_active, created_at, updated_at)
            VALUES (?, ?, ?, FALSE, ?, ?)
            "#,
        )
        .bind(&schedule.name)
        .bind(schedule.check_in_time)
        .bind(schedule.check_out_time)
        .bind(now.naive_utc())
        .bind(now.naive_utc())
        .execute(&self.pool)
        .await?;

        Ok(WorkSchedule {
            id: result.last_insert_id(),
            name: schedule.name,
            check_in_time: schedule.check_in_time,
            check_out_time: schedule.check_out_time,
            is_active: false,
            created_at: now,
            updated_at: now,
        })
    }

    async fn find_schedule(&self, id: u64) -> AppResult<Option<WorkSchedule>> {
        fetch_schedule(&self.pool, id).await
    }

    async fn list_schedules(&self, active_only: bool) -> AppResult<Vec<WorkSchedule>> {
        let sql = if active_only {
            format!("{SELECT_SCHEDULE} WHERE is_active = TRUE ORDER BY created_at DESC, id DESC")
        } else {
            format!("{SELECT_SCHEDULE} ORDER BY created_at DESC, id DESC")
        };
        let rows = sqlx::query_as::<_, WorkScheduleRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(WorkSchedule::from).collect())
    }

    async fn active_schedule(&self) -> AppResult<Option<WorkSchedule>> {
        let sql = format!("{SELECT_SCHEDULE} WHERE is_active = TRUE ORDER BY id LIMIT 1");
        let row = sqlx::query_as::<_, WorkScheduleRow>(&sql)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(WorkSchedule::from))
    }

    async fn update_schedule(
        &self,
        id: u64,
        patch: WorkSchedulePatch,
        now: DateTime<Utc>,
    ) -> AppResult<Option<WorkSchedule>> {
        let mut tx = self.pool.begin().await?;

        let locked = sqlx::query_scalar::<_, u64>("SELECT id FROM work_schedules WHERE id = ? FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Ok(None);
        }

        let mut assignments = Vec::new();
        if let Some(name) = patch.name {
            assignments.push(("name", SqlValue::String(name)));
        }
        if let Some(check_in_time) = patch.check_in_time {
            assignments.push(("check_in_time", SqlValue::Time(check_in_time)));
        }
        if let Some(check_out_time) = patch.check_out_time {
            assignments.push(("check_out_time", SqlValue::Time(check_out_time)));
        }
        assignments.push(("updated_at", SqlValue::DateTime(now.naive_utc())));

        let update = build_update_sql("work_schedules", assignments, "id", id);
        debug!(sql = %update.sql, "Updating work schedule");
        execute_update(&mut *tx, update).await?;

        let schedule = fetch_schedule(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(schedule)
    }

    async fn activate_schedule(&self, id: u64, now: DateTime<Utc>) -> AppResult<Option<WorkSchedule>> {
        let mut tx = self.pool.begin().await?;

        // Lock every schedule row so concurrent activations serialize.
        let ids = sqlx::query_scalar::<_, u64>("SELECT id FROM work_schedules FOR UPDATE")
            .fetch_all(&mut *tx)
            .await?;
        if !ids.contains(&id) {
            return Ok(None);
        }

        sqlx::query("UPDATE work_schedules SET is_active = FALSE WHERE is_active = TRUE")
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE work_schedules SET is_active = TRUE, updated_at = ? WHERE id = ?")
            .bind(now.naive_utc())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let schedule = fetch_schedule(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(schedule)
    }

    async fn deactivate_schedule(&self, id: u64, now: DateTime<Utc>) -> AppResult<Option<WorkSchedule>> {
        let mut tx = self.pool.begin().await?;

        let update = build_update_sql(
            "work_schedules",
            vec![
                ("is_active", SqlValue::Bool(false)),
                ("updated_at", SqlValue::DateTime(now.naive_utc())),
            ],
            "id",
            id,
        );
        execute_update(&mut *tx, update).await?;

        let schedule = fetch_schedule(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(schedule)
    }

    async fn delete_schedule(&self, id: u64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM work_schedules WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
