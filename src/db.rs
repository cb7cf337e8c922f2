use chrono::NaiveTime;
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;
use tracing::info;

use crate::error::AppResult;
use crate::model::employee::{NewEmployee, Role};
use crate::model::schedule::NewWorkSchedule;
use crate::service::AppState;

const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS employees (
        id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        employee_code VARCHAR(50) NOT NULL,
        name VARCHAR(100) NOT NULL,
        email VARCHAR(100) NOT NULL,
        role VARCHAR(20) NOT NULL DEFAULT 'employee',
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at DATETIME(6) NOT NULL,
        updated_at DATETIME(6) NOT NULL,
        UNIQUE KEY uq_employees_code (employee_code),
        UNIQUE KEY uq_employees_email (email)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS attendance_records (
        id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        employee_id BIGINT UNSIGNED NOT NULL,
        attendance_type VARCHAR(20) NOT NULL,
        `timestamp` DATETIME(6) NOT NULL,
        latitude VARCHAR(50) NULL,
        longitude VARCHAR(50) NULL,
        notes VARCHAR(500) NULL,
        created_at DATETIME(6) NOT NULL,
        KEY ix_attendance_employee_time (employee_id, `timestamp`),
        KEY ix_attendance_time (`timestamp`),
        CONSTRAINT fk_attendance_employee FOREIGN KEY (employee_id) REFERENCES employees (id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS work_schedules (
        id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        check_in_time TIME NOT NULL,
        check_out_time TIME NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT FALSE,
        created_at DATETIME(6) NOT NULL,
        updated_at DATETIME(6) NOT NULL
    )
    "#,
];

pub async fn init_db(database_url: &str, max_connections: u32) -> Result<MySqlPool, sqlx::Error> {
    let pool = MySqlPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    for statement in SCHEMA {
        sqlx::query(statement).execute(&pool).await?;
    }
    info!("Database schema ready");

    Ok(pool)
}

fn time(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Populates an empty directory with one supervisor, three employees and
/// three schedules, the first of them active.
pub async fn seed_demo_data(state: &AppState) -> AppResult<()> {
    if !state.employees.list(0, 1).await?.is_empty() {
        info!("Employees already present, skipping demo data");
        return Ok(());
    }

    let people = [
        ("SUP001", "Wang Wei", "wang@example.com", Role::Supervisor),
        ("EMP001", "Zhang San", "zhangsan@example.com", Role::Employee),
        ("EMP002", "Li Si", "lisi@example.com", Role::Employee),
        ("EMP003", "Wang Wu", "wangwu@example.com", Role::Employee),
    ];
    for (code, name, email, role) in people {
        state
            .employees
            .create(NewEmployee {
                employee_code: code.to_string(),
                name: name.to_string(),
                email: email.to_string(),
                role,
            })
            .await?;
    }

    let schedules = [
        ("Standard hours", time(9), time(18)),
        ("Early shift", time(8), time(16)),
        ("Late shift", time(14), time(22)),
    ];
    let mut first = None;
    for (name, check_in_time, check_out_time) in schedules {
        let created = state
            .schedules
            .create(NewWorkSchedule {
                name: name.to_string(),
                check_in_time,
                check_out_time,
            })
            .await?;
        first.get_or_insert(created.id);
    }
    if let Some(id) = first {
        state.schedules.activate(id).await?;
    }

    info!("Demo data seeded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryRepository;
    use crate::service::clock::SystemClock;
    use std::sync::Arc;

    #[actix_web::test]
    async fn seeding_runs_once_and_activates_standard_hours() {
        let state = AppState::new(Arc::new(MemoryRepository::new()), Arc::new(SystemClock), 100);

        seed_demo_data(&state).await.unwrap();
        seed_demo_data(&state).await.unwrap();

        assert_eq!(state.employees.list(0, 100).await.unwrap().len(), 4);
        assert_eq!(state.schedules.list(false).await.unwrap().len(), 3);
        assert_eq!(state.schedules.active().await.unwrap().name, "Standard hours");
    }
}
