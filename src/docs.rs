use crate::api::employee::CreateEmployee;
use crate::model::attendance::{
    AttendanceRecord, AttendanceRecordWithEmployee, AttendanceState, AttendanceStats,
    AttendanceStatus, AttendanceType,
};
use crate::model::employee::{Employee, EmployeePatch, Role};
use crate::model::schedule::{NewWorkSchedule, WorkSchedule, WorkSchedulePatch};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Tracker API",
        version = "0.1.0",
        description = r#"
## Attendance Tracker

Records employee check-ins and check-outs against a per-day state machine
and keeps the company's work schedules.

### Key Features
- **Employee Management**
  - Register, list, view and update employees; deactivated employees keep their history
- **Attendance**
  - Check-in and check-out alternate per employee within a UTC day
  - Today's status, record listing and monthly statistics
- **Work Schedules**
  - At most one schedule is active at any time

### Response Format
- JSON bodies; errors are `{"error": code, "message": text}`
- `skip` / `limit` pagination on list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::health::index,
        crate::api::health::health,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::list_records,
        crate::api::attendance::monthly_stats,
        crate::api::attendance::status,

        crate::api::schedule::create_schedule,
        crate::api::schedule::list_schedules,
        crate::api::schedule::active_schedule,
        crate::api::schedule::get_schedule,
        crate::api::schedule::update_schedule,
        crate::api::schedule::activate_schedule,
        crate::api::schedule::delete_schedule
    ),
    components(
        schemas(
            Role,
            Employee,
            CreateEmployee,
            EmployeePatch,
            AttendanceType,
            AttendanceState,
            AttendanceRecord,
            AttendanceRecordWithEmployee,
            AttendanceStatus,
            AttendanceStats,
            WorkSchedule,
            NewWorkSchedule,
            WorkSchedulePatch
        )
    ),
    tags(
        (name = "Employee", description = "Employee management APIs"),
        (name = "Attendance", description = "Check-in, check-out and reporting APIs"),
        (name = "Schedule", description = "Work schedule APIs"),
        (name = "Health", description = "Service banner and liveness"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/",
            "/health",
            "/api/employees",
            "/api/employees/{employee_id}",
            "/api/attendance/check-in",
            "/api/attendance/check-out",
            "/api/attendance/records",
            "/api/attendance/monthly/{year}/{month}",
            "/api/attendance/status/{employee_id}",
            "/api/schedules",
            "/api/schedules/active",
            "/api/schedules/{schedule_id}",
            "/api/schedules/{schedule_id}/activate",
        ] {
            assert!(paths.contains_key(path), "{path} missing from the OpenAPI document");
        }
    }

    #[test]
    fn description_allows_repeat_sessions_per_day() {
        let description = ApiDoc::openapi().info.description.unwrap_or_default();

        assert!(description.contains("alternate"));
        assert!(!description.contains("One check-in and one check-out"));
    }
}
