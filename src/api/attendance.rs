use crate::{
    api::Pagination,
    model::attendance::{AttendanceRecord, AttendanceStats, AttendanceStatus},
    service::{AppState, attendance::CheckDetails},
};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CheckQuery {
    /// Employee performing the action
    #[serde(rename = "employeeId", alias = "employee_id")]
    #[param(example = 1)]
    pub employee_id: u64,
    /// Free-form latitude
    #[param(example = "39.9042")]
    pub latitude: Option<String>,
    /// Free-form longitude
    #[param(example = "116.4074")]
    pub longitude: Option<String>,
    /// Up to 500 characters
    pub notes: Option<String>,
}

impl CheckQuery {
    fn into_parts(self) -> (u64, CheckDetails) {
        (
            self.employee_id,
            CheckDetails {
                latitude: self.latitude,
                longitude: self.longitude,
                notes: self.notes,
            },
        )
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecordFilter {
    /// Restrict to one employee
    #[serde(rename = "employeeId", alias = "employee_id")]
    pub employee_id: Option<u64>,
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/check-in",
    params(CheckQuery),
    responses(
        (status = 201, description = "Checked in", body = AttendanceRecord),
        (status = 400, description = "Employee inactive or already checked in today", body = Object, example = json!({
            "error": "invalid_transition",
            "message": "Already checked in today. Please check out first."
        })),
        (status = 404, description = "Employee not found")
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    state: web::Data<AppState>,
    query: web::Query<CheckQuery>,
) -> actix_web::Result<impl Responder> {
    let (employee_id, details) = query.into_inner().into_parts();
    let record = state.attendance.check_in(employee_id, details).await?;
    Ok(HttpResponse::Created().json(record))
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/check-out",
    params(CheckQuery),
    responses(
        (status = 201, description = "Checked out", body = AttendanceRecord),
        (status = 400, description = "Employee inactive or not checked in today", body = Object, example = json!({
            "error": "invalid_transition",
            "message": "Please check in first before checking out."
        })),
        (status = 404, description = "Employee not found")
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    state: web::Data<AppState>,
    query: web::Query<CheckQuery>,
) -> actix_web::Result<impl Responder> {
    let (employee_id, details) = query.into_inner().into_parts();
    let record = state.attendance.check_out(employee_id, details).await?;
    Ok(HttpResponse::Created().json(record))
}

/// List attendance records, newest first
#[utoipa::path(
    get,
    path = "/api/attendance/records",
    params(RecordFilter, Pagination),
    responses(
        (status = 200, description = "Attendance records", body = [AttendanceRecord])
    ),
    tag = "Attendance"
)]
pub async fn list_records(
    state: web::Data<AppState>,
    filter: web::Query<RecordFilter>,
    page: web::Query<Pagination>,
) -> actix_web::Result<impl Responder> {
    let (skip, limit) = page.bounds(state.max_page_size);
    let records = state
        .attendance
        .list_records(filter.employee_id, skip, limit)
        .await?;
    Ok(HttpResponse::Ok().json(records))
}

/// Monthly attendance statistics
#[utoipa::path(
    get,
    path = "/api/attendance/monthly/{year}/{month}",
    params(
        ("year", Path, description = "Calendar year", example = 2026),
        ("month", Path, description = "Month, 1-12", example = 1),
        RecordFilter
    ),
    responses(
        (status = 200, description = "Counts and records of the month", body = AttendanceStats),
        (status = 422, description = "Month out of range")
    ),
    tag = "Attendance"
)]
pub async fn monthly_stats(
    state: web::Data<AppState>,
    path: web::Path<(i32, u32)>,
    filter: web::Query<RecordFilter>,
) -> actix_web::Result<impl Responder> {
    let (year, month) = path.into_inner();
    let stats = state
        .attendance
        .monthly_stats(year, month, filter.employee_id)
        .await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// Today's attendance status of an employee
#[utoipa::path(
    get,
    path = "/api/attendance/status/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Derived state for the current UTC day", body = AttendanceStatus),
        (status = 404, description = "Employee not found")
    ),
    tag = "Attendance"
)]
pub async fn status(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let status = state.attendance.status(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(status))
}
