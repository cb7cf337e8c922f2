use crate::{
    model::schedule::{NewWorkSchedule, WorkSchedule, WorkSchedulePatch},
    service::AppState,
};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use utoipa::IntoParams;

fn default_active_only() -> bool {
    true
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ScheduleFilter {
    /// Only return the active schedule (default true)
    #[serde(rename = "activeOnly", alias = "active_only", default = "default_active_only")]
    pub active_only: bool,
}

/// Create work schedule
///
/// New schedules are inactive until activated.
#[utoipa::path(
    post,
    path = "/api/schedules",
    request_body = NewWorkSchedule,
    responses(
        (status = 201, description = "Schedule created", body = WorkSchedule),
        (status = 422, description = "Invalid payload")
    ),
    tag = "Schedule"
)]
pub async fn create_schedule(
    state: web::Data<AppState>,
    payload: web::Json<NewWorkSchedule>,
) -> actix_web::Result<impl Responder> {
    let schedule = state.schedules.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(schedule))
}

/// List work schedules, newest first
#[utoipa::path(
    get,
    path = "/api/schedules",
    params(ScheduleFilter),
    responses(
        (status = 200, description = "Schedules", body = [WorkSchedule])
    ),
    tag = "Schedule"
)]
pub async fn list_schedules(
    state: web::Data<AppState>,
    filter: web::Query<ScheduleFilter>,
) -> actix_web::Result<impl Responder> {
    let schedules = state.schedules.list(filter.active_only).await?;
    Ok(HttpResponse::Ok().json(schedules))
}

/// The schedule currently in effect
#[utoipa::path(
    get,
    path = "/api/schedules/active",
    responses(
        (status = 200, description = "Active schedule", body = WorkSchedule),
        (status = 404, description = "No active work schedule found")
    ),
    tag = "Schedule"
)]
pub async fn active_schedule(state: web::Data<AppState>) -> actix_web::Result<impl Responder> {
    let schedule = state.schedules.active().await?;
    Ok(HttpResponse::Ok().json(schedule))
}

/// Get work schedule by ID
#[utoipa::path(
    get,
    path = "/api/schedules/{schedule_id}",
    params(
        ("schedule_id", Path, description = "Schedule ID")
    ),
    responses(
        (status = 200, description = "Schedule found", body = WorkSchedule),
        (status = 404, description = "Work schedule not found")
    ),
    tag = "Schedule"
)]
pub async fn get_schedule(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let schedule = state.schedules.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(schedule))
}

/// Update work schedule
///
/// `is_active: true` activates this schedule and deactivates all others.
#[utoipa::path(
    put,
    path = "/api/schedules/{schedule_id}",
    params(
        ("schedule_id", Path, description = "Schedule ID")
    ),
    request_body = WorkSchedulePatch,
    responses(
        (status = 200, description = "Schedule updated", body = WorkSchedule),
        (status = 404, description = "Work schedule not found")
    ),
    tag = "Schedule"
)]
pub async fn update_schedule(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    body: web::Json<WorkSchedulePatch>,
) -> actix_web::Result<impl Responder> {
    let schedule = state
        .schedules
        .update(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(schedule))
}

/// Activate work schedule
#[utoipa::path(
    post,
    path = "/api/schedules/{schedule_id}/activate",
    params(
        ("schedule_id", Path, description = "Schedule ID")
    ),
    responses(
        (status = 200, description = "Schedule is now the only active one", body = WorkSchedule),
        (status = 404, description = "Work schedule not found")
    ),
    tag = "Schedule"
)]
pub async fn activate_schedule(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let schedule = state.schedules.activate(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(schedule))
}

/// Delete work schedule
#[utoipa::path(
    delete,
    path = "/api/schedules/{schedule_id}",
    params(
        ("schedule_id", Path, description = "Schedule ID")
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Work schedule not found")
    ),
    tag = "Schedule"
)]
pub async fn delete_schedule(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    state.schedules.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
