use crate::{
    api::Pagination,
    model::employee::{Employee, EmployeePatch, NewEmployee, Role},
    service::AppState,
};
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "EMP001")]
    pub employee_code: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane.doe@company.com", format = "email")]
    pub email: String,
    /// Defaults to `employee`
    pub role: Option<Role>,
}

impl From<CreateEmployee> for NewEmployee {
    fn from(payload: CreateEmployee) -> Self {
        NewEmployee {
            employee_code: payload.employee_code,
            name: payload.name,
            email: payload.email,
            role: payload.role.unwrap_or_default(),
        }
    }
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Employee code or email already registered", body = Object, example = json!({
            "error": "conflict",
            "message": "Email already registered"
        })),
        (status = 422, description = "Invalid payload")
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    state: web::Data<AppState>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<impl Responder> {
    let employee = state.employees.create(payload.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(employee))
}

/// List Employees
#[utoipa::path(
    get,
    path = "/api/employees",
    params(Pagination),
    responses(
        (status = 200, description = "Employees ordered by id", body = [Employee])
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    state: web::Data<AppState>,
    query: web::Query<Pagination>,
) -> actix_web::Result<impl Responder> {
    let (skip, limit) = query.bounds(state.max_page_size);
    debug!(skip, limit, "Listing employees");

    let employees = state.employees.list(skip, limit).await?;
    Ok(HttpResponse::Ok().json(employees))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "error": "not_found",
            "message": "Employee not found"
        }))
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee = state.employees.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Update Employee
///
/// Only the fields present in the body are changed. Setting `is_active` to
/// false deactivates the employee; their records stay queryable.
#[utoipa::path(
    put,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    request_body = EmployeePatch,
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 400, description = "Email already registered"),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "error": "not_found",
            "message": "Employee not found"
        }))
    ),
    tag = "Employee"
)]
pub async fn update_employee(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    body: web::Json<EmployeePatch>,
) -> actix_web::Result<impl Responder> {
    let employee = state
        .employees
        .update(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(employee))
}
