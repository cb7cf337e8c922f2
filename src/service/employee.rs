use std::sync::Arc;

use tracing::{debug, info, warn};

use super::clock::Clock;
use crate::error::{AppError, AppResult};
use crate::model::employee::{Employee, EmployeePatch, NewEmployee};
use crate::repository::EmployeeRepository;
use crate::utils::validation::{require_email, require_len};

/// Employee directory: registration, lookup and partial updates.
#[derive(Clone)]
pub struct EmployeeService {
    repo: Arc<dyn EmployeeRepository>,
    clock: Arc<dyn Clock>,
}

impl EmployeeService {
    pub fn new(repo: Arc<dyn EmployeeRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    pub async fn create(&self, mut employee: NewEmployee) -> AppResult<Employee> {
        employee.employee_code = employee.employee_code.trim().to_string();
        employee.name = employee.name.trim().to_string();
        employee.email = employee.email.trim().to_string();

        require_len("employee_code", &employee.employee_code, 1, 50)?;
        require_len("name", &employee.name, 1, 100)?;
        require_email(&employee.email)?;

        if self
            .repo
            .find_employee_by_code(&employee.employee_code)
            .await?
            .is_some()
        {
            warn!(employee_code = %employee.employee_code, "Employee code already registered");
            return Err(AppError::conflict("Employee code already registered"));
        }

        if self
            .repo
            .find_employee_by_email(&employee.email)
            .await?
            .is_some()
        {
            warn!(email = %employee.email, "Email already registered");
            return Err(AppError::conflict("Email already registered"));
        }

        let created = self.repo.insert_employee(employee, self.clock.now()).await?;
        info!(employee_id = created.id, employee_code = %created.employee_code, "Employee created");
        Ok(created)
    }

    pub async fn get(&self, id: u64) -> AppResult<Employee> {
        self.repo
            .find_employee(id)
            .await?
            .ok_or_else(|| AppError::not_found("Employee not found"))
    }

    pub async fn list(&self, skip: u64, limit: u64) -> AppResult<Vec<Employee>> {
        self.repo.list_employees(skip, limit).await
    }

    /// Applies only the supplied fields; `updated_at` is refreshed even for an empty patch.
    pub async fn update(&self, id: u64, mut patch: EmployeePatch) -> AppResult<Employee> {
        if patch.is_empty() {
            debug!(employee_id = id, "Empty patch, only updated_at changes");
        }

        if let Some(name) = patch.name.as_mut() {
            *name = name.trim().to_string();
            require_len("name", name, 1, 100)?;
        }

        if let Some(email) = patch.email.as_mut() {
            *email = email.trim().to_string();
            require_email(email)?;

            let holder = self.repo.find_employee_by_email(email).await?;
            if holder.is_some_and(|other| other.id != id) {
                return Err(AppError::conflict("Email already registered"));
            }
        }

        let deactivated = patch.is_active == Some(false);
        let updated = self
            .repo
            .update_employee(id, patch, self.clock.now())
            .await?
            .ok_or_else(|| AppError::not_found("Employee not found"))?;

        if deactivated {
            info!(employee_id = id, "Employee deactivated");
        } else {
            info!(employee_id = id, "Employee updated");
        }
        Ok(updated)
    }
}
