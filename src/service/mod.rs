pub mod attendance;
pub mod clock;
pub mod employee;
pub mod schedule;

use std::sync::Arc;

use crate::repository::{EmployeeRepository, RecordRepository, ScheduleRepository};
use attendance::AttendanceService;
use clock::Clock;
use employee::EmployeeService;
use schedule::ScheduleService;

/// Shared by every worker through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub employees: EmployeeService,
    pub attendance: AttendanceService,
    pub schedules: ScheduleService,
    pub max_page_size: u64,
}

impl AppState {
    pub fn new<R>(repo: Arc<R>, clock: Arc<dyn Clock>, max_page_size: u64) -> Self
    where
        R: EmployeeRepository + RecordRepository + ScheduleRepository + 'static,
    {
        Self {
            employees: EmployeeService::new(repo.clone(), clock.clone()),
            attendance: AttendanceService::new(repo.clone(), repo.clone(), clock.clone()),
            schedules: ScheduleService::new(repo, clock),
            max_page_size,
        }
    }
}
