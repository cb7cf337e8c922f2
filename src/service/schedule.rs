use std::sync::Arc;

use tracing::info;

use super::clock::Clock;
use crate::error::{AppError, AppResult};
use crate::model::schedule::{NewWorkSchedule, WorkSchedule, WorkSchedulePatch};
use crate::repository::ScheduleRepository;
use crate::utils::validation::require_len;

/// Work schedules. At most one is active at any time; activation always
/// goes through [`ScheduleRepository::activate_schedule`].
#[derive(Clone)]
pub struct ScheduleService {
    repo: Arc<dyn ScheduleRepository>,
    clock: Arc<dyn Clock>,
}

fn not_found() -> AppError {
    AppError::not_found("Work schedule not found")
}

impl ScheduleService {
    pub fn new(repo: Arc<dyn ScheduleRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    pub async fn create(&self, mut schedule: NewWorkSchedule) -> AppResult<WorkSchedule> {
        schedule.name = schedule.name.trim().to_string();
        require_len("name", &schedule.name, 1, 100)?;

        let created = self.repo.insert_schedule(schedule, self.clock.now()).await?;
        info!(schedule_id = created.id, name = %created.name, "Work schedule created");
        Ok(created)
    }

    pub async fn get(&self, id: u64) -> AppResult<WorkSchedule> {
        self.repo.find_schedule(id).await?.ok_or_else(not_found)
    }

    pub async fn list(&self, active_only: bool) -> AppResult<Vec<WorkSchedule>> {
        self.repo.list_schedules(active_only).await
    }

    pub async fn active(&self) -> AppResult<WorkSchedule> {
        self.repo
            .active_schedule()
            .await?
            .ok_or_else(|| AppError::not_found("No active work schedule found"))
    }

    /// Partial update. `is_active: true` activates the schedule (and
    /// deactivates every other one); `false` only deactivates this one.
    pub async fn update(&self, id: u64, mut patch: WorkSchedulePatch) -> AppResult<WorkSchedule> {
        if let Some(name) = patch.name.as_mut() {
            *name = name.trim().to_string();
            require_len("name", name, 1, 100)?;
        }

        let is_active = patch.is_active.take();
        let now = self.clock.now();
        let updated = self
            .repo
            .update_schedule(id, patch, now)
            .await?
            .ok_or_else(not_found)?;

        match is_active {
            Some(true) => self.activate(id).await,
            Some(false) => self.repo.deactivate_schedule(id, now).await?.ok_or_else(not_found),
            None => Ok(updated),
        }
    }

    pub async fn activate(&self, id: u64) -> AppResult<WorkSchedule> {
        let activated = self
            .repo
            .activate_schedule(id, self.clock.now())
            .await?
            .ok_or_else(not_found)?;
        info!(schedule_id = id, name = %activated.name, "Work schedule activated");
        Ok(activated)
    }

    pub async fn delete(&self, id: u64) -> AppResult<()> {
        if !self.repo.delete_schedule(id).await? {
            return Err(not_found());
        }
        info!(schedule_id = id, "Work schedule deleted");
        Ok(())
    }
}
