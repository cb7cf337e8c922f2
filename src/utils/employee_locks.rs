use futures::lock::Mutex;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Entries leave the cache only by idling; there is no size bound, so a
/// mutex still in use is never replaced by a fresh one.
const LOCK_IDLE: Duration = Duration::from_secs(600);

/// One async mutex per employee, serializing the read-validate-append
/// sequence of check-in/check-out.
#[derive(Clone)]
pub struct EmployeeLocks {
    locks: Cache<u64, Arc<Mutex<()>>>,
}

impl EmployeeLocks {
    pub fn new() -> Self {
        Self {
            locks: Cache::builder().time_to_idle(LOCK_IDLE).build(),
        }
    }

    /// Shared mutex for `employee_id`; callers hold `.lock().await` for the
    /// whole critical section.
    pub async fn handle(&self, employee_id: u64) -> Arc<Mutex<()>> {
        self.locks
            .get_with(employee_id, async { Arc::new(Mutex::new(())) })
            .await
    }
}

impl Default for EmployeeLocks {
    fn default() -> Self {
        Self::new()
    }
}
