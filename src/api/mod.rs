pub mod attendance;
pub mod employee;
pub mod health;
pub mod schedule;

#[cfg(test)]
mod tests;

use serde::Deserialize;
use utoipa::IntoParams;

const DEFAULT_LIMIT: u64 = 100;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    /// Number of rows to skip
    #[param(example = 0)]
    pub skip: Option<u64>,
    /// Maximum number of rows to return (default 100)
    #[param(example = 100)]
    pub limit: Option<u64>,
}

impl Pagination {
    /// `(skip, limit)` with the limit capped at `max_page_size`.
    pub fn bounds(&self, max_page_size: u64) -> (u64, u64) {
        (
            self.skip.unwrap_or(0),
            self.limit.unwrap_or(DEFAULT_LIMIT).min(max_page_size),
        )
    }
}
