// src/domain/dashboard/error.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// A foreign context failed for a reason other than storage.
    #[error("{0}")]
    Upstream(String),
}
