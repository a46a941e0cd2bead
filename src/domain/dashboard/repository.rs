// src/domain/dashboard/repository.rs

use async_trait::async_trait;
use uuid::Uuid;

use super::error::DashboardError;

#[async_trait]
pub trait ModuleAcl: Send + Sync {
    async fn count_modules(&self, user_id: Uuid) -> Result<i64, DashboardError>;
}

#[async_trait]
pub trait SubjectAcl: Send + Sync {
    async fn count_subjects(&self, user_id: Uuid) -> Result<i64, DashboardError>;
}

#[async_trait]
pub trait GradeAcl: Send + Sync {
    async fn count_grades(&self, user_id: Uuid) -> Result<i64, DashboardError>;
}

#[async_trait]
pub trait SubmissionAcl: Send + Sync {
    /// Submitted submissions across all modules.
    async fn count_submitted_submissions(&self) -> Result<i64, DashboardError>;
}
