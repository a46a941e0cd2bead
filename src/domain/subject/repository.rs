// src/domain/subject/repository.rs

use async_trait::async_trait;
use uuid::Uuid;

use super::{entity::Subject, error::SubjectError};
use crate::domain::lifecycle::Tracked;

#[async_trait]
pub trait SubjectReader: Send + Sync {
    /// Whether another live subject of `user_id` already uses `name`,
    /// ignoring `exclude_id`.
    async fn has_similar_subject(
        &self,
        name: &str,
        user_id: Uuid,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, SubjectError>;

    async fn is_subject_exist(&self, subject_id: Uuid, user_id: Uuid) -> Result<bool, SubjectError>;

    async fn find_by_id(&self, subject_id: Uuid, user_id: Uuid) -> Result<Tracked<Subject>, SubjectError>;

    async fn find_by_ids(&self, subject_ids: &[Uuid], user_id: Uuid) -> Result<Vec<Subject>, SubjectError>;

    async fn count_by_user(&self, user_id: Uuid) -> Result<i64, SubjectError>;

    async fn all_subjects(&self, user_id: Uuid, keyword: Option<&str>) -> Result<Vec<Subject>, SubjectError>;
}

#[async_trait]
pub trait SubjectWriter: Send + Sync {
    async fn save(&self, subject: &Tracked<Subject>) -> Result<(), SubjectError>;
}
