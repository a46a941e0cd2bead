// src/domain/grade/repository.rs

use async_trait::async_trait;
use uuid::Uuid;

use super::{entity::Grade, error::GradeError};
use crate::domain::lifecycle::Tracked;

#[async_trait]
pub trait GradeReader: Send + Sync {
    /// Whether another live grade of `user_id` already uses `name`,
    /// ignoring `exclude_id`.
    async fn has_similar_grade(
        &self,
        name: &str,
        user_id: Uuid,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, GradeError>;

    async fn is_grade_exist(&self, grade_id: Uuid, user_id: Uuid) -> Result<bool, GradeError>;

    async fn find_by_id(&self, grade_id: Uuid, user_id: Uuid) -> Result<Tracked<Grade>, GradeError>;

    async fn find_by_ids(&self, grade_ids: &[Uuid], user_id: Uuid) -> Result<Vec<Grade>, GradeError>;

    async fn count_by_user(&self, user_id: Uuid) -> Result<i64, GradeError>;

    async fn all_grades(&self, user_id: Uuid, keyword: Option<&str>) -> Result<Vec<Grade>, GradeError>;
}

#[async_trait]
pub trait GradeWriter: Send + Sync {
    async fn save(&self, grade: &Tracked<Grade>) -> Result<(), GradeError>;
}
