// src/domain/module/repository.rs

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use super::{
    entity::{Module, Question},
    error::ModuleError,
};
use crate::domain::lifecycle::Tracked;

/// Owner-scoped listing filter. `None` means "no constraint".
#[derive(Debug, Clone, Default)]
pub struct ModuleFilter {
    pub user_id: Uuid,
    pub subject_id: Option<Uuid>,
    pub grade_id: Option<Uuid>,
    pub keyword: Option<String>,
}

/// A module row as listed on the dashboard, without its question tree.
#[derive(Debug, Clone)]
pub struct ModuleListing {
    pub module: Module,
    pub questions_count: i64,
}

#[async_trait]
pub trait ModuleReader: Send + Sync {
    /// Module row only, owner-scoped.
    async fn find_by_slug(&self, slug: &str, user_id: Uuid)
    -> Result<Tracked<Module>, ModuleError>;

    /// Module with live questions (in position order) and their live choices.
    async fn find_detail_by_slug(
        &self,
        slug: &str,
        user_id: Uuid,
    ) -> Result<Tracked<Module>, ModuleError>;

    async fn find_published_by_slug(&self, slug: &str) -> Result<Module, ModuleError>;

    async fn find_published_question(
        &self,
        module_slug: &str,
        question_slug: &str,
    ) -> Result<Question, ModuleError>;

    /// The live question with the smallest position after `current_question_slug`.
    async fn find_next_published_question(
        &self,
        module_slug: &str,
        current_question_slug: &str,
    ) -> Result<Option<Question>, ModuleError>;

    async fn find_first_published_question(
        &self,
        module_slug: &str,
    ) -> Result<Option<Question>, ModuleError>;

    async fn count_questions_by_module_slug(&self, module_slug: &str) -> Result<i64, ModuleError>;

    async fn count_by_user(&self, user_id: Uuid) -> Result<i64, ModuleError>;

    async fn total_modules(&self, filter: &ModuleFilter) -> Result<i64, ModuleError>;

    async fn find_all_modules(
        &self,
        filter: &ModuleFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ModuleListing>, ModuleError>;
}

/// Persists a module aggregate according to the intents it carries.
#[async_trait]
pub trait ModuleWriter: Send {
    async fn save(&mut self, module: &Tracked<Module>) -> Result<(), ModuleError>;
}

#[async_trait]
pub trait ModuleUnitOfWork: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn ModuleUnitOfWorkProcessor>, ModuleError>;
}

/// An open transaction. Dropping it without `commit` rolls back.
#[async_trait]
pub trait ModuleUnitOfWorkProcessor: Send {
    fn module_writer(&mut self) -> Box<dyn ModuleWriter + '_>;

    async fn commit(self: Box<Self>) -> Result<(), ModuleError>;

    async fn rollback(self: Box<Self>) -> Result<(), ModuleError>;
}

#[async_trait]
pub trait SubjectAcl: Send + Sync {
    async fn is_subject_exist(&self, subject_id: Uuid, user_id: Uuid) -> Result<bool, ModuleError>;

    async fn get_subject_name(&self, subject_id: Uuid, user_id: Uuid)
    -> Result<String, ModuleError>;

    async fn get_subject_names(
        &self,
        subject_ids: &[Uuid],
        user_id: Uuid,
    ) -> Result<HashMap<Uuid, String>, ModuleError>;
}

#[async_trait]
pub trait GradeAcl: Send + Sync {
    async fn is_grade_exist(&self, grade_id: Uuid, user_id: Uuid) -> Result<bool, ModuleError>;

    async fn get_grade_name(&self, grade_id: Uuid, user_id: Uuid) -> Result<String, ModuleError>;

    async fn get_grade_names(
        &self,
        grade_ids: &[Uuid],
        user_id: Uuid,
    ) -> Result<HashMap<Uuid, String>, ModuleError>;
}
