// src/domain/submission/repository.rs

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use super::{
    entity::{Choice, Module, Question, Submission},
    error::SubmissionError,
};
use crate::domain::lifecycle::Tracked;

#[async_trait]
pub trait SubmissionReader: Send + Sync {
    /// Live submission with its answers.
    async fn find_by_code(&self, code: &str) -> Result<Tracked<Submission>, SubmissionError>;

    async fn count_submitted(&self) -> Result<i64, SubmissionError>;

    /// Submitted submissions (with answers) keyed by module id. Modules
    /// without any are absent from the map.
    async fn find_all_submitted_grouped_by_module(
        &self,
        module_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Submission>>, SubmissionError>;
}

#[async_trait]
pub trait SubmissionWriter: Send {
    async fn save(&mut self, submission: &Tracked<Submission>) -> Result<(), SubmissionError>;
}

#[async_trait]
pub trait SubmissionUnitOfWork: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn SubmissionUnitOfWorkProcessor>, SubmissionError>;
}

/// An open transaction. Dropping it without `commit` rolls back.
#[async_trait]
pub trait SubmissionUnitOfWorkProcessor: Send {
    fn submission_writer(&mut self) -> Box<dyn SubmissionWriter + '_>;

    async fn commit(self: Box<Self>) -> Result<(), SubmissionError>;

    async fn rollback(self: Box<Self>) -> Result<(), SubmissionError>;
}

/// The module context, as a submission needs to see it.
#[async_trait]
pub trait ModuleAcl: Send + Sync {
    async fn get_published_module(&self, module_slug: &str) -> Result<Module, SubmissionError>;

    async fn get_question_by_slug(
        &self,
        module_slug: &str,
        question_slug: &str,
    ) -> Result<Question, SubmissionError>;

    async fn get_correct_answer(
        &self,
        module_slug: &str,
        question_slug: &str,
    ) -> Result<Choice, SubmissionError>;

    async fn get_total_questions(&self, module_slug: &str) -> Result<i64, SubmissionError>;

    async fn get_next_question_slug(
        &self,
        module_slug: &str,
        current_question_slug: &str,
    ) -> Result<Option<String>, SubmissionError>;

    async fn get_all_published_modules(
        &self,
        keyword: Option<&str>,
    ) -> Result<Vec<Module>, SubmissionError>;
}
