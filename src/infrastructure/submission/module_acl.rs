// src/infrastructure/submission/module_acl.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    domain::{
        module::{
            ModuleError,
            service::{
                CountModuleQuestions, FindPublishedQuestion, GetCorrectAnswer,
                ValidatePublishedModule,
            },
        },
        submission::{
            SubmissionError,
            entity::{Choice, Grade, Module, Question, Subject},
            repository::ModuleAcl,
        },
    },
    infrastructure::{contains_pattern, module::PgModuleReader},
    models::module::PublishedModuleRow,
};

fn from_module_error(err: ModuleError) -> SubmissionError {
    match err {
        ModuleError::ModuleNotFound => SubmissionError::ModuleNotFound,
        ModuleError::QuestionNotFound => SubmissionError::QuestionNotFound,
        ModuleError::ChoiceNotFound => SubmissionError::ChoiceNotFound,
        ModuleError::Storage(e) => SubmissionError::Storage(e),
        other => SubmissionError::Upstream(other.to_string()),
    }
}

/// The module context seen from a submission. Lookups go through the module
/// services; the published listing is read directly.
#[derive(Clone)]
pub struct ModuleAclAdapter {
    pool: PgPool,
    module_reader: PgModuleReader,
}

impl ModuleAclAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            module_reader: PgModuleReader::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl ModuleAcl for ModuleAclAdapter {
    async fn get_published_module(&self, module_slug: &str) -> Result<Module, SubmissionError> {
        let module = ValidatePublishedModule::new(&self.module_reader)
            .execute(module_slug)
            .await
            .map_err(from_module_error)?;

        Ok(Module {
            id: module.id,
            slug: module.slug,
            title: module.title,
            grade: None,
            subject: None,
        })
    }

    async fn get_question_by_slug(
        &self,
        module_slug: &str,
        question_slug: &str,
    ) -> Result<Question, SubmissionError> {
        let detail = FindPublishedQuestion::new(&self.module_reader)
            .execute(module_slug, question_slug)
            .await
            .map_err(from_module_error)?;

        Ok(Question {
            id: detail.id,
            content: detail.content,
            slug: detail.slug,
            choices: detail
                .choices
                .into_iter()
                .map(|c| Choice {
                    id: c.id,
                    content: c.content,
                    is_correct_answer: false,
                })
                .collect(),
        })
    }

    async fn get_correct_answer(
        &self,
        module_slug: &str,
        question_slug: &str,
    ) -> Result<Choice, SubmissionError> {
        let correct = GetCorrectAnswer::new(&self.module_reader)
            .execute(module_slug, question_slug)
            .await
            .map_err(from_module_error)?;

        Ok(Choice {
            id: correct.id,
            content: correct.content,
            is_correct_answer: correct.is_correct_answer,
        })
    }

    async fn get_total_questions(&self, module_slug: &str) -> Result<i64, SubmissionError> {
        CountModuleQuestions::new(&self.module_reader)
            .execute(module_slug)
            .await
            .map_err(from_module_error)
    }

    async fn get_next_question_slug(
        &self,
        module_slug: &str,
        current_question_slug: &str,
    ) -> Result<Option<String>, SubmissionError> {
        let detail = FindPublishedQuestion::new(&self.module_reader)
            .execute(module_slug, current_question_slug)
            .await
            .map_err(from_module_error)?;

        Ok(detail.next_question_slug)
    }

    async fn get_all_published_modules(
        &self,
        keyword: Option<&str>,
    ) -> Result<Vec<Module>, SubmissionError> {
        let rows = sqlx::query_as::<_, PublishedModuleRow>(
            r#"
            SELECT m.id, m.slug, m.title,
                   m.grade_id, g.name AS grade_name,
                   m.subject_id, s.name AS subject_name
            FROM modules m
            LEFT JOIN grades g ON g.id = m.grade_id
            LEFT JOIN subjects s ON s.id = m.subject_id
            WHERE m.is_published AND m.deleted_at IS NULL
              AND ($1::TEXT IS NULL OR m.title ILIKE $1)
            ORDER BY m.created_at DESC
            "#,
        )
        .bind(keyword.map(contains_pattern))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Module {
                id: row.id,
                slug: row.slug,
                title: row.title,
                grade: row.grade_name.map(|name| Grade {
                    id: row.grade_id,
                    name,
                }),
                subject: row.subject_name.map(|name| Subject {
                    id: row.subject_id,
                    name,
                }),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_errors_keep_their_meaning() {
        assert!(matches!(
            from_module_error(ModuleError::ModuleNotFound),
            SubmissionError::ModuleNotFound
        ));
        assert!(matches!(
            from_module_error(ModuleError::QuestionNotFound),
            SubmissionError::QuestionNotFound
        ));
        assert!(matches!(
            from_module_error(ModuleError::ChoiceNotFound),
            SubmissionError::ChoiceNotFound
        ));
        assert!(matches!(
            from_module_error(ModuleError::MinTwoChoices),
            SubmissionError::Upstream(_)
        ));
    }
}
