// src/infrastructure/module/writer.rs

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};

use super::cascade::{ModuleWrite, plan_save};
use crate::domain::{
    lifecycle::Tracked,
    module::{ModuleError, entity::Module, repository::ModuleWriter},
};

/// Module writer bound to an open transaction.
pub struct PgModuleWriter<'t> {
    tx: &'t mut Transaction<'static, Postgres>,
}

impl<'t> PgModuleWriter<'t> {
    pub fn new(tx: &'t mut Transaction<'static, Postgres>) -> Self {
        Self { tx }
    }

    async fn apply(&mut self, write: ModuleWrite<'_>) -> Result<(), sqlx::Error> {
        match write {
            ModuleWrite::InsertModule(m) => {
                sqlx::query(
                    r#"
                    INSERT INTO modules
                        (id, user_id, subject_id, grade_id, title, slug, description, type, is_published)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                    "#,
                )
                .bind(m.id)
                .bind(m.user_id)
                .bind(m.subject_id)
                .bind(m.grade_id)
                .bind(&m.title)
                .bind(&m.slug)
                .bind(&m.description)
                .bind(m.module_type.as_str())
                .bind(m.is_published)
                .execute(&mut **self.tx)
                .await?;
            }
            ModuleWrite::UpdateModule(m) => {
                sqlx::query(
                    r#"
                    UPDATE modules
                    SET subject_id = $2, grade_id = $3, title = $4, description = $5,
                        is_published = $6, updated_at = NOW()
                    WHERE id = $1 AND deleted_at IS NULL
                    "#,
                )
                .bind(m.id)
                .bind(m.subject_id)
                .bind(m.grade_id)
                .bind(&m.title)
                .bind(&m.description)
                .bind(m.is_published)
                .execute(&mut **self.tx)
                .await?;
            }
            ModuleWrite::RemoveModule(id) => {
                sqlx::query(
                    "UPDATE modules SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
                )
                .bind(id)
                .execute(&mut **self.tx)
                .await?;
            }
            ModuleWrite::RemoveModuleQuestions(module_id) => {
                sqlx::query(
                    r#"
                    UPDATE question_choices SET deleted_at = NOW(), updated_at = NOW()
                    WHERE deleted_at IS NULL
                      AND question_id IN (SELECT id FROM questions WHERE module_id = $1)
                    "#,
                )
                .bind(module_id)
                .execute(&mut **self.tx)
                .await?;

                sqlx::query(
                    "UPDATE questions SET deleted_at = NOW(), updated_at = NOW() WHERE module_id = $1 AND deleted_at IS NULL",
                )
                .bind(module_id)
                .execute(&mut **self.tx)
                .await?;
            }
            ModuleWrite::InsertQuestion(q) => {
                // Positions are never reused, so MAX covers soft-deleted rows too.
                sqlx::query(
                    r#"
                    INSERT INTO questions (id, module_id, content, slug, position)
                    SELECT $1, $2, $3, $4, COALESCE(MAX(position), 0) + 1
                    FROM questions
                    WHERE module_id = $2
                    "#,
                )
                .bind(q.id)
                .bind(q.module_id)
                .bind(&q.content)
                .bind(&q.slug)
                .execute(&mut **self.tx)
                .await?;
            }
            ModuleWrite::UpdateQuestion(q) => {
                sqlx::query(
                    "UPDATE questions SET content = $2, updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
                )
                .bind(q.id)
                .bind(&q.content)
                .execute(&mut **self.tx)
                .await?;
            }
            ModuleWrite::RemoveQuestion(id) => {
                sqlx::query(
                    "UPDATE questions SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
                )
                .bind(id)
                .execute(&mut **self.tx)
                .await?;
            }
            ModuleWrite::RemoveQuestionChoices(question_id) => {
                sqlx::query(
                    "UPDATE question_choices SET deleted_at = NOW(), updated_at = NOW() WHERE question_id = $1 AND deleted_at IS NULL",
                )
                .bind(question_id)
                .execute(&mut **self.tx)
                .await?;
            }
            ModuleWrite::InsertChoice(c) => {
                sqlx::query(
                    r#"
                    INSERT INTO question_choices (id, question_id, content, is_correct_answer)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(c.id)
                .bind(c.question_id)
                .bind(&c.content)
                .bind(c.is_correct_answer)
                .execute(&mut **self.tx)
                .await?;
            }
            ModuleWrite::UpdateChoice(c) => {
                sqlx::query(
                    r#"
                    UPDATE question_choices
                    SET content = $2, is_correct_answer = $3, updated_at = NOW()
                    WHERE id = $1 AND deleted_at IS NULL
                    "#,
                )
                .bind(c.id)
                .bind(&c.content)
                .bind(c.is_correct_answer)
                .execute(&mut **self.tx)
                .await?;
            }
            ModuleWrite::RemoveChoice(id) => {
                sqlx::query(
                    "UPDATE question_choices SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
                )
                .bind(id)
                .execute(&mut **self.tx)
                .await?;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl ModuleWriter for PgModuleWriter<'_> {
    /// Runs the planned writes in order and stops at the first failure.
    async fn save(&mut self, module: &Tracked<Module>) -> Result<(), ModuleError> {
        for write in plan_save(module) {
            tracing::debug!("{}", write);
            self.apply(write).await.map_err(|e| {
                tracing::error!("Failed to {}: {:?}", write, e);
                ModuleError::Storage(e)
            })?;
        }
        Ok(())
    }
}
