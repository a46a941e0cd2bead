// src/infrastructure/submission/writer.rs

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};

use crate::{
    domain::{
        lifecycle::{Change, Tracked},
        submission::{
            SubmissionError,
            entity::{Submission, SubmissionAnswer},
            repository::SubmissionWriter,
        },
    },
    infrastructure::violates_constraint,
};

const ANSWER_CONSTRAINT: &str = "submission_answers_submission_question_key";

fn map_write_error(err: sqlx::Error) -> SubmissionError {
    if violates_constraint(&err, ANSWER_CONSTRAINT) {
        // Two concurrent answers to the same question: the slower one loses.
        SubmissionError::DuplicateAnswer
    } else {
        tracing::error!("Failed to save submission: {:?}", err);
        SubmissionError::Storage(err)
    }
}

/// Submission writer bound to an open transaction.
pub struct PgSubmissionWriter<'t> {
    tx: &'t mut Transaction<'static, Postgres>,
}

impl<'t> PgSubmissionWriter<'t> {
    pub fn new(tx: &'t mut Transaction<'static, Postgres>) -> Self {
        Self { tx }
    }

    async fn insert(&mut self, submission: &Submission) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO submissions
                (id, module_id, code, student_name, status, total_questions, submitted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(submission.id)
        .bind(submission.module_id)
        .bind(&submission.code)
        .bind(&submission.student_name)
        .bind(submission.status.as_str())
        .bind(submission.total_questions)
        .bind(submission.submitted_at)
        .execute(&mut **self.tx)
        .await?;
        Ok(())
    }

    /// Only an in-progress row is updated. Returns false when another request
    /// already moved it to a terminal status.
    async fn update(&mut self, submission: &Submission) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE submissions
            SET status = $2, submitted_at = $3, updated_at = NOW()
            WHERE id = $1 AND status = 'inprogress' AND deleted_at IS NULL
            "#,
        )
        .bind(submission.id)
        .bind(submission.status.as_str())
        .bind(submission.submitted_at)
        .execute(&mut **self.tx)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn remove(&mut self, submission: &Submission) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE submission_answers SET deleted_at = NOW(), updated_at = NOW() WHERE submission_id = $1 AND deleted_at IS NULL",
        )
        .bind(submission.id)
        .execute(&mut **self.tx)
        .await?;

        sqlx::query(
            "UPDATE submissions SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(submission.id)
        .execute(&mut **self.tx)
        .await?;
        Ok(())
    }

    async fn save_answer(&mut self, answer: &Tracked<SubmissionAnswer>) -> Result<(), sqlx::Error> {
        match answer.change() {
            None => {}
            Some(Change::Created) => {
                sqlx::query(
                    r#"
                    INSERT INTO submission_answers
                        (id, submission_id, question_slug, question, answer, is_correct)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(answer.id)
                .bind(answer.submission_id)
                .bind(&answer.question_slug)
                .bind(&answer.question)
                .bind(&answer.answer)
                .bind(answer.is_correct)
                .execute(&mut **self.tx)
                .await?;
            }
            Some(Change::Updated) => {
                sqlx::query(
                    "UPDATE submission_answers SET is_correct = $2, updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
                )
                .bind(answer.id)
                .bind(answer.is_correct)
                .execute(&mut **self.tx)
                .await?;
            }
            Some(Change::Removed) => {
                sqlx::query(
                    "UPDATE submission_answers SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
                )
                .bind(answer.id)
                .execute(&mut **self.tx)
                .await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SubmissionWriter for PgSubmissionWriter<'_> {
    async fn save(&mut self, submission: &Tracked<Submission>) -> Result<(), SubmissionError> {
        match submission.change() {
            Some(Change::Removed) => {
                self.remove(submission).await.map_err(map_write_error)?;
            }
            Some(Change::Updated) => {
                if !self.update(submission).await.map_err(map_write_error)? {
                    return Err(SubmissionError::SubmissionAlreadyDone);
                }
                for answer in &submission.answers {
                    self.save_answer(answer).await.map_err(map_write_error)?;
                }
            }
            None | Some(Change::Created) => {
                self.insert(submission).await.map_err(map_write_error)?;
                for answer in submission.answers.iter().filter(|a| a.is_created()) {
                    self.save_answer(answer).await.map_err(map_write_error)?;
                }
            }
        }

        Ok(())
    }
}
