// src/infrastructure/submission/reader.rs

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    domain::{
        lifecycle::Tracked,
        submission::{
            SubmissionError,
            entity::{Submission, SubmissionAnswer},
            repository::SubmissionReader,
        },
    },
    models::submission::{SubmissionAnswerRow, SubmissionRow},
};

const SUBMISSION_COLUMNS: &str =
    "id, module_id, code, student_name, status, total_questions, submitted_at";

impl From<SubmissionAnswerRow> for SubmissionAnswer {
    fn from(row: SubmissionAnswerRow) -> Self {
        SubmissionAnswer {
            id: row.id,
            submission_id: row.submission_id,
            question_slug: row.question_slug,
            question: row.question,
            answer: row.answer,
            is_correct: row.is_correct,
        }
    }
}

impl TryFrom<SubmissionRow> for Submission {
    type Error = SubmissionError;

    fn try_from(row: SubmissionRow) -> Result<Self, Self::Error> {
        Ok(Submission {
            id: row.id,
            module_id: row.module_id,
            code: row.code,
            student_name: row.student_name,
            status: row.status.parse()?,
            total_questions: row.total_questions,
            submitted_at: row.submitted_at,
            answers: Vec::new(),
        })
    }
}

#[derive(Clone)]
pub struct PgSubmissionReader {
    pool: PgPool,
}

impl PgSubmissionReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn answers_for(
        &self,
        submission_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Tracked<SubmissionAnswer>>>, sqlx::Error> {
        let rows = sqlx::query_as::<_, SubmissionAnswerRow>(
            r#"
            SELECT id, submission_id, question_slug, question, answer, is_correct
            FROM submission_answers
            WHERE submission_id = ANY($1) AND deleted_at IS NULL
            ORDER BY created_at, id
            "#,
        )
        .bind(submission_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<Tracked<SubmissionAnswer>>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.submission_id)
                .or_default()
                .push(Tracked::loaded(SubmissionAnswer::from(row)));
        }
        Ok(grouped)
    }
}

#[async_trait]
impl SubmissionReader for PgSubmissionReader {
    async fn find_by_code(&self, code: &str) -> Result<Tracked<Submission>, SubmissionError> {
        let row = sqlx::query_as::<_, SubmissionRow>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE code = $1 AND deleted_at IS NULL"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(SubmissionError::SubmissionNotFound)?;

        let mut submission = Submission::try_from(row)?;
        submission.answers = self
            .answers_for(&[submission.id])
            .await?
            .remove(&submission.id)
            .unwrap_or_default();

        Ok(Tracked::loaded(submission))
    }

    async fn count_submitted(&self) -> Result<i64, SubmissionError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM submissions WHERE status = 'submitted' AND deleted_at IS NULL",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn find_all_submitted_grouped_by_module(
        &self,
        module_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Submission>>, SubmissionError> {
        let rows = sqlx::query_as::<_, SubmissionRow>(&format!(
            r#"
            SELECT {SUBMISSION_COLUMNS}
            FROM submissions
            WHERE module_id = ANY($1) AND status = 'submitted' AND deleted_at IS NULL
            ORDER BY submitted_at DESC
            "#
        ))
        .bind(module_ids)
        .fetch_all(&self.pool)
        .await?;

        let submission_ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut answers = self.answers_for(&submission_ids).await?;

        let mut grouped: HashMap<Uuid, Vec<Submission>> = HashMap::new();
        for row in rows {
            let mut submission = Submission::try_from(row)?;
            submission.answers = answers.remove(&submission.id).unwrap_or_default();
            grouped
                .entry(submission.module_id)
                .or_default()
                .push(submission);
        }

        Ok(grouped)
    }
}
