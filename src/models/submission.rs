// src/models/submission.rs

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents the 'submissions' table in the database.
#[derive(Debug, Clone, FromRow)]
pub struct SubmissionRow {
    pub id: Uuid,
    pub module_id: Uuid,
    pub code: String,
    pub student_name: String,
    /// One of 'inprogress', 'submitted', 'canceled'.
    pub status: String,
    pub total_questions: i64,
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Represents the 'submission_answers' table in the database.
#[derive(Debug, Clone, FromRow)]
pub struct SubmissionAnswerRow {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub question_slug: String,
    pub question: String,
    pub answer: String,
    pub is_correct: bool,
}

/// DTO for starting an attempt.
#[derive(Debug, Deserialize, Validate)]
pub struct StartSubmissionRequest {
    #[validate(length(min = 3, max = 100, message = "Student name length must be between 3 and 100 characters."))]
    pub student_name: String,
}

/// DTO for answering one question.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    #[validate(length(min = 1, max = 12))]
    pub question_slug: String,
    pub choice_id: Uuid,
}

/// Optional `?keyword=` filter.
#[derive(Debug, Default, Deserialize)]
pub struct KeywordQuery {
    pub keyword: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_name_length() {
        let short = StartSubmissionRequest {
            student_name: "Al".to_string(),
        };
        let ok = StartSubmissionRequest {
            student_name: "Alice".to_string(),
        };
        assert!(short.validate().is_err());
        assert!(ok.validate().is_ok());
    }
}
