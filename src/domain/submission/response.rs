// src/domain/submission/response.rs

use serde::Serialize;
use uuid::Uuid;

use super::entity::SubmissionStatus;

#[derive(Debug, Serialize)]
pub struct StartSubmissionResponse {
    pub code: String,
    pub status: SubmissionStatus,
}

#[derive(Debug, Serialize)]
pub struct SubmitAnswerResponse {
    pub is_correct: bool,
    pub correct_choice_id: Uuid,
    pub correct_choice_content: String,
    /// `None` once the last question has been answered.
    pub next_question_slug: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FinalizeSubmissionResponse {
    pub student_name: String,
    pub score: i64,
    pub total: i64,
    pub status: SubmissionStatus,
}

#[derive(Debug, Serialize)]
pub struct CancelSubmissionResponse {
    pub code: String,
    pub status: SubmissionStatus,
}

#[derive(Debug, Serialize)]
pub struct NamedRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ModuleWithRelations {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub grade: Option<NamedRef>,
    pub subject: Option<NamedRef>,
}

#[derive(Debug, Serialize)]
pub struct SubmissionSummary {
    pub student_name: String,
    pub total_correct: i64,
    pub total_questions: i64,
    /// `%Y-%m-%d %H:%M:%S` in UTC, empty when missing.
    pub submitted_at: String,
}

#[derive(Debug, Serialize)]
pub struct ModuleSubmissionGroup {
    pub module: ModuleWithRelations,
    pub total_submissions: usize,
    pub submissions: Vec<SubmissionSummary>,
}
