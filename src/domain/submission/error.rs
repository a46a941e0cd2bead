// src/domain/submission/error.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("submission not found")]
    SubmissionNotFound,

    #[error("invalid submission status: {0}")]
    InvalidStatus(String),

    #[error("cannot submit submission in current state")]
    CannotSubmit,

    #[error("cannot cancel submission in current state")]
    CannotCancel,

    #[error("submission already submitted or canceled")]
    SubmissionAlreadyDone,

    #[error("answer for this question already submitted")]
    DuplicateAnswer,

    // Foreign contexts, as seen from a submission.
    #[error("module not found")]
    ModuleNotFound,

    #[error("question not found")]
    QuestionNotFound,

    #[error("choice not found")]
    ChoiceNotFound,

    /// A foreign context failed in a way this context has no name for.
    #[error("{0}")]
    Upstream(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}
