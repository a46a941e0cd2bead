// src/domain/module/error.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("module not found")]
    ModuleNotFound,

    #[error("question not found")]
    QuestionNotFound,

    #[error("choice not found")]
    ChoiceNotFound,

    #[error("a question must have at least two choices")]
    MinTwoChoices,

    #[error("a question must not have more than four choices")]
    MaxFourChoices,

    #[error("a question must not have more than one correct answer")]
    MultipleCorrectAnswers,

    #[error("a question must have at least one correct answer")]
    NoCorrectAnswer,

    // Foreign contexts, as seen from a module.
    #[error("subject not found")]
    SubjectNotFound,

    #[error("grade not found")]
    GradeNotFound,

    /// A foreign context failed in a way this context has no name for.
    #[error("{0}")]
    Upstream(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}
