// src/domain/grade/error.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GradeError {
    #[error("grade with the same name already exists")]
    AlreadyExists,

    #[error("grade not found")]
    NotFound,

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}
