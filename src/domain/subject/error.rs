// src/domain/subject/error.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubjectError {
    #[error("subject with the same name already exists")]
    AlreadyExists,

    #[error("subject not found")]
    NotFound,

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}
