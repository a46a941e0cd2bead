// src/models/grade.rs

use serde::Deserialize;
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents the 'grades' table in the database.
#[derive(Debug, Clone, FromRow)]
pub struct GradeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

/// DTO for creating or updating a grade.
#[derive(Debug, Deserialize, Validate)]
pub struct GradeRequest {
    #[validate(length(min = 1, max = 100, message = "Name length must be between 1 and 100 characters."))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}
