// src/domain/grade/response.rs

use serde::Serialize;
use uuid::Uuid;

use super::entity::Grade;

#[derive(Debug, Serialize)]
pub struct GradeResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl From<&Grade> for GradeResponse {
    fn from(grade: &Grade) -> Self {
        Self {
            id: grade.id,
            name: grade.name.clone(),
            description: grade.description.clone(),
        }
    }
}
