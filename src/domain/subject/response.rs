// src/domain/subject/response.rs

use serde::Serialize;
use uuid::Uuid;

use super::entity::Subject;

#[derive(Debug, Serialize)]
pub struct SubjectResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl From<&Subject> for SubjectResponse {
    fn from(subject: &Subject) -> Self {
        Self {
            id: subject.id,
            name: subject.name.clone(),
            description: subject.description.clone(),
        }
    }
}
