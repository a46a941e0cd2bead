// src/domain/module/response.rs

use serde::Serialize;
use uuid::Uuid;

use super::entity::{Module, ModuleType};

#[derive(Debug, Serialize)]
pub struct NamedRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ModuleResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject_id: Uuid,
    pub grade_id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub module_type: ModuleType,
    pub is_published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_question_slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<NamedRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<NamedRef>,
}

impl From<&Module> for ModuleResponse {
    fn from(module: &Module) -> Self {
        Self {
            id: module.id,
            user_id: module.user_id,
            subject_id: module.subject_id,
            grade_id: module.grade_id,
            title: module.title.clone(),
            slug: module.slug.clone(),
            description: module.description.clone(),
            module_type: module.module_type,
            is_published: module.is_published,
            questions_count: None,
            first_question_slug: None,
            subject: None,
            grade: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedModule {
    pub id: Uuid,
    pub slug: String,
}

#[derive(Debug, Serialize)]
pub struct ChoiceWithAnswer {
    pub id: Uuid,
    pub content: String,
    pub is_correct_answer: bool,
}

/// Public view of a choice: correctness is never exposed to students.
#[derive(Debug, Serialize)]
pub struct PublicChoice {
    pub id: Uuid,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub id: Uuid,
    pub content: String,
    pub slug: String,
    pub choices: Vec<ChoiceWithAnswer>,
}

#[derive(Debug, Serialize)]
pub struct ModuleDetail {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub module_type: ModuleType,
    pub is_published: bool,
    pub subject: NamedRef,
    pub grade: NamedRef,
    pub questions: Vec<QuestionResponse>,
}

#[derive(Debug, Serialize)]
pub struct QuestionDetail {
    pub id: Uuid,
    pub content: String,
    pub slug: String,
    pub choices: Vec<PublicChoice>,
    pub next_question_slug: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub const DEFAULT_PER_PAGE: i64 = 10;
    pub const MAX_PER_PAGE: i64 = 100;

    pub fn normalize_page(page: Option<i64>) -> i64 {
        page.filter(|p| *p >= 1).unwrap_or(1)
    }

    pub fn normalize_per_page(per_page: Option<i64>) -> i64 {
        per_page
            .filter(|p| *p >= 1)
            .unwrap_or(Self::DEFAULT_PER_PAGE)
            .min(Self::MAX_PER_PAGE)
    }

    pub fn offset(page: i64, per_page: i64) -> i64 {
        (page - 1) * per_page
    }

    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        let total_pages = ((total + per_page - 1) / per_page).max(1);
        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ModulePage {
    pub modules: Vec<ModuleResponse>,
    pub pagination: Pagination,
}
