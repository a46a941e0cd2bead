// src/models/module.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents the 'modules' table in the database.
#[derive(Debug, Clone, FromRow)]
pub struct ModuleRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject_id: Uuid,
    pub grade_id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    /// Mapped from the column 'type' since `type` is a reserved keyword in Rust.
    #[sqlx(rename = "type")]
    pub module_type: String,
    pub is_published: bool,
}

/// A module row plus its live question count, for dashboard listings.
#[derive(Debug, Clone, FromRow)]
pub struct ModuleListingRow {
    #[sqlx(flatten)]
    pub module: ModuleRow,
    pub questions_count: i64,
}

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow)]
pub struct QuestionRow {
    pub id: Uuid,
    pub module_id: Uuid,
    pub content: String,
    pub slug: String,
}

/// Represents the 'question_choices' table in the database.
#[derive(Debug, Clone, FromRow)]
pub struct ChoiceRow {
    pub id: Uuid,
    pub question_id: Uuid,
    pub content: String,
    pub is_correct_answer: bool,
}

/// A published module joined with its grade and subject names.
#[derive(Debug, Clone, FromRow)]
pub struct PublishedModuleRow {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub grade_id: Uuid,
    pub grade_name: Option<String>,
    pub subject_id: Uuid,
    pub subject_name: Option<String>,
}

/// DTO for creating a module.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateModuleRequest {
    #[validate(length(min = 1, max = 100, message = "Title length must be between 1 and 100 characters."))]
    pub title: String,
    pub subject_id: Uuid,
    pub grade_id: Uuid,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Query string for the dashboard module listing.
#[derive(Debug, Default, Deserialize)]
pub struct ModuleListQuery {
    pub keyword: Option<String>,
    pub subject_id: Option<Uuid>,
    pub grade_id: Option<Uuid>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// DTO for adding or rewriting questions of a module.
#[derive(Debug, Deserialize, Validate)]
pub struct AddQuestionsRequest {
    #[validate(length(min = 1, message = "At least one question is required."), nested)]
    pub questions: Vec<AddQuestionRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct AddQuestionRequest {
    /// Set to rewrite an existing question instead of creating one.
    pub id: Option<Uuid>,
    #[validate(length(min = 1, max = 2000))]
    pub content: String,
    #[validate(length(min = 2, max = 4, message = "A question needs between 2 and 4 choices."), nested)]
    pub choices: Vec<AddQuestionChoiceRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct AddQuestionChoiceRequest {
    #[validate(length(min = 1, max = 500))]
    pub content: String,
    #[serde(default)]
    pub is_correct_answer: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice(content: &str, correct: bool) -> AddQuestionChoiceRequest {
        AddQuestionChoiceRequest {
            content: content.to_string(),
            is_correct_answer: correct,
        }
    }

    #[test]
    fn test_add_questions_requires_a_question() {
        let req = AddQuestionsRequest { questions: vec![] };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_nested_choice_count_is_validated() {
        let req = AddQuestionsRequest {
            questions: vec![AddQuestionRequest {
                id: None,
                content: "2 + 2 = ?".to_string(),
                choices: vec![choice("4", true)],
            }],
        };
        assert!(req.validate().is_err());

        let req = AddQuestionsRequest {
            questions: vec![AddQuestionRequest {
                id: None,
                content: "2 + 2 = ?".to_string(),
                choices: vec![choice("4", true), choice("5", false)],
            }],
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_blank_choice_is_reported_under_questions() {
        let req = AddQuestionsRequest {
            questions: vec![AddQuestionRequest {
                id: None,
                content: "2 + 2 = ?".to_string(),
                choices: vec![choice("", true), choice("5", false)],
            }],
        };

        let errors = req.validate().unwrap_err();
        assert!(errors.errors().contains_key("questions"));
    }

    #[test]
    fn test_create_module_rejects_empty_title() {
        let req = CreateModuleRequest {
            title: String::new(),
            subject_id: Uuid::new_v4(),
            grade_id: Uuid::new_v4(),
            description: None,
        };
        assert!(req.validate().is_err());
    }
}
