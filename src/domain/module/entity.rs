// src/domain/module/entity.rs

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use super::error::ModuleError;
use crate::{
    domain::lifecycle::Tracked,
    utils::random::{SLUG_LENGTH, new_id, random_alphanumeric},
};

pub const MIN_CHOICES: usize = 2;
pub const MAX_CHOICES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleType {
    MultipleChoice,
}

impl ModuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleType::MultipleChoice => "multiple_choice",
        }
    }
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate root. Owns its questions, which own their choices.
#[derive(Debug, Clone)]
pub struct Module {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject_id: Uuid,
    pub grade_id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub module_type: ModuleType,
    pub is_published: bool,
    pub questions: Vec<Tracked<Question>>,
}

impl Module {
    pub fn new(
        user_id: Uuid,
        subject_id: Uuid,
        grade_id: Uuid,
        title: String,
        description: Option<String>,
    ) -> Tracked<Module> {
        Tracked::created(Module {
            id: new_id(),
            user_id,
            subject_id,
            grade_id,
            title,
            slug: random_alphanumeric(SLUG_LENGTH),
            description,
            module_type: ModuleType::MultipleChoice,
            is_published: false,
            questions: Vec::new(),
        })
    }

    pub fn question_by_id(&self, question_id: Uuid) -> Option<&Tracked<Question>> {
        self.questions.iter().find(|q| q.id == question_id)
    }
}

impl Tracked<Module> {
    pub fn publish(&mut self) {
        self.update(|m| m.is_published = true);
    }

    pub fn unpublish(&mut self) {
        self.update(|m| m.is_published = false);
    }

    pub fn toggle_publish(&mut self) {
        if self.is_published {
            self.unpublish();
        } else {
            self.publish();
        }
    }

    /// Appends a question. The question must already carry its own intent.
    pub fn add_question(&mut self, question: Tracked<Question>) {
        self.entity_mut().questions.push(question);
        self.mark_update();
    }

    /// Rewrites an existing question: new content, previous choices
    /// tombstoned, `choices` appended. The resulting choice set is validated
    /// before anything is marked.
    pub fn replace_question(
        &mut self,
        question_id: Uuid,
        content: String,
        choices: Vec<(String, bool)>,
    ) -> Result<(), ModuleError> {
        let question = self
            .entity_mut()
            .questions
            .iter_mut()
            .find(|q| q.id == question_id)
            .ok_or(ModuleError::QuestionNotFound)?;

        question.update_content(content);
        question.clear_choices();
        for (content, is_correct) in choices {
            let choice = Choice::new(question_id, content, is_correct);
            question.add_choice(choice);
        }
        question.is_valid_choices()?;

        self.mark_update();
        Ok(())
    }

    /// Tombstones a live question. Its choices follow it on save.
    pub fn remove_question(&mut self, question_slug: &str) -> Result<(), ModuleError> {
        let question = self
            .entity_mut()
            .questions
            .iter_mut()
            .find(|q| q.slug == question_slug && !q.is_removed())
            .ok_or(ModuleError::QuestionNotFound)?;

        question.mark_remove();
        self.mark_update();
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Question {
    pub id: Uuid,
    pub module_id: Uuid,
    pub content: String,
    pub slug: String,
    pub choices: Vec<Tracked<Choice>>,
}

impl Question {
    pub fn new(module_id: Uuid, content: String) -> Tracked<Question> {
        Tracked::created(Question {
            id: new_id(),
            module_id,
            content,
            slug: random_alphanumeric(SLUG_LENGTH),
            choices: Vec::new(),
        })
    }

    /// Checks the live choice set: exactly one correct answer, and between
    /// two and four choices.
    pub fn is_valid_choices(&self) -> Result<(), ModuleError> {
        let mut live = 0;
        let mut has_correct_answer = false;

        for choice in self.choices.iter().filter(|c| !c.is_removed()) {
            if choice.is_correct_answer {
                if has_correct_answer {
                    return Err(ModuleError::MultipleCorrectAnswers);
                }
                has_correct_answer = true;
            }
            live += 1;
        }

        if !has_correct_answer {
            return Err(ModuleError::NoCorrectAnswer);
        }

        if live < MIN_CHOICES {
            Err(ModuleError::MinTwoChoices)
        } else if live > MAX_CHOICES {
            Err(ModuleError::MaxFourChoices)
        } else {
            Ok(())
        }
    }

    pub fn correct_choice(&self) -> Option<&Tracked<Choice>> {
        self.choices
            .iter()
            .find(|c| !c.is_removed() && c.is_correct_answer)
    }
}

impl Tracked<Question> {
    pub fn add_choice(&mut self, choice: Tracked<Choice>) {
        self.entity_mut().choices.push(choice);
    }

    pub fn update_content(&mut self, content: String) {
        self.update(|q| q.content = content);
    }

    /// Marks every current choice for removal.
    pub fn clear_choices(&mut self) {
        self.update(|q| q.choices.iter_mut().for_each(|c| c.mark_remove()));
    }
}

#[derive(Debug, Clone)]
pub struct Choice {
    pub id: Uuid,
    pub question_id: Uuid,
    pub content: String,
    pub is_correct_answer: bool,
}

impl Choice {
    pub fn new(question_id: Uuid, content: String, is_correct_answer: bool) -> Tracked<Choice> {
        Tracked::created(Choice {
            id: new_id(),
            question_id,
            content,
            is_correct_answer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question_with(choices: &[bool]) -> Tracked<Question> {
        let mut question = Question::new(Uuid::new_v4(), "2 + 2 = ?".to_string());
        let id = question.id;
        for (i, correct) in choices.iter().enumerate() {
            question.add_choice(Choice::new(id, format!("choice {i}"), *correct));
        }
        question
    }

    fn loaded_module_with(question: Tracked<Question>) -> Tracked<Module> {
        let mut module = Module::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Algebra".to_string(),
            None,
        )
        .into_inner();
        let question = Tracked::loaded(question.into_inner());
        module.questions.push(question);
        Tracked::loaded(module)
    }

    #[test]
    fn test_new_module_has_slug_and_is_unpublished() {
        let module = Module::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Algebra".to_string(),
            None,
        );
        assert!(module.is_created());
        assert_eq!(module.slug.len(), SLUG_LENGTH);
        assert!(!module.is_published);
        assert_eq!(module.module_type, ModuleType::MultipleChoice);
    }

    #[test]
    fn test_valid_choice_sets() {
        assert!(question_with(&[true, false]).is_valid_choices().is_ok());
        assert!(question_with(&[false, true, false, false]).is_valid_choices().is_ok());
    }

    #[test]
    fn test_multiple_correct_takes_precedence() {
        // Also too many choices, but the correctness rule is checked first.
        let question = question_with(&[true, true, false, false, false]);
        assert!(matches!(
            question.is_valid_choices(),
            Err(ModuleError::MultipleCorrectAnswers)
        ));
    }

    #[test]
    fn test_no_correct_before_count_rules() {
        let question = question_with(&[false]);
        assert!(matches!(
            question.is_valid_choices(),
            Err(ModuleError::NoCorrectAnswer)
        ));
    }

    #[test]
    fn test_count_bounds() {
        assert!(matches!(
            question_with(&[true]).is_valid_choices(),
            Err(ModuleError::MinTwoChoices)
        ));
        assert!(matches!(
            question_with(&[true, false, false, false, false]).is_valid_choices(),
            Err(ModuleError::MaxFourChoices)
        ));
    }

    #[test]
    fn test_removed_choices_are_ignored() {
        let mut question = question_with(&[true, true, false]);
        question.entity_mut().choices[1].mark_remove();
        assert!(question.is_valid_choices().is_ok());
    }

    #[test]
    fn test_toggle_publish_marks_updated() {
        let mut module = loaded_module_with(question_with(&[true, false]));
        module.toggle_publish();
        assert!(module.is_published);
        assert!(module.is_updated());
        module.toggle_publish();
        assert!(!module.is_published);
    }

    #[test]
    fn test_replace_question_tombstones_previous_choices() {
        let module_question = question_with(&[true, false]);
        let question_id = module_question.id;
        let mut module = loaded_module_with(module_question);

        module
            .replace_question(
                question_id,
                "3 + 3 = ?".to_string(),
                vec![("6".to_string(), true), ("7".to_string(), false), ("8".to_string(), false)],
            )
            .unwrap();

        let question = module.question_by_id(question_id).unwrap();
        assert!(module.is_updated());
        assert!(question.is_updated());
        assert_eq!(question.content, "3 + 3 = ?");
        assert_eq!(question.choices.iter().filter(|c| c.is_removed()).count(), 2);
        assert_eq!(question.choices.iter().filter(|c| c.is_created()).count(), 3);
    }

    #[test]
    fn test_replace_question_rejects_invalid_choices() {
        let module_question = question_with(&[true, false]);
        let question_id = module_question.id;
        let mut module = loaded_module_with(module_question);

        let result = module.replace_question(
            question_id,
            "3 + 3 = ?".to_string(),
            vec![("6".to_string(), false), ("7".to_string(), false)],
        );

        assert!(matches!(result, Err(ModuleError::NoCorrectAnswer)));
        assert_eq!(module.change(), None);
    }

    #[test]
    fn test_replace_unknown_question_is_not_found() {
        let mut module = loaded_module_with(question_with(&[true, false]));
        let result = module.replace_question(Uuid::new_v4(), "x".to_string(), vec![]);
        assert!(matches!(result, Err(ModuleError::QuestionNotFound)));
    }

    #[test]
    fn test_remove_question_marks_removed() {
        let module_question = question_with(&[true, false]);
        let slug = module_question.slug.clone();
        let mut module = loaded_module_with(module_question);

        module.remove_question(&slug).unwrap();
        assert!(module.questions[0].is_removed());
        assert!(matches!(
            module.remove_question(&slug),
            Err(ModuleError::QuestionNotFound)
        ));
    }
}
