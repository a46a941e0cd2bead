// src/infrastructure/module/cascade.rs

use std::fmt;

use uuid::Uuid;

use crate::domain::{
    lifecycle::{Change, Tracked},
    module::entity::{Choice, Module, Question},
};

/// One storage write produced by saving a module aggregate.
#[derive(Debug, Clone, Copy)]
pub enum ModuleWrite<'a> {
    InsertModule(&'a Module),
    UpdateModule(&'a Module),
    RemoveModule(Uuid),
    /// Tombstones every live question of the module and their choices.
    RemoveModuleQuestions(Uuid),
    InsertQuestion(&'a Question),
    UpdateQuestion(&'a Question),
    RemoveQuestion(Uuid),
    /// Tombstones every live choice of the question.
    RemoveQuestionChoices(Uuid),
    InsertChoice(&'a Choice),
    UpdateChoice(&'a Choice),
    RemoveChoice(Uuid),
}

impl fmt::Display for ModuleWrite<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleWrite::InsertModule(m) => write!(f, "insert module {}", m.id),
            ModuleWrite::UpdateModule(m) => write!(f, "update module {}", m.id),
            ModuleWrite::RemoveModule(id) => write!(f, "remove module {id}"),
            ModuleWrite::RemoveModuleQuestions(id) => write!(f, "remove questions of module {id}"),
            ModuleWrite::InsertQuestion(q) => write!(f, "insert question {}", q.id),
            ModuleWrite::UpdateQuestion(q) => write!(f, "update question {}", q.id),
            ModuleWrite::RemoveQuestion(id) => write!(f, "remove question {id}"),
            ModuleWrite::RemoveQuestionChoices(id) => write!(f, "remove choices of question {id}"),
            ModuleWrite::InsertChoice(c) => write!(f, "insert choice {}", c.id),
            ModuleWrite::UpdateChoice(c) => write!(f, "update choice {}", c.id),
            ModuleWrite::RemoveChoice(id) => write!(f, "remove choice {id}"),
        }
    }
}

/// Turns the intents carried by `module` into an ordered list of writes.
///
/// * Created or unflagged root: the module row only.
/// * Updated root: the module row, then each question by its own intent.
///   Unflagged questions and choices are skipped.
/// * Removed root: the module row and its whole question tree.
pub fn plan_save(module: &Tracked<Module>) -> Vec<ModuleWrite<'_>> {
    match module.change() {
        None | Some(Change::Created) => vec![ModuleWrite::InsertModule(module)],
        Some(Change::Removed) => vec![
            ModuleWrite::RemoveModule(module.id),
            ModuleWrite::RemoveModuleQuestions(module.id),
        ],
        Some(Change::Updated) => {
            let mut writes = vec![ModuleWrite::UpdateModule(module)];
            for question in &module.questions {
                plan_question(question, &mut writes);
            }
            writes
        }
    }
}

fn plan_question<'a>(question: &'a Tracked<Question>, writes: &mut Vec<ModuleWrite<'a>>) {
    match question.change() {
        None => {}
        Some(Change::Created) => {
            writes.push(ModuleWrite::InsertQuestion(question));
            writes.extend(
                question
                    .choices
                    .iter()
                    .filter(|c| !c.is_removed())
                    .map(|c| ModuleWrite::InsertChoice(c)),
            );
        }
        Some(Change::Updated) => {
            writes.push(ModuleWrite::UpdateQuestion(question));
            for choice in &question.choices {
                match choice.change() {
                    None => {}
                    Some(Change::Created) => writes.push(ModuleWrite::InsertChoice(choice)),
                    Some(Change::Updated) => writes.push(ModuleWrite::UpdateChoice(choice)),
                    Some(Change::Removed) => writes.push(ModuleWrite::RemoveChoice(choice.id)),
                }
            }
        }
        Some(Change::Removed) => {
            writes.push(ModuleWrite::RemoveQuestion(question.id));
            writes.push(ModuleWrite::RemoveQuestionChoices(question.id));
        }
    }
}
