// tests/module_cascade.rs

mod common;

use std::collections::HashMap;

use async_trait::async_trait;
use common::{ModuleStore, algebra_module, question};
use quizboard::domain::module::{
    ModuleError,
    repository::{GradeAcl, ModuleReader, SubjectAcl},
    service::{
        AddQuestion, AddQuestionChoice, AddQuestions, AddQuestionsCommand, DeleteModule,
        FindAllModules, FindAllModulesCommand, FindPublishedModule, GetCorrectAnswer,
        TogglePublishModule, save_module,
    },
};
use uuid::Uuid;

/// Every subject and grade exists and is called "Named".
struct EverythingExists;

#[async_trait]
impl SubjectAcl for EverythingExists {
    async fn is_subject_exist(&self, _: Uuid, _: Uuid) -> Result<bool, ModuleError> {
        Ok(true)
    }

    async fn get_subject_name(&self, _: Uuid, _: Uuid) -> Result<String, ModuleError> {
        Ok("Named".to_string())
    }

    async fn get_subject_names(
        &self,
        ids: &[Uuid],
        _: Uuid,
    ) -> Result<HashMap<Uuid, String>, ModuleError> {
        Ok(ids.iter().map(|id| (*id, "Named".to_string())).collect())
    }
}

#[async_trait]
impl GradeAcl for EverythingExists {
    async fn is_grade_exist(&self, _: Uuid, _: Uuid) -> Result<bool, ModuleError> {
        Ok(true)
    }

    async fn get_grade_name(&self, _: Uuid, _: Uuid) -> Result<String, ModuleError> {
        Ok("Named".to_string())
    }

    async fn get_grade_names(
        &self,
        ids: &[Uuid],
        _: Uuid,
    ) -> Result<HashMap<Uuid, String>, ModuleError> {
        Ok(ids.iter().map(|id| (*id, "Named".to_string())).collect())
    }
}

fn choice(content: &str, correct: bool) -> AddQuestionChoice {
    AddQuestionChoice {
        content: content.to_string(),
        is_correct_answer: correct,
    }
}

#[tokio::test]
async fn add_and_remove_commit_in_one_transaction() {
    let owner = Uuid::new_v4();
    let fixture = algebra_module(owner);
    let slug = fixture.slug.clone();
    let module_id = fixture.id;
    let first_id = fixture.questions[0].id;
    let first_slug = fixture.questions[0].slug.clone();
    let second_id = fixture.questions[1].id;
    let store = ModuleStore::with_modules(vec![fixture]);

    let mut module = store.find_detail_by_slug(&slug, owner).await.unwrap();
    module.remove_question(&first_slug).unwrap();
    let added = question(module_id, "5 - 1 = ?", &[("4", true), ("5", false)]);
    let added_id = added.id;
    let added_choices: Vec<Uuid> = added.choices.iter().map(|c| c.id).collect();
    module.add_question(added);

    save_module(&store, &module).await.unwrap();

    let state = store.state();
    assert_eq!(state.begins, 1);
    assert_eq!(state.commits, 1);
    assert_eq!(
        state.committed,
        vec![
            format!("update module {module_id}"),
            format!("remove question {first_id}"),
            format!("remove choices of question {first_id}"),
            format!("insert question {added_id}"),
            format!("insert choice {}", added_choices[0]),
            format!("insert choice {}", added_choices[1]),
        ]
    );

    let remaining: Vec<Uuid> = state.modules[0].questions.iter().map(|q| q.id).collect();
    assert_eq!(remaining, vec![second_id, added_id]);
}

#[tokio::test]
async fn failed_write_rolls_back_the_whole_save() {
    let owner = Uuid::new_v4();
    let fixture = algebra_module(owner);
    let slug = fixture.slug.clone();
    let module_id = fixture.id;
    let first_slug = fixture.questions[0].slug.clone();
    let store = ModuleStore::with_modules(vec![fixture]);
    store.state().fail_on_write = Some(2);

    let mut module = store.find_detail_by_slug(&slug, owner).await.unwrap();
    module.remove_question(&first_slug).unwrap();
    module.add_question(question(module_id, "5 - 1 = ?", &[("4", true), ("5", false)]));

    let result = save_module(&store, &module).await;
    assert!(matches!(result, Err(ModuleError::Storage(_))));

    let state = store.state();
    assert_eq!(state.commits, 0);
    assert_eq!(state.rollbacks, 1);
    assert!(state.committed.is_empty());
    assert_eq!(state.modules[0].questions.len(), 2);
}

#[tokio::test]
async fn invalid_question_is_rejected_before_any_write() {
    let owner = Uuid::new_v4();
    let fixture = algebra_module(owner);
    let slug = fixture.slug.clone();
    let store = ModuleStore::with_modules(vec![fixture]);

    let result = AddQuestions::new(&store, &store)
        .execute(AddQuestionsCommand {
            user_id: owner,
            module_slug: slug,
            questions: vec![
                AddQuestion {
                    id: None,
                    content: "1 + 1 = ?".to_string(),
                    choices: vec![choice("2", true), choice("3", false)],
                },
                AddQuestion {
                    id: None,
                    content: "1 + 2 = ?".to_string(),
                    choices: vec![choice("3", true), choice("three", true)],
                },
            ],
        })
        .await;

    assert!(matches!(result, Err(ModuleError::MultipleCorrectAnswers)));
    assert_eq!(store.state().begins, 0);
    assert_eq!(store.state().modules[0].questions.len(), 2);
}

#[tokio::test]
async fn rewriting_a_question_replaces_its_choices() {
    let owner = Uuid::new_v4();
    let fixture = algebra_module(owner);
    let slug = fixture.slug.clone();
    let target = fixture.questions[0].id;
    let old_choices: Vec<Uuid> = fixture.questions[0].choices.iter().map(|c| c.id).collect();
    let store = ModuleStore::with_modules(vec![fixture]);

    AddQuestions::new(&store, &store)
        .execute(AddQuestionsCommand {
            user_id: owner,
            module_slug: slug,
            questions: vec![AddQuestion {
                id: Some(target),
                content: "2 + 3 = ?".to_string(),
                choices: vec![choice("5", true), choice("6", false), choice("7", false)],
            }],
        })
        .await
        .unwrap();

    let state = store.state();
    assert!(state.committed.contains(&format!("update question {target}")));
    for old in &old_choices {
        assert!(state.committed.contains(&format!("remove choice {old}")));
    }
    assert_eq!(
        state
            .committed
            .iter()
            .filter(|w| w.starts_with("insert choice"))
            .count(),
        3
    );

    let rewritten = &state.modules[0].questions[0];
    assert_eq!(rewritten.content, "2 + 3 = ?");
    assert_eq!(rewritten.choices.len(), 3);
}

#[tokio::test]
async fn rewriting_an_unknown_question_is_not_found() {
    let owner = Uuid::new_v4();
    let fixture = algebra_module(owner);
    let slug = fixture.slug.clone();
    let store = ModuleStore::with_modules(vec![fixture]);

    let result = AddQuestions::new(&store, &store)
        .execute(AddQuestionsCommand {
            user_id: owner,
            module_slug: slug,
            questions: vec![AddQuestion {
                id: Some(Uuid::new_v4()),
                content: "?".to_string(),
                choices: vec![choice("a", true), choice("b", false)],
            }],
        })
        .await;

    assert!(matches!(result, Err(ModuleError::QuestionNotFound)));
}

#[tokio::test]
async fn delete_cascades_to_the_question_tree() {
    let owner = Uuid::new_v4();
    let fixture = algebra_module(owner);
    let slug = fixture.slug.clone();
    let module_id = fixture.id;
    let store = ModuleStore::with_modules(vec![fixture]);

    DeleteModule::new(&store, &store)
        .execute(&slug, owner)
        .await
        .unwrap();

    let state = store.state();
    assert_eq!(
        state.committed,
        vec![
            format!("remove module {module_id}"),
            format!("remove questions of module {module_id}"),
        ]
    );
    assert!(state.modules.is_empty());
}

#[tokio::test]
async fn other_owners_cannot_touch_a_module() {
    let fixture = algebra_module(Uuid::new_v4());
    let slug = fixture.slug.clone();
    let store = ModuleStore::with_modules(vec![fixture]);

    let result = DeleteModule::new(&store, &store)
        .execute(&slug, Uuid::new_v4())
        .await;

    assert!(matches!(result, Err(ModuleError::ModuleNotFound)));
    assert_eq!(store.state().begins, 0);
}

#[tokio::test]
async fn toggling_hides_the_module_from_students() {
    let owner = Uuid::new_v4();
    let fixture = algebra_module(owner);
    let slug = fixture.slug.clone();
    let store = ModuleStore::with_modules(vec![fixture]);

    let published = FindPublishedModule::new(&store).execute(&slug).await.unwrap();
    assert_eq!(published.questions_count, Some(2));
    assert!(published.first_question_slug.is_some());

    let toggled = TogglePublishModule::new(&store, &store)
        .execute(&slug, owner)
        .await
        .unwrap();
    assert!(!toggled.is_published);

    let hidden = FindPublishedModule::new(&store).execute(&slug).await;
    assert!(matches!(hidden, Err(ModuleError::ModuleNotFound)));

    let correct = GetCorrectAnswer::new(&store)
        .execute(&slug, "anything")
        .await;
    assert!(matches!(correct, Err(ModuleError::ModuleNotFound)));
}

#[tokio::test]
async fn listing_is_paginated_per_owner() {
    let owner = Uuid::new_v4();
    let modules = vec![
        algebra_module(owner),
        algebra_module(owner),
        algebra_module(owner),
        algebra_module(Uuid::new_v4()),
    ];
    let store = ModuleStore::with_modules(modules);
    let acl = EverythingExists;

    let page = FindAllModules::new(&store, &acl, &acl)
        .execute(FindAllModulesCommand {
            user_id: owner,
            page: Some(2),
            per_page: Some(2),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.pagination.total, 3);
    assert_eq!(page.pagination.total_pages, 2);
    assert_eq!(page.modules.len(), 1);
    assert_eq!(page.modules[0].questions_count, Some(2));
    assert_eq!(
        page.modules[0].subject.as_ref().map(|s| s.name.as_str()),
        Some("Named")
    );
}
