// tests/common/mod.rs
//
// In-memory repositories and units of work for service-level tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use quizboard::{
    domain::{
        lifecycle::{Change, Tracked},
        module::{
            ModuleError,
            entity::{Choice, Module, Question},
            repository::{
                ModuleFilter, ModuleListing, ModuleReader, ModuleUnitOfWork,
                ModuleUnitOfWorkProcessor, ModuleWriter,
            },
        },
        submission::{
            self, SubmissionError,
            entity::Submission,
            repository::{
                ModuleAcl, SubmissionReader, SubmissionUnitOfWork, SubmissionUnitOfWorkProcessor,
                SubmissionWriter,
            },
        },
    },
    infrastructure::module::cascade::plan_save,
};
use uuid::Uuid;

pub fn storage_error() -> sqlx::Error {
    sqlx::Error::Protocol("connection reset by fake".to_string())
}

/// Drops tombstoned children and clears every intent, the way a reload
/// from storage would.
pub fn settle_module(module: &Tracked<Module>) -> Module {
    let mut module = module.clone().into_inner();
    module.questions = module
        .questions
        .into_iter()
        .filter(|q| !q.is_removed())
        .map(|q| {
            let mut q = q.into_inner();
            q.choices = q
                .choices
                .into_iter()
                .filter(|c| !c.is_removed())
                .map(|c| Tracked::loaded(c.into_inner()))
                .collect();
            Tracked::loaded(q)
        })
        .collect();
    module
}

pub fn settle_submission(submission: &Tracked<Submission>) -> Submission {
    let mut submission = submission.clone().into_inner();
    submission.answers = submission
        .answers
        .into_iter()
        .filter(|a| !a.is_removed())
        .map(|a| Tracked::loaded(a.into_inner()))
        .collect();
    submission
}

pub fn question(module_id: Uuid, content: &str, choices: &[(&str, bool)]) -> Tracked<Question> {
    let mut question = Question::new(module_id, content.to_string());
    let question_id = question.id;
    for (text, correct) in choices {
        question.add_choice(Choice::new(question_id, text.to_string(), *correct));
    }
    question
}

/// A published "Algebra" module with two questions:
/// "2 + 2 = ?" (3, 4*) and "3 x 3 = ?" (6, 9*).
pub fn algebra_module(user_id: Uuid) -> Module {
    let mut module = Module::new(
        user_id,
        Uuid::new_v4(),
        Uuid::new_v4(),
        "Algebra".to_string(),
        Some("Warm-up arithmetic".to_string()),
    );
    let module_id = module.id;
    module.add_question(question(module_id, "2 + 2 = ?", &[("3", false), ("4", true)]));
    module.add_question(question(module_id, "3 x 3 = ?", &[("6", false), ("9", true)]));
    module.publish();
    settle_module(&module)
}

pub fn choice_id(module: &Module, question_index: usize, content: &str) -> Uuid {
    module.questions[question_index]
        .choices
        .iter()
        .find(|c| c.content == content)
        .map(|c| c.id)
        .expect("choice exists in fixture")
}

// ---------------------------------------------------------------------------
// Module context
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct ModuleStoreState {
    pub modules: Vec<Module>,
    /// Labels of every write that reached a committed transaction.
    pub committed: Vec<String>,
    /// 1-based index of the write to fail inside the next transaction.
    pub fail_on_write: Option<usize>,
    pub begins: usize,
    pub commits: usize,
    pub rollbacks: usize,
}

#[derive(Clone, Default)]
pub struct ModuleStore {
    inner: Arc<Mutex<ModuleStoreState>>,
}

impl ModuleStore {
    pub fn with_modules(modules: Vec<Module>) -> Self {
        let store = Self::default();
        store.state().modules = modules;
        store
    }

    pub fn state(&self) -> MutexGuard<'_, ModuleStoreState> {
        self.inner.lock().expect("module store lock")
    }

    fn owned(&self, slug: &str, user_id: Uuid) -> Result<Module, ModuleError> {
        self.state()
            .modules
            .iter()
            .find(|m| m.slug == slug && m.user_id == user_id)
            .cloned()
            .ok_or(ModuleError::ModuleNotFound)
    }

    fn published(&self, slug: &str) -> Result<Module, ModuleError> {
        self.state()
            .modules
            .iter()
            .find(|m| m.slug == slug && m.is_published)
            .cloned()
            .ok_or(ModuleError::ModuleNotFound)
    }

    fn matching(&self, filter: &ModuleFilter) -> Vec<Module> {
        self.state()
            .modules
            .iter()
            .filter(|m| m.user_id == filter.user_id)
            .filter(|m| filter.subject_id.is_none_or(|id| m.subject_id == id))
            .filter(|m| filter.grade_id.is_none_or(|id| m.grade_id == id))
            .filter(|m| {
                filter.keyword.as_deref().is_none_or(|k| {
                    m.title.to_lowercase().contains(&k.to_lowercase())
                })
            })
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ModuleReader for ModuleStore {
    // Questions come along unflagged, so saves leave them untouched.
    async fn find_by_slug(&self, slug: &str, user_id: Uuid) -> Result<Tracked<Module>, ModuleError> {
        Ok(Tracked::loaded(self.owned(slug, user_id)?))
    }

    async fn find_detail_by_slug(
        &self,
        slug: &str,
        user_id: Uuid,
    ) -> Result<Tracked<Module>, ModuleError> {
        Ok(Tracked::loaded(self.owned(slug, user_id)?))
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Module, ModuleError> {
        let mut module = self.published(slug)?;
        module.questions.clear();
        Ok(module)
    }

    async fn find_published_question(
        &self,
        module_slug: &str,
        question_slug: &str,
    ) -> Result<Question, ModuleError> {
        self.published(module_slug)?
            .questions
            .into_iter()
            .find(|q| q.slug == question_slug)
            .map(Tracked::into_inner)
            .ok_or(ModuleError::QuestionNotFound)
    }

    async fn find_next_published_question(
        &self,
        module_slug: &str,
        current_question_slug: &str,
    ) -> Result<Option<Question>, ModuleError> {
        let questions = self.published(module_slug)?.questions;
        let next = questions
            .iter()
            .position(|q| q.slug == current_question_slug)
            .and_then(|i| questions.get(i + 1))
            .map(|q| q.clone().into_inner());
        Ok(next)
    }

    async fn find_first_published_question(
        &self,
        module_slug: &str,
    ) -> Result<Option<Question>, ModuleError> {
        Ok(self
            .published(module_slug)?
            .questions
            .into_iter()
            .next()
            .map(Tracked::into_inner))
    }

    async fn count_questions_by_module_slug(&self, module_slug: &str) -> Result<i64, ModuleError> {
        Ok(self
            .state()
            .modules
            .iter()
            .find(|m| m.slug == module_slug)
            .map(|m| m.questions.len() as i64)
            .unwrap_or(0))
    }

    async fn count_by_user(&self, user_id: Uuid) -> Result<i64, ModuleError> {
        Ok(self
            .state()
            .modules
            .iter()
            .filter(|m| m.user_id == user_id)
            .count() as i64)
    }

    async fn total_modules(&self, filter: &ModuleFilter) -> Result<i64, ModuleError> {
        Ok(self.matching(filter).len() as i64)
    }

    async fn find_all_modules(
        &self,
        filter: &ModuleFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ModuleListing>, ModuleError> {
        Ok(self
            .matching(filter)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|mut module| {
                let questions_count = module.questions.len() as i64;
                module.questions.clear();
                ModuleListing {
                    module,
                    questions_count,
                }
            })
            .collect())
    }
}

#[async_trait]
impl ModuleUnitOfWork for ModuleStore {
    async fn begin(&self) -> Result<Box<dyn ModuleUnitOfWorkProcessor>, ModuleError> {
        self.state().begins += 1;
        Ok(Box::new(FakeModuleTx {
            store: self.clone(),
            writes: Vec::new(),
            staged: None,
        }))
    }
}

pub struct FakeModuleTx {
    store: ModuleStore,
    writes: Vec<String>,
    /// Module as it will look after commit; `None` inside means removed.
    staged: Option<(Uuid, Option<Module>)>,
}

struct FakeModuleWriter<'t> {
    tx: &'t mut FakeModuleTx,
}

#[async_trait]
impl ModuleWriter for FakeModuleWriter<'_> {
    async fn save(&mut self, module: &Tracked<Module>) -> Result<(), ModuleError> {
        let fail_on = self.tx.store.state().fail_on_write;

        for write in plan_save(module) {
            if fail_on == Some(self.tx.writes.len() + 1) {
                return Err(ModuleError::Storage(storage_error()));
            }
            self.tx.writes.push(write.to_string());
        }

        let after = match module.change() {
            Some(Change::Removed) => None,
            _ => Some(settle_module(module)),
        };
        self.tx.staged = Some((module.id, after));
        Ok(())
    }
}

#[async_trait]
impl ModuleUnitOfWorkProcessor for FakeModuleTx {
    fn module_writer(&mut self) -> Box<dyn ModuleWriter + '_> {
        Box::new(FakeModuleWriter { tx: self })
    }

    async fn commit(self: Box<Self>) -> Result<(), ModuleError> {
        let FakeModuleTx {
            store,
            writes,
            staged,
        } = *self;
        let mut state = store.state();

        state.commits += 1;
        state.committed.extend(writes);
        if let Some((id, after)) = staged {
            state.modules.retain(|m| m.id != id);
            if let Some(module) = after {
                state.modules.push(module);
            }
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), ModuleError> {
        self.store.state().rollbacks += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Submission context
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct SubmissionStoreState {
    pub submissions: HashMap<String, Submission>,
    pub fail_writes: bool,
    pub commits: usize,
    pub rollbacks: usize,
}

#[derive(Clone, Default)]
pub struct SubmissionStore {
    inner: Arc<Mutex<SubmissionStoreState>>,
}

impl SubmissionStore {
    pub fn state(&self) -> MutexGuard<'_, SubmissionStoreState> {
        self.inner.lock().expect("submission store lock")
    }

    pub fn get(&self, code: &str) -> Option<Submission> {
        self.state().submissions.get(code).cloned()
    }
}

#[async_trait]
impl SubmissionReader for SubmissionStore {
    async fn find_by_code(&self, code: &str) -> Result<Tracked<Submission>, SubmissionError> {
        self.get(code)
            .map(Tracked::loaded)
            .ok_or(SubmissionError::SubmissionNotFound)
    }

    async fn count_submitted(&self) -> Result<i64, SubmissionError> {
        Ok(self
            .state()
            .submissions
            .values()
            .filter(|s| s.is_submitted())
            .count() as i64)
    }

    async fn find_all_submitted_grouped_by_module(
        &self,
        module_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Submission>>, SubmissionError> {
        let mut grouped: HashMap<Uuid, Vec<Submission>> = HashMap::new();
        for submission in self.state().submissions.values() {
            if submission.is_submitted() && module_ids.contains(&submission.module_id) {
                grouped
                    .entry(submission.module_id)
                    .or_default()
                    .push(submission.clone());
            }
        }
        Ok(grouped)
    }
}

#[async_trait]
impl SubmissionUnitOfWork for SubmissionStore {
    async fn begin(&self) -> Result<Box<dyn SubmissionUnitOfWorkProcessor>, SubmissionError> {
        Ok(Box::new(FakeSubmissionTx {
            store: self.clone(),
            staged: None,
        }))
    }
}

pub struct FakeSubmissionTx {
    store: SubmissionStore,
    staged: Option<Submission>,
}

struct FakeSubmissionWriter<'t> {
    tx: &'t mut FakeSubmissionTx,
}

#[async_trait]
impl SubmissionWriter for FakeSubmissionWriter<'_> {
    async fn save(&mut self, submission: &Tracked<Submission>) -> Result<(), SubmissionError> {
        let state = self.tx.store.state();
        if state.fail_writes {
            return Err(SubmissionError::Storage(storage_error()));
        }

        if let Some(stored) = state.submissions.get(&submission.code) {
            // Mirrors the in-progress guard on the submissions UPDATE.
            if submission.is_updated() && !stored.is_in_progress() {
                return Err(SubmissionError::SubmissionAlreadyDone);
            }

            // Mirrors the unique (submission_id, question_slug) constraint.
            let clash = submission
                .answers
                .iter()
                .filter(|a| a.is_created())
                .any(|a| stored.has_answered_question(&a.question_slug));
            if clash {
                return Err(SubmissionError::DuplicateAnswer);
            }
        }
        drop(state);

        self.tx.staged = Some(settle_submission(submission));
        Ok(())
    }
}

#[async_trait]
impl SubmissionUnitOfWorkProcessor for FakeSubmissionTx {
    fn submission_writer(&mut self) -> Box<dyn SubmissionWriter + '_> {
        Box::new(FakeSubmissionWriter { tx: self })
    }

    async fn commit(self: Box<Self>) -> Result<(), SubmissionError> {
        let FakeSubmissionTx { store, staged } = *self;
        let mut state = store.state();

        state.commits += 1;
        if let Some(submission) = staged {
            state.submissions.insert(submission.code.clone(), submission);
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), SubmissionError> {
        self.store.state().rollbacks += 1;
        Ok(())
    }
}

/// The module context as seen by a submission, backed by fixture modules.
#[derive(Clone, Default)]
pub struct FakeModuleAcl {
    modules: Vec<Module>,
}

impl FakeModuleAcl {
    pub fn new(modules: Vec<Module>) -> Self {
        Self { modules }
    }

    fn published(&self, slug: &str) -> Result<&Module, SubmissionError> {
        self.modules
            .iter()
            .find(|m| m.slug == slug && m.is_published)
            .ok_or(SubmissionError::ModuleNotFound)
    }

    fn question(&self, module_slug: &str, question_slug: &str) -> Result<&Question, SubmissionError> {
        self.published(module_slug)?
            .questions
            .iter()
            .map(|q| &**q)
            .find(|q| q.slug == question_slug)
            .ok_or(SubmissionError::QuestionNotFound)
    }

    fn next_slug(&self, module_slug: &str, question_slug: &str) -> Result<Option<String>, SubmissionError> {
        let questions = &self.published(module_slug)?.questions;
        Ok(questions
            .iter()
            .position(|q| q.slug == question_slug)
            .and_then(|i| questions.get(i + 1))
            .map(|q| q.slug.clone()))
    }
}

#[async_trait]
impl ModuleAcl for FakeModuleAcl {
    async fn get_published_module(
        &self,
        module_slug: &str,
    ) -> Result<submission::entity::Module, SubmissionError> {
        let module = self.published(module_slug)?;
        Ok(submission::entity::Module {
            id: module.id,
            slug: module.slug.clone(),
            title: module.title.clone(),
            grade: None,
            subject: None,
        })
    }

    async fn get_question_by_slug(
        &self,
        module_slug: &str,
        question_slug: &str,
    ) -> Result<submission::entity::Question, SubmissionError> {
        let question = self.question(module_slug, question_slug)?;
        Ok(submission::entity::Question {
            id: question.id,
            content: question.content.clone(),
            slug: question.slug.clone(),
            choices: question
                .choices
                .iter()
                .map(|c| submission::entity::Choice {
                    id: c.id,
                    content: c.content.clone(),
                    is_correct_answer: false,
                })
                .collect(),
        })
    }

    async fn get_correct_answer(
        &self,
        module_slug: &str,
        question_slug: &str,
    ) -> Result<submission::entity::Choice, SubmissionError> {
        let correct = self
            .question(module_slug, question_slug)?
            .correct_choice()
            .ok_or(SubmissionError::ChoiceNotFound)?;
        Ok(submission::entity::Choice {
            id: correct.id,
            content: correct.content.clone(),
            is_correct_answer: true,
        })
    }

    async fn get_total_questions(&self, module_slug: &str) -> Result<i64, SubmissionError> {
        Ok(self.published(module_slug)?.questions.len() as i64)
    }

    async fn get_next_question_slug(
        &self,
        module_slug: &str,
        current_question_slug: &str,
    ) -> Result<Option<String>, SubmissionError> {
        self.question(module_slug, current_question_slug)?;
        self.next_slug(module_slug, current_question_slug)
    }

    async fn get_all_published_modules(
        &self,
        keyword: Option<&str>,
    ) -> Result<Vec<submission::entity::Module>, SubmissionError> {
        Ok(self
            .modules
            .iter()
            .filter(|m| m.is_published)
            .filter(|m| keyword.is_none_or(|k| m.title.contains(k)))
            .map(|m| submission::entity::Module {
                id: m.id,
                slug: m.slug.clone(),
                title: m.title.clone(),
                grade: None,
                subject: None,
            })
            .collect())
    }
}
