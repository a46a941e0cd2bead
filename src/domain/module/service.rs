// src/domain/module/service.rs

use std::collections::BTreeSet;

use uuid::Uuid;

use super::{
    entity::{Choice, Module, Question},
    error::ModuleError,
    repository::{GradeAcl, ModuleFilter, ModuleReader, ModuleUnitOfWork, SubjectAcl},
    response::{
        ChoiceWithAnswer, CreatedModule, ModuleDetail, ModulePage, ModuleResponse, NamedRef,
        Pagination, PublicChoice, QuestionDetail, QuestionResponse,
    },
};
use crate::domain::lifecycle::Tracked;

/// Saves `module` inside one transaction. On a failed write the transaction
/// is rolled back and the write error is returned.
pub async fn save_module(
    uow: &dyn ModuleUnitOfWork,
    module: &Tracked<Module>,
) -> Result<(), ModuleError> {
    let mut tx = uow.begin().await?;

    let saved = tx.module_writer().save(module).await;

    match saved {
        Ok(()) => tx.commit().await,
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!("Rollback after failed module save also failed: {:?}", rollback_err);
            }
            Err(err)
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateModuleCommand {
    pub user_id: Uuid,
    pub subject_id: Uuid,
    pub grade_id: Uuid,
    pub title: String,
    pub description: Option<String>,
}

pub struct CreateModule<'a> {
    uow: &'a dyn ModuleUnitOfWork,
    subject_acl: &'a dyn SubjectAcl,
    grade_acl: &'a dyn GradeAcl,
}

impl<'a> CreateModule<'a> {
    pub fn new(
        uow: &'a dyn ModuleUnitOfWork,
        subject_acl: &'a dyn SubjectAcl,
        grade_acl: &'a dyn GradeAcl,
    ) -> Self {
        Self {
            uow,
            subject_acl,
            grade_acl,
        }
    }

    pub async fn execute(&self, command: CreateModuleCommand) -> Result<CreatedModule, ModuleError> {
        if !self
            .subject_acl
            .is_subject_exist(command.subject_id, command.user_id)
            .await?
        {
            return Err(ModuleError::SubjectNotFound);
        }

        if !self
            .grade_acl
            .is_grade_exist(command.grade_id, command.user_id)
            .await?
        {
            return Err(ModuleError::GradeNotFound);
        }

        let module = Module::new(
            command.user_id,
            command.subject_id,
            command.grade_id,
            command.title,
            command.description,
        );

        save_module(self.uow, &module).await?;
        tracing::info!("Module {} created by {}", module.slug, module.user_id);

        Ok(CreatedModule {
            id: module.id,
            slug: module.slug.clone(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct FindAllModulesCommand {
    pub user_id: Uuid,
    pub keyword: Option<String>,
    pub subject_id: Option<Uuid>,
    pub grade_id: Option<Uuid>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

pub struct FindAllModules<'a> {
    module_reader: &'a dyn ModuleReader,
    subject_acl: &'a dyn SubjectAcl,
    grade_acl: &'a dyn GradeAcl,
}

impl<'a> FindAllModules<'a> {
    pub fn new(
        module_reader: &'a dyn ModuleReader,
        subject_acl: &'a dyn SubjectAcl,
        grade_acl: &'a dyn GradeAcl,
    ) -> Self {
        Self {
            module_reader,
            subject_acl,
            grade_acl,
        }
    }

    pub async fn execute(&self, command: FindAllModulesCommand) -> Result<ModulePage, ModuleError> {
        let page = Pagination::normalize_page(command.page);
        let per_page = Pagination::normalize_per_page(command.per_page);

        let filter = ModuleFilter {
            user_id: command.user_id,
            subject_id: command.subject_id,
            grade_id: command.grade_id,
            keyword: command.keyword.filter(|k| !k.trim().is_empty()),
        };

        let total = self.module_reader.total_modules(&filter).await?;
        let listings = self
            .module_reader
            .find_all_modules(&filter, per_page, Pagination::offset(page, per_page))
            .await?;

        let subject_ids: Vec<Uuid> = listings
            .iter()
            .map(|l| l.module.subject_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let grade_ids: Vec<Uuid> = listings
            .iter()
            .map(|l| l.module.grade_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let subject_names = self
            .subject_acl
            .get_subject_names(&subject_ids, command.user_id)
            .await?;
        let grade_names = self
            .grade_acl
            .get_grade_names(&grade_ids, command.user_id)
            .await?;

        let modules = listings
            .iter()
            .map(|listing| {
                let module = &listing.module;
                let mut response = ModuleResponse::from(module);
                response.questions_count = Some(listing.questions_count);
                response.subject = Some(NamedRef {
                    id: module.subject_id,
                    name: subject_names.get(&module.subject_id).cloned().unwrap_or_default(),
                });
                response.grade = Some(NamedRef {
                    id: module.grade_id,
                    name: grade_names.get(&module.grade_id).cloned().unwrap_or_default(),
                });
                response
            })
            .collect();

        Ok(ModulePage {
            modules,
            pagination: Pagination::new(page, per_page, total),
        })
    }
}

pub struct FindDetailModule<'a> {
    module_reader: &'a dyn ModuleReader,
    subject_acl: &'a dyn SubjectAcl,
    grade_acl: &'a dyn GradeAcl,
}

impl<'a> FindDetailModule<'a> {
    pub fn new(
        module_reader: &'a dyn ModuleReader,
        subject_acl: &'a dyn SubjectAcl,
        grade_acl: &'a dyn GradeAcl,
    ) -> Self {
        Self {
            module_reader,
            subject_acl,
            grade_acl,
        }
    }

    pub async fn execute(&self, slug: &str, user_id: Uuid) -> Result<ModuleDetail, ModuleError> {
        let module = self.module_reader.find_detail_by_slug(slug, user_id).await?;

        let subject_name = self
            .subject_acl
            .get_subject_name(module.subject_id, user_id)
            .await?;
        let grade_name = self.grade_acl.get_grade_name(module.grade_id, user_id).await?;

        let questions = module
            .questions
            .iter()
            .filter(|q| !q.is_removed())
            .map(|question| QuestionResponse {
                id: question.id,
                content: question.content.clone(),
                slug: question.slug.clone(),
                choices: question
                    .choices
                    .iter()
                    .filter(|c| !c.is_removed())
                    .map(|choice| ChoiceWithAnswer {
                        id: choice.id,
                        content: choice.content.clone(),
                        is_correct_answer: choice.is_correct_answer,
                    })
                    .collect(),
            })
            .collect();

        Ok(ModuleDetail {
            id: module.id,
            title: module.title.clone(),
            slug: module.slug.clone(),
            description: module.description.clone(),
            module_type: module.module_type,
            is_published: module.is_published,
            subject: NamedRef {
                id: module.subject_id,
                name: subject_name,
            },
            grade: NamedRef {
                id: module.grade_id,
                name: grade_name,
            },
            questions,
        })
    }
}

pub struct TogglePublishModule<'a> {
    module_reader: &'a dyn ModuleReader,
    uow: &'a dyn ModuleUnitOfWork,
}

impl<'a> TogglePublishModule<'a> {
    pub fn new(module_reader: &'a dyn ModuleReader, uow: &'a dyn ModuleUnitOfWork) -> Self {
        Self { module_reader, uow }
    }

    pub async fn execute(&self, slug: &str, user_id: Uuid) -> Result<ModuleResponse, ModuleError> {
        let mut module = self.module_reader.find_by_slug(slug, user_id).await?;

        module.toggle_publish();
        save_module(self.uow, &module).await?;

        tracing::info!(
            "Module {} is now {}",
            module.slug,
            if module.is_published { "published" } else { "unpublished" }
        );

        Ok(ModuleResponse::from(&*module))
    }
}

pub struct DeleteModule<'a> {
    module_reader: &'a dyn ModuleReader,
    uow: &'a dyn ModuleUnitOfWork,
}

impl<'a> DeleteModule<'a> {
    pub fn new(module_reader: &'a dyn ModuleReader, uow: &'a dyn ModuleUnitOfWork) -> Self {
        Self { module_reader, uow }
    }

    /// Soft-deletes the module together with its questions and choices.
    pub async fn execute(&self, slug: &str, user_id: Uuid) -> Result<(), ModuleError> {
        let mut module = self.module_reader.find_by_slug(slug, user_id).await?;

        module.mark_remove();
        save_module(self.uow, &module).await?;

        tracing::info!("Module {} deleted", module.slug);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct AddQuestionChoice {
    pub content: String,
    pub is_correct_answer: bool,
}

#[derive(Debug, Clone)]
pub struct AddQuestion {
    /// Present when an existing question is being rewritten.
    pub id: Option<Uuid>,
    pub content: String,
    pub choices: Vec<AddQuestionChoice>,
}

#[derive(Debug, Clone)]
pub struct AddQuestionsCommand {
    pub user_id: Uuid,
    pub module_slug: String,
    pub questions: Vec<AddQuestion>,
}

pub struct AddQuestions<'a> {
    module_reader: &'a dyn ModuleReader,
    uow: &'a dyn ModuleUnitOfWork,
}

impl<'a> AddQuestions<'a> {
    pub fn new(module_reader: &'a dyn ModuleReader, uow: &'a dyn ModuleUnitOfWork) -> Self {
        Self { module_reader, uow }
    }

    /// Creates new questions and rewrites existing ones in one transaction.
    /// Every question is validated before anything is written.
    pub async fn execute(&self, command: AddQuestionsCommand) -> Result<(), ModuleError> {
        let mut module = self
            .module_reader
            .find_detail_by_slug(&command.module_slug, command.user_id)
            .await?;

        for question_cmd in command.questions {
            let choices = question_cmd
                .choices
                .into_iter()
                .map(|c| (c.content, c.is_correct_answer));

            match question_cmd.id {
                Some(question_id) => {
                    module.replace_question(question_id, question_cmd.content, choices.collect())?;
                }
                None => {
                    let mut question = Question::new(module.id, question_cmd.content);
                    let question_id = question.id;
                    for (content, is_correct) in choices {
                        question.add_choice(Choice::new(question_id, content, is_correct));
                    }
                    question.is_valid_choices()?;
                    module.add_question(question);
                }
            }
        }

        save_module(self.uow, &module).await?;
        tracing::debug!("Questions saved for module {}", module.slug);
        Ok(())
    }
}

pub struct RemoveQuestion<'a> {
    module_reader: &'a dyn ModuleReader,
    uow: &'a dyn ModuleUnitOfWork,
}

impl<'a> RemoveQuestion<'a> {
    pub fn new(module_reader: &'a dyn ModuleReader, uow: &'a dyn ModuleUnitOfWork) -> Self {
        Self { module_reader, uow }
    }

    pub async fn execute(
        &self,
        module_slug: &str,
        question_slug: &str,
        user_id: Uuid,
    ) -> Result<(), ModuleError> {
        let mut module = self
            .module_reader
            .find_detail_by_slug(module_slug, user_id)
            .await?;

        module.remove_question(question_slug)?;
        save_module(self.uow, &module).await
    }
}

pub struct FindPublishedModule<'a> {
    module_reader: &'a dyn ModuleReader,
}

impl<'a> FindPublishedModule<'a> {
    pub fn new(module_reader: &'a dyn ModuleReader) -> Self {
        Self { module_reader }
    }

    pub async fn execute(&self, slug: &str) -> Result<ModuleResponse, ModuleError> {
        let module = self.module_reader.find_published_by_slug(slug).await?;

        let total = self
            .module_reader
            .count_questions_by_module_slug(&module.slug)
            .await?;
        let first = self
            .module_reader
            .find_first_published_question(&module.slug)
            .await?;

        let mut response = ModuleResponse::from(&module);
        response.questions_count = Some(total);
        response.first_question_slug = first.map(|q| q.slug);
        Ok(response)
    }
}

pub struct FindPublishedQuestion<'a> {
    module_reader: &'a dyn ModuleReader,
}

impl<'a> FindPublishedQuestion<'a> {
    pub fn new(module_reader: &'a dyn ModuleReader) -> Self {
        Self { module_reader }
    }

    pub async fn execute(
        &self,
        module_slug: &str,
        question_slug: &str,
    ) -> Result<QuestionDetail, ModuleError> {
        let module = self.module_reader.find_published_by_slug(module_slug).await?;

        let question = self
            .module_reader
            .find_published_question(&module.slug, question_slug)
            .await?;

        let next = self
            .module_reader
            .find_next_published_question(&module.slug, question_slug)
            .await?;

        Ok(QuestionDetail {
            id: question.id,
            content: question.content,
            slug: question.slug,
            choices: question
                .choices
                .iter()
                .filter(|c| !c.is_removed())
                .map(|c| PublicChoice {
                    id: c.id,
                    content: c.content.clone(),
                })
                .collect(),
            next_question_slug: next.map(|q| q.slug),
        })
    }
}

pub struct ValidatePublishedModule<'a> {
    module_reader: &'a dyn ModuleReader,
}

impl<'a> ValidatePublishedModule<'a> {
    pub fn new(module_reader: &'a dyn ModuleReader) -> Self {
        Self { module_reader }
    }

    pub async fn execute(&self, module_slug: &str) -> Result<ModuleResponse, ModuleError> {
        let module = self.module_reader.find_published_by_slug(module_slug).await?;
        Ok(ModuleResponse::from(&module))
    }
}

pub struct GetCorrectAnswer<'a> {
    module_reader: &'a dyn ModuleReader,
}

impl<'a> GetCorrectAnswer<'a> {
    pub fn new(module_reader: &'a dyn ModuleReader) -> Self {
        Self { module_reader }
    }

    pub async fn execute(
        &self,
        module_slug: &str,
        question_slug: &str,
    ) -> Result<ChoiceWithAnswer, ModuleError> {
        self.module_reader.find_published_by_slug(module_slug).await?;

        let question = self
            .module_reader
            .find_published_question(module_slug, question_slug)
            .await?;

        let correct = question.correct_choice().ok_or(ModuleError::ChoiceNotFound)?;

        Ok(ChoiceWithAnswer {
            id: correct.id,
            content: correct.content.clone(),
            is_correct_answer: true,
        })
    }
}

pub struct CountModuleQuestions<'a> {
    module_reader: &'a dyn ModuleReader,
}

impl<'a> CountModuleQuestions<'a> {
    pub fn new(module_reader: &'a dyn ModuleReader) -> Self {
        Self { module_reader }
    }

    pub async fn execute(&self, module_slug: &str) -> Result<i64, ModuleError> {
        self.module_reader
            .count_questions_by_module_slug(module_slug)
            .await
    }
}

pub struct CountModulesByUser<'a> {
    module_reader: &'a dyn ModuleReader,
}

impl<'a> CountModulesByUser<'a> {
    pub fn new(module_reader: &'a dyn ModuleReader) -> Self {
        Self { module_reader }
    }

    pub async fn execute(&self, user_id: Uuid) -> Result<i64, ModuleError> {
        self.module_reader.count_by_user(user_id).await
    }
}
