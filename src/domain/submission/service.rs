// src/domain/submission/service.rs

use uuid::Uuid;

use super::{
    entity::{Module, Submission, SubmissionAnswer},
    error::SubmissionError,
    repository::{ModuleAcl, SubmissionReader, SubmissionUnitOfWork},
    response::{
        CancelSubmissionResponse, FinalizeSubmissionResponse, ModuleSubmissionGroup,
        ModuleWithRelations, NamedRef, StartSubmissionResponse, SubmissionSummary,
        SubmitAnswerResponse,
    },
};
use crate::domain::lifecycle::Tracked;

const SUBMITTED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Saves `submission` inside one transaction. On a failed write the
/// transaction is rolled back and the write error is returned.
pub async fn save_submission(
    uow: &dyn SubmissionUnitOfWork,
    submission: &Tracked<Submission>,
) -> Result<(), SubmissionError> {
    let mut tx = uow.begin().await?;

    let saved = tx.submission_writer().save(submission).await;

    match saved {
        Ok(()) => tx.commit().await,
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(
                    "Rollback after failed submission save also failed: {:?}",
                    rollback_err
                );
            }
            Err(err)
        }
    }
}

/// Resolves the published module and checks the submission was started on it.
async fn resolve_own_module(
    module_acl: &dyn ModuleAcl,
    module_slug: &str,
    submission: &Submission,
) -> Result<Module, SubmissionError> {
    let module = module_acl.get_published_module(module_slug).await?;
    if module.id != submission.module_id {
        return Err(SubmissionError::SubmissionNotFound);
    }
    Ok(module)
}

#[derive(Debug, Clone)]
pub struct StartSubmissionCommand {
    pub module_slug: String,
    pub student_name: String,
}

pub struct StartSubmission<'a> {
    uow: &'a dyn SubmissionUnitOfWork,
    module_acl: &'a dyn ModuleAcl,
}

impl<'a> StartSubmission<'a> {
    pub fn new(uow: &'a dyn SubmissionUnitOfWork, module_acl: &'a dyn ModuleAcl) -> Self {
        Self { uow, module_acl }
    }

    pub async fn execute(
        &self,
        command: StartSubmissionCommand,
    ) -> Result<StartSubmissionResponse, SubmissionError> {
        let module = self
            .module_acl
            .get_published_module(&command.module_slug)
            .await?;

        let total_questions = self.module_acl.get_total_questions(&module.slug).await?;

        let submission = Submission::new(module.id, command.student_name, total_questions);
        save_submission(self.uow, &submission).await?;

        tracing::info!(
            "Submission {} started on module {} ({} questions)",
            submission.code,
            module.slug,
            total_questions
        );

        Ok(StartSubmissionResponse {
            code: submission.code.clone(),
            status: submission.status,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SubmitAnswerCommand {
    pub submission_code: String,
    pub module_slug: String,
    pub question_slug: String,
    pub choice_id: Uuid,
}

pub struct SubmitAnswer<'a> {
    submission_reader: &'a dyn SubmissionReader,
    uow: &'a dyn SubmissionUnitOfWork,
    module_acl: &'a dyn ModuleAcl,
}

impl<'a> SubmitAnswer<'a> {
    pub fn new(
        submission_reader: &'a dyn SubmissionReader,
        uow: &'a dyn SubmissionUnitOfWork,
        module_acl: &'a dyn ModuleAcl,
    ) -> Self {
        Self {
            submission_reader,
            uow,
            module_acl,
        }
    }

    pub async fn execute(
        &self,
        command: SubmitAnswerCommand,
    ) -> Result<SubmitAnswerResponse, SubmissionError> {
        let mut submission = self
            .submission_reader
            .find_by_code(&command.submission_code)
            .await?;

        if !submission.is_in_progress() {
            return Err(SubmissionError::SubmissionAlreadyDone);
        }

        // Checked before any cross-context lookup.
        if submission.has_answered_question(&command.question_slug) {
            return Err(SubmissionError::DuplicateAnswer);
        }

        let module =
            resolve_own_module(self.module_acl, &command.module_slug, &submission).await?;

        let question = self
            .module_acl
            .get_question_by_slug(&module.slug, &command.question_slug)
            .await?;

        let submitted_choice = question
            .choice_by_id(command.choice_id)
            .ok_or(SubmissionError::ChoiceNotFound)?;

        let correct_choice = self
            .module_acl
            .get_correct_answer(&module.slug, &question.slug)
            .await?;

        let is_correct = submitted_choice.id == correct_choice.id;

        let answer = SubmissionAnswer::new(
            submission.id,
            question.slug.clone(),
            question.content.clone(),
            submitted_choice.content.clone(),
            is_correct,
        );
        submission.add_answer(answer)?;

        save_submission(self.uow, &submission).await?;

        tracing::debug!(
            "Submission {} answered {} (correct: {})",
            submission.code,
            question.slug,
            is_correct
        );

        let next_question_slug = self
            .module_acl
            .get_next_question_slug(&module.slug, &question.slug)
            .await?;

        Ok(SubmitAnswerResponse {
            is_correct,
            correct_choice_id: correct_choice.id,
            correct_choice_content: correct_choice.content,
            next_question_slug,
        })
    }
}

#[derive(Debug, Clone)]
pub struct FinalizeSubmissionCommand {
    pub submission_code: String,
    pub module_slug: String,
}

pub struct FinalizeSubmission<'a> {
    submission_reader: &'a dyn SubmissionReader,
    uow: &'a dyn SubmissionUnitOfWork,
    module_acl: &'a dyn ModuleAcl,
}

impl<'a> FinalizeSubmission<'a> {
    pub fn new(
        submission_reader: &'a dyn SubmissionReader,
        uow: &'a dyn SubmissionUnitOfWork,
        module_acl: &'a dyn ModuleAcl,
    ) -> Self {
        Self {
            submission_reader,
            uow,
            module_acl,
        }
    }

    pub async fn execute(
        &self,
        command: FinalizeSubmissionCommand,
    ) -> Result<FinalizeSubmissionResponse, SubmissionError> {
        let mut submission = self
            .submission_reader
            .find_by_code(&command.submission_code)
            .await?;

        if !submission.is_in_progress() {
            return Err(SubmissionError::SubmissionAlreadyDone);
        }

        resolve_own_module(self.module_acl, &command.module_slug, &submission).await?;

        submission.finalize()?;
        save_submission(self.uow, &submission).await?;

        tracing::info!(
            "Submission {} finalized with score {}/{}",
            submission.code,
            submission.score(),
            submission.total_questions
        );

        Ok(FinalizeSubmissionResponse {
            student_name: submission.student_name.clone(),
            score: submission.score(),
            total: submission.total_questions,
            status: submission.status,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CancelSubmissionCommand {
    pub submission_code: String,
    pub module_slug: String,
}

pub struct CancelSubmission<'a> {
    submission_reader: &'a dyn SubmissionReader,
    uow: &'a dyn SubmissionUnitOfWork,
    module_acl: &'a dyn ModuleAcl,
}

impl<'a> CancelSubmission<'a> {
    pub fn new(
        submission_reader: &'a dyn SubmissionReader,
        uow: &'a dyn SubmissionUnitOfWork,
        module_acl: &'a dyn ModuleAcl,
    ) -> Self {
        Self {
            submission_reader,
            uow,
            module_acl,
        }
    }

    pub async fn execute(
        &self,
        command: CancelSubmissionCommand,
    ) -> Result<CancelSubmissionResponse, SubmissionError> {
        let mut submission = self
            .submission_reader
            .find_by_code(&command.submission_code)
            .await?;

        resolve_own_module(self.module_acl, &command.module_slug, &submission).await?;

        submission.cancel()?;
        save_submission(self.uow, &submission).await?;

        tracing::info!("Submission {} canceled", submission.code);

        Ok(CancelSubmissionResponse {
            code: submission.code.clone(),
            status: submission.status,
        })
    }
}

pub struct FindAllSubmissions<'a> {
    submission_reader: &'a dyn SubmissionReader,
    module_acl: &'a dyn ModuleAcl,
}

impl<'a> FindAllSubmissions<'a> {
    pub fn new(submission_reader: &'a dyn SubmissionReader, module_acl: &'a dyn ModuleAcl) -> Self {
        Self {
            submission_reader,
            module_acl,
        }
    }

    /// Published modules, each with its submitted submissions.
    pub async fn execute(
        &self,
        keyword: Option<&str>,
    ) -> Result<Vec<ModuleSubmissionGroup>, SubmissionError> {
        let keyword = keyword.map(str::trim).filter(|k| !k.is_empty());
        let modules = self.module_acl.get_all_published_modules(keyword).await?;

        if modules.is_empty() {
            return Ok(Vec::new());
        }

        let module_ids: Vec<Uuid> = modules.iter().map(|m| m.id).collect();
        let mut by_module = self
            .submission_reader
            .find_all_submitted_grouped_by_module(&module_ids)
            .await?;

        let groups = modules
            .into_iter()
            .map(|module| {
                let submissions = by_module.remove(&module.id).unwrap_or_default();
                let summaries: Vec<SubmissionSummary> = submissions
                    .iter()
                    .map(|s| SubmissionSummary {
                        student_name: s.student_name.clone(),
                        total_correct: s.score(),
                        total_questions: s.total_questions,
                        submitted_at: s
                            .submitted_at
                            .map(|at| at.format(SUBMITTED_AT_FORMAT).to_string())
                            .unwrap_or_default(),
                    })
                    .collect();

                ModuleSubmissionGroup {
                    module: ModuleWithRelations {
                        id: module.id,
                        title: module.title,
                        slug: module.slug,
                        grade: module.grade.map(|g| NamedRef {
                            id: g.id,
                            name: g.name,
                        }),
                        subject: module.subject.map(|s| NamedRef {
                            id: s.id,
                            name: s.name,
                        }),
                    },
                    total_submissions: summaries.len(),
                    submissions: summaries,
                }
            })
            .collect();

        Ok(groups)
    }
}

pub struct CountSubmittedSubmissions<'a> {
    submission_reader: &'a dyn SubmissionReader,
}

impl<'a> CountSubmittedSubmissions<'a> {
    pub fn new(submission_reader: &'a dyn SubmissionReader) -> Self {
        Self { submission_reader }
    }

    pub async fn execute(&self) -> Result<i64, SubmissionError> {
        self.submission_reader.count_submitted().await
    }
}
