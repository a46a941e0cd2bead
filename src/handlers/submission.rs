// src/handlers/submission.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    domain::submission::service::{
        CancelSubmission, CancelSubmissionCommand, FinalizeSubmission, FinalizeSubmissionCommand,
        FindAllSubmissions, StartSubmission, StartSubmissionCommand, SubmitAnswer,
        SubmitAnswerCommand,
    },
    error::AppError,
    infrastructure::submission::{ModuleAclAdapter, PgSubmissionReader, PgSubmissionUnitOfWork},
    models::submission::{KeywordQuery, StartSubmissionRequest, SubmitAnswerRequest},
    utils::html::clean_html,
};

/// Starts an anonymous attempt on a published module.
/// The returned code identifies the attempt in every later call.
pub async fn start_submission(
    State(pool): State<PgPool>,
    Path(module_slug): Path<String>,
    Json(payload): Json<StartSubmissionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let uow = PgSubmissionUnitOfWork::new(pool.clone());
    let module_acl = ModuleAclAdapter::new(pool);

    let started = StartSubmission::new(&uow, &module_acl)
        .execute(StartSubmissionCommand {
            module_slug,
            student_name: clean_html(payload.student_name.trim()),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(started)))
}

pub async fn submit_answer(
    State(pool): State<PgPool>,
    Path((module_slug, code)): Path<(String, String)>,
    Json(payload): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let reader = PgSubmissionReader::new(pool.clone());
    let uow = PgSubmissionUnitOfWork::new(pool.clone());
    let module_acl = ModuleAclAdapter::new(pool);

    let result = SubmitAnswer::new(&reader, &uow, &module_acl)
        .execute(SubmitAnswerCommand {
            submission_code: code,
            module_slug,
            question_slug: payload.question_slug,
            choice_id: payload.choice_id,
        })
        .await?;

    Ok(Json(result))
}

pub async fn finalize_submission(
    State(pool): State<PgPool>,
    Path((module_slug, code)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let reader = PgSubmissionReader::new(pool.clone());
    let uow = PgSubmissionUnitOfWork::new(pool.clone());
    let module_acl = ModuleAclAdapter::new(pool);

    let result = FinalizeSubmission::new(&reader, &uow, &module_acl)
        .execute(FinalizeSubmissionCommand {
            submission_code: code,
            module_slug,
        })
        .await?;

    Ok(Json(result))
}

pub async fn cancel_submission(
    State(pool): State<PgPool>,
    Path((module_slug, code)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let reader = PgSubmissionReader::new(pool.clone());
    let uow = PgSubmissionUnitOfWork::new(pool.clone());
    let module_acl = ModuleAclAdapter::new(pool);

    let result = CancelSubmission::new(&reader, &uow, &module_acl)
        .execute(CancelSubmissionCommand {
            submission_code: code,
            module_slug,
        })
        .await?;

    Ok(Json(result))
}

/// Dashboard listing: published modules with their submitted attempts.
pub async fn list_submissions(
    State(pool): State<PgPool>,
    Query(params): Query<KeywordQuery>,
) -> Result<impl IntoResponse, AppError> {
    let reader = PgSubmissionReader::new(pool.clone());
    let module_acl = ModuleAclAdapter::new(pool);

    let groups = FindAllSubmissions::new(&reader, &module_acl)
        .execute(params.keyword.as_deref())
        .await?;

    Ok(Json(groups))
}
