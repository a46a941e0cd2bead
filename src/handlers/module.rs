// src/handlers/module.rs

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    domain::module::service::{
        AddQuestion, AddQuestionChoice, AddQuestions, AddQuestionsCommand, CreateModule,
        CreateModuleCommand, DeleteModule, FindAllModules, FindAllModulesCommand,
        FindDetailModule, FindPublishedModule, FindPublishedQuestion, RemoveQuestion,
        TogglePublishModule,
    },
    error::AppError,
    infrastructure::module::{
        GradeAclAdapter, PgModuleReader, PgModuleUnitOfWork, SubjectAclAdapter,
    },
    models::module::{AddQuestionsRequest, CreateModuleRequest, ModuleListQuery},
    utils::{
        html::{clean_html, clean_optional_html},
        jwt::Claims,
    },
};

/// Public landing data of a published module: question count and the slug
/// of the first question.
pub async fn get_published_module(
    State(pool): State<PgPool>,
    Path(module_slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reader = PgModuleReader::new(pool);
    let module = FindPublishedModule::new(&reader).execute(&module_slug).await?;

    Ok(Json(module))
}

/// Public question view. Choices come without correctness.
pub async fn get_published_question(
    State(pool): State<PgPool>,
    Path((module_slug, question_slug)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let reader = PgModuleReader::new(pool);
    let question = FindPublishedQuestion::new(&reader)
        .execute(&module_slug, &question_slug)
        .await?;

    Ok(Json(question))
}

pub async fn list_modules(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<ModuleListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let reader = PgModuleReader::new(pool.clone());
    let subject_acl = SubjectAclAdapter::new(pool.clone());
    let grade_acl = GradeAclAdapter::new(pool);

    let page = FindAllModules::new(&reader, &subject_acl, &grade_acl)
        .execute(FindAllModulesCommand {
            user_id,
            keyword: params.keyword,
            subject_id: params.subject_id,
            grade_id: params.grade_id,
            page: params.page,
            per_page: params.per_page,
        })
        .await?;

    Ok(Json(page))
}

pub async fn create_module(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateModuleRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user_id = claims.user_id()?;

    let uow = PgModuleUnitOfWork::new(pool.clone());
    let subject_acl = SubjectAclAdapter::new(pool.clone());
    let grade_acl = GradeAclAdapter::new(pool);

    let created = CreateModule::new(&uow, &subject_acl, &grade_acl)
        .execute(CreateModuleCommand {
            user_id,
            subject_id: payload.subject_id,
            grade_id: payload.grade_id,
            title: clean_html(&payload.title),
            description: clean_optional_html(payload.description.as_deref()),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_module(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(module_slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let reader = PgModuleReader::new(pool.clone());
    let subject_acl = SubjectAclAdapter::new(pool.clone());
    let grade_acl = GradeAclAdapter::new(pool);

    let detail = FindDetailModule::new(&reader, &subject_acl, &grade_acl)
        .execute(&module_slug, user_id)
        .await?;

    Ok(Json(detail))
}

pub async fn toggle_publish(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(module_slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let reader = PgModuleReader::new(pool.clone());
    let uow = PgModuleUnitOfWork::new(pool);

    let module = TogglePublishModule::new(&reader, &uow)
        .execute(&module_slug, user_id)
        .await?;

    Ok(Json(module))
}

pub async fn delete_module(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(module_slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let reader = PgModuleReader::new(pool.clone());
    let uow = PgModuleUnitOfWork::new(pool);

    DeleteModule::new(&reader, &uow)
        .execute(&module_slug, user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Creates new questions and rewrites the ones carrying an `id`.
pub async fn add_questions(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(module_slug): Path<String>,
    Json(payload): Json<AddQuestionsRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user_id = claims.user_id()?;

    let questions = payload
        .questions
        .into_iter()
        .map(|q| AddQuestion {
            id: q.id,
            content: clean_html(&q.content),
            choices: q
                .choices
                .into_iter()
                .map(|c| AddQuestionChoice {
                    content: clean_html(&c.content),
                    is_correct_answer: c.is_correct_answer,
                })
                .collect(),
        })
        .collect();

    let reader = PgModuleReader::new(pool.clone());
    let uow = PgModuleUnitOfWork::new(pool);

    AddQuestions::new(&reader, &uow)
        .execute(AddQuestionsCommand {
            user_id,
            module_slug,
            questions,
        })
        .await?;

    Ok(StatusCode::CREATED)
}

pub async fn remove_question(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path((module_slug, question_slug)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let reader = PgModuleReader::new(pool.clone());
    let uow = PgModuleUnitOfWork::new(pool);

    RemoveQuestion::new(&reader, &uow)
        .execute(&module_slug, &question_slug, user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
