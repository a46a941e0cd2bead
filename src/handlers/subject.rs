// src/handlers/subject.rs

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::subject::service::{SubjectCommand, SubjectService},
    error::AppError,
    infrastructure::subject::PgSubjectRepository,
    models::{subject::SubjectRequest, submission::KeywordQuery},
    utils::{
        html::{clean_html, clean_optional_html},
        jwt::Claims,
    },
};

fn command(user_id: Uuid, payload: SubjectRequest) -> Result<SubjectCommand, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    Ok(SubjectCommand {
        user_id,
        name: clean_html(payload.name.trim()),
        description: clean_optional_html(payload.description.as_deref()),
    })
}

pub async fn list_subjects(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<KeywordQuery>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let repository = PgSubjectRepository::new(pool);

    let subjects = SubjectService::new(&repository, &repository)
        .find_all(user_id, params.keyword.as_deref())
        .await?;

    Ok(Json(subjects))
}

pub async fn create_subject(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SubjectRequest>,
) -> Result<impl IntoResponse, AppError> {
    let command = command(claims.user_id()?, payload)?;
    let repository = PgSubjectRepository::new(pool);

    let subject = SubjectService::new(&repository, &repository)
        .create(command)
        .await?;

    Ok((StatusCode::CREATED, Json(subject)))
}

pub async fn get_subject(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let repository = PgSubjectRepository::new(pool);

    let subject = SubjectService::new(&repository, &repository)
        .find_detail(id, user_id)
        .await?;

    Ok(Json(subject))
}

pub async fn update_subject(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubjectRequest>,
) -> Result<impl IntoResponse, AppError> {
    let command = command(claims.user_id()?, payload)?;
    let repository = PgSubjectRepository::new(pool);

    let subject = SubjectService::new(&repository, &repository)
        .update(id, command)
        .await?;

    Ok(Json(subject))
}

pub async fn delete_subject(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let repository = PgSubjectRepository::new(pool);

    SubjectService::new(&repository, &repository)
        .delete(id, user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
