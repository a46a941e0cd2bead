// src/handlers/grade.rs

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
    domain::grade::service::{GradeCommand, GradeService},
    error::AppError,
    infrastructure::grade::PgGradeRepository,
    models::{grade::GradeRequest, submission::KeywordQuery},
    utils::{
        html::{clean_html, clean_optional_html},
        jwt::Claims,
    },
};

fn command(user_id: Uuid, payload: GradeRequest) -> Result<GradeCommand, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    Ok(GradeCommand {
        user_id,
        name: clean_html(payload.name.trim()),
        description: clean_optional_html(payload.description.as_deref()),
    })
}

pub async fn list_grades(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<KeywordQuery>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let repository = PgGradeRepository::new(pool);

    let grades = GradeService::new(&repository, &repository)
        .find_all(user_id, params.keyword.as_deref())
        .await?;

    Ok(Json(grades))
}

pub async fn create_grade(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<GradeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let command = command(claims.user_id()?, payload)?;
    let repository = PgGradeRepository::new(pool);

    let grade = GradeService::new(&repository, &repository)
        .create(command)
        .await?;

    Ok((StatusCode::CREATED, Json(grade)))
}

pub async fn get_grade(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let repository = PgGradeRepository::new(pool);

    let grade = GradeService::new(&repository, &repository)
        .find_detail(id, user_id)
        .await?;

    Ok(Json(grade))
}

pub async fn update_grade(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GradeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let command = command(claims.user_id()?, payload)?;
    let repository = PgGradeRepository::new(pool);

    let grade = GradeService::new(&repository, &repository)
        .update(id, command)
        .await?;

    Ok(Json(grade))
}

pub async fn delete_grade(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let repository = PgGradeRepository::new(pool);

    GradeService::new(&repository, &repository)
        .delete(id, user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
