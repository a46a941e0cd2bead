// src/handlers/dashboard.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use sqlx::PgPool;

use crate::{
    domain::dashboard::service::GetDashboardStatistics,
    error::AppError,
    infrastructure::dashboard::{GradeCounter, ModuleCounter, SubjectCounter, SubmissionCounter},
    utils::jwt::Claims,
};

/// Totals shown on the instructor's dashboard.
pub async fn get_statistics(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let modules = ModuleCounter::new(pool.clone());
    let subjects = SubjectCounter::new(pool.clone());
    let grades = GradeCounter::new(pool.clone());
    let submissions = SubmissionCounter::new(pool);

    let statistics = GetDashboardStatistics::new(&modules, &subjects, &grades, &submissions)
        .execute(user_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load dashboard statistics: {:?}", e);
            AppError::from(e)
        })?;

    Ok(Json(statistics))
}
