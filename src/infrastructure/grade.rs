// src/infrastructure/grade.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{contains_pattern, violates_constraint};
use crate::{
    domain::{
        grade::{
            GradeError,
            entity::Grade,
            repository::{GradeReader, GradeWriter},
        },
        lifecycle::{Change, Tracked},
    },
    models::grade::GradeRow,
};

const NAME_CONSTRAINT: &str = "grades_user_name_live_key";

impl From<GradeRow> for Grade {
    fn from(row: GradeRow) -> Self {
        Grade {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            description: row.description,
        }
    }
}

fn map_write_error(err: sqlx::Error) -> GradeError {
    if violates_constraint(&err, NAME_CONSTRAINT) {
        GradeError::AlreadyExists
    } else {
        tracing::error!("Failed to save grade: {:?}", err);
        GradeError::Storage(err)
    }
}

/// Grade reader and writer over the pool. Single-row writes, no unit of work.
#[derive(Clone)]
pub struct PgGradeRepository {
    pool: PgPool,
}

impl PgGradeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GradeReader for PgGradeRepository {
    async fn has_similar_grade(
        &self,
        name: &str,
        user_id: Uuid,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, GradeError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM grades
                WHERE user_id = $1 AND name = $2 AND deleted_at IS NULL
                  AND ($3::UUID IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn is_grade_exist(&self, grade_id: Uuid, user_id: Uuid) -> Result<bool, GradeError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM grades WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL)",
        )
        .bind(grade_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn find_by_id(&self, grade_id: Uuid, user_id: Uuid) -> Result<Tracked<Grade>, GradeError> {
        let row = sqlx::query_as::<_, GradeRow>(
            r#"
            SELECT id, user_id, name, description
            FROM grades
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(grade_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(GradeError::NotFound)?;

        Ok(Tracked::loaded(Grade::from(row)))
    }

    async fn find_by_ids(&self, grade_ids: &[Uuid], user_id: Uuid) -> Result<Vec<Grade>, GradeError> {
        let rows = sqlx::query_as::<_, GradeRow>(
            r#"
            SELECT id, user_id, name, description
            FROM grades
            WHERE id = ANY($1) AND user_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(grade_ids)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Grade::from).collect())
    }

    async fn count_by_user(&self, user_id: Uuid) -> Result<i64, GradeError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM grades WHERE user_id = $1 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn all_grades(&self, user_id: Uuid, keyword: Option<&str>) -> Result<Vec<Grade>, GradeError> {
        let rows = sqlx::query_as::<_, GradeRow>(
            r#"
            SELECT id, user_id, name, description
            FROM grades
            WHERE user_id = $1 AND deleted_at IS NULL
              AND ($2::TEXT IS NULL OR name ILIKE $2)
            ORDER BY name
            "#,
        )
        .bind(user_id)
        .bind(keyword.map(contains_pattern))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Grade::from).collect())
    }
}

#[async_trait]
impl GradeWriter for PgGradeRepository {
    async fn save(&self, grade: &Tracked<Grade>) -> Result<(), GradeError> {
        match grade.change() {
            Some(Change::Updated) => {
                sqlx::query(
                    r#"
                    UPDATE grades SET name = $2, description = $3, updated_at = NOW()
                    WHERE id = $1 AND deleted_at IS NULL
                    "#,
                )
                .bind(grade.id)
                .bind(&grade.name)
                .bind(&grade.description)
                .execute(&self.pool)
                .await
                .map_err(map_write_error)?;
            }
            Some(Change::Removed) => {
                sqlx::query(
                    "UPDATE grades SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
                )
                .bind(grade.id)
                .execute(&self.pool)
                .await
                .map_err(map_write_error)?;
            }
            None | Some(Change::Created) => {
                sqlx::query(
                    "INSERT INTO grades (id, user_id, name, description) VALUES ($1, $2, $3, $4)",
                )
                .bind(grade.id)
                .bind(grade.user_id)
                .bind(&grade.name)
                .bind(&grade.description)
                .execute(&self.pool)
                .await
                .map_err(map_write_error)?;
            }
        }

        Ok(())
    }
}
