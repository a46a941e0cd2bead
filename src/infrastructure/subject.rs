// src/infrastructure/subject.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{contains_pattern, violates_constraint};
use crate::{
    domain::{
        lifecycle::{Change, Tracked},
        subject::{
            SubjectError,
            entity::Subject,
            repository::{SubjectReader, SubjectWriter},
        },
    },
    models::subject::SubjectRow,
};

const NAME_CONSTRAINT: &str = "subjects_user_name_live_key";

impl From<SubjectRow> for Subject {
    fn from(row: SubjectRow) -> Self {
        Subject {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            description: row.description,
        }
    }
}

fn map_write_error(err: sqlx::Error) -> SubjectError {
    if violates_constraint(&err, NAME_CONSTRAINT) {
        SubjectError::AlreadyExists
    } else {
        tracing::error!("Failed to save subject: {:?}", err);
        SubjectError::Storage(err)
    }
}

/// Subject reader and writer over the pool.
#[derive(Clone)]
pub struct PgSubjectRepository {
    pool: PgPool,
}

impl PgSubjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubjectReader for PgSubjectRepository {
    async fn has_similar_subject(
        &self,
        name: &str,
        user_id: Uuid,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, SubjectError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM subjects
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

    async fn is_subject_exist(&self, subject_id: Uuid, user_id: Uuid) -> Result<bool, SubjectError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM subjects WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL)",
        )
        .bind(subject_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn find_by_id(&self, subject_id: Uuid, user_id: Uuid) -> Result<Tracked<Subject>, SubjectError> {
        let row = sqlx::query_as::<_, SubjectRow>(
            r#"
            SELECT id, user_id, name, description
            FROM subjects
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(subject_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(SubjectError::NotFound)?;

        Ok(Tracked::loaded(Subject::from(row)))
    }

    async fn find_by_ids(&self, subject_ids: &[Uuid], user_id: Uuid) -> Result<Vec<Subject>, SubjectError> {
        let rows = sqlx::query_as::<_, SubjectRow>(
            r#"
            SELECT id, user_id, name, description
            FROM subjects
            WHERE id = ANY($1) AND user_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(subject_ids)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Subject::from).collect())
    }

    async fn count_by_user(&self, user_id: Uuid) -> Result<i64, SubjectError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM subjects WHERE user_id = $1 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn all_subjects(&self, user_id: Uuid, keyword: Option<&str>) -> Result<Vec<Subject>, SubjectError> {
        let rows = sqlx::query_as::<_, SubjectRow>(
            r#"
            SELECT id, user_id, name, description
            FROM subjects
            WHERE user_id = $1 AND deleted_at IS NULL
              AND ($2::TEXT IS NULL OR name ILIKE $2)
            ORDER BY name
            "#,
        )
        .bind(user_id)
        .bind(keyword.map(contains_pattern))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Subject::from).collect())
    }
}

#[async_trait]
impl SubjectWriter for PgSubjectRepository {
    async fn save(&self, subject: &Tracked<Subject>) -> Result<(), SubjectError> {
        match subject.change() {
            Some(Change::Updated) => {
                sqlx::query(
                    r#"
                    UPDATE subjects SET name = $2, description = $3, updated_at = NOW()
                    WHERE id = $1 AND deleted_at IS NULL
                    "#,
                )
                .bind(subject.id)
                .bind(&subject.name)
                .bind(&subject.description)
                .execute(&self.pool)
                .await
                .map_err(map_write_error)?;
            }
            Some(Change::Removed) => {
                sqlx::query(
                    "UPDATE subjects SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
                )
                .bind(subject.id)
                .execute(&self.pool)
                .await
                .map_err(map_write_error)?;
            }
            None | Some(Change::Created) => {
                sqlx::query(
                    "INSERT INTO subjects (id, user_id, name, description) VALUES ($1, $2, $3, $4)",
                )
                .bind(subject.id)
                .bind(subject.user_id)
                .bind(&subject.name)
                .bind(&subject.description)
                .execute(&self.pool)
                .await
                .map_err(map_write_error)?;
            }
        }

        Ok(())
    }
}
