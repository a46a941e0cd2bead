// src/infrastructure/module/reader.rs

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    domain::{
        lifecycle::Tracked,
        module::{
            ModuleError,
            entity::{Choice, Module, ModuleType, Question},
            repository::{ModuleFilter, ModuleListing, ModuleReader},
        },
    },
    infrastructure::contains_pattern,
    models::module::{ChoiceRow, ModuleListingRow, ModuleRow, QuestionRow},
};

const MODULE_COLUMNS: &str =
    "m.id, m.user_id, m.subject_id, m.grade_id, m.title, m.slug, m.description, m.type, m.is_published";

impl From<ModuleRow> for Module {
    fn from(row: ModuleRow) -> Self {
        Module {
            id: row.id,
            user_id: row.user_id,
            subject_id: row.subject_id,
            grade_id: row.grade_id,
            title: row.title,
            slug: row.slug,
            description: row.description,
            // Only one module type exists.
            module_type: ModuleType::MultipleChoice,
            is_published: row.is_published,
            questions: Vec::new(),
        }
    }
}

impl From<QuestionRow> for Question {
    fn from(row: QuestionRow) -> Self {
        Question {
            id: row.id,
            module_id: row.module_id,
            content: row.content,
            slug: row.slug,
            choices: Vec::new(),
        }
    }
}

impl From<ChoiceRow> for Choice {
    fn from(row: ChoiceRow) -> Self {
        Choice {
            id: row.id,
            question_id: row.question_id,
            content: row.content,
            is_correct_answer: row.is_correct_answer,
        }
    }
}

#[derive(Clone)]
pub struct PgModuleReader {
    pool: PgPool,
}

impl PgModuleReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Live choices of the given questions, grouped by question id.
    async fn choices_for(
        &self,
        question_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Tracked<Choice>>>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ChoiceRow>(
            r#"
            SELECT id, question_id, content, is_correct_answer
            FROM question_choices
            WHERE question_id = ANY($1) AND deleted_at IS NULL
            ORDER BY created_at, id
            "#,
        )
        .bind(question_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<Tracked<Choice>>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.question_id)
                .or_default()
                .push(Tracked::loaded(Choice::from(row)));
        }
        Ok(grouped)
    }

    async fn with_choices(&self, row: QuestionRow) -> Result<Question, sqlx::Error> {
        let mut question = Question::from(row);
        question.choices = self
            .choices_for(&[question.id])
            .await?
            .remove(&question.id)
            .unwrap_or_default();
        Ok(question)
    }

    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &ModuleFilter) {
        builder.push(" WHERE m.deleted_at IS NULL AND m.user_id = ");
        builder.push_bind(filter.user_id);

        if let Some(subject_id) = filter.subject_id {
            builder.push(" AND m.subject_id = ");
            builder.push_bind(subject_id);
        }

        if let Some(grade_id) = filter.grade_id {
            builder.push(" AND m.grade_id = ");
            builder.push_bind(grade_id);
        }

        if let Some(keyword) = &filter.keyword {
            builder.push(" AND m.title ILIKE ");
            builder.push_bind(contains_pattern(keyword));
        }
    }
}

#[async_trait]
impl ModuleReader for PgModuleReader {
    async fn find_by_slug(
        &self,
        slug: &str,
        user_id: Uuid,
    ) -> Result<Tracked<Module>, ModuleError> {
        let row = sqlx::query_as::<_, ModuleRow>(&format!(
            "SELECT {MODULE_COLUMNS} FROM modules m WHERE m.slug = $1 AND m.user_id = $2 AND m.deleted_at IS NULL"
        ))
        .bind(slug)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ModuleError::ModuleNotFound)?;

        Ok(Tracked::loaded(Module::from(row)))
    }

    async fn find_detail_by_slug(
        &self,
        slug: &str,
        user_id: Uuid,
    ) -> Result<Tracked<Module>, ModuleError> {
        let module = self.find_by_slug(slug, user_id).await?.into_inner();

        let question_rows = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT id, module_id, content, slug
            FROM questions
            WHERE module_id = $1 AND deleted_at IS NULL
            ORDER BY position
            "#,
        )
        .bind(module.id)
        .fetch_all(&self.pool)
        .await?;

        let question_ids: Vec<Uuid> = question_rows.iter().map(|q| q.id).collect();
        let mut choices = self.choices_for(&question_ids).await?;

        let questions = question_rows
            .into_iter()
            .map(|row| {
                let mut question = Question::from(row);
                question.choices = choices.remove(&question.id).unwrap_or_default();
                Tracked::loaded(question)
            })
            .collect();

        Ok(Tracked::loaded(Module { questions, ..module }))
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Module, ModuleError> {
        let row = sqlx::query_as::<_, ModuleRow>(&format!(
            "SELECT {MODULE_COLUMNS} FROM modules m WHERE m.slug = $1 AND m.is_published AND m.deleted_at IS NULL"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ModuleError::ModuleNotFound)?;

        Ok(Module::from(row))
    }

    async fn find_published_question(
        &self,
        module_slug: &str,
        question_slug: &str,
    ) -> Result<Question, ModuleError> {
        let row = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT q.id, q.module_id, q.content, q.slug
            FROM questions q
            JOIN modules m ON m.id = q.module_id
            WHERE m.slug = $1 AND m.is_published AND m.deleted_at IS NULL
              AND q.slug = $2 AND q.deleted_at IS NULL
            "#,
        )
        .bind(module_slug)
        .bind(question_slug)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ModuleError::QuestionNotFound)?;

        Ok(self.with_choices(row).await?)
    }

    async fn find_next_published_question(
        &self,
        module_slug: &str,
        current_question_slug: &str,
    ) -> Result<Option<Question>, ModuleError> {
        let row = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT q.id, q.module_id, q.content, q.slug
            FROM questions q
            JOIN modules m ON m.id = q.module_id
            JOIN questions cur ON cur.module_id = q.module_id
            WHERE m.slug = $1 AND m.is_published AND m.deleted_at IS NULL
              AND cur.slug = $2
              AND q.deleted_at IS NULL
              AND q.position > cur.position
            ORDER BY q.position
            LIMIT 1
            "#,
        )
        .bind(module_slug)
        .bind(current_question_slug)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.with_choices(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_first_published_question(
        &self,
        module_slug: &str,
    ) -> Result<Option<Question>, ModuleError> {
        let row = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT q.id, q.module_id, q.content, q.slug
            FROM questions q
            JOIN modules m ON m.id = q.module_id
            WHERE m.slug = $1 AND m.is_published AND m.deleted_at IS NULL
              AND q.deleted_at IS NULL
            ORDER BY q.position
            LIMIT 1
            "#,
        )
        .bind(module_slug)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.with_choices(row).await?)),
            None => Ok(None),
        }
    }

    async fn count_questions_by_module_slug(&self, module_slug: &str) -> Result<i64, ModuleError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(q.id)
            FROM questions q
            JOIN modules m ON m.id = q.module_id
            WHERE m.slug = $1 AND m.deleted_at IS NULL AND q.deleted_at IS NULL
            "#,
        )
        .bind(module_slug)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn count_by_user(&self, user_id: Uuid) -> Result<i64, ModuleError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM modules WHERE user_id = $1 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn total_modules(&self, filter: &ModuleFilter) -> Result<i64, ModuleError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM modules m");
        Self::push_filters(&mut builder, filter);

        let count: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn find_all_modules(
        &self,
        filter: &ModuleFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ModuleListing>, ModuleError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            r#"
            SELECT {MODULE_COLUMNS},
                (SELECT COUNT(*) FROM questions q
                 WHERE q.module_id = m.id AND q.deleted_at IS NULL) AS questions_count
            FROM modules m
            "#
        ));
        Self::push_filters(&mut builder, filter);
        builder.push(" ORDER BY m.created_at DESC LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let rows: Vec<ModuleListingRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| ModuleListing {
                module: Module::from(row.module),
                questions_count: row.questions_count,
            })
            .collect())
    }
}
