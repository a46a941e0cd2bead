// src/domain/grade/service.rs

use std::collections::HashMap;

use uuid::Uuid;

use super::{
    entity::Grade,
    error::GradeError,
    repository::{GradeReader, GradeWriter},
    response::GradeResponse,
};

#[derive(Debug, Clone)]
pub struct GradeCommand {
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

/// Owner-scoped grade use cases. Names are unique per owner among live grades.
pub struct GradeService<'a> {
    reader: &'a dyn GradeReader,
    writer: &'a dyn GradeWriter,
}

impl<'a> GradeService<'a> {
    pub fn new(reader: &'a dyn GradeReader, writer: &'a dyn GradeWriter) -> Self {
        Self { reader, writer }
    }

    pub async fn create(&self, command: GradeCommand) -> Result<GradeResponse, GradeError> {
        if self
            .reader
            .has_similar_grade(&command.name, command.user_id, None)
            .await?
        {
            return Err(GradeError::AlreadyExists);
        }

        let grade = Grade::new(command.user_id, command.name, command.description);
        self.writer.save(&grade).await?;

        tracing::info!("Grade {} created by {}", grade.id, grade.user_id);
        Ok(GradeResponse::from(&*grade))
    }

    pub async fn update(
        &self,
        grade_id: Uuid,
        command: GradeCommand,
    ) -> Result<GradeResponse, GradeError> {
        let mut grade = self.reader.find_by_id(grade_id, command.user_id).await?;

        if self
            .reader
            .has_similar_grade(&command.name, command.user_id, Some(grade_id))
            .await?
        {
            return Err(GradeError::AlreadyExists);
        }

        grade.rename(command.name, command.description);
        self.writer.save(&grade).await?;

        Ok(GradeResponse::from(&*grade))
    }

    pub async fn delete(&self, grade_id: Uuid, user_id: Uuid) -> Result<(), GradeError> {
        let mut grade = self.reader.find_by_id(grade_id, user_id).await?;

        grade.mark_remove();
        self.writer.save(&grade).await?;

        tracing::info!("Grade {} deleted", grade_id);
        Ok(())
    }

    pub async fn find_all(
        &self,
        user_id: Uuid,
        keyword: Option<&str>,
    ) -> Result<Vec<GradeResponse>, GradeError> {
        let keyword = keyword.map(str::trim).filter(|k| !k.is_empty());
        let grades = self.reader.all_grades(user_id, keyword).await?;
        Ok(grades.iter().map(GradeResponse::from).collect())
    }

    pub async fn find_detail(
        &self,
        grade_id: Uuid,
        user_id: Uuid,
    ) -> Result<GradeResponse, GradeError> {
        let grade = self.reader.find_by_id(grade_id, user_id).await?;
        Ok(GradeResponse::from(&*grade))
    }

    pub async fn check_existence(&self, grade_id: Uuid, user_id: Uuid) -> Result<bool, GradeError> {
        self.reader.is_grade_exist(grade_id, user_id).await
    }

    /// Names of the given grades. Unknown ids are left out.
    pub async fn get_names(
        &self,
        grade_ids: &[Uuid],
        user_id: Uuid,
    ) -> Result<HashMap<Uuid, String>, GradeError> {
        if grade_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let grades = self.reader.find_by_ids(grade_ids, user_id).await?;
        Ok(grades.into_iter().map(|g| (g.id, g.name)).collect())
    }

    pub async fn count_by_user(&self, user_id: Uuid) -> Result<i64, GradeError> {
        self.reader.count_by_user(user_id).await
    }
}
