// src/domain/subject/service.rs

use std::collections::HashMap;

use uuid::Uuid;

use super::{
    entity::Subject,
    error::SubjectError,
    repository::{SubjectReader, SubjectWriter},
    response::SubjectResponse,
};

#[derive(Debug, Clone)]
pub struct SubjectCommand {
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

/// Owner-scoped subject use cases. Names are unique per owner among live subjects.
pub struct SubjectService<'a> {
    reader: &'a dyn SubjectReader,
    writer: &'a dyn SubjectWriter,
}

impl<'a> SubjectService<'a> {
    pub fn new(reader: &'a dyn SubjectReader, writer: &'a dyn SubjectWriter) -> Self {
        Self { reader, writer }
    }

    pub async fn create(&self, command: SubjectCommand) -> Result<SubjectResponse, SubjectError> {
        if self
            .reader
            .has_similar_subject(&command.name, command.user_id, None)
            .await?
        {
            return Err(SubjectError::AlreadyExists);
        }

        let subject = Subject::new(command.user_id, command.name, command.description);
        self.writer.save(&subject).await?;

        tracing::info!("Subject {} created by {}", subject.id, subject.user_id);
        Ok(SubjectResponse::from(&*subject))
    }

    pub async fn update(
        &self,
        subject_id: Uuid,
        command: SubjectCommand,
    ) -> Result<SubjectResponse, SubjectError> {
        let mut subject = self.reader.find_by_id(subject_id, command.user_id).await?;

        if self
            .reader
            .has_similar_subject(&command.name, command.user_id, Some(subject_id))
            .await?
        {
            return Err(SubjectError::AlreadyExists);
        }

        subject.rename(command.name, command.description);
        self.writer.save(&subject).await?;

        Ok(SubjectResponse::from(&*subject))
    }

    pub async fn delete(&self, subject_id: Uuid, user_id: Uuid) -> Result<(), SubjectError> {
        let mut subject = self.reader.find_by_id(subject_id, user_id).await?;

        subject.mark_remove();
        self.writer.save(&subject).await?;

        tracing::info!("Subject {} deleted", subject_id);
        Ok(())
    }

    pub async fn find_all(
        &self,
        user_id: Uuid,
        keyword: Option<&str>,
    ) -> Result<Vec<SubjectResponse>, SubjectError> {
        let keyword = keyword.map(str::trim).filter(|k| !k.is_empty());
        let subjects = self.reader.all_subjects(user_id, keyword).await?;
        Ok(subjects.iter().map(SubjectResponse::from).collect())
    }

    pub async fn find_detail(
        &self,
        subject_id: Uuid,
        user_id: Uuid,
    ) -> Result<SubjectResponse, SubjectError> {
        let subject = self.reader.find_by_id(subject_id, user_id).await?;
        Ok(SubjectResponse::from(&*subject))
    }

    pub async fn check_existence(&self, subject_id: Uuid, user_id: Uuid) -> Result<bool, SubjectError> {
        self.reader.is_subject_exist(subject_id, user_id).await
    }

    /// Names of the given subjects. Unknown ids are left out.
    pub async fn get_names(
        &self,
        subject_ids: &[Uuid],
        user_id: Uuid,
    ) -> Result<HashMap<Uuid, String>, SubjectError> {
        if subject_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let subjects = self.reader.find_by_ids(subject_ids, user_id).await?;
        Ok(subjects.into_iter().map(|s| (s.id, s.name)).collect())
    }

    pub async fn count_by_user(&self, user_id: Uuid) -> Result<i64, SubjectError> {
        self.reader.count_by_user(user_id).await
    }
}
