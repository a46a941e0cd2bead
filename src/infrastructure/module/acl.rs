// src/infrastructure/module/acl.rs
//
// Subject and grade lookups for the module context, served by the subject
// and grade services.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    domain::{
        grade::{GradeError, service::GradeService},
        module::{
            ModuleError,
            repository::{GradeAcl, SubjectAcl},
        },
        subject::{SubjectError, service::SubjectService},
    },
    infrastructure::{grade::PgGradeRepository, subject::PgSubjectRepository},
};

fn from_subject_error(err: SubjectError) -> ModuleError {
    match err {
        SubjectError::NotFound => ModuleError::SubjectNotFound,
        SubjectError::Storage(e) => ModuleError::Storage(e),
        other => ModuleError::Upstream(other.to_string()),
    }
}

fn from_grade_error(err: GradeError) -> ModuleError {
    match err {
        GradeError::NotFound => ModuleError::GradeNotFound,
        GradeError::Storage(e) => ModuleError::Storage(e),
        other => ModuleError::Upstream(other.to_string()),
    }
}

#[derive(Clone)]
pub struct SubjectAclAdapter {
    repository: PgSubjectRepository,
}

impl SubjectAclAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgSubjectRepository::new(pool),
        }
    }

    fn service(&self) -> SubjectService<'_> {
        SubjectService::new(&self.repository, &self.repository)
    }
}

#[async_trait]
impl SubjectAcl for SubjectAclAdapter {
    async fn is_subject_exist(&self, subject_id: Uuid, user_id: Uuid) -> Result<bool, ModuleError> {
        self.service()
            .check_existence(subject_id, user_id)
            .await
            .map_err(from_subject_error)
    }

    async fn get_subject_name(
        &self,
        subject_id: Uuid,
        user_id: Uuid,
    ) -> Result<String, ModuleError> {
        let subject = self
            .service()
            .find_detail(subject_id, user_id)
            .await
            .map_err(from_subject_error)?;
        Ok(subject.name)
    }

    async fn get_subject_names(
        &self,
        subject_ids: &[Uuid],
        user_id: Uuid,
    ) -> Result<HashMap<Uuid, String>, ModuleError> {
        self.service()
            .get_names(subject_ids, user_id)
            .await
            .map_err(from_subject_error)
    }
}

#[derive(Clone)]
pub struct GradeAclAdapter {
    repository: PgGradeRepository,
}

impl GradeAclAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgGradeRepository::new(pool),
        }
    }

    fn service(&self) -> GradeService<'_> {
        GradeService::new(&self.repository, &self.repository)
    }
}

#[async_trait]
impl GradeAcl for GradeAclAdapter {
    async fn is_grade_exist(&self, grade_id: Uuid, user_id: Uuid) -> Result<bool, ModuleError> {
        self.service()
            .check_existence(grade_id, user_id)
            .await
            .map_err(from_grade_error)
    }

    async fn get_grade_name(&self, grade_id: Uuid, user_id: Uuid) -> Result<String, ModuleError> {
        let grade = self
            .service()
            .find_detail(grade_id, user_id)
            .await
            .map_err(from_grade_error)?;
        Ok(grade.name)
    }

    async fn get_grade_names(
        &self,
        grade_ids: &[Uuid],
        user_id: Uuid,
    ) -> Result<HashMap<Uuid, String>, ModuleError> {
        self.service()
            .get_names(grade_ids, user_id)
            .await
            .map_err(from_grade_error)
    }
}
