// src/infrastructure/dashboard.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    domain::{
        dashboard::{
            error::DashboardError,
            repository::{GradeAcl, ModuleAcl, SubjectAcl, SubmissionAcl},
        },
        grade::{GradeError, service::GradeService},
        module::{ModuleError, service::CountModulesByUser},
        subject::{SubjectError, service::SubjectService},
        submission::{SubmissionError, service::CountSubmittedSubmissions},
    },
    infrastructure::{
        grade::PgGradeRepository, module::PgModuleReader, subject::PgSubjectRepository,
        submission::PgSubmissionReader,
    },
};

fn upstream(context: &str, err: impl std::fmt::Display) -> DashboardError {
    tracing::warn!("Dashboard count from {} failed: {}", context, err);
    DashboardError::Upstream(err.to_string())
}

#[derive(Clone)]
pub struct ModuleCounter {
    reader: PgModuleReader,
}

impl ModuleCounter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            reader: PgModuleReader::new(pool),
        }
    }
}

#[async_trait]
impl ModuleAcl for ModuleCounter {
    async fn count_modules(&self, user_id: Uuid) -> Result<i64, DashboardError> {
        CountModulesByUser::new(&self.reader)
            .execute(user_id)
            .await
            .map_err(|err| match err {
                ModuleError::Storage(e) => DashboardError::Storage(e),
                other => upstream("modules", other),
            })
    }
}

#[derive(Clone)]
pub struct SubjectCounter {
    repository: PgSubjectRepository,
}

impl SubjectCounter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgSubjectRepository::new(pool),
        }
    }
}

#[async_trait]
impl SubjectAcl for SubjectCounter {
    async fn count_subjects(&self, user_id: Uuid) -> Result<i64, DashboardError> {
        SubjectService::new(&self.repository, &self.repository)
            .count_by_user(user_id)
            .await
            .map_err(|err| match err {
                SubjectError::Storage(e) => DashboardError::Storage(e),
                other => upstream("subjects", other),
            })
    }
}

#[derive(Clone)]
pub struct GradeCounter {
    repository: PgGradeRepository,
}

impl GradeCounter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgGradeRepository::new(pool),
        }
    }
}

#[async_trait]
impl GradeAcl for GradeCounter {
    async fn count_grades(&self, user_id: Uuid) -> Result<i64, DashboardError> {
        GradeService::new(&self.repository, &self.repository)
            .count_by_user(user_id)
            .await
            .map_err(|err| match err {
                GradeError::Storage(e) => DashboardError::Storage(e),
                other => upstream("grades", other),
            })
    }
}

#[derive(Clone)]
pub struct SubmissionCounter {
    reader: PgSubmissionReader,
}

impl SubmissionCounter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            reader: PgSubmissionReader::new(pool),
        }
    }
}

#[async_trait]
impl SubmissionAcl for SubmissionCounter {
    async fn count_submitted_submissions(&self) -> Result<i64, DashboardError> {
        CountSubmittedSubmissions::new(&self.reader)
            .execute()
            .await
            .map_err(|err| match err {
                SubmissionError::Storage(e) => DashboardError::Storage(e),
                other => upstream("submissions", other),
            })
    }
}
