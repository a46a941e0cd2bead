// src/domain/dashboard/service.rs

use uuid::Uuid;

use super::{
    error::DashboardError,
    repository::{GradeAcl, ModuleAcl, SubjectAcl, SubmissionAcl},
    response::DashboardStatistics,
};

pub struct GetDashboardStatistics<'a> {
    module_acl: &'a dyn ModuleAcl,
    subject_acl: &'a dyn SubjectAcl,
    grade_acl: &'a dyn GradeAcl,
    submission_acl: &'a dyn SubmissionAcl,
}

impl<'a> GetDashboardStatistics<'a> {
    pub fn new(
        module_acl: &'a dyn ModuleAcl,
        subject_acl: &'a dyn SubjectAcl,
        grade_acl: &'a dyn GradeAcl,
        submission_acl: &'a dyn SubmissionAcl,
    ) -> Self {
        Self {
            module_acl,
            subject_acl,
            grade_acl,
            submission_acl,
        }
    }

    /// Runs the four counts concurrently. The first failure fails the call.
    pub async fn execute(&self, user_id: Uuid) -> Result<DashboardStatistics, DashboardError> {
        let (total_modules, total_subjects, total_grades, total_submitted_submissions) = tokio::try_join!(
            self.module_acl.count_modules(user_id),
            self.subject_acl.count_subjects(user_id),
            self.grade_acl.count_grades(user_id),
            self.submission_acl.count_submitted_submissions(),
        )?;

        Ok(DashboardStatistics {
            total_modules,
            total_subjects,
            total_grades,
            total_submitted_submissions,
        })
    }
}
