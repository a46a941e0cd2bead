// src/domain/dashboard/response.rs

use serde::Serialize;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DashboardStatistics {
    pub total_modules: i64,
    pub total_subjects: i64,
    pub total_grades: i64,
    pub total_submitted_submissions: i64,
}
