// src/handlers/mod.rs

pub mod dashboard;
pub mod grade;
pub mod module;
pub mod subject;
pub mod submission;
