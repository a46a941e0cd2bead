// src/models/mod.rs

pub mod grade;
pub mod module;
pub mod subject;
pub mod submission;
