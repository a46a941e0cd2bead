// src/domain/submission/mod.rs

pub mod entity;
pub mod error;
pub mod repository;
pub mod response;
pub mod service;

pub use error::SubmissionError;
