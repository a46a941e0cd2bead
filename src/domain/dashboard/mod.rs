// src/domain/dashboard/mod.rs

pub mod error;
pub mod repository;
pub mod response;
pub mod service;

pub use error::DashboardError;
