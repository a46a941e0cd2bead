// src/lib.rs

pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod infrastructure;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;

pub use routes::create_router;
