// src/infrastructure/module/mod.rs

pub mod acl;
pub mod cascade;
pub mod reader;
pub mod unit_of_work;
pub mod writer;

pub use acl::{GradeAclAdapter, SubjectAclAdapter};
pub use reader::PgModuleReader;
pub use unit_of_work::PgModuleUnitOfWork;
pub use writer::PgModuleWriter;
