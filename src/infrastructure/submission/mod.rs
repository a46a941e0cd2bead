// src/infrastructure/submission/mod.rs

pub mod module_acl;
pub mod reader;
pub mod unit_of_work;
pub mod writer;

pub use module_acl::ModuleAclAdapter;
pub use reader::PgSubmissionReader;
pub use unit_of_work::PgSubmissionUnitOfWork;
pub use writer::PgSubmissionWriter;
