// src/domain/mod.rs
//
// Bounded contexts. A context never imports another context's modules:
// foreign data reaches it through the ACL traits declared in its own
// `repository` module and implemented in `crate::infrastructure`.

pub mod dashboard;
pub mod grade;
pub mod lifecycle;
pub mod module;
pub mod subject;
pub mod submission;
