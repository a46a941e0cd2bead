// src/infrastructure/submission/unit_of_work.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use super::writer::PgSubmissionWriter;
use crate::domain::submission::{
    SubmissionError,
    repository::{SubmissionUnitOfWork, SubmissionUnitOfWorkProcessor, SubmissionWriter},
};

#[derive(Clone)]
pub struct PgSubmissionUnitOfWork {
    pool: PgPool,
}

impl PgSubmissionUnitOfWork {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubmissionUnitOfWork for PgSubmissionUnitOfWork {
    async fn begin(&self) -> Result<Box<dyn SubmissionUnitOfWorkProcessor>, SubmissionError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgSubmissionUnitOfWorkProcessor { tx }))
    }
}

/// Owns the transaction. sqlx rolls it back if this is dropped uncommitted.
pub struct PgSubmissionUnitOfWorkProcessor {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl SubmissionUnitOfWorkProcessor for PgSubmissionUnitOfWorkProcessor {
    fn submission_writer(&mut self) -> Box<dyn SubmissionWriter + '_> {
        Box::new(PgSubmissionWriter::new(&mut self.tx))
    }

    async fn commit(self: Box<Self>) -> Result<(), SubmissionError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), SubmissionError> {
        self.tx.rollback().await?;
        Ok(())
    }
}
