// src/infrastructure/module/unit_of_work.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use super::writer::PgModuleWriter;
use crate::domain::module::{
    ModuleError,
    repository::{ModuleUnitOfWork, ModuleUnitOfWorkProcessor, ModuleWriter},
};

#[derive(Clone)]
pub struct PgModuleUnitOfWork {
    pool: PgPool,
}

impl PgModuleUnitOfWork {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ModuleUnitOfWork for PgModuleUnitOfWork {
    async fn begin(&self) -> Result<Box<dyn ModuleUnitOfWorkProcessor>, ModuleError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgModuleUnitOfWorkProcessor { tx }))
    }
}

/// Owns the transaction. sqlx rolls it back if this is dropped uncommitted.
pub struct PgModuleUnitOfWorkProcessor {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl ModuleUnitOfWorkProcessor for PgModuleUnitOfWorkProcessor {
    fn module_writer(&mut self) -> Box<dyn ModuleWriter + '_> {
        Box::new(PgModuleWriter::new(&mut self.tx))
    }

    async fn commit(self: Box<Self>) -> Result<(), ModuleError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), ModuleError> {
        self.tx.rollback().await?;
        Ok(())
    }
}
