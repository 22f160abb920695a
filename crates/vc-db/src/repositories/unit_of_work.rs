//! PostgreSQL unit of work - one transaction per accounting transition

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tracing::instrument;

use vc_core::error::DomainError;
use vc_core::traits::{RepoResult, VoiceUnitOfWork};

use super::error::map_db_error;

/// Open transaction plus the repository operations that run inside it
///
/// Dropping the value without calling `commit` rolls the transaction back.
pub struct PgUnitOfWork {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgUnitOfWork {
    /// Begin a transaction on the pool
    pub async fn begin(pool: &PgPool) -> RepoResult<Self> {
        let tx = pool.begin().await.map_err(map_db_error)?;
        Ok(Self { tx: Some(tx) })
    }

    /// Connection of the open transaction
    pub(super) fn conn(&mut self) -> RepoResult<&mut PgConnection> {
        self.tx.as_deref_mut().ok_or(DomainError::TransactionClosed)
    }
}

#[async_trait]
impl VoiceUnitOfWork for PgUnitOfWork {
    #[instrument(skip(self))]
    async fn commit(&mut self) -> RepoResult<()> {
        let tx = self.tx.take().ok_or(DomainError::TransactionClosed)?;
        tx.commit().await.map_err(map_db_error)
    }
}
