//! PostgreSQL implementation of SummaryRepository

use async_trait::async_trait;
use tracing::{debug, instrument};

use vc_core::entities::SummaryKey;
use vc_core::traits::{RepoResult, SummaryRepository};

use super::error::{map_db_error, summary_missing};
use super::unit_of_work::PgUnitOfWork;

#[async_trait]
impl SummaryRepository for PgUnitOfWork {
    #[instrument(skip(self))]
    async fn ensure_summary(&mut self, key: &SummaryKey) -> RepoResult<()> {
        let conn = self.conn()?;

        let result = sqlx::query(
            r"
            INSERT INTO vc_summary (id, channel_id, year, month, total_connection_time, total_mic_on_time)
            VALUES ($1, $2, $3, $4, 0, 0)
            ON CONFLICT (id, channel_id, year, month) DO NOTHING
            ",
        )
        .bind(key.membership_id.into_inner())
        .bind(key.channel_id.into_inner())
        .bind(key.period.year)
        .bind(key.period.month as i32)
        .execute(&mut *conn)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() > 0 {
            debug!(period = %key.period, "Created summary row");
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn add_connection_time(&mut self, key: &SummaryKey, delta: i64) -> RepoResult<()> {
        let conn = self.conn()?;

        let result = sqlx::query(
            r"
            UPDATE vc_summary
            SET total_connection_time = total_connection_time + $5
            WHERE id = $1 AND channel_id = $2 AND year = $3 AND month = $4
            ",
        )
        .bind(key.membership_id.into_inner())
        .bind(key.channel_id.into_inner())
        .bind(key.period.year)
        .bind(key.period.month as i32)
        .bind(delta)
        .execute(&mut *conn)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(summary_missing(key));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn add_connection_and_mic_time(
        &mut self,
        key: &SummaryKey,
        delta: i64,
    ) -> RepoResult<()> {
        let conn = self.conn()?;

        let result = sqlx::query(
            r"
            UPDATE vc_summary
            SET total_connection_time = total_connection_time + $5,
                total_mic_on_time = total_mic_on_time + $5
            WHERE id = $1 AND channel_id = $2 AND year = $3 AND month = $4
            ",
        )
        .bind(key.membership_id.into_inner())
        .bind(key.channel_id.into_inner())
        .bind(key.period.year)
        .bind(key.period.month as i32)
        .bind(delta)
        .execute(&mut *conn)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(summary_missing(key));
        }

        Ok(())
    }
}
