//! PostgreSQL implementation of SessionRepository

use async_trait::async_trait;
use tracing::instrument;

use vc_core::entities::OpenSession;
use vc_core::traits::{RepoResult, SessionRepository};
use vc_core::value_objects::{MembershipId, Snowflake};

use crate::models::SessionModel;

use super::error::map_db_error;
use super::unit_of_work::PgUnitOfWork;

#[async_trait]
impl SessionRepository for PgUnitOfWork {
    #[instrument(skip(self))]
    async fn open_session(&mut self, session: &OpenSession) -> RepoResult<Option<OpenSession>> {
        let displaced = self
            .close_session(session.membership_id, session.channel_id)
            .await?;

        let conn = self.conn()?;
        sqlx::query(
            r"
            INSERT INTO vc_sessions (id, channel_id, event_time, mic_on)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(session.membership_id.into_inner())
        .bind(session.channel_id.into_inner())
        .bind(session.event_time)
        .bind(session.mic_on)
        .execute(&mut *conn)
        .await
        .map_err(map_db_error)?;

        Ok(displaced)
    }

    #[instrument(skip(self))]
    async fn close_session(
        &mut self,
        membership_id: MembershipId,
        channel_id: Snowflake,
    ) -> RepoResult<Option<OpenSession>> {
        let conn = self.conn()?;

        let closed = sqlx::query_as::<_, SessionModel>(
            r"
            DELETE FROM vc_sessions
            WHERE id = $1 AND channel_id = $2
            RETURNING id, channel_id, event_time, mic_on
            ",
        )
        .bind(membership_id.into_inner())
        .bind(channel_id.into_inner())
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_db_error)?;

        Ok(closed.map(OpenSession::from))
    }

    #[instrument(skip(self))]
    async fn clear_sessions(&mut self) -> RepoResult<u64> {
        let conn = self.conn()?;

        let result = sqlx::query("DELETE FROM vc_sessions")
            .execute(&mut *conn)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn drain_sessions(&mut self) -> RepoResult<Vec<OpenSession>> {
        let conn = self.conn()?;

        let drained = sqlx::query_as::<_, SessionModel>(
            r"
            DELETE FROM vc_sessions
            RETURNING id, channel_id, event_time, mic_on
            ",
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(map_db_error)?;

        Ok(drained.into_iter().map(OpenSession::from).collect())
    }
}
