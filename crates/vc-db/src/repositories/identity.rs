//! PostgreSQL implementation of IdentityRepository
//!
//! Find-or-create relies on the primary/unique keys: insert with
//! `ON CONFLICT DO NOTHING`, then read back whatever row won.

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use vc_core::entities::{Guild, Membership, User};
use vc_core::traits::{IdentityRepository, RepoResult};
use vc_core::value_objects::Snowflake;

use crate::models::{GuildModel, MembershipModel, UserModel};

use super::error::{guild_not_registered, map_db_error, user_not_registered};
use super::unit_of_work::PgUnitOfWork;

#[async_trait]
impl IdentityRepository for PgUnitOfWork {
    #[instrument(skip(self))]
    async fn ensure_guild(&mut self, guild_id: Snowflake) -> RepoResult<Guild> {
        let conn = self.conn()?;

        let created = sqlx::query_as::<_, GuildModel>(
            r"
            INSERT INTO guilds (guild_id)
            VALUES ($1)
            ON CONFLICT (guild_id) DO NOTHING
            RETURNING guild_id, notification_channel
            ",
        )
        .bind(guild_id.into_inner())
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_db_error)?;

        if let Some(model) = created {
            info!(%guild_id, "Registered guild");
            return Ok(Guild::from(model));
        }

        let existing = sqlx::query_as::<_, GuildModel>(
            r"
            SELECT guild_id, notification_channel
            FROM guilds
            WHERE guild_id = $1
            ",
        )
        .bind(guild_id.into_inner())
        .fetch_one(&mut *conn)
        .await
        .map_err(map_db_error)?;

        debug!(%guild_id, "Guild already registered");
        Ok(Guild::from(existing))
    }

    #[instrument(skip(self))]
    async fn ensure_user(&mut self, user_id: Snowflake) -> RepoResult<User> {
        let conn = self.conn()?;

        let created = sqlx::query_as::<_, UserModel>(
            r"
            INSERT INTO users (user_id, speaker_id, command_count, likeability)
            VALUES ($1, $2, 0, 0)
            ON CONFLICT (user_id) DO NOTHING
            RETURNING user_id, speaker_id, command_count, likeability
            ",
        )
        .bind(user_id.into_inner())
        .bind(User::DEFAULT_SPEAKER_ID)
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_db_error)?;

        if let Some(model) = created {
            info!(%user_id, "Registered user");
            return Ok(User::from(model));
        }

        let existing = sqlx::query_as::<_, UserModel>(
            r"
            SELECT user_id, speaker_id, command_count, likeability
            FROM users
            WHERE user_id = $1
            ",
        )
        .bind(user_id.into_inner())
        .fetch_one(&mut *conn)
        .await
        .map_err(map_db_error)?;

        debug!(%user_id, "User already registered");
        Ok(User::from(existing))
    }

    #[instrument(skip(self))]
    async fn ensure_membership(
        &mut self,
        guild_id: Snowflake,
        user_id: Snowflake,
        join_date: i64,
    ) -> RepoResult<Membership> {
        self.ensure_guild(guild_id).await?;
        self.ensure_user(user_id).await?;

        let conn = self.conn()?;

        let created = sqlx::query_as::<_, MembershipModel>(
            r"
            INSERT INTO guild_users (guild_id, user_id, join_date)
            VALUES ($1, $2, $3)
            ON CONFLICT (guild_id, user_id) DO NOTHING
            RETURNING id, guild_id, user_id, join_date
            ",
        )
        .bind(guild_id.into_inner())
        .bind(user_id.into_inner())
        .bind(join_date)
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_db_error)?;

        if let Some(model) = created {
            info!(%guild_id, %user_id, membership_id = model.id, "Registered membership");
            return Ok(Membership::from(model));
        }

        let existing = sqlx::query_as::<_, MembershipModel>(
            r"
            SELECT id, guild_id, user_id, join_date
            FROM guild_users
            WHERE guild_id = $1 AND user_id = $2
            ",
        )
        .bind(guild_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_one(&mut *conn)
        .await
        .map_err(map_db_error)?;

        debug!(%guild_id, %user_id, membership_id = existing.id, "Membership already registered");
        Ok(Membership::from(existing))
    }

    #[instrument(skip(self))]
    async fn set_notification_channel(
        &mut self,
        guild_id: Snowflake,
        channel_id: Option<Snowflake>,
    ) -> RepoResult<Guild> {
        let conn = self.conn()?;

        let updated = sqlx::query_as::<_, GuildModel>(
            r"
            UPDATE guilds
            SET notification_channel = $2
            WHERE guild_id = $1
            RETURNING guild_id, notification_channel
            ",
        )
        .bind(guild_id.into_inner())
        .bind(channel_id.map(Snowflake::into_inner))
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_db_error)?;

        updated
            .map(Guild::from)
            .ok_or_else(|| guild_not_registered(guild_id))
    }

    #[instrument(skip(self))]
    async fn increment_command_count(&mut self, user_id: Snowflake) -> RepoResult<User> {
        let conn = self.conn()?;

        let updated = sqlx::query_as::<_, UserModel>(
            r"
            UPDATE users
            SET command_count = command_count + 1
            WHERE user_id = $1
            RETURNING user_id, speaker_id, command_count, likeability
            ",
        )
        .bind(user_id.into_inner())
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_db_error)?;

        updated
            .map(User::from)
            .ok_or_else(|| user_not_registered(user_id))
    }
}
