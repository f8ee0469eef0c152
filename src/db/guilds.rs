//! Repository for guilds and per-guild component statuses.

use super::models::GuildRow;
use super::DbError;
use crate::platform::GuildId;
use sqlx::SqlitePool;

/// Repository for guild rows and the guild enablement scope.
pub struct GuildRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> GuildRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the guild row on first join, refresh the name on rename.
    pub async fn upsert(&self, guild_id: GuildId, name: &str) -> Result<GuildRow, DbError> {
        let now = chrono::Utc::now().timestamp();

        sqlx::query(
            r#"
            INSERT INTO guilds (guild_id, name, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(guild_id) DO UPDATE SET
                name = excluded.name,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(guild_id.0 as i64)
        .bind(name)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await?;

        self.find(guild_id)
            .await?
            .ok_or(DbError::GuildNotFound(guild_id.0))
    }

    /// Find a guild by its platform id.
    pub async fn find(&self, guild_id: GuildId) -> Result<Option<GuildRow>, DbError> {
        let row = sqlx::query_as::<_, (i64, i64, String)>(
            "SELECT id, guild_id, name FROM guilds WHERE guild_id = ?",
        )
        .bind(guild_id.0 as i64)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(id, guild_id, name)| GuildRow {
            id,
            guild_id: GuildId(guild_id as u64),
            name,
        }))
    }

    /// Read the guild-scope status of a component. `None` means no row.
    pub async fn component_status(
        &self,
        guild_pk: i64,
        component_id: i64,
    ) -> Result<Option<bool>, DbError> {
        let row = sqlx::query_as::<_, (bool,)>(
            r#"
            SELECT enabled FROM guild_component_statuses
            WHERE guild_id = ? AND component_id = ?
            "#,
        )
        .bind(guild_pk)
        .bind(component_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(enabled,)| enabled))
    }

    /// Upsert the guild-scope status of a component.
    pub async fn set_component_status(
        &self,
        guild_pk: i64,
        component_id: i64,
        enabled: bool,
    ) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO guild_component_statuses (guild_id, component_id, enabled)
            VALUES (?, ?, ?)
            ON CONFLICT(guild_id, component_id) DO UPDATE SET enabled = excluded.enabled
            "#,
        )
        .bind(guild_pk)
        .bind(component_id)
        .bind(enabled)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Create a guild-scope status row only when none exists yet.
    ///
    /// Used on guild join to seed default-enabled components without
    /// overriding an earlier admin decision.
    pub async fn seed_component_status(
        &self,
        guild_pk: i64,
        component_id: i64,
        enabled: bool,
    ) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO guild_component_statuses (guild_id, component_id, enabled)
            VALUES (?, ?, ?)
            ON CONFLICT(guild_id, component_id) DO NOTHING
            "#,
        )
        .bind(guild_pk)
        .bind(component_id)
        .bind(enabled)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
