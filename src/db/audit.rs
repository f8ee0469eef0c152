//! Repository for per-guild audit-log configuration.

use super::models::AuditLogConfigRow;
use super::DbError;
use crate::platform::ChannelId;
use sqlx::SqlitePool;

pub struct AuditLogRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AuditLogRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Read the audit-log configuration of a guild, if any.
    pub async fn find(&self, guild_pk: i64) -> Result<Option<AuditLogConfigRow>, DbError> {
        let row = sqlx::query_as::<_, (i64, bool, Option<i64>)>(
            "SELECT guild_id, enabled, channel_id FROM audit_log_configs WHERE guild_id = ?",
        )
        .bind(guild_pk)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(guild_id, enabled, channel_id)| AuditLogConfigRow {
            guild_id,
            enabled,
            channel_id: channel_id.map(|id| ChannelId(id as u64)),
        }))
    }

    /// Upsert the audit-log configuration of a guild.
    pub async fn upsert(
        &self,
        guild_pk: i64,
        enabled: bool,
        channel_id: Option<ChannelId>,
    ) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO audit_log_configs (guild_id, enabled, channel_id)
            VALUES (?, ?, ?)
            ON CONFLICT(guild_id) DO UPDATE SET
                enabled = excluded.enabled,
                channel_id = excluded.channel_id
            "#,
        )
        .bind(guild_pk)
        .bind(enabled)
        .bind(channel_id.map(|id| id.0 as i64))
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
