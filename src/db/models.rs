//! Row types for the persisted entities.

use crate::platform::{ChannelId, GuildId};

/// A guild the bot has joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildRow {
    /// Surrogate primary key used by status rows.
    pub id: i64,
    /// Platform guild id.
    pub guild_id: GuildId,
    pub name: String,
}

/// Persisted mirror of an in-process component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredComponentRow {
    /// Surrogate primary key used by status rows.
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: String,
    pub default_enabled: bool,
}

/// Per-guild audit-log configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogConfigRow {
    pub guild_id: i64,
    pub enabled: bool,
    pub channel_id: Option<ChannelId>,
}
