//! Audit-log emission.

use crate::db::Database;
use crate::platform::{ChannelId, GuildId, Session};
use tracing::{debug, warn};

/// Posts administrative events into a guild's configured audit channel.
///
/// Emission is best-effort: a missing or disabled configuration skips the
/// message, and send failures are logged without failing the triggering
/// command.
#[derive(Clone)]
pub struct AuditLogger {
    db: Database,
}

impl AuditLogger {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// The configured audit channel of a guild, when audit logging is
    /// enabled there.
    pub async fn channel_for(&self, guild: GuildId) -> Option<ChannelId> {
        let guild_row = match self.db.guilds().find(guild).await {
            Ok(Some(row)) => row,
            Ok(None) => return None,
            Err(e) => {
                warn!(guild = %guild, error = %e, "audit config lookup failed");
                return None;
            }
        };

        match self.db.audit_log().find(guild_row.id).await {
            Ok(Some(config)) if config.enabled => config.channel_id,
            Ok(_) => None,
            Err(e) => {
                warn!(guild = %guild, error = %e, "audit config lookup failed");
                None
            }
        }
    }

    /// Emit one audit line for a guild.
    pub async fn log(&self, session: &dyn Session, guild: GuildId, text: &str) {
        let Some(channel) = self.channel_for(guild).await else {
            debug!(guild = %guild, "audit logging not configured, skipping");
            return;
        };

        if let Err(e) = session.send_channel_message(channel, text).await {
            warn!(guild = %guild, channel = %channel, error = %e, "failed to post audit message");
        }
    }
}
