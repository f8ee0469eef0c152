//! Handlers for the `/jojo auditlog` sub-command group.

use super::embed::admin_embed;
use super::AdminContext;
use crate::commands::CommandHandler;
use crate::dispatch::OptionsMap;
use crate::error::{HandlerError, HandlerResult};
use crate::platform::{GuildId, Interaction, InteractionResponse, Session};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

fn guild_of(interaction: &Interaction) -> Result<GuildId, HandlerError> {
    interaction.guild_id.ok_or(HandlerError::GuildOnly)
}

async fn guild_pk(
    ctx: &AdminContext,
    session: &dyn Session,
    guild: GuildId,
) -> Result<i64, HandlerError> {
    let guilds = ctx.status.database().guilds();
    if let Some(row) = guilds.find(guild).await? {
        return Ok(row.id);
    }

    let info = session.fetch_guild(guild).await?;
    Ok(guilds.upsert(info.id, &info.name).await?.id)
}

/// `/jojo auditlog status`: current audit-log configuration.
pub struct AuditLogStatus {
    pub ctx: Arc<AdminContext>,
}

#[async_trait]
impl CommandHandler for AuditLogStatus {
    async fn handle(&self, session: &dyn Session, interaction: &Interaction) -> HandlerResult {
        let guild = guild_of(interaction)?;
        let pk = guild_pk(&self.ctx, session, guild).await?;

        let config = self.ctx.status.database().audit_log().find(pk).await?;
        let embed = match config {
            Some(config) if config.enabled => {
                let target = config
                    .channel_id
                    .map(|id| format!("<#{id}>"))
                    .unwrap_or_else(|| "no channel configured".to_string());
                admin_embed().field(
                    ":white_check_mark: Audit log enabled",
                    format!("Audit messages are posted to {target}."),
                )
            }
            _ => admin_embed().field(
                ":x: Audit log disabled",
                "Use `/jojo auditlog enable` to turn it on.",
            ),
        };

        session
            .respond(interaction, InteractionResponse::ephemeral(embed))
            .await?;
        Ok(())
    }
}

/// `/jojo auditlog enable`: turn audit logging on.
///
/// The channel option is mandatory on first use; afterwards it is
/// optional and the previously configured channel is kept.
pub struct AuditLogEnable {
    pub ctx: Arc<AdminContext>,
}

#[async_trait]
impl CommandHandler for AuditLogEnable {
    async fn handle(&self, session: &dyn Session, interaction: &Interaction) -> HandlerResult {
        let guild = guild_of(interaction)?;
        let pk = guild_pk(&self.ctx, session, guild).await?;

        let requested = interaction
            .sub_option()
            .map(OptionsMap::from_sub_option)
            .and_then(|options| options.get_channel("channel"));

        let audit = self.ctx.status.database().audit_log();
        let existing = audit.find(pk).await?;
        let already_enabled = existing.as_ref().is_some_and(|c| c.enabled);
        let stored_channel = existing.and_then(|c| c.channel_id);

        if already_enabled && (requested.is_none() || requested == stored_channel) {
            let embed = admin_embed().field(
                ":information_source: Nothing to do",
                "Audit logging is already enabled with that channel!",
            );
            session
                .respond(interaction, InteractionResponse::ephemeral(embed))
                .await?;
            return Ok(());
        }

        let channel = requested.or(stored_channel);

        let Some(channel) = channel else {
            let embed = admin_embed().field(
                ":x: Channel required",
                "No audit channel is configured for this guild yet. Pass the \
                 `channel` option to pick one.",
            );
            session
                .respond(interaction, InteractionResponse::ephemeral(embed))
                .await?;
            return Ok(());
        };

        audit.upsert(pk, true, Some(channel)).await?;
        info!(guild = %guild, channel = %channel, "audit logging enabled");

        let embed = admin_embed().field(
            ":white_check_mark: Audit log enabled",
            format!("Audit messages will be posted to <#{channel}>."),
        );
        session
            .respond(interaction, InteractionResponse::ephemeral(embed))
            .await?;

        self.ctx
            .audit
            .log(
                session,
                guild,
                &format!(
                    "Audit logging was enabled by `{}`.",
                    interaction.user.username
                ),
            )
            .await;
        Ok(())
    }
}

/// `/jojo auditlog disable`: turn audit logging off, keeping the channel.
pub struct AuditLogDisable {
    pub ctx: Arc<AdminContext>,
}

#[async_trait]
impl CommandHandler for AuditLogDisable {
    async fn handle(&self, session: &dyn Session, interaction: &Interaction) -> HandlerResult {
        let guild = guild_of(interaction)?;
        let pk = guild_pk(&self.ctx, session, guild).await?;

        let audit = self.ctx.status.database().audit_log();
        let channel = audit.find(pk).await?.and_then(|c| c.channel_id);

        // Keep the channel so a later enable works without re-picking it.
        self.ctx
            .audit
            .log(
                session,
                guild,
                &format!(
                    "Audit logging was disabled by `{}`.",
                    interaction.user.username
                ),
            )
            .await;
        audit.upsert(pk, false, channel).await?;
        info!(guild = %guild, "audit logging disabled");

        let embed = admin_embed().field(
            ":x: Audit log disabled",
            "Audit messages will no longer be posted.",
        );
        session
            .respond(interaction, InteractionResponse::ephemeral(embed))
            .await?;
        Ok(())
    }
}
