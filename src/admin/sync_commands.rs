//! Handler for `/jojo sync-commands`.

use super::embed::{admin_embed, processing_response};
use super::AdminContext;
use crate::commands::CommandHandler;
use crate::error::{HandlerError, HandlerResult};
use crate::platform::{Interaction, InteractionResponse, Session};
use async_trait::async_trait;
use std::sync::Arc;

/// Forces a slash-command reconciliation for the guild, subject to the
/// per-guild cool-down.
pub struct SyncCommands {
    pub ctx: Arc<AdminContext>,
}

#[async_trait]
impl CommandHandler for SyncCommands {
    async fn handle(&self, session: &dyn Session, interaction: &Interaction) -> HandlerResult {
        let guild = interaction.guild_id.ok_or(HandlerError::GuildOnly)?;

        // Checked before acknowledging so a rejected invocation never
        // flashes the processing embed.
        if self.ctx.commands.on_cooldown(guild) {
            return Err(HandlerError::OnCoolDown);
        }

        session.respond(interaction, processing_response()).await?;

        let report = self.ctx.commands.sync_manual(session, guild).await?;

        let embed = if report.success() {
            admin_embed().field(
                ":white_check_mark: Commands synchronized",
                format!(
                    "{} created, {} updated, {} removed, {} unchanged.",
                    report.created, report.updated, report.deleted, report.unchanged
                ),
            )
        } else {
            admin_embed().field(
                ":warning: Commands partially synchronized",
                format!(
                    "{} created, {} updated, {} removed; {} command(s) failed. \
                     Check the logs and try again later.",
                    report.created,
                    report.updated,
                    report.deleted,
                    report.failed.len()
                ),
            )
        };

        session
            .edit_response(interaction, InteractionResponse::ephemeral(embed))
            .await?;

        self.ctx
            .audit
            .log(
                session,
                guild,
                &format!(
                    "Slash commands were synchronized by `{}`.",
                    interaction.user.username
                ),
            )
            .await;
        Ok(())
    }
}
