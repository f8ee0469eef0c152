//! Handlers for the `/jojo module` sub-command group.

use super::embed::{admin_embed, processing_response};
use super::AdminContext;
use crate::commands::CommandHandler;
use crate::dispatch::OptionsMap;
use crate::error::{HandlerError, HandlerResult, StatusError};
use crate::platform::{GuildId, Interaction, InteractionResponse, Session};
use crate::registry::Component;
use async_trait::async_trait;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::info;

fn guild_of(interaction: &Interaction) -> Result<GuildId, HandlerError> {
    interaction.guild_id.ok_or(HandlerError::GuildOnly)
}

fn module_option<'a>(interaction: &'a Interaction) -> Result<&'a str, HandlerError> {
    let sub = interaction
        .sub_option()
        .ok_or_else(|| HandlerError::Internal("missing sub-command options".into()))?;
    let module = OptionsMap::from_sub_option(sub).get_str("module", "");
    if module.is_empty() {
        return Err(HandlerError::Internal("missing required module option".into()));
    }
    Ok(module)
}

/// `/jojo module list`: every toggleable component with its status token.
pub struct ModuleList {
    pub ctx: Arc<AdminContext>,
}

#[async_trait]
impl CommandHandler for ModuleList {
    async fn handle(&self, session: &dyn Session, interaction: &Interaction) -> HandlerResult {
        let guild = guild_of(interaction)?;

        let mut embed = admin_embed();
        for component in self.ctx.registry.available() {
            // Core components are not toggleable and stay off the list.
            if component.is_core() {
                continue;
            }
            let token = self
                .ctx
                .status
                .display_guild(guild, &component)
                .await?
                .token();
            embed = embed.field(
                format!("{} {}", token, component.name),
                format!("`{}` - {}", component.code, component.description),
            );
        }

        session
            .respond(interaction, InteractionResponse::ephemeral(embed))
            .await?;
        Ok(())
    }
}

/// `/jojo module show`: details of one component.
pub struct ModuleShow {
    pub ctx: Arc<AdminContext>,
}

#[async_trait]
impl CommandHandler for ModuleShow {
    async fn handle(&self, session: &dyn Session, interaction: &Interaction) -> HandlerResult {
        let guild = guild_of(interaction)?;
        let code = module_option(interaction)?;

        let component = self
            .ctx
            .registry
            .get_by_code(code)
            .ok_or_else(|| StatusError::NotFound(code.to_string()))?;

        let mut categories = String::new();
        for (i, category) in component.categories.iter().enumerate() {
            if i > 0 {
                categories.push_str(", ");
            }
            let _ = write!(categories, "{category}");
        }

        let token = self
            .ctx
            .status
            .display_guild(guild, &component)
            .await?
            .token();
        let embed = admin_embed()
            .field(format!("{} {}", token, component.name), component.description)
            .field("Categories", categories)
            .field(
                "Default",
                if component.default_enabled {
                    "Enabled on new guilds"
                } else {
                    "Disabled on new guilds"
                },
            );

        session
            .respond(interaction, InteractionResponse::ephemeral(embed))
            .await?;
        Ok(())
    }
}

/// `/jojo module enable` and `/jojo module disable`.
///
/// Short-circuits when the module is already in the requested state,
/// otherwise replies with a processing embed, persists the toggle, syncs
/// the guild's commands and edits in the final result.
pub struct ModuleToggle {
    pub ctx: Arc<AdminContext>,
    pub enable: bool,
}

impl ModuleToggle {
    fn verb(&self) -> &'static str {
        if self.enable {
            "enabled"
        } else {
            "disabled"
        }
    }

    async fn ensure_guild_row(
        &self,
        session: &dyn Session,
        guild: GuildId,
    ) -> Result<(), HandlerError> {
        if self.ctx.status.database().guilds().find(guild).await?.is_none() {
            let info = session.fetch_guild(guild).await?;
            self.ctx
                .status
                .database()
                .guilds()
                .upsert(info.id, &info.name)
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl CommandHandler for ModuleToggle {
    async fn handle(&self, session: &dyn Session, interaction: &Interaction) -> HandlerResult {
        let guild = guild_of(interaction)?;
        let code = module_option(interaction)?;

        let component: Arc<Component> = self
            .ctx
            .registry
            .get_by_code(code)
            .ok_or_else(|| StatusError::NotFound(code.to_string()))?;
        if component.is_core() {
            return Err(StatusError::ForbiddenOnCore(component.code.to_string()).into());
        }

        let current = self
            .ctx
            .status
            .get_guild(guild, component.code)
            .await?
            .unwrap_or(component.default_enabled);
        if current == self.enable {
            let embed = admin_embed().field(
                ":information_source: Nothing to do",
                format!("The `{}` module is already {}!", component.code, self.verb()),
            );
            session
                .respond(interaction, InteractionResponse::ephemeral(embed))
                .await?;
            return Ok(());
        }

        session.respond(interaction, processing_response()).await?;

        self.ensure_guild_row(session, guild).await?;
        self.ctx
            .status
            .set_guild(guild, &component, self.enable)
            .await?;
        info!(guild = %guild, module = component.code, enabled = self.enable, "module toggled");

        // Keep the guild's slash commands in lockstep with the toggle.
        let report = self.ctx.commands.sync(session, guild).await?;

        let embed = if report.success() {
            admin_embed().field(
                format!(":white_check_mark: Module {}", self.verb()),
                format!("The `{}` module was {}!", component.code, self.verb()),
            )
        } else {
            admin_embed().field(
                format!(":warning: Module {}", self.verb()),
                format!(
                    "The `{}` module was {}, but {} command(s) failed to \
                     synchronize. Run `/jojo sync-commands` to retry.",
                    component.code,
                    self.verb(),
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
                    "Module `{}` was {} by `{}`.",
                    component.code,
                    self.verb(),
                    interaction.user.username
                ),
            )
            .await;
        Ok(())
    }
}
