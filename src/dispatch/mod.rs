//! Interaction dispatcher.
//!
//! Routes incoming interactions to the registered handlers after running
//! the gates: guild-only, effective enablement of the owning component,
//! and the per-guild toggle rate limit for flagged sub-commands.

mod options;

pub use options::OptionsMap;

use crate::cache::TtlCache;
use crate::commands::CommandManager;
use crate::error::{HandlerError, HandlerResult};
use crate::platform::{GuildId, Interaction, InteractionData, Session, SessionError};
use crate::registry::Component;
use crate::status::StatusStore;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Handler for message actions and modal submissions, keyed by the
/// routing portion of the custom id.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn handle(&self, session: &dyn Session, interaction: &Interaction) -> HandlerResult;
}

struct ActionEntry {
    component: Arc<Component>,
    handler: Arc<dyn ActionHandler>,
}

/// Routes interactions and enforces the dispatch gates.
pub struct Dispatcher {
    commands: Arc<CommandManager>,
    status: Arc<StatusStore>,
    actions: DashMap<String, ActionEntry>,
    /// Toggle invocations per guild inside the sliding window. Every
    /// write refreshes the expiry, so the window slides with activity.
    toggle_counts: Arc<TtlCache<GuildId, u32>>,
    toggle_limit: u32,
}

impl Dispatcher {
    pub fn new(
        commands: Arc<CommandManager>,
        status: Arc<StatusStore>,
        toggle_limit: u32,
        toggle_window: Duration,
    ) -> Self {
        Self {
            commands,
            status,
            actions: DashMap::new(),
            toggle_counts: Arc::new(TtlCache::new(toggle_window)),
            toggle_limit,
        }
    }

    /// Cache handle used by the lifecycle coordinator to wire the sweeper.
    pub fn toggle_count_cache(&self) -> Arc<TtlCache<GuildId, u32>> {
        Arc::clone(&self.toggle_counts)
    }

    /// Register a handler for message actions and modal submissions whose
    /// custom id starts with `key`. The routing key is the custom id up
    /// to the first `:`, so handlers can pack state behind it. The owning
    /// component puts the action behind the same enablement gate as the
    /// component's commands.
    pub fn register_action(
        &self,
        key: impl Into<String>,
        component: Arc<Component>,
        handler: Arc<dyn ActionHandler>,
    ) {
        self.actions.insert(key.into(), ActionEntry { component, handler });
    }

    /// Dispatch one interaction, replying with the error embed on
    /// failure. Never propagates; the gateway loop must not die on a bad
    /// interaction.
    pub async fn handle(&self, session: &dyn Session, interaction: &Interaction) {
        if let Err(e) = self.dispatch(session, interaction).await {
            warn!(
                interaction = %interaction.id,
                user = %interaction.user.id,
                code = e.error_code(),
                error = %e,
                "interaction failed"
            );

            match session.respond(interaction, e.to_response()).await {
                Ok(()) => {}
                // The handler already acknowledged; replace its pending
                // response instead.
                Err(SessionError::AlreadyAcknowledged) => {
                    if let Err(e2) = session.edit_response(interaction, e.to_response()).await {
                        error!(interaction = %interaction.id, error = %e2, "failed to edit error response");
                    }
                }
                Err(e2) => {
                    error!(interaction = %interaction.id, error = %e2, "failed to send error response");
                }
            }
        }
    }

    /// Route one interaction through the gates to its handler.
    pub async fn dispatch(&self, session: &dyn Session, interaction: &Interaction) -> HandlerResult {
        match &interaction.data {
            InteractionData::Command(invocation) => {
                self.dispatch_command(session, interaction, &invocation.name)
                    .await
            }
            InteractionData::MessageAction { custom_id }
            | InteractionData::ModalSubmit { custom_id, .. } => {
                self.dispatch_action(session, interaction, custom_id).await
            }
        }
    }

    async fn dispatch_command(
        &self,
        session: &dyn Session,
        interaction: &Interaction,
        name: &str,
    ) -> HandlerResult {
        let Some(command) = self.commands.get(name) else {
            return Err(HandlerError::UnknownCommand(name.to_string()));
        };

        let guild_id = match interaction.guild_id {
            Some(id) => Some(id),
            None if command.guild_only => return Err(HandlerError::GuildOnly),
            None => None,
        };

        self.check_enablement(&command.component, guild_id).await?;

        let path = interaction
            .command_path()
            .unwrap_or_else(|| name.to_string());
        debug!(path = %path, user = %interaction.user.id, "dispatching command");

        // Sub-command routing: everything after the top-level name.
        let sub_path = path.strip_prefix(name).map(str::trim_start).unwrap_or("");
        if sub_path.is_empty() {
            return match &command.handler {
                Some(handler) => handler.handle(session, interaction).await,
                None => Err(HandlerError::UnknownSubCommand(path)),
            };
        }

        let Some(entry) = command.sub_handlers.get(sub_path) else {
            return Err(HandlerError::UnknownSubCommand(path));
        };

        if entry.rate_limited {
            // Guild-only commands guarantee the id; checked above.
            let guild = guild_id.ok_or(HandlerError::GuildOnly)?;
            self.check_toggle_rate(guild)?;
        }

        entry.handler.handle(session, interaction).await
    }

    async fn dispatch_action(
        &self,
        session: &dyn Session,
        interaction: &Interaction,
        custom_id: &str,
    ) -> HandlerResult {
        let key = custom_id.split(':').next().unwrap_or(custom_id);
        let Some((component, handler)) = self
            .actions
            .get(key)
            .map(|e| (Arc::clone(&e.component), Arc::clone(&e.handler)))
        else {
            return Err(HandlerError::UnknownCommand(custom_id.to_string()));
        };

        self.check_enablement(&component, interaction.guild_id).await?;

        debug!(custom_id = %custom_id, user = %interaction.user.id, "dispatching action");
        handler.handle(session, interaction).await
    }

    /// Enablement gate shared by command and action dispatch. Core
    /// components bypass it; everything else is checked against the
    /// kill-switch and, with guild context, the effective status.
    async fn check_enablement(
        &self,
        component: &Component,
        guild_id: Option<GuildId>,
    ) -> HandlerResult {
        if component.is_core() {
            return Ok(());
        }

        if !self.status.get_global(component.code).await? {
            return Err(HandlerError::ComponentDisabled {
                component: component.code.to_string(),
                scope: "global",
            });
        }
        if let Some(guild) = guild_id {
            if !self.status.effective(guild, component).await? {
                return Err(HandlerError::ComponentDisabled {
                    component: component.code.to_string(),
                    scope: "guild",
                });
            }
        }
        Ok(())
    }

    /// Increment-then-check: the blocked attempt still counts, and the
    /// write refreshes the window.
    fn check_toggle_rate(&self, guild: GuildId) -> HandlerResult {
        let count = self.toggle_counts.get(&guild).unwrap_or(0) + 1;
        self.toggle_counts.insert(guild, count);

        if count > self.toggle_limit {
            return Err(HandlerError::RateLimited);
        }
        Ok(())
    }
}
