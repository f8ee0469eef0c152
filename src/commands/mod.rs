//! Command manager: desired slash-command set and remote reconciliation.
//!
//! The manager owns one [`RegisteredCommand`] per top-level command name
//! and reconciles the effective desired set against the platform's
//! per-guild command list. Reconciliation is idempotent and serialized
//! per guild; different guilds sync in parallel.

mod handler;

pub use handler::CommandHandler;

use crate::cache::TtlCache;
use crate::error::CommandError;
use crate::platform::{CommandDeclaration, GuildId, RemoteCommand, Session};
use crate::registry::Component;
use crate::status::StatusStore;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// A sub-command handler plus its dispatch flags.
pub struct SubCommandEntry {
    pub handler: Arc<dyn CommandHandler>,
    /// Subject to the per-guild toggle rate limit.
    pub rate_limited: bool,
}

/// A command declaration bound to its owning component and handlers.
pub struct RegisteredCommand {
    pub declaration: CommandDeclaration,
    pub component: Arc<Component>,
    /// Reject invocations without guild context.
    pub guild_only: bool,
    /// Handler for plain invocations; commands with sub-commands route
    /// through `sub_handlers` instead.
    pub handler: Option<Arc<dyn CommandHandler>>,
    /// Handlers keyed by sub-command path relative to the command name,
    /// e.g. `"module enable"`.
    pub sub_handlers: HashMap<String, SubCommandEntry>,
}

/// Builder for command registration.
pub struct CommandRegistration {
    declaration: CommandDeclaration,
    component: Arc<Component>,
    guild_only: bool,
    handler: Option<Arc<dyn CommandHandler>>,
    sub_handlers: HashMap<String, SubCommandEntry>,
}

impl CommandRegistration {
    pub fn new(declaration: CommandDeclaration, component: Arc<Component>) -> Self {
        Self {
            declaration,
            component,
            guild_only: false,
            handler: None,
            sub_handlers: HashMap::new(),
        }
    }

    pub fn guild_only(mut self) -> Self {
        self.guild_only = true;
        self
    }

    pub fn handler(mut self, handler: Arc<dyn CommandHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn sub(mut self, path: impl Into<String>, handler: Arc<dyn CommandHandler>) -> Self {
        self.sub_handlers.insert(
            path.into(),
            SubCommandEntry {
                handler,
                rate_limited: false,
            },
        );
        self
    }

    /// Register a sub-command that counts against the per-guild toggle
    /// rate limit.
    pub fn sub_rate_limited(
        mut self,
        path: impl Into<String>,
        handler: Arc<dyn CommandHandler>,
    ) -> Self {
        self.sub_handlers.insert(
            path.into(),
            SubCommandEntry {
                handler,
                rate_limited: true,
            },
        );
        self
    }
}

/// Outcome of one reconciliation run.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub unchanged: usize,
    /// Per-command failures as (command name, error description).
    pub failed: Vec<(String, String)>,
}

impl SyncReport {
    pub fn success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of remote mutations issued.
    pub fn mutations(&self) -> usize {
        self.created + self.updated + self.deleted
    }
}

/// Owns the desired command set and reconciles it per guild.
pub struct CommandManager {
    commands: DashMap<String, Arc<RegisteredCommand>>,
    sync_locks: DashMap<GuildId, Arc<tokio::sync::Mutex<()>>>,
    /// Completion time of the last successful manual sync per guild.
    /// Entry expiry equals the cool-down, so presence means "too soon".
    last_manual_sync: Arc<TtlCache<GuildId, Instant>>,
    status: Arc<StatusStore>,
}

impl CommandManager {
    pub fn new(status: Arc<StatusStore>, sync_cooldown: Duration) -> Self {
        Self {
            commands: DashMap::new(),
            sync_locks: DashMap::new(),
            last_manual_sync: Arc::new(TtlCache::new(sync_cooldown)),
            status,
        }
    }

    /// Cache handle used by the lifecycle coordinator to wire the sweeper.
    pub fn manual_sync_cache(&self) -> Arc<TtlCache<GuildId, Instant>> {
        Arc::clone(&self.last_manual_sync)
    }

    /// Whether a manual sync for the guild is still on cool-down.
    /// Handlers check this before acknowledging the interaction.
    pub fn on_cooldown(&self, guild: GuildId) -> bool {
        self.last_manual_sync.get(&guild).is_some()
    }

    /// Append a command to the desired set. Duplicate names are a
    /// programming error and fatal at startup.
    pub fn register(&self, registration: CommandRegistration) -> Result<(), CommandError> {
        let name = registration.declaration.name.clone();
        if self.commands.contains_key(&name) {
            return Err(CommandError::DuplicateCommand(name));
        }

        info!(
            command = %name,
            component = registration.component.code,
            "slash command registered"
        );
        self.commands.insert(
            name,
            Arc::new(RegisteredCommand {
                declaration: registration.declaration,
                component: registration.component,
                guild_only: registration.guild_only,
                handler: registration.handler,
                sub_handlers: registration.sub_handlers,
            }),
        );
        Ok(())
    }

    /// Look up a registered command by its top-level name.
    pub fn get(&self, name: &str) -> Option<Arc<RegisteredCommand>> {
        self.commands.get(name).map(|c| Arc::clone(&c))
    }

    /// The effective desired set for a guild: commands of effectively
    /// enabled components, plus commands of core components
    /// unconditionally.
    pub async fn list_for_guild(
        &self,
        guild: GuildId,
    ) -> Result<Vec<Arc<RegisteredCommand>>, CommandError> {
        let mut desired = Vec::new();
        for entry in self.commands.iter() {
            let command = entry.value();
            if command.component.is_core()
                || self.status.effective(guild, &command.component).await?
            {
                desired.push(Arc::clone(command));
            }
        }

        desired.sort_by(|a, b| a.declaration.name.cmp(&b.declaration.name));
        Ok(desired)
    }

    /// Reconcile the remote command list of a guild with the desired set.
    ///
    /// Create and update run before delete so the command surface never
    /// goes empty mid-sync. Individual create/update/delete failures are
    /// logged and collected; only the initial fetch aborts the run.
    pub async fn sync(
        &self,
        session: &dyn Session,
        guild: GuildId,
    ) -> Result<SyncReport, CommandError> {
        let lock = self
            .sync_locks
            .entry(guild)
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        let desired = self.list_for_guild(guild).await?;
        let remote = session.fetch_guild_commands(guild).await?;
        let remote_by_name: HashMap<&str, &RemoteCommand> = remote
            .iter()
            .map(|r| (r.declaration.name.as_str(), r))
            .collect();

        let mut report = SyncReport::default();

        for command in &desired {
            let name = command.declaration.name.as_str();
            match remote_by_name.get(name) {
                Some(existing) if existing.declaration == command.declaration => {
                    report.unchanged += 1;
                }
                Some(existing) => match session
                    .update_guild_command(guild, &existing.id, &command.declaration)
                    .await
                {
                    Ok(_) => {
                        info!(guild = %guild, command = name, "slash command updated");
                        report.updated += 1;
                    }
                    Err(e) => {
                        warn!(guild = %guild, command = name, error = %e, "failed to update slash command");
                        report.failed.push((name.to_string(), e.to_string()));
                    }
                },
                None => match session.create_guild_command(guild, &command.declaration).await {
                    Ok(_) => {
                        info!(guild = %guild, command = name, "slash command created");
                        report.created += 1;
                    }
                    Err(e) => {
                        warn!(guild = %guild, command = name, error = %e, "failed to create slash command");
                        report.failed.push((name.to_string(), e.to_string()));
                    }
                },
            }
        }

        for orphan in remote
            .iter()
            .filter(|r| !desired.iter().any(|d| d.declaration.name == r.declaration.name))
        {
            let name = orphan.declaration.name.as_str();
            match session.delete_guild_command(guild, &orphan.id).await {
                Ok(()) => {
                    info!(guild = %guild, command = name, "orphaned slash command removed");
                    report.deleted += 1;
                }
                Err(e) => {
                    warn!(guild = %guild, command = name, error = %e, "failed to delete slash command");
                    report.failed.push((name.to_string(), e.to_string()));
                }
            }
        }

        info!(
            guild = %guild,
            created = report.created,
            updated = report.updated,
            deleted = report.deleted,
            unchanged = report.unchanged,
            failures = report.failed.len(),
            "slash command sync finished"
        );
        Ok(report)
    }

    /// Manual sync with the per-guild cool-down applied.
    pub async fn sync_manual(
        &self,
        session: &dyn Session,
        guild: GuildId,
    ) -> Result<SyncReport, CommandError> {
        if self.last_manual_sync.get(&guild).is_some() {
            return Err(CommandError::OnCoolDown);
        }

        let report = self.sync(session, guild).await?;
        if report.success() {
            self.last_manual_sync.insert(guild, Instant::now());
        }
        Ok(report)
    }
}
