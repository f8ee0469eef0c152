//! Runtime lifecycle coordination.
//!
//! The [`Runtime`] wires the registry, status store, command manager and
//! dispatcher together, drives the startup sequence once the session is
//! live, and consumes gateway events afterwards. Storage failures while
//! handling events are logged and the event dropped; the next event
//! retries against the same handles.

use crate::admin::{AdminContext, AuditLogger};
use crate::commands::CommandManager;
use crate::config::RuntimeConfig;
use crate::db::Database;
use crate::dispatch::Dispatcher;
use crate::platform::{GatewayEvent, GuildInfo, Session};
use crate::registry::{ComponentState, Registry};
use crate::status::StatusStore;
use anyhow::Context as _;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Handles a component loader receives when the session opens.
pub struct LoadContext {
    pub session: Arc<dyn Session>,
    pub registry: Arc<Registry>,
    pub status: Arc<StatusStore>,
    pub commands: Arc<CommandManager>,
    pub dispatcher: Arc<Dispatcher>,
    pub admin: Arc<AdminContext>,
}

/// The assembled component runtime.
pub struct Runtime {
    session: Arc<dyn Session>,
    registry: Arc<Registry>,
    status: Arc<StatusStore>,
    commands: Arc<CommandManager>,
    dispatcher: Arc<Dispatcher>,
    admin: Arc<AdminContext>,
    sweep_period: std::time::Duration,
    sweepers: parking_lot::Mutex<Vec<JoinHandle<()>>>,
}

impl Runtime {
    pub fn new(
        config: &RuntimeConfig,
        db: Database,
        registry: Arc<Registry>,
        session: Arc<dyn Session>,
    ) -> Self {
        let status = Arc::new(StatusStore::new(db.clone()));
        let commands = Arc::new(CommandManager::new(
            Arc::clone(&status),
            config.sync_cooldown(),
        ));
        let dispatcher = Arc::new(Dispatcher::new(
            Arc::clone(&commands),
            Arc::clone(&status),
            config.toggle_rate_limit,
            config.toggle_window(),
        ));
        let admin = Arc::new(AdminContext {
            registry: Arc::clone(&registry),
            status: Arc::clone(&status),
            commands: Arc::clone(&commands),
            audit: AuditLogger::new(db),
        });

        Self {
            session,
            registry,
            status,
            commands,
            dispatcher,
            admin,
            sweep_period: config.cache_sweep_period(),
            sweepers: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn status(&self) -> &Arc<StatusStore> {
        &self.status
    }

    pub fn commands(&self) -> &Arc<CommandManager> {
        &self.commands
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    fn load_context(&self) -> LoadContext {
        LoadContext {
            session: Arc::clone(&self.session),
            registry: Arc::clone(&self.registry),
            status: Arc::clone(&self.status),
            commands: Arc::clone(&self.commands),
            dispatcher: Arc::clone(&self.dispatcher),
            admin: Arc::clone(&self.admin),
        }
    }

    /// Run the startup sequence, called once when the session opens.
    ///
    /// Freezes the registry, mirrors every component into storage, runs
    /// the loaders in load-priority order and starts the cache sweepers.
    /// A failing loader marks its component degraded instead of aborting
    /// startup; storage failures while mirroring are fatal.
    pub async fn startup(&self) -> anyhow::Result<()> {
        self.registry.freeze();
        info!(
            components = self.registry.available().len(),
            "registry frozen, starting components"
        );

        for component in self.registry.available() {
            let id = self
                .status
                .ensure_registered(&component)
                .await
                .with_context(|| format!("failed to mirror component {}", component.code))?;
            self.status
                .ensure_global_status_exists(id)
                .await
                .with_context(|| format!("failed to seed global status for {}", component.code))?;
        }

        let ctx = self.load_context();
        for (component, loader) in self.registry.loaders() {
            match loader.load(&ctx).await {
                Ok(()) => {
                    info!(component = component.code, "component loaded");
                    self.registry.set_state(component.code, ComponentState::Loaded);
                }
                Err(e) => {
                    error!(component = component.code, error = %e, "component failed to load");
                    self.registry
                        .set_state(component.code, ComponentState::Degraded);
                }
            }
        }

        let mut sweepers = self.sweepers.lock();
        sweepers.push(
            self.dispatcher
                .toggle_count_cache()
                .spawn_sweeper(self.sweep_period),
        );
        sweepers.push(
            self.commands
                .manual_sync_cache()
                .spawn_sweeper(self.sweep_period),
        );

        Ok(())
    }

    /// Consume gateway events until the channel closes.
    pub async fn run(&self, mut events: mpsc::Receiver<GatewayEvent>) {
        while let Some(event) = events.recv().await {
            self.handle_event(event).await;
        }
        info!("gateway event channel closed, runtime stopping");
    }

    /// Handle a single gateway event. Never propagates errors; the event
    /// loop must survive bad events.
    pub async fn handle_event(&self, event: GatewayEvent) {
        match event {
            GatewayEvent::GuildJoin(info) => {
                if let Err(e) = self.on_guild_join(&info).await {
                    warn!(guild = %info.id, error = %e, "guild join handling failed");
                }
            }
            GatewayEvent::GuildUpdate(info) => {
                if let Err(e) = self.status.database().guilds().upsert(info.id, &info.name).await {
                    warn!(guild = %info.id, error = %e, "guild update handling failed");
                }
            }
            GatewayEvent::InteractionCreate(interaction) => {
                self.dispatcher.handle(self.session.as_ref(), &interaction).await;
            }
        }
    }

    /// First contact with a guild: create its row, seed guild statuses
    /// for default-enabled components and push the initial command set.
    async fn on_guild_join(&self, info: &GuildInfo) -> anyhow::Result<()> {
        let guilds = self.status.database().guilds();
        let row = guilds.upsert(info.id, &info.name).await?;
        info!(guild = %info.id, name = %info.name, "guild joined");

        // Core components never get guild rows; they are not toggleable.
        for component in self.registry.available() {
            if component.is_core() || !component.default_enabled {
                continue;
            }
            let id = self.status.component_id(component.code).await?;
            guilds.seed_component_status(row.id, id, true).await?;
        }

        let report = self.commands.sync(self.session.as_ref(), info.id).await?;
        if !report.success() {
            warn!(
                guild = %info.id,
                failures = report.failed.len(),
                "initial command sync finished with failures"
            );
        }
        Ok(())
    }

    /// Abort the background sweepers.
    pub fn shutdown(&self) {
        for handle in self.sweepers.lock().drain(..) {
            handle.abort();
        }
        info!("runtime shut down");
    }
}
