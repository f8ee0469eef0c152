//! The administrative `/jojo` command tree.
//!
//! Everything here runs with the shared [`AdminContext`], which bundles
//! the handles the admin handlers need. The context is built once at
//! startup and cloned into each handler.

mod audit;
mod auditlog;
mod embed;
mod module;
mod sync_commands;

pub use audit::AuditLogger;
pub use embed::{admin_embed, processing_response, EMBED_TITLE};

use crate::commands::{CommandManager, CommandRegistration};
use crate::platform::{CommandDeclaration, CommandOption, OptionChoice, OptionKind};
use crate::registry::{Component, Registry};
use crate::status::StatusStore;
use std::sync::Arc;

/// Shared handles for the administrative handlers.
pub struct AdminContext {
    pub registry: Arc<Registry>,
    pub status: Arc<StatusStore>,
    pub commands: Arc<CommandManager>,
    pub audit: AuditLogger,
}

/// The `/jojo` declaration, with module choices drawn from the registry.
pub fn jojo_declaration(registry: &Registry) -> CommandDeclaration {
    let module_choices: Vec<OptionChoice> = registry
        .available()
        .iter()
        .filter(|c| !c.is_core())
        .map(|c| OptionChoice {
            name: c.name.to_string(),
            value: c.code.to_string(),
        })
        .collect();

    let module_option = || {
        CommandOption::new(OptionKind::String, "module", "The module to target")
            .required()
            .with_choices(module_choices.clone())
    };

    CommandDeclaration::new("jojo", "Manage the bot on this guild").with_options(vec![
        CommandOption::new(OptionKind::SubCommandGroup, "module", "Manage modules").with_options(
            vec![
                CommandOption::new(OptionKind::SubCommand, "list", "List all modules"),
                CommandOption::new(OptionKind::SubCommand, "show", "Show details of a module")
                    .with_options(vec![module_option()]),
                CommandOption::new(
                    OptionKind::SubCommand,
                    "enable",
                    "Enable a module on this guild",
                )
                .with_options(vec![module_option()]),
                CommandOption::new(
                    OptionKind::SubCommand,
                    "disable",
                    "Disable a module on this guild",
                )
                .with_options(vec![module_option()]),
            ],
        ),
        CommandOption::new(
            OptionKind::SubCommand,
            "sync-commands",
            "Force a slash-command synchronization for this guild",
        ),
        CommandOption::new(OptionKind::SubCommandGroup, "auditlog", "Manage the audit log")
            .with_options(vec![
                CommandOption::new(OptionKind::SubCommand, "status", "Show the audit-log status"),
                CommandOption::new(OptionKind::SubCommand, "enable", "Enable the audit log")
                    .with_options(vec![CommandOption::new(
                        OptionKind::Channel,
                        "channel",
                        "Channel to post audit messages to",
                    )]),
                CommandOption::new(OptionKind::SubCommand, "disable", "Disable the audit log"),
            ]),
    ])
}

/// Build the `/jojo` registration for the owning core component.
///
/// The enable/disable sub-commands are flagged for the toggle rate limit;
/// the whole tree is guild-only.
pub fn jojo_registration(ctx: &Arc<AdminContext>, owner: Arc<Component>) -> CommandRegistration {
    CommandRegistration::new(jojo_declaration(&ctx.registry), owner)
        .guild_only()
        .sub(
            "module list",
            Arc::new(module::ModuleList { ctx: Arc::clone(ctx) }),
        )
        .sub(
            "module show",
            Arc::new(module::ModuleShow { ctx: Arc::clone(ctx) }),
        )
        .sub_rate_limited(
            "module enable",
            Arc::new(module::ModuleToggle {
                ctx: Arc::clone(ctx),
                enable: true,
            }),
        )
        .sub_rate_limited(
            "module disable",
            Arc::new(module::ModuleToggle {
                ctx: Arc::clone(ctx),
                enable: false,
            }),
        )
        .sub(
            "sync-commands",
            Arc::new(sync_commands::SyncCommands { ctx: Arc::clone(ctx) }),
        )
        .sub(
            "auditlog status",
            Arc::new(auditlog::AuditLogStatus { ctx: Arc::clone(ctx) }),
        )
        .sub(
            "auditlog enable",
            Arc::new(auditlog::AuditLogEnable { ctx: Arc::clone(ctx) }),
        )
        .sub(
            "auditlog disable",
            Arc::new(auditlog::AuditLogDisable { ctx: Arc::clone(ctx) }),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Category, ComponentLoader};
    use crate::lifecycle::LoadContext;
    use async_trait::async_trait;

    struct NoopLoader;

    #[async_trait]
    impl ComponentLoader for NoopLoader {
        async fn load(&self, _ctx: &LoadContext) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn declaration_covers_all_handled_paths() {
        let registry = Registry::new();
        registry
            .register(
                Component {
                    code: "dice",
                    name: "Dice",
                    description: "Rolls dice",
                    categories: &[Category::Fun],
                    load_priority: 0,
                    default_enabled: true,
                    core: false,
                },
                Arc::new(NoopLoader),
            )
            .unwrap();

        let decl = jojo_declaration(&registry);
        for path in [
            "module list",
            "module show",
            "module enable",
            "module disable",
            "sync-commands",
            "auditlog status",
            "auditlog enable",
            "auditlog disable",
        ] {
            assert!(decl.has_sub_path(path), "missing sub path {path}");
        }
    }

    #[test]
    fn module_choices_exclude_core_components() {
        let registry = Registry::new();
        registry
            .register(
                Component {
                    code: "bot_core",
                    name: "Core",
                    description: "Core infrastructure",
                    categories: &[Category::Internal],
                    load_priority: 1000,
                    default_enabled: true,
                    core: true,
                },
                Arc::new(NoopLoader),
            )
            .unwrap();
        registry
            .register(
                Component {
                    code: "dice",
                    name: "Dice",
                    description: "Rolls dice",
                    categories: &[Category::Fun],
                    load_priority: 0,
                    default_enabled: true,
                    core: false,
                },
                Arc::new(NoopLoader),
            )
            .unwrap();

        let decl = jojo_declaration(&registry);
        let module_group = decl.options.iter().find(|o| o.name == "module").unwrap();
        let show = module_group.options.iter().find(|o| o.name == "show").unwrap();
        let choices = &show.options[0].choices;
        assert_eq!(choices.len(), 1);
        assert_eq!(choices[0].value, "dice");
    }
}
