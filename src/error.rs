//! Unified error handling for the component runtime.
//!
//! Errors split into three families: fatal startup errors (registration
//! misuse), storage errors, and handler errors. Handler errors carry a
//! fixed-copy ephemeral embed for the user-facing kinds and an
//! `error_code()` string for log labeling.

use crate::platform::{Embed, InteractionResponse, SessionError};
use thiserror::Error;

pub use crate::db::DbError;

/// Errors raised when components are registered.
///
/// Both variants are programming errors and fatal at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("component already registered: {0}")]
    AlreadyRegistered(String),

    #[error("registry is frozen, components must register before the session opens")]
    RegistryFrozen,
}

/// Errors raised by the status store.
#[derive(Debug, Error)]
pub enum StatusError {
    /// Guild statuses of core components are never mutated by users.
    #[error("component {0} is a core component and cannot be toggled")]
    ForbiddenOnCore(String),

    #[error("unknown component: {0}")]
    NotFound(String),

    #[error(transparent)]
    Db(#[from] DbError),
}

/// Errors raised by the command manager.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Registering two commands with the same name is a programming
    /// error and fatal at startup.
    #[error("command already registered: {0}")]
    DuplicateCommand(String),

    /// Manual sync requested inside the cool-down window.
    #[error("command sync is on cool-down")]
    OnCoolDown,

    #[error(transparent)]
    Status(#[from] StatusError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error("session error: {0}")]
    Session(#[from] SessionError),
}

/// Errors that can occur while dispatching or running a handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("unknown sub-command: {0}")]
    UnknownSubCommand(String),

    #[error("component {component} is disabled ({scope})")]
    ComponentDisabled {
        component: String,
        /// `"guild"` when only the guild status blocks the component,
        /// `"global"` when the kill-switch is active.
        scope: &'static str,
    },

    #[error("command is only available in guilds")]
    GuildOnly,

    #[error("module toggle rate limit exceeded")]
    RateLimited,

    #[error("command sync is on cool-down")]
    OnCoolDown,

    #[error(transparent)]
    Status(#[from] StatusError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for interaction handlers.
pub type HandlerResult = Result<(), HandlerError>;

impl From<CommandError> for HandlerError {
    fn from(e: CommandError) -> Self {
        match e {
            CommandError::OnCoolDown => Self::OnCoolDown,
            CommandError::Status(e) => Self::Status(e),
            CommandError::Db(e) => Self::Db(e),
            CommandError::Session(e) => Self::Session(e),
            CommandError::DuplicateCommand(name) => {
                Self::Internal(format!("duplicate command: {name}"))
            }
        }
    }
}

impl HandlerError {
    /// Static error code string for log labeling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCommand(_) => "unknown_command",
            Self::UnknownSubCommand(_) => "unknown_sub_command",
            Self::ComponentDisabled { .. } => "component_disabled",
            Self::GuildOnly => "guild_only",
            Self::RateLimited => "rate_limited",
            Self::OnCoolDown => "on_cool_down",
            Self::Status(StatusError::ForbiddenOnCore(_)) => "forbidden_on_core",
            Self::Status(StatusError::NotFound(_)) => "not_found",
            Self::Status(StatusError::Db(_)) => "storage_error",
            Self::Db(_) => "storage_error",
            Self::Session(_) => "session_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Convert to the ephemeral embed shown to the user.
    ///
    /// Storage, session and internal errors all collapse into the same
    /// generic failure embed so nothing technical leaks to the platform.
    pub fn to_response(&self) -> InteractionResponse {
        let embed = match self {
            Self::UnknownCommand(name) => Embed::new("JOJO Bot").field(
                ":question: Unknown command",
                format!("The command `/{name}` does not exist!"),
            ),
            Self::UnknownSubCommand(path) => Embed::new("JOJO Bot").field(
                ":question: Unknown command",
                format!("The executed (sub)command `/{path}` is invalid or does not exist!"),
            ),
            Self::ComponentDisabled { component, scope } if *scope == "global" => {
                Embed::new("JOJO Bot").field(
                    ":no_entry_sign: STOP :no_entry_sign:",
                    format!(
                        "This command is globally disabled. This might be due to \
                         maintenance on the `{component}` module."
                    ),
                )
            }
            Self::ComponentDisabled { component, .. } => Embed::new("JOJO Bot").field(
                ":no_entry_sign: STOP :no_entry_sign:",
                format!(
                    "This command is disabled on this guild! Ask your guild's \
                     administrator to enable the `{component}` module to use it!"
                ),
            ),
            Self::GuildOnly => Embed::new("JOJO Bot").field(
                ":x: Guilds only!",
                "This command can only be used on a guild, not in direct messages!",
            ),
            Self::RateLimited => Embed::new("JOJO Bot").field(
                ":x: Slow down my friend!",
                "The `/jojo module enable` and `/jojo module disable` commands can \
                 only be used up to 10 times in 10 minutes per guild!",
            ),
            Self::OnCoolDown => Embed::new("JOJO Bot").field(
                ":x: Too fast!",
                "This command can only be used once every 10 minutes!",
            ),
            Self::Status(StatusError::ForbiddenOnCore(component)) => {
                Embed::new("JOJO Bot").field(
                    ":x: Hands off!",
                    format!("The `{component}` module is a core module and cannot be toggled!"),
                )
            }
            Self::Status(StatusError::NotFound(component)) => Embed::new("JOJO Bot").field(
                ":x: Unknown module",
                format!("There is no module named `{component}`!"),
            ),
            Self::Status(StatusError::Db(_))
            | Self::Db(_)
            | Self::Session(_)
            | Self::Internal(_) => Embed::new("JOJO Bot").field(
                ":no_entry_sign: STOP :no_entry_sign:",
                "Something went wrong while processing your command, please try again later!",
            ),
        };

        InteractionResponse::ephemeral(embed)
    }
}
