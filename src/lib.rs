//! Component runtime for a guild-based chat bot.
//!
//! The crate turns a set of in-process components into a live bot: the
//! [`registry::Registry`] collects components before the session opens,
//! the [`status::StatusStore`] persists their two-level enablement, the
//! [`commands::CommandManager`] reconciles per-guild slash commands, and
//! the [`dispatch::Dispatcher`] routes interactions to handlers. The
//! [`lifecycle::Runtime`] wires it all together and consumes gateway
//! events.
//!
//! The gateway SDK is abstracted behind [`platform::Session`]; embedders
//! provide an implementation, register components (the built-ins via
//! [`components::register_all`] or their own), and drive
//! [`lifecycle::Runtime::run`] with gateway events.

pub mod admin;
pub mod cache;
pub mod commands;
pub mod components;
pub mod config;
pub mod db;
pub mod dispatch;
pub mod error;
pub mod lifecycle;
pub mod platform;
pub mod registry;
pub mod status;

pub use config::RuntimeConfig;
pub use error::{HandlerError, HandlerResult};
pub use lifecycle::Runtime;
pub use registry::{Component, Registry};
