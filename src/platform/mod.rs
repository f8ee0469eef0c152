//! Platform-facing types and the session abstraction.
//!
//! The runtime never talks to the chat platform directly. Everything it
//! needs from the gateway SDK is expressed through the [`Session`] trait
//! and the payload types in this module; the launcher supplies a concrete
//! binding.

mod command;
mod interaction;
mod response;
mod session;

pub use command::{CommandDeclaration, CommandOption, OptionChoice, OptionKind};
pub use interaction::{
    CommandInvocation, GatewayEvent, Interaction, InteractionData, OptionData, OptionValue,
};
pub use response::{Embed, EmbedField, InteractionResponse};
pub use session::{ChannelInfo, GuildInfo, RemoteCommand, Session, SessionError, UserInfo};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric id of a guild (chat server) on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuildId(pub u64);

/// Numeric id of a channel on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub u64);

/// Numeric id of a user on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl fmt::Display for GuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
