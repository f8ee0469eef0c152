//! The session trait the runtime consumes from the gateway SDK.

use super::command::CommandDeclaration;
use super::interaction::Interaction;
use super::response::InteractionResponse;
use super::{ChannelId, GuildId, UserId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Transport-level failures surfaced by a session implementation.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unknown guild: {0}")]
    UnknownGuild(GuildId),
    #[error("unknown command id: {0}")]
    UnknownCommand(String),
    #[error("interaction already acknowledged")]
    AlreadyAcknowledged,
    #[error("interaction not acknowledged yet")]
    NotAcknowledged,
}

/// Guild metadata as delivered by the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildInfo {
    pub id: GuildId,
    pub name: String,
}

/// Channel metadata as delivered by the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub id: ChannelId,
    pub name: String,
}

/// User metadata attached to interactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: UserId,
    pub username: String,
}

/// A command as currently registered on the platform for a guild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteCommand {
    /// Platform-assigned command id, needed for update and delete calls.
    pub id: String,
    pub declaration: CommandDeclaration,
}

/// Live connection to the chat platform.
///
/// The gateway SDK owns transport, rate limiting and wire formats; the
/// runtime only issues these calls. Every method may block on network IO.
#[async_trait]
pub trait Session: Send + Sync {
    /// Send the initial response to an interaction.
    async fn respond(
        &self,
        interaction: &Interaction,
        response: InteractionResponse,
    ) -> Result<(), SessionError>;

    /// Replace a previously sent response.
    async fn edit_response(
        &self,
        interaction: &Interaction,
        response: InteractionResponse,
    ) -> Result<(), SessionError>;

    /// Post a plain text message into a channel.
    async fn send_channel_message(&self, channel: ChannelId, text: &str)
        -> Result<(), SessionError>;

    async fn fetch_guild(&self, guild: GuildId) -> Result<GuildInfo, SessionError>;

    async fn fetch_guild_channels(&self, guild: GuildId)
        -> Result<Vec<ChannelInfo>, SessionError>;

    /// List the slash commands currently registered for a guild.
    async fn fetch_guild_commands(&self, guild: GuildId)
        -> Result<Vec<RemoteCommand>, SessionError>;

    async fn create_guild_command(
        &self,
        guild: GuildId,
        declaration: &CommandDeclaration,
    ) -> Result<RemoteCommand, SessionError>;

    async fn update_guild_command(
        &self,
        guild: GuildId,
        command_id: &str,
        declaration: &CommandDeclaration,
    ) -> Result<RemoteCommand, SessionError>;

    async fn delete_guild_command(
        &self,
        guild: GuildId,
        command_id: &str,
    ) -> Result<(), SessionError>;
}
