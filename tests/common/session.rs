//! Recording mock session backing the integration tests.

use async_trait::async_trait;
use jojo_bot::platform::{
    ChannelId, ChannelInfo, CommandDeclaration, GuildId, GuildInfo, Interaction,
    InteractionResponse, RemoteCommand, Session, SessionError,
};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// In-memory session double. Remote guild commands live in a map; every
/// response, edit and channel message is recorded for assertions, and the
/// acknowledge protocol is enforced like the real platform does.
#[derive(Default)]
pub struct MockSession {
    guilds: Mutex<HashMap<GuildId, GuildInfo>>,
    commands: Mutex<HashMap<GuildId, Vec<RemoteCommand>>>,
    responses: Mutex<Vec<(String, InteractionResponse)>>,
    edits: Mutex<Vec<(String, InteractionResponse)>>,
    channel_messages: Mutex<Vec<(ChannelId, String)>>,
    acknowledged: Mutex<HashSet<String>>,
    next_command_id: AtomicU64,
    mutations: AtomicU64,
    fail_mutations: AtomicBool,
}

impl MockSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_guild(&self, id: GuildId, name: &str) {
        self.guilds.lock().insert(
            id,
            GuildInfo {
                id,
                name: name.to_string(),
            },
        );
    }

    /// Names of the commands currently registered for a guild, sorted.
    pub fn remote_names(&self, guild: GuildId) -> Vec<String> {
        let mut names: Vec<String> = self
            .commands
            .lock()
            .get(&guild)
            .map(|cmds| cmds.iter().map(|c| c.declaration.name.clone()).collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Total create/update/delete calls issued so far.
    pub fn mutation_count(&self) -> u64 {
        self.mutations.load(Ordering::SeqCst)
    }

    /// Last initial response recorded for an interaction id.
    pub fn response_for(&self, interaction_id: &str) -> Option<InteractionResponse> {
        self.responses
            .lock()
            .iter()
            .rev()
            .find(|(id, _)| id == interaction_id)
            .map(|(_, r)| r.clone())
    }

    /// Last edit recorded for an interaction id.
    pub fn edit_for(&self, interaction_id: &str) -> Option<InteractionResponse> {
        self.edits
            .lock()
            .iter()
            .rev()
            .find(|(id, _)| id == interaction_id)
            .map(|(_, r)| r.clone())
    }

    pub fn channel_messages(&self) -> Vec<(ChannelId, String)> {
        self.channel_messages.lock().clone()
    }

    /// Remote command stored for a guild, by name.
    pub fn remote_command(&self, guild: GuildId, name: &str) -> Option<RemoteCommand> {
        self.commands
            .lock()
            .get(&guild)
            .and_then(|cmds| cmds.iter().find(|c| c.declaration.name == name))
            .cloned()
    }

    /// Rewrite the stored description of a remote command, simulating
    /// out-of-band drift on the platform side. Not counted as a mutation.
    pub fn drift_remote_declaration(&self, guild: GuildId, name: &str, description: &str) {
        let mut commands = self.commands.lock();
        let slot = commands
            .get_mut(&guild)
            .and_then(|cmds| cmds.iter_mut().find(|c| c.declaration.name == name))
            .expect("remote command to drift");
        slot.declaration.description = description.to_string();
    }

    /// Make every subsequent create/update/delete call fail.
    pub fn fail_mutations(&self, fail: bool) {
        self.fail_mutations.store(fail, Ordering::SeqCst);
    }

    fn mutate(&self) -> Result<(), SessionError> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(SessionError::Transport("injected failure".to_string()));
        }
        Ok(())
    }
}

/// Text of every embed field in a response, flattened for matching.
pub fn response_text(response: &InteractionResponse) -> String {
    let mut text = String::new();
    for embed in &response.embeds {
        for field in &embed.fields {
            text.push_str(&field.name);
            text.push(' ');
            text.push_str(&field.value);
            text.push(' ');
        }
    }
    text
}

#[async_trait]
impl Session for MockSession {
    async fn respond(
        &self,
        interaction: &Interaction,
        response: InteractionResponse,
    ) -> Result<(), SessionError> {
        if !self.acknowledged.lock().insert(interaction.id.clone()) {
            return Err(SessionError::AlreadyAcknowledged);
        }
        self.responses.lock().push((interaction.id.clone(), response));
        Ok(())
    }

    async fn edit_response(
        &self,
        interaction: &Interaction,
        response: InteractionResponse,
    ) -> Result<(), SessionError> {
        if !self.acknowledged.lock().contains(&interaction.id) {
            return Err(SessionError::NotAcknowledged);
        }
        self.edits.lock().push((interaction.id.clone(), response));
        Ok(())
    }

    async fn send_channel_message(
        &self,
        channel: ChannelId,
        text: &str,
    ) -> Result<(), SessionError> {
        self.channel_messages
            .lock()
            .push((channel, text.to_string()));
        Ok(())
    }

    async fn fetch_guild(&self, guild: GuildId) -> Result<GuildInfo, SessionError> {
        self.guilds
            .lock()
            .get(&guild)
            .cloned()
            .ok_or(SessionError::UnknownGuild(guild))
    }

    async fn fetch_guild_channels(
        &self,
        _guild: GuildId,
    ) -> Result<Vec<ChannelInfo>, SessionError> {
        Ok(vec![ChannelInfo {
            id: ChannelId(1),
            name: "general".to_string(),
        }])
    }

    async fn fetch_guild_commands(
        &self,
        guild: GuildId,
    ) -> Result<Vec<RemoteCommand>, SessionError> {
        Ok(self.commands.lock().get(&guild).cloned().unwrap_or_default())
    }

    async fn create_guild_command(
        &self,
        guild: GuildId,
        declaration: &CommandDeclaration,
    ) -> Result<RemoteCommand, SessionError> {
        self.mutate()?;
        let command = RemoteCommand {
            id: self.next_command_id.fetch_add(1, Ordering::SeqCst).to_string(),
            declaration: declaration.clone(),
        };
        self.commands
            .lock()
            .entry(guild)
            .or_default()
            .push(command.clone());
        Ok(command)
    }

    async fn update_guild_command(
        &self,
        guild: GuildId,
        command_id: &str,
        declaration: &CommandDeclaration,
    ) -> Result<RemoteCommand, SessionError> {
        self.mutate()?;
        let mut commands = self.commands.lock();
        let slot = commands
            .get_mut(&guild)
            .and_then(|cmds| cmds.iter_mut().find(|c| c.id == command_id))
            .ok_or_else(|| SessionError::UnknownCommand(command_id.to_string()))?;
        slot.declaration = declaration.clone();
        Ok(slot.clone())
    }

    async fn delete_guild_command(
        &self,
        guild: GuildId,
        command_id: &str,
    ) -> Result<(), SessionError> {
        self.mutate()?;
        let mut commands = self.commands.lock();
        let Some(cmds) = commands.get_mut(&guild) else {
            return Err(SessionError::UnknownCommand(command_id.to_string()));
        };
        let before = cmds.len();
        cmds.retain(|c| c.id != command_id);
        if cmds.len() == before {
            return Err(SessionError::UnknownCommand(command_id.to_string()));
        }
        Ok(())
    }
}
