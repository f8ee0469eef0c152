//! Incoming interaction and gateway event shapes.

use super::session::{GuildInfo, UserInfo};
use super::{ChannelId, GuildId};
use serde::{Deserialize, Serialize};

/// Events the lifecycle coordinator consumes from the gateway.
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    GuildJoin(GuildInfo),
    GuildUpdate(GuildInfo),
    InteractionCreate(Interaction),
}

/// A single user interaction delivered by the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// Platform-assigned interaction id, used as response token.
    pub id: String,
    /// Guild the interaction originated from; `None` for direct messages.
    pub guild_id: Option<GuildId>,
    pub channel_id: Option<ChannelId>,
    pub user: UserInfo,
    pub data: InteractionData,
}

/// The four interaction shapes the dispatcher routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionData {
    /// Slash-command invocation, including sub-command paths inside the
    /// option tree.
    Command(CommandInvocation),
    /// Button or select action on a message. The custom id carries the
    /// routing key.
    MessageAction { custom_id: String },
    /// Modal submission.
    ModalSubmit {
        custom_id: String,
        fields: Vec<(String, String)>,
    },
}

/// Invoked command name plus the configured option tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandInvocation {
    pub name: String,
    #[serde(default)]
    pub options: Vec<OptionValue>,
}

/// One configured option on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionValue {
    pub name: String,
    pub data: OptionData,
}

/// Typed option payload. Sub-commands and groups nest further options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionData {
    String(String),
    Integer(i64),
    Boolean(bool),
    Channel(ChannelId),
    SubCommand(Vec<OptionValue>),
    SubCommandGroup(Vec<OptionValue>),
}

impl Interaction {
    /// Resolve the full command path of a slash interaction, e.g.
    /// `"jojo module enable"`. Non-command interactions yield `None`.
    pub fn command_path(&self) -> Option<String> {
        let InteractionData::Command(invocation) = &self.data else {
            return None;
        };

        let mut path = invocation.name.clone();
        let mut options = &invocation.options;

        loop {
            match options.first().map(|o| (&o.name, &o.data)) {
                Some((name, OptionData::SubCommand(_))) => {
                    path.push(' ');
                    path.push_str(name);
                    return Some(path);
                }
                Some((name, OptionData::SubCommandGroup(inner))) => {
                    path.push(' ');
                    path.push_str(name);
                    options = inner;
                }
                _ => return Some(path),
            }
        }
    }

    /// The innermost sub-command option of a slash interaction, if any.
    ///
    /// Handlers receive this as their sub-option argument so they can read
    /// the configured leaf options without re-walking the tree.
    pub fn sub_option(&self) -> Option<&OptionValue> {
        let InteractionData::Command(invocation) = &self.data else {
            return None;
        };

        let mut current = invocation.options.first()?;
        loop {
            match &current.data {
                OptionData::SubCommand(_) => return Some(current),
                OptionData::SubCommandGroup(inner) => current = inner.first()?,
                _ => return None,
            }
        }
    }
}

impl OptionValue {
    /// Nested options of a sub-command or group; empty for leaf options.
    pub fn nested(&self) -> &[OptionValue] {
        match &self.data {
            OptionData::SubCommand(inner) | OptionData::SubCommandGroup(inner) => inner,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::UserId;

    fn interaction(data: InteractionData) -> Interaction {
        Interaction {
            id: "1".into(),
            guild_id: Some(GuildId(42)),
            channel_id: Some(ChannelId(7)),
            user: UserInfo {
                id: UserId(9),
                username: "alice".into(),
            },
            data,
        }
    }

    #[test]
    fn command_path_descends_groups() {
        let ix = interaction(InteractionData::Command(CommandInvocation {
            name: "jojo".into(),
            options: vec![OptionValue {
                name: "module".into(),
                data: OptionData::SubCommandGroup(vec![OptionValue {
                    name: "enable".into(),
                    data: OptionData::SubCommand(vec![OptionValue {
                        name: "module".into(),
                        data: OptionData::String("dice".into()),
                    }]),
                }]),
            }],
        }));

        assert_eq!(ix.command_path().as_deref(), Some("jojo module enable"));
        let sub = ix.sub_option().expect("sub option");
        assert_eq!(sub.name, "enable");
        assert_eq!(sub.nested().len(), 1);
    }

    #[test]
    fn command_path_plain_command() {
        let ix = interaction(InteractionData::Command(CommandInvocation {
            name: "dice".into(),
            options: vec![OptionValue {
                name: "roll".into(),
                data: OptionData::String("2d6".into()),
            }],
        }));

        assert_eq!(ix.command_path().as_deref(), Some("dice"));
        assert!(ix.sub_option().is_none());
    }
}
