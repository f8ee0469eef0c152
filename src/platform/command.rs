//! Slash-command declaration types.
//!
//! A [`CommandDeclaration`] is the local, desired shape of a platform
//! slash command. Equality over the whole tree (name, description,
//! options, choices) is what the command manager uses to decide whether a
//! remote command needs an update, so everything here derives `PartialEq`.

use serde::{Deserialize, Serialize};

/// Kind of a command option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    SubCommand,
    SubCommandGroup,
    String,
    Integer,
    Boolean,
    Channel,
}

/// A fixed choice offered for a string or integer option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionChoice {
    pub name: String,
    pub value: String,
}

/// One node of a command's option tree.
///
/// Sub-commands and sub-command groups nest further options; leaf options
/// carry a kind, a required flag and optional choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOption {
    pub kind: OptionKind,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<OptionChoice>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
}

impl CommandOption {
    /// Leaf option without choices or nested options.
    pub fn new(kind: OptionKind, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            description: description.into(),
            required: false,
            choices: Vec::new(),
            options: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_choices(mut self, choices: Vec<OptionChoice>) -> Self {
        self.choices = choices;
        self
    }

    pub fn with_options(mut self, options: Vec<CommandOption>) -> Self {
        self.options = options;
        self
    }
}

/// Desired declaration of a top-level slash command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDeclaration {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
}

impl CommandDeclaration {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: Vec<CommandOption>) -> Self {
        self.options = options;
        self
    }

    /// Check whether a sub-command path such as `"module enable"` exists
    /// in this declaration's option tree.
    pub fn has_sub_path(&self, path: &str) -> bool {
        let mut options = &self.options;
        let mut segments = path.split(' ').peekable();

        while let Some(segment) = segments.next() {
            let Some(node) = options.iter().find(|o| {
                o.name == segment
                    && matches!(o.kind, OptionKind::SubCommand | OptionKind::SubCommandGroup)
            }) else {
                return false;
            };

            match node.kind {
                OptionKind::SubCommand => return segments.peek().is_none(),
                OptionKind::SubCommandGroup => options = &node.options,
                _ => unreachable!(),
            }
        }

        false
    }

    /// Whether this declaration has any sub-command or group at all.
    pub fn has_sub_commands(&self) -> bool {
        self.options
            .iter()
            .any(|o| matches!(o.kind, OptionKind::SubCommand | OptionKind::SubCommandGroup))
    }
}
