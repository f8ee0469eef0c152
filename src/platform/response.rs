//! Interaction response payloads.
//!
//! Rendering is deliberately minimal: a response is a set of embed fields
//! the SDK binding serializes verbatim. The runtime only decides content
//! and the ephemeral flag.

use serde::{Deserialize, Serialize};

/// Accent color used for all runtime-produced embeds.
pub const DEFAULT_EMBED_COLOR: u32 = 0x5B_CE_FA;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub color: u32,
    #[serde(default)]
    pub fields: Vec<EmbedField>,
}

impl Embed {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            color: DEFAULT_EMBED_COLOR,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
        });
        self
    }
}

/// Response to an interaction, sent or edited through the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionResponse {
    #[serde(default)]
    pub embeds: Vec<Embed>,
    pub ephemeral: bool,
}

impl InteractionResponse {
    /// Ephemeral single-embed response, the shape all administrative and
    /// error replies use.
    pub fn ephemeral(embed: Embed) -> Self {
        Self {
            embeds: vec![embed],
            ephemeral: true,
        }
    }

    pub fn public(embed: Embed) -> Self {
        Self {
            embeds: vec![embed],
            ephemeral: false,
        }
    }
}
