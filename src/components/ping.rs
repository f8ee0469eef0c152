//! Liveness check component.

use crate::commands::{CommandHandler, CommandRegistration};
use crate::error::HandlerResult;
use crate::lifecycle::LoadContext;
use crate::platform::{CommandDeclaration, Embed, Interaction, InteractionResponse, Session};
use crate::registry::{Category, Component, ComponentLoader};
use anyhow::Context as _;
use async_trait::async_trait;
use std::sync::Arc;

pub const CODE: &str = "ping";

pub fn definition() -> Component {
    Component {
        code: CODE,
        name: "Ping",
        description: "Checks whether the bot is alive",
        categories: &[Category::Utility],
        load_priority: 10,
        default_enabled: true,
        core: false,
    }
}

pub struct PingHandler;

#[async_trait]
impl CommandHandler for PingHandler {
    async fn handle(&self, session: &dyn Session, interaction: &Interaction) -> HandlerResult {
        let embed = Embed::new("Ping").field(":ping_pong: Pong!", "The bot is alive.");
        session
            .respond(interaction, InteractionResponse::public(embed))
            .await?;
        Ok(())
    }
}

pub struct Loader;

#[async_trait]
impl ComponentLoader for Loader {
    async fn load(&self, ctx: &LoadContext) -> anyhow::Result<()> {
        let owner = ctx.registry.get_by_code(CODE).context("ping not registered")?;

        ctx.commands.register(
            CommandRegistration::new(
                CommandDeclaration::new("ping", "Check whether the bot is alive"),
                owner,
            )
            .handler(Arc::new(PingHandler)),
        )?;
        Ok(())
    }
}
