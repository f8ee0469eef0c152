//! Core component owning the administrative `/jojo` command.

use crate::admin;
use crate::lifecycle::LoadContext;
use crate::registry::{Category, Component, ComponentLoader};
use anyhow::Context as _;
use async_trait::async_trait;

pub const CODE: &str = "bot_core";

pub fn definition() -> Component {
    Component {
        code: CODE,
        name: "Bot Core",
        description: "Administrative commands and bot infrastructure",
        categories: &[Category::Internal],
        // Loads before everything else so `/jojo` exists from the start.
        load_priority: 1000,
        default_enabled: true,
        core: true,
    }
}

pub struct Loader;

#[async_trait]
impl ComponentLoader for Loader {
    async fn load(&self, ctx: &LoadContext) -> anyhow::Result<()> {
        let owner = ctx
            .registry
            .get_by_code(CODE)
            .context("bot_core not registered")?;

        ctx.commands
            .register(admin::jojo_registration(&ctx.admin, owner))?;
        Ok(())
    }
}
