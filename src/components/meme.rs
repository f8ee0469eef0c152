//! Meme fetching component.

use crate::commands::{CommandHandler, CommandRegistration};
use crate::error::{HandlerError, HandlerResult};
use crate::lifecycle::LoadContext;
use crate::platform::{CommandDeclaration, Embed, Interaction, InteractionResponse, Session};
use crate::registry::{Category, Component, ComponentLoader};
use anyhow::Context as _;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

pub const CODE: &str = "meme";

const MEME_API_URL: &str = "https://meme-api.com/gimme";
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

pub fn definition() -> Component {
    Component {
        code: CODE,
        name: "Meme",
        description: "Fetches a random meme",
        categories: &[Category::Fun],
        load_priority: 50,
        // Opt-in: guild admins enable this explicitly.
        default_enabled: false,
        core: false,
    }
}

#[derive(Debug, Deserialize)]
struct MemePayload {
    title: String,
    url: String,
    #[serde(rename = "postLink")]
    post_link: String,
}

pub struct MemeHandler {
    client: reqwest::Client,
}

impl MemeHandler {
    fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .context("failed to build meme http client")?;
        Ok(Self { client })
    }

    async fn fetch(&self) -> Result<MemePayload, HandlerError> {
        self.client
            .get(MEME_API_URL)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| HandlerError::Internal(format!("meme fetch failed: {e}")))?
            .json::<MemePayload>()
            .await
            .map_err(|e| HandlerError::Internal(format!("meme payload invalid: {e}")))
    }
}

#[async_trait]
impl CommandHandler for MemeHandler {
    async fn handle(&self, session: &dyn Session, interaction: &Interaction) -> HandlerResult {
        let meme = self.fetch().await?;

        let embed = Embed::new(meme.title)
            .field("Image", meme.url)
            .field("Source", meme.post_link);
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
        let owner = ctx.registry.get_by_code(CODE).context("meme not registered")?;

        ctx.commands.register(
            CommandRegistration::new(
                CommandDeclaration::new("meme", "Fetch a random meme"),
                owner,
            )
            .handler(Arc::new(MemeHandler::new()?)),
        )?;
        Ok(())
    }
}
