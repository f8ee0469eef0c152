use crate::error::HandlerResult;
use crate::platform::{Interaction, Session};
use async_trait::async_trait;

/// Handler for a slash-command invocation.
///
/// Handlers run after the dispatcher's gates (enablement, guild-only,
/// rate limit) have passed. The interaction carries the resolved
/// options; sub-command handlers read them via
/// [`Interaction::sub_option`].
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, session: &dyn Session, interaction: &Interaction) -> HandlerResult;
}
