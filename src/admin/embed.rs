//! Shared embed shapes for the administrative command tree.

use crate::platform::{Embed, InteractionResponse};

pub const EMBED_TITLE: &str = "JOJO Bot";

/// Base embed all administrative replies build on.
pub fn admin_embed() -> Embed {
    Embed::new(EMBED_TITLE)
}

/// The interim reply sent before slow work starts; the handler edits it
/// with the final result.
pub fn processing_response() -> InteractionResponse {
    InteractionResponse::ephemeral(
        admin_embed().field(":hourglass_flowing_sand: Processing...", "One moment please!"),
    )
}
