//! Dice rolling component.

use crate::commands::{CommandHandler, CommandRegistration};
use crate::dispatch::OptionsMap;
use crate::error::HandlerResult;
use crate::lifecycle::LoadContext;
use crate::platform::{
    CommandDeclaration, CommandOption, Embed, Interaction, InteractionData, InteractionResponse,
    OptionKind, Session,
};
use crate::registry::{Category, Component, ComponentLoader};
use anyhow::Context as _;
use async_trait::async_trait;
use rand::Rng;
use std::fmt::Write as _;
use std::sync::Arc;

pub const CODE: &str = "dice";

const MAX_DICE: u32 = 100;
const MAX_SIDES: u32 = 1000;

pub fn definition() -> Component {
    Component {
        code: CODE,
        name: "Dice",
        description: "Rolls dice expressions like 2d6+1",
        categories: &[Category::Fun],
        load_priority: 100,
        default_enabled: true,
        core: false,
    }
}

/// A parsed roll expression of the form `[count]d<sides>[+/-modifier]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RollSpec {
    count: u32,
    sides: u32,
    modifier: i32,
}

impl RollSpec {
    fn parse(input: &str) -> Result<Self, String> {
        let input = input.trim().to_ascii_lowercase();
        let (dice, modifier) = match input.find(['+', '-']) {
            Some(pos) => {
                let modifier: i32 = input[pos..]
                    .parse()
                    .map_err(|_| format!("invalid modifier in `{input}`"))?;
                (&input[..pos], modifier)
            }
            None => (input.as_str(), 0),
        };

        let (count, sides) = dice
            .split_once('d')
            .ok_or_else(|| format!("`{input}` is not a roll expression, try `2d6`"))?;
        let count: u32 = if count.is_empty() {
            1
        } else {
            count
                .parse()
                .map_err(|_| format!("invalid dice count in `{input}`"))?
        };
        let sides: u32 = sides
            .parse()
            .map_err(|_| format!("invalid side count in `{input}`"))?;

        if count == 0 || count > MAX_DICE {
            return Err(format!("dice count must be between 1 and {MAX_DICE}"));
        }
        if sides < 2 || sides > MAX_SIDES {
            return Err(format!("side count must be between 2 and {MAX_SIDES}"));
        }

        Ok(Self {
            count,
            sides,
            modifier,
        })
    }

    fn roll(&self, rng: &mut impl Rng) -> (Vec<u32>, i64) {
        let rolls: Vec<u32> = (0..self.count)
            .map(|_| rng.gen_range(1..=self.sides))
            .collect();
        let total = rolls.iter().map(|&r| i64::from(r)).sum::<i64>() + i64::from(self.modifier);
        (rolls, total)
    }
}

pub struct DiceHandler;

#[async_trait]
impl CommandHandler for DiceHandler {
    async fn handle(&self, session: &dyn Session, interaction: &Interaction) -> HandlerResult {
        let expression = match &interaction.data {
            InteractionData::Command(invocation) => {
                OptionsMap::new(&invocation.options).get_str("roll", "1d6").to_string()
            }
            _ => "1d6".to_string(),
        };

        let spec = match RollSpec::parse(&expression) {
            Ok(spec) => spec,
            Err(reason) => {
                let embed = Embed::new("Dice").field(":x: Bad roll", reason);
                session
                    .respond(interaction, InteractionResponse::ephemeral(embed))
                    .await?;
                return Ok(());
            }
        };

        let (rolls, total) = spec.roll(&mut rand::thread_rng());

        let mut detail = String::new();
        for (i, roll) in rolls.iter().enumerate() {
            if i > 0 {
                detail.push_str(", ");
            }
            let _ = write!(detail, "{roll}");
        }
        if spec.modifier != 0 {
            let _ = write!(detail, " ({:+})", spec.modifier);
        }

        let embed = Embed::new("Dice")
            .field(format!(":game_die: {expression}"), detail)
            .field("Total", total.to_string());
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
        let owner = ctx.registry.get_by_code(CODE).context("dice not registered")?;

        let declaration = CommandDeclaration::new("dice", "Roll some dice").with_options(vec![
            CommandOption::new(
                OptionKind::String,
                "roll",
                "Roll expression such as 2d6+1 (defaults to 1d6)",
            ),
        ]);

        ctx.commands.register(
            CommandRegistration::new(declaration, owner).handler(Arc::new(DiceHandler)),
        )?;
        Ok(())
    }
}
