//! Slash-command reconciliation behavior.

mod common;

use common::start_bot_with;
use jojo_bot::error::CommandError;
use jojo_bot::platform::{GatewayEvent, GuildId, GuildInfo};
use jojo_bot::RuntimeConfig;
use std::time::Duration;

async fn joined_bot(guild: GuildId, config: RuntimeConfig) -> common::TestBot {
    let bot = start_bot_with(config).await;
    bot.session.add_guild(guild, "test guild");
    bot.runtime
        .handle_event(GatewayEvent::GuildJoin(GuildInfo {
            id: guild,
            name: "test guild".to_string(),
        }))
        .await;
    bot
}

#[tokio::test]
async fn repeated_sync_issues_no_mutations() {
    let guild = GuildId(200);
    let bot = joined_bot(guild, RuntimeConfig::default()).await;
    let after_join = bot.session.mutation_count();

    let report = bot
        .runtime
        .commands()
        .sync(bot.session.as_ref(), guild)
        .await
        .unwrap();

    assert_eq!(report.mutations(), 0);
    assert_eq!(report.unchanged, 3);
    assert_eq!(bot.session.mutation_count(), after_join);
}

#[tokio::test]
async fn drifted_declaration_is_updated_in_place() {
    let guild = GuildId(205);
    let bot = joined_bot(guild, RuntimeConfig::default()).await;

    let original = bot
        .session
        .remote_command(guild, "dice")
        .expect("dice registered at join");
    bot.session
        .drift_remote_declaration(guild, "dice", "stale description");

    let report = bot
        .runtime
        .commands()
        .sync(bot.session.as_ref(), guild)
        .await
        .unwrap();

    assert_eq!(report.updated, 1);
    assert_eq!(report.created, 0);
    assert_eq!(report.deleted, 0);

    // Updated in place: same remote id, declaration restored.
    let current = bot.session.remote_command(guild, "dice").unwrap();
    assert_eq!(current.id, original.id);
    assert_eq!(current.declaration, original.declaration);
}

#[tokio::test]
async fn disable_then_sync_removes_the_command() {
    let guild = GuildId(201);
    let bot = joined_bot(guild, RuntimeConfig::default()).await;

    let dice = bot.runtime.registry().get_by_code("dice").unwrap();
    bot.runtime
        .status()
        .set_guild(guild, &dice, false)
        .await
        .unwrap();

    let report = bot
        .runtime
        .commands()
        .sync(bot.session.as_ref(), guild)
        .await
        .unwrap();

    assert_eq!(report.deleted, 1);
    assert_eq!(bot.session.remote_names(guild), vec!["jojo", "ping"]);
}

#[tokio::test]
async fn global_kill_switch_removes_the_command() {
    let guild = GuildId(202);
    let bot = joined_bot(guild, RuntimeConfig::default()).await;

    let status = bot.runtime.status();
    let dice_id = status.component_id("dice").await.unwrap();
    status
        .database()
        .components()
        .set_global_status(dice_id, false)
        .await
        .unwrap();

    bot.runtime
        .commands()
        .sync(bot.session.as_ref(), guild)
        .await
        .unwrap();
    assert_eq!(bot.session.remote_names(guild), vec!["jojo", "ping"]);

    // Flipping the switch back restores it on the next sync.
    status
        .database()
        .components()
        .set_global_status(dice_id, true)
        .await
        .unwrap();
    bot.runtime
        .commands()
        .sync(bot.session.as_ref(), guild)
        .await
        .unwrap();
    assert_eq!(
        bot.session.remote_names(guild),
        vec!["dice", "jojo", "ping"]
    );
}

#[tokio::test]
async fn manual_sync_respects_cooldown() {
    let guild = GuildId(203);
    let config = RuntimeConfig {
        sync_cooldown_secs: 1,
        ..RuntimeConfig::default()
    };
    let bot = joined_bot(guild, config).await;

    bot.runtime
        .commands()
        .sync_manual(bot.session.as_ref(), guild)
        .await
        .unwrap();

    let err = bot
        .runtime
        .commands()
        .sync_manual(bot.session.as_ref(), guild)
        .await
        .unwrap_err();
    assert!(matches!(err, CommandError::OnCoolDown));

    // Another guild is unaffected by this guild's cool-down.
    let other = GuildId(204);
    bot.session.add_guild(other, "other guild");
    bot.runtime
        .commands()
        .sync_manual(bot.session.as_ref(), other)
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(1100)).await;
    bot.runtime
        .commands()
        .sync_manual(bot.session.as_ref(), guild)
        .await
        .unwrap();
}
