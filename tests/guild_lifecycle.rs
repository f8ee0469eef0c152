//! Guild join and update handling.

mod common;

use common::start_bot;
use jojo_bot::platform::{GatewayEvent, GuildId, GuildInfo};

#[tokio::test]
async fn fresh_join_registers_default_commands() {
    let bot = start_bot().await;
    let guild = GuildId(100);
    bot.session.add_guild(guild, "test guild");

    bot.runtime
        .handle_event(GatewayEvent::GuildJoin(GuildInfo {
            id: guild,
            name: "test guild".to_string(),
        }))
        .await;

    // meme is not default-enabled, so only dice, jojo and ping land.
    assert_eq!(
        bot.session.remote_names(guild),
        vec!["dice", "jojo", "ping"]
    );

    let status = bot.runtime.status();
    assert_eq!(status.get_guild(guild, "dice").await.unwrap(), Some(true));
    assert_eq!(status.get_guild(guild, "ping").await.unwrap(), Some(true));
    assert_eq!(status.get_guild(guild, "meme").await.unwrap(), None);
    // Core components never get guild-scope rows.
    assert_eq!(status.get_guild(guild, "bot_core").await.unwrap(), None);
}

#[tokio::test]
async fn rejoining_keeps_admin_decisions() {
    let bot = start_bot().await;
    let guild = GuildId(101);
    bot.session.add_guild(guild, "test guild");

    let join = GatewayEvent::GuildJoin(GuildInfo {
        id: guild,
        name: "test guild".to_string(),
    });
    bot.runtime.handle_event(join.clone()).await;

    let dice = bot.runtime.registry().get_by_code("dice").unwrap();
    bot.runtime
        .status()
        .set_guild(guild, &dice, false)
        .await
        .unwrap();

    // A second join must not reset the explicit disable.
    bot.runtime.handle_event(join).await;
    assert_eq!(
        bot.runtime.status().get_guild(guild, "dice").await.unwrap(),
        Some(false)
    );
}

#[tokio::test]
async fn guild_update_refreshes_name() {
    let bot = start_bot().await;
    let guild = GuildId(102);
    bot.session.add_guild(guild, "old name");

    bot.runtime
        .handle_event(GatewayEvent::GuildJoin(GuildInfo {
            id: guild,
            name: "old name".to_string(),
        }))
        .await;
    bot.runtime
        .handle_event(GatewayEvent::GuildUpdate(GuildInfo {
            id: guild,
            name: "new name".to_string(),
        }))
        .await;

    let row = bot
        .runtime
        .status()
        .database()
        .guilds()
        .find(guild)
        .await
        .unwrap()
        .expect("guild row");
    assert_eq!(row.name, "new name");
}
