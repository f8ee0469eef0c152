//! Shared fixture for the integration tests.

// Not every test binary uses every helper.
#![allow(dead_code)]

mod session;

#[allow(unused_imports)]
pub use session::{response_text, MockSession};

use jojo_bot::components;
use jojo_bot::db::Database;
use jojo_bot::lifecycle::Runtime;
use jojo_bot::platform::{
    CommandInvocation, GuildId, Interaction, InteractionData, OptionData, OptionValue, Session,
    UserId, UserInfo,
};
use jojo_bot::registry::Registry;
use jojo_bot::RuntimeConfig;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static INTERACTION_COUNTER: AtomicU64 = AtomicU64::new(1);

/// A started runtime with the built-in components over a mock session.
pub struct TestBot {
    pub runtime: Runtime,
    pub session: Arc<MockSession>,
}

pub async fn start_bot() -> TestBot {
    start_bot_with(RuntimeConfig::default()).await
}

/// Initialize test logging once; `RUST_LOG` controls verbosity.
fn init_logging() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub async fn start_bot_with(config: RuntimeConfig) -> TestBot {
    init_logging();
    let db = Database::new(":memory:").await.expect("memory db");
    let registry = Arc::new(Registry::new());
    components::register_all(&registry).expect("register built-ins");

    let session = Arc::new(MockSession::new());
    let runtime = Runtime::new(
        &config,
        db,
        registry,
        Arc::clone(&session) as Arc<dyn Session>,
    );
    runtime.startup().await.expect("startup");

    TestBot { runtime, session }
}

/// A plain slash-command interaction with a fresh id.
pub fn slash(guild: Option<GuildId>, name: &str, options: Vec<OptionValue>) -> Interaction {
    Interaction {
        id: INTERACTION_COUNTER.fetch_add(1, Ordering::SeqCst).to_string(),
        guild_id: guild,
        channel_id: None,
        user: UserInfo {
            id: UserId(1),
            username: "alice".to_string(),
        },
        data: InteractionData::Command(CommandInvocation {
            name: name.to_string(),
            options,
        }),
    }
}

/// A `/jojo <group...> <sub>` interaction; the last path segment is the
/// sub-command, everything before it a group.
pub fn jojo(guild: GuildId, path: &[&str], leaf_options: Vec<OptionValue>) -> Interaction {
    assert!(!path.is_empty());

    let mut option = OptionValue {
        name: path[path.len() - 1].to_string(),
        data: OptionData::SubCommand(leaf_options),
    };
    for segment in path[..path.len() - 1].iter().rev() {
        option = OptionValue {
            name: segment.to_string(),
            data: OptionData::SubCommandGroup(vec![option]),
        };
    }

    slash(Some(guild), "jojo", vec![option])
}

pub fn module_arg(code: &str) -> OptionValue {
    OptionValue {
        name: "module".to_string(),
        data: OptionData::String(code.to_string()),
    }
}
