//! Authoritative enablement state for components.
//!
//! The store owns the persisted mirror rows, the global kill-switch scope
//! and the per-guild scope, and implements the effective-enablement rule:
//! a component is enabled for a guild iff its global status is true and
//! either its guild status is true or no guild status exists and the
//! component is default-enabled.
//!
//! Persisted statuses are authoritative; only the immutable code-to-id
//! mapping is cached across operations.

use crate::db::Database;
use crate::error::StatusError;
use crate::platform::GuildId;
use crate::registry::Component;
use dashmap::DashMap;

/// Display token for a component status, as shown by `list`/`show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusDisplay {
    Enabled,
    Disabled,
    /// The global kill-switch overrides the guild status.
    GloballyDisabled,
}

impl StatusDisplay {
    pub fn token(self) -> &'static str {
        match self {
            Self::Enabled => ":white_check_mark:",
            Self::Disabled => ":x:",
            Self::GloballyDisabled => ":no_entry:",
        }
    }
}

/// Persistence facade for component enablement.
pub struct StatusStore {
    db: Database,
    // Surrogate ids never change once assigned, so this read-through map
    // is safe to keep for the process lifetime.
    component_ids: DashMap<String, i64>,
}

impl StatusStore {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            component_ids: DashMap::new(),
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Idempotent upsert of the persisted mirror row. Returns the durable
    /// surrogate id used by the status scopes.
    pub async fn ensure_registered(&self, component: &Component) -> Result<i64, StatusError> {
        let row = self
            .db
            .components()
            .upsert(
                component.code,
                component.name,
                component.description,
                component.default_enabled,
            )
            .await?;

        self.component_ids.insert(row.code.clone(), row.id);
        Ok(row.id)
    }

    /// Create the global status row with `enabled = true` if absent.
    pub async fn ensure_global_status_exists(&self, component_id: i64) -> Result<(), StatusError> {
        Ok(self.db.components().ensure_global_status(component_id).await?)
    }

    /// Resolve the surrogate id for a component code.
    pub async fn component_id(&self, code: &str) -> Result<i64, StatusError> {
        if let Some(id) = self.component_ids.get(code) {
            return Ok(*id);
        }

        let row = self
            .db
            .components()
            .find_by_code(code)
            .await?
            .ok_or_else(|| StatusError::NotFound(code.to_string()))?;

        self.component_ids.insert(row.code.clone(), row.id);
        Ok(row.id)
    }

    /// Global enablement of a component.
    pub async fn get_global(&self, code: &str) -> Result<bool, StatusError> {
        let id = self.component_id(code).await?;
        Ok(self.db.components().global_status(id).await?)
    }

    /// Guild-scope enablement of a component; `None` when no row exists.
    pub async fn get_guild(&self, guild: GuildId, code: &str) -> Result<Option<bool>, StatusError> {
        let id = self.component_id(code).await?;
        let Some(guild_row) = self.db.guilds().find(guild).await? else {
            return Ok(None);
        };

        Ok(self
            .db
            .guilds()
            .component_status(guild_row.id, id)
            .await?)
    }

    /// Upsert the guild-scope status of a component.
    ///
    /// Core components are never the subject of user toggles; any attempt
    /// fails with [`StatusError::ForbiddenOnCore`] and leaves state
    /// unchanged.
    pub async fn set_guild(
        &self,
        guild: GuildId,
        component: &Component,
        enabled: bool,
    ) -> Result<(), StatusError> {
        if component.is_core() {
            return Err(StatusError::ForbiddenOnCore(component.code.to_string()));
        }

        let id = self.component_id(component.code).await?;
        let guild_row = self
            .db
            .guilds()
            .find(guild)
            .await?
            .ok_or(StatusError::Db(crate::db::DbError::GuildNotFound(guild.0)))?;

        Ok(self
            .db
            .guilds()
            .set_component_status(guild_row.id, id, enabled)
            .await?)
    }

    /// Effective enablement for a guild, per the two-level rule.
    pub async fn effective(&self, guild: GuildId, component: &Component) -> Result<bool, StatusError> {
        if !self.get_global(component.code).await? {
            return Ok(false);
        }

        match self.get_guild(guild, component.code).await? {
            Some(enabled) => Ok(enabled),
            None => Ok(component.default_enabled),
        }
    }

    /// Display token for the global scope.
    pub async fn display_global(&self, code: &str) -> Result<StatusDisplay, StatusError> {
        if self.get_global(code).await? {
            Ok(StatusDisplay::Enabled)
        } else {
            Ok(StatusDisplay::GloballyDisabled)
        }
    }

    /// Display token for a guild, with the kill-switch taking precedence.
    pub async fn display_guild(
        &self,
        guild: GuildId,
        component: &Component,
    ) -> Result<StatusDisplay, StatusError> {
        if !self.get_global(component.code).await? {
            return Ok(StatusDisplay::GloballyDisabled);
        }

        if self.effective(guild, component).await? {
            Ok(StatusDisplay::Enabled)
        } else {
            Ok(StatusDisplay::Disabled)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Category;

    fn component(code: &'static str, default_enabled: bool, core: bool) -> Component {
        Component {
            code,
            name: code,
            description: "test component",
            categories: if core { &[Category::Internal] } else { &[Category::Fun] },
            load_priority: 0,
            default_enabled,
            core,
        }
    }

    async fn store_with(components: &[&Component]) -> StatusStore {
        let db = Database::new(":memory:").await.expect("memory db");
        let store = StatusStore::new(db);
        for c in components {
            let id = store.ensure_registered(c).await.expect("register");
            store.ensure_global_status_exists(id).await.expect("global");
        }
        store
    }

    #[tokio::test]
    async fn effective_follows_two_level_rule() {
        let dice = component("dice", true, false);
        let meme = component("meme", false, false);
        let store = store_with(&[&dice, &meme]).await;
        let guild = GuildId(1);
        store.db.guilds().upsert(guild, "g1").await.unwrap();

        // No guild rows: default-enabled wins.
        assert!(store.effective(guild, &dice).await.unwrap());
        assert!(!store.effective(guild, &meme).await.unwrap());

        // Explicit guild row overrides the default.
        store.set_guild(guild, &dice, false).await.unwrap();
        store.set_guild(guild, &meme, true).await.unwrap();
        assert!(!store.effective(guild, &dice).await.unwrap());
        assert!(store.effective(guild, &meme).await.unwrap());

        // Global kill-switch overrides a guild-level true.
        let meme_id = store.component_id("meme").await.unwrap();
        store
            .db
            .components()
            .set_global_status(meme_id, false)
            .await
            .unwrap();
        assert!(!store.effective(guild, &meme).await.unwrap());
    }

    #[tokio::test]
    async fn set_guild_rejects_core_components() {
        let core = component("bot_core", true, true);
        let store = store_with(&[&core]).await;
        let guild = GuildId(1);
        store.db.guilds().upsert(guild, "g1").await.unwrap();

        let err = store.set_guild(guild, &core, false).await.unwrap_err();
        assert!(matches!(err, StatusError::ForbiddenOnCore(_)));

        // State unchanged: no guild row was created.
        assert_eq!(store.get_guild(guild, "bot_core").await.unwrap(), None);
    }

    #[tokio::test]
    async fn display_tokens() {
        let dice = component("dice", true, false);
        let store = store_with(&[&dice]).await;
        let guild = GuildId(1);
        store.db.guilds().upsert(guild, "g1").await.unwrap();

        assert_eq!(
            store.display_guild(guild, &dice).await.unwrap(),
            StatusDisplay::Enabled
        );

        store.set_guild(guild, &dice, false).await.unwrap();
        assert_eq!(
            store.display_guild(guild, &dice).await.unwrap(),
            StatusDisplay::Disabled
        );

        let id = store.component_id("dice").await.unwrap();
        store.db.components().set_global_status(id, false).await.unwrap();
        assert_eq!(
            store.display_guild(guild, &dice).await.unwrap(),
            StatusDisplay::GloballyDisabled
        );
        assert_eq!(
            store.display_global("dice").await.unwrap(),
            StatusDisplay::GloballyDisabled
        );
    }

    #[tokio::test]
    async fn ensure_registered_refreshes_metadata() {
        let dice_v1 = component("dice", true, false);
        let store = store_with(&[&dice_v1]).await;

        let dice_v2 = Component {
            description: "rolls dice expressions",
            default_enabled: false,
            ..dice_v1
        };
        let id = store.ensure_registered(&dice_v2).await.unwrap();

        let row = store
            .db
            .components()
            .find_by_code("dice")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.id, id);
        assert_eq!(row.description, "rolls dice expressions");
        assert!(!row.default_enabled);
    }
}
