//! Repository for registered components and their global statuses.

use super::models::RegisteredComponentRow;
use super::DbError;
use sqlx::SqlitePool;

/// Repository for component mirror rows and the global enablement scope.
pub struct ComponentRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ComponentRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Idempotent upsert of the persisted mirror row for a component.
    ///
    /// Creates the row on first sight of the code and refreshes name,
    /// description and default-enabled when the in-process values changed.
    /// Returns the durable surrogate id.
    pub async fn upsert(
        &self,
        code: &str,
        name: &str,
        description: &str,
        default_enabled: bool,
    ) -> Result<RegisteredComponentRow, DbError> {
        sqlx::query(
            r#"
            INSERT INTO registered_components (code, name, description, default_enabled)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(code) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                default_enabled = excluded.default_enabled
            "#,
        )
        .bind(code)
        .bind(name)
        .bind(description)
        .bind(default_enabled)
        .execute(self.pool)
        .await?;

        self.find_by_code(code)
            .await?
            .ok_or_else(|| DbError::ComponentNotFound(code.to_string()))
    }

    /// Find the mirror row for a component code.
    pub async fn find_by_code(
        &self,
        code: &str,
    ) -> Result<Option<RegisteredComponentRow>, DbError> {
        let row = sqlx::query_as::<_, (i64, String, String, String, bool)>(
            r#"
            SELECT id, code, name, description, default_enabled
            FROM registered_components
            WHERE code = ?
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(
            |(id, code, name, description, default_enabled)| RegisteredComponentRow {
                id,
                code,
                name,
                description,
                default_enabled,
            },
        ))
    }

    /// Create the global status row with `enabled = true` if absent.
    pub async fn ensure_global_status(&self, component_id: i64) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO global_component_statuses (component_id, enabled)
            VALUES (?, 1)
            ON CONFLICT(component_id) DO NOTHING
            "#,
        )
        .bind(component_id)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Read the global enablement of a component.
    ///
    /// A missing row is treated as enabled - bootstrap creates every row
    /// with `enabled = true`, so absence only occurs before the first
    /// bootstrap completes.
    pub async fn global_status(&self, component_id: i64) -> Result<bool, DbError> {
        let row = sqlx::query_as::<_, (bool,)>(
            "SELECT enabled FROM global_component_statuses WHERE component_id = ?",
        )
        .bind(component_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(enabled,)| enabled).unwrap_or(true))
    }

    /// Operator-facing global kill-switch. Not reachable from any admin
    /// slash command.
    pub async fn set_global_status(&self, component_id: i64, enabled: bool) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO global_component_statuses (component_id, enabled)
            VALUES (?, ?)
            ON CONFLICT(component_id) DO UPDATE SET enabled = excluded.enabled
            "#,
        )
        .bind(component_id)
        .bind(enabled)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
