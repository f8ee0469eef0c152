//! In-process component catalogue.
//!
//! Components publish themselves here before the session opens; the
//! registry is frozen at session open and read-only afterwards, so
//! lookups during dispatch need no synchronization beyond the lock's
//! read path.

use crate::error::RegistryError;
use crate::lifecycle::LoadContext;
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Category tags a component can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Internal infrastructure; members are core components.
    Internal,
    Utility,
    Fun,
    Moderation,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Internal => "Internal",
            Self::Utility => "Utility",
            Self::Fun => "Fun",
            Self::Moderation => "Moderation",
        })
    }
}

/// Static metadata of a feature unit.
#[derive(Debug, Clone)]
pub struct Component {
    /// Stable unique identifier, e.g. `"dice"`.
    pub code: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub categories: &'static [Category],
    /// Higher loads earlier.
    pub load_priority: i32,
    /// Status seeded for new guilds at join time.
    pub default_enabled: bool,
    /// Core components cannot be toggled by users.
    pub core: bool,
}

impl Component {
    /// Whether this component is core infrastructure, either by flag or
    /// by membership in the internal category.
    pub fn is_core(&self) -> bool {
        self.core || self.categories.contains(&Category::Internal)
    }
}

/// Lifecycle state of a component within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentState {
    Registered,
    Loaded,
    /// Loader failed; the component stays registered but inactive.
    Degraded,
}

/// Loader callback invoked once the live session exists.
#[async_trait]
pub trait ComponentLoader: Send + Sync {
    async fn load(&self, ctx: &LoadContext) -> anyhow::Result<()>;
}

struct Entry {
    component: Arc<Component>,
    loader: Arc<dyn ComponentLoader>,
}

/// The process-wide component catalogue.
pub struct Registry {
    // Kept sorted by load priority (descending), insertion order breaking
    // ties. Written only before the freeze.
    entries: RwLock<Vec<Entry>>,
    states: DashMap<&'static str, ComponentState>,
    frozen: AtomicBool,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            states: DashMap::new(),
            frozen: AtomicBool::new(false),
        }
    }

    /// Add a component before the session opens.
    pub fn register(
        &self,
        component: Component,
        loader: Arc<dyn ComponentLoader>,
    ) -> Result<(), RegistryError> {
        if self.frozen.load(Ordering::Acquire) {
            return Err(RegistryError::RegistryFrozen);
        }

        let mut entries = self.entries.write();
        if entries.iter().any(|e| e.component.code == component.code) {
            return Err(RegistryError::AlreadyRegistered(component.code.to_string()));
        }

        let code = component.code;
        entries.push(Entry {
            component: Arc::new(component),
            loader,
        });
        // Stable sort keeps insertion order for equal priorities.
        entries.sort_by(|a, b| b.component.load_priority.cmp(&a.component.load_priority));

        self.states.insert(code, ComponentState::Registered);
        Ok(())
    }

    /// Freeze the registry; called when the session opens.
    pub fn freeze(&self) {
        self.frozen.store(true, Ordering::Release);
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    /// All registered components in load-priority order.
    pub fn available(&self) -> Vec<Arc<Component>> {
        self.entries
            .read()
            .iter()
            .map(|e| Arc::clone(&e.component))
            .collect()
    }

    /// Components with their loaders, in load-priority order.
    pub fn loaders(&self) -> Vec<(Arc<Component>, Arc<dyn ComponentLoader>)> {
        self.entries
            .read()
            .iter()
            .map(|e| (Arc::clone(&e.component), Arc::clone(&e.loader)))
            .collect()
    }

    pub fn get_by_code(&self, code: &str) -> Option<Arc<Component>> {
        self.entries
            .read()
            .iter()
            .find(|e| e.component.code == code)
            .map(|e| Arc::clone(&e.component))
    }

    pub fn state(&self, code: &str) -> Option<ComponentState> {
        self.states.get(code).map(|s| *s)
    }

    pub fn set_state(&self, code: &'static str, state: ComponentState) {
        self.states.insert(code, state);
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
