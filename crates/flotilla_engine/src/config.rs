//! Configuration for the consistency engine.

/// Configuration for an [`Engine`](crate::Engine).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Instance name, attached to every log span the engine emits.
    pub name: String,

    /// Rewrite a ship's damage to its latest report when a transaction
    /// touches that ship's reports. When false, the caller must keep them in
    /// sync or the transaction is rejected.
    pub derive_damage: bool,

    /// Number of committed snapshots to retain (0 disables history).
    pub history_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: "flotilla".to_string(),
            derive_damage: true,
            history_size: 64,
        }
    }
}

impl EngineConfig {
    /// Creates a configuration that never repairs derived values and keeps no history.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            derive_damage: false,
            history_size: 0,
            ..Self::default()
        }
    }

    /// Builder method to set the instance name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder method to enable or disable damage derivation.
    #[must_use]
    pub fn with_derive_damage(mut self, derive: bool) -> Self {
        self.derive_damage = derive;
        self
    }

    /// Builder method to set the history size.
    #[must_use]
    pub fn with_history_size(mut self, size: usize) -> Self {
        self.history_size = size;
        self
    }
}
