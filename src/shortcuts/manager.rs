//! Shortcut service: registry plus persisted user overrides.
//!
//! Mutations that touch the store (`update_shortcut`, `reset_shortcut`,
//! `reset_to_defaults`, `import_overrides`) write first and update memory
//! only after the write succeeds. A failed write leaves the in-memory
//! overrides exactly as they were. No registry borrow is held across an
//! `.await`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use thiserror::Error;
use tracing::{debug, info, warn};

use super::event::KeyEvent;
use super::persistence::{InvalidOverride, ShortcutOverrides};
use super::registry::{is_reserved, Registration, ShortcutBinding, ShortcutRegistry};
use super::types::{KeyCombo, Platform, ShortcutParseError};
use crate::error::ResultExt;
use crate::store::{SettingsStore, StoreError};

#[derive(Error, Debug)]
pub enum ShortcutError {
    #[error("invalid shortcut '{keys}': {source}")]
    Parse {
        keys: String,
        #[source]
        source: ShortcutParseError,
    },
    #[error("'{keys}' is reserved by the system")]
    Reserved { keys: String },
    #[error("'{keys}' is already used by '{existing_id}'")]
    Conflict { keys: String, existing_id: String },
    #[error(transparent)]
    InvalidOverride(#[from] InvalidOverride),
    #[error("failed to persist shortcut overrides: {0}")]
    Store(#[from] StoreError),
}

/// Snapshot of one binding for a settings screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShortcutEntry {
    pub id: String,
    pub description: Option<String>,
    pub default_keys: KeyCombo,
    pub effective_keys: KeyCombo,
    pub overridden: bool,
    pub allow_in_input: bool,
}

impl ShortcutEntry {
    pub fn display(&self, platform: Platform) -> String {
        self.effective_keys.display_for_platform(platform)
    }
}

pub struct ShortcutManager {
    store: Rc<dyn SettingsStore>,
    registry: RefCell<ShortcutRegistry>,
}

impl ShortcutManager {
    pub fn new(store: Rc<dyn SettingsStore>) -> Self {
        Self {
            store,
            registry: RefCell::new(ShortcutRegistry::new()),
        }
    }

    /// Replace in-memory overrides with the stored ones.
    ///
    /// Best effort: a store failure leaves defaults in place, and invalid
    /// entries are skipped. Returns how many overrides were applied.
    pub async fn load_overrides(&self) -> usize {
        let stored = match ShortcutOverrides::load(&*self.store).await {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Failed to load shortcut overrides, using defaults");
                return 0;
            }
        };

        let (parsed, errors) = stored.parse();
        for error in &errors {
            warn!(
                binding_id = %error.binding_id,
                keys = %error.keys,
                error = %error.source,
                "Skipping invalid shortcut override"
            );
        }

        let count = parsed.len();
        self.registry.borrow_mut().replace_overrides(parsed);
        info!(count, skipped = errors.len(), "Loaded shortcut overrides");
        count
    }

    pub fn register(&self, binding: ShortcutBinding) -> Registration {
        debug!(binding_id = %binding.id, keys = %binding.keys.to_canonical_string(), "Registering shortcut");
        self.registry.borrow_mut().register(binding)
    }

    /// Register `binding` and get a guard that unregisters it on drop.
    pub fn register_scoped(self: &Rc<Self>, binding: ShortcutBinding) -> (Registration, ShortcutGuard) {
        let id = binding.id.clone();
        let registration = self.register(binding);
        let guard = ShortcutGuard {
            manager: Rc::downgrade(self),
            id,
            generation: registration.generation,
        };
        (registration, guard)
    }

    pub fn unregister(&self, id: &str) -> bool {
        self.registry.borrow_mut().unregister(id).is_some()
    }

    /// Dispatch a keydown to the first matching binding.
    ///
    /// On a match the event is marked default-prevented and
    /// propagation-stopped, then the action runs. The registry isn't
    /// borrowed while the action runs, so actions may register or
    /// unregister bindings; the change applies from the next event.
    pub fn handle_key_event(&self, event: &mut KeyEvent) -> bool {
        let matched = self
            .registry
            .borrow()
            .find_match(event)
            .map(|binding| (binding.id.clone(), binding.action()));

        let Some((id, action)) = matched else {
            return false;
        };

        event.prevent_default();
        event.stop_propagation();
        debug!(binding_id = %id, key = %event.key, "Shortcut matched");
        action();
        true
    }

    /// Check whether `keys` could become the effective shortcut for `id`.
    pub fn validate_shortcut(&self, id: &str, keys: &str) -> Result<KeyCombo, ShortcutError> {
        let combo = KeyCombo::parse(keys).map_err(|source| ShortcutError::Parse {
            keys: keys.to_string(),
            source,
        })?;

        if is_reserved(&combo) {
            return Err(ShortcutError::Reserved {
                keys: keys.to_string(),
            });
        }

        if let Some(existing_id) = self.registry.borrow().find_conflict(id, &combo) {
            return Err(ShortcutError::Conflict {
                keys: keys.to_string(),
                existing_id: existing_id.to_string(),
            });
        }

        Ok(combo)
    }

    /// Validate, persist, then apply a user override for `id`.
    pub async fn update_shortcut(&self, id: &str, keys: &str) -> Result<KeyCombo, ShortcutError> {
        let combo = self.validate_shortcut(id, keys)?;

        self.persist_override_change(|overrides| {
            overrides.insert(id.to_string(), combo.clone());
        })
        .await?;

        info!(binding_id = %id, keys = %combo.to_canonical_string(), "Updated shortcut");
        Ok(combo)
    }

    /// Drop the override for `id`. Returns false if it had none.
    pub async fn reset_shortcut(&self, id: &str) -> Result<bool, ShortcutError> {
        if !self.registry.borrow().is_overridden(id) {
            return Ok(false);
        }

        self.persist_override_change(|overrides| {
            overrides.remove(id);
        })
        .await?;

        info!(binding_id = %id, "Reset shortcut to default");
        Ok(true)
    }

    /// Write the override map with `change` applied, then apply it in memory.
    ///
    /// Another update can land while the write is pending. If the in-memory
    /// map then differs from what was written, the merged map is written
    /// again so the store doesn't lose the other update. A failed first write
    /// leaves memory untouched; a failed merge write is logged.
    async fn persist_override_change(
        &self,
        change: impl Fn(&mut HashMap<String, KeyCombo>),
    ) -> Result<(), StoreError> {
        let mut written = self.registry.borrow().overrides().clone();
        change(&mut written);
        ShortcutOverrides::from_combos(&written)
            .save(&*self.store)
            .await?;

        loop {
            let current = {
                let mut registry = self.registry.borrow_mut();
                let mut next = registry.overrides().clone();
                change(&mut next);
                registry.replace_overrides(next.clone());
                next
            };
            if current == written {
                return Ok(());
            }

            debug!(count = current.len(), "Overrides changed during write, saving merged map");
            if ShortcutOverrides::from_combos(&current)
                .save(&*self.store)
                .await
                .warn_on_err()
                .is_none()
            {
                return Ok(());
            }
            written = current;
        }
    }

    pub async fn reset_to_defaults(&self) -> Result<(), ShortcutError> {
        ShortcutOverrides::delete(&*self.store).await?;
        self.registry.borrow_mut().replace_overrides(HashMap::new());
        info!("Reset all shortcuts to defaults");
        Ok(())
    }

    /// Replace every override at once.
    ///
    /// All entries must parse; otherwise nothing is written or applied.
    pub async fn import_overrides(&self, overrides: ShortcutOverrides) -> Result<(), ShortcutError> {
        let (parsed, errors) = overrides.parse();
        if let Some(invalid) = errors.into_iter().next() {
            return Err(invalid.into());
        }

        ShortcutOverrides::from_combos(&parsed)
            .save(&*self.store)
            .await?;

        let count = parsed.len();
        self.registry.borrow_mut().replace_overrides(parsed);
        info!(count, "Imported shortcut overrides");
        Ok(())
    }

    pub fn export_overrides(&self) -> ShortcutOverrides {
        ShortcutOverrides::from_combos(self.registry.borrow().overrides())
    }

    pub fn effective_keys(&self, id: &str) -> Option<KeyCombo> {
        self.registry.borrow().effective_keys(id).cloned()
    }

    /// Every binding in registration order.
    pub fn entries(&self) -> Vec<ShortcutEntry> {
        let registry = self.registry.borrow();
        registry
            .bindings()
            .map(|binding| {
                let effective = registry
                    .effective_keys(&binding.id)
                    .unwrap_or(&binding.keys)
                    .clone();
                ShortcutEntry {
                    id: binding.id.clone(),
                    description: binding.description.clone(),
                    default_keys: binding.keys.clone(),
                    effective_keys: effective,
                    overridden: registry.is_overridden(&binding.id),
                    allow_in_input: binding.allow_in_input,
                }
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.registry.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.borrow().is_empty()
    }
}

/// Unregisters its binding when dropped.
///
/// Holds the manager weakly, so a guard outliving the manager is harmless.
#[must_use = "dropping the guard unregisters the shortcut"]
pub struct ShortcutGuard {
    manager: Weak<ShortcutManager>,
    id: String,
    generation: u64,
}

impl ShortcutGuard {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Drop for ShortcutGuard {
    fn drop(&mut self) {
        let Some(manager) = self.manager.upgrade() else {
            return;
        };
        match manager.registry.try_borrow_mut() {
            Ok(mut registry) => {
                if registry.unregister_generation(&self.id, self.generation) {
                    debug!(binding_id = %self.id, "Unregistered scoped shortcut");
                }
            }
            Err(_) => {
                warn!(binding_id = %self.id, "Registry busy, scoped shortcut left registered");
            }
        };
    }
}
