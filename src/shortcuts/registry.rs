//! Deterministic shortcut registry with Vec storage.
//!
//! Uses Vec for deterministic iteration order and HashMap for O(1) lookup.
//! Registration order is dispatch order: the first binding whose effective
//! combination matches a keydown wins.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::warn;

use super::event::KeyEvent;
use super::types::{KeyCombo, ShortcutParseError};

/// Combinations owned by the OS or the window shell (quit, close window,
/// new window). User overrides may not claim them.
pub const RESERVED_SHORTCUTS: &[&str] = &[
    "ctrl+q",
    "cmd+q",
    "ctrl+w",
    "cmd+w",
    "ctrl+n",
    "cmd+n",
    "ctrl+shift+n",
    "cmd+shift+n",
    "alt+f4",
];

/// True if any concrete form of `combo` is reserved. `Mod+Q` is reserved
/// because it would fire on Ctrl+Q.
pub fn is_reserved(combo: &KeyCombo) -> bool {
    let reserved: Vec<KeyCombo> = RESERVED_SHORTCUTS
        .iter()
        .filter_map(|s| KeyCombo::parse(s).ok())
        .collect();
    combo.variants().iter().any(|v| reserved.contains(v))
}

pub type ShortcutAction = Rc<dyn Fn()>;

/// A shortcut binding with metadata.
#[derive(Clone)]
pub struct ShortcutBinding {
    pub id: String,
    /// Default combination; a user override replaces it at match time.
    pub keys: KeyCombo,
    pub description: Option<String>,
    /// Fire even while a text field has focus.
    pub allow_in_input: bool,
    action: ShortcutAction,
}

impl ShortcutBinding {
    pub fn new(id: impl Into<String>, keys: KeyCombo, action: impl Fn() + 'static) -> Self {
        Self {
            id: id.into(),
            keys,
            description: None,
            allow_in_input: false,
            action: Rc::new(action),
        }
    }

    pub fn parse(
        id: impl Into<String>,
        keys: &str,
        action: impl Fn() + 'static,
    ) -> Result<Self, ShortcutParseError> {
        Ok(Self::new(id, KeyCombo::parse(keys)?, action))
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn allow_in_input(mut self) -> Self {
        self.allow_in_input = true;
        self
    }

    pub fn action(&self) -> ShortcutAction {
        Rc::clone(&self.action)
    }
}

impl fmt::Debug for ShortcutBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShortcutBinding")
            .field("id", &self.id)
            .field("keys", &self.keys.to_canonical_string())
            .field("description", &self.description)
            .field("allow_in_input", &self.allow_in_input)
            .finish_non_exhaustive()
    }
}

/// Outcome of [`ShortcutRegistry::register`].
///
/// Conflicts are reported, never enforced; the caller decides policy.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct Registration {
    pub replaced: bool,
    /// Ids of other bindings whose default keys overlap the new one.
    pub conflicts: Vec<String>,
    pub(crate) generation: u64,
}

impl Registration {
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }
}

struct Entry {
    binding: ShortcutBinding,
    generation: u64,
}

/// Central registry of keyboard shortcuts and user overrides.
#[derive(Default)]
pub struct ShortcutRegistry {
    entries: Vec<Entry>,
    id_to_index: HashMap<String, usize>,
    overrides: HashMap<String, KeyCombo>,
    next_generation: u64,
}

impl ShortcutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `binding`. An existing binding with the same id is removed
    /// first, so the new one moves to the end of dispatch order.
    pub fn register(&mut self, binding: ShortcutBinding) -> Registration {
        let conflicts: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.binding.id != binding.id && e.binding.keys.overlaps(&binding.keys))
            .map(|e| e.binding.id.clone())
            .collect();

        if !conflicts.is_empty() {
            warn!(
                binding_id = %binding.id,
                keys = %binding.keys.to_canonical_string(),
                conflicts = ?conflicts,
                "Shortcut registered over existing keys"
            );
        }

        self.next_generation += 1;
        let generation = self.next_generation;
        let id = binding.id.clone();
        let entry = Entry {
            binding,
            generation,
        };

        let replaced = match self.id_to_index.get(&id) {
            Some(&existing_index) => {
                self.entries.remove(existing_index);
                self.entries.push(entry);
                self.reindex();
                true
            }
            None => {
                self.id_to_index.insert(id, self.entries.len());
                self.entries.push(entry);
                false
            }
        };

        Registration {
            replaced,
            conflicts,
            generation,
        }
    }

    pub fn unregister(&mut self, id: &str) -> Option<ShortcutBinding> {
        let index = self.id_to_index.remove(id)?;
        let entry = self.entries.remove(index);
        self.reindex();
        Some(entry.binding)
    }

    /// Unregisters `id` only if it is still the registration `generation`
    /// produced, not a later re-registration under the same id.
    pub(crate) fn unregister_generation(&mut self, id: &str, generation: u64) -> bool {
        let current = self
            .id_to_index
            .get(id)
            .map(|&i| self.entries[i].generation);
        if current == Some(generation) {
            self.unregister(id).is_some()
        } else {
            false
        }
    }

    fn reindex(&mut self) {
        self.id_to_index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.binding.id.clone(), i))
            .collect();
    }

    pub fn get(&self, id: &str) -> Option<&ShortcutBinding> {
        self.id_to_index
            .get(id)
            .and_then(|&i| self.entries.get(i))
            .map(|e| &e.binding)
    }

    /// Override if present, else the default. `None` for unknown ids.
    pub fn effective_keys(&self, id: &str) -> Option<&KeyCombo> {
        let binding = self.get(id)?;
        Some(self.overrides.get(id).unwrap_or(&binding.keys))
    }

    pub fn is_overridden(&self, id: &str) -> bool {
        self.overrides.contains_key(id)
    }

    pub fn overrides(&self) -> &HashMap<String, KeyCombo> {
        &self.overrides
    }

    pub fn set_override(&mut self, id: impl Into<String>, keys: KeyCombo) {
        self.overrides.insert(id.into(), keys);
    }

    pub fn clear_override(&mut self, id: &str) -> bool {
        self.overrides.remove(id).is_some()
    }

    pub fn replace_overrides(&mut self, overrides: HashMap<String, KeyCombo>) {
        self.overrides = overrides;
    }

    /// First binding other than `id` whose effective keys overlap `keys`.
    pub fn find_conflict(&self, id: &str, keys: &KeyCombo) -> Option<&str> {
        self.bindings()
            .filter(|b| b.id != id)
            .find(|b| {
                self.effective_keys(&b.id)
                    .is_some_and(|effective| effective.overlaps(keys))
            })
            .map(|b| b.id.as_str())
    }

    /// First binding, in registration order, that fires for `event`.
    pub fn find_match(&self, event: &KeyEvent) -> Option<&ShortcutBinding> {
        let in_text_input = event.target.is_text_input();
        self.bindings().find(|binding| {
            if in_text_input && !binding.allow_in_input {
                return false;
            }
            let effective = self.overrides.get(&binding.id).unwrap_or(&binding.keys);
            effective.matches_event(event)
        })
    }

    pub fn bindings(&self) -> impl Iterator<Item = &ShortcutBinding> {
        self.entries.iter().map(|e| &e.binding)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
