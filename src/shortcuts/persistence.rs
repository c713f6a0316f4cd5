//! User shortcut customization persistence.
//!
//! Overrides live in the settings store under [`SHORTCUT_OVERRIDES_KEY`] as a
//! JSON object of `binding_id -> key string`, e.g.
//! `{"save": "mod+shift+s"}`. A binding without an entry uses its default.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{KeyCombo, ShortcutParseError};
use crate::store::{get_with, set_with, SettingsStore, StoreError};

/// Store key holding the override map.
pub const SHORTCUT_OVERRIDES_KEY: &str = "shortcutOverrides";

/// An override whose key string didn't parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid shortcut '{keys}' for binding '{binding_id}': {source}")]
pub struct InvalidOverride {
    pub binding_id: String,
    pub keys: String,
    #[source]
    pub source: ShortcutParseError,
}

/// User shortcut overrides as stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortcutOverrides {
    pub overrides: BTreeMap<String, String>,
}

impl ShortcutOverrides {
    /// Load overrides from the store.
    ///
    /// Returns empty overrides if the key is absent.
    pub async fn load<S: SettingsStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        Ok(get_with::<_, Self>(store, SHORTCUT_OVERRIDES_KEY)
            .await?
            .unwrap_or_default())
    }

    pub async fn save<S: SettingsStore + ?Sized>(&self, store: &S) -> Result<(), StoreError> {
        set_with(store, SHORTCUT_OVERRIDES_KEY, self).await
    }

    /// Remove the stored overrides entirely.
    pub async fn delete<S: SettingsStore + ?Sized>(store: &S) -> Result<(), StoreError> {
        store.delete(SHORTCUT_OVERRIDES_KEY).await
    }

    /// Parse every entry.
    ///
    /// Returns the valid overrides plus one error per entry that didn't parse.
    pub fn parse(&self) -> (HashMap<String, KeyCombo>, Vec<InvalidOverride>) {
        let mut parsed = HashMap::new();
        let mut errors = Vec::new();

        for (binding_id, keys) in &self.overrides {
            match KeyCombo::parse(keys) {
                Ok(combo) => {
                    parsed.insert(binding_id.clone(), combo);
                }
                Err(source) => errors.push(InvalidOverride {
                    binding_id: binding_id.clone(),
                    keys: keys.clone(),
                    source,
                }),
            }
        }

        (parsed, errors)
    }

    /// Build the stored form from parsed combinations.
    pub fn from_combos(combos: &HashMap<String, KeyCombo>) -> Self {
        Self {
            overrides: combos
                .iter()
                .map(|(id, combo)| (id.clone(), combo.to_canonical_string()))
                .collect(),
        }
    }

    pub fn set(&mut self, binding_id: impl Into<String>, keys: impl Into<String>) {
        self.overrides.insert(binding_id.into(), keys.into());
    }

    pub fn remove(&mut self, binding_id: &str) {
        self.overrides.remove(binding_id);
    }

    pub fn get(&self, binding_id: &str) -> Option<&str> {
        self.overrides.get(binding_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

impl FromIterator<(String, String)> for ShortcutOverrides {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            overrides: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use futures::executor::block_on;
    use serde_json::json;

    #[test]
    fn load_missing_key_returns_empty() {
        let store = MemoryStore::default();
        let overrides = block_on(ShortcutOverrides::load(&store)).unwrap();
        assert!(overrides.is_empty());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let store = MemoryStore::default();
        let mut overrides = ShortcutOverrides::default();
        overrides.set("save", "mod+shift+s");
        overrides.set("find", "ctrl+f");

        block_on(overrides.save(&store)).unwrap();
        let loaded = block_on(ShortcutOverrides::load(&store)).unwrap();
        assert_eq!(loaded, overrides);
    }

    #[test]
    fn stored_shape_is_a_flat_object() {
        let store = MemoryStore::default();
        let mut overrides = ShortcutOverrides::default();
        overrides.set("save", "mod+shift+s");

        block_on(overrides.save(&store)).unwrap();
        assert_eq!(
            store.snapshot(SHORTCUT_OVERRIDES_KEY),
            Some(json!({"save": "mod+shift+s"}))
        );
    }

    #[test]
    fn parse_collects_invalid_entries_and_keeps_valid_ones() {
        let mut overrides = ShortcutOverrides::default();
        overrides.set("save", "Mod+S");
        overrides.set("broken", "ctrl+shift");

        let (parsed, errors) = overrides.parse();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed["save"].key, "s");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].binding_id, "broken");
        assert_eq!(errors[0].source, ShortcutParseError::MissingKey);
    }

    #[test]
    fn from_combos_writes_canonical_strings() {
        let mut combos = HashMap::new();
        combos.insert("redo".to_string(), KeyCombo::parse("Shift+Mod+Z").unwrap());

        let overrides = ShortcutOverrides::from_combos(&combos);
        assert_eq!(overrides.get("redo"), Some("mod+shift+z"));
    }

    #[test]
    fn delete_clears_stored_overrides() {
        let store = MemoryStore::default();
        let overrides: ShortcutOverrides = [("save".to_string(), "mod+s".to_string())]
            .into_iter()
            .collect();
        block_on(overrides.save(&store)).unwrap();

        block_on(ShortcutOverrides::delete(&store)).unwrap();
        assert!(block_on(ShortcutOverrides::load(&store)).unwrap().is_empty());
    }
}
