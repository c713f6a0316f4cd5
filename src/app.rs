//! Application services root.
//!
//! Owns the settings store, the loaded settings, the undo/redo history and
//! the shortcut manager. Constructed once and passed around by handle.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use tracing::{info, instrument};

use crate::config::{load_settings, save_settings, Settings, MIN_MAX_STACK_SIZE};
use crate::error::ResultExt;
use crate::history::{bind_history_shortcuts, Command, HistoryError, HistoryStack};
use crate::shortcuts::{KeyEvent, ShortcutGuard, ShortcutManager};
use crate::store::SettingsStore;

pub struct AppServices {
    // Dropped first so the history bindings unregister while the manager lives
    _history_bindings: Vec<ShortcutGuard>,
    store: Rc<dyn SettingsStore>,
    settings: RefCell<Settings>,
    history: Rc<RefCell<HistoryStack>>,
    shortcuts: Rc<ShortcutManager>,
}

impl AppServices {
    /// Load settings and shortcut overrides from `store`, then wire the
    /// history shortcuts. Load failures fall back to defaults.
    #[instrument(name = "bootstrap", skip(store))]
    pub async fn bootstrap(store: Rc<dyn SettingsStore>) -> Self {
        let settings = load_settings(store.as_ref()).await;
        let history = Rc::new(RefCell::new(HistoryStack::new(
            settings.history.effective_max_stack_size(),
        )));

        let shortcuts = Rc::new(ShortcutManager::new(Rc::clone(&store)));
        let overrides = shortcuts.load_overrides().await;
        let history_bindings = bind_history_shortcuts(&shortcuts, &history);

        info!(
            event_type = "app_lifecycle",
            action = "ready",
            overrides,
            max_stack_size = history.borrow().max_stack_size(),
            "Services ready"
        );

        Self {
            _history_bindings: history_bindings,
            store,
            settings: RefCell::new(settings),
            history,
            shortcuts,
        }
    }

    pub fn store(&self) -> &Rc<dyn SettingsStore> {
        &self.store
    }

    pub fn settings(&self) -> Ref<'_, Settings> {
        self.settings.borrow()
    }

    pub fn history(&self) -> &Rc<RefCell<HistoryStack>> {
        &self.history
    }

    pub fn shortcuts(&self) -> &Rc<ShortcutManager> {
        &self.shortcuts
    }

    /// Run `command` through the history.
    pub fn execute(&self, command: Command) -> Result<(), HistoryError> {
        self.history.borrow_mut().execute(command)
    }

    /// Dispatch a keydown to the shortcut manager.
    pub fn handle_key_event(&self, event: &mut KeyEvent) -> bool {
        self.shortcuts.handle_key_event(event)
    }

    /// Change the history bound. The history is trimmed before this returns;
    /// persisting the new value is best-effort.
    ///
    /// Returns the number of evicted commands.
    pub async fn set_max_stack_size(&self, max_stack_size: usize) -> usize {
        let max_stack_size = max_stack_size.max(MIN_MAX_STACK_SIZE);
        let evicted = self.history.borrow_mut().set_max_stack_size(max_stack_size);

        let snapshot = {
            let mut settings = self.settings.borrow_mut();
            settings.history.max_stack_size = max_stack_size;
            settings.clone()
        };

        info!(max_stack_size, evicted, "History limit changed");
        save_settings(self.store.as_ref(), &snapshot)
            .await
            .warn_on_err();
        evicted
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use futures::executor::block_on;
    use serde_json::json;

    use super::*;
    use crate::store::testing::FailingStore;
    use crate::store::MemoryStore;

    fn counting_command(value: &Rc<Cell<i32>>) -> Command {
        let forward = Rc::clone(value);
        let backward = Rc::clone(value);
        Command::new(
            move || {
                forward.set(forward.get() + 1);
                Ok(())
            },
            move || {
                backward.set(backward.get() - 1);
                Ok(())
            },
        )
    }

    #[test]
    fn bootstrap_with_empty_store_uses_defaults() {
        let app = block_on(AppServices::bootstrap(Rc::new(MemoryStore::new())));
        assert_eq!(app.settings().history.max_stack_size, 50);
        assert_eq!(app.history().borrow().max_stack_size(), 50);
        assert_eq!(app.shortcuts().len(), 2);
    }

    #[test]
    fn bootstrap_applies_stored_settings_and_overrides() {
        let store = MemoryStore::new();
        block_on(store.set("settings", json!({ "history": { "maxStackSize": 3 } }))).unwrap();
        block_on(store.set("shortcutOverrides", json!({ "history.undo": "Alt+U" }))).unwrap();

        let app = block_on(AppServices::bootstrap(Rc::new(store)));
        assert_eq!(app.history().borrow().max_stack_size(), 3);

        let value = Rc::new(Cell::new(0));
        app.execute(counting_command(&value)).unwrap();

        assert!(!app.handle_key_event(&mut KeyEvent::new("z").with_meta()));
        assert!(app.handle_key_event(&mut KeyEvent::new("u").with_alt()));
        assert_eq!(value.get(), 0);
    }

    #[test]
    fn zero_stored_limit_is_clamped() {
        let store = MemoryStore::new();
        block_on(store.set("settings", json!({ "history": { "maxStackSize": 0 } }))).unwrap();

        let app = block_on(AppServices::bootstrap(Rc::new(store)));
        assert_eq!(app.history().borrow().max_stack_size(), 1);
    }

    #[test]
    fn set_max_stack_size_trims_and_persists() {
        let store = MemoryStore::new();
        let app = block_on(AppServices::bootstrap(Rc::new(store.clone())));
        let value = Rc::new(Cell::new(0));
        for _ in 0..5 {
            app.execute(counting_command(&value)).unwrap();
        }

        let evicted = block_on(app.set_max_stack_size(2));
        assert_eq!(evicted, 3);
        assert_eq!(app.history().borrow().len_past(), 2);
        assert_eq!(
            store.snapshot("settings"),
            Some(json!({ "history": { "maxStackSize": 2 } }))
        );
    }

    #[test]
    fn set_max_stack_size_keeps_unrelated_settings() {
        let store = MemoryStore::new();
        block_on(store.set("settings", json!({ "theme": "dark" }))).unwrap();
        let app = block_on(AppServices::bootstrap(Rc::new(store.clone())));

        block_on(app.set_max_stack_size(10));
        assert_eq!(
            store.snapshot("settings"),
            Some(json!({ "history": { "maxStackSize": 10 }, "theme": "dark" }))
        );
    }

    #[test]
    fn set_max_stack_size_trims_even_when_persisting_fails() {
        let app = block_on(AppServices::bootstrap(Rc::new(FailingStore {
            inner: MemoryStore::new(),
        })));
        let value = Rc::new(Cell::new(0));
        for _ in 0..4 {
            app.execute(counting_command(&value)).unwrap();
        }

        assert_eq!(block_on(app.set_max_stack_size(1)), 3);
        assert_eq!(app.history().borrow().len_past(), 1);
        assert_eq!(app.settings().history.max_stack_size, 1);
    }

    #[test]
    fn dropping_services_releases_history_bindings() {
        let app = block_on(AppServices::bootstrap(Rc::new(MemoryStore::new())));
        let shortcuts = Rc::clone(app.shortcuts());
        drop(app);
        assert!(shortcuts.is_empty());
    }
}
