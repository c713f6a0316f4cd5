//! Settings loading from the settings store

use tracing::{info, instrument, warn};

use super::defaults::SETTINGS_KEY;
use super::types::Settings;
use crate::store::{get_with, set_with, SettingsStore, StoreError};

/// Load settings from the store.
///
/// Returns `Settings::default()` if the key is absent, the store fails,
/// or the stored value doesn't deserialize.
#[instrument(name = "load_settings", skip(store))]
pub async fn load_settings<S: SettingsStore + ?Sized>(store: &S) -> Settings {
    match get_with::<_, Settings>(store, SETTINGS_KEY).await {
        Ok(Some(settings)) => {
            info!(
                max_stack_size = settings.history.max_stack_size,
                "Loaded settings"
            );
            settings
        }
        Ok(None) => {
            info!("No stored settings, using defaults");
            Settings::default()
        }
        Err(e) => {
            warn!(error = %e, "Failed to load settings, using defaults");
            Settings::default()
        }
    }
}

/// Persist settings under the `settings` key.
pub async fn save_settings<S: SettingsStore + ?Sized>(
    store: &S,
    settings: &Settings,
) -> Result<(), StoreError> {
    set_with(store, SETTINGS_KEY, settings).await
}
