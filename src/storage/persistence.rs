use crate::models::notification::{drop_duplicate_ids, Notification};
use crate::storage::keys::StorageKeys;
use crate::storage::KeyValueStore;
use std::sync::Arc;
use tracing::warn;

/// Dashboard view over a key-value store
///
/// Applies the key layout and the failure policy: provider errors are
/// logged and swallowed here, so callers only ever see "stored" or
/// "nothing stored".
#[derive(Clone)]
pub struct Persistence {
    store: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
}

impl Persistence {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// Write a user's complete notification list
    pub fn save_notifications(&self, user_id: &str, notifications: &[Notification]) {
        let key = self.keys.notifications(user_id);
        let json = match serde_json::to_string(notifications) {
            Ok(json) => json,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to serialize notifications");
                return;
            }
        };

        if let Err(e) = self.store.set(&key, &json) {
            warn!(user_id = %user_id, key = %key, error = %e, "Failed to save notifications");
        }
    }

    /// Read a user's stored notification list
    ///
    /// Returns `None` when nothing usable is stored, meaning seed data applies.
    pub fn load_notifications(&self, user_id: &str) -> Option<Vec<Notification>> {
        let key = self.keys.notifications(user_id);
        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(user_id = %user_id, key = %key, error = %e, "Failed to load notifications");
                return None;
            }
        };

        match serde_json::from_str::<Vec<Notification>>(&raw) {
            Ok(mut notifications) => {
                let dropped = drop_duplicate_ids(&mut notifications);
                if !dropped.is_empty() {
                    warn!(
                        user_id = %user_id,
                        key = %key,
                        dropped = ?dropped,
                        "Stored notifications repeat an ID, keeping the first of each"
                    );
                }
                Some(notifications)
            }
            Err(e) => {
                warn!(
                    user_id = %user_id,
                    key = %key,
                    error = %e,
                    "Stored notifications are not a notification list, using seed data"
                );
                None
            }
        }
    }

    pub fn remove_notifications(&self, user_id: &str) {
        let key = self.keys.notifications(user_id);
        if let Err(e) = self.store.remove(&key) {
            warn!(user_id = %user_id, key = %key, error = %e, "Failed to remove notifications");
        }
    }

    pub fn save_logged_in(&self, user_id: &str) {
        if let Err(e) = self.store.set(&self.keys.logged_in(), user_id) {
            warn!(user_id = %user_id, error = %e, "Failed to save logged-in user");
        }
    }

    pub fn logged_in(&self) -> Option<String> {
        match self.store.get(&self.keys.logged_in()) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Failed to read logged-in user");
                None
            }
        }
    }

    pub fn clear_logged_in(&self) {
        if let Err(e) = self.store.remove(&self.keys.logged_in()) {
            warn!(error = %e, "Failed to clear logged-in user");
        }
    }
}
