// Application state (AppState)

use crate::core::config::Config;
use crate::events::EventBus;
use crate::storage::keys::StorageKeys;
use crate::storage::persistence::Persistence;
use crate::storage::KeyValueStore;
use crate::session::manager::SessionManager;
use crate::stores::{directory::UserDirectory, notification_store::NotificationStore};
use std::sync::Arc;

/// Shared application state
///
/// Built once at process start. The directory, storage and event bus are
/// created here and handed to the session manager and notification store,
/// so both see the same accounts and the same stored data.
#[derive(Clone)]
pub struct AppState {
    /// Staff accounts and their current notification lists
    pub directory: Arc<UserDirectory>,

    /// Storage with the dashboard's key layout
    pub persistence: Persistence,

    /// Change notifications for the view layer
    pub events: Arc<EventBus>,

    /// Login state
    pub session: Arc<SessionManager>,

    /// Active user's inbox
    pub inbox: Arc<NotificationStore>,

    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, directory: UserDirectory, store: Arc<dyn KeyValueStore>) -> Self {
        let config = Arc::new(config);
        let directory = Arc::new(directory);
        let events = Arc::new(EventBus::new());

        let persistence = Persistence::new(store, StorageKeys::new(config.storage.key_prefix.clone()));

        let session = Arc::new(SessionManager::new(
            Arc::clone(&directory),
            persistence.clone(),
            Arc::clone(&events),
        ));

        let inbox = Arc::new(NotificationStore::new(
            Arc::clone(&directory),
            Arc::clone(&session),
            persistence.clone(),
            Arc::clone(&events),
        ));

        Self {
            directory,
            persistence,
            events,
            session,
            inbox,
            config,
        }
    }
}
