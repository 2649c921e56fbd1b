use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::core::config::{DirectoryConfig, StartupPolicy, StorageBackend, StorageConfig};
use crate::core::state::AppState;
use crate::models::user::ActiveUser;
use crate::storage::{file::FileStore, memory::MemoryStore, KeyValueStore};
use crate::stores::directory::UserDirectory;

/// Open the configured storage backend
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>> {
    match config.backend {
        StorageBackend::File => {
            let store = FileStore::open(config.path.clone())
                .context("Failed to open file storage")?;
            info!(path = %config.path.display(), keys = store.len(), "File storage opened");
            Ok(Arc::new(store))
        }
        StorageBackend::Memory => {
            info!("In-memory storage selected, nothing will persist across runs");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Build the staff directory from the built-in accounts and an optional seed file
pub fn build_directory(config: &DirectoryConfig) -> Result<UserDirectory> {
    let directory = UserDirectory::builtin();

    if let Some(path) = &config.seed_path {
        directory.load_seed_file(path)
            .context("Failed to load seed users")?;
    }

    Ok(directory)
}

/// Reset state according to the start-up policy
///
/// `Wipe` removes every account's stored notifications, puts its seed list
/// back and zeroes its token balance. The remembered session pointer is
/// kept either way.
pub fn apply_startup_policy(state: &AppState, policy: StartupPolicy) {
    match policy {
        StartupPolicy::Wipe => {
            let ids = state.directory.ids();
            for id in &ids {
                state.persistence.remove_notifications(id);
                state.directory.with_user_mut(id, |user| {
                    user.restore_seed();
                    user.token_balance = 0;
                });
            }
            info!(users = ids.len(), "Start-up wipe: stored notifications and token balances reset");
        }
        StartupPolicy::Preserve => {
            info!("Start-up: keeping stored notifications");
        }
    }
}

// this runs at boot time
pub fn start(state: &AppState) -> Option<ActiveUser> {
    apply_startup_policy(state, state.config.startup.policy);
    state.session.resume_session()
}
