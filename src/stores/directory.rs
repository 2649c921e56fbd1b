use crate::models::notification::{ActionKind, Category, Notification};
use crate::models::user::{SeedFile, User};
use crate::validation::login::validate_id;
use anyhow::{Context, Result};
use dashmap::DashMap;
use std::path::Path;

const WELCOME_TEXT: &str = "This is your friendly welcome message...";
const WELCOME_DETAIL: &str = "Thank you for logging in! Please review the 'Instructions' tab under System Info for more information about how to use this dashboard!";

/// Fixed set of staff accounts
///
/// Built once at start-up and shared by the session manager and the
/// notification store. Accounts are never created or destroyed while a
/// session runs; only their notification lists and token balances change.
pub struct UserDirectory {
    users: DashMap<String, User>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
        }
    }

    /// Directory holding the compiled-in accounts
    pub fn builtin() -> Self {
        Self::with_users(builtin_users())
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let directory = Self::new();
        for user in users {
            directory.add_user(user);
        }
        directory
    }

    /// Add an account
    /// If an account with the same ID already exists, it will be replaced
    pub fn add_user(&self, user: User) {
        self.users.insert(user.id.clone(), user);
    }

    /// Load accounts from a TOML seed file
    ///
    /// Returns the number of accounts added or replaced. Entries with a
    /// malformed ID or an unusable two-step setup are skipped with a warning.
    pub fn load_seed_file(&self, path: &Path) -> Result<usize> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read seed file: {}", path.display()))?;

        let seed: SeedFile = toml::from_str(&content)
            .context(format!("Failed to parse seed file: {}", path.display()))?;

        let mut loaded = 0;
        for entry in seed.users {
            let id_ok = matches!(validate_id(&entry.id), Ok(id) if id == entry.id);
            if !id_ok {
                tracing::warn!(user_id = %entry.id, "Seed user ID is not 3 digits, skipping user");
                continue;
            }

            let mut user = User::new(entry.id.clone(), entry.password, entry.notifications);

            match (entry.two_step, entry.two_step_code) {
                (true, Some(code)) if !code.is_empty() => user = user.with_two_step(code),
                (true, _) => {
                    tracing::warn!(
                        user_id = %entry.id,
                        "Seed user has two-step enabled without a code, skipping user"
                    );
                    continue;
                }
                (false, _) => {}
            }

            self.add_user(user);
            loaded += 1;
        }

        tracing::info!(path = %path.display(), users = loaded, "Seed users loaded");
        Ok(loaded)
    }

    /// Get a copy of an account by ID
    pub fn get_user(&self, id: &str) -> Option<User> {
        self.users.get(id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.users.contains_key(id)
    }

    /// Run `f` against a mutable account
    ///
    /// The account is locked for the duration of `f`; do not call back
    /// into the directory from inside it.
    pub fn with_user_mut<R>(&self, id: &str, f: impl FnOnce(&mut User) -> R) -> Option<R> {
        self.users.get_mut(id).map(|mut entry| f(entry.value_mut()))
    }

    /// Account IDs in ascending order
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.users.iter().map(|entry| entry.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

/// The welcome notification every built-in account starts with
pub fn welcome_notification(user_id: &str) -> Notification {
    Notification::new(format!("n-{}-1", user_id), "Welcome!", WELCOME_TEXT)
        .with_detail(WELCOME_DETAIL)
        .with_category(Category::Info)
        .with_action("Acknowledge", ActionKind::MarkRead)
        .with_action("Close", ActionKind::Close)
}

/// Compiled-in staff accounts
pub fn builtin_users() -> Vec<User> {
    ["001", "002"]
        .into_iter()
        .map(|id| User::new(id, " ", vec![welcome_notification(id)]))
        .collect()
}
