use crate::models::notification::{drop_duplicate_ids, Notification};
use serde::Deserialize;

/// A staff account in the directory
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    /// Three-digit staff ID
    pub id: String,
    /// Plaintext password
    pub password: String,
    /// Second factor, required when `Some`
    pub two_step_code: Option<String>,
    /// Staff token counter, reset at start-up
    pub token_balance: i64,
    /// Current notification list, oldest first
    pub notifications: Vec<Notification>,
    /// Compiled-in notification list, restored by a start-up wipe
    pub seed_notifications: Vec<Notification>,
}

impl User {
    /// Build an account; repeated notification IDs keep only their first entry
    pub fn new(id: impl Into<String>, password: impl Into<String>, mut notifications: Vec<Notification>) -> Self {
        let id = id.into();
        let dropped = drop_duplicate_ids(&mut notifications);
        if !dropped.is_empty() {
            tracing::warn!(user_id = %id, dropped = ?dropped, "Seed notifications repeat an ID, keeping the first of each");
        }

        Self {
            id,
            password: password.into(),
            two_step_code: None,
            token_balance: 0,
            seed_notifications: notifications.clone(),
            notifications,
        }
    }

    /// Require a second factor. An empty code leaves two-step off
    pub fn with_two_step(mut self, code: impl Into<String>) -> Self {
        let code = code.into();
        self.two_step_code = (!code.is_empty()).then_some(code);
        self
    }

    pub fn two_step_enabled(&self) -> bool {
        self.two_step_code.is_some()
    }

    /// Drop any overlay and go back to the compiled-in list
    pub fn restore_seed(&mut self) {
        self.notifications = self.seed_notifications.clone();
    }
}

/// Summary of the logged-in account shown in the dashboard header
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveUser {
    pub id: String,
    pub token_balance: i64,
}

impl From<&User> for ActiveUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            token_balance: user.token_balance,
        }
    }
}

/// Account entry as written in a seed file
#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub id: String,
    pub password: String,
    #[serde(default)]
    pub two_step: bool,
    pub two_step_code: Option<String>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
}

/// Top-level shape of a seed file
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SeedFile {
    #[serde(default, rename = "user")]
    pub users: Vec<SeedUser>,
}
