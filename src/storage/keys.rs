/// Builds the storage keys used by the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    prefix: String,
}

impl StorageKeys {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Key holding the ID of the logged-in user
    pub fn logged_in(&self) -> String {
        format!("{}loggedIn", self.prefix)
    }

    /// Key holding one user's notification list
    pub fn notifications(&self, user_id: &str) -> String {
        format!("{}notifs_{}", self.prefix, user_id)
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::new("ugai_")
    }
}
