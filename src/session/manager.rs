use crate::core::error::LoginError;
use crate::events::{EventBus, InboxEvent};
use crate::models::user::ActiveUser;
use crate::storage::persistence::Persistence;
use crate::stores::directory::UserDirectory;
use crate::validation::login::validate_id;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Tracks which staff account, if any, is logged in
///
/// At most one account is active at a time. Only the active account's ID
/// is persisted; its notification list is owned by the directory.
pub struct SessionManager {
    directory: Arc<UserDirectory>,
    persistence: Persistence,
    events: Arc<EventBus>,
    active: Mutex<Option<String>>,
}

impl SessionManager {
    pub fn new(directory: Arc<UserDirectory>, persistence: Persistence, events: Arc<EventBus>) -> Self {
        Self {
            directory,
            persistence,
            events,
            active: Mutex::new(None),
        }
    }

    fn active_slot(&self) -> MutexGuard<'_, Option<String>> {
        self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Check credentials and enter the account's session
    ///
    /// Checks run in a fixed order: ID format, directory lookup, two-step
    /// code (for accounts that require one), then password. An empty code
    /// counts as no code.
    pub fn authenticate(
        &self,
        id: &str,
        password: &str,
        two_step_code: Option<&str>,
    ) -> Result<ActiveUser, LoginError> {
        let id = validate_id(id)?;

        let user = self.directory.get_user(id).ok_or(LoginError::UserNotFound)?;

        if let Some(expected) = user.two_step_code.as_deref() {
            match two_step_code.filter(|code| !code.is_empty()) {
                None => {
                    debug!(user_id = %id, "Login needs a two-step code");
                    return Err(LoginError::TwoStepRequired);
                }
                Some(code) if code != expected => {
                    warn!(user_id = %id, "Login rejected: wrong two-step code");
                    return Err(LoginError::InvalidTwoStepCode);
                }
                Some(_) => {}
            }
        }

        if user.password != password {
            warn!(user_id = %id, "Login rejected: wrong password");
            return Err(LoginError::InvalidCredentials);
        }

        let active = self.enter_session(id).ok_or(LoginError::UserNotFound)?;
        self.persistence.save_logged_in(id);

        info!(user_id = %id, two_step = user.two_step_enabled(), "Staff logged in");
        Ok(active)
    }

    /// Re-enter the session remembered from a previous run
    ///
    /// A remembered ID that no longer names an account is cleared.
    pub fn resume_session(&self) -> Option<ActiveUser> {
        let saved = self.persistence.logged_in()?;

        if !self.directory.contains(&saved) {
            warn!(user_id = %saved, "Saved session names an unknown user, clearing it");
            self.persistence.clear_logged_in();
            return None;
        }

        let active = self.enter_session(&saved)?;
        info!(user_id = %saved, "Session resumed");
        Some(active)
    }

    /// Log out
    ///
    /// Clears the active pointer in memory and storage. Stored notifications
    /// are left in place.
    pub fn end_session(&self) {
        let previous = self.active_slot().take();
        self.persistence.clear_logged_in();

        if let Some(user_id) = previous {
            info!(user_id = %user_id, "Staff logged out");
            self.events.emit(InboxEvent::SessionEnded { user_id });
        }
    }

    pub fn active_user_id(&self) -> Option<String> {
        self.active_slot().clone()
    }

    pub fn active_user(&self) -> Option<ActiveUser> {
        let id = self.active_user_id()?;
        self.directory.get_user(&id).map(|user| ActiveUser::from(&user))
    }

    pub fn is_logged_in(&self) -> bool {
        self.active_slot().is_some()
    }

    /// Whether the login form should ask for a two-step code for `id`
    pub fn requires_two_step(&self, id: &str) -> bool {
        self.directory
            .get_user(id.trim())
            .map(|user| user.two_step_enabled())
            .unwrap_or(false)
    }

    /// Overlay stored notifications and make `id` the active account
    fn enter_session(&self, id: &str) -> Option<ActiveUser> {
        let stored = self.persistence.load_notifications(id);
        let overlaid = stored.is_some();

        let active = self.directory.with_user_mut(id, |user| {
            if let Some(notifications) = stored {
                user.notifications = notifications;
            }
            ActiveUser::from(&*user)
        })?;

        let previous = self.active_slot().replace(id.to_string());
        if let Some(previous) = previous.filter(|previous| previous != id) {
            self.events.emit(InboxEvent::SessionEnded { user_id: previous });
        }

        debug!(user_id = %id, stored_notifications = overlaid, "Session entered");
        self.events.emit(InboxEvent::SessionStarted { user_id: id.to_string() });
        Some(active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::drain;
    use crate::models::notification::Notification;
    use crate::models::user::User;
    use crate::storage::keys::StorageKeys;
    use crate::storage::memory::MemoryStore;
    use crate::storage::KeyValueStore;

    fn setup() -> (Arc<MemoryStore>, Arc<UserDirectory>, Persistence, SessionManager) {
        let store = Arc::new(MemoryStore::new());
        let persistence = Persistence::new(store.clone(), StorageKeys::default());
        let directory = Arc::new(UserDirectory::builtin());
        directory.add_user(User::new("007", "bond", Vec::new()).with_two_step("1234"));
        let session = SessionManager::new(directory.clone(), persistence.clone(), Arc::new(EventBus::new()));
        (store, directory, persistence, session)
    }

    #[test]
    fn test_login_success() {
        let (store, _directory, _persistence, session) = setup();

        let active = session.authenticate("001", " ", None).unwrap();
        assert_eq!(active, ActiveUser { id: "001".to_string(), token_balance: 0 });
        assert_eq!(session.active_user_id(), Some("001".to_string()));
        assert_eq!(store.get("ugai_loggedIn").unwrap(), Some("001".to_string()));
    }

    #[test]
    fn test_login_invalid_id_format() {
        let (_store, _directory, _persistence, session) = setup();
        assert_eq!(session.authenticate("1", " ", None), Err(LoginError::InvalidIdFormat));
        assert_eq!(session.authenticate("00a", " ", None), Err(LoginError::InvalidIdFormat));
        assert_eq!(session.authenticate("0001", " ", None), Err(LoginError::InvalidIdFormat));
        assert!(!session.is_logged_in());
    }

    #[test]
    fn test_login_unknown_user() {
        let (_store, _directory, _persistence, session) = setup();
        assert_eq!(session.authenticate("404", " ", None), Err(LoginError::UserNotFound));
    }

    #[test]
    fn test_login_wrong_password() {
        let (store, _directory, _persistence, session) = setup();
        assert_eq!(session.authenticate("001", "", None), Err(LoginError::InvalidCredentials));
        assert_eq!(session.authenticate("001", "  ", None), Err(LoginError::InvalidCredentials));
        assert!(store.is_empty());
    }

    #[test]
    fn test_two_step_required_regardless_of_password() {
        let (_store, _directory, _persistence, session) = setup();
        assert_eq!(session.authenticate("007", "bond", None), Err(LoginError::TwoStepRequired));
        assert_eq!(session.authenticate("007", "wrong", None), Err(LoginError::TwoStepRequired));
        assert_eq!(session.authenticate("007", "bond", Some("")), Err(LoginError::TwoStepRequired));
    }

    #[test]
    fn test_wrong_two_step_code_regardless_of_password() {
        let (_store, _directory, _persistence, session) = setup();
        assert_eq!(session.authenticate("007", "bond", Some("0000")), Err(LoginError::InvalidTwoStepCode));
        assert_eq!(session.authenticate("007", "wrong", Some("0000")), Err(LoginError::InvalidTwoStepCode));
    }

    #[test]
    fn test_two_step_success() {
        let (_store, _directory, _persistence, session) = setup();
        assert_eq!(session.authenticate("007", "wrong", Some("1234")), Err(LoginError::InvalidCredentials));
        assert!(session.authenticate("007", "bond", Some("1234")).is_ok());
    }

    #[test]
    fn test_login_overlays_stored_notifications() {
        let (_store, directory, persistence, session) = setup();
        let stored = vec![Notification::new("n-x", "Stored", "")];
        persistence.save_notifications("002", &stored);

        session.authenticate("002", " ", None).unwrap();
        assert_eq!(directory.get_user("002").unwrap().notifications, stored);
    }

    #[test]
    fn test_resume_session() {
        let (_store, _directory, persistence, session) = setup();
        persistence.save_logged_in("002");

        let active = session.resume_session().unwrap();
        assert_eq!(active.id, "002");
        assert_eq!(session.active_user_id(), Some("002".to_string()));
    }

    #[test]
    fn test_resume_stale_session_clears_pointer() {
        let (store, _directory, persistence, session) = setup();
        persistence.save_logged_in("999");

        assert_eq!(session.resume_session(), None);
        assert_eq!(store.get("ugai_loggedIn").unwrap(), None);
        assert!(!session.is_logged_in());
    }

    #[test]
    fn test_resume_without_saved_session() {
        let (_store, _directory, _persistence, session) = setup();
        assert_eq!(session.resume_session(), None);
    }

    #[test]
    fn test_end_session_keeps_notifications() {
        let (store, _directory, persistence, session) = setup();
        session.authenticate("001", " ", None).unwrap();
        persistence.save_notifications("001", &[]);

        session.end_session();
        assert!(!session.is_logged_in());
        assert_eq!(store.get("ugai_loggedIn").unwrap(), None);
        assert!(store.contains_key("ugai_notifs_001"));
    }

    #[test]
    fn test_requires_two_step() {
        let (_store, _directory, _persistence, session) = setup();
        assert!(session.requires_two_step("007"));
        assert!(!session.requires_two_step("001"));
        assert!(!session.requires_two_step("404"));
    }

    #[test]
    fn test_session_events() {
        let store = Arc::new(MemoryStore::new());
        let persistence = Persistence::new(store, StorageKeys::default());
        let events = Arc::new(EventBus::new());
        let mut rx = events.subscribe();
        let session = SessionManager::new(Arc::new(UserDirectory::builtin()), persistence, events);

        session.authenticate("001", " ", None).unwrap();
        session.authenticate("002", " ", None).unwrap();
        session.end_session();

        let received: Vec<InboxEvent> = drain(&mut rx);
        assert_eq!(
            received,
            vec![
                InboxEvent::SessionStarted { user_id: "001".to_string() },
                InboxEvent::SessionEnded { user_id: "001".to_string() },
                InboxEvent::SessionStarted { user_id: "002".to_string() },
                InboxEvent::SessionEnded { user_id: "002".to_string() },
            ]
        );
    }
}
